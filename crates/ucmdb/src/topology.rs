//! Topology queries and view execution.
//!
//! Large views come back chunked: the initial `/topology` call returns the
//! first slice plus a stored result id and a chunk count, and the remaining
//! slices are fetched one by one. [`Topology::collect_view`] drives that
//! whole sequence through `compat::collect`, so a mid-stream failure still
//! hands back everything fetched up to that point.

use std::num::NonZeroUsize;

use serde::Deserialize;
use serde_json::Value;

use compat::{
    collect, require_version, AggregatedResult, AggregationError, PageCursor, ResultChunk,
};

use crate::client::UcmdbClient;
use crate::error::UcmdbError;
use crate::requirements;

/// One configuration item as returned by topology endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyCi {
    pub ucmdb_id: String,
    #[serde(default)]
    pub global_id: Option<String>,
    #[serde(rename = "type")]
    pub ci_type: String,
    #[serde(default)]
    pub properties: Option<Value>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub display_label: Option<String>,
}

/// One relation between two configuration items.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyRelation {
    pub ucmdb_id: String,
    #[serde(rename = "type")]
    pub relation_type: String,
    #[serde(default)]
    pub end1_id: Option<String>,
    #[serde(default)]
    pub end2_id: Option<String>,
    #[serde(default)]
    pub properties: Option<Value>,
}

/// Either kind of record a view chunk can carry; the unit the aggregator
/// works in, so partial results keep CIs and relations in arrival order.
#[derive(Debug, Clone)]
pub enum ViewEntity {
    Ci(TopologyCi),
    Relation(TopologyRelation),
}

/// One response from `/topology`, `/topologyQuery`, or a chunk endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyResult {
    #[serde(default)]
    pub cis: Vec<TopologyCi>,
    #[serde(default)]
    pub relations: Vec<TopologyRelation>,
    /// Stored-result handle for chunked views; absent when the response is
    /// complete in itself. The server reports it as a number or a string
    /// depending on release.
    #[serde(default)]
    pub query_result_id: Option<Value>,
    #[serde(default)]
    pub number_of_chunks: Option<u32>,
}

impl TopologyResult {
    fn into_entities(self) -> Vec<ViewEntity> {
        self.cis
            .into_iter()
            .map(ViewEntity::Ci)
            .chain(self.relations.into_iter().map(ViewEntity::Relation))
            .collect()
    }
}

/// A fully collected view: every chunk folded back into CI and relation
/// lists, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct ViewResult {
    pub cis: Vec<TopologyCi>,
    pub relations: Vec<TopologyRelation>,
}

impl ViewResult {
    fn absorb(&mut self, entities: Vec<ViewEntity>) {
        for entity in entities {
            match entity {
                ViewEntity::Ci(ci) => self.cis.push(ci),
                ViewEntity::Relation(relation) => self.relations.push(relation),
            }
        }
    }

    fn into_entities(self) -> Vec<ViewEntity> {
        self.cis
            .into_iter()
            .map(ViewEntity::Ci)
            .chain(self.relations.into_iter().map(ViewEntity::Relation))
            .collect()
    }
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Topology operations.
pub struct Topology<'a> {
    client: &'a UcmdbClient,
}

impl<'a> Topology<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Runs an ad-hoc TQL query (the `/topologyQuery` endpoint).
    pub async fn query(&self, query: &Value) -> Result<TopologyResult, UcmdbError> {
        self.client.post_json("/topologyQuery", query).await
    }

    /// Executes a named view, returning the first slice of its result.
    ///
    /// When the result exceeds `chunk_size` the response carries a stored
    /// result id; use [`Topology::collect_view`] to fetch everything.
    pub async fn run_view(
        &self,
        view: &str,
        include_empty_layout: bool,
        chunk_size: NonZeroUsize,
    ) -> Result<TopologyResult, UcmdbError> {
        let path = format!(
            "/topology?includeEmptyLayoutProperties={include_empty_layout}&chunkSize={chunk_size}"
        );
        self.client.post_json(&path, view).await
    }

    /// Fetches one numbered chunk of a stored view result.
    pub async fn view_chunk(
        &self,
        result_id: &str,
        index: u32,
    ) -> Result<TopologyResult, UcmdbError> {
        let gate = require_version("topology.view_chunks", requirements::TOPOLOGY_VIEW_CHUNKS);
        let path = format!("/topology/result/{result_id}/{index}");
        self.client
            .gated(&gate, || async move { self.client.get_json(&path).await })
            .await
    }

    /// Executes a view and fetches every chunk of its result.
    ///
    /// The initial execution counts as the first chunk; the remaining ones
    /// are retrieved strictly in order. On a mid-stream failure the error
    /// carries every entity collected so far, the first slice included.
    pub async fn collect_view(
        &self,
        view: &str,
        chunk_size: NonZeroUsize,
        max_chunks: NonZeroUsize,
    ) -> Result<ViewResult, AggregationError<ViewEntity, UcmdbError>> {
        let first = match self.run_view(view, false, chunk_size).await {
            Ok(first) => first,
            Err(source) => {
                return Err(AggregationError::Fetch {
                    partial: AggregatedResult {
                        entries: Vec::new(),
                        chunks: 0,
                    },
                    source,
                })
            }
        };

        let result_id = first.query_result_id.as_ref().map(id_text);
        let total_chunks = first.number_of_chunks.unwrap_or(0);
        let mut result = ViewResult::default();
        result.absorb(first.into_entities());

        let (Some(result_id), 1..) = (result_id, total_chunks) else {
            return Ok(result);
        };
        tracing::debug!(view, total_chunks, "collecting chunked view result");

        let mut next_index = 0u32;
        let fetch = move |_cursor: PageCursor, _hint: NonZeroUsize| {
            next_index += 1;
            let index = next_index;
            let result_id = result_id.clone();
            async move {
                let page = self.view_chunk(&result_id, index).await?;
                let entities = page.into_entities();
                Ok(if index >= total_chunks {
                    ResultChunk::finished(entities)
                } else {
                    ResultChunk::next(entities, (index + 1).to_string())
                })
            }
        };

        match collect(fetch, PageCursor::Token("1".into()), chunk_size, max_chunks).await {
            Ok(aggregated) => {
                result.absorb(aggregated.entries);
                Ok(result)
            }
            // Fold the first slice back in so nothing fetched is lost.
            Err(err) => Err(prepend_partial(result, err)),
        }
    }

    /// Fetches one chunk of a path-scoped view result from the modelling
    /// API.
    pub async fn chunk_for_path(
        &self,
        execution_id: &str,
        path_element: &str,
        chunk: u32,
    ) -> Result<Value, UcmdbError> {
        let gate = require_version(
            "topology.chunk_for_path",
            requirements::MODELING_CHUNK_FOR_PATH,
        );
        let body = serde_json::json!({
            "viewExecutionId": execution_id,
            "path": [{
                "pathElementId": path_element,
                "pathElementType": path_element,
            }],
            "chunkNumber": chunk,
        });
        self.client
            .gated(&gate, || async move {
                self.client
                    .post_json("/uiserver/modeling/views/result/chunkForPath", &body)
                    .await
            })
            .await
    }
}

fn prepend_partial(
    first: ViewResult,
    err: AggregationError<ViewEntity, UcmdbError>,
) -> AggregationError<ViewEntity, UcmdbError> {
    let rebuild = |partial: AggregatedResult<ViewEntity>| {
        let mut entries = first.into_entities();
        let chunks = partial.chunks + 1;
        entries.extend(partial.entries);
        AggregatedResult { entries, chunks }
    };
    match err {
        AggregationError::Fetch { partial, source } => AggregationError::Fetch {
            partial: rebuild(partial),
            source,
        },
        AggregationError::ChunkLimit { partial, limit } => AggregationError::ChunkLimit {
            partial: rebuild(partial),
            limit,
        },
    }
}
