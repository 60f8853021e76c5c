//! End-to-end flows against a mocked UCMDB server: authentication, version
//! gating with per-session caching, and chunked result collection.

use std::num::NonZeroUsize;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ucmdb::{
    AggregationError, ClientConfig, CompatError, Credentials, Scheme, UcmdbClient, UcmdbError,
};

const TWO: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(n) => n,
    None => unreachable!(),
};
const TEN: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

fn config_for(server: &MockServer) -> ClientConfig {
    let address = server.address();
    ClientConfig::new(address.ip().to_string())
        .port(address.port())
        .scheme(Scheme::Http)
}

async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rest-api/authenticate"))
        .and(body_json(json!({
            "username": "admin",
            "password": "password",
            "clientContext": 1,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "test-token" })))
        .mount(server)
        .await;
}

async fn mount_version(server: &MockServer, release: &str, fetches: u64) {
    Mock::given(method("GET"))
        .and(path("/rest-api/v1/uiserver/dashboard/versions/getVersion"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "productName": "Universal CMDB",
            "serverBuildNumber": "232",
            "contentPackVersion": release,
            "fullServerVersion": "11.8.0",
        })))
        .expect(fetches)
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> UcmdbClient {
    UcmdbClient::connect(config_for(server), &Credentials::new("admin", "password"))
        .await
        .expect("authentication against the mock server failed")
}

#[tokio::test]
async fn rejected_credentials_surface_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest-api/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Your user is not authorized"))
        .mount(&server)
        .await;

    let err = UcmdbClient::connect(config_for(&server), &Credentials::new("admin", "wrong"))
        .await
        .unwrap_err();

    match err {
        UcmdbError::AuthRejected { status, body, .. } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("not authorized"));
        }
        other => panic!("expected an authentication rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn gated_operations_share_one_version_fetch_per_session() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_version(&server, "24.2", 1).await;
    Mock::given(method("GET"))
        .and(path("/rest-api/packagemanager/packages"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "KWP.zip" }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest-api/packagemanager/contentpacks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let packages = client.packages().list().await.unwrap();
    assert_eq!(packages.len(), 1);

    // A second gated operation against the same server: no new version fetch.
    let packs = client.packages().content_packs().await.unwrap();
    assert!(packs.is_empty());
}

#[tokio::test]
async fn clearing_the_cached_version_forces_one_refetch() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_version(&server, "24.2", 2).await;
    Mock::given(method("GET"))
        .and(path("/rest-api/packagemanager/contentpacks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    client.packages().content_packs().await.unwrap();
    client.clear_cached_version();
    client.packages().content_packs().await.unwrap();
}

#[tokio::test]
async fn old_servers_are_blocked_before_the_endpoint_is_touched() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_version(&server, "2023.04", 1).await;
    Mock::given(method("GET"))
        .and(path("/rest-api/packagemanager/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client.packages().list().await.unwrap_err();

    match err {
        UcmdbError::Compat(CompatError::IncompatibleVersion {
            operation,
            current,
            raw,
            ..
        }) => {
            assert_eq!(operation, "packages.list");
            assert_eq!(current.to_string(), "2023.04");
            assert_eq!(raw, "2023.04");
        }
        other => panic!("expected a version block, got {other:?}"),
    }
}

#[tokio::test]
async fn unparsable_versions_fail_resolution_and_are_not_cached() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    // A server that only reports a build version; two gated attempts mean
    // two resolution attempts, since nothing may be cached.
    Mock::given(method("GET"))
        .and(path("/rest-api/v1/uiserver/dashboard/versions/getVersion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contentPackVersion": "",
            "fullServerVersion": "11.8.0",
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest-api/packagemanager/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    for _ in 0..2 {
        let err = client.packages().list().await.unwrap_err();
        assert!(matches!(
            err,
            UcmdbError::Compat(CompatError::VersionResolution { .. })
        ));
    }
    assert!(client.version_cache().is_empty());
}

#[tokio::test]
async fn package_browsing_collects_offset_pages_until_a_short_page() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_version(&server, "24.2", 1).await;

    let page = |names: &[&str]| {
        json!({ "collection": names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>() })
    };
    let browse = "/rest-api/uiserver/packagemanager/packages";
    Mock::given(method("GET"))
        .and(path(browse))
        .and(query_param("start", "0"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["a", "b"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(browse))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["c", "d"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(browse))
        .and(query_param("start", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["e"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let packages = client.packages().list_all(TWO, TEN).await.unwrap();

    let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn a_failing_page_hands_back_everything_already_fetched() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_version(&server, "24.2", 1).await;

    let browse = "/rest-api/uiserver/packagemanager/packages";
    Mock::given(method("GET"))
        .and(path(browse))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [{ "name": "a" }, { "name": "b" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(browse))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("result store evicted"))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client.packages().list_all(TWO, TEN).await.unwrap_err();

    match err {
        AggregationError::Fetch { partial, source } => {
            assert_eq!(partial.len(), 2);
            assert_eq!(partial.chunks, 1);
            assert!(matches!(source, UcmdbError::Api { status, .. } if status.as_u16() == 500));
        }
        other => panic!("expected a mid-stream fetch failure, got {other:?}"),
    }
}

#[tokio::test]
async fn chunked_views_are_collected_in_order() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_version(&server, "24.2", 1).await;

    let ci = |id: &str| json!({ "ucmdbId": id, "type": "nt" });
    Mock::given(method("POST"))
        .and(path("/rest-api/topology"))
        .and(query_param("chunkSize", "2"))
        .and(body_json(json!("All My Windows Servers")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cis": [ci("c1")],
            "relations": [],
            "queryResultId": 731,
            "numberOfChunks": 2,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest-api/topology/result/731/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cis": [ci("c2"), ci("c3")],
            "relations": [],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest-api/topology/result/731/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cis": [ci("c4")],
            "relations": [{ "ucmdbId": "r1", "type": "composition" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let view = client
        .topology()
        .collect_view("All My Windows Servers", TWO, TEN)
        .await
        .unwrap();

    let ids: Vec<_> = view.cis.iter().map(|c| c.ucmdb_id.as_str()).collect();
    assert_eq!(ids, ["c1", "c2", "c3", "c4"]);
    assert_eq!(view.relations.len(), 1);
}

#[tokio::test]
async fn a_failing_view_chunk_preserves_the_first_slice() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_version(&server, "24.2", 1).await;

    Mock::given(method("POST"))
        .and(path("/rest-api/topology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cis": [{ "ucmdbId": "c1", "type": "nt" }],
            "relations": [],
            "queryResultId": "abc",
            "numberOfChunks": 3,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest-api/topology/result/abc/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cis": [{ "ucmdbId": "c2", "type": "nt" }],
            "relations": [],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest-api/topology/result/abc/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("chunk expired"))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client
        .topology()
        .collect_view("Big View", TWO, TEN)
        .await
        .unwrap_err();

    // The first slice and the one successful chunk both survive.
    assert_eq!(err.partial().len(), 2);
    assert_eq!(err.partial().chunks, 2);
}
