//! Runs a named view and collects every chunk of its result, accepting a
//! partial result if a chunk fetch fails part way through.
//!
//! ```text
//! UCMDB_HOST=cmdb.example.com UCMDB_USER=admin UCMDB_PASS=... \
//!     cargo run --example collect_view -- "All My Windows Servers"
//! ```

use std::env;
use std::num::NonZeroUsize;

use anyhow::Context;
use ucmdb::{ClientConfig, Credentials, UcmdbClient};

const CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => unreachable!(),
};
const MAX_CHUNKS: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let view = env::args().nth(1).context("usage: collect_view <view name>")?;
    let host = env::var("UCMDB_HOST").context("UCMDB_HOST is not set")?;
    let user = env::var("UCMDB_USER").context("UCMDB_USER is not set")?;
    let pass = env::var("UCMDB_PASS").context("UCMDB_PASS is not set")?;

    let config = ClientConfig::new(host).verify_tls(false);
    let client = UcmdbClient::connect(config, &Credentials::new(user, pass)).await?;

    match client
        .topology()
        .collect_view(&view, CHUNK_SIZE, MAX_CHUNKS)
        .await
    {
        Ok(result) => {
            println!(
                "{}: {} CIs, {} relations",
                view,
                result.cis.len(),
                result.relations.len()
            );
        }
        Err(err) => {
            // The partial result is still usable; report how far we got.
            eprintln!(
                "collection stopped early after {} entities in {} chunks: {err}",
                err.partial().len(),
                err.partial().chunks
            );
        }
    }

    Ok(())
}
