//! Connects to a UCMDB server and prints its version report and license
//! summary.
//!
//! ```text
//! UCMDB_HOST=cmdb.example.com UCMDB_USER=admin UCMDB_PASS=... \
//!     cargo run --example show_version
//! ```

use std::env;

use anyhow::Context;
use ucmdb::{ClientConfig, Credentials, UcmdbClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = env::var("UCMDB_HOST").context("UCMDB_HOST is not set")?;
    let user = env::var("UCMDB_USER").context("UCMDB_USER is not set")?;
    let pass = env::var("UCMDB_PASS").context("UCMDB_PASS is not set")?;

    let config = ClientConfig::new(host).verify_tls(false);
    let client = UcmdbClient::connect(config, &Credentials::new(user, pass)).await?;

    let version = client.system().version_info().await?;
    println!("product:       {}", version.product_name.as_deref().unwrap_or("?"));
    println!("content pack:  {}", version.content_pack_version.as_deref().unwrap_or("?"));
    println!("server build:  {}", version.server_build_number.as_deref().unwrap_or("?"));

    // Gated: requires 2023.05 or later, resolved from the cache after the
    // call above populated it.
    let license = client.system().license_report().await?;
    println!(
        "license units: {} of {}",
        license["usedUnit"], license["totalLicenseUnit"]
    );

    Ok(())
}
