use anyhow::Result;
use stripe_catalog_export::export::{format::format_products, writer};
use stripe_catalog_export::stripe::provider::StripeProvider;
use stripe_catalog_export::trace::init_tracing;
use stripe_catalog_export::util::env as env_util;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_util::init_env();
    init_tracing("info")?;

    let secret_key = env_util::env_req("STRIPE_SECRET_KEY")?;
    let base_url = env_util::env_opt("STRIPE_API_BASE");
    let timeout_secs = env_util::env_parse("STRIPE_HTTP_TIMEOUT_SECS", 15u64);

    let provider = StripeProvider::new(secret_key, base_url.as_deref(), Some(timeout_secs))?;

    let catalog = provider.fetch_catalog().await?;
    let nodes = format_products(&catalog);
    let path = writer::save_products(&nodes)?;

    info!(products = nodes.len(), path = %path.display(), "file saved");
    Ok(())
}
