use anyhow::Context;
use pexcard::{build_connector, AccountInfo, Credential, PexConfig, TagConfiguration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pexcard=info")),
        )
        .with_target(true)
        .init();

    // Reads PEX_BASE_URL, PEX_TIMEOUT_SECONDS and PEX_EXTERNAL_TOKEN
    #[cfg(feature = "env-file")]
    let config = PexConfig::from_env_file("PEX").context("loading PEX configuration")?;
    #[cfg(not(feature = "env-file"))]
    let config = PexConfig::from_env("PEX").context("loading PEX configuration")?;
    let pex = build_connector(&config).context("building PEX connector")?;

    info!(base_url = %config.base_url, "Pinging PEX API");
    let reachable = pex.ping().await?;
    info!(reachable, "Ping finished");

    let Some(token) = config.external_token() else {
        warn!("PEX_EXTERNAL_TOKEN not set; skipping authenticated calls");
        return Ok(());
    };
    let token = Credential::new(token);

    let balance = pex.get_business_balance(&token).await?;
    info!(%balance, "Business balance");

    let details = pex.get_business_details(&token).await?;
    for account in details.cardholder_accounts.iter().take(5) {
        info!(
            account_id = account.account_id,
            status = %account.account_status,
            available = %account.available_balance,
            "Cardholder account"
        );
    }

    if pex.is_tags_enabled(&token).await? {
        let tags = pex.get_tags(&token).await?;
        info!(count = tags.len(), "Tags configured");
    } else {
        info!("Tags are disabled for this business");
    }

    Ok(())
}
