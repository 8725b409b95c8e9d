mod cli;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use edgecore_journal::auth::{HostedIdentityProvider, IdentityProvider, LocalIdentityProvider};
use edgecore_journal::config::Config;

use crate::cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let auth: Box<dyn IdentityProvider> = if cfg.uses_hosted_auth() {
        let hosted = HostedIdentityProvider::new(&cfg);
        if !cfg.auth_email.is_empty() && !command.is_auth() {
            hosted
                .sign_in(&cfg.auth_email, &cfg.auth_password)
                .await
                .context("signing in with EDGECORE_EMAIL")?;
        }
        Box::new(hosted)
    } else {
        let local = LocalIdentityProvider::open(&cfg.data_dir, &cfg.default_user)
            .context("loading local accounts")?;
        if let Some(user) = local.current_user().await {
            info!("Using local identity {}", user.display_name());
        }
        Box::new(local)
    };

    cli::run(&cfg, command, auth.as_ref()).await
}
