//! paper-alert — one pass per invocation.
//! Fetches configured listings and feeds, posts new keyword matches to the
//! webhook in `SLACK_WEBHOOK_URL`, then exits. Schedule it externally.

use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use paper_alert::notify::WebhookNotifier;
use paper_alert::pipeline::{providers_from_config, run_once, RunSettings};
use paper_alert::store::TitleStore;
use paper_alert::AppConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("paper_alert=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = match AppConfig::load_default() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = ?e, "failed to load config");
            return ExitCode::FAILURE;
        }
    };

    let client = reqwest::Client::new();
    let notifier = WebhookNotifier::from_env(client.clone());
    if !notifier.is_configured() {
        tracing::warn!("SLACK_WEBHOOK_URL is not set; sends will fail");
    }

    let providers = providers_from_config(&cfg, &client);
    let settings = RunSettings::from_config(&cfg);
    let store = TitleStore::new(cfg.state_path.clone());

    match run_once(&settings, &providers, &notifier, &store).await {
        Ok(s) => {
            tracing::info!(
                fetched = s.fetched,
                already_posted = s.already_posted,
                unmatched = s.unmatched,
                sent = s.sent,
                failed = s.failed,
                "run finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "run aborted");
            ExitCode::FAILURE
        }
    }
}
