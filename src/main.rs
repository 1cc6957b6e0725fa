//! Trains both win-probability models on the configured game ledger and,
//! given two team codes, prints the predicted team1 win probabilities.

mod config;

use anyhow::{Context, Result};
use config::AppConfig;
use hoops_db::{GameLedger, InMemoryLedger};
use hoops_services::PredictorService;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoops_rs=info,hoops_ml=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new().context("loading configuration")?;
    info!("Ledger: {}", config.games_path().display());

    let ledger = InMemoryLedger::from_json_file(config.games_path())
        .with_context(|| format!("reading games from {}", config.games_path().display()))?;
    info!("{} games in ledger", ledger.len());

    let service = PredictorService::new(Arc::new(ledger), config.ml.clone());
    info!("Training metrics: {}", service.train_report()?);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [team1, team2] => {
            let report = service.predict_report(team1, team2)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => warn!("Expected two team codes, got {} arguments", args.len()),
    }

    Ok(())
}
