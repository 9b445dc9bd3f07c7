//! Ballot engine bootstrap.
//!
//! Loads configuration, wires adapters into a [`BallotEngine`] and keeps the
//! process alive until Ctrl-C.

use std::sync::Arc;

use ballot_engine::adapters::{
    HttpEligibilityChecker, HttpEligibilityConfig, InMemoryBallotStore, PostgresBallotStore,
    StubEligibilityChecker, SystemClock,
};
use ballot_engine::application::BallotEngine;
use ballot_engine::config::{AppConfig, DatabaseConfig, EligibilityConfig};
use ballot_engine::ports::{BallotStore, EligibilityChecker};
use ballot_engine::telemetry::init_tracing;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.telemetry);

    let store = build_store(config.database.as_ref()).await?;
    let eligibility = build_eligibility(&config.eligibility)?;
    let settings = config.engine_settings();

    let _engine = BallotEngine::new(store, Arc::new(SystemClock), eligibility, settings);

    tracing::info!(
        environment = ?config.telemetry.environment,
        max_write_attempts = settings.max_write_attempts,
        eligibility_timeout_ms = settings.eligibility_timeout.as_millis() as u64,
        "Ballot engine ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    Ok(())
}

async fn build_store(database: Option<&DatabaseConfig>) -> Result<Arc<dyn BallotStore>, BoxError> {
    let Some(database) = database else {
        tracing::warn!("No database configured, using in-memory store");
        return Ok(Arc::new(InMemoryBallotStore::new()));
    };

    let pool = database.pool_options().connect(&database.url).await?;
    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(Arc::new(PostgresBallotStore::new(pool)))
}

fn build_eligibility(config: &EligibilityConfig) -> Result<Arc<dyn EligibilityChecker>, BoxError> {
    let Some(base_url) = &config.base_url else {
        tracing::warn!("No eligibility service configured, every voter is eligible");
        return Ok(Arc::new(StubEligibilityChecker::new()));
    };

    let mut http = HttpEligibilityConfig::new(base_url.clone()).with_timeout(config.timeout());
    if let Some(key) = config.api_key() {
        http = http.with_api_key(key);
    }
    Ok(Arc::new(HttpEligibilityChecker::new(http)?))
}
