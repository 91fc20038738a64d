use anyhow::Context;
use pinpet_pnl::{
    config::{Config, ReportMode},
    DataSource, HttpDataSource, Reporter, StaticCurveQuoter,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("Report failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let engine_config = config.engine_config()?;
    let mut http = HttpDataSource::new(config.api_url.clone());
    if let Some(path) = &config.price_query_path {
        http = http.with_price_query(path.clone());
    }
    let datasource: Arc<dyn DataSource> = Arc::new(http);
    let mut reporter = Reporter::new(datasource, engine_config, config.success_code);

    if let Some(path) = &config.curve_quotes_path {
        let quoter = StaticCurveQuoter::from_path(path)
            .with_context(|| format!("loading curve quotes from {}", path))?;
        tracing::info!("Loaded {} curve quotes from {}", quoter.len(), path);
        reporter = reporter.with_curve(Arc::new(quoter));
    }

    let output = match config.report_mode {
        ReportMode::Active => {
            let now = chrono::Utc::now().timestamp();
            let report = reporter
                .active_report(&config.user_address, &config.mint_address, now)
                .await?;
            serde_json::to_string_pretty(&report)?
        }
        ReportMode::History => {
            let report = reporter
                .history_report(&config.user_address, &config.mint_address)
                .await?;
            serde_json::to_string_pretty(&report)?
        }
    };

    println!("{}", output);
    Ok(())
}
