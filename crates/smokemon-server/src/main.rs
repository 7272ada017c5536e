use anyhow::Result;
use smokemon_alert::engine::Engine;
use smokemon_server::config::{AppConfig, DEFAULT_CONFIG_PATH};
use smokemon_server::consumer::{self, ConsumeSummary};
use smokemon_server::logging;
use smokemon_server::queue;
use smokemon_server::replay::CsvReplay;
use smokemon_server::sink::LogSink;
use std::path::Path;
use tokio::signal;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  smokemon-server [config.toml]    Replay the configured CSV and watch for alerts");
}

fn load_config() -> Result<AppConfig> {
    match std::env::args().nth(1).as_deref() {
        Some("-h" | "--help") => {
            print_usage();
            std::process::exit(0);
        }
        Some(path) => AppConfig::load(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AppConfig::load(DEFAULT_CONFIG_PATH),
        None => Ok(AppConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    logging::init(config.log_format, config.log_file.as_deref())?;

    let mut engine = Engine::new(config.channels.clone())?;
    tracing::info!(
        channels = ?engine.channel_ids(),
        csv = %config.replay.csv_path.display(),
        "smokemon-server starting"
    );

    let (publisher, mut deliveries) = queue::queue(config.replay.max_redeliveries);
    let replay = CsvReplay::from_config(&config.replay);
    let producer = tokio::spawn(async move { replay.run(&publisher).await });

    tracing::info!("Ready for work. To exit press CTRL+C");

    let sink = LogSink;
    let consumed: Option<ConsumeSummary> = tokio::select! {
        summary = consumer::run(&mut engine, &mut deliveries, &sink) => Some(summary),
        _ = signal::ctrl_c() => {
            tracing::info!("User interrupted continuous listening process");
            None
        }
    };

    let mut outcome = Ok(());
    match consumed {
        Some(summary) => {
            tracing::info!(
                delivered = summary.delivered,
                redelivered = summary.redelivered,
                alerts = summary.alerts,
                rejected = summary.rejected,
                "Queue drained"
            );
            match producer.await {
                Ok(Ok(replayed)) => tracing::info!(
                    rows = replayed.rows,
                    published = replayed.published,
                    skipped_cells = replayed.skipped_cells,
                    bad_rows = replayed.bad_rows,
                    "Replay finished"
                ),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Replay failed");
                    outcome = Err(e);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Replay task panicked");
                    outcome = Err(e.into());
                }
            }
        }
        None => producer.abort(),
    }

    consumer::log_channel_summary(&engine);
    tracing::info!("Closing connection. Goodbye.");
    outcome
}
