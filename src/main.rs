use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_core::{
    config::core_config_from_env_values,
    constants::{
        ENV_CARD_DIR, ENV_PRESSURE_MAX, ENV_PRESSURE_MIN, ENV_PRESSURE_POLICY,
        ENV_SATURATION_MIN, ENV_SPEAK_COMMAND, ENV_TEMPERATURE_MAX,
    },
    AnnouncementQueue, CommandSpeaker, LogSpeaker, Speaker, ThresholdValues, TriageSession,
};

mod bridge;

use bridge::{Bridge, Reply};

/// Main entry point for the triage kiosk bridge
///
/// Reads one command per line from stdin and writes one reply per line to stdout. Logs go to
/// stderr so they never interleave with replies.
///
/// # Environment Variables
/// - `TRIAGE_TEMPERATURE_MAX`, `TRIAGE_SATURATION_MIN`, `TRIAGE_PRESSURE_MIN`,
///   `TRIAGE_PRESSURE_MAX`: scoring thresholds (required)
/// - `TRIAGE_PRESSURE_POLICY`: `highest-wins` (default) or `most-deviant`
/// - `TRIAGE_CARD_DIR`: directory status cards are written to (default: "site/cards")
/// - `TRIAGE_SPEAK_COMMAND`: program used to speak announcements, e.g. `espeak -v pt-br`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - thresholds are missing or invalid,
/// - stdin/stdout fail.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_run=info".parse()?)
                .add_directive("triage_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let thresholds = ThresholdValues {
        temperature_max: std::env::var(ENV_TEMPERATURE_MAX).ok(),
        saturation_min: std::env::var(ENV_SATURATION_MIN).ok(),
        pressure_min: std::env::var(ENV_PRESSURE_MIN).ok(),
        pressure_max: std::env::var(ENV_PRESSURE_MAX).ok(),
    };
    let cfg = Arc::new(core_config_from_env_values(
        thresholds,
        std::env::var(ENV_PRESSURE_POLICY).ok(),
        std::env::var(ENV_CARD_DIR).ok(),
    )?);

    let speaker: Arc<dyn Speaker> = match std::env::var(ENV_SPEAK_COMMAND).ok() {
        Some(command) if !command.trim().is_empty() => {
            Arc::new(CommandSpeaker::from_command_line(&command)?)
        }
        _ => Arc::new(LogSpeaker),
    };
    let (announcer, announce_worker) = AnnouncementQueue::spawn(speaker)?;

    tracing::info!(
        card_dir = %cfg.card_dir().display(),
        pressure_policy = ?cfg.pressure_policy(),
        "++ Starting triage kiosk bridge"
    );

    let bridge = Bridge::new(TriageSession::new(cfg), announcer);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match bridge.handle_line(&line) {
            Reply::Line(reply) => {
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Reply::Quit => break,
        }
    }

    // Let queued announcements finish before exiting.
    drop(bridge);
    announce_worker.await?;

    tracing::info!("-- Triage kiosk bridge stopped");
    Ok(())
}
