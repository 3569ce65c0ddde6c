use clap::{Parser, Subcommand};
use std::sync::Arc;
use triage_core::{
    classify,
    config::core_config_from_env_values,
    constants::{
        ENV_CARD_DIR, ENV_PRESSURE_MAX, ENV_PRESSURE_MIN, ENV_PRESSURE_POLICY,
        ENV_SATURATION_MIN, ENV_TEMPERATURE_MAX,
    },
    CoreConfig, ThresholdValues, TriageSession, UrgencyTier, VitalSample,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Triage kiosk scoring CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the urgency tiers and their score bands
    Tiers,
    /// Classify a total score
    Classify {
        /// Total score
        score: u32,
    },
    /// Score one patient using thresholds from the environment
    Assess {
        /// Body temperature
        #[arg(long)]
        temperature: f64,
        /// Blood pressure
        #[arg(long)]
        pressure: f64,
        /// Oxygen saturation (%)
        #[arg(long)]
        saturation: f64,
        /// Questionnaire points (repeatable)
        #[arg(long = "points")]
        points: Vec<u32>,
        /// Positive COVID checklist answer by index 0-4 (repeatable)
        #[arg(long = "covid")]
        covid: Vec<usize>,
        /// Write the status card to the card directory
        #[arg(long)]
        publish: bool,
    },
}

fn config_from_env() -> Result<CoreConfig, Box<dyn std::error::Error>> {
    let thresholds = ThresholdValues {
        temperature_max: std::env::var(ENV_TEMPERATURE_MAX).ok(),
        saturation_min: std::env::var(ENV_SATURATION_MIN).ok(),
        pressure_min: std::env::var(ENV_PRESSURE_MIN).ok(),
        pressure_max: std::env::var(ENV_PRESSURE_MAX).ok(),
    };

    Ok(core_config_from_env_values(
        thresholds,
        std::env::var(ENV_PRESSURE_POLICY).ok(),
        std::env::var(ENV_CARD_DIR).ok(),
    )?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Tiers) => {
            for tier in UrgencyTier::ALL {
                let band = match tier.score_range() {
                    (start, Some(end)) => format!("{start}-{end}"),
                    (start, None) => format!("{start}+"),
                };
                println!(
                    "{:<8} {:<16} {} {}",
                    band,
                    tier.label(),
                    tier.color_hex(),
                    tier.color_name()
                );
            }
        }
        Some(Commands::Classify { score }) => {
            let c = classify(score);
            println!("{}, {}, {}", c.label, c.color_hex, c.color_name);
        }
        Some(Commands::Assess {
            temperature,
            pressure,
            saturation,
            points,
            covid,
            publish,
        }) => {
            let session = TriageSession::new(Arc::new(config_from_env()?));
            let identifier = session.start_patient()?;

            session.update_vitals(VitalSample::new(temperature, pressure, saturation)?)?;
            for p in points {
                session.add_questionnaire_points(p)?;
            }
            for index in covid {
                if let Err(e) = session.set_covid_flag(index) {
                    eprintln!("Error setting COVID answer: {}", e);
                    return Err(e.into());
                }
            }

            let assessment = session.assessment()?;
            println!(
                "Patient {}: score {} -> {} ({}, {})",
                identifier,
                assessment.total_score,
                assessment.tier.label(),
                assessment.tier.color_hex(),
                assessment.tier.color_name()
            );

            if publish {
                match session.publish() {
                    Ok(path) => println!("Published status card: {}", path.display()),
                    Err(e) => eprintln!("Error publishing status card: {}", e),
                }
            }
        }
        None => {
            println!("Use 'triage --help' for commands");
        }
    }

    Ok(())
}
