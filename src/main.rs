use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pollinator_impact::{
    analysis::{self, ImpactTier},
    params::{CropFocus, ResilienceSetting, SimulationParameters, MAX_BEE_PERCENTAGE},
    regions,
    report::{ImpactReport, ReportWriter},
    response::{biodiversity_response, crop_production_response},
    scenario::{Overrides, ScenarioLoader},
    simulate_ecosystem, ModelError,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Pollinator decline impact model")]
struct Cli {
    /// Log filter used when RUST_LOG is not set. `run` falls back to the
    /// scenario's `logging.level`, other commands to "info".
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a scenario file and write a JSON report
    Run {
        #[arg(long, default_value = "scenarios/colombia.yaml")]
        scenario: PathBuf,
        /// Override the bee population percentage
        #[arg(long)]
        bee: Option<f64>,
        /// Override the simulation horizon in years
        #[arg(long)]
        years: Option<u32>,
        /// Override resilience (number in [0,1] or a level such as "alta")
        #[arg(long)]
        resilience: Option<ResilienceSetting>,
        /// Directory for reports
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
    /// Biodiversity index for one parameter pair
    Biodiversity {
        #[arg(long)]
        bee: f64,
        #[arg(long, default_value = "media")]
        resilience: ResilienceSetting,
    },
    /// Crop production index, optionally weighted to a crop family
    Crop {
        #[arg(long)]
        bee: f64,
        #[arg(long, default_value = "todos")]
        focus: CropFocus,
    },
    /// Print the monthly ecosystem trajectory
    Simulate {
        #[arg(long)]
        bee: f64,
        #[arg(long, default_value_t = 10)]
        years: u32,
        #[arg(long, default_value = "media")]
        resilience: ResilienceSetting,
        /// Print every Nth sample
        #[arg(long, default_value_t = 1)]
        every: usize,
    },
    /// Rank regions by exposure to pollinator decline
    Regions {
        #[arg(long)]
        bee: f64,
    },
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

const DEFAULT_LOG_LEVEL: &str = "info";

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if !matches!(cli.command, Command::Run { .. }) {
        init_logging(cli.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL));
    }

    match cli.command {
        Command::Run {
            scenario,
            bee,
            years,
            resilience,
            report_dir,
        } => {
            let loader = ScenarioLoader::new(".");
            let scenario = loader.load(&scenario)?;
            init_logging(scenario.log_level(cli.log_level.as_deref()));
            let params = scenario.parameters_with(&Overrides {
                bee_population_percentage: bee,
                years,
                resilience,
            })?;
            info!(scenario = %scenario.name, ?params, "running scenario");

            let report = ImpactReport::build(
                &scenario.name,
                &params,
                &scenario.rates,
                scenario.crop_focus,
                scenario.region.as_deref(),
            )?;
            let mut writer = ReportWriter::new(scenario.report.clone());
            if let Some(dir) = report_dir {
                writer = writer.with_output_dir(dir);
            }
            let path = writer.write(&report)?;

            println!(
                "Scenario '{}': biodiversity {:.1}% ({:?}), crop production {:.1}% ({:?})",
                report.scenario,
                report.biodiversity,
                report.biodiversity_tier,
                report.crop_production_focused,
                report.crop_tier,
            );
            if let Some(last) = report.trajectory.last() {
                println!(
                    "After {} years: biodiversity {:.1}%, crops {:.1}%, wild plants {:.1}%",
                    params.years, last.biodiversity, last.crop_production, last.wild_plants
                );
            }
            if let Some(path) = path {
                println!("Report written to {}", path.display());
            }
        }
        Command::Biodiversity { bee, resilience } => {
            let params = SimulationParameters::new(bee, resilience.value(), 1)?;
            let index =
                biodiversity_response(params.bee_population_percentage, params.ecosystem_resilience);
            let tier = ImpactTier::classify(index);
            println!("{index:.2}");
            println!("{}", tier.biodiversity_text());
        }
        Command::Crop { bee, focus } => {
            ModelError::check_range("bee", bee, 0.0, MAX_BEE_PERCENTAGE)?;
            let base = crop_production_response(bee);
            let focused = analysis::crop_production_for(bee, focus);
            println!("all crops: {base:.2}");
            println!("{focus}: {focused:.2}");
            println!("{}", ImpactTier::classify(focused).crop_text());
        }
        Command::Simulate {
            bee,
            years,
            resilience,
            every,
        } => {
            let params = SimulationParameters::new(bee, resilience.value(), years)?;
            let trajectory = simulate_ecosystem(&params)?;
            println!("time,biodiversity,crop_production,wild_plants,bee_population");
            let last_index = trajectory.len() - 1;
            for (i, s) in trajectory.iter().enumerate() {
                if i % every.max(1) == 0 || i == last_index {
                    println!(
                        "{:.4},{:.4},{:.4},{:.4},{:.4}",
                        s.time, s.biodiversity, s.crop_production, s.wild_plants, s.bee_population
                    );
                }
            }
        }
        Command::Regions { bee } => {
            ModelError::check_range("bee", bee, 0.0, MAX_BEE_PERCENTAGE)?;
            for entry in regions::exposure_ranking(bee) {
                let region = entry.region;
                println!(
                    "{:<16} {:<6} {:>3}% {:.3}  ({:.4}, {:.4})  {}",
                    region.name,
                    region.risk,
                    region.dependency,
                    entry.exposure,
                    region.lat,
                    region.lon,
                    region.crops
                );
                println!("    {}", region.description);
            }
        }
        Command::Serve { host, port } => {
            web::run(WebServerConfig { host, port }).await?;
        }
    }
    Ok(())
}
