use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod config;
mod data;
mod error;
mod models;
mod notify;
mod pipeline;
mod report;
mod risk;

use config::Config;
use notify::SlackNotifier;
use pipeline::BurnoutAgent;

#[derive(Parser)]
#[command(name = "burnout-agent")]
#[command(about = "Weekly burnout risk report for Slack", long_about = None)]
struct Cli {
    /// Defaults to `run` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the dataset and deliver the report to the webhook
    Run,
    /// Print the report and webhook payload without sending anything
    Preview,
    /// Write a synthetic employee dataset
    Generate {
        /// Defaults to the configured data file
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env().context("invalid burnout agent configuration")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            info!("Burnout agent running");
            let webhook = config.webhook()?.clone();
            let agent = BurnoutAgent::new(config.thresholds)?;
            let employees = data::load_employees(&config.data_file)
                .with_context(|| format!("failed to load {}", config.data_file.display()))?;

            let notifier = SlackNotifier::new(webhook, config.timeout)
                .context("failed to build webhook client")?;
            let analysis = agent
                .run(&employees, &notifier)
                .await
                .context("burnout report was not delivered")?;

            let kind = if analysis.report.is_healthy() {
                "Healthy summary"
            } else {
                "At-risk report"
            };
            println!(
                "{kind} sent to Slack ({} employees scored, company average {:.1}%).",
                analysis.scored.len(),
                analysis.aggregates.company_avg
            );
        }
        Commands::Preview => {
            let agent = BurnoutAgent::new(config.thresholds)?;
            let employees = data::load_employees(&config.data_file)
                .with_context(|| format!("failed to load {}", config.data_file.display()))?;
            let analysis = agent.analyze(&employees)?;

            info!(
                at_risk = agent.thresholds().at_risk,
                critical = agent.thresholds().critical,
                healthy = analysis.classification.is_healthy(),
                "preview only, nothing will be sent"
            );
            print!("{}", report::render_markdown(&analysis.report));
            println!();
            println!("{}", serde_json::to_string_pretty(&analysis.message())?);
        }
        Commands::Generate { out, seed } => {
            let out = out.unwrap_or(config.data_file);
            let employees = data::generate_dataset(seed);
            data::write_dataset(&out, &employees)?;
            println!("Generated {} employees into {}.", employees.len(), out.display());
        }
    }

    Ok(())
}
