use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use smi_exporter_services::{Exporter, ExporterConfig, SmiCollector, GPU_GAUGES};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smi-exporter-cli")]
#[command(about = "Inspect nvidia-smi readings as the exporter sees them", long_about = None)]
struct Cli {
    /// Path to the nvidia-smi executable (overrides NVIDIA_SMI_PATH)
    #[arg(long, global = true)]
    smi_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect one reading and print sanitized labels and values
    Reading {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Collect one reading and print the Prometheus exposition text
    Metrics,

    /// Show the fields requested from nvidia-smi
    Fields,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ExporterConfig::from_env()?;
    if let Some(path) = cli.smi_path {
        config.smi.program = path;
    }

    match cli.command {
        Commands::Reading { output } => cmd_reading(config, &output).await?,
        Commands::Metrics => cmd_metrics(config).await?,
        Commands::Fields => cmd_fields(&config),
    }

    Ok(())
}

async fn cmd_reading(config: ExporterConfig, output_format: &str) -> Result<()> {
    let exporter = Exporter::new(Arc::new(SmiCollector::new(config.smi)))?;
    let reading = exporter.refresh().await?;

    match output_format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&*reading)?);
        }
        _ => {
            println!();
            println!("GPU Reading:");
            println!("{:-<60}", "");
            println!("  {:<28} {}", "Label", "Value");
            println!("{:-<60}", "");
            for (label, value) in reading.iter() {
                let marker = if GPU_GAUGES.iter().any(|g| g.key == label) {
                    "*"
                } else {
                    " "
                };
                println!("{} {:<28} {}", marker, label, value);
            }
            println!();
            println!("  * exported as a gauge");
            println!();
        }
    }

    Ok(())
}

async fn cmd_metrics(config: ExporterConfig) -> Result<()> {
    let exporter = Exporter::new(Arc::new(SmiCollector::new(config.smi)))?;
    print!("{}", exporter.scrape().await?);
    Ok(())
}

fn cmd_fields(config: &ExporterConfig) {
    let collector = SmiCollector::new(config.smi.clone());

    println!();
    println!("Command: {} {}", collector.config().program, collector.config().args().join(" "));
    println!("{:-<40}", "");
    for field in &collector.config().query_fields {
        println!("  {}", field);
    }
    println!();
    println!("Exporter port: {}", config.port);
    println!();
}
