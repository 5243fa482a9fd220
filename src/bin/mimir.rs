//! mimir: train one classifier per tag combination.
//!
//! With no subcommand, runs a full training pass and overwrites the cache.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use mimir::{ClassifierManager, ClassifierManagerBuilder, Config, Secrets};

/// Mimir classifier trainer
#[derive(Parser)]
#[command(name = "mimir")]
#[command(version = mimir::PKG_VERSION)]
#[command(about = "Train remote image classifiers from tagged sample archives")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "MIMIR_CONFIG")]
    config: Option<PathBuf>,

    /// Override the sample archive directory.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Override the cache file path.
    #[arg(long)]
    cache: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Default)]
enum Command {
    /// Train every combination and overwrite the cache (default)
    #[default]
    Train,

    /// Print cached classifiers, training and caching them first if absent
    Get,

    /// Print every combination that would be trained
    Combinations,

    /// List classifiers known to the service
    List,

    /// Delete a classifier from the service
    Delete {
        /// Classifier id
        classifier_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "mimir failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> mimir::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let mut builder = ClassifierManagerBuilder::from_config(&config).api_key(secrets.api_key());
    if let Some(dir) = args.base_dir {
        builder = builder.base_dir(dir);
    }
    if let Some(path) = args.cache {
        builder = builder.cache_path(path);
    }
    let manager = builder.build()?;

    info!(
        version = mimir::version_string(),
        base_dir = %manager.base_dir().display(),
        "mimir starting"
    );

    match args.command.unwrap_or_default() {
        Command::Train => {
            info!("creating classifiers");
            let results = manager.train_and_persist().await?;
            info!(
                "{} classifiers created, details written to {}",
                results.len(),
                manager.cache().path().display()
            );
        }

        Command::Get => {
            let results = manager.get_classifiers().await?;
            for result in &results {
                let classifier = &result.classifier;
                println!(
                    "{}\t{}\t{}",
                    classifier.classifier_id, classifier.status, classifier.name
                );
            }
        }

        Command::Combinations => {
            let combinations = manager.combinations()?;
            for combination in &combinations {
                println!("{combination}");
            }
            println!("{} combinations", combinations.len());
        }

        Command::List => print_service_classifiers(&manager).await?,

        Command::Delete { classifier_id } => {
            manager.service().delete_classifier(&classifier_id).await?;
            println!("deleted {classifier_id}");
        }
    }

    Ok(())
}

async fn print_service_classifiers(manager: &ClassifierManager) -> mimir::Result<()> {
    let classifiers = manager.service().list_classifiers().await?;
    if classifiers.is_empty() {
        println!("no classifiers");
        return Ok(());
    }
    for c in classifiers {
        println!("{}\t{}\t{}", c.classifier_id, c.status, c.name);
        if let Some(explanation) = c.explanation {
            println!("\t{explanation}");
        }
    }
    Ok(())
}
