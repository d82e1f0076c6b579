use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use disposition_classifier::{
    normalize_transcript, parse_transcript_file, prefilter, serve, AppConfig, AppState,
    ConnectionStatus, DispositionPipeline, OpenAiClient, ReferenceConfig, ReferenceTables,
};

#[derive(Parser)]
#[command(name = "disposition-classifier")]
#[command(author, version, about = "Loan-collections call disposition classifier", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        #[command(flatten)]
        reference: ReferenceArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify a single transcript file and print the result
    Classify {
        /// Transcript file (JSON array of {role, content})
        #[arg(short, long)]
        input: PathBuf,

        /// Write the result JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        reference: ReferenceArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show what the pipeline would see, without calling the LLM
    Inspect {
        /// Transcript file (JSON array of {role, content})
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        reference: ReferenceArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct ReferenceArgs {
    /// General disposition table (overrides DISPOSITION_CSV)
    #[arg(long)]
    dispositions: Option<PathBuf>,

    /// Grievance subcategory table (overrides GRIEVANCE_CSV)
    #[arg(long)]
    grievances: Option<PathBuf>,
}

impl ReferenceArgs {
    fn apply(self, mut config: ReferenceConfig) -> ReferenceConfig {
        if let Some(path) = self.dispositions {
            config.dispositions = path;
        }
        if let Some(path) = self.grievances {
            config.grievances = path;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            reference,
            verbose,
        } => {
            setup_logging(verbose);
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("Invalid bind address {}:{}", host, port))?;
            let pipeline = build_pipeline(reference)?;
            serve(AppState::new(pipeline), addr).await
        }
        Commands::Classify {
            input,
            output,
            reference,
            verbose,
        } => {
            setup_logging(verbose);
            classify_file(input, output, reference).await
        }
        Commands::Inspect {
            input,
            reference,
            verbose,
        } => {
            setup_logging(verbose);
            inspect_transcript(input, reference)
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Load configuration and reference data; failures here stop the process
fn build_pipeline(reference: ReferenceArgs) -> Result<DispositionPipeline> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let tables = reference
        .apply(config.reference)
        .load_tables()
        .context("Failed to load reference data")?;

    info!("Using model {}", config.llm.model);
    let client = OpenAiClient::new(config.llm);

    Ok(DispositionPipeline::new(Arc::new(client), Arc::new(tables)))
}

async fn classify_file(
    input: PathBuf,
    output: Option<PathBuf>,
    reference: ReferenceArgs,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let transcript = parse_transcript_file(&input).context("Failed to parse input transcript")?;
    let pipeline = build_pipeline(reference)?;

    let result = pipeline.classify(&transcript).await?;
    let json = serde_json::to_string_pretty(&result)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write file: {:?}", path))?;
            info!("Result written to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn inspect_transcript(input: PathBuf, reference: ReferenceArgs) -> Result<()> {
    let transcript = parse_transcript_file(&input).context("Failed to parse input transcript")?;
    let config = reference.apply(ReferenceConfig::from_lookup(|k| std::env::var(k).ok()));
    let tables: ReferenceTables = config
        .load_tables()
        .context("Failed to load reference data")?;

    let text = normalize_transcript(&transcript);
    let skipped = transcript.iter().filter(|m| m.content.is_none()).count();

    println!("Transcript");
    println!("==========");
    println!("Turns: {} ({} without content)", transcript.len(), skipped);
    println!("Characters: {}", text.chars().count());
    println!("{}", text);
    println!();

    println!("Connection Pre-filter");
    println!("---------------------");
    let status = match prefilter(&text.to_lowercase()) {
        Some(status) => {
            println!("Decided without LLM: {}", status);
            status
        }
        None => {
            println!("Inconclusive: LLM confirmation required (showing Connected table)");
            ConnectionStatus::Connected
        }
    };
    println!();

    println!("Filtered Table ({})", status);
    println!("-----------------------------");
    println!("{}", tables.render_status_group(status));
    println!();

    println!(
        "Reference data: {} dispositions, {} grievance subcategories",
        tables.dispositions().len(),
        tables.grievances().len()
    );

    Ok(())
}
