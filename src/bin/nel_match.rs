//! Entity linking from the command line
//!
//! Links one NER payload and prints the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! nel_match '{"word_scores:cancer": [["breast cancer", 0.92]]}'
//!
//! # Read the payload from stdin, custom config
//! echo '{"word_scores:gender": [["women", 0.8]]}' | nel_match --config nel.yaml -
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mesh_nel::config::{NelConfig, DEFAULT_CONFIG_PATH};
use mesh_nel::EntityLinker;

#[derive(Parser)]
#[command(name = "nel_match")]
#[command(version)]
#[command(about = "Link NER output to vocabulary concepts")]
struct Cli {
    /// Configuration file
    #[arg(long, short, env = "NEL_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// NER payload as JSON, or "-" to read stdin
    payload: String,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mesh_nel=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli, io::stdin()) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, mut stdin: impl Read) -> anyhow::Result<String> {
    let config = NelConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    let linker = EntityLinker::from_config(&config)?;

    let payload = if cli.payload == "-" {
        let mut buf = String::new();
        stdin
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        cli.payload.clone()
    };

    let result = linker.link(&payload)?;
    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    Ok(output)
}
