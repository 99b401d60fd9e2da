mod extract_cmd;
mod serve_cmd;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use textsnap_config::{config_dir, config_file_path, load_and_prepare, resolve_gateway_url};
use textsnap_logging::{init_logger, LoggingOptions};

#[derive(Parser)]
#[command(name = "textsnap")]
#[command(about = "TextSnap: pull the text out of an image through an OCR gateway")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.textsnap/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the OCR gateway
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Extract the text from one image
    Extract {
        /// JPG, JPEG, PNG or AVIF file
        image: PathBuf,
        /// Gateway base URL (overrides config)
        #[arg(short, long)]
        gateway: Option<String>,
    },
    /// Query a running gateway's health
    Status {
        /// Gateway base URL (overrides config)
        #[arg(short, long)]
        gateway: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&path).await?;

    let logging = config.logging();
    let is_server = matches!(cli.command, Commands::Serve { .. });
    init_logger(&LoggingOptions {
        // Keep one-shot commands quiet unless asked otherwise.
        level: if is_server || logging.level.is_some() {
            logging.effective_level().to_string()
        } else {
            "warn".to_string()
        },
        json: logging.json.unwrap_or(false),
        dir: logging.dir.as_ref().map(PathBuf::from),
    });

    // Loading ran before the subscriber existed. One-shot commands only
    // care about the client section.
    for warning in textsnap_config::validate(&config).warnings {
        if !is_server && !warning.path.starts_with("client") {
            continue;
        }
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }

    match cli.command {
        Commands::Serve { port } => {
            serve_cmd::run(&config, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Extract { image, gateway } => {
            let client = config.client();
            let url = gateway.unwrap_or_else(|| resolve_gateway_url(&client));
            let ok = extract_cmd::run(&image, &url, &client).await?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Status { gateway } => {
            let url = gateway.unwrap_or_else(|| resolve_gateway_url(&config.client()));
            let ok = status_cmd::run(&url).await?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}
