use clap::{Parser, Subcommand};
use image_ingest::config::{self, ConfigError, DEFAULT_CONFIG_FILE};
use image_ingest::fault::{Fault, FaultStatus};
use image_ingest::ingest::{IngestError, ImageService};
use image_ingest::store::{SqliteStore, StoreError};
use image_ingest::types::{CreateImageSetRequest, SetId};
use image_ingest::{output, view};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "image-ingest")]
#[command(about = "Ingest named image sets with thumbnails into a local store")]
#[command(long_about = "\
Ingest named image sets with thumbnails into a local store

Each set is committed whole or not at all: every file must decode, then
dimensions are resolved (caller values win, decoded size fills the gaps),
a JPEG thumbnail is generated, and the set is stored in one transaction.

Metadata file for `create` (JSON):

  {
    \"imageSetName\": \"test-album\",
    \"images\": [
      { \"imgName\": \"test-image.jpg\",
        \"dimensions\": { \"width\": 100, \"height\": 50, \"aspectRatio\": 2.0 } },
      { \"imgName\": \"second.png\" }
    ]
  }

Files are paired with `images` entries by position.

Run 'image-ingest gen-config' to generate a documented image-ingest.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// SQLite database (overrides store.path from the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a new image set
    Create {
        /// JSON file with the set name and per-image metadata
        #[arg(long)]
        metadata: PathBuf,
        /// Image files, in the same order as the metadata entries
        files: Vec<PathBuf>,
        /// Print the full view as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Show a stored set, thumbnails included
    Show {
        id: i64,
        /// Print JSON (thumbnails base64-encoded)
        #[arg(long)]
        json: bool,
    },
    /// Show a stored set without thumbnails
    Metadata {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Delete a set and all of its images
    Delete { id: i64 },
    /// Health check
    Ping,
    /// Print a stock image-ingest.toml with all options documented
    GenConfig,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid metadata: {0}")]
    Metadata(serde_json::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl CliError {
    fn to_fault(&self) -> Fault {
        let now = chrono::Utc::now();
        match self {
            CliError::Ingest(err) => Fault::from_error(err, now),
            CliError::Config(_) | CliError::Read { .. } | CliError::Metadata(_) => {
                Fault::new(FaultStatus::Client, self.to_string(), now)
            }
            CliError::Store(_) | CliError::Json(_) => {
                tracing::error!(error = %self, "unexpected failure");
                Fault::new(FaultStatus::Server, image_ingest::fault::GENERIC_SERVER_MESSAGE, now)
            }
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let fault = err.to_fault();
            match serde_json::to_string(&fault) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{fault}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Ping => {
            println!("Status: Healthy");
            return Ok(());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        _ => {}
    }

    let config = config::load_config(&cli.config)?;
    init_thread_pool(&config.processing);

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.store.path));
    let service = ImageService::new(SqliteStore::open(&db_path)?, &config);

    match cli.command {
        Command::Create {
            metadata,
            files,
            json,
        } => {
            let request: CreateImageSetRequest =
                serde_json::from_str(&read_to_string(&metadata)?).map_err(CliError::Metadata)?;
            let payloads = files
                .iter()
                .map(|path| read_bytes(path))
                .collect::<Result<Vec<_>, _>>()?;

            let set = service.create_image_set(&request, &payloads)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view::full_view(&set))?);
            } else {
                output::print_metadata(&view::metadata_view(&set));
            }
        }
        Command::Show { id, json } => {
            let set = service.get_image_set(SetId(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                output::print_image_set(&set);
            }
        }
        Command::Metadata { id, json } => {
            let set = service.get_image_set_metadata(SetId(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                output::print_metadata(&set);
            }
        }
        Command::Delete { id } => {
            service.delete_image_set(SetId(id))?;
            println!("Deleted image set {id}");
        }
        Command::Ping | Command::GenConfig => {}
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn read_to_string(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
