//! `nodepack`: convert workflow payloads between JSON, MessagePack and XML.
//!
//! Logging goes to stderr; set `NODEPACK_LOG` (e.g. `debug`) to change the
//! level from the default `warn`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nodepack::cli::{self, CliError};
use nodepack::{Config, Converter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nodepack", about = "JSON / MessagePack / XML payload conversion")]
struct Cli {
    /// TOML file with `[limits]` and `[resolver]` settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// JSON → MessagePack
    Pack {
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// MessagePack → indented JSON
    Unpack {
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// MessagePack → XML
    Xml {
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the structure of a MessagePack payload
    Inspect {
        input: Option<PathBuf>,
        /// Describe only the mapping stored under this key.
        #[arg(long)]
        key: Option<String>,
    },
    /// Decode base64 text and write the bytes to a file
    SaveBase64 {
        input: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("NODEPACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), CliError> {
    let args = Cli::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let converter = Converter::new(config.codec_options());

    match args.command {
        Commands::Pack { input, out } => {
            let bytes = cli::pack(&cli::read_input(input.as_deref())?, &converter)?;
            cli::write_output(out.as_deref(), &bytes)
        }
        Commands::Unpack { input, out } => {
            let json = cli::unpack(&cli::read_input(input.as_deref())?, &converter)?;
            cli::write_output(out.as_deref(), (json + "\n").as_bytes())
        }
        Commands::Xml { input, out } => {
            let xml = cli::xml(&cli::read_input(input.as_deref())?, &converter)?;
            cli::write_output(out.as_deref(), (xml + "\n").as_bytes())
        }
        Commands::Inspect { input, key } => {
            let dump = cli::inspect(
                &cli::read_input(input.as_deref())?,
                &converter,
                key.as_deref(),
            )?;
            cli::write_output(None, dump.as_bytes())
        }
        Commands::SaveBase64 { input, out } => {
            let written = cli::save_base64(&cli::read_input(input.as_deref())?, &out)?;
            eprintln!("saved {written} bytes to {}", out.display());
            Ok(())
        }
    }
}
