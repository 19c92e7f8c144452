//! raster - inspect and convert raster images
//!
//! Thin front end over the raster-io codec registry.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "raster")]
#[command(author, version, about = "Inspect and convert BMP, TGA, PNG and JPEG images")]
#[command(long_about = "
Inspect and convert raster images. The codec is chosen from the file
extension through the codec registry.

Examples:
  raster info image.bmp                 # Show image info
  raster convert input.bmp output.tga   # Convert formats
  raster convert in.tga out.jpg -q 95   # JPEG with quality
  raster codecs                         # List registered codecs
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Convert image format
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// List registered codecs
    Codecs,
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

/// Arguments for the `convert` command.
#[derive(Args)]
struct ConvertArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    output: PathBuf,

    /// Quality (1-100, for JPEG output)
    #[arg(short = 'q', long)]
    quality: Option<u8>,
}

/// Installs the stderr subscriber. `RUST_LOG` directives refine the level set by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Codecs => commands::codecs::run(),
    }
}
