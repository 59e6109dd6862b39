//! Command-line interface for packing and unpacking ICO files.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::extract::ExportFormat;

#[derive(Parser)]
#[command(name = "favicon", version)]
#[command(about = "A command line tool for creating favicons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a folder of PNGs into a favicon.ico file
    Pack {
        /// Folder to collect PNG files from (recursively)
        folder: PathBuf,

        /// ICO file to create
        output: PathBuf,

        /// Store images larger than 256 pixels with a dimension byte of 0
        /// instead of failing
        #[arg(long)]
        clamp: bool,
    },

    /// Unpack the images stored inside a favicon
    Unpack {
        /// ICO file to unpack
        ico: PathBuf,

        /// How to write the extracted payloads
        #[arg(short, long, value_enum, default_value_t = FormatArg::Png)]
        format: FormatArg,

        /// Reject files whose type field is not icon (1) or cursor (2)
        #[arg(long)]
        strict_type: bool,
    },

    /// List the images stored inside a favicon
    List {
        /// ICO file to inspect
        ico: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    /// Raw payloads, always named .png
    Png,
    /// Payloads wrapped in a bitmap file header, named .bmp
    Bmp,
    /// .bmp for bitmap-looking payloads, .png for the rest
    Auto,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> ExportFormat {
        match arg {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Bmp => ExportFormat::Bitmap,
            FormatArg::Auto => ExportFormat::Auto,
        }
    }
}

/// Runs the favicon CLI.
pub fn run_cli() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Pack { folder, output, clamp } => {
            commands::pack(&folder, &output, clamp)
        }
        Commands::Unpack { ico, format, strict_type } => {
            commands::unpack(&ico, format.into(), strict_type)
        }
        Commands::List { ico } => commands::list(&ico),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, FormatArg};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unpack_defaults_to_png() {
        let cli = Cli::parse_from(["favicon", "unpack", "favicon.ico"]);
        match cli.command {
            Commands::Unpack { format, strict_type, .. } => {
                assert!(matches!(format, FormatArg::Png));
                assert!(!strict_type);
            }
            _ => panic!("expected unpack"),
        }
    }

    #[test]
    fn pack_takes_folder_and_output() {
        let cli =
            Cli::parse_from(["favicon", "pack", "icons", "out.ico", "--clamp"]);
        match cli.command {
            Commands::Pack { folder, output, clamp } => {
                assert_eq!(folder.to_str(), Some("icons"));
                assert_eq!(output.to_str(), Some("out.ico"));
                assert!(clamp);
            }
            _ => panic!("expected pack"),
        }
    }
}
