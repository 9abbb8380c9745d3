use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use vhostgen::AppError;

#[derive(Parser)]
#[command(name = "vhostgen")]
#[command(version)]
#[command(
    about = "Regenerate webserver vhost configuration from hosting-account domain records",
    long_about = None
)]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, default_value = "/etc/vhostgen/settings.toml")]
    config: PathBuf,
    /// Path to the exported domain batch file
    #[arg(short, long, default_value = "/etc/vhostgen/batch.toml")]
    batch: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write all config files and reload the PHP layer and webserver
    #[clap(visible_alias = "r")]
    Rebuild {
        /// Write files but skip the reload commands
        #[arg(long)]
        no_reload: bool,
    },
    /// Show what a rebuild would produce, without writing anything
    #[clap(visible_alias = "c")]
    Check,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Rebuild { no_reload } => {
            vhostgen::rebuild(&cli.config, &cli.batch, no_reload).map(|_| ())
        }
        Commands::Check => vhostgen::check(&cli.config, &cli.batch),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        exit(1);
    }
}
