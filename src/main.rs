use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Apply the settings a CouchDB setup script would have made over HTTP
/// directly to the node's INI file.
#[derive(Debug, Parser)]
#[command(name = "inimerge", version, about)]
struct Cli {
    /// Setup script to scan for `curl ... /_config/...` calls.
    #[arg(long, default_value = "couchdb-setup.sh")]
    script: PathBuf,

    /// INI config file to update in place.
    #[arg(long, default_value = "/opt/couchdb/etc/local.ini")]
    config: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("Reading settings from {}", cli.script.display());
    println!("Updating {}", cli.config.display());

    match inimerge::reconcile(&cli.script, &cli.config) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // A failed run must halt the container start, so exit non-zero.
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
