//! framecheck CLI: compare table files and inspect the harness environment.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;

use framecheck_assert::{equals, AssertError, CompareOptions, Value};
use framecheck_core::config::HarnessConfig;
use framecheck_harness::{logging, search_artifact, HarnessError};
use framecheck_io::FileSource;

#[derive(Parser)]
#[command(name = "framecheck")]
#[command(about = "Structural table comparison and test-harness utilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two CSV / JSON-lines files as frames
    Diff {
        /// Expected table
        #[arg(short, long)]
        left: PathBuf,

        /// Actual table
        #[arg(short, long)]
        right: PathBuf,

        /// Compare numbers to 7 decimal places, ignoring row labels
        #[arg(long, conflicts_with = "loose")]
        almost: bool,

        /// Compare numbers with a relative tolerance
        #[arg(long)]
        loose: bool,
    },

    /// Find a project's built jar under the build home
    Locate {
        /// Project directory relative to the build home
        #[arg(short, long)]
        project: String,

        /// Jar name prefix in the sbt layout
        #[arg(long)]
        sbt_prefix: String,

        /// Jar name prefix in the maven layout
        #[arg(long)]
        mvn_prefix: String,

        /// Build home (overrides FRAMECHECK_HOME / SPARK_HOME)
        #[arg(long)]
        home: Option<PathBuf>,
    },

    /// Print the resolved harness configuration as JSON
    Config,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Io(#[from] framecheck_io::error::Error),
    #[error(transparent)]
    Assert(#[from] AssertError),
    #[error(transparent)]
    Harness(#[from] HarnessError),
    #[error(transparent)]
    Core(#[from] framecheck_core::error::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Diff {
            left,
            right,
            almost,
            loose,
        } => diff(&left, &right, options(almost, loose)),
        Commands::Locate {
            project,
            sbt_prefix,
            mvn_prefix,
            home,
        } => locate(&project, &sbt_prefix, &mvn_prefix, home),
        Commands::Config => print_config(),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        if let CliError::Core(core) = &e {
            for hint in core.suggestions() {
                eprintln!("  hint: {}", hint);
            }
        }
        process::exit(1);
    }
}

fn options(almost: bool, loose: bool) -> CompareOptions {
    if almost {
        CompareOptions::almost()
    } else if loose {
        CompareOptions::loose()
    } else {
        CompareOptions::exact()
    }
}

/// Exit status 0 when equal; a mismatch prints the diagnostic and exits 1.
fn diff(left: &Path, right: &Path, options: CompareOptions) -> Result<(), CliError> {
    let l = Value::deferred(FileSource::open(left)?);
    let r = Value::deferred(FileSource::open(right)?);
    tracing::debug!(left = %left.display(), right = %right.display(), ?options, "diffing files");
    match equals(&l, &r, options) {
        Ok(()) => {
            println!("✓ {} and {} are equal", left.display(), right.display());
            Ok(())
        }
        Err(AssertError::Materialize(e)) => Err(CliError::Core(e)),
        Err(mismatch) => {
            println!("{}", mismatch);
            process::exit(1);
        }
    }
}

fn locate(
    project: &str,
    sbt_prefix: &str,
    mvn_prefix: &str,
    home: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut config = HarnessConfig::from_env();
    if let Some(home) = home {
        config = config.with_home(home);
    }
    let home = config.require_home()?;
    match search_artifact(home, project, sbt_prefix, mvn_prefix)? {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("no artifact found for {} under {}", project, home.display());
            process::exit(1);
        }
    }
    Ok(())
}

fn print_config() -> Result<(), CliError> {
    let config = HarnessConfig::from_env();
    config.validate()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
