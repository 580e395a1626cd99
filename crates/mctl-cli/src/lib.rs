// Target-specific transitive dependency split (TLS stack) is accepted for now.
#![allow(clippy::multiple_crate_versions)]

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use mctl_client::HttpRemote;
use mctl_engine::{Mode, load_manifest, run_manifest};
use mctl_resources::ResourceRegistry;
use tracing::debug;

mod config;
mod error;
mod logging;

pub use config::{ConfigError, Overrides, resolve_client_settings};
pub use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "mctl",
    version,
    about = "Apply or delete declarative resource manifests"
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionFlags,
    /// Log level (error, warn, info, debug, trace); `RUST_LOG` takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Args)]
struct ConnectionFlags {
    /// Base URL of the management API
    #[arg(long, global = true, env = "MCTL_ENDPOINT")]
    endpoint: Option<String>,
    /// Bearer token sent with every request
    #[arg(long, global = true, env = "MCTL_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Config file (defaults to mctl/config.yaml in the user config directory)
    #[arg(long, global = true, env = "MCTL_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or update every resource in a manifest, in file order
    Apply(ManifestArgs),
    /// Delete every resource in a manifest, in file order
    Delete(ManifestArgs),
}

#[derive(Debug, Args)]
struct ManifestArgs {
    /// Manifest file holding one or more documents separated by `---`
    file: Option<PathBuf>,
    /// Parse the manifest and list what would be done without calling the API
    #[arg(long)]
    dry_run: bool,
}

impl From<ConnectionFlags> for Overrides {
    fn from(value: ConnectionFlags) -> Self {
        Self {
            endpoint: value.endpoint,
            token: value.token,
            config: value.config,
        }
    }
}

/// Run the CLI using process arguments.
///
/// # Errors
///
/// Returns an error when argument parsing fails (excluding help/version),
/// configuration is incomplete, or the manifest fails to parse or execute.
pub fn run() -> std::result::Result<i32, CliError> {
    run_from(std::env::args_os())
}

fn run_from<I, T>(args: I) -> std::result::Result<i32, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(error.into()),
        },
    };
    logging::init(&cli.log_level);

    let (mode, manifest) = match cli.command {
        Commands::Apply(manifest) => (Mode::Apply, manifest),
        Commands::Delete(manifest) => (Mode::Delete, manifest),
    };
    let Some(file) = manifest.file else {
        return Err(CliError::MissingFileName);
    };
    let registry = ResourceRegistry::builtin();

    if manifest.dry_run {
        let resources = load_manifest(&file, &registry)?;
        for resource in &resources {
            println!("would {mode} {}/{}", resource.kind(), resource.name());
        }
        return Ok(0);
    }

    let settings = resolve_client_settings(cli.connection.into())?;
    debug!(endpoint = %settings.endpoint, "resolved API endpoint");
    let remote = HttpRemote::new(settings);
    run_manifest(&file, mode, &registry, &remote)?;
    Ok(0)
}
