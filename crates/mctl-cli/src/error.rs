use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    ArgumentParse(#[from] clap::Error),
    #[error("file name is required")]
    MissingFileName,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Manifest(#[from] mctl_engine::ManifestError),
    #[error(transparent)]
    Engine(#[from] mctl_engine::EngineError),
}
