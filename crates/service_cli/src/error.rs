//! CLI error type.

use adapter_loader::LoaderError;
use infra_config::ConfigError;
use thiserror::Error;
use xsec_core::types::{ArchiveError, GridError, XsecError};
use xsec_sampling::SamplingError;

/// Any failure of a pipeline command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration: {0}")]
    Config(#[from] ConfigError),

    /// Input table could not be parsed
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// A pipeline stage failed
    #[error(transparent)]
    Pipeline(#[from] XsecError),

    /// Event sampling failed
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    /// Archive access failed
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Invalid grid or numeric setting
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Filesystem error outside the archive
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
