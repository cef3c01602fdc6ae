//! Top-level error type for running the renderer.

use thiserror::Error;

use crate::{config::ConfigError, grid::GridError, host::HostError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Host(#[from] HostError),
}
