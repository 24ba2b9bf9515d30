use thiserror::Error;

use crate::resources::ResourceKind;

#[derive(Error, Debug)]
pub enum VacuumError {
    #[error("Failed to list {kind}s (selector: {selector:?}): {source}")]
    List {
        kind: ResourceKind,
        selector: String,
        #[source]
        source: Box<VacuumError>,
    },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VacuumError>;
