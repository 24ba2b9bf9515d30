use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use log::debug;

use crate::error::{Result, VacuumError};

/// Builds a Kubernetes client.
///
/// Without a context this follows the usual discovery order (`KUBECONFIG`,
/// `~/.kube/config`, then the in-cluster service account). With a context the
/// kubeconfig is loaded explicitly and that context is selected.
pub(super) async fn connect(context: Option<&str>) -> Result<Client> {
    let Some(context) = context else {
        debug!("Connecting with the default Kubernetes configuration");
        return Ok(Client::try_default().await?);
    };

    debug!("Connecting with kubeconfig context {context}");
    let options = KubeConfigOptions {
        context: Some(context.to_string()),
        ..KubeConfigOptions::default()
    };

    let config = Config::from_kubeconfig(&options).await.map_err(|e| {
        VacuumError::Config(format!("Failed to load kubeconfig context {context}: {e}"))
    })?;

    Ok(Client::try_from(config)?)
}
