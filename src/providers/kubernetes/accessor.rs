use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Pod, Secret};
use kube::api::{Api, DeleteParams, ListParams};
use kube::Client;
use log::debug;

use crate::error::Result;
use crate::providers::ResourceAccessor;
use crate::resources::{RecordResource, Selector, WorkerResource};

use super::client::connect;
use super::convert::{record_from_secret, worker_from_pod};

/// Resource accessor backed by the Kubernetes API.
///
/// Build records are `Secret`s and job workers are `Pod`s, both in a single
/// namespace.
pub struct KubernetesAccessor {
    secrets: Api<Secret>,
    pods: Api<Pod>,
    namespace: String,
}

impl KubernetesAccessor {
    /// Connects to the cluster and scopes every call to `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable kubeconfig or in-cluster configuration
    /// can be found, or if `context` does not exist.
    pub async fn connect(namespace: &str, context: Option<&str>) -> Result<Self> {
        let client = connect(context).await?;
        Ok(Self::new(client, namespace))
    }

    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            secrets: Api::namespaced(client.clone(), namespace),
            pods: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }

    fn list_params(selector: &Selector) -> ListParams {
        if selector.is_everything() {
            ListParams::default()
        } else {
            ListParams::default().labels(&selector.to_string())
        }
    }

    /// Zero grace period: resources are removed immediately.
    fn delete_params() -> DeleteParams {
        DeleteParams {
            grace_period_seconds: Some(0),
            ..DeleteParams::default()
        }
    }
}

#[async_trait]
impl ResourceAccessor for KubernetesAccessor {
    async fn list_records(&self, selector: &Selector) -> Result<Vec<RecordResource>> {
        let secrets = self.secrets.list(&Self::list_params(selector)).await?;
        debug!(
            "Listed {} secrets in {} (selector: {:?})",
            secrets.items.len(),
            self.namespace,
            selector.to_string()
        );
        Ok(secrets
            .items
            .into_iter()
            .filter_map(record_from_secret)
            .collect())
    }

    async fn list_workers(&self, selector: &Selector) -> Result<Vec<WorkerResource>> {
        let pods = self.pods.list(&Self::list_params(selector)).await?;
        debug!("Listed {} pods in {}", pods.items.len(), self.namespace);
        Ok(pods.items.into_iter().filter_map(worker_from_pod).collect())
    }

    async fn delete_record(&self, name: &str) -> Result<()> {
        self.secrets.delete(name, &Self::delete_params()).await?;
        Ok(())
    }

    async fn delete_worker(&self, name: &str) -> Result<()> {
        self.pods.delete(name, &Self::delete_params()).await?;
        Ok(())
    }
}
