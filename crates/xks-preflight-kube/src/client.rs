//! Cluster session: connect, probe, list nodes
//!
//! Connection failures of any flavor collapse into [`ConnectError`]; the
//! caller treats them as fatal.

use crate::error::ConnectError;
use k8s_openapi::api::core::v1::Node;
use kube::{
    Client, Config,
    api::{Api, ListParams},
    config::{KubeConfigOptions, Kubeconfig},
};
use std::path::Path;
use xks_preflight_core::{CloudProvider, NodeSnapshot, detect_cloud_provider};

/// Connect to the cluster.
///
/// An explicit kubeconfig path wins; otherwise discovery is ambient
/// (`KUBECONFIG`, the default file location, or in-cluster service
/// account). The API server is probed once so an unreachable cluster
/// fails here instead of at the first node listing.
pub async fn connect(kubeconfig: Option<&Path>) -> Result<Client, ConnectError> {
    let client = match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .map_err(|e| ConnectError::KubeconfigRead(e.to_string()))?;
            let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| ConnectError::ClientCreate(e.to_string()))?;
            Client::try_from(config).map_err(|e| ConnectError::ClientCreate(e.to_string()))?
        }
        None => Client::try_default()
            .await
            .map_err(|e| ConnectError::ClientCreate(e.to_string()))?,
    };

    let version = client
        .apiserver_version()
        .await
        .map_err(|e| ConnectError::Unreachable(e.to_string()))?;
    tracing::debug!(major = %version.major, minor = %version.minor, "API server reachable");

    Ok(client)
}

/// List all cluster nodes as core snapshots. Issued fresh by detection and
/// by every check; results are never cached across calls.
pub async fn list_node_snapshots(client: &Client) -> Result<Vec<NodeSnapshot>, ConnectError> {
    let nodes: Api<Node> = Api::all(client.clone());
    let list = nodes
        .list(&ListParams::default())
        .await
        .map_err(|e| ConnectError::NodeList(e.to_string()))?;

    tracing::debug!(count = list.items.len(), "listed cluster nodes");
    Ok(list.items.into_iter().map(snapshot_from_node).collect())
}

/// Detect the cluster's cloud provider from a fresh node listing.
pub async fn detect(client: &Client) -> Result<CloudProvider, ConnectError> {
    let nodes = list_node_snapshots(client).await?;
    Ok(detect_cloud_provider(&nodes))
}

fn snapshot_from_node(node: Node) -> NodeSnapshot {
    let name = node.metadata.name.unwrap_or_default();
    let labels = node.metadata.labels.unwrap_or_default();
    let allocatable = node
        .status
        .and_then(|status| status.allocatable)
        .map(|quantities| {
            quantities
                .into_iter()
                .map(|(resource, quantity)| (resource, quantity.0))
                .collect()
        })
        .unwrap_or_default();

    NodeSnapshot {
        name,
        labels,
        allocatable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::NodeStatus;
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use kube::api::ObjectMeta;
    use std::collections::BTreeMap;

    fn api_node(
        name: &str,
        labels: &[(&str, &str)],
        allocatable: &[(&str, &str)],
    ) -> Node {
        let labels: BTreeMap<String, String> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let allocatable: BTreeMap<String, Quantity> = allocatable
            .iter()
            .map(|(k, v)| (k.to_string(), Quantity(v.to_string())))
            .collect();

        Node {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(labels),
                ..Default::default()
            },
            status: Some(NodeStatus {
                allocatable: Some(allocatable),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn snapshot_projects_name_labels_and_allocatable() {
        let node = api_node(
            "aks-gpu-0",
            &[("nvidia.com/gpu.present", "true")],
            &[("nvidia.com/gpu", "8"), ("cpu", "96")],
        );
        let snapshot = snapshot_from_node(node);

        assert_eq!(snapshot.name, "aks-gpu-0");
        assert_eq!(
            snapshot.labels.get("nvidia.com/gpu.present"),
            Some(&"true".to_string())
        );
        assert_eq!(
            snapshot.allocatable.get("nvidia.com/gpu"),
            Some(&"8".to_string())
        );
    }

    #[test]
    fn snapshot_defaults_missing_metadata() {
        let snapshot = snapshot_from_node(Node::default());
        assert_eq!(snapshot.name, "");
        assert!(snapshot.labels.is_empty());
        assert!(snapshot.allocatable.is_empty());
    }

    #[tokio::test]
    async fn connect_with_missing_kubeconfig_is_a_read_error() {
        let err = match connect(Some(Path::new("/nonexistent/kubeconfig"))).await {
            Ok(_) => panic!("expected connect to fail"),
            Err(err) => err,
        };
        assert!(matches!(err, ConnectError::KubeconfigRead(_)));
    }
}
