//! Preflight check predicates and cloud provider detection
//!
//! Each predicate takes a fresh node snapshot list and returns
//! `Ok(true)`/`Ok(false)` for pass/fail, or a [`CheckError`] when node data
//! is malformed enough that the predicate cannot answer at all.

use crate::sku::{GpuSku, SkuCounts};
use crate::types::{CloudProvider, NodeSnapshot};
use thiserror::Error;

/// Label key present on every AKS-managed node.
pub const AZURE_CLUSTER_LABEL: &str = "kubernetes.azure.com/cluster";

/// Legacy instance-type label. AKS still sets it alongside the
/// `node.kubernetes.io/instance-type` replacement.
pub const INSTANCE_TYPE_LABEL: &str = "beta.kubernetes.io/instance-type";

/// Label the NVIDIA GPU operator sets on nodes with GPU hardware.
pub const GPU_PRESENT_LABEL: &str = "nvidia.com/gpu.present";

/// Allocatable resource name exposed by the NVIDIA device plugin.
pub const NVIDIA_GPU_RESOURCE: &str = "nvidia.com/gpu";

/// Unexpected fault while evaluating a predicate. Distinct from a check
/// legitimately failing; the runner contains it and moves on.
#[derive(Error, Debug)]
pub enum CheckError {
    /// An allocatable quantity that should be a plain integer was not
    #[error("invalid quantity {value:?} for {resource} on node {node}")]
    InvalidQuantity {
        node: String,
        resource: &'static str,
        value: String,
    },
}

/// Classify the cluster's cloud provider from node labels.
///
/// Counts nodes carrying the Azure cluster label into a fixed bucket set and
/// returns the first bucket holding the maximum count. Buckets are ordered
/// `[none, azure, aws]`, so a cluster with no recognized label resolves to
/// [`CloudProvider::None`]. Nothing increments the aws bucket; no AWS label
/// rule is defined and detection can only yield azure or none.
pub fn detect_cloud_provider(nodes: &[NodeSnapshot]) -> CloudProvider {
    let azure = nodes
        .iter()
        .filter(|node| node.has_label(AZURE_CLUSTER_LABEL))
        .count();

    let buckets = [
        (CloudProvider::None, 0usize),
        (CloudProvider::Azure, azure),
        (CloudProvider::Aws, 0usize),
    ];

    let mut best = buckets[0];
    for bucket in &buckets[1..] {
        if bucket.1 > best.1 {
            best = *bucket;
        }
    }
    best.0
}

/// Check that the cluster has at least one node of a supported GPU SKU.
///
/// Only defined for Azure; any other provider fails outright. Unknown
/// instance-type values are skipped, not treated as faults.
pub fn check_instance_type(
    nodes: &[NodeSnapshot],
    provider: CloudProvider,
) -> Result<bool, CheckError> {
    if provider != CloudProvider::Azure {
        tracing::error!(%provider, "unsupported cloud provider");
        return Ok(false);
    }

    let mut counts = SkuCounts::new();
    for node in nodes {
        let Some(value) = node.labels.get(INSTANCE_TYPE_LABEL) else {
            continue;
        };
        match GpuSku::parse(value) {
            Some(sku) => counts.increment(sku),
            None => {
                tracing::debug!(node = %node.name, instance_type = %value, "ignoring unsupported instance type");
            }
        }
    }

    match counts.most_common() {
        Some((sku, count)) => {
            tracing::info!("at least one supported Azure instance type found");
            tracing::debug!(sku = %sku, count, "most common supported instance type");
            for (sku, count) in counts.entries() {
                tracing::debug!(sku = %sku, count, "instances by type");
            }
            Ok(true)
        }
        None => {
            tracing::error!("no supported instance type found");
            Ok(false)
        }
    }
}

/// Check that GPU drivers are live on the cluster's accelerator nodes.
///
/// Every node labeled GPU-present must expose a positive allocatable
/// `nvidia.com/gpu` quantity; the first node that does not fails the check
/// immediately. With no GPU-labeled node at all the check also fails.
pub fn check_gpu_availability(nodes: &[NodeSnapshot]) -> Result<bool, CheckError> {
    let mut other = 0usize;
    for node in nodes {
        if node.has_label(GPU_PRESENT_LABEL) {
            tracing::info!(node = %node.name, "NVIDIA GPU accelerator present");
            if !nvidia_driver_present(node)? {
                return Ok(false);
            }
        } else {
            other += 1;
        }
    }

    if other == nodes.len() {
        tracing::error!("no supported GPU drivers found");
        Ok(false)
    } else {
        tracing::info!("at least one supported GPU driver found");
        Ok(true)
    }
}

fn nvidia_driver_present(node: &NodeSnapshot) -> Result<bool, CheckError> {
    let Some(raw) = node.allocatable.get(NVIDIA_GPU_RESOURCE) else {
        tracing::warn!(
            node = %node.name,
            "no NVIDIA GPU drivers present, accelerator resource not exposed"
        );
        return Ok(false);
    };

    let count: i64 = raw.parse().map_err(|_| CheckError::InvalidQuantity {
        node: node.name.clone(),
        resource: NVIDIA_GPU_RESOURCE,
        value: raw.clone(),
    })?;

    if count > 0 {
        Ok(true)
    } else {
        tracing::warn!(
            node = %node.name,
            "no allocatable NVIDIA GPUs, drivers not present"
        );
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, labels: &[(&str, &str)], allocatable: &[(&str, &str)]) -> NodeSnapshot {
        NodeSnapshot {
            name: name.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            allocatable: allocatable
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn detect_returns_azure_with_one_labeled_node() {
        let nodes = vec![
            node("worker-0", &[(AZURE_CLUSTER_LABEL, "mc_rg_cluster")], &[]),
            node("worker-1", &[], &[]),
        ];
        assert_eq!(detect_cloud_provider(&nodes), CloudProvider::Azure);
    }

    #[test]
    fn detect_returns_none_without_recognized_labels() {
        let nodes = vec![
            node("worker-0", &[("kubernetes.io/os", "linux")], &[]),
            node("worker-1", &[("topology.kubernetes.io/zone", "eu-1a")], &[]),
        ];
        assert_eq!(detect_cloud_provider(&nodes), CloudProvider::None);
    }

    #[test]
    fn detect_returns_none_for_empty_cluster() {
        assert_eq!(detect_cloud_provider(&[]), CloudProvider::None);
    }

    #[test]
    fn detect_never_yields_aws() {
        // The aws bucket exists but has no label rule feeding it.
        let nodes = vec![node(
            "ip-10-0-0-1",
            &[("eks.amazonaws.com/nodegroup", "gpu")],
            &[],
        )];
        assert_eq!(detect_cloud_provider(&nodes), CloudProvider::None);
    }

    #[test]
    fn instance_type_passes_with_one_supported_sku() {
        let nodes = vec![
            node(
                "gpu-0",
                &[(INSTANCE_TYPE_LABEL, "Standard_NC24ads_A100_v4")],
                &[],
            ),
            node("cpu-0", &[(INSTANCE_TYPE_LABEL, "Standard_D4s_v5")], &[]),
        ];
        assert!(check_instance_type(&nodes, CloudProvider::Azure).unwrap());
    }

    #[test]
    fn instance_type_fails_for_non_azure_provider_regardless_of_labels() {
        let nodes = vec![node(
            "gpu-0",
            &[(INSTANCE_TYPE_LABEL, "Standard_NC24ads_A100_v4")],
            &[],
        )];
        assert!(!check_instance_type(&nodes, CloudProvider::Aws).unwrap());
        assert!(!check_instance_type(&nodes, CloudProvider::None).unwrap());
    }

    #[test]
    fn instance_type_ignores_unknown_skus() {
        let nodes = vec![
            node("cpu-0", &[(INSTANCE_TYPE_LABEL, "Standard_D4s_v5")], &[]),
            node("cpu-1", &[(INSTANCE_TYPE_LABEL, "m5.xlarge")], &[]),
        ];
        assert!(!check_instance_type(&nodes, CloudProvider::Azure).unwrap());
    }

    #[test]
    fn instance_type_fails_on_empty_cluster() {
        assert!(!check_instance_type(&[], CloudProvider::Azure).unwrap());
    }

    #[test]
    fn instance_type_skips_nodes_without_the_label() {
        let nodes = vec![node("worker-0", &[], &[])];
        assert!(!check_instance_type(&nodes, CloudProvider::Azure).unwrap());
    }

    #[test]
    fn gpu_check_passes_with_one_driver_backed_node() {
        let nodes = vec![
            node(
                "gpu-0",
                &[(GPU_PRESENT_LABEL, "true")],
                &[(NVIDIA_GPU_RESOURCE, "8")],
            ),
            node("cpu-0", &[], &[]),
        ];
        assert!(check_gpu_availability(&nodes).unwrap());
    }

    #[test]
    fn gpu_check_fails_when_no_node_is_gpu_labeled() {
        let nodes = vec![node("cpu-0", &[], &[]), node("cpu-1", &[], &[])];
        assert!(!check_gpu_availability(&nodes).unwrap());
    }

    #[test]
    fn gpu_check_fails_on_empty_cluster() {
        assert!(!check_gpu_availability(&[]).unwrap());
    }

    #[test]
    fn gpu_check_fails_when_labeled_node_has_zero_allocatable() {
        let nodes = vec![node(
            "gpu-0",
            &[(GPU_PRESENT_LABEL, "true")],
            &[(NVIDIA_GPU_RESOURCE, "0")],
        )];
        assert!(!check_gpu_availability(&nodes).unwrap());
    }

    #[test]
    fn gpu_check_fails_when_labeled_node_misses_the_resource() {
        let nodes = vec![node("gpu-0", &[(GPU_PRESENT_LABEL, "true")], &[])];
        assert!(!check_gpu_availability(&nodes).unwrap());
    }

    #[test]
    fn gpu_check_short_circuits_on_first_failing_node() {
        // The second node's quantity would be a fault if evaluated; getting
        // Ok(false) instead of Err proves the scan stopped at the first.
        let nodes = vec![
            node("gpu-0", &[(GPU_PRESENT_LABEL, "true")], &[]),
            node(
                "gpu-1",
                &[(GPU_PRESENT_LABEL, "true")],
                &[(NVIDIA_GPU_RESOURCE, "not-a-number")],
            ),
        ];
        assert!(!check_gpu_availability(&nodes).unwrap());
    }

    #[test]
    fn gpu_check_faults_on_malformed_quantity() {
        let nodes = vec![node(
            "gpu-0",
            &[(GPU_PRESENT_LABEL, "true")],
            &[(NVIDIA_GPU_RESOURCE, "eight")],
        )];
        let err = check_gpu_availability(&nodes).unwrap_err();
        assert!(matches!(err, CheckError::InvalidQuantity { .. }));
        assert!(err.to_string().contains("gpu-0"));
    }
}
