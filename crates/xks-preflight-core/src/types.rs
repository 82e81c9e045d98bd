//! Domain types for xks-preflight
//!
//! These types represent the subset of cluster state the checks read.

use std::collections::BTreeMap;

/// Projection of a cluster node: the labels and allocatable resources the
/// checks classify on. Built fresh from every node-list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub name: String,
    /// Node labels, key to value.
    pub labels: BTreeMap<String, String>,
    /// Allocatable resources, resource name to quantity string as reported
    /// by the API (e.g. "nvidia.com/gpu" -> "8").
    pub allocatable: BTreeMap<String, String>,
}

impl NodeSnapshot {
    pub fn has_label(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }
}

/// Cloud provider a cluster runs on, as resolved from node labels or an
/// explicit override. Always concrete by the time checks execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudProvider {
    Azure,
    /// Defined for parity with the detection bucket set, but no label rule
    /// ever produces it; detection resolves to Azure or None only.
    Aws,
    None,
}

impl std::fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloudProvider::Azure => write!(f, "azure"),
            CloudProvider::Aws => write!(f, "aws"),
            CloudProvider::None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_display_is_lowercase() {
        assert_eq!(CloudProvider::Azure.to_string(), "azure");
        assert_eq!(CloudProvider::Aws.to_string(), "aws");
        assert_eq!(CloudProvider::None.to_string(), "none");
    }

    #[test]
    fn has_label_checks_key_only() {
        let mut node = NodeSnapshot::default();
        node.labels
            .insert("kubernetes.azure.com/cluster".to_string(), String::new());
        assert!(node.has_label("kubernetes.azure.com/cluster"));
        assert!(!node.has_label("nvidia.com/gpu.present"));
    }
}
