//! Error types for the Kubernetes adapter

use thiserror::Error;

/// Errors from the cluster session. All of them are fatal to a preflight
/// run; the binary maps them to exit code 1.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// Kubeconfig file missing or unparseable
    #[error("Failed to read kubeconfig: {0}")]
    KubeconfigRead(String),

    /// Client could not be built from the resolved config
    #[error("Failed to create Kubernetes client: {0}")]
    ClientCreate(String),

    /// API server did not answer the connect-time probe
    #[error("Kubernetes API unreachable: {0}")]
    Unreachable(String),

    /// Node listing failed mid-run
    #[error("Failed to list cluster nodes: {0}")]
    NodeList(String),
}
