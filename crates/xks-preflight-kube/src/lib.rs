//! Kubernetes adapter for xks-preflight
//!
//! Owns the cluster session: connecting with ambient or explicit
//! kubeconfig, projecting nodes into core snapshots, and running the
//! registered checks against fresh node lists.

pub mod client;
pub mod error;
pub mod runner;

pub use client::{connect, detect, list_node_snapshots};
pub use error::ConnectError;
pub use runner::run_checks;
