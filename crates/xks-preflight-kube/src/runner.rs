//! Check runner
//!
//! Runs the registered checks strictly in registration order, one at a
//! time. Each check sees a fresh node listing; a transport failure aborts
//! the run, a predicate fault is contained to its own entry.

use crate::client::list_node_snapshots;
use crate::error::ConnectError;
use kube::Client;
use xks_preflight_core::{CheckReport, CheckSpec, CloudProvider, evaluate};

/// Execute `specs` against the cluster and collect the ordered report.
///
/// The provider must already be concrete; `auto` resolution happens before
/// any check runs.
pub async fn run_checks(
    client: &Client,
    provider: CloudProvider,
    specs: &[CheckSpec],
) -> Result<CheckReport, ConnectError> {
    let mut report = CheckReport::default();
    for spec in specs {
        tracing::debug!(check = spec.name, description = spec.description, "running check");
        let nodes = list_node_snapshots(client).await?;
        let outcome = evaluate(spec, &nodes, provider);
        report.push(*spec, outcome);
    }
    Ok(report)
}
