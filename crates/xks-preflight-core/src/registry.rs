//! Check registry, outcomes and report rendering
//!
//! Check descriptors are immutable and registered once; the runner produces
//! a parallel outcome list rather than mutating descriptor state.

use crate::checks;
use crate::types::{CloudProvider, NodeSnapshot};

/// Identifies which predicate a [`CheckSpec`] dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckId {
    InstanceType,
    GpuAvailability,
}

/// Immutable descriptor for one preflight check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSpec {
    pub id: CheckId,
    pub name: &'static str,
    pub description: &'static str,
    pub suggested_action: &'static str,
}

/// The built-in checks, in the order they run and report.
pub const BUILTIN_CHECKS: [CheckSpec; 2] = [
    CheckSpec {
        id: CheckId::InstanceType,
        name: "instance_type",
        description: "Test if the cluster has at least one supported instance type",
        suggested_action: "Provision a cluster with at least one supported instance type",
    },
    CheckSpec {
        id: CheckId::GpuAvailability,
        name: "gpu_availability",
        description: "Test if the cluster has GPU drivers",
        suggested_action: "Provision a cluster with at least one supported GPU driver",
    },
];

pub fn builtin_checks() -> &'static [CheckSpec] {
    &BUILTIN_CHECKS
}

/// Result of running one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    Failed,
    /// The predicate faulted; the message carries the error text.
    Errored(String),
}

/// Evaluate one check against a node snapshot, containing predicate faults
/// as [`CheckOutcome::Errored`] so a later check still runs.
pub fn evaluate(spec: &CheckSpec, nodes: &[NodeSnapshot], provider: CloudProvider) -> CheckOutcome {
    let result = match spec.id {
        CheckId::InstanceType => checks::check_instance_type(nodes, provider),
        CheckId::GpuAvailability => checks::check_gpu_availability(nodes),
    };
    match result {
        Ok(true) => {
            tracing::debug!(check = spec.name, "check passed");
            CheckOutcome::Passed
        }
        Ok(false) => {
            tracing::error!(check = spec.name, "check failed");
            CheckOutcome::Failed
        }
        Err(err) => {
            tracing::error!(check = spec.name, error = %err, "check faulted");
            CheckOutcome::Errored(err.to_string())
        }
    }
}

/// Ordered check results, registration order preserved through rendering.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub entries: Vec<(CheckSpec, CheckOutcome)>,
}

impl CheckReport {
    pub fn push(&mut self, spec: CheckSpec, outcome: CheckOutcome) {
        self.entries.push((spec, outcome));
    }

    /// Render the human-readable report for stdout.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (spec, outcome) in &self.entries {
            match outcome {
                CheckOutcome::Passed => {
                    out.push_str(&format!("Check {}: PASS\n", spec.name));
                }
                CheckOutcome::Failed => {
                    out.push_str(&format!("Check {}: FAIL\n", spec.name));
                    out.push_str(&format!("    Suggested action: {}\n", spec.suggested_action));
                }
                CheckOutcome::Errored(message) => {
                    out.push_str(&format!("Check {}: ERROR ({message})\n", spec.name));
                    out.push_str(&format!("    Suggested action: {}\n", spec.suggested_action));
                }
            }
        }
        out
    }
}
