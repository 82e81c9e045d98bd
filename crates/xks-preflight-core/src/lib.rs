//! Core check logic for xks-preflight
//!
//! Pure functions over in-memory node snapshots. Everything in this crate
//! is synchronous and cluster-free; the kube adapter crate feeds it data.

pub mod checks;
pub mod registry;
pub mod sku;
pub mod types;

pub use checks::{CheckError, check_gpu_availability, check_instance_type, detect_cloud_provider};
pub use registry::{CheckId, CheckOutcome, CheckReport, CheckSpec, builtin_checks, evaluate};
pub use sku::{GpuSku, SkuCounts};
pub use types::{CloudProvider, NodeSnapshot};
