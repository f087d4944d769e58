//! Library crate for host-scan-rs exposing reusable modules.
pub mod error;
pub mod logger;
pub mod probe;
pub mod scanner;
pub mod sink;
pub mod types;
pub mod validate;

pub use error::ScanError;
pub use types::{PortOutcome, ScanRequest, ValidTarget};
