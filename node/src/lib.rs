//! AgeGate service node.
//!
//! Wires the authentication, claim lifecycle, storage and ledger crates into
//! a single [`AgeGateService`]:
//! - Loads and validates [`NodeConfig`] from TOML
//! - Exposes typed request/response operations for any transport
//! - Records Prometheus metrics and structured tracing spans
//! - Sweeps expired challenges and idle row locks on request

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod service;
pub mod tracing_spans;

pub use config::{LedgerConfig, NodeConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::ServiceMetrics;
pub use service::{
    AgeGateService, ChallengeResponse, CreateClaimRequest, CreateClaimResponse, ErrorKind,
    ErrorResponse, RevokeResponse, ServiceError, StatusResponse, SweepReport, VerifyRequest,
    VerifyResponse, LEDGER_FAILURE_MESSAGE,
};
