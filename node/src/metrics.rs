//! Prometheus metrics for the AgeGate service.
//!
//! [`ServiceMetrics`] owns a dedicated [`Registry`] that whichever transport
//! embeds the service can encode into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

use crate::NodeError;

pub struct ServiceMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub challenges_issued: IntCounter,
    pub verifications_succeeded: IntCounter,
    pub verifications_failed: IntCounter,
    /// Majority claims created (rotations included).
    pub claims_created: IntCounter,
    /// Audit rows recorded for minors.
    pub minor_audits: IntCounter,
    pub revocations: IntCounter,
    /// Ledger calls that failed or timed out.
    pub ledger_failures: IntCounter,
    pub challenges_purged: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Challenges currently awaiting verification.
    pub pending_challenges: IntGauge,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, NodeError> {
    register_int_counter_with_registry!(Opts::new(name, help), registry)
        .map_err(|e| NodeError::Other(format!("failed to register {name}: {e}")))
}

impl ServiceMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let pending_challenges = register_int_gauge_with_registry!(
            Opts::new(
                "agegate_pending_challenges",
                "Challenges issued and not yet consumed or purged"
            ),
            registry
        )
        .map_err(|e| NodeError::Other(format!("failed to register pending_challenges: {e}")))?;

        Ok(Self {
            challenges_issued: counter(
                &registry,
                "agegate_challenges_issued_total",
                "Total authentication challenges issued",
            )?,
            verifications_succeeded: counter(
                &registry,
                "agegate_verifications_succeeded_total",
                "Total signed challenges verified",
            )?,
            verifications_failed: counter(
                &registry,
                "agegate_verifications_failed_total",
                "Total signed challenges rejected",
            )?,
            claims_created: counter(
                &registry,
                "agegate_claims_created_total",
                "Total majority claims created",
            )?,
            minor_audits: counter(
                &registry,
                "agegate_minor_audits_total",
                "Total audit rows recorded for minors",
            )?,
            revocations: counter(
                &registry,
                "agegate_revocations_total",
                "Total claims revoked",
            )?,
            ledger_failures: counter(
                &registry,
                "agegate_ledger_failures_total",
                "Total failed ledger submissions",
            )?,
            challenges_purged: counter(
                &registry,
                "agegate_challenges_purged_total",
                "Total expired challenges removed by sweeps",
            )?,
            pending_challenges,
            registry,
        })
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode_text(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| NodeError::Other(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| NodeError::Other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_text_output() {
        let metrics = ServiceMetrics::new().unwrap();
        metrics.claims_created.inc();
        metrics.pending_challenges.set(3);
        let text = metrics.encode_text().unwrap();
        assert!(text.contains("agegate_claims_created_total 1"));
        assert!(text.contains("agegate_pending_challenges 3"));
    }

    #[test]
    fn instances_do_not_share_registries() {
        let a = ServiceMetrics::new().unwrap();
        let b = ServiceMetrics::new().unwrap();
        a.revocations.inc();
        assert_eq!(b.revocations.get(), 0);
    }
}
