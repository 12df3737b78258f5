//! The AgeGate request façade.
//!
//! [`AgeGateService`] exposes every external operation as a typed call over
//! serde DTOs. Transports (HTTP, RPC, tests) embed it and map
//! [`ServiceError::status_code`] onto their own status space.
//!
//! Mutating claim operations take the wallet from the bearer credential
//! subject; a wallet in the request body is ignored.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, Instrument};

use agegate_auth::{AuthError, ChallengeStore, Scope, TokenIssuer, WalletAuthenticator};
use agegate_claims::{birth_date_from_parts, ClaimError, ClaimLifecycleManager, ClaimStatus};
use agegate_crypto::UserHasher;
use agegate_ledger::{ClaimParams, HttpLedgerClient, LedgerClient, TimeoutLedger};
use agegate_store::ClaimStore;
use agegate_store_memory::MemoryClaimStore;
use agegate_types::{ClaimType, Clock, TypesError, WalletPubkey};

use crate::config::NodeConfig;
use crate::metrics::ServiceMetrics;
use crate::tracing_spans::{challenge_span, claim_span, sweep_span, verify_span};
use crate::NodeError;

/// Message returned to callers whenever the ledger step fails. Details go to
/// the operator log only.
pub const LEDGER_FAILURE_MESSAGE: &str = "ledger submission failed";

// ── DTOs ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub challenge_id: String,
    pub wallet_pubkey: String,
    pub message_to_sign: String,
    /// RFC 3339, UTC.
    pub expires_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub wallet_pubkey: String,
    pub challenge_id: String,
    pub signature_hex: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub ok: bool,
    pub wallet_pubkey: String,
    pub token: String,
    pub expires_in_seconds: u64,
}

/// Times are unix seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub wallet_pubkey: String,
    pub has_proof: bool,
    pub is_major: bool,
    pub revoked: bool,
    pub valid_from: Option<u64>,
    pub valid_until: Option<u64>,
    pub deploy_hash: Option<String>,
}

impl StatusResponse {
    fn new(wallet: &WalletPubkey, status: ClaimStatus) -> Self {
        Self {
            wallet_pubkey: wallet.to_string(),
            has_proof: status.has_proof,
            is_major: status.is_major,
            revoked: status.revoked,
            valid_from: status.valid_from.map(|t| t.as_secs()),
            valid_until: status.valid_until.map(|t| t.as_secs()),
            deploy_hash: status.submission_hash.map(String::from),
        }
    }
}

/// Birthdate fields are consumed and discarded; only the majority flag and
/// computed age are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Ignored; the credential subject is authoritative.
    #[serde(default)]
    pub wallet_pubkey: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimResponse {
    pub is_major: bool,
    pub claim_created: bool,
    pub deploy_hash: Option<String>,
    pub claim_params: ClaimParams,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeResponse {
    pub wallet_pubkey: String,
    pub claim_type: ClaimType,
    pub had_proof: bool,
    pub revoked: bool,
    pub deploy_hash: Option<String>,
    pub valid_from: Option<u64>,
    pub valid_until: Option<u64>,
}

/// Result of one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub challenges_purged: usize,
    pub locks_released: usize,
}

// ── Errors ─────────────────────────────────────────────────────────────

/// Error classes callers can act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authentication,
    NotFound,
    Ledger,
    Internal,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    NotFound(String),

    #[error("ledger submission failed")]
    Ledger,

    #[error("internal error")]
    Internal(String),
}

/// Serialized form of a [`ServiceError`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub kind: ErrorKind,
    pub error: String,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Ledger => ErrorKind::Ledger,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Authentication => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::Ledger => 502,
            ErrorKind::Internal => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            ok: false,
            kind: self.kind(),
            error: self.to_string(),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidFormat(_) => Self::Validation(e.to_string()),
            AuthError::Internal(detail) => Self::Internal(detail),
            other => Self::Authentication(other.to_string()),
        }
    }
}

impl From<ClaimError> for ServiceError {
    fn from(e: ClaimError) -> Self {
        match e {
            ClaimError::Validation(msg) => Self::Validation(msg),
            ClaimError::NotFound(msg) => Self::NotFound(msg),
            ClaimError::Anchoring { claim_id, source } => {
                error!(claim = %claim_id, error = %source, "ledger anchoring failed");
                Self::Ledger
            }
            ClaimError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<TypesError> for ServiceError {
    fn from(e: TypesError) -> Self {
        Self::Validation(e.to_string())
    }
}

// ── Service ────────────────────────────────────────────────────────────

pub struct AgeGateService {
    auth: WalletAuthenticator,
    claims: ClaimLifecycleManager,
    metrics: Arc<ServiceMetrics>,
}

impl AgeGateService {
    pub fn new(
        auth: WalletAuthenticator,
        claims: ClaimLifecycleManager,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            auth,
            claims,
            metrics,
        }
    }

    /// Build a service from configuration with the in-memory store and the
    /// HTTP ledger gateway.
    pub fn from_config(config: &NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        let ledger = TimeoutLedger::new(
            HttpLedgerClient::new(&config.ledger.endpoint),
            Duration::from_secs(config.ledger.timeout_secs),
        );
        Self::with_parts(
            config,
            clock,
            Arc::new(MemoryClaimStore::new()),
            Arc::new(ledger),
        )
    }

    /// Build a service from configuration around the given store and ledger.
    pub fn with_parts(
        config: &NodeConfig,
        clock: Arc<dyn Clock>,
        store: Arc<dyn ClaimStore>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Result<Self, NodeError> {
        config.validate()?;

        let challenges = ChallengeStore::new(clock.clone(), config.challenge_ttl_secs);
        let tokens = match config.token_secret_bytes()? {
            Some(secret) => TokenIssuer::new(&secret, config.token_ttl_secs, clock.clone()),
            None => TokenIssuer::with_random_secret(config.token_ttl_secs, clock.clone()),
        };
        let claims = ClaimLifecycleManager::new(
            store,
            ledger,
            UserHasher::new(config.user_hash_salt.clone()),
            clock,
        )
        .with_validity_years(config.claim_validity_years);

        Ok(Self::new(
            WalletAuthenticator::new(challenges, tokens),
            claims,
            Arc::new(ServiceMetrics::new()?),
        ))
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn issue_challenge(&self, wallet_pubkey: &str) -> Result<ChallengeResponse, ServiceError> {
        let _span = challenge_span(wallet_pubkey).entered();
        let issued = self.auth.issue_challenge(wallet_pubkey)?;
        self.metrics.challenges_issued.inc();
        self.refresh_pending_gauge();

        Ok(ChallengeResponse {
            challenge_id: issued.challenge_id,
            wallet_pubkey: issued.wallet_pubkey.to_string(),
            message_to_sign: issued.message,
            expires_at: issued.expires_at.to_rfc3339(),
        })
    }

    pub fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, ServiceError> {
        let _span = verify_span(&request.wallet_pubkey, &request.challenge_id).entered();
        let result = self.auth.verify(
            &request.wallet_pubkey,
            &request.challenge_id,
            &request.signature_hex,
        );
        self.refresh_pending_gauge();

        match result {
            Ok(session) => {
                self.metrics.verifications_succeeded.inc();
                Ok(VerifyResponse {
                    ok: true,
                    wallet_pubkey: session.wallet_pubkey.to_string(),
                    token: session.token,
                    expires_in_seconds: session.expires_in_secs,
                })
            }
            Err(e) => {
                self.metrics.verifications_failed.inc();
                Err(e.into())
            }
        }
    }

    /// Public status lookup; needs no credential.
    pub fn status(
        &self,
        wallet_pubkey: &str,
        claim_type: Option<&str>,
    ) -> Result<StatusResponse, ServiceError> {
        let wallet = WalletPubkey::parse(wallet_pubkey)?;
        let claim_type = parse_claim_type(claim_type)?;
        let _span = claim_span("status", wallet.as_str()).entered();

        let status = self.claims.get_status(&wallet, claim_type)?;
        Ok(StatusResponse::new(&wallet, status))
    }

    pub async fn create_claim(
        &self,
        bearer: &str,
        request: &CreateClaimRequest,
    ) -> Result<CreateClaimResponse, ServiceError> {
        let wallet = self.authorize(bearer, Scope::CreateClaim)?;
        if let Some(body_wallet) = &request.wallet_pubkey {
            if WalletPubkey::parse(body_wallet).ok().as_ref() != Some(&wallet) {
                debug!(wallet = %wallet, "ignoring wallet in request body");
            }
        }
        let birth_date = birth_date_from_parts(request.day, request.month, request.year)?;

        let result = self
            .claims
            .create_if_major(&wallet, birth_date, request.session_id.as_deref())
            .instrument(claim_span("create", wallet.as_str()))
            .await;

        match result {
            Ok(outcome) => {
                if outcome.claim_created {
                    self.metrics.claims_created.inc();
                } else {
                    self.metrics.minor_audits.inc();
                }
                Ok(CreateClaimResponse {
                    is_major: outcome.is_major,
                    claim_created: outcome.claim_created,
                    deploy_hash: outcome.submission_hash.map(String::from),
                    claim_params: outcome.claim_params,
                })
            }
            Err(e) => Err(self.claim_error(e)),
        }
    }

    pub async fn revoke(
        &self,
        bearer: &str,
        claim_type: Option<&str>,
    ) -> Result<RevokeResponse, ServiceError> {
        let wallet = self.authorize(bearer, Scope::RevokeClaim)?;
        let claim_type = parse_claim_type(claim_type)?;

        let result = self
            .claims
            .revoke(&wallet, claim_type)
            .instrument(claim_span("revoke", wallet.as_str()))
            .await;

        match result {
            Ok(outcome) => {
                self.metrics.revocations.inc();
                Ok(RevokeResponse {
                    wallet_pubkey: wallet.to_string(),
                    claim_type,
                    had_proof: outcome.had_proof,
                    revoked: outcome.revoked,
                    deploy_hash: outcome.submission_hash.map(String::from),
                    valid_from: outcome.valid_from.map(|t| t.as_secs()),
                    valid_until: outcome.valid_until.map(|t| t.as_secs()),
                })
            }
            Err(e) => Err(self.claim_error(e)),
        }
    }

    /// Retry ledger submission for the caller's active claim.
    pub async fn anchor_pending(
        &self,
        bearer: &str,
        claim_type: Option<&str>,
    ) -> Result<StatusResponse, ServiceError> {
        let wallet = self.authorize(bearer, Scope::CreateClaim)?;
        let claim_type = parse_claim_type(claim_type)?;

        self.claims
            .anchor_pending(&wallet, claim_type)
            .instrument(claim_span("anchor", wallet.as_str()))
            .await
            .map_err(|e| self.claim_error(e))?;

        let status = self.claims.get_status(&wallet, claim_type)?;
        Ok(StatusResponse::new(&wallet, status))
    }

    /// Drop expired challenges and idle row locks.
    pub fn sweep(&self) -> SweepReport {
        let _span = sweep_span().entered();
        let report = SweepReport {
            challenges_purged: self.auth.challenges().purge_expired(),
            locks_released: self.claims.cleanup_locks(),
        };
        self.metrics
            .challenges_purged
            .inc_by(report.challenges_purged as u64);
        self.refresh_pending_gauge();
        if report.challenges_purged > 0 || report.locks_released > 0 {
            debug!(
                challenges = report.challenges_purged,
                locks = report.locks_released,
                "sweep complete"
            );
        }
        report
    }

    fn authorize(&self, bearer: &str, scope: Scope) -> Result<WalletPubkey, ServiceError> {
        let token = bearer
            .trim()
            .strip_prefix("Bearer ")
            .unwrap_or(bearer)
            .trim();
        if token.is_empty() {
            return Err(ServiceError::Authentication(
                "missing bearer credential".into(),
            ));
        }
        Ok(self.auth.authorize(token, scope)?.sub)
    }

    fn claim_error(&self, e: ClaimError) -> ServiceError {
        if matches!(e, ClaimError::Anchoring { .. }) {
            self.metrics.ledger_failures.inc();
        }
        e.into()
    }

    fn refresh_pending_gauge(&self) {
        let pending = self.auth.challenges().len();
        self.metrics
            .pending_challenges
            .set(i64::try_from(pending).unwrap_or(i64::MAX));
    }
}

fn parse_claim_type(raw: Option<&str>) -> Result<ClaimType, ServiceError> {
    match raw {
        None => Ok(ClaimType::default()),
        Some(s) => Ok(s.parse()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(ServiceError::Validation("x".into()).status_code(), 400);
        assert_eq!(ServiceError::Authentication("x".into()).status_code(), 401);
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ServiceError::Ledger.status_code(), 502);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn auth_errors_map_to_classes() {
        let e: ServiceError = AuthError::InvalidFormat("bad".into()).into();
        assert_eq!(e.kind(), ErrorKind::Validation);
        let e: ServiceError = AuthError::InvalidSignature.into();
        assert_eq!(e.kind(), ErrorKind::Authentication);
        let e: ServiceError = AuthError::TokenExpired.into();
        assert_eq!(e.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn ledger_error_message_is_generic() {
        let e: ServiceError = ClaimError::Anchoring {
            claim_id: agegate_types::ClaimId(7),
            source: agegate_ledger::LedgerError::Unreachable("10.0.0.5 refused".into()),
        }
        .into();
        let body = e.to_response();
        assert_eq!(body.kind, ErrorKind::Ledger);
        assert_eq!(body.error, LEDGER_FAILURE_MESSAGE);
        assert!(!body.error.contains("10.0.0.5"));
    }

    #[test]
    fn internal_error_hides_detail() {
        let e = ServiceError::Internal("mutex poisoned at row 4".into());
        assert_eq!(e.to_response().error, "internal error");
    }

    #[test]
    fn unsupported_claim_type_is_validation() {
        assert!(matches!(
            parse_claim_type(Some("age_over_21")),
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(parse_claim_type(None).unwrap(), ClaimType::AgeOver18);
    }

    #[test]
    fn create_request_accepts_camel_case() {
        let req: CreateClaimRequest = serde_json::from_str(
            r#"{"day":1,"month":1,"year":2000,"sessionId":"s1","walletPubkey":"01ab"}"#,
        )
        .unwrap();
        assert_eq!(req.session_id.as_deref(), Some("s1"));
        let req: CreateClaimRequest =
            serde_json::from_str(r#"{"day":1,"month":1,"year":2000}"#).unwrap();
        assert!(req.session_id.is_none());
    }
}
