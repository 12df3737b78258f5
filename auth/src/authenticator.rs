//! Ties challenges, signature verification and credential minting together.

use std::sync::Arc;

use agegate_crypto::verify_signature;
use agegate_types::{Clock, WalletPubkey};
use tracing::{debug, warn};

use crate::challenge::{ChallengeStore, IssuedChallenge};
use crate::token::{Scope, TokenClaims, TokenIssuer};
use crate::AuthError;

/// Result of a successful wallet verification.
#[derive(Clone, Debug)]
pub struct WalletSession {
    pub wallet_pubkey: WalletPubkey,
    pub token: String,
    pub expires_in_secs: u64,
}

pub struct WalletAuthenticator {
    challenges: ChallengeStore,
    tokens: TokenIssuer,
}

impl WalletAuthenticator {
    pub fn new(challenges: ChallengeStore, tokens: TokenIssuer) -> Self {
        Self { challenges, tokens }
    }

    /// Authenticator with default TTLs and a per-process random token key.
    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            ChallengeStore::new(clock.clone(), crate::DEFAULT_CHALLENGE_TTL_SECS),
            TokenIssuer::with_random_secret(crate::DEFAULT_TOKEN_TTL_SECS, clock),
        )
    }

    pub fn challenges(&self) -> &ChallengeStore {
        &self.challenges
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn issue_challenge(&self, wallet_pubkey: &str) -> Result<IssuedChallenge, AuthError> {
        self.challenges.issue(wallet_pubkey)
    }

    /// Verify a signed challenge and mint a credential for the wallet.
    ///
    /// The challenge is consumed only after the signature checks out, so a
    /// bad signature leaves it usable until its TTL. Among concurrent callers
    /// presenting valid signatures exactly one wins the consume.
    pub fn verify(
        &self,
        wallet_pubkey: &str,
        challenge_id: &str,
        signature_hex: &str,
    ) -> Result<WalletSession, AuthError> {
        let wallet = WalletPubkey::parse(wallet_pubkey)
            .map_err(|e| AuthError::InvalidFormat(e.to_string()))?;

        let message = self.challenges.peek(challenge_id, &wallet)?;

        if !verify_signature(wallet.as_str(), message.as_bytes(), signature_hex)? {
            warn!(wallet = %wallet, challenge = %challenge_id, "wallet signature rejected");
            return Err(AuthError::InvalidSignature);
        }

        self.challenges.consume(challenge_id, &wallet)?;

        let issued = self.tokens.issue(&wallet)?;
        debug!(wallet = %wallet, "wallet authenticated");

        Ok(WalletSession {
            wallet_pubkey: wallet,
            token: issued.token,
            expires_in_secs: issued.expires_in_secs,
        })
    }

    /// Resolve a bearer credential to its claims if it grants `scope`.
    pub fn authorize(&self, token: &str, scope: Scope) -> Result<TokenClaims, AuthError> {
        self.tokens.verify(token, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agegate_crypto::{sign_message_hex, WalletKeypair};
    use agegate_nullables::NullClock;
    use agegate_types::KeyAlgorithm;

    fn authenticator() -> (Arc<NullClock>, WalletAuthenticator) {
        let clock = Arc::new(NullClock::new(1_717_200_000));
        (clock.clone(), WalletAuthenticator::with_defaults(clock))
    }

    #[test]
    fn full_flow_for_both_algorithms() {
        let (_, auth) = authenticator();
        for algorithm in [KeyAlgorithm::Ed25519, KeyAlgorithm::Secp256k1] {
            let kp = WalletKeypair::generate(algorithm);
            let challenge = auth.issue_challenge(kp.public().as_str()).unwrap();
            let sig = sign_message_hex(&kp, challenge.message.as_bytes(), true);

            let session = auth
                .verify(kp.public().as_str(), &challenge.challenge_id, &sig)
                .unwrap();
            assert_eq!(session.wallet_pubkey, kp.public());
            assert_eq!(session.expires_in_secs, 300);

            let claims = auth.authorize(&session.token, Scope::CreateClaim).unwrap();
            assert_eq!(claims.sub, kp.public());
        }
    }

    #[test]
    fn challenge_cannot_be_replayed() {
        let (_, auth) = authenticator();
        let kp = WalletKeypair::generate(KeyAlgorithm::Ed25519);
        let challenge = auth.issue_challenge(kp.public().as_str()).unwrap();
        let sig = sign_message_hex(&kp, challenge.message.as_bytes(), false);

        auth.verify(kp.public().as_str(), &challenge.challenge_id, &sig)
            .unwrap();
        let replay = auth.verify(kp.public().as_str(), &challenge.challenge_id, &sig);
        assert!(matches!(replay, Err(AuthError::UnknownOrExpired)));
    }

    #[test]
    fn bad_signature_leaves_challenge_usable() {
        let (_, auth) = authenticator();
        let kp = WalletKeypair::generate(KeyAlgorithm::Secp256k1);
        let challenge = auth.issue_challenge(kp.public().as_str()).unwrap();

        let wrong = sign_message_hex(&kp, b"something else", false);
        assert!(matches!(
            auth.verify(kp.public().as_str(), &challenge.challenge_id, &wrong),
            Err(AuthError::InvalidSignature)
        ));

        let good = sign_message_hex(&kp, challenge.message.as_bytes(), false);
        assert!(auth
            .verify(kp.public().as_str(), &challenge.challenge_id, &good)
            .is_ok());
    }

    #[test]
    fn other_wallet_cannot_use_challenge() {
        let (_, auth) = authenticator();
        let owner = WalletKeypair::generate(KeyAlgorithm::Ed25519);
        let thief = WalletKeypair::generate(KeyAlgorithm::Ed25519);
        let challenge = auth.issue_challenge(owner.public().as_str()).unwrap();
        let sig = sign_message_hex(&thief, challenge.message.as_bytes(), false);

        assert!(matches!(
            auth.verify(thief.public().as_str(), &challenge.challenge_id, &sig),
            Err(AuthError::WalletMismatch)
        ));
    }

    #[test]
    fn expired_challenge_with_valid_signature_fails() {
        let (clock, auth) = authenticator();
        let kp = WalletKeypair::generate(KeyAlgorithm::Ed25519);
        let challenge = auth.issue_challenge(kp.public().as_str()).unwrap();
        let sig = sign_message_hex(&kp, challenge.message.as_bytes(), false);

        clock.advance(301);
        assert!(matches!(
            auth.verify(kp.public().as_str(), &challenge.challenge_id, &sig),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn malformed_wallet_is_validation_error() {
        let (_, auth) = authenticator();
        let err = auth.verify("xyz", "00", "00").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn concurrent_verifies_issue_one_token() {
        let (_, auth) = authenticator();
        let auth = Arc::new(auth);
        let kp = WalletKeypair::generate(KeyAlgorithm::Ed25519);
        let challenge = auth.issue_challenge(kp.public().as_str()).unwrap();
        let sig = sign_message_hex(&kp, challenge.message.as_bytes(), false);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let auth = Arc::clone(&auth);
                let wallet = kp.public().to_string();
                let id = challenge.challenge_id.clone();
                let sig = sig.clone();
                std::thread::spawn(move || auth.verify(&wallet, &id, &sig).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
    }
}
