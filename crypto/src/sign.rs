//! Message signing the way wallet software does it.

use ed25519_dalek::Signer as _;
use k256::ecdsa::signature::Signer as _;
use k256::ecdsa::Signature as Secp256k1Signature;

use crate::keys::WalletKeypair;
use crate::verify::WALLET_SIGNING_BANNER;

/// Sign a message, optionally wrapped in the wallet banner first.
///
/// secp256k1 signatures are ECDSA over `SHA-256(message)`, low-S, `r || s`.
pub fn sign_message(keypair: &WalletKeypair, message: &[u8], wrap_banner: bool) -> Vec<u8> {
    let payload = if wrap_banner {
        let mut wrapped = WALLET_SIGNING_BANNER.as_bytes().to_vec();
        wrapped.extend_from_slice(message);
        wrapped
    } else {
        message.to_vec()
    };

    match keypair {
        WalletKeypair::Ed25519(sk) => sk.sign(&payload).to_bytes().to_vec(),
        WalletKeypair::Secp256k1(sk) => {
            let sig: Secp256k1Signature = sk.sign(&payload);
            sig.to_bytes().to_vec()
        }
    }
}

/// [`sign_message`], hex-encoded.
pub fn sign_message_hex(keypair: &WalletKeypair, message: &[u8], wrap_banner: bool) -> String {
    hex::encode(sign_message(keypair, message, wrap_banner))
}
