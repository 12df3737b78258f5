use agegate_crypto::{sign_message, verify_signature, UserHasher, WalletKeypair};
use agegate_types::KeyAlgorithm;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const CHALLENGE: &[u8] = b"AgeGate wallet authentication\npurpose: agegate-wallet-auth-v1\nwallet: 01\nnonce: 00\nissued_at: 0";

fn ed25519_verify_bench(c: &mut Criterion) {
    let kp = WalletKeypair::generate(KeyAlgorithm::Ed25519);
    let pk = kp.public();
    let sig = hex::encode(sign_message(&kp, CHALLENGE, false));

    c.bench_function("ed25519_verify_challenge", |b| {
        b.iter(|| verify_signature(black_box(pk.as_str()), black_box(CHALLENGE), &sig))
    });
}

fn secp256k1_verify_bench(c: &mut Criterion) {
    let kp = WalletKeypair::generate(KeyAlgorithm::Secp256k1);
    let pk = kp.public();
    let sig = hex::encode(sign_message(&kp, CHALLENGE, false));

    c.bench_function("secp256k1_verify_challenge", |b| {
        b.iter(|| verify_signature(black_box(pk.as_str()), black_box(CHALLENGE), &sig))
    });
}

fn banner_fallback_bench(c: &mut Criterion) {
    // Worst case: the raw attempt fails and the banner-wrapped one succeeds.
    let kp = WalletKeypair::generate(KeyAlgorithm::Secp256k1);
    let pk = kp.public();
    let sig = hex::encode(sign_message(&kp, CHALLENGE, true));

    c.bench_function("secp256k1_verify_banner_fallback", |b| {
        b.iter(|| verify_signature(black_box(pk.as_str()), black_box(CHALLENGE), &sig))
    });
}

fn user_hash_bench(c: &mut Criterion) {
    let hasher = UserHasher::new("bench-salt");
    let wallet = format!("01{}", "ab".repeat(32));

    c.bench_function("user_hash", |b| {
        b.iter(|| hasher.compute_user_hash(black_box(&wallet)))
    });
}

criterion_group!(
    benches,
    ed25519_verify_bench,
    secp256k1_verify_bench,
    banner_fallback_bench,
    user_hash_bench,
);
criterion_main!(benches);
