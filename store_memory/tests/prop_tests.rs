use proptest::prelude::*;

use agegate_store::{ClaimKey, ClaimStore, NewClaim};
use agegate_store_memory::MemoryClaimStore;
use agegate_types::{ClaimId, ClaimType, Timestamp, WalletPubkey};

#[derive(Clone, Debug)]
enum Op {
    Rotate { wallet: u8 },
    AbandonedRotate { wallet: u8 },
    Audit { wallet: u8 },
    Revoke { id: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..3).prop_map(|wallet| Op::Rotate { wallet }),
        (0u8..3).prop_map(|wallet| Op::AbandonedRotate { wallet }),
        (0u8..3).prop_map(|wallet| Op::Audit { wallet }),
        (1u64..40).prop_map(|id| Op::Revoke { id }),
    ]
}

fn key(wallet: u8) -> ClaimKey {
    let pubkey = WalletPubkey::parse(&format!("01{}", format!("{wallet:02x}").repeat(32))).unwrap();
    ClaimKey::new(pubkey, ClaimType::AgeOver18)
}

fn claim(key: &ClaimKey, revoked: bool) -> NewClaim {
    NewClaim {
        wallet_pubkey: key.wallet.clone(),
        user_hash: "h".into(),
        claim_type: key.claim_type,
        age: if revoked { 15 } else { 30 },
        is_major: !revoked,
        valid_from: Timestamp::new(0),
        valid_until: Timestamp::new(10),
        revoked,
        session_id: None,
        created_at: Timestamp::new(0),
    }
}

proptest! {
    /// No sequence of operations leaves more than one non-revoked row per key,
    /// and rows are never removed.
    #[test]
    fn at_most_one_active_row_per_key(ops in prop::collection::vec(op(), 1..40)) {
        let store = MemoryClaimStore::new();
        let mut expected_rows = 0usize;

        for op in ops {
            match op {
                Op::Rotate { wallet } => {
                    let k = key(wallet);
                    let mut txn = store.begin_active(&k).unwrap();
                    txn.revoke_all();
                    txn.insert(claim(&k, false)).unwrap();
                    txn.commit().unwrap();
                    expected_rows += 1;
                }
                Op::AbandonedRotate { wallet } => {
                    let k = key(wallet);
                    let mut txn = store.begin_active(&k).unwrap();
                    txn.revoke_all();
                    txn.insert(claim(&k, false)).unwrap();
                }
                Op::Audit { wallet } => {
                    store.insert_audit(claim(&key(wallet), true)).unwrap();
                    expected_rows += 1;
                }
                Op::Revoke { id } => {
                    let _ = store.mark_revoked(ClaimId(id), None);
                }
            }

            prop_assert_eq!(store.row_count(), expected_rows);
            for wallet in 0..3 {
                let active = store
                    .history(&key(wallet))
                    .unwrap()
                    .iter()
                    .filter(|r| !r.revoked)
                    .count();
                prop_assert!(active <= 1);
            }
        }
    }
}
