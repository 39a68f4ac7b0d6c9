//! # Quorum-Chain Ledger Benchmarks
//!
//! | Operation | Cost driver |
//! |-----------|-------------|
//! | qc-02 `hash_block` | JSON rendering of the transaction list |
//! | qc-02 `verify_chain` | one recomputed digest per block |
//! | shared-crypto `verify` | secp256k1 ECDSA on every AddTransaction |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_02_ledger::{create_transaction, generate_transaction_id, hash_block, Ledger};
use shared_crypto::NodeIdentity;
use shared_types::{Amount, Digest, NodeAddress, Transaction};
use std::time::Duration;

fn addr(port: u16) -> NodeAddress {
    NodeAddress::parse(&format!("http://localhost:{}", port)).unwrap()
}

fn signed_transactions(identity: &NodeIdentity, count: usize) -> Vec<Transaction> {
    (0..count)
        .map(|i| {
            let id = generate_transaction_id();
            let amount = Amount::from(i as u64);
            let signature = identity.sign_transaction_payload(&addr(3002), &amount, &id);
            create_transaction(identity.address().clone(), addr(3002), amount, signature, id)
        })
        .collect()
}

// ============================================================================
// QC-02: Block Digest
// ============================================================================

fn bench_hash_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-02-hash-block");
    group.measurement_time(Duration::from_secs(5));

    let identity = NodeIdentity::generate(addr(3001));
    let previous = Digest::genesis();

    for size in [0usize, 10, 100, 1000] {
        let transactions = signed_transactions(&identity, size);
        group.throughput(Throughput::Elements(size.max(1) as u64));
        group.bench_with_input(BenchmarkId::new("transactions", size), &transactions, |b, txs| {
            b.iter(|| black_box(hash_block(2, &previous, txs).unwrap()))
        });
    }

    group.finish();
}

// ============================================================================
// QC-02: Chain Verification
// ============================================================================

fn bench_verify_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-02-verify-chain");
    group.measurement_time(Duration::from_secs(5));

    let identity = NodeIdentity::generate(addr(3001));

    for blocks in [10usize, 100] {
        let mut ledger = Ledger::new();
        for _ in 0..blocks {
            for tx in signed_transactions(&identity, 5) {
                ledger.add_pending_transaction(tx).unwrap();
            }
            let block = ledger.build_candidate_block().unwrap();
            ledger.append_block(block);
        }

        group.bench_with_input(BenchmarkId::new("blocks", blocks), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.verify_chain().is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// Signature Verification
// ============================================================================

fn bench_transaction_signature(c: &mut Criterion) {
    let identity = NodeIdentity::generate(addr(3001));
    let tx = signed_transactions(&identity, 1).remove(0);
    let payload = tx.signing_payload();
    let public_key = identity.export_public_key().to_string();

    c.bench_function("ecdsa_verify_transaction", |b| {
        b.iter(|| black_box(shared_crypto::verify(&payload, &tx.signature, &public_key)))
    });
}

criterion_group!(
    benches,
    bench_hash_block,
    bench_verify_chain,
    bench_transaction_signature
);
criterion_main!(benches);
