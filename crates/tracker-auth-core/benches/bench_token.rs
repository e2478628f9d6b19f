//! Benchmarks for token issue and verify hot paths

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use tracker_auth_core::{extract_bearer, HmacKey, TokenIssuer, TokenVerifier};
use tracker_types::{Role, UserId};

fn key() -> HmacKey {
    HmacKey::new("benchmark-signing-key-benchmark-signing").unwrap()
}

fn bench_hmac_operations(c: &mut Criterion) {
    let key = key();
    let data_sizes = [32, 128, 512];

    let mut group = c.benchmark_group("hmac_sign");

    for size in data_sizes {
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| key.sign(black_box(data)));
        });
    }

    group.finish();
}

fn bench_token_roundtrip(c: &mut Criterion) {
    let issuer = TokenIssuer::new(key(), Duration::from_secs(3600));
    let verifier = TokenVerifier::new(key());
    let now = Utc::now();
    let token = issuer.issue(UserId::new(), Role::Developer, now).unwrap().token;
    let header = format!("Bearer {token}");

    let mut group = c.benchmark_group("token");

    group.bench_function("issue", |b| {
        b.iter(|| issuer.issue(black_box(UserId::new()), Role::Admin, now));
    });

    group.bench_function("verify", |b| {
        b.iter(|| verifier.verify(black_box(&token), now));
    });

    group.bench_function("verify_bearer", |b| {
        b.iter(|| verifier.verify_bearer(black_box(Some(header.as_str())), now));
    });

    group.bench_function("reject_tampered", |b| {
        let tampered = format!("{token}x");
        b.iter(|| verifier.verify(black_box(&tampered), now));
    });

    group.finish();
}

fn bench_extract_bearer(c: &mut Criterion) {
    c.bench_function("extract_bearer", |b| {
        b.iter(|| extract_bearer(black_box(Some("Bearer abc.def"))));
    });
}

criterion_group!(
    benches,
    bench_hmac_operations,
    bench_token_roundtrip,
    bench_extract_bearer
);
criterion_main!(benches);
