// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jheaps_core::compare::NaturalOrder;
use jheaps_engine::array::dary::DaryArrayHeap;
use jheaps_engine::tree::fibonacci::FibonacciHeap;
use jheaps_engine::tree::hollow::HollowHeap;
use jheaps_engine::tree::pairing::PairingHeap;
use jheaps_engine::traits::{AddressableHeap, Heap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn random_keys(n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(0xbe7c);
    (0..n).map(|_| rng.gen_range(-1.0e6..1.0e6)).collect()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    for n in SIZES {
        let keys = random_keys(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("heapify", n), &keys, |b, keys| {
            b.iter(|| {
                let heap = DaryArrayHeap::heapify(4, NaturalOrder, black_box(keys.clone()))
                    .expect("arity is valid");
                black_box(heap.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("sequential_insert", n), &keys, |b, keys| {
            b.iter(|| {
                let mut heap = DaryArrayHeap::new(4, NaturalOrder).expect("arity is valid");
                for &k in keys {
                    heap.insert(black_box(k)).expect("array heaps accept every key");
                }
                black_box(heap.len())
            })
        });
    }
    group.finish();
}

fn run_dijkstra_like<H: AddressableHeap<f64>>(mut heap: H, keys: &[f64]) -> f64 {
    let handles: Vec<_> = keys
        .iter()
        .map(|&k| heap.insert(k, 0).expect("insert"))
        .collect();
    for (i, h) in handles.iter().enumerate().step_by(3) {
        let _ = heap.decrease_key(h, h.key() - i as f64);
    }
    let mut acc = 0.0;
    while let Ok(h) = heap.delete_min() {
        acc += h.key();
    }
    acc
}

fn bench_decrease_key_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrease_key_workload");
    for n in SIZES {
        let keys = random_keys(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("fibonacci", n), &keys, |b, keys| {
            b.iter(|| black_box(run_dijkstra_like(FibonacciHeap::new(NaturalOrder), keys)))
        });
        group.bench_with_input(BenchmarkId::new("pairing", n), &keys, |b, keys| {
            b.iter(|| black_box(run_dijkstra_like(PairingHeap::new(NaturalOrder), keys)))
        });
        group.bench_with_input(BenchmarkId::new("hollow", n), &keys, |b, keys| {
            b.iter(|| black_box(run_dijkstra_like(HollowHeap::new(NaturalOrder), keys)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_construction, bench_decrease_key_workload);
criterion_main!(benches);
