// Copyright 2017, 2021 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memory_db::MemoryDB;
use mpt_verify::{verify_multi_proof, verify_proof, NibbleSlice};
use mpt_verify_test::fixtures::random_entries;
use reference_trie::{KeccakLayout, RefHasher, ReferenceTrie};

criterion_group!(benches, nibble_common_prefix, proof_verification, multi_proof_verification);
criterion_main!(benches);

fn nibble_common_prefix(c: &mut Criterion) {
	let entries = random_entries(11, 255);
	c.bench_function("nibble_common_prefix", move |b| {
		let mixed: Vec<_> = entries
			.iter()
			.zip(entries.iter().rev())
			.map(|(left, right)| (NibbleSlice::new(&left.0), NibbleSlice::new(&right.0)))
			.collect();

		b.iter(|| {
			for (left, right) in mixed.iter() {
				let _ = black_box(left.common_prefix(right));
			}
		})
	});
}

fn proof_verification(c: &mut Criterion) {
	let mut group = c.benchmark_group("verify_proof");
	for count in [100usize, 1_000, 10_000] {
		let entries = random_entries(29, count);
		let trie = ReferenceTrie::new(entries.clone());
		let root = trie.root();
		let proofs: Vec<_> = entries
			.iter()
			.take(100)
			.map(|(key, value)| (key.clone(), value.clone(), trie.generate_proof(key)))
			.collect();
		group.bench_with_input(BenchmarkId::from_parameter(count), &proofs, |b, proofs| {
			b.iter(|| {
				for (key, value, proof) in proofs.iter() {
					let result = verify_proof::<KeccakLayout, _>(&root, proof, key, value);
					assert!(black_box(result).is_ok());
				}
			})
		});
	}
	group.finish();
}

fn multi_proof_verification(c: &mut Criterion) {
	let mut group = c.benchmark_group("verify_multi_proof");
	let entries = random_entries(31, 10_000);
	let trie = ReferenceTrie::new(entries.clone());
	let root = trie.root();
	for count in [10usize, 100] {
		let items: Vec<_> = entries.iter().take(count).cloned().collect();
		let db: MemoryDB<RefHasher> =
			items.iter().flat_map(|(key, _)| trie.generate_proof(key)).collect();
		group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
			b.iter(|| {
				let items = items.iter().cloned();
				let result = verify_multi_proof::<KeccakLayout, _, _, _, _>(&root, &db, items);
				assert!(black_box(result).is_ok());
			})
		});
	}
	group.finish();
}
