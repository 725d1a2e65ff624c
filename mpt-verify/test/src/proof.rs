// Copyright 2019, 2021 Parity Technologies
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

use crate::fixtures::{byte_flips, chain, puppy, random_entries};
use hash_db::Hasher;
use log::debug;
use mpt_verify::{verify_proof, Node, VerifyError};
use reference_trie::{KeccakLayout, RefHasher, ReferenceTrie, ShallowLayout};

fn init_log() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn verify(
	root: &[u8; 32],
	proof: &[Vec<u8>],
	key: &[u8],
	value: &[u8],
) -> Result<(), VerifyError<[u8; 32]>> {
	verify_proof::<KeccakLayout, _>(root, proof, key, value)
}

/// Check the proof of `key` verifies, and that altering any single byte of it
/// or of the statement does not.
fn check_soundness(trie: &ReferenceTrie, key: &[u8], value: &[u8]) {
	let root = trie.root();
	let proof = trie.generate_proof(key);
	verify(&root, &proof, key, value).unwrap();

	for i in 0..proof.len() {
		for node in byte_flips(&proof[i]) {
			let mut altered = proof.clone();
			altered[i] = node;
			assert!(verify(&root, &altered, key, value).is_err(), "node {} altered", i);
		}
	}
	for altered in byte_flips(key) {
		assert!(verify(&root, &proof, &altered, value).is_err(), "key altered");
	}
	for altered in byte_flips(value) {
		assert!(verify(&root, &proof, key, &altered).is_err(), "value altered");
	}
}

#[test]
fn genuine_proofs_accept() {
	init_log();
	let trie = ReferenceTrie::new(puppy());
	for (key, value) in puppy() {
		let proof = trie.generate_proof(key);
		debug!("proof of {:?}: {} nodes", key, proof.len());
		assert_eq!(verify(&trie.root(), &proof, key, value), Ok(()));
	}
}

#[test]
fn single_byte_alterations_reject() {
	init_log();
	let trie = ReferenceTrie::new(puppy());
	for (key, value) in puppy() {
		check_soundness(&trie, key, value);
	}
	let trie = ReferenceTrie::new(chain());
	for (key, value) in chain() {
		check_soundness(&trie, &key, &value);
	}
}

#[test]
fn random_secure_trie() {
	init_log();
	let entries = random_entries(42, 200);
	let trie = ReferenceTrie::new(entries.clone());
	for (key, value) in entries.iter() {
		let proof = trie.generate_proof(key);
		assert_eq!(verify(&trie.root(), &proof, key, value), Ok(()));
	}
	for (key, value) in entries.iter().take(5) {
		check_soundness(&trie, key, value);
	}
}

#[test]
fn secure_keys() {
	let trie = ReferenceTrie::secure(puppy());
	for (key, value) in puppy() {
		let hashed = RefHasher::hash(key);
		let proof = trie.generate_proof(&hashed);
		assert_eq!(verify(&trie.root(), &proof, &hashed, value), Ok(()));
		assert!(verify(&trie.root(), &proof, key, value).is_err());
	}
}

#[test]
fn root_is_leaf() {
	let trie = ReferenceTrie::new(vec![(b"key", b"value")]);
	let proof = trie.generate_proof(b"key");
	assert_eq!(proof.len(), 1);
	assert!(matches!(Node::decode(&proof[0]), Ok(Node::Leaf(..))));
	assert_eq!(verify(&trie.root(), &proof, b"key", b"value"), Ok(()));
	assert_eq!(
		verify(&trie.root(), &proof, b"kez", b"value"),
		Err(VerifyError::PathMismatch(b"kez".to_vec())),
	);
	assert_eq!(
		verify(&trie.root(), &proof, b"key", b"other"),
		Err(VerifyError::ValueMismatch(b"key".to_vec())),
	);
}

#[test]
fn full_branch() {
	// Sixteen children and a value held by the root branch.
	let mut entries: Vec<(Vec<u8>, Vec<u8>)> =
		(0..16u8).map(|i| (vec![i << 4], vec![b'v', i])).collect();
	entries.push((vec![], b"root value".to_vec()));
	let trie = ReferenceTrie::new(entries.clone());

	let proof = trie.generate_proof(&[]);
	assert_eq!(proof.len(), 1);
	match Node::decode(&proof[0]).unwrap() {
		Node::Branch(children, value) => {
			assert!(children.iter().all(Option::is_some));
			assert_eq!(value, Some(&b"root value"[..]));
		},
		other => panic!("unexpected root {:?}", other),
	}
	for (key, value) in entries {
		let proof = trie.generate_proof(&key);
		assert_eq!(verify(&trie.root(), &proof, &key, &value), Ok(()));
	}
}

#[test]
fn early_exhaustion() {
	let trie = ReferenceTrie::new(chain());
	let (key, value) = chain().pop().unwrap();
	let proof = trie.generate_proof(&key);
	assert!(proof.len() > 2);
	for len in 0..proof.len() {
		assert_eq!(
			verify(&trie.root(), &proof[..len], &key, &value),
			Err(VerifyError::IncompleteProof),
		);
	}
}

#[test]
fn trailing_and_reordered_nodes() {
	let trie = ReferenceTrie::new(chain());
	let (key, value) = chain().pop().unwrap();
	let proof = trie.generate_proof(&key);

	// Nodes past the value are never read.
	let mut extended = proof.clone();
	extended.push(proof[0].clone());
	extended.push(vec![0xc0]);
	assert_eq!(verify(&trie.root(), &extended, &key, &value), Ok(()));
	let mut wrong_value = value.clone();
	wrong_value.push(0);
	assert_eq!(
		verify(&trie.root(), &extended, &key, &wrong_value),
		Err(VerifyError::ValueMismatch(key.clone())),
	);

	let mut reordered = proof.clone();
	reordered.swap(1, 2);
	assert_eq!(
		verify(&trie.root(), &reordered, &key, &value),
		Err(VerifyError::HashMismatch(RefHasher::hash(&proof[2]))),
	);

	// A proof of another key is rejected.
	let (other_key, _) = chain().remove(0);
	let other = trie.generate_proof(&other_key);
	assert!(verify(&trie.root(), &other, &key, &value).is_err());
}

#[test]
fn embedded_copies_accepted() {
	let trie = ReferenceTrie::new(puppy());
	for (key, value) in puppy() {
		let proof = trie.generate_proof_with_inline(key);
		assert_eq!(verify(&trie.root(), &proof, key, value), Ok(()));
	}
}

#[test]
fn depth_is_bounded() {
	let trie = ReferenceTrie::new(chain());
	let (short_key, short_value) = chain().remove(0);
	let proof = trie.generate_proof(&short_key);
	assert_eq!(
		verify_proof::<ShallowLayout, _>(&trie.root(), &proof, &short_key, &short_value),
		Ok(()),
	);

	let (key, value) = chain().pop().unwrap();
	let proof = trie.generate_proof(&key);
	assert_eq!(
		verify_proof::<ShallowLayout, _>(&trie.root(), &proof, &key, &value),
		Err(VerifyError::DepthLimitExceeded(3)),
	);
	assert_eq!(verify(&trie.root(), &proof, &key, &value), Ok(()));
}

#[test]
fn absent_key() {
	let trie = ReferenceTrie::new(puppy());
	let proof = trie.generate_proof(b"dogs");
	assert!(verify(&trie.root(), &proof, b"dogs", b"puppy").is_err());
	let proof = trie.generate_proof(b"cat");
	assert!(verify(&trie.root(), &proof, b"cat", b"meow").is_err());
}
