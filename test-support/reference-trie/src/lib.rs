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

//! Reference Ethereum trie builder, used to produce proof fixtures.
//!
//! The whole trie is built at once from a key-value set, the same way
//! `trie-root` streams a root, keeping every hashed node so proofs can be
//! extracted afterwards.

use hash_db::{decode_hash, Hasher, NodeLookup};
use memory_db::MemoryDB;
use mpt_verify::{
	compare_remaining, encode_hp, nibble_ops, Node, NodeHandle, NibbleVec, TrieLayout,
};
use rlp_view::{encode_list, encode_u64, encoded_bytes, EMPTY_STRING};
use std::{cmp, collections::BTreeMap};

/// Reference hasher is a keccak hasher.
pub type RefHasher = keccak_hasher::KeccakHasher;

/// Ethereum trie layout.
#[derive(Default, Clone)]
pub struct KeccakLayout;

impl TrieLayout for KeccakLayout {
	const MAX_DEPTH: usize = 256;
	type Hash = RefHasher;
}

/// Keccak layout with a walk bounded to a handful of nodes.
#[derive(Default, Clone)]
pub struct ShallowLayout;

impl TrieLayout for ShallowLayout {
	const MAX_DEPTH: usize = 3;
	type Hash = RefHasher;
}

fn shared_prefix_len<T: Eq>(first: &[T], second: &[T]) -> usize {
	first
		.iter()
		.zip(second.iter())
		.position(|(f, s)| f != s)
		.unwrap_or_else(|| cmp::min(first.len(), second.len()))
}

/// Reference to a child node: embedded when shorter than a hash.
fn child_reference(node: Vec<u8>, db: &mut MemoryDB<RefHasher>) -> Vec<u8> {
	if node.len() < RefHasher::LENGTH {
		node
	} else {
		let hash = db.insert(&node);
		encoded_bytes(&hash)
	}
}

fn hex_prefix(nibbles: &[u8], is_leaf: bool) -> Vec<u8> {
	encode_hp(&NibbleVec::from(nibbles), is_leaf).to_vec()
}

/// Encode the sub-trie of `input`, whose keys are unpacked nibbles sharing their
/// first `cursor` nibbles.
fn build_trie(input: &[(&[u8], &[u8])], cursor: usize, db: &mut MemoryDB<RefHasher>) -> Vec<u8> {
	match input.len() {
		0 => vec![EMPTY_STRING],
		1 => {
			let (key, value) = input[0];
			encode_list(vec![
				encoded_bytes(&hex_prefix(&key[cursor..], true)),
				encoded_bytes(value),
			])
		},
		_ => {
			let (key, value) = input[0];
			let shared_nibble_count = input
				.iter()
				.skip(1)
				.fold(key.len(), |acc, (k, _)| cmp::min(shared_prefix_len(key, k), acc));
			if shared_nibble_count > cursor {
				let child = build_trie(input, shared_nibble_count, db);
				return encode_list(vec![
					encoded_bytes(&hex_prefix(&key[cursor..shared_nibble_count], false)),
					child_reference(child, db),
				])
			}

			let value = if cursor == key.len() { Some(value) } else { None };
			let mut begin = if value.is_some() { 1 } else { 0 };
			let mut items = Vec::with_capacity(nibble_ops::NIBBLE_LENGTH + 1);
			for i in 0..nibble_ops::NIBBLE_LENGTH {
				let count = input[begin..].iter().take_while(|(k, _)| k[cursor] == i as u8).count();
				if count > 0 {
					let child = build_trie(&input[begin..begin + count], cursor + 1, db);
					items.push(child_reference(child, db));
					begin += count;
				} else {
					items.push(vec![EMPTY_STRING]);
				}
			}
			items.push(encoded_bytes(value.unwrap_or(&[])));
			encode_list(items)
		},
	}
}

/// An Ethereum trie held as its hashed nodes.
///
/// Values must not be empty: an empty branch value encodes as no value.
#[derive(Debug, Clone)]
pub struct ReferenceTrie {
	root: [u8; 32],
	db: MemoryDB<RefHasher>,
}

impl ReferenceTrie {
	/// Build the trie of a key-value set. Later duplicates of a key win.
	pub fn new<I, A, B>(input: I) -> Self
	where
		I: IntoIterator<Item = (A, B)>,
		A: AsRef<[u8]>,
		B: AsRef<[u8]>,
	{
		let mut unique = BTreeMap::new();
		for (key, value) in input {
			let nibbles: Vec<u8> =
				key.as_ref().iter().flat_map(|b| vec![b >> 4, b & 0x0f]).collect();
			unique.insert(nibbles, value.as_ref().to_vec());
		}
		let input: Vec<(&[u8], &[u8])> =
			unique.iter().map(|(k, v)| (&k[..], &v[..])).collect();

		let mut db = MemoryDB::new();
		let root_node = build_trie(&input, 0, &mut db);
		// The root is always referenced by hash.
		let root = db.insert(&root_node);
		ReferenceTrie { root, db }
	}

	/// Build the trie of a block list (transactions, receipts) keyed by the
	/// RLP encoding of each position.
	pub fn ordered<I, V>(values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: AsRef<[u8]>,
	{
		Self::new(values.into_iter().enumerate().map(|(i, v)| (index_key(i as u64), v)))
	}

	/// Build a secure trie, keys being hashed first.
	pub fn secure<I, A, B>(input: I) -> Self
	where
		I: IntoIterator<Item = (A, B)>,
		A: AsRef<[u8]>,
		B: AsRef<[u8]>,
	{
		Self::new(input.into_iter().map(|(k, v)| (RefHasher::hash(k.as_ref()), v)))
	}

	/// Root hash.
	pub fn root(&self) -> [u8; 32] {
		self.root
	}

	/// Hashed nodes of the trie, root included.
	pub fn db(&self) -> &MemoryDB<RefHasher> {
		&self.db
	}

	/// Nodes on the path of `key`, in descent order.
	///
	/// The path stops where the key leaves the trie, so the proof of an absent
	/// key is still well formed and fails to verify on the value.
	pub fn generate_proof(&self, key: &[u8]) -> Vec<Vec<u8>> {
		self.path_nodes(key, false)
	}

	/// As `generate_proof`, also listing embedded nodes after their parent.
	pub fn generate_proof_with_inline(&self, key: &[u8]) -> Vec<Vec<u8>> {
		self.path_nodes(key, true)
	}

	fn path_nodes(&self, key: &[u8], with_inline: bool) -> Vec<Vec<u8>> {
		let mut proof = Vec::new();
		let mut current = match self.db.get(&self.root) {
			Some(node) => node.to_vec(),
			None => return proof,
		};
		proof.push(current.clone());
		let key_len = nibble_ops::nibble_len(key.len());
		let mut offset = 0;
		loop {
			let next = match Node::decode(&current) {
				Ok(Node::Branch(children, _)) if offset < key_len => {
					let index = nibble_ops::left_nibble_at(key, offset);
					offset += 1;
					children[index as usize]
				},
				Ok(Node::Extension(path, child)) if compare_remaining(key, offset, &path) => {
					offset += path.len();
					Some(child)
				},
				_ => None,
			};
			let next = match next {
				Some(NodeHandle::Hash(hash)) => {
					match decode_hash::<RefHasher>(hash).and_then(|h| self.db.get(&h)) {
						Some(node) => {
							proof.push(node.to_vec());
							node.to_vec()
						},
						None => break,
					}
				},
				Some(NodeHandle::Inline(node)) => {
					if with_inline {
						proof.push(node.to_vec());
					}
					node.to_vec()
				},
				None => break,
			};
			current = next;
		}
		proof
	}
}

/// Trie key of the item at `index` of a block list.
pub fn index_key(index: u64) -> Vec<u8> {
	let mut key = Vec::new();
	encode_u64(index, &mut key);
	key
}

/// Root of the trie of a key-value set.
pub fn trie_root<I, A, B>(input: I) -> [u8; 32]
where
	I: IntoIterator<Item = (A, B)>,
	A: AsRef<[u8]>,
	B: AsRef<[u8]>,
{
	ReferenceTrie::new(input).root()
}
