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

//! Verification of inclusion proofs.
//!
//! A proof is walked from the trusted root one node at a time, following the
//! nibbles of the key. Every node reached through a hash reference must hash
//! to that reference; nodes embedded in their parent are trusted by virtue of
//! the parent being hashed. Two node sources are supported: an ordered list
//! consumed strictly in descent order ([`verify_proof`]) and a hash addressed
//! set shared by several keys ([`verify_multi_proof`]).

use crate::nibble::{compare_remaining, nibble_ops, HexPrefixError, NibbleSlice};
use crate::node::{Node, NodeError, NodeHandle};
use crate::rstd::{fmt, marker::PhantomData, vec::Vec};
use crate::{TrieHash, TrieLayout};
use hash_db::{decode_hash, Hasher, NodeLookup};
use log::trace;
use rlp_view::DecoderError;

/// Errors that may occur during proof verification. Most of the errors types simply indicate that
/// the proof is invalid with respect to the statement being verified, and the exact error type can
/// be used for debugging.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum VerifyError<HO> {
	/// One of the proof nodes is not valid RLP.
	DecodeError(DecoderError),
	/// The path of a leaf or extension node is not valid hex-prefix.
	InvalidHexPrefix(HexPrefixError),
	/// A node list has neither 2 nor 17 items. The parameter is the item count.
	InvalidItemCount(usize),
	/// A node does not hash to the reference it was reached through.
	/// The parameter is the hash of the offered node.
	HashMismatch(HO),
	/// No node of the set hashes to the parameter.
	MissingNode(HO),
	/// A child slot is neither empty, a hash, nor an embedded node.
	InvalidChildReference(Vec<u8>),
	/// The key leads to an empty branch slot. The parameter is the slot nibble.
	EmptyChild(u8),
	/// The key diverges from the path of a leaf or extension. The parameter is the key.
	PathMismatch(Vec<u8>),
	/// The key is in the trie with a different value. The parameter is the key.
	ValueMismatch(Vec<u8>),
	/// The proof is missing trie nodes required to verify.
	IncompleteProof,
	/// The walk visited more nodes than the layout allows.
	DepthLimitExceeded(usize),
}

impl<HO> From<NodeError> for VerifyError<HO> {
	fn from(e: NodeError) -> Self {
		match e {
			NodeError::Decode(e) => VerifyError::DecodeError(e),
			NodeError::HexPrefix(e) => VerifyError::InvalidHexPrefix(e),
			NodeError::ItemCount(count) => VerifyError::InvalidItemCount(count),
			NodeError::ChildReference(data) => VerifyError::InvalidChildReference(data),
		}
	}
}

#[cfg(feature = "std")]
struct ToHex<'a>(&'a [u8]);
#[cfg(feature = "std")]
impl<'a> fmt::Display for ToHex<'a> {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		let hex = rustc_hex::ToHexIter::new(self.0.iter());
		for b in hex {
			write!(fmt, "{}", b)?;
		}
		Ok(())
	}
}

#[cfg(feature = "std")]
impl<HO: AsRef<[u8]>> fmt::Display for VerifyError<HO> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			VerifyError::DecodeError(err) => write!(f, "Unable to decode proof node: {}", err),
			VerifyError::InvalidHexPrefix(err) => write!(f, "Invalid node path: {}", err),
			VerifyError::InvalidItemCount(count) =>
				write!(f, "Proof node has {} items, expected 2 or 17", count),
			VerifyError::HashMismatch(hash) =>
				write!(f, "Proof node hashes to unexpected {}", ToHex(hash.as_ref())),
			VerifyError::MissingNode(hash) =>
				write!(f, "Proof misses node {}", ToHex(hash.as_ref())),
			VerifyError::InvalidChildReference(data) =>
				write!(f, "Invalid child reference: {}", ToHex(data)),
			VerifyError::EmptyChild(nibble) =>
				write!(f, "Key leads to empty branch slot {:x}", nibble),
			VerifyError::PathMismatch(key) =>
				write!(f, "Key diverges from the node path: key={}", ToHex(key)),
			VerifyError::ValueMismatch(key) =>
				write!(f, "Expected value was not found in the trie: key={}", ToHex(key)),
			VerifyError::IncompleteProof => write!(f, "Proof is incomplete -- expected more nodes"),
			VerifyError::DepthLimitExceeded(depth) =>
				write!(f, "Proof walk exceeds {} nodes", depth),
		}
	}
}

#[cfg(feature = "std")]
impl<HO: AsRef<[u8]> + fmt::Debug> std::error::Error for VerifyError<HO> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			VerifyError::DecodeError(err) => Some(err),
			_ => None,
		}
	}
}

/// Next node of a walk.
enum Child<'a, HO> {
	Hash(HO),
	Inline(&'a [u8]),
}

impl<'a, HO> Child<'a, HO> {
	fn from_handle<H: Hasher<Out = HO>>(handle: NodeHandle<'a>) -> Result<Self, VerifyError<HO>> {
		match handle {
			NodeHandle::Hash(data) => decode_hash::<H>(data)
				.map(Child::Hash)
				.ok_or_else(|| VerifyError::InvalidChildReference(data.to_vec())),
			NodeHandle::Inline(data) => Ok(Child::Inline(data)),
		}
	}
}

/// Where the walk takes the nodes it reaches by hash from.
trait NodeSource<'a, HO> {
	/// Encoded node for `hash`, authenticated against it.
	fn fetch(&mut self, hash: &HO) -> Result<&'a [u8], VerifyError<HO>>;

	/// Notify that an embedded node is being visited.
	fn embedded(&mut self, _data: &[u8]) {}
}

/// Proof nodes in descent order.
struct OrderedNodes<'a, N, H> {
	nodes: &'a [N],
	next: usize,
	_marker: PhantomData<H>,
}

impl<'a, N: AsRef<[u8]>, H: Hasher> NodeSource<'a, H::Out> for OrderedNodes<'a, N, H> {
	fn fetch(&mut self, hash: &H::Out) -> Result<&'a [u8], VerifyError<H::Out>> {
		let nodes: &'a [N] = self.nodes;
		let node = nodes.get(self.next).ok_or(VerifyError::IncompleteProof)?.as_ref();
		self.next += 1;
		let node_hash = H::hash(node);
		if node_hash != *hash {
			return Err(VerifyError::HashMismatch(node_hash))
		}
		Ok(node)
	}

	// Some provers list embedded nodes as well, such a copy is skipped.
	fn embedded(&mut self, data: &[u8]) {
		if self.nodes.get(self.next).map_or(false, |node| node.as_ref() == data) {
			self.next += 1;
		}
	}
}

/// Proof nodes addressed by their hash.
struct LookupNodes<'a, D: ?Sized, H> {
	db: &'a D,
	_marker: PhantomData<H>,
}

impl<'a, D: NodeLookup<H> + ?Sized, H: Hasher> NodeSource<'a, H::Out> for LookupNodes<'a, D, H> {
	fn fetch(&mut self, hash: &H::Out) -> Result<&'a [u8], VerifyError<H::Out>> {
		let db: &'a D = self.db;
		let node = <D as NodeLookup<H>>::get(db, hash).ok_or(VerifyError::MissingNode(*hash))?;
		let node_hash = H::hash(node);
		if node_hash != *hash {
			return Err(VerifyError::HashMismatch(node_hash))
		}
		Ok(node)
	}
}

/// Walk from `root` to the value of `key`, requiring it to equal `value`.
fn walk<'a, L, S>(
	root: &TrieHash<L>,
	source: &mut S,
	key: &[u8],
	value: &[u8],
) -> Result<(), VerifyError<TrieHash<L>>>
where
	L: TrieLayout,
	S: NodeSource<'a, TrieHash<L>>,
{
	let key_len = nibble_ops::nibble_len(key.len());
	let mut next = Child::Hash(*root);
	let mut offset = 0;
	for depth in 0..L::MAX_DEPTH {
		let data = match next {
			Child::Hash(ref hash) => source.fetch(hash)?,
			Child::Inline(data) => {
				source.embedded(data);
				data
			},
		};
		let node = Node::decode(data)?;
		trace!(target: "trie", "depth {}, key offset {}: {:?}", depth, offset, node);
		next = match node {
			Node::Branch(children, node_value) => {
				if offset == key_len {
					return match node_value {
						Some(found) if found == value => Ok(()),
						_ => Err(VerifyError::ValueMismatch(key.to_vec())),
					}
				}
				let index = nibble_ops::left_nibble_at(key, offset);
				offset += 1;
				match children[index as usize] {
					Some(child) => Child::from_handle::<L::Hash>(child)?,
					None => return Err(VerifyError::EmptyChild(index)),
				}
			},
			Node::Extension(path, child) => {
				if !compare_remaining(key, offset, &path) {
					return Err(VerifyError::PathMismatch(key.to_vec()))
				}
				offset += path.len();
				Child::from_handle::<L::Hash>(child)?
			},
			Node::Leaf(path, found) => {
				if offset + path.len() != key_len || !compare_remaining(key, offset, &path) {
					return Err(VerifyError::PathMismatch(key.to_vec()))
				}
				if found != value {
					return Err(VerifyError::ValueMismatch(key.to_vec()))
				}
				return Ok(())
			},
		};
	}
	Err(VerifyError::DepthLimitExceeded(L::MAX_DEPTH))
}

/// Verify that `key` maps to `value` in the trie committed to by `root`.
///
/// `proof` holds the encoded nodes met on the path from the root, in that
/// order. Embedded nodes may be omitted or repeated right after their parent.
/// The walk stops at the value, so nodes listed past it are never read.
pub fn verify_proof<L, N>(
	root: &TrieHash<L>,
	proof: &[N],
	key: &[u8],
	value: &[u8],
) -> Result<(), VerifyError<TrieHash<L>>>
where
	L: TrieLayout,
	N: AsRef<[u8]>,
{
	trace!(target: "trie", "verify_proof: {} nodes, key {:?}", proof.len(), NibbleSlice::new(key));
	let mut nodes = OrderedNodes::<N, L::Hash> { nodes: proof, next: 0, _marker: PhantomData };
	walk::<L, _>(root, &mut nodes, key, value)?;
	if nodes.next < proof.len() {
		trace!(target: "trie", "verify_proof: {} trailing nodes ignored", proof.len() - nodes.next);
	}
	Ok(())
}

/// Verify that every `(key, value)` item is in the trie committed to by `root`,
/// resolving hash references through `nodes`.
///
/// The first failing item aborts the verification.
pub fn verify_multi_proof<L, D, I, K, V>(
	root: &TrieHash<L>,
	nodes: &D,
	items: I,
) -> Result<(), VerifyError<TrieHash<L>>>
where
	L: TrieLayout,
	D: NodeLookup<L::Hash> + ?Sized,
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<[u8]>,
	V: AsRef<[u8]>,
{
	let mut source = LookupNodes::<D, L::Hash> { db: nodes, _marker: PhantomData };
	for (key, value) in items {
		let key = key.as_ref();
		trace!(target: "trie", "verify_multi_proof: key {:?}", NibbleSlice::new(key));
		walk::<L, _>(root, &mut source, key, value.as_ref())?;
	}
	Ok(())
}
