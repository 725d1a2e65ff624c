// Copyright 2017, 2018 Parity Technologies
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

//! Hashing abstraction and read-only lookup of byte-slices keyed to their hash.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
use std::fmt::Debug;
#[cfg(feature = "std")]
use std::hash;
#[cfg(not(feature = "std"))]
use core::hash;

#[cfg(feature = "std")]
pub trait MaybeDebug: Debug {}
#[cfg(feature = "std")]
impl<T: Debug> MaybeDebug for T {}
#[cfg(not(feature = "std"))]
pub trait MaybeDebug {}
#[cfg(not(feature = "std"))]
impl<T> MaybeDebug for T {}

/// Trait describing an object that can hash a slice of bytes. Used to abstract
/// other types over the hashing algorithm. Defines a single `hash` method and an
/// `Out` associated type with the necessary bounds.
pub trait Hasher: Sync + Send {
	/// The output type of the `Hasher`
	type Out: AsRef<[u8]> + AsMut<[u8]> + Default + MaybeDebug + PartialEq + Eq
		+ hash::Hash + Send + Sync + Clone + Copy;
	/// What to use to build `HashMap`s with this `Hasher`.
	type StdHasher: Sync + Send + Default + hash::Hasher;
	/// The length in bytes of the `Hasher` output.
	const LENGTH: usize;

	/// Compute the hash of the provided slice of bytes returning the `Out` type of the `Hasher`.
	fn hash(x: &[u8]) -> Self::Out;
}

/// Read a hash from a slice into a Hasher output. Returns None if the slice is the wrong length.
pub fn decode_hash<H: Hasher>(data: &[u8]) -> Option<H::Out> {
	if data.len() != H::LENGTH {
		return None;
	}
	let mut hash = H::Out::default();
	hash.as_mut().copy_from_slice(data);
	Some(hash)
}

/// Read-only source of encoded trie nodes addressed by the hash of their encoding.
///
/// Implementations never compute anything on lookup: a returned slice is whatever
/// was stored under `key`, and the caller is expected to re-hash it when the store
/// is not trusted.
pub trait NodeLookup<H: Hasher> {
	/// Look up a given hash into the bytes that hash to it, returning None if the
	/// hash is not known.
	fn get(&self, key: &H::Out) -> Option<&[u8]>;

	/// Check for the existence of a hash-key.
	fn contains(&self, key: &H::Out) -> bool {
		self.get(key).is_some()
	}
}

impl<'a, H: Hasher, T: NodeLookup<H> + ?Sized> NodeLookup<H> for &'a T {
	fn get(&self, key: &H::Out) -> Option<&[u8]> { (**self).get(key) }
	fn contains(&self, key: &H::Out) -> bool { (**self).contains(key) }
}

/// Linear scan over an unordered slice of encoded nodes, re-hashing every candidate.
///
/// Useful when a proof arrives as a flat list and is only queried a few times;
/// `memory-db` builds an indexed variant.
impl<H: Hasher, N: AsRef<[u8]>> NodeLookup<H> for [N] {
	fn get(&self, key: &H::Out) -> Option<&[u8]> {
		self.iter()
			.map(|node| node.as_ref())
			.find(|node| H::hash(node) == *key)
	}
}
