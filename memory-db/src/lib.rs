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

//! Reference-free in-memory node set keyed by node hash.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

use hash_db::{Hasher as KeyHasher, NodeLookup};
use hashbrown::{hash_map::Entry, HashMap};

#[cfg(feature = "std")]
use std::{fmt, hash::BuildHasherDefault, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use core::{fmt, hash::BuildHasherDefault};

/// In-memory set of encoded nodes, each stored under the hash of its bytes.
///
/// The set is built from untrusted proof material: keys are always computed
/// here, never supplied by the caller, so a lookup hit means the returned bytes
/// do hash to the requested key.
///
/// # Example
/// ```rust
/// use hash_db::{Hasher, NodeLookup};
/// use keccak_hasher::KeccakHasher;
/// use memory_db::MemoryDB;
///
/// let mut m = MemoryDB::<KeccakHasher>::default();
/// let d = "Hello world!".as_bytes();
///
/// let k = m.insert(d);
/// assert!(m.contains(&k));
/// assert_eq!(m.get(&k).unwrap(), d);
///
/// // Inserting twice keeps a single copy.
/// m.insert(d);
/// assert_eq!(m.len(), 1);
/// ```
pub struct MemoryDB<H: KeyHasher> {
	data: HashMap<H::Out, Vec<u8>, BuildHasherDefault<H::StdHasher>>,
}

impl<H: KeyHasher> Default for MemoryDB<H> {
	fn default() -> Self {
		MemoryDB { data: HashMap::default() }
	}
}

impl<H: KeyHasher> Clone for MemoryDB<H> {
	fn clone(&self) -> Self {
		MemoryDB { data: self.data.clone() }
	}
}

impl<H: KeyHasher> fmt::Debug for MemoryDB<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryDB").field("nodes", &self.data.len()).finish()
	}
}

impl<H: KeyHasher> MemoryDB<H> {
	/// Create an empty node set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a node set from an iterator of encoded nodes. Duplicates collapse.
	pub fn from_nodes<I, N>(nodes: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: AsRef<[u8]>,
	{
		let mut db = Self::new();
		for node in nodes {
			db.insert(node.as_ref());
		}
		db
	}

	/// Insert an encoded node and return its hash.
	pub fn insert(&mut self, value: &[u8]) -> H::Out {
		let key = H::hash(value);
		if let Entry::Vacant(entry) = self.data.entry(key) {
			entry.insert(value.to_vec());
		}
		key
	}

	/// Number of distinct nodes.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns true if the set holds no node.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

impl<H: KeyHasher> NodeLookup<H> for MemoryDB<H> {
	fn get(&self, key: &H::Out) -> Option<&[u8]> {
		self.data.get(key).map(|v| &v[..])
	}

	fn contains(&self, key: &H::Out) -> bool {
		self.data.contains_key(key)
	}
}

impl<H: KeyHasher, N: AsRef<[u8]>> core::iter::FromIterator<N> for MemoryDB<H> {
	fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
		Self::from_nodes(iter)
	}
}
