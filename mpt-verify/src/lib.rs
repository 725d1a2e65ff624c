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
#![cfg_attr(not(feature = "std"), no_std)]

//! Verification of Merkle-Patricia trie inclusion proofs.
//!
//! Nodes use the Ethereum encoding: RLP lists of 17 items for branches and
//! 2 items for leaves and extensions, with hex-prefix encoded paths. Nothing
//! is ever written; a proof is walked from its trusted root down to the value.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
mod rstd {
	pub use std::{fmt, marker, vec};
}

#[cfg(not(feature = "std"))]
mod rstd {
	pub use alloc::vec;
	pub use core::{fmt, marker};
}

pub mod nibble;
pub mod node;
pub mod proof;

pub use self::{
	nibble::{compare_remaining, decode_hp, encode_hp, nibble_ops, NibbleSlice, NibbleVec},
	node::{Node, NodeError, NodeHandle},
	proof::{verify_multi_proof, verify_proof, VerifyError},
};
pub use hash_db::{Hasher, NodeLookup};

/// Trait with definition of trie layout.
/// Contains all associated trait needed for
/// a trie definition or implementation.
pub trait TrieLayout {
	/// Maximum number of nodes a single walk may visit before the
	/// proof is rejected.
	const MAX_DEPTH: usize;

	/// Hasher to use for this trie.
	type Hash: Hasher;
}

/// Alias accessor to hasher hash output type from a `TrieLayout`.
pub type TrieHash<L> = <<L as TrieLayout>::Hash as Hasher>::Out;
