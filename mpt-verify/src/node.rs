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

//! Decoding of RLP encoded Ethereum trie nodes.

use crate::nibble::{decode_hp, nibble_ops::NIBBLE_LENGTH, HexPrefixError, NibbleSlice};
use crate::rstd::{fmt, vec::Vec};
use rlp_view::{decode_bytes, decode_item, decode_list_exact, DecoderError, Item};

/// Number of items of an encoded branch node.
pub const BRANCH_ITEMS: usize = NIBBLE_LENGTH + 1;
/// Number of items of an encoded leaf or extension node.
pub const PATH_ITEMS: usize = 2;
/// Length of a hash reference to a child node.
pub const HASH_REFERENCE_LEN: usize = 32;

/// A reference to a trie node which may be stored within another trie node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHandle<'a> {
	/// Hash of the encoded child.
	Hash(&'a [u8]),
	/// Encoded child of less than 32 bytes, embedded in its parent.
	Inline(&'a [u8]),
}

/// Type of node in the trie and essential information thereof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
	/// Leaf node; has key slice and value.
	Leaf(NibbleSlice<'a>, &'a [u8]),
	/// Extension node; has key slice and a child.
	Extension(NibbleSlice<'a>, NodeHandle<'a>),
	/// Branch node; has 16 child slots (each possibly empty)
	/// and an optional value for the key ending at this node.
	Branch([Option<NodeHandle<'a>>; NIBBLE_LENGTH], Option<&'a [u8]>),
}

/// Reasons an encoded node is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
	/// Malformed RLP.
	Decode(DecoderError),
	/// The path of a leaf or extension is not a valid hex-prefix encoding.
	HexPrefix(HexPrefixError),
	/// The node list has neither 2 nor 17 items.
	ItemCount(usize),
	/// A child slot is neither empty, a 32 byte hash nor an embedded node
	/// of less than 32 bytes.
	ChildReference(Vec<u8>),
}

impl From<DecoderError> for NodeError {
	fn from(e: DecoderError) -> Self {
		NodeError::Decode(e)
	}
}

impl From<HexPrefixError> for NodeError {
	fn from(e: HexPrefixError) -> Self {
		NodeError::HexPrefix(e)
	}
}

impl fmt::Display for NodeError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			NodeError::Decode(ref e) => write!(f, "Bad node encoding: {}", e),
			NodeError::HexPrefix(ref e) => write!(f, "Bad node path: {}", e),
			NodeError::ItemCount(count) => write!(f, "Node with {} items", count),
			NodeError::ChildReference(ref data) =>
				write!(f, "Invalid child reference of {} bytes", data.len()),
		}
	}
}

/// Decode a child slot given its raw item encoding.
///
/// A string of 32 bytes is a hash, a list is only valid embedded when its
/// whole encoding is shorter than a hash.
fn decode_child(raw: &[u8]) -> Result<Option<NodeHandle>, NodeError> {
	match decode_item(raw, 0)?.0 {
		Item::ShortString(bytes) if bytes.is_empty() => Ok(None),
		Item::ShortString(bytes) if bytes.len() == HASH_REFERENCE_LEN =>
			Ok(Some(NodeHandle::Hash(bytes))),
		Item::ShortList(_) if raw.len() < HASH_REFERENCE_LEN => Ok(Some(NodeHandle::Inline(raw))),
		_ => Err(NodeError::ChildReference(raw.to_vec())),
	}
}

impl<'a> Node<'a> {
	/// Decode a node from its full RLP encoding.
	pub fn decode(data: &'a [u8]) -> Result<Self, NodeError> {
		let list = decode_list_exact(data)?;
		let count = list.item_count()?;
		match count {
			PATH_ITEMS => {
				let path = list.nth(0)?;
				let second = list.nth(1)?;
				let (path, is_leaf) = decode_hp(decode_bytes(path, 0)?.0)?;
				if is_leaf {
					Ok(Node::Leaf(path, decode_bytes(second, 0)?.0))
				} else {
					match decode_child(second)? {
						Some(child) => Ok(Node::Extension(path, child)),
						None => Err(NodeError::ChildReference(second.to_vec())),
					}
				}
			},
			BRANCH_ITEMS => {
				let mut children = [None; NIBBLE_LENGTH];
				let mut items = list.iter();
				for child in children.iter_mut() {
					let raw = items.next().ok_or(DecoderError::MissingItem(NIBBLE_LENGTH))??;
					*child = decode_child(raw)?;
				}
				let raw = items.next().ok_or(DecoderError::MissingItem(NIBBLE_LENGTH))??;
				let value = decode_bytes(raw, 0)?.0;
				Ok(Node::Branch(children, if value.is_empty() { None } else { Some(value) }))
			},
			count => Err(NodeError::ItemCount(count)),
		}
	}

	/// Child the walk continues to for the nibble `index`, if any.
	pub fn child(&self, index: u8) -> Option<NodeHandle<'a>> {
		match *self {
			Node::Branch(ref children, _) => children.get(index as usize).copied().flatten(),
			Node::Extension(_, child) => Some(child),
			Node::Leaf(..) => None,
		}
	}
}
