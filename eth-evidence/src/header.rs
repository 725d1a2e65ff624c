// Copyright 2021 Parity Technologies
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

//! Block header fields.
//!
//! Fields are reached by skipping their predecessors in the header list;
//! nothing before or after them is decoded.

use crate::{Result, H256};
use keccak_hasher::keccak_256;
use rlp_view::{decode_fixed, decode_list_exact, decode_u64, DecoderError};

/// Fewer fields than this is not a header of any fork.
pub const MIN_HEADER_FIELDS: usize = 15;

/// Header fields that can be extracted.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum HeaderField {
	/// Root of the state trie.
	StateRoot,
	/// Root of the transactions trie.
	TransactionsRoot,
	/// Root of the receipts trie.
	ReceiptsRoot,
	/// Block number.
	Number,
}

impl HeaderField {
	/// Position of the field in the header list.
	pub fn index(&self) -> usize {
		match self {
			HeaderField::StateRoot => 3,
			HeaderField::TransactionsRoot => 4,
			HeaderField::ReceiptsRoot => 5,
			HeaderField::Number => 8,
		}
	}
}

/// Raw encoding of `field` in `header`.
fn field(header: &[u8], field: HeaderField) -> Result<&[u8]> {
	let list = decode_list_exact(header)?;
	// The last mandatory field bounds the walk before any field is returned.
	list.nth(MIN_HEADER_FIELDS - 1)?;
	Ok(list.nth(field.index())?)
}

fn extract_root(header: &[u8], root: HeaderField) -> Result<H256> {
	let (hash, _) = decode_fixed::<32>(field(header, root)?, 0)?;
	Ok(H256::from(*hash))
}

/// The `stateRoot` of an RLP encoded header.
pub fn extract_state_root(header: &[u8]) -> Result<H256> {
	extract_root(header, HeaderField::StateRoot)
}

/// The `transactionsRoot` of an RLP encoded header.
pub fn extract_transactions_root(header: &[u8]) -> Result<H256> {
	extract_root(header, HeaderField::TransactionsRoot)
}

/// The `receiptsRoot` of an RLP encoded header.
pub fn extract_receipts_root(header: &[u8]) -> Result<H256> {
	extract_root(header, HeaderField::ReceiptsRoot)
}

/// The block number of an RLP encoded header.
pub fn extract_block_number(header: &[u8]) -> Result<u64> {
	let (number, _) = decode_u64(field(header, HeaderField::Number)?, 0)?;
	Ok(number)
}

/// Hash of a block, keccak of its RLP encoded header.
pub fn block_hash(header: &[u8]) -> H256 {
	H256(keccak_256(header))
}

/// Check `header` has a complete layout, returning its field count.
pub fn field_count(header: &[u8]) -> Result<usize> {
	let count = decode_list_exact(header)?.item_count()?;
	if count < MIN_HEADER_FIELDS {
		return Err(DecoderError::MissingItem(count).into())
	}
	Ok(count)
}
