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

//! Typed envelopes shared by transactions and receipts.

use crate::{Error, Result};
use rlp_view::{decode_list_exact, DecoderError, List, EMPTY_LIST};

/// Transaction type, also tagging the receipt of the transaction.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TxType {
	/// Untagged RLP list.
	Legacy,
	/// `0x01` access list transaction.
	AccessList,
	/// `0x02` dynamic fee transaction.
	DynamicFee,
}

impl TxType {
	/// Type of a tag byte. Legacy items carry no tag.
	pub fn from_tag(tag: u8) -> Result<Self> {
		match tag {
			0x01 => Ok(TxType::AccessList),
			0x02 => Ok(TxType::DynamicFee),
			tag => Err(Error::UnsupportedType(tag)),
		}
	}

	/// Split an enveloped item into its type and its RLP list.
	///
	/// A first byte in the list range means a legacy item. Any other byte is a
	/// type tag, string prefixes included.
	pub fn split(data: &[u8]) -> Result<(Self, &[u8])> {
		match data.first() {
			None => Err(DecoderError::OffsetOutOfBounds { offset: 0, len: 0 }.into()),
			Some(&first) if first >= EMPTY_LIST => Ok((TxType::Legacy, data)),
			Some(&tag) => Ok((Self::from_tag(tag)?, &data[1..])),
		}
	}

	/// Fields of an enveloped item, which must be a single list.
	pub fn decode(data: &[u8]) -> Result<(Self, List)> {
		let (ty, body) = Self::split(data)?;
		Ok((ty, decode_list_exact(body)?))
	}

	/// Positions of `to` and `value` in a transaction of this type.
	pub fn transfer_fields(&self) -> (usize, usize) {
		match self {
			TxType::Legacy => (3, 4),
			TxType::AccessList => (4, 5),
			TxType::DynamicFee => (5, 6),
		}
	}
}
