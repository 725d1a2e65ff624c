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

use crate::rstd::{convert::TryFrom, mem};
use crate::{DecoderError, Result, LONG_FORM_THRESHOLD};

const SHORT_STRING_OFFSET: u8 = 0x80;
const LONG_STRING_OFFSET: u8 = 0xb7;
const SHORT_LIST_OFFSET: u8 = 0xc0;
const LONG_LIST_OFFSET: u8 = 0xf7;

/// Decoded item prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	/// Whether the item is a list.
	pub is_list: bool,
	/// Bytes taken by the prefix, `0` for a single byte item.
	pub header_len: usize,
	/// Bytes of payload following the prefix.
	pub payload_len: usize,
}

impl Header {
	/// Decode the prefix of the item starting at `offset`.
	///
	/// On success the whole item, header and payload, is guaranteed to lie
	/// inside `buf`.
	pub fn decode(buf: &[u8], offset: usize) -> Result<Self> {
		let len = buf.len();
		let prefix = *buf.get(offset).ok_or(DecoderError::OffsetOutOfBounds { offset, len })?;
		let available = len - offset;
		let header = match prefix {
			0..=0x7f => Header { is_list: false, header_len: 0, payload_len: 1 },
			SHORT_STRING_OFFSET..=LONG_STRING_OFFSET => Header {
				is_list: false,
				header_len: 1,
				payload_len: (prefix - SHORT_STRING_OFFSET) as usize,
			},
			0xb8..=0xbf =>
				Self::decode_long(buf, offset, (prefix - LONG_STRING_OFFSET) as usize, false)?,
			SHORT_LIST_OFFSET..=LONG_LIST_OFFSET => Header {
				is_list: true,
				header_len: 1,
				payload_len: (prefix - SHORT_LIST_OFFSET) as usize,
			},
			0xf8..=0xff =>
				Self::decode_long(buf, offset, (prefix - LONG_LIST_OFFSET) as usize, true)?,
		};
		let needed = header
			.header_len
			.checked_add(header.payload_len)
			.ok_or(DecoderError::LengthOverflow)?;
		if needed > available {
			return Err(DecoderError::InputTooShort { needed, available })
		}
		// A single byte below 0x80 is its own encoding.
		if !header.is_list && header.header_len == 1 && header.payload_len == 1 &&
			buf[offset + 1] < SHORT_STRING_OFFSET
		{
			return Err(DecoderError::NonCanonical)
		}
		Ok(header)
	}

	fn decode_long(buf: &[u8], offset: usize, len_of_len: usize, is_list: bool) -> Result<Self> {
		let start = offset + 1;
		let available = buf.len() - offset;
		if 1 + len_of_len > available {
			return Err(DecoderError::InputTooShort { needed: 1 + len_of_len, available })
		}
		let len_bytes = &buf[start..start + len_of_len];
		if len_bytes[0] == 0 {
			return Err(DecoderError::NonCanonical)
		}
		if len_of_len > mem::size_of::<usize>() {
			return Err(DecoderError::LengthOverflow)
		}
		let payload_len = len_bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
		if payload_len < LONG_FORM_THRESHOLD {
			return Err(DecoderError::NonCanonical)
		}
		Ok(Header { is_list, header_len: 1 + len_of_len, payload_len })
	}

	/// Total encoded length of the item.
	pub fn total_len(&self) -> usize {
		self.header_len + self.payload_len
	}

	/// Range of the payload for an item starting at `offset`.
	fn payload<'a>(&self, buf: &'a [u8], offset: usize) -> &'a [u8] {
		let start = offset + self.header_len;
		&buf[start..start + self.payload_len]
	}
}

/// A decoded RLP item, borrowing from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
	/// Byte below `0x80`, encoded as itself.
	Byte(u8),
	/// String of less than 56 bytes.
	ShortString(&'a [u8]),
	/// String of 56 bytes or more.
	LongString(&'a [u8]),
	/// List with a payload of less than 56 bytes.
	ShortList(List<'a>),
	/// List with a payload of 56 bytes or more.
	LongList(List<'a>),
}

impl<'a> Item<'a> {
	/// Returns true for both list variants.
	pub fn is_list(&self) -> bool {
		matches!(self, Item::ShortList(_) | Item::LongList(_))
	}

	/// List view of a list item.
	pub fn as_list(&self) -> Option<List<'a>> {
		match *self {
			Item::ShortList(list) | Item::LongList(list) => Some(list),
			_ => None,
		}
	}
}

/// Borrowed view of a list payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct List<'a> {
	payload: &'a [u8],
}

impl<'a> List<'a> {
	/// View over an already delimited payload.
	pub fn from_payload(payload: &'a [u8]) -> Self {
		List { payload }
	}

	/// The concatenated encodings of the list items.
	pub fn payload(&self) -> &'a [u8] {
		self.payload
	}

	/// Returns true if the list holds no item.
	pub fn is_empty(&self) -> bool {
		self.payload.is_empty()
	}

	/// Iterate over the raw encoding of each item.
	pub fn iter(&self) -> ListIter<'a> {
		ListIter { payload: self.payload, offset: 0 }
	}

	/// Count the items, validating each item header on the way.
	pub fn item_count(&self) -> Result<usize> {
		let mut count = 0;
		for item in self.iter() {
			item?;
			count += 1;
		}
		Ok(count)
	}

	/// Raw encoding of the item at `index`, reached by skipping its predecessors.
	pub fn nth(&self, index: usize) -> Result<&'a [u8]> {
		let mut offset = 0;
		for _ in 0..index {
			if offset >= self.payload.len() {
				return Err(DecoderError::MissingItem(index))
			}
			offset = skip_item(self.payload, offset)?;
		}
		if offset >= self.payload.len() {
			return Err(DecoderError::MissingItem(index))
		}
		let end = skip_item(self.payload, offset)?;
		Ok(&self.payload[offset..end])
	}
}

impl<'a> IntoIterator for List<'a> {
	type Item = Result<&'a [u8]>;
	type IntoIter = ListIter<'a>;

	fn into_iter(self) -> ListIter<'a> {
		self.iter()
	}
}

/// Iterator over the raw encodings of the items of a [`List`].
///
/// Each step consumes at least one byte, so iteration is bounded by the
/// payload length. After the first error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct ListIter<'a> {
	payload: &'a [u8],
	offset: usize,
}

impl<'a> Iterator for ListIter<'a> {
	type Item = Result<&'a [u8]>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.offset >= self.payload.len() {
			return None
		}
		match skip_item(self.payload, self.offset) {
			Ok(end) => {
				let item = &self.payload[self.offset..end];
				self.offset = end;
				Some(Ok(item))
			},
			Err(e) => {
				self.offset = self.payload.len();
				Some(Err(e))
			},
		}
	}
}

/// Number of bytes taken by the item at `offset`, prefix included.
pub fn item_length(buf: &[u8], offset: usize) -> Result<usize> {
	Header::decode(buf, offset).map(|h| h.total_len())
}

/// Offset of the first byte after the item at `offset`.
pub fn skip_item(buf: &[u8], offset: usize) -> Result<usize> {
	Ok(offset + item_length(buf, offset)?)
}

/// Decode the item at `offset`, returning it with its encoded length.
pub fn decode_item(buf: &[u8], offset: usize) -> Result<(Item, usize)> {
	let header = Header::decode(buf, offset)?;
	let payload = header.payload(buf, offset);
	let item = match (header.is_list, header.header_len) {
		(false, 0) => Item::Byte(payload[0]),
		(false, _) if header.payload_len < LONG_FORM_THRESHOLD => Item::ShortString(payload),
		(false, _) => Item::LongString(payload),
		(true, _) if header.payload_len < LONG_FORM_THRESHOLD =>
			Item::ShortList(List::from_payload(payload)),
		(true, _) => Item::LongList(List::from_payload(payload)),
	};
	Ok((item, header.total_len()))
}

/// Payload of the string item at `offset`; a single byte item yields itself.
pub fn decode_bytes(buf: &[u8], offset: usize) -> Result<(&[u8], usize)> {
	let header = Header::decode(buf, offset)?;
	if header.is_list {
		return Err(DecoderError::UnexpectedList)
	}
	Ok((header.payload(buf, offset), header.total_len()))
}

/// List view of the list item at `offset`.
pub fn decode_list(buf: &[u8], offset: usize) -> Result<(List, usize)> {
	let header = Header::decode(buf, offset)?;
	if !header.is_list {
		return Err(DecoderError::UnexpectedString)
	}
	Ok((List::from_payload(header.payload(buf, offset)), header.total_len()))
}

/// List view of `buf`, which must hold exactly one list item.
pub fn decode_list_exact(buf: &[u8]) -> Result<List> {
	let (list, consumed) = decode_list(buf, 0)?;
	if consumed != buf.len() {
		return Err(DecoderError::TrailingBytes(buf.len() - consumed))
	}
	Ok(list)
}

/// String item at `offset` of exactly `N` bytes.
pub fn decode_fixed<const N: usize>(buf: &[u8], offset: usize) -> Result<(&[u8; N], usize)> {
	let (bytes, consumed) = decode_bytes(buf, offset)?;
	let fixed = <&[u8; N]>::try_from(bytes)
		.map_err(|_| DecoderError::UnexpectedLength { expected: N, got: bytes.len() })?;
	Ok((fixed, consumed))
}

/// Canonical big-endian integer of at most eight bytes.
pub fn decode_u64(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
	let (bytes, consumed) = decode_bytes(buf, offset)?;
	if bytes.len() > 8 || bytes.first() == Some(&0) {
		return Err(DecoderError::InvalidInteger)
	}
	let value = bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64);
	Ok((value, consumed))
}
