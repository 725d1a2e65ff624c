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

//! Canonical RLP encoding.

use crate::rstd::vec::Vec;
use crate::{Item, EMPTY_LIST, EMPTY_STRING, LONG_FORM_THRESHOLD};

fn encode_length(len: usize, offset: u8, out: &mut Vec<u8>) {
	if len < LONG_FORM_THRESHOLD {
		out.push(offset + len as u8);
	} else {
		let be = len.to_be_bytes();
		let skip = be.iter().take_while(|b| **b == 0).count();
		// 0x37 is the distance between the short and long form prefixes.
		out.push(offset + 0x37 + (be.len() - skip) as u8);
		out.extend_from_slice(&be[skip..]);
	}
}

/// Append the encoding of a byte string.
pub fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
	if bytes.len() == 1 && bytes[0] < EMPTY_STRING {
		out.push(bytes[0]);
	} else {
		encode_length(bytes.len(), EMPTY_STRING, out);
		out.extend_from_slice(bytes);
	}
}

/// Encoding of a byte string as a new buffer.
pub fn encoded_bytes(bytes: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(bytes.len() + 9);
	encode_bytes(bytes, &mut out);
	out
}

/// Append the canonical encoding of an integer (big-endian, no leading zero).
pub fn encode_u64(value: u64, out: &mut Vec<u8>) {
	let be = value.to_be_bytes();
	let skip = be.iter().take_while(|b| **b == 0).count();
	encode_bytes(&be[skip..], out);
}

/// Append a list prefix announcing `payload_len` bytes of items.
pub fn encode_list_header(payload_len: usize, out: &mut Vec<u8>) {
	encode_length(payload_len, EMPTY_LIST, out);
}

/// Wrap already encoded items into a list.
pub fn encode_list<I, T>(items: I) -> Vec<u8>
where
	I: IntoIterator<Item = T>,
	T: AsRef<[u8]>,
{
	let mut payload = Vec::new();
	for item in items {
		payload.extend_from_slice(item.as_ref());
	}
	let mut out = Vec::with_capacity(payload.len() + 9);
	encode_list_header(payload.len(), &mut out);
	out.extend_from_slice(&payload);
	out
}

/// Append the encoding of a decoded item.
pub fn encode_item(item: &Item, out: &mut Vec<u8>) {
	match *item {
		Item::Byte(byte) => out.push(byte),
		Item::ShortString(bytes) | Item::LongString(bytes) => encode_bytes(bytes, out),
		Item::ShortList(list) | Item::LongList(list) => {
			encode_list_header(list.payload().len(), out);
			out.extend_from_slice(list.payload());
		},
	}
}
