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

//! Nibble oriented methods and the hex-prefix path encoding.

mod nibbleslice;
mod nibblevec;

pub use self::{
	nibbleslice::{NibbleSlice, NibbleSliceIterator},
	nibblevec::NibbleVec,
};

use crate::rstd::fmt;
use smallvec::SmallVec;

/// Backing storage for owned nibble paths, sized for a hashed key with its flag byte.
pub type BackingByteVec = SmallVec<[u8; 40]>;

/// Nibble (half-byte) related constants and helpers.
pub mod nibble_ops {
	/// Number of nibbles per byte.
	pub const NIBBLE_PER_BYTE: usize = 2;
	/// Number of children of a branch node.
	pub const NIBBLE_LENGTH: usize = 16;
	/// Hex-prefix flag marking an odd number of path nibbles.
	pub const ODD_FLAG: u8 = 0x10;
	/// Hex-prefix flag marking a leaf path.
	pub const LEAF_FLAG: u8 = 0x20;

	/// Nibble at index `i` of a left aligned packed byte slice.
	#[inline(always)]
	pub fn left_nibble_at(data: &[u8], i: usize) -> u8 {
		let byte = data[i / NIBBLE_PER_BYTE];
		if i % NIBBLE_PER_BYTE == 0 {
			byte >> 4
		} else {
			byte & 0x0f
		}
	}

	/// Number of nibbles in `len` bytes.
	#[inline]
	pub fn nibble_len(len: usize) -> usize {
		len * NIBBLE_PER_BYTE
	}
}

/// Malformed hex-prefix encoded path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexPrefixError {
	/// The encoding has no flag byte.
	Empty,
	/// The flag nibble is above `3`.
	InvalidFlag(u8),
	/// An even length path with a non zero padding nibble.
	NonZeroPadding(u8),
}

impl fmt::Display for HexPrefixError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			HexPrefixError::Empty => write!(f, "Empty hex-prefix path"),
			HexPrefixError::InvalidFlag(flag) => write!(f, "Invalid hex-prefix flag {:#x}", flag),
			HexPrefixError::NonZeroPadding(nibble) =>
				write!(f, "Non zero hex-prefix padding nibble {:#x}", nibble),
		}
	}
}

/// Decode a hex-prefix encoded path into its nibbles and leaf flag.
pub fn decode_hp(encoded: &[u8]) -> Result<(NibbleSlice, bool), HexPrefixError> {
	let first = *encoded.first().ok_or(HexPrefixError::Empty)?;
	let flag = first >> 4;
	if flag > 3 {
		return Err(HexPrefixError::InvalidFlag(flag))
	}
	let is_leaf = first & nibble_ops::LEAF_FLAG != 0;
	if first & nibble_ops::ODD_FLAG != 0 {
		Ok((NibbleSlice::new_offset(encoded, 1), is_leaf))
	} else if first & 0x0f != 0 {
		Err(HexPrefixError::NonZeroPadding(first & 0x0f))
	} else {
		Ok((NibbleSlice::new_offset(encoded, 2), is_leaf))
	}
}

/// Hex-prefix encode a nibble path, noting whether it `is_leaf`.
pub fn encode_hp(nibbles: &NibbleVec, is_leaf: bool) -> BackingByteVec {
	let len = nibbles.len();
	let mut out = BackingByteVec::with_capacity(len / 2 + 1);
	let flag = if is_leaf { nibble_ops::LEAF_FLAG } else { 0 };
	let mut i = len % 2;
	if i == 1 {
		out.push(flag | nibble_ops::ODD_FLAG | nibbles.at(0));
	} else {
		out.push(flag);
	}
	while i < len {
		out.push(nibbles.at(i) << 4 | nibbles.at(i + 1));
		i += 2;
	}
	out
}

/// Check that `path` matches the nibbles of `key` from `key_offset`.
///
/// Running past the end of the key is a mismatch.
pub fn compare_remaining(key: &[u8], key_offset: usize, path: &NibbleSlice) -> bool {
	let key_len = nibble_ops::nibble_len(key.len());
	match key_offset.checked_add(path.len()) {
		Some(end) if end <= key_len => (0..path.len())
			.all(|i| nibble_ops::left_nibble_at(key, key_offset + i) == path.at(i)),
		_ => false,
	}
}
