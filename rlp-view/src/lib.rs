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
#![cfg_attr(not(feature = "std"), no_std)]

//! Recursive Length Prefix views.
//!
//! Items are never copied out of the input: decoding yields borrowed views
//! ([`Item`], [`List`]) over the caller's buffer together with the number of
//! bytes the item occupies. Every declared length is checked against the
//! remaining buffer before it is used, so adversarial inputs are rejected
//! rather than allocated or looped over.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
mod rstd {
	pub use std::{convert, fmt, mem, result, vec};
}

#[cfg(not(feature = "std"))]
mod rstd {
	pub use alloc::vec;
	pub use core::{convert, fmt, mem, result};
}

mod decode;
mod encode;

pub use decode::{
	decode_bytes, decode_fixed, decode_item, decode_list, decode_list_exact, decode_u64,
	item_length, skip_item, Header, Item, List, ListIter,
};
pub use encode::{
	encode_bytes, encode_item, encode_list, encode_list_header, encode_u64, encoded_bytes,
};

use rstd::fmt;

/// Prefix of the empty string, also the encoding of integer zero.
pub const EMPTY_STRING: u8 = 0x80;
/// Prefix of the empty list.
pub const EMPTY_LIST: u8 = 0xc0;
/// Payload length from which the long (length of length) form is used.
pub const LONG_FORM_THRESHOLD: usize = 56;

/// RLP decoding errors.
///
/// Every variant denotes malformed input; none is recoverable by retrying.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum DecoderError {
	/// Item offset is not inside the buffer.
	OffsetOutOfBounds {
		/// Requested offset.
		offset: usize,
		/// Buffer length.
		len: usize,
	},
	/// A declared length runs past the end of the buffer.
	InputTooShort {
		/// Bytes required by the item header.
		needed: usize,
		/// Bytes left in the buffer from the item offset.
		available: usize,
	},
	/// A length of length does not fit a `usize`.
	LengthOverflow,
	/// Encoding is valid but not the canonical one for its content.
	NonCanonical,
	/// Expected a string, found a list.
	UnexpectedList,
	/// Expected a list, found a string.
	UnexpectedString,
	/// A string does not have the required length.
	UnexpectedLength {
		/// Required payload length.
		expected: usize,
		/// Actual payload length.
		got: usize,
	},
	/// Integer payload has leading zeroes or does not fit the target width.
	InvalidInteger,
	/// A list has fewer items than the requested position.
	MissingItem(usize),
	/// Bytes remain after the item that should span the whole input.
	TrailingBytes(usize),
}

impl fmt::Display for DecoderError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			DecoderError::OffsetOutOfBounds { offset, len } =>
				write!(f, "Offset {} out of bounds for buffer of {} bytes", offset, len),
			DecoderError::InputTooShort { needed, available } =>
				write!(f, "Item needs {} bytes, only {} available", needed, available),
			DecoderError::LengthOverflow => write!(f, "Length prefix overflows"),
			DecoderError::NonCanonical => write!(f, "Non canonical encoding"),
			DecoderError::UnexpectedList => write!(f, "Expected a string, found a list"),
			DecoderError::UnexpectedString => write!(f, "Expected a list, found a string"),
			DecoderError::UnexpectedLength { expected, got } =>
				write!(f, "Expected a string of {} bytes, got {}", expected, got),
			DecoderError::InvalidInteger => write!(f, "Invalid integer encoding"),
			DecoderError::MissingItem(index) => write!(f, "List has no item at index {}", index),
			DecoderError::TrailingBytes(count) =>
				write!(f, "{} trailing bytes after item", count),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for DecoderError {}

/// Decoding result type.
pub type Result<T> = rstd::result::Result<T, DecoderError>;
