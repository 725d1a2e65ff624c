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

//! An owning, nibble-oriented byte vector.

use super::{nibble_ops, BackingByteVec, NibbleSlice};

/// Owning, nibble-oriented byte vector. Counterpart to `NibbleSlice`.
/// Nibbles are always left aligned, so making a `NibbleVec` from
/// a `NibbleSlice` can get costy.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NibbleVec {
	inner: BackingByteVec,
	len: usize,
}

impl NibbleVec {
	/// Make a new `NibbleVec`.
	pub fn new() -> Self {
		NibbleVec { inner: BackingByteVec::new(), len: 0 }
	}

	/// Length of the `NibbleVec`.
	#[inline(always)]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns true if `NibbleVec` has zero length.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Try to get the nibble at the given offset.
	#[inline]
	pub fn at(&self, idx: usize) -> u8 {
		nibble_ops::left_nibble_at(&self.inner, idx)
	}

	/// Push a nibble onto the `NibbleVec`. Ignores the high 4 bits.
	pub fn push(&mut self, nibble: u8) {
		let nibble = nibble & 0x0f;
		if self.len % nibble_ops::NIBBLE_PER_BYTE == 0 {
			self.inner.push(nibble << 4);
		} else if let Some(last) = self.inner.last_mut() {
			*last |= nibble;
		}
		self.len += 1;
	}

	/// Append all nibbles of a `NibbleSlice`.
	pub fn append_slice(&mut self, slice: &NibbleSlice) {
		for nibble in slice.iter() {
			self.push(nibble);
		}
	}

	/// Get the underlying byte slice, the last nibble padded with zero when odd.
	pub fn inner(&self) -> &[u8] {
		&self.inner[..]
	}
}

impl<'a> From<NibbleSlice<'a>> for NibbleVec {
	fn from(s: NibbleSlice<'a>) -> Self {
		let mut v = NibbleVec::new();
		v.append_slice(&s);
		v
	}
}

impl<'a> From<&'a [u8]> for NibbleVec {
	/// Collect loose nibbles, one per byte.
	fn from(nibbles: &'a [u8]) -> Self {
		let mut v = NibbleVec::new();
		for nibble in nibbles {
			v.push(*nibble);
		}
		v
	}
}
