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

//! Collaborators supplied by the caller: trusted block hashes and payouts.

use crate::header::{block_hash, extract_block_number};
use crate::rstd::collections::BTreeMap;
use crate::rstd::{fmt, result};
use crate::{Error, Result, H160, H256, U256};
use log::debug;

/// Source of the canonical hash of past blocks, provided by the caller.
pub trait ChainOracle {
	/// Hash of block `number`, if known.
	fn block_hash(&self, number: u64) -> Option<H256>;
}

impl<'a, T: ChainOracle + ?Sized> ChainOracle for &'a T {
	fn block_hash(&self, number: u64) -> Option<H256> {
		(**self).block_hash(number)
	}
}

impl ChainOracle for BTreeMap<u64, H256> {
	fn block_hash(&self, number: u64) -> Option<H256> {
		self.get(&number).copied()
	}
}

/// Custodian of the funds released once evidence verifies, provided by the caller.
pub trait Ledger {
	/// Reason a transfer was refused.
	type Error: fmt::Debug;

	/// Send `amount` to `to`. A refused transfer leaves the ledger unchanged.
	fn transfer(&mut self, to: &H160, amount: &U256) -> result::Result<(), Self::Error>;
}

impl<'a, T: Ledger + ?Sized> Ledger for &'a mut T {
	type Error = T::Error;

	fn transfer(&mut self, to: &H160, amount: &U256) -> result::Result<(), Self::Error> {
		(**self).transfer(to, amount)
	}
}

/// Check `header` is the header of block `target` known to `oracle`.
///
/// Roots extracted from `header` can be trusted once this succeeds.
pub fn authenticate_header<O: ChainOracle + ?Sized>(
	oracle: &O,
	header: &[u8],
	target: u64,
) -> Result<()> {
	let expected = oracle.block_hash(target).ok_or(Error::UnknownBlock(target))?;
	let found = block_hash(header);
	if found != expected {
		debug!(
			target: "evidence",
			"Header of block {} hashes to {:?}, expected {:?}",
			target,
			found,
			expected,
		);
		return Err(Error::BlockHashMismatch { expected, found })
	}
	let number = extract_block_number(header)?;
	if number != target {
		return Err(Error::BlockNumberMismatch { expected: target, found: number })
	}
	Ok(())
}
