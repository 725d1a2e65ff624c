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

//! Native value transfers.

use crate::{decode_u256, envelope::TxType, Error, Field, Result, H160, U256};
use log::debug;
use rlp_view::decode_fixed;

/// Check `transaction` sends `expected_value` wei to `expected_to`.
///
/// Contract creations have no recipient and are rejected as malformed.
pub fn validate_native_transfer(
	transaction: &[u8],
	expected_to: &H160,
	expected_value: &U256,
) -> Result<()> {
	let (ty, fields) = TxType::decode(transaction)?;
	let (to_index, value_index) = ty.transfer_fields();

	let (to, _) = decode_fixed::<20>(fields.nth(to_index)?, 0)?;
	if H160(*to) != *expected_to {
		debug!(
			target: "evidence",
			"{:?} transaction to {:?}, expected {:?}",
			ty,
			H160(*to),
			expected_to,
		);
		return Err(Error::ValueMismatch(Field::To))
	}
	let value = decode_u256(fields.nth(value_index)?, 0)?;
	if value != *expected_value {
		debug!(
			target: "evidence",
			"{:?} transaction of {}, expected {}",
			ty,
			value,
			expected_value,
		);
		return Err(Error::ValueMismatch(Field::Value))
	}
	Ok(())
}
