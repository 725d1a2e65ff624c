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

//! Receipt status and event logs.
//!
//! A receipt is `[status, cumulativeGasUsed, logsBloom, logs]`, optionally
//! preceded by the type byte of its transaction. Each log is
//! `[emitter, topics, data]`.

use crate::rstd::vec::Vec;
use crate::{envelope::TxType, Error, Field, Result, H160, H256, U256};
use keccak_hasher::keccak_256;
use log::debug;
use rlp_view::{decode_bytes, decode_fixed, decode_list, decode_list_exact, DecoderError, List};

/// Canonical signature of the ERC-20 `Transfer` event.
pub const TRANSFER_EVENT: &str = "Transfer(address,address,uint256)";

const STATUS_SUCCESS: &[u8] = &[0x01];
const LOGS_INDEX: usize = 3;

/// Event a receipt log must match.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ExpectedEvent {
	/// Address of the emitting contract.
	pub emitter: H160,
	/// Topic 0, hash of the event signature.
	pub signature: H256,
	/// Indexed arguments, topics 1 and up. `None` leaves a topic unchecked.
	pub topics: Vec<Option<H256>>,
	/// Log data read as a big-endian unsigned integer.
	pub data: U256,
}

impl ExpectedEvent {
	/// ERC-20 `Transfer` of `amount` from `token` to `to`, from any sender.
	pub fn erc20_transfer(token: H160, to: H160, amount: U256) -> Self {
		let mut topics = Vec::with_capacity(2);
		// Sender.
		topics.push(None);
		topics.push(Some(address_topic(&to)));
		ExpectedEvent {
			emitter: token,
			signature: event_signature(TRANSFER_EVENT),
			topics,
			data: amount,
		}
	}
}

/// Topic 0 of events of a canonical signature such as `"Transfer(address,address,uint256)"`.
pub fn event_signature(signature: &str) -> H256 {
	H256(keccak_256(signature.as_bytes()))
}

/// Indexed address argument, left padded to a topic.
pub fn address_topic(address: &H160) -> H256 {
	let mut topic = [0u8; 32];
	topic[12..].copy_from_slice(address.as_bytes());
	H256(topic)
}

/// Check the receipt records a successful execution.
pub fn validate_status(receipt: &[u8]) -> Result<()> {
	let (_, fields) = TxType::decode(receipt)?;
	let status = fields.nth(0)?;
	if status != STATUS_SUCCESS {
		debug!(target: "evidence", "Receipt status {:?}", status);
		return Err(Error::ExecutionFailed)
	}
	Ok(())
}

/// Log at `log_index` of a receipt.
fn log_at(fields: List, log_index: usize) -> Result<List> {
	let (logs, _) = decode_list(fields.nth(LOGS_INDEX)?, 0)?;
	let log = logs.nth(log_index).map_err(|e| match e {
		DecoderError::MissingItem(_) => Error::MissingLog(log_index),
		e => e.into(),
	})?;
	Ok(decode_list_exact(log)?)
}

fn mismatch(field: Field, log_index: usize) -> Error {
	debug!(target: "evidence", "Log {}: unexpected {}", log_index, field);
	Error::ValueMismatch(field)
}

/// Check the log at `log_index` of `receipt` is the `expected` event.
///
/// The receipt status is not looked at, see [`validate_status`].
pub fn validate_event(receipt: &[u8], log_index: usize, expected: &ExpectedEvent) -> Result<()> {
	let (_, fields) = TxType::decode(receipt)?;
	let log = log_at(fields, log_index)?;

	let (emitter, _) = decode_fixed::<20>(log.nth(0)?, 0)?;
	if H160(*emitter) != expected.emitter {
		return Err(mismatch(Field::Emitter, log_index))
	}

	let (topics, _) = decode_list(log.nth(1)?, 0)?;
	if topics.item_count()? != expected.topics.len() + 1 {
		return Err(mismatch(Field::TopicCount, log_index))
	}
	for (position, topic) in topics.iter().enumerate() {
		let (topic, _) = decode_fixed::<32>(topic?, 0)?;
		let topic = H256(*topic);
		if position == 0 {
			if topic != expected.signature {
				return Err(mismatch(Field::Signature, log_index))
			}
		} else if expected.topics[position - 1].map_or(false, |t| t != topic) {
			return Err(mismatch(Field::Topic(position), log_index))
		}
	}

	let (data, _) = decode_bytes(log.nth(2)?, 0)?;
	let leading_zeros = data.iter().take_while(|b| **b == 0).count();
	let data = &data[leading_zeros..];
	if data.len() > 32 || U256::from_big_endian(data) != expected.data {
		return Err(mismatch(Field::Data, log_index))
	}
	Ok(())
}

/// Check the log at `log_index` of `receipt` is an ERC-20 transfer of `amount`
/// to `to`, emitted by `token`.
pub fn validate_erc20_transfer(
	receipt: &[u8],
	log_index: usize,
	token: H160,
	to: H160,
	amount: U256,
) -> Result<()> {
	validate_event(receipt, log_index, &ExpectedEvent::erc20_transfer(token, to, amount))
}
