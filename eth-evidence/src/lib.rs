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

//! Evidence about Ethereum blocks, receipts and transactions.
//!
//! Headers are authenticated against a [`ChainOracle`], one of their roots is
//! extracted, and a receipt or transaction is proven to sit under that root
//! before its fields are checked. Every check is a predicate: nothing is
//! extracted from the item beyond the decision.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
mod rstd {
	pub use std::{collections, fmt, result, vec};
}

#[cfg(not(feature = "std"))]
mod rstd {
	pub use alloc::{collections, vec};
	pub use core::{fmt, result};
}

mod envelope;
pub mod evidence;
pub mod header;
pub mod oracle;
pub mod receipt;
pub mod transaction;

pub use self::{
	envelope::TxType,
	evidence::{
		decode_proof_nodes, release_on_event_evidence, trie_key, verify_event_evidence,
		verify_native_transfer_evidence, verify_receipts_multi, ReceiptEvidence,
		TransactionEvidence,
	},
	header::{
		block_hash, extract_block_number, extract_receipts_root, extract_state_root,
		extract_transactions_root, field_count, HeaderField,
	},
	oracle::{authenticate_header, ChainOracle, Ledger},
	receipt::{
		address_topic, event_signature, validate_erc20_transfer, validate_event, validate_status,
		ExpectedEvent, TRANSFER_EVENT,
	},
	transaction::validate_native_transfer,
};
pub use primitive_types::{H160, H256, U256};

use keccak_hasher::KeccakHasher;
use mpt_verify::{TrieHash, TrieLayout, VerifyError};
use rlp_view::DecoderError;
use rstd::fmt;

/// Ethereum trie layout: Keccak-256 nodes, walks bounded to 256 nodes.
#[derive(Default, Clone, Debug)]
pub struct EthereumLayout;

impl TrieLayout for EthereumLayout {
	const MAX_DEPTH: usize = 256;
	type Hash = KeccakHasher;
}

/// Proof error of an Ethereum trie.
pub type ProofError = VerifyError<TrieHash<EthereumLayout>>;

/// Item field a check compared.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Field {
	/// Value proven by the trie.
	TrieValue,
	/// Log emitter address.
	Emitter,
	/// Log topic 0, the event signature hash.
	Signature,
	/// Number of log topics.
	TopicCount,
	/// Indexed log topic at the given position.
	Topic(usize),
	/// Log data.
	Data,
	/// Transaction recipient.
	To,
	/// Transaction value.
	Value,
}

/// Evidence errors.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Error {
	/// Bytes do not decode to the structure expected at their position.
	MalformedEncoding(DecoderError),
	/// The inclusion proof does not connect the item to the root.
	InvalidProof(ProofError),
	/// Well formed input, but a field differs from the expected one.
	ValueMismatch(Field),
	/// Envelope type byte other than legacy, `0x01` or `0x02`.
	UnsupportedType(u8),
	/// Receipt status is not success.
	ExecutionFailed,
	/// Receipt has no log at the given index.
	MissingLog(usize),
	/// Oracle has no hash for the block number.
	UnknownBlock(u64),
	/// Header does not hash to the block hash known to the oracle.
	BlockHashMismatch {
		/// Hash known to the oracle.
		expected: H256,
		/// Hash of the offered header.
		found: H256,
	},
	/// Header carries another block number than the target one.
	BlockNumberMismatch {
		/// Target block number.
		expected: u64,
		/// Number in the header.
		found: u64,
	},
	/// The ledger refused a transfer authorized by verified evidence.
	TransferFailed,
}

impl From<DecoderError> for Error {
	fn from(e: DecoderError) -> Self {
		Error::MalformedEncoding(e)
	}
}

impl From<ProofError> for Error {
	fn from(e: ProofError) -> Self {
		match e {
			VerifyError::DecodeError(e) => Error::MalformedEncoding(e),
			VerifyError::ValueMismatch(_) => Error::ValueMismatch(Field::TrieValue),
			e => Error::InvalidProof(e),
		}
	}
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Field::TrieValue => write!(f, "trie value"),
			Field::Emitter => write!(f, "log emitter"),
			Field::Signature => write!(f, "event signature"),
			Field::TopicCount => write!(f, "topic count"),
			Field::Topic(index) => write!(f, "topic {}", index),
			Field::Data => write!(f, "log data"),
			Field::To => write!(f, "recipient"),
			Field::Value => write!(f, "value"),
		}
	}
}

#[cfg(feature = "std")]
impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::MalformedEncoding(err) => write!(f, "Malformed encoding: {}", err),
			Error::InvalidProof(err) => write!(f, "Invalid proof: {}", err),
			Error::ValueMismatch(field) => write!(f, "Unexpected {}", field),
			Error::UnsupportedType(ty) => write!(f, "Unsupported envelope type {:#04x}", ty),
			Error::ExecutionFailed => write!(f, "Transaction execution failed"),
			Error::MissingLog(index) => write!(f, "Receipt has no log {}", index),
			Error::UnknownBlock(number) => write!(f, "No hash known for block {}", number),
			Error::BlockHashMismatch { expected, found } =>
				write!(f, "Header hashes to {:?}, expected {:?}", found, expected),
			Error::BlockNumberMismatch { expected, found } =>
				write!(f, "Header is block {}, expected {}", found, expected),
			Error::TransferFailed => write!(f, "Ledger transfer failed"),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::MalformedEncoding(err) => Some(err),
			Error::InvalidProof(err) => Some(err),
			_ => None,
		}
	}
}

/// Evidence result type.
pub type Result<T> = rstd::result::Result<T, Error>;

/// Canonical big-endian integer of at most 32 bytes.
fn decode_u256(buf: &[u8], offset: usize) -> rlp_view::Result<U256> {
	let (bytes, _) = rlp_view::decode_bytes(buf, offset)?;
	if bytes.len() > 32 || bytes.first() == Some(&0) {
		return Err(DecoderError::InvalidInteger)
	}
	Ok(U256::from_big_endian(bytes))
}
