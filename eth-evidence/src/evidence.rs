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

//! Combined evidence: an authenticated header, an inclusion proof under one
//! of its roots and a check of the proven item.

use crate::header::{extract_receipts_root, extract_transactions_root};
use crate::oracle::{authenticate_header, ChainOracle, Ledger};
use crate::receipt::{validate_event, validate_status, ExpectedEvent};
use crate::rstd::vec::Vec;
use crate::transaction::validate_native_transfer;
use crate::{Error, EthereumLayout, Result, H160, H256, U256};
use hash_db::NodeLookup;
use keccak_hasher::KeccakHasher;
use log::debug;
use mpt_verify::{verify_multi_proof, verify_proof};
use rlp_view::{decode_item, decode_list_exact, encode_u64, Item};

/// Evidence that a transaction emitted an event.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ReceiptEvidence<'a> {
	/// RLP encoded block header.
	pub header: &'a [u8],
	/// Enveloped receipt, as stored in the receipts trie.
	pub receipt: &'a [u8],
	/// RLP list of the trie nodes from the root to the receipt.
	pub proof: &'a [u8],
	/// Trie key of the receipt, the RLP encoded transaction index.
	pub path: &'a [u8],
	/// Position of the event in the receipt logs.
	pub log_index: usize,
}

/// Evidence that a transaction was included in a block.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TransactionEvidence<'a> {
	/// RLP encoded block header.
	pub header: &'a [u8],
	/// Enveloped transaction, as stored in the transactions trie.
	pub transaction: &'a [u8],
	/// RLP list of the trie nodes from the root to the transaction.
	pub proof: &'a [u8],
	/// Trie key of the transaction, its RLP encoded index.
	pub path: &'a [u8],
}

/// Trie key of the transaction or receipt at `index` of a block.
pub fn trie_key(index: u64) -> Vec<u8> {
	let mut key = Vec::new();
	encode_u64(index, &mut key);
	key
}

/// Split an RLP list of proof nodes.
///
/// Nodes are usually listed as is. Nodes wrapped in a byte string are
/// unwrapped.
pub fn decode_proof_nodes(proof: &[u8]) -> Result<Vec<&[u8]>> {
	let list = decode_list_exact(proof)?;
	let mut nodes = Vec::new();
	for node in list.iter() {
		let node = node?;
		let node = match decode_item(node, 0)?.0 {
			Item::ShortString(inner) | Item::LongString(inner) => inner,
			Item::Byte(_) | Item::ShortList(_) | Item::LongList(_) => node,
		};
		nodes.push(node);
	}
	Ok(nodes)
}

fn verify_inclusion(root: &H256, proof: &[u8], key: &[u8], value: &[u8]) -> Result<()> {
	let nodes = decode_proof_nodes(proof)?;
	verify_proof::<EthereumLayout, _>(&root.0, &nodes, key, value).map_err(|e| {
		debug!(target: "evidence", "Inclusion proof under {:?} rejected: {:?}", root, e);
		e.into()
	})
}

/// Check `evidence` proves the `expected` event was emitted in block `target`
/// by a successful transaction.
pub fn verify_event_evidence<O: ChainOracle + ?Sized>(
	oracle: &O,
	target: u64,
	evidence: &ReceiptEvidence,
	expected: &ExpectedEvent,
) -> Result<()> {
	authenticate_header(oracle, evidence.header, target)?;
	let root = extract_receipts_root(evidence.header)?;
	verify_inclusion(&root, evidence.proof, evidence.path, evidence.receipt)?;
	validate_status(evidence.receipt)?;
	validate_event(evidence.receipt, evidence.log_index, expected)
}

/// Pay `amount` to `payee` through `ledger` once `evidence` proves the
/// `expected` event in block `target`. Rejected evidence moves nothing.
pub fn release_on_event_evidence<O, L>(
	oracle: &O,
	ledger: &mut L,
	target: u64,
	evidence: &ReceiptEvidence,
	expected: &ExpectedEvent,
	payee: &H160,
	amount: &U256,
) -> Result<()>
where
	O: ChainOracle + ?Sized,
	L: Ledger + ?Sized,
{
	verify_event_evidence(oracle, target, evidence, expected)?;
	ledger.transfer(payee, amount).map_err(|e| {
		debug!(target: "evidence", "Transfer of {} to {:?} refused: {:?}", amount, payee, e);
		Error::TransferFailed
	})
}

/// Check `evidence` proves a transfer of `value` wei to `to` was included in
/// block `target`.
pub fn verify_native_transfer_evidence<O: ChainOracle + ?Sized>(
	oracle: &O,
	target: u64,
	evidence: &TransactionEvidence,
	to: &H160,
	value: &U256,
) -> Result<()> {
	authenticate_header(oracle, evidence.header, target)?;
	let root = extract_transactions_root(evidence.header)?;
	verify_inclusion(&root, evidence.proof, evidence.path, evidence.transaction)?;
	validate_native_transfer(evidence.transaction, to, value)
}

/// Check every `(index, receipt)` pair is in the receipts trie of `root`,
/// hash referenced nodes being resolved through `nodes`.
pub fn verify_receipts_multi<D, I, R>(root: &H256, nodes: &D, receipts: I) -> Result<()>
where
	D: NodeLookup<KeccakHasher> + ?Sized,
	I: IntoIterator<Item = (u64, R)>,
	R: AsRef<[u8]>,
{
	let items = receipts.into_iter().map(|(index, receipt)| (trie_key(index), receipt));
	Ok(verify_multi_proof::<EthereumLayout, _, _, _, _>(&root.0, nodes, items)?)
}
