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

use crate::block::{receipt, transfer_log, Block, TOKEN};
use eth_evidence::{
	decode_proof_nodes, trie_key, validate_status, verify_receipts_multi, Error, Field, TxType,
	H256,
};
use keccak_hasher::KeccakHasher;
use memory_db::MemoryDB;
use mpt_verify::VerifyError;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Node set of the receipt proofs of `indices`, built from their RLP lists.
fn proofs_of(block: &Block, indices: &[u64]) -> MemoryDB<KeccakHasher> {
	let mut db = MemoryDB::new();
	for index in indices {
		let proof = block.receipt_proof(*index);
		for node in decode_proof_nodes(&proof).unwrap() {
			db.insert(node);
		}
	}
	db
}

#[test]
fn receipts_of_a_block() {
	let _ = env_logger::builder().is_test(true).try_init();
	let block = Block::with_transfer_at(150, 3);
	let root = H256(block.receipts_trie.root());

	let all = block.receipts.iter().enumerate().map(|(i, r)| (i as u64, r));
	assert_eq!(verify_receipts_multi(&root, block.receipts_trie.db(), all), Ok(()));

	let mut rng = SmallRng::seed_from_u64(3);
	let mut indices: Vec<u64> = (0..10).map(|_| rng.gen_range(0..150)).collect();
	indices.sort();
	indices.dedup();
	let db = proofs_of(&block, &indices);
	assert!(db.len() < block.receipts_trie.db().len());
	let selected = indices.iter().map(|i| (*i, &block.receipts[*i as usize]));
	assert_eq!(verify_receipts_multi(&root, &db, selected.clone()), Ok(()));
	assert_eq!(verify_receipts_multi(&root, &db, selected.rev()), Ok(()));
}

#[test]
fn unproven_and_forged_receipts() {
	let block = Block::with_transfer_at(40, 3);
	let root = H256(block.receipts_trie.root());
	let db = proofs_of(&block, &[3, 4]);

	// Receipt 0x20 sits under another branch than 3 and 4.
	let items = vec![(3, &block.receipts[3]), (0x20, &block.receipts[0x20])];
	let missing = verify_receipts_multi(&root, &db, items);
	assert!(matches!(missing, Err(Error::InvalidProof(VerifyError::MissingNode(_)))));

	let forged = receipt(TxType::Legacy, true, 1, vec![transfer_log(&TOKEN)]);
	assert_eq!(
		verify_receipts_multi(&root, &db, vec![(4, &forged)]),
		Err(Error::ValueMismatch(Field::TrieValue)),
	);
	assert_eq!(
		verify_receipts_multi(&root, &db, vec![(3, &block.receipts[4])]),
		Err(Error::ValueMismatch(Field::TrieValue)),
	);
}

#[test]
fn proven_then_checked() {
	let receipts: Vec<Vec<u8>> = (0..5u64)
		.map(|i| receipt(TxType::AccessList, i % 2 == 0, 21_000 * (i + 1), vec![]))
		.collect();
	let block = Block::new(1, Vec::new(), receipts);
	let root = H256(block.receipts_trie.root());
	let indices: Vec<u64> = (0..5).collect();
	let db = proofs_of(&block, &indices);
	let proven = indices.iter().map(|i| (*i, &block.receipts[*i as usize]));
	assert_eq!(verify_receipts_multi(&root, &db, proven), Ok(()));

	let statuses: Vec<_> = block.receipts.iter().map(|r| validate_status(r)).collect();
	assert_eq!(
		statuses,
		vec![Ok(()), Err(Error::ExecutionFailed), Ok(()), Err(Error::ExecutionFailed), Ok(())],
	);
	assert_eq!(trie_key(4), vec![0x04]);
}
