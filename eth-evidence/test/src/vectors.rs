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

//! Encodings produced by other Ethereum clients.

use crate::block::int;
use eth_evidence::{
	block_hash, extract_block_number, extract_receipts_root, extract_state_root,
	extract_transactions_root, field_count, trie_key, validate_event, validate_native_transfer,
	validate_status, verify_native_transfer_evidence, Error, ExpectedEvent, Field,
	TransactionEvidence, H160, H256, U256,
};
use hex_literal::hex;
use reference_trie::ReferenceTrie;
use rlp_view::{decode_list_exact, encode_list, encoded_bytes};
use std::collections::BTreeMap;

/// Block 1 of a test chain: header, one legacy transaction, no uncles.
const BLOCK: [u8; 613] = hex!("f90262f901f9a092230ce5476ae868e98c7979cfc165a93f8b6ad1922acf2df62e340916efd49da01dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347942adc25665018aa1fe0e6bc666dac8fc2697ff9baa02307107a867056ca33b5087e77c4174f47625e48fb49f1c70ced34890ddd88f3a08151d548273f6683169524b66ca9fe338b9ce42bc3540046c828fd939ae23bcba0c598f69a5674cae9337261b669970e24abc0b46e6d284372a239ec8ccbf20b0ab901000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000083020000018502540be40082a8618203e800a00000000000000000000000000000000000000000000000000000000000000000880000000000000000f863f861800a8405f5e10094100000000000000000000000000000000000000080801ba07e09e26678ed4fac08a249ebe8ed680bf9051a5e14ad223e4b2b9d26e0208f37a05f6e3f188e3e6eab7d7d3b6568f5eac7d687b08d307d3154ccd8c87b4630509bc0");

/// Failed legacy receipt with a single log, from EIP-2481.
const LEGACY_RECEIPT: [u8; 361] = hex!("f901668001b9010000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000f85ff85d940000000000000000000000000000000000000011f842a0000000000000000000000000000000000000000000000000000000000000deada0000000000000000000000000000000000000000000000000000000000000beef830100ff");

/// Logs bloom of a receipt with one log of the zero address.
const ZERO_ADDRESS_BLOOM: [u8; 256] = hex!("00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001");

/// Header and transactions of `BLOCK`.
fn block_parts() -> (Vec<u8>, Vec<Vec<u8>>) {
	let block = decode_list_exact(&BLOCK).unwrap();
	let header = block.nth(0).unwrap().to_vec();
	let transactions = decode_list_exact(block.nth(1).unwrap())
		.unwrap()
		.iter()
		.map(|tx| tx.unwrap().to_vec())
		.collect();
	(header, transactions)
}

#[test]
fn block_header_fields() {
	let (header, transactions) = block_parts();
	assert_eq!(&header[..3], &hex!("f901f9")[..]);
	assert_eq!(field_count(&header), Ok(15));
	assert_eq!(extract_block_number(&header), Ok(1));
	assert_eq!(
		extract_state_root(&header),
		Ok(H256(hex!("2307107a867056ca33b5087e77c4174f47625e48fb49f1c70ced34890ddd88f3"))),
	);
	assert_eq!(
		extract_receipts_root(&header),
		Ok(H256(hex!("c598f69a5674cae9337261b669970e24abc0b46e6d284372a239ec8ccbf20b0a"))),
	);

	let transactions_root = extract_transactions_root(&header).unwrap();
	assert_eq!(
		transactions_root,
		H256(hex!("8151d548273f6683169524b66ca9fe338b9ce42bc3540046c828fd939ae23bcb")),
	);
	assert_eq!(transactions.len(), 1);
	assert_eq!(H256(ReferenceTrie::ordered(&transactions).root()), transactions_root);
}

#[test]
fn block_transaction() {
	let (header, transactions) = block_parts();
	let to = H160(hex!("1000000000000000000000000000000000000000"));
	assert_eq!(validate_native_transfer(&transactions[0], &to, &U256::zero()), Ok(()));
	assert_eq!(
		validate_native_transfer(&transactions[0], &to, &U256::one()),
		Err(Error::ValueMismatch(Field::Value)),
	);

	let trie = ReferenceTrie::ordered(&transactions);
	let proof = encode_list(trie.generate_proof(&trie_key(0)));
	let path = trie_key(0);
	let evidence = TransactionEvidence {
		header: &header,
		transaction: &transactions[0],
		proof: &proof,
		path: &path,
	};
	let mut oracle = BTreeMap::new();
	oracle.insert(1u64, block_hash(&header));
	assert_eq!(
		verify_native_transfer_evidence(&oracle, 1, &evidence, &to, &U256::zero()),
		Ok(()),
	);
}

#[test]
fn legacy_receipt() {
	assert_eq!(validate_status(&LEGACY_RECEIPT), Err(Error::ExecutionFailed));
	let expected = ExpectedEvent {
		emitter: H160(hex!("0000000000000000000000000000000000000011")),
		signature: H256(hex!("000000000000000000000000000000000000000000000000000000000000dead")),
		topics: vec![Some(H256(hex!(
			"000000000000000000000000000000000000000000000000000000000000beef"
		)))],
		data: U256::from(0x0100ff),
	};
	assert_eq!(validate_event(&LEGACY_RECEIPT, 0, &expected), Ok(()));
	assert_eq!(validate_event(&LEGACY_RECEIPT, 1, &expected), Err(Error::MissingLog(1)));

	// Status byte right after the list header, flipped to success.
	let mut succeeded = LEGACY_RECEIPT.to_vec();
	assert_eq!(&succeeded[..4], &hex!("f9016680")[..]);
	succeeded[3] = 0x01;
	assert_eq!(validate_status(&succeeded), Ok(()));
	assert_eq!(validate_event(&succeeded, 0, &expected), Ok(()));

	// The same bodies behind an EIP-1559 type byte.
	let cases = [(&LEGACY_RECEIPT[..], Err(Error::ExecutionFailed)), (&succeeded[..], Ok(()))];
	for (body, status) in cases {
		let mut typed = vec![0x02];
		typed.extend_from_slice(body);
		assert_eq!(validate_status(&typed), status);
		assert_eq!(validate_event(&typed, 0, &expected), Ok(()));
	}
}

#[test]
fn receipts_root_of_access_list_receipt() {
	let log = encode_list(vec![
		encoded_bytes(&[0u8; 20]),
		encode_list(Vec::<Vec<u8>>::new()),
		encoded_bytes(&[]),
	]);
	let body = encode_list(vec![
		encoded_bytes(&[0x01]),
		int(102068),
		encoded_bytes(&ZERO_ADDRESS_BLOOM),
		encode_list(vec![log]),
	]);
	let mut receipt = vec![0x01];
	receipt.extend_from_slice(&body);

	assert_eq!(validate_status(&receipt), Ok(()));
	assert_eq!(
		ReferenceTrie::ordered(&[receipt]).root(),
		hex!("fe70ae4a136d98944951b2123859698d59ad251a381abc9960fa81cae3d0d4a0"),
	);
}
