// Copyright 2026 TBS Developers.
// This file is part of TBS.

// TBS is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// TBS is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with TBS.  If not, see <http://www.gnu.org/licenses/>.

//! Blocks and their headers. Like `Tx`, field declaration order is the
//! wire order and therefore part of the hash.

use serde::{Deserialize, Serialize};
use tbs_util::{Account, Hash};

use crate::transaction::SignedTx;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
	pub parent: Hash,
	pub number: u64,
	pub nonce: u32,
	pub time: u64,
	pub miner: Account,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
	pub header: BlockHeader,
	pub txs: Vec<SignedTx>,
}

impl Block {
	pub fn new(header: BlockHeader, txs: Vec<SignedTx>) -> Block {
		Block { header, txs }
	}

	/// Canonical JSON encoding of the block, the preimage of `hash` and
	/// the subject of the difficulty predicate.
	pub fn canonical_bytes(&self) -> Vec<u8> {
		serde_json::to_vec(self).expect("Block serialization cannot fail")
	}

	/// SHA-256 of the canonical encoding.
	pub fn hash(&self) -> Hash {
		Hash::of(&self.canonical_bytes())
	}

	/// Txs sorted by ascending `time`, ties broken by original order
	/// (a stable sort). This is the order `apply_block` applies them in
	/// and the order they are persisted in.
	pub fn txs_in_application_order(&self) -> Vec<SignedTx> {
		let mut txs = self.txs.clone();
		txs.sort_by_key(|signed| signed.tx.time);
		txs
	}
}

/// One line of the block log: a block paired with its own hash, so a
/// reader need not recompute it to index by hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockFs {
	pub hash: Hash,
	pub value: Block,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn header(number: u64, nonce: u32) -> BlockHeader {
		BlockHeader { parent: Hash::zero(), number, nonce, time: 1, miner: Account::from_bytes([9; 20]) }
	}

	#[test]
	fn hash_changes_with_nonce() {
		let a = Block::new(header(0, 0), vec![]);
		let b = Block::new(header(0, 1), vec![]);
		assert_ne!(a.hash(), b.hash());
	}

	#[test]
	fn txs_are_sorted_by_time_stably() {
		let mk = |time: u64| {
			let tx = crate::Tx::new(Account::from_bytes([1; 20]), Account::from_bytes([2; 20]), 1, 1, "", time);
			SignedTx::new(tx, [0u8; 65])
		};
		let block = Block::new(header(1, 0), vec![mk(5), mk(1), mk(3)]);
		let ordered = block.txs_in_application_order();
		let times: Vec<u64> = ordered.iter().map(|s| s.tx.time).collect();
		assert_eq!(times, vec![1, 3, 5]);
	}
}
