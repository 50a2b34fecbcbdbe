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

//! The append-only block log and the genesis file, and `BlockStore`, which
//! glues the on-disk log to an in-memory `tbs_state::Ledger` so that an
//! append always lands before the ledger's in-memory swap.

pub mod error;
pub mod genesis;
pub mod layout;

pub use error::StoreError;
pub use genesis::Genesis;

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};

use tbs_state::block::{Block, BlockFs};
use tbs_state::ledger::Ledger;
use tbs_util::Hash;

/// Owns the block log file and the `Ledger` it backs. All writes to the
/// ledger go through here, so the log and memory never drift apart.
pub struct BlockStore {
	dir: layout::DataDir,
	log: File,
	ledger: Ledger,
}

impl BlockStore {
	/// Initialize `data_dir` if absent (writes `genesis.json` and an empty
	/// `block.db`), load genesis balances, open the log for append+read,
	/// and replay every record into a fresh `Ledger`.
	pub fn new_from_disk(data_dir: impl Into<std::path::PathBuf>, genesis: &Genesis) -> Result<BlockStore, StoreError> {
		let dir = layout::DataDir::new(data_dir);
		dir.init_if_absent(genesis)?;

		let loaded_genesis = genesis::load(&dir.genesis_json_path())?;
		let mut ledger = Ledger::from_genesis_balances(loaded_genesis.balances);

		let log = OpenOptions::new()
			.read(true)
			.append(true)
			.open(dir.block_db_path())
			.map_err(StoreError::Io)?;

		let reader = BufReader::new(File::open(dir.block_db_path()).map_err(StoreError::Io)?);
		for line in reader.lines() {
			let line = line.map_err(StoreError::Io)?;
			if line.trim().is_empty() {
				continue;
			}
			let record: BlockFs = serde_json::from_str(&line).map_err(StoreError::Codec)?;
			ledger.add_block(record.value).map_err(StoreError::Validation)?;
		}

		log::info!("loaded chain at {}, block {}", dir.block_db_path().display(), ledger.next_block_number());
		Ok(BlockStore { dir, log, ledger })
	}

	pub fn ledger(&self) -> &Ledger {
		&self.ledger
	}

	/// The sole mutator: stage `block` against the ledger, append the
	/// resulting record to the log, then commit. Appending before the
	/// in-memory swap means a crash mid-write leaves the live ledger
	/// exactly as it was before the call.
	pub fn add_block(&mut self, block: Block) -> Result<Hash, StoreError> {
		let staged = self.ledger.stage_block(block).map_err(StoreError::Validation)?;
		let record = BlockFs { hash: staged.hash(), value: staged.block().clone() };
		self.append(&record)?;
		Ok(self.ledger.commit_staged(staged))
	}

	/// `add_block` each of `blocks` in order; stop at the first rejection.
	pub fn add_blocks(&mut self, blocks: impl IntoIterator<Item = Block>) -> Result<(), StoreError> {
		for block in blocks {
			self.add_block(block)?;
		}
		Ok(())
	}

	fn append(&mut self, record: &BlockFs) -> Result<(), StoreError> {
		let mut line = serde_json::to_vec(record).map_err(StoreError::Codec)?;
		line.push(b'\n');
		self.log.write_all(&line).map_err(StoreError::Io)?;
		self.log.flush().map_err(StoreError::Io)
	}

	/// Scan the log for the first record whose hash equals `after`,
	/// collecting every subsequent block. `Hash::zero()` returns the
	/// entire chain.
	pub fn blocks_after(&self, after: Hash) -> Result<Vec<Block>, StoreError> {
		let file = File::open(self.dir.block_db_path()).map_err(StoreError::Io)?;
		let reader = BufReader::new(file);

		let mut collecting = after.is_empty();
		let mut out = Vec::new();
		for line in reader.lines() {
			let line = line.map_err(StoreError::Io)?;
			if line.trim().is_empty() {
				continue;
			}
			let record: BlockFs = serde_json::from_str(&line).map_err(StoreError::Codec)?;
			if collecting {
				out.push(record.value);
			} else if record.hash == after {
				collecting = true;
			}
		}
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::OsRng;
	use tbs_crypto::{KeyPair, Signer};
	use tbs_state::ledger::is_valid_pow;
	use tbs_state::{BlockHeader, SignedTx, Tx};
	use tbs_util::Account;

	fn temp_dir(label: &str) -> std::path::PathBuf {
		use std::sync::atomic::{AtomicU64, Ordering};
		static COUNTER: AtomicU64 = AtomicU64::new(0);
		let count = COUNTER.fetch_add(1, Ordering::Relaxed);
		let nanos = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos();
		let mut path = std::env::temp_dir();
		path.push(format!("tbs-store-test-{}-{}-{}", label, nanos, count));
		path
	}

	fn mine_one(parent: Hash, number: u64, miner: Account, txs: Vec<SignedTx>) -> Block {
		let mut nonce = 0u32;
		loop {
			let header = BlockHeader { parent, number, nonce, time: 1, miner };
			let block = Block::new(header, txs.clone());
			if is_valid_pow(&block.hash()) {
				return block;
			}
			nonce += 1;
		}
	}

	fn sample_genesis() -> (Genesis, KeyPair) {
		let key = KeyPair::generate(&mut OsRng);
		let mut balances = std::collections::BTreeMap::new();
		balances.insert(key.account(), 1_000_000);
		(Genesis { genesis_time: "2026-01-01T00:00:00Z".into(), chain_id: "tbs-test-ledger".into(), balances }, key)
	}

	#[test]
	fn fresh_directory_is_initialized_and_empty() {
		let dir = temp_dir("fresh");
		let (genesis, _key) = sample_genesis();
		let store = BlockStore::new_from_disk(&dir, &genesis).unwrap();
		assert!(!store.ledger().has_genesis());
		assert_eq!(store.ledger().next_block_number(), 0);
	}

	#[test]
	fn appended_blocks_survive_replay() {
		let dir = temp_dir("replay");
		let (genesis, key) = sample_genesis();
		let miner = Account::from_bytes([9; 20]);
		let to = Account::from_bytes([2; 20]);

		let hash_after_mining = {
			let mut store = BlockStore::new_from_disk(&dir, &genesis).unwrap();
			let tx = Tx::new(key.account(), to, 100, 1, "", 1);
			let signature = key.sign(&tx.canonical_bytes(), &key.account()).unwrap();
			let block = mine_one(Hash::zero(), 0, miner, vec![SignedTx::new(tx, signature)]);
			store.add_block(block).unwrap()
		};

		let reopened = BlockStore::new_from_disk(&dir, &genesis).unwrap();
		assert_eq!(reopened.ledger().latest_block_hash(), hash_after_mining);
		assert_eq!(reopened.ledger().balance_of(&to), 100);
	}

	#[test]
	fn blocks_after_zero_hash_returns_the_whole_chain() {
		let dir = temp_dir("blocks-after");
		let (genesis, key) = sample_genesis();
		let miner = Account::from_bytes([9; 20]);
		let to = Account::from_bytes([2; 20]);

		let mut store = BlockStore::new_from_disk(&dir, &genesis).unwrap();
		let tx = Tx::new(key.account(), to, 50, 1, "", 1);
		let signature = key.sign(&tx.canonical_bytes(), &key.account()).unwrap();
		let block = mine_one(Hash::zero(), 0, miner, vec![SignedTx::new(tx, signature)]);
		store.add_block(block).unwrap();

		let all = store.blocks_after(Hash::zero()).unwrap();
		assert_eq!(all.len(), 1);
	}
}
