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

//! Proof-of-work search. `mine` is pure: it never touches the ledger, the
//! block log or the mempool, and returns a sealed block for the caller to
//! accept.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tbs_state::block::{Block, BlockHeader};
use tbs_state::ledger::is_valid_pow;
use tbs_state::transaction::SignedTx;
use tbs_util::{Account, Hash};

/// A block's worth of metadata not yet sealed by a nonce.
pub struct PendingBlock {
	pub parent: Hash,
	pub number: u64,
	pub time: u64,
	pub miner: Account,
	pub txs: Vec<SignedTx>,
}

/// A cooperative cancellation flag, cloneable and shareable across the
/// mine/sync/HTTP tasks. Checked roughly every 4096 nonces inside the PoW
/// loop so a synced block can preempt mining within milliseconds.
#[derive(Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
	pub fn new() -> CancelHandle {
		CancelHandle(Arc::new(AtomicBool::new(false)))
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

const CANCELLATION_CHECK_INTERVAL: u32 = 4096;

/// Search for a nonce that makes `pending`'s block hash satisfy the
/// difficulty predicate. Polls `cancel` every `CANCELLATION_CHECK_INTERVAL`
/// nonces; aborts with `MineError::Cancelled` the moment it is signalled.
pub fn mine(pending: PendingBlock, cancel: &CancelHandle) -> Result<Block, MineError> {
	if pending.txs.is_empty() {
		return Err(MineError::EmptyBlock);
	}

	let mut nonce: u32 = 0;
	loop {
		let header = BlockHeader {
			parent: pending.parent,
			number: pending.number,
			nonce,
			time: pending.time,
			miner: pending.miner,
		};
		let block = Block::new(header, pending.txs.clone());

		if is_valid_pow(&block.hash()) {
			return Ok(block);
		}

		if nonce % CANCELLATION_CHECK_INTERVAL == 0 {
			if cancel.is_cancelled() {
				return Err(MineError::Cancelled);
			}
			if nonce % 1_000_000 < CANCELLATION_CHECK_INTERVAL {
				log::debug!("mining: block {} at nonce {}", pending.number, nonce);
			}
		}

		nonce = nonce.wrapping_add(1);
	}
}

#[derive(Debug, PartialEq, Eq)]
pub enum MineError {
	/// `pending` carried no transactions.
	EmptyBlock,
	/// The cancellation handle was signalled mid-search.
	Cancelled,
}

impl fmt::Display for MineError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MineError::EmptyBlock => write!(f, "mining empty blocks is forbidden"),
			MineError::Cancelled => write!(f, "mining cancelled"),
		}
	}
}

impl std::error::Error for MineError {}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::OsRng;
	use tbs_crypto::{KeyPair, Signer};
	use tbs_state::Tx;

	fn one_tx() -> Vec<SignedTx> {
		let key = KeyPair::generate(&mut OsRng);
		let to = Account::from_bytes([2; 20]);
		let tx = Tx::new(key.account(), to, 1, 1, "", 1);
		let signature = key.sign(&tx.canonical_bytes(), &key.account()).unwrap();
		vec![SignedTx::new(tx, signature)]
	}

	#[test]
	fn mining_an_empty_block_is_forbidden() {
		let pending = PendingBlock { parent: Hash::zero(), number: 0, time: 1, miner: Account::from_bytes([9; 20]), txs: vec![] };
		let cancel = CancelHandle::new();
		assert_eq!(mine(pending, &cancel), Err(MineError::EmptyBlock));
	}

	#[test]
	fn mining_produces_a_block_satisfying_the_difficulty_predicate() {
		let pending =
			PendingBlock { parent: Hash::zero(), number: 0, time: 1, miner: Account::from_bytes([9; 20]), txs: one_tx() };
		let cancel = CancelHandle::new();
		let block = mine(pending, &cancel).unwrap();
		assert!(is_valid_pow(&block.hash()));
	}

	#[test]
	fn a_pre_cancelled_handle_aborts_immediately() {
		let pending =
			PendingBlock { parent: Hash::zero(), number: 0, time: 1, miner: Account::from_bytes([9; 20]), txs: one_tx() };
		let cancel = CancelHandle::new();
		cancel.cancel();
		assert_eq!(mine(pending, &cancel), Err(MineError::Cancelled));
	}

	#[test]
	fn cancelling_from_another_thread_stops_a_running_search() {
		use std::thread;
		use std::time::Duration;

		let pending =
			PendingBlock { parent: Hash::zero(), number: 12345, time: 1, miner: Account::from_bytes([9; 20]), txs: one_tx() };
		let cancel = CancelHandle::new();
		let canceller = cancel.clone();

		thread::spawn(move || {
			thread::sleep(Duration::from_micros(100));
			canceller.cancel();
		});

		let result = mine(pending, &cancel);
		assert_eq!(result, Err(MineError::Cancelled));
	}
}
