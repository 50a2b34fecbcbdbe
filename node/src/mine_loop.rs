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

//! The mining tick and the synced-block listener, folded into a single
//! thread so that `store.add_block` is only ever called from here --
//! that is what gives the rest of the node "add_block is atomic from the
//! outside" for free, without a node-wide lock.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use tbs_miner::{mine, CancelHandle, MineError, PendingBlock};
use tbs_state::Block;
use tbs_util::time::now_unix;

use crate::node::Node;

const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

enum MineOutcome {
	Mined(Block),
	Cancelled,
}

/// Run the mine loop until `node.shutdown_handle()` is triggered. Blocks
/// the calling thread -- run it on its own `std::thread`.
pub fn run(node: Arc<Node>, mining_interval: Duration) {
	let shutdown = node.shutdown_handle();
	let ticker = crossbeam_channel::tick(mining_interval);
	let synced_rx = node.synced_blocks_receiver();
	let current_cancel: Arc<Mutex<Option<CancelHandle>>> = Arc::new(Mutex::new(None));
	let (done_tx, done_rx): (Sender<MineOutcome>, Receiver<MineOutcome>) = crossbeam_channel::bounded(1);

	loop {
		crossbeam_channel::select! {
			recv(ticker) -> _ => {
				maybe_start_mining(&node, &current_cancel, done_tx.clone());
			}
			recv(synced_rx) -> msg => {
				if let Ok(block) = msg {
					handle_synced_block(&node, &current_cancel, block);
				}
			}
			recv(done_rx) -> outcome => {
				if let Ok(outcome) = outcome {
					handle_mine_done(&node, &current_cancel, outcome);
				}
			}
			default(SHUTDOWN_POLL_INTERVAL) => {
				if shutdown.is_triggered() {
					return;
				}
			}
		}

		if shutdown.is_triggered() {
			return;
		}
	}
}

fn maybe_start_mining(node: &Arc<Node>, current_cancel: &Arc<Mutex<Option<CancelHandle>>>, done_tx: Sender<MineOutcome>) {
	if node.is_mining.load(Ordering::SeqCst) {
		return;
	}
	let txs = node.pending_txs_snapshot();
	if txs.is_empty() {
		return;
	}

	node.is_mining.store(true, Ordering::SeqCst);
	let cancel = CancelHandle::new();
	*current_cancel.lock() = Some(cancel.clone());

	let (parent, number) = {
		let store = node.store.lock();
		(store.ledger().latest_block_hash(), store.ledger().next_block_number())
	};

	let pending = PendingBlock { parent, number, time: now_unix(), miner: node.info().account, txs };

	std::thread::spawn(move || {
		let outcome = match mine(pending, &cancel) {
			Ok(block) => MineOutcome::Mined(block),
			Err(MineError::Cancelled) => MineOutcome::Cancelled,
			Err(MineError::EmptyBlock) => MineOutcome::Cancelled,
		};
		let _ = done_tx.send(outcome);
	});
}

fn handle_mine_done(node: &Arc<Node>, current_cancel: &Arc<Mutex<Option<CancelHandle>>>, outcome: MineOutcome) {
	*current_cancel.lock() = None;

	if let MineOutcome::Mined(block) = outcome {
		let mut store = node.store.lock();
		match store.add_block(block.clone()) {
			Ok(_) => {
				drop(store);
				node.remove_mined_pending_txs(&block);
				log::info!("mined block {}", block.header.number);
			}
			Err(err) => log::warn!("mined block rejected by the ledger: {}", err),
		}
	}

	node.is_mining.store(false, Ordering::SeqCst);
}

fn handle_synced_block(node: &Arc<Node>, current_cancel: &Arc<Mutex<Option<CancelHandle>>>, block: Block) {
	if node.is_mining.load(Ordering::SeqCst) {
		if let Some(cancel) = current_cancel.lock().as_ref() {
			cancel.cancel();
		}
	}

	let mut store = node.store.lock();
	match store.add_block(block.clone()) {
		Ok(_) => {
			drop(store);
			node.remove_mined_pending_txs(&block);
		}
		Err(err) => log::warn!("synced block rejected by the ledger: {}", err),
	}
}
