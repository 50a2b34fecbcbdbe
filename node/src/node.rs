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

//! The `Node`: owns the ledger (via `tbs_store::BlockStore`), the
//! mempool, the archive, and the known-peer set, and implements
//! `tbs_rpc::NodeApi` so the HTTP surface can reach them.
//!
//! Discipline: every field that the mine loop, the sync loop and the RPC
//! handlers all touch is behind its own `parking_lot::Mutex`. `add_block`
//! is only ever called from the mine loop's thread (see `mine_loop.rs`),
//! which keeps `state.add_block` atomic from every other task's point of
//! view without a single global lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use tbs_api::{AddTxReq, BalancesListRes, PeerNode, StatusRes, SyncRes};
use tbs_crypto::Signer;
use tbs_rpc::{NodeApi, RpcError};
use tbs_state::{Block, SignedTx, Tx};
use tbs_store::BlockStore;
use tbs_util::config::PENDING_TX_CHANNEL_CAPACITY;
use tbs_util::{time::now_unix, Account, Hash};

use crate::config::NodeConfig;

/// A cloneable shutdown flag shared by the mine loop, the sync loop and
/// the HTTP server.
#[derive(Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
	pub fn new() -> Shutdown {
		Shutdown(Arc::new(AtomicBool::new(false)))
	}

	pub fn trigger(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_triggered(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

pub struct Node {
	pub(crate) info: PeerNode,
	pub(crate) store: Mutex<BlockStore>,
	pub(crate) known_peers: Mutex<HashMap<String, PeerNode>>,
	pub(crate) pending_txs: Mutex<HashMap<String, SignedTx>>,
	pub(crate) archived_txs: Mutex<HashMap<String, SignedTx>>,
	pub(crate) is_mining: AtomicBool,
	pub(crate) signer: Arc<dyn Signer + Send + Sync>,
	pub(crate) new_synced_blocks: (Sender<Block>, Receiver<Block>),
	pub(crate) new_pending_txs: (Sender<SignedTx>, Receiver<SignedTx>),
	pub(crate) shutdown: Shutdown,
}

impl Node {
	pub fn new(config: &NodeConfig, store: BlockStore, signer: Arc<dyn Signer + Send + Sync>) -> Node {
		let mut known_peers = HashMap::new();
		if let Some(bootstrap) = &config.bootstrap {
			known_peers.insert(bootstrap.tcp_address(), bootstrap.clone());
		}

		Node {
			info: config.self_info(),
			store: Mutex::new(store),
			known_peers: Mutex::new(known_peers),
			pending_txs: Mutex::new(HashMap::new()),
			archived_txs: Mutex::new(HashMap::new()),
			is_mining: AtomicBool::new(false),
			signer,
			new_synced_blocks: crossbeam_channel::bounded(0),
			new_pending_txs: crossbeam_channel::bounded(PENDING_TX_CHANNEL_CAPACITY),
			shutdown: Shutdown::new(),
		}
	}

	pub fn info(&self) -> &PeerNode {
		&self.info
	}

	pub fn shutdown_handle(&self) -> Shutdown {
		self.shutdown.clone()
	}

	pub fn synced_blocks_sender(&self) -> Sender<Block> {
		self.new_synced_blocks.0.clone()
	}

	pub fn synced_blocks_receiver(&self) -> Receiver<Block> {
		self.new_synced_blocks.1.clone()
	}

	pub fn known_peers_snapshot(&self) -> Vec<PeerNode> {
		self.known_peers.lock().values().cloned().collect()
	}

	pub fn mark_peer_active(&self, tcp_address: &str, active: bool) {
		if let Some(peer) = self.known_peers.lock().get_mut(tcp_address) {
			peer.is_active = active;
		}
	}

	pub fn remove_peer(&self, tcp_address: &str) {
		self.known_peers.lock().remove(tcp_address);
	}

	pub fn merge_peer(&self, peer: PeerNode) {
		self.known_peers.lock().entry(peer.tcp_address()).or_insert(peer);
	}

	/// Insert `tx` into the mempool unless it (or its outcome) has already
	/// been seen. Idempotent: a duplicate submission is a silent no-op.
	pub fn add_pending_tx(&self, tx: SignedTx) -> Result<(), RpcError> {
		let key = tx.hash().to_string();

		{
			let pending = self.pending_txs.lock();
			let archived = self.archived_txs.lock();
			if pending.contains_key(&key) || archived.contains_key(&key) {
				return Ok(());
			}
		}

		if tx.is_reward() {
			return Err(RpcError::Rejected("reward transactions are not accepted from users".into()));
		}

		tx.verify_signature()?;

		self.pending_txs.lock().insert(key, tx.clone());
		// Bounded and intentionally blocking: backpressure here is
		// preferable to silently dropping an accepted transaction.
		let _ = self.new_pending_txs.0.send(tx);
		Ok(())
	}

	/// Move every tx in `block` from pending to archived. Called for
	/// both locally mined blocks and blocks accepted via
	/// `new_synced_blocks`, so replay protection holds across both paths.
	pub fn remove_mined_pending_txs(&self, block: &Block) {
		let mut pending = self.pending_txs.lock();
		let mut archived = self.archived_txs.lock();
		for signed in &block.txs {
			let key = signed.hash().to_string();
			let tx = pending.remove(&key).unwrap_or_else(|| signed.clone());
			archived.insert(key, tx);
		}
	}

	pub fn pending_tx_count(&self) -> usize {
		self.pending_txs.lock().len()
	}

	pub fn pending_txs_snapshot(&self) -> Vec<SignedTx> {
		self.pending_txs.lock().values().cloned().collect()
	}

	pub fn is_mining(&self) -> bool {
		self.is_mining.load(Ordering::SeqCst)
	}
}

impl NodeApi for Node {
	fn balances_list(&self) -> BalancesListRes {
		let store = self.store.lock();
		BalancesListRes { block_hash: store.ledger().latest_block_hash(), balances: store.ledger().balances().clone() }
	}

	fn status(&self) -> StatusRes {
		let store = self.store.lock();
		StatusRes {
			block_hash: store.ledger().latest_block_hash(),
			block_number: store.ledger().last_block().map(|b| b.header.number).unwrap_or(0),
			peers_known: self.known_peers_snapshot(),
			pending_txs: self.pending_tx_count(),
		}
	}

	fn add_tx(&self, req: AddTxReq) -> Result<(), RpcError> {
		if req.data == tbs_state::transaction::REWARD_TX_DATA {
			return Err(RpcError::Rejected("reward transactions are not accepted from users".into()));
		}

		let store = self.store.lock();
		let nonce = store.ledger().next_account_nonce(&req.from);
		drop(store);

		let tx = Tx::new(req.from, req.to, req.value, nonce, req.data, now_unix());
		// `req.from_pwd` would unlock a real encrypted keystore; the
		// concrete signer here is out of scope for credential handling
		// (see tbs-crypto) and is looked up by account alone.
		let signature = self
			.signer
			.sign(&tx.canonical_bytes(), &req.from)
			.map_err(|e| RpcError::Rejected(e.to_string()))?;

		self.add_pending_tx(SignedTx::new(tx, signature))
	}

	fn sync_blocks_after(&self, from_block: Hash) -> SyncRes {
		let store = self.store.lock();
		let blocks = store.blocks_after(from_block).unwrap_or_default();
		SyncRes { blocks }
	}

	fn add_peer(&self, ip: String, port: u16, account: Account) -> Result<(), RpcError> {
		let peer = PeerNode::new(ip, port, account, false);
		self.merge_peer(peer);
		Ok(())
	}
}
