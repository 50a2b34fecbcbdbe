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

//! Periodic reconciliation with every known peer. Accepted blocks are
//! routed through `node.synced_blocks_sender()` rather than applied here
//! directly, so a block arriving mid-mining-attempt preempts it (the mine
//! loop is the only place `store.add_block` is called).

use std::sync::Arc;
use std::time::Duration;

use tbs_sync::{new_peers_from_status, sync_once};

use crate::node::Node;

const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Run the sync loop until `node.shutdown_handle()` is triggered. Blocks
/// the calling thread -- run it on its own `std::thread`.
pub fn run(node: Arc<Node>, sync_interval: Duration) {
	let shutdown = node.shutdown_handle();
	let ticker = crossbeam_channel::tick(sync_interval);
	let http = reqwest::blocking::Client::new();

	loop {
		crossbeam_channel::select! {
			recv(ticker) -> _ => sync_with_all_known_peers(&node, &http),
			default(SHUTDOWN_POLL_INTERVAL) => {}
		}

		if shutdown.is_triggered() {
			return;
		}
	}
}

fn sync_with_all_known_peers(node: &Arc<Node>, http: &reqwest::blocking::Client) {
	let self_addr = node.info().tcp_address();
	for peer in node.known_peers_snapshot() {
		if peer.tcp_address() == self_addr {
			continue;
		}
		sync_with_one_peer(node, http, &peer);
	}
}

fn sync_with_one_peer(node: &Arc<Node>, http: &reqwest::blocking::Client, peer: &tbs_api::PeerNode) {
	let (local_hash, local_number, local_has_genesis) = {
		let store = node.store.lock();
		(store.ledger().latest_block_hash(), store.ledger().next_block_number(), store.ledger().has_genesis())
	};

	let update = match sync_once(http, peer, peer.is_active, node.info(), local_hash, local_number, local_has_genesis) {
		Ok(update) => update,
		Err(err) => {
			log::warn!("dropping peer {}: {}", peer.tcp_address(), err);
			node.remove_peer(&peer.tcp_address());
			return;
		}
	};

	if update.registered_self {
		node.mark_peer_active(&peer.tcp_address(), true);
	}

	let known: std::collections::HashMap<String, tbs_api::PeerNode> =
		node.known_peers_snapshot().into_iter().map(|p| (p.tcp_address(), p)).collect();
	let self_addr = self_tcp_address(node);
	for discovered in new_peers_from_status(&update.status, &known) {
		if discovered.tcp_address() != self_addr {
			node.merge_peer(discovered.clone());
		}
	}

	for block in update.new_blocks {
		let _ = node.synced_blocks_sender().send(block);
	}
}

fn self_tcp_address(node: &Arc<Node>) -> String {
	node.info().tcp_address()
}
