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

//! A block arriving over sync preempts whatever the mine loop is
//! currently searching for, and its transactions are archived either
//! way.

use std::sync::Arc;
use std::time::Duration;

use tbs_devtools::{mine_block, signed_transfer, temp_data_dir, test_genesis, test_keypair};
use tbs_node::{mine_loop, Node, NodeConfig};
use tbs_rpc::NodeApi;
use tbs_store::BlockStore;
use tbs_util::Hash;

#[test]
fn synced_block_cancels_an_in_flight_mining_attempt() {
	let miner_key = test_keypair();
	let sender_key = test_keypair();
	let genesis = test_genesis(&[sender_key.clone()], 10_000);

	let store = BlockStore::new_from_disk(temp_data_dir("mining-cancel"), &genesis).unwrap();
	let config = NodeConfig::new(temp_data_dir("mining-cancel-cfg"), "127.0.0.1", miner_key.account());
	let node = Arc::new(Node::new(&config, store, Arc::new(miner_key.clone())));

	let tx = signed_transfer(&sender_key, miner_key.account(), 1, 1, 1);
	node.add_pending_tx(tx.clone()).unwrap();

	let mine_node = node.clone();
	std::thread::spawn(move || mine_loop::run(mine_node, Duration::from_millis(20)));

	// Give the mine loop's ticker time to fire and start searching; a
	// single-tx block at this difficulty takes long enough on average
	// that the window below reliably lands mid-search.
	std::thread::sleep(Duration::from_millis(150));
	assert!(node.is_mining(), "mine loop should have picked up the pending tx by now");

	let synced = mine_block(Hash::zero(), 0, 1, miner_key.account(), vec![tx.clone()]);
	node.synced_blocks_sender().send(synced.clone()).unwrap();

	let deadline = std::time::Instant::now() + Duration::from_secs(10);
	while node.is_mining() && std::time::Instant::now() < deadline {
		std::thread::sleep(Duration::from_millis(20));
	}

	assert!(!node.is_mining(), "the synced block should have stopped the mining attempt");
	assert_eq!(node.status().block_hash, synced.hash());
	assert_eq!(node.pending_tx_count(), 0, "the tx carried by the synced block must be archived, not left pending");
}
