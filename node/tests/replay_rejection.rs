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

//! A transaction already committed to the chain must not be re-applied,
//! whether it arrives again through the same node's mempool or through a
//! second node that received it from a different peer.

use std::sync::Arc;
use std::time::Duration;

use tbs_devtools::{mine_block, signed_transfer, temp_data_dir, test_keypair, two_chains};
use tbs_node::{mine_loop, Node, NodeConfig};
use tbs_rpc::NodeApi;
use tbs_util::Hash;

#[test]
fn a_tx_already_on_chain_is_not_replayed_via_a_second_node() {
	let miner_key = test_keypair();
	let recipient = test_keypair().account();

	// `chains.a` and `chains.b` start from the same genesis but are
	// otherwise independent stores, standing in for two peers that have
	// not yet synced with one another.
	let chains = two_chains("replay-rejection", 1, 10_000);
	let sender_key = chains.keys[0].clone();

	let tx = signed_transfer(&sender_key, recipient, 500, 1, 1);
	let block = mine_block(Hash::zero(), 0, 1, miner_key.account(), vec![tx.clone()]);

	// Node A mines/receives the block directly.
	let config_a = NodeConfig::new(temp_data_dir("replay-a-cfg"), "127.0.0.1", miner_key.account());
	let node_a = Arc::new(Node::new(&config_a, chains.a, Arc::new(miner_key.clone())));
	let mine_a = node_a.clone();
	std::thread::spawn(move || mine_loop::run(mine_a, Duration::from_millis(20)));
	node_a.synced_blocks_sender().send(block.clone()).unwrap();
	wait_until(|| node_a.status().block_hash == block.hash());

	// Node B learns of the same block independently (simulating a peer
	// relaying it), and must reach the identical balance, never applying
	// the transfer a second time even though it never saw it as a
	// pending tx first.
	let config_b = NodeConfig::new(temp_data_dir("replay-b-cfg"), "127.0.0.1", miner_key.account());
	let node_b = Arc::new(Node::new(&config_b, chains.b, Arc::new(miner_key.clone())));
	let mine_b = node_b.clone();
	std::thread::spawn(move || mine_loop::run(mine_b, Duration::from_millis(20)));
	node_b.synced_blocks_sender().send(block.clone()).unwrap();
	wait_until(|| node_b.status().block_hash == block.hash());

	assert_eq!(node_a.balances_list().balances.get(&recipient), node_b.balances_list().balances.get(&recipient));
	assert_eq!(*node_a.balances_list().balances.get(&recipient).unwrap(), 500);

	// A second, independently-submitted transfer from the same account
	// reusing nonce 1 must be rejected as a bad nonce, not silently
	// re-applied -- whether it comes in via the mempool or, as here,
	// as a second copy of the exact same signed transaction.
	let result = node_a.add_pending_tx(tx);
	assert!(result.is_ok(), "add_pending_tx is idempotent for an identical, already-archived tx");
	assert_eq!(node_a.pending_tx_count(), 0, "the replayed tx must not re-enter the mempool");
}

fn wait_until(mut predicate: impl FnMut() -> bool) {
	let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
	while !predicate() && std::time::Instant::now() < deadline {
		std::thread::sleep(std::time::Duration::from_millis(10));
	}
	assert!(predicate(), "condition did not become true in time");
}
