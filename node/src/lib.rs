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

//! Wires the mine loop, the sync loop and the HTTP server to a single
//! `Node`, and runs all three until shut down.

pub mod config;
pub mod mine_loop;
pub mod node;
pub mod sync_loop;

pub use config::NodeConfig;
pub use node::{Node, Shutdown};

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tbs_rpc::{serve, RpcError, ShutdownFlag};

/// The three long-lived tasks, running on their own threads. Dropping
/// this (or calling `Node::shutdown_handle().trigger()`) and then joining
/// brings the node down cleanly: the HTTP server stops accepting, the
/// sync ticker stops, and any in-flight mining attempt is left to finish
/// its current PoW iteration before mine_loop notices the shutdown flag.
pub struct NodeHandles {
	pub mine: JoinHandle<()>,
	pub sync: JoinHandle<()>,
	pub http: JoinHandle<Result<(), RpcError>>,
}

/// Spawn the mine loop, the sync loop and the HTTP server for `node`, and
/// return their join handles. Does not block.
pub fn run(node: Arc<Node>, config: &NodeConfig) -> NodeHandles {
	let addr = config.addr();
	let mining_interval = config.mining_interval;
	let sync_interval = config.sync_interval;

	let mine_node = node.clone();
	let mine = std::thread::spawn(move || mine_loop::run(mine_node, mining_interval));

	let sync_node = node.clone();
	let sync = std::thread::spawn(move || sync_loop::run(sync_node, sync_interval));

	let http_shutdown = ShutdownFlag::new();
	let bridge_shutdown = node.shutdown_handle();
	let bridge_flag = http_shutdown.clone();
	std::thread::spawn(move || {
		while !bridge_shutdown.is_triggered() {
			std::thread::sleep(Duration::from_millis(200));
		}
		bridge_flag.shutdown();
	});

	let http_node: Arc<dyn tbs_rpc::NodeApi> = node;
	let http = std::thread::spawn(move || serve(http_node, &addr, http_shutdown));

	NodeHandles { mine, sync, http }
}
