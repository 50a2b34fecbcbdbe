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

//! One round of the pull protocol against a single peer. `tbs-node` calls
//! this once per known peer per sync tick and folds the result into its
//! own state; this crate never touches `known_peers`, the mempool, or the
//! ledger directly.

use std::time::Duration;

use tbs_api::{AddPeerRes, PeerNode, StatusRes, SyncRes};
use tbs_state::Block;
use tbs_util::Hash;

use crate::error::SyncError;

/// Short enough that an unreachable peer does not stall a sync tick; the
/// peer is retried on the next tick regardless.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything learned from one peer in one tick. The caller is
/// responsible for merging `new_peers` into its own `known_peers`,
/// applying `new_blocks` to the ledger (optionally routing them through
/// the mining-cancellation channel), and updating the peer's
/// `is_active` flag.
pub struct PeerUpdate {
	pub status: StatusRes,
	pub registered_self: bool,
	pub new_blocks: Vec<Block>,
}

/// Run one sync round against `peer`. `local_hash`/`local_number`/
/// `local_has_genesis` describe the caller's own chain tip; `self_info`
/// is what to register as if the peer does not yet know us.
pub fn sync_once(
	http: &reqwest::blocking::Client,
	peer: &PeerNode,
	peer_considers_us_active: bool,
	self_info: &PeerNode,
	local_hash: Hash,
	local_number: u64,
	local_has_genesis: bool,
) -> Result<PeerUpdate, SyncError> {
	let status = query_status(http, peer)?;

	let registered_self = if !peer_considers_us_active {
		register_self(http, peer, self_info)?
	} else {
		false
	};

	let new_blocks = fetch_new_blocks(http, peer, &status, local_hash, local_number, local_has_genesis)?;

	Ok(PeerUpdate { status, registered_self, new_blocks })
}

fn query_status(http: &reqwest::blocking::Client, peer: &PeerNode) -> Result<StatusRes, SyncError> {
	let url = format!("http://{}/node/status", peer.tcp_address());
	let response = http.get(&url).timeout(REQUEST_TIMEOUT).send().map_err(SyncError::PeerUnreachable)?;
	response.json::<StatusRes>().map_err(SyncError::MalformedResponse)
}

fn register_self(
	http: &reqwest::blocking::Client,
	peer: &PeerNode,
	self_info: &PeerNode,
) -> Result<bool, SyncError> {
	let url = format!(
		"http://{}/node/peer?ip={}&port={}&miner={}",
		peer.tcp_address(),
		self_info.ip,
		self_info.port,
		self_info.account
	);
	let response = http.get(&url).timeout(REQUEST_TIMEOUT).send().map_err(SyncError::PeerUnreachable)?;
	let res: AddPeerRes = response.json().map_err(SyncError::MalformedResponse)?;
	Ok(res.success)
}

fn fetch_new_blocks(
	http: &reqwest::blocking::Client,
	peer: &PeerNode,
	status: &StatusRes,
	local_hash: Hash,
	local_number: u64,
	local_has_genesis: bool,
) -> Result<Vec<Block>, SyncError> {
	let both_at_genesis = status.block_number == 0 && local_number == 0 && !local_has_genesis;
	if status.block_hash.is_empty() && !both_at_genesis {
		return Ok(Vec::new());
	}
	if status.block_number < local_number {
		return Ok(Vec::new());
	}

	let url = format!("http://{}/node/sync?fromBlock={}", peer.tcp_address(), local_hash);
	let response = http.get(&url).timeout(REQUEST_TIMEOUT).send().map_err(SyncError::PeerUnreachable)?;
	let res: SyncRes = response.json().map_err(SyncError::MalformedResponse)?;
	Ok(res.blocks)
}

/// Peers advertised by a status response that are not yet in our own
/// `known_peers`, keyed by `PeerNode::tcp_address`.
pub fn new_peers_from_status<'a>(
	status: &'a StatusRes,
	known: &std::collections::HashMap<String, PeerNode>,
) -> Vec<&'a PeerNode> {
	status.peers_known.iter().filter(|p| !known.contains_key(&p.tcp_address())).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_peers_from_status_excludes_already_known() {
		let known_peer = PeerNode::new("127.0.0.1", 8081, tbs_util::Account::from_bytes([1; 20]), false);
		let unknown_peer = PeerNode::new("127.0.0.1", 8082, tbs_util::Account::from_bytes([2; 20]), false);

		let mut known = std::collections::HashMap::new();
		known.insert(known_peer.tcp_address(), known_peer.clone());

		let status = StatusRes {
			block_hash: Hash::zero(),
			block_number: 0,
			peers_known: vec![known_peer, unknown_peer.clone()],
			pending_txs: 0,
		};

		let fresh = new_peers_from_status(&status, &known);
		assert_eq!(fresh, vec![&unknown_peer]);
	}
}
