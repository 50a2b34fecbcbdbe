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

//! Wire DTOs for the node's five HTTP routes. Neither `tbs-rpc` (the
//! server side) nor `tbs-sync` (the client side) should define these
//! twice -- both depend on this crate so their JSON shapes cannot drift
//! apart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tbs_state::Block;
use tbs_util::{Account, Hash};

/// A peer this node knows about. `is_active` tracks whether the peer has
/// acknowledged us via `/node/peer`; `is_bootstrap` marks the
/// configured bootstrap peer, which is never pruned on sync failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerNode {
	pub ip: String,
	pub port: u16,
	pub account: Account,
	pub is_bootstrap: bool,
	pub is_active: bool,
}

impl PeerNode {
	pub fn new(ip: impl Into<String>, port: u16, account: Account, is_bootstrap: bool) -> PeerNode {
		PeerNode { ip: ip.into(), port, account, is_bootstrap, is_active: true }
	}

	/// `ip:port`, used as the key of `known_peers`.
	pub fn tcp_address(&self) -> String {
		format!("{}:{}", self.ip, self.port)
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalancesListRes {
	pub block_hash: Hash,
	pub balances: BTreeMap<Account, u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusRes {
	pub block_hash: Hash,
	pub block_number: u64,
	pub peers_known: Vec<PeerNode>,
	pub pending_txs: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddTxReq {
	pub from: Account,
	pub from_pwd: String,
	pub to: Account,
	pub value: u64,
	pub data: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddTxRes {
	pub success: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncRes {
	pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddPeerRes {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Every failed request returns this body with a `500` status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorRes {
	pub error: String,
}

impl ErrorRes {
	pub fn new(message: impl Into<String>) -> ErrorRes {
		ErrorRes { error: message.into() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tcp_address_joins_ip_and_port() {
		let peer = PeerNode::new("127.0.0.1", 8080, Account::from_bytes([1; 20]), true);
		assert_eq!(peer.tcp_address(), "127.0.0.1:8080");
	}

	#[test]
	fn error_res_omits_error_field_when_absent_on_add_peer_res() {
		let res = AddPeerRes { success: true, error: None };
		let json = serde_json::to_string(&res).unwrap();
		assert!(!json.contains("error"));
	}
}
