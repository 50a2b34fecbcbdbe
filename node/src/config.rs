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

use std::path::PathBuf;
use std::time::Duration;

use tbs_api::PeerNode;
use tbs_util::Account;
use tbs_util::config::{DEFAULT_PORT, MINING_INTERVAL_SECS, SYNC_INTERVAL_SECS};

pub struct NodeConfig {
	pub data_dir: PathBuf,
	pub ip: String,
	pub port: u16,
	pub miner: Account,
	pub bootstrap: Option<PeerNode>,
	pub mining_interval: Duration,
	pub sync_interval: Duration,
}

impl NodeConfig {
	pub fn new(data_dir: impl Into<PathBuf>, ip: impl Into<String>, miner: Account) -> NodeConfig {
		NodeConfig {
			data_dir: data_dir.into(),
			ip: ip.into(),
			port: DEFAULT_PORT,
			miner,
			bootstrap: None,
			mining_interval: Duration::from_secs(MINING_INTERVAL_SECS),
			sync_interval: Duration::from_secs(SYNC_INTERVAL_SECS),
		}
	}

	pub fn with_bootstrap_peer(mut self, ip: impl Into<String>, port: u16, account: Account) -> NodeConfig {
		self.bootstrap = Some(PeerNode::new(ip, port, account, true));
		self
	}

	pub fn self_info(&self) -> PeerNode {
		PeerNode::new(self.ip.clone(), self.port, self.miner, false)
	}

	pub fn addr(&self) -> String {
		format!("{}:{}", self.ip, self.port)
	}
}
