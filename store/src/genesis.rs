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

//! The genesis file: written exactly once, at a data directory's first
//! initialization, and read back on every startup thereafter.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tbs_util::Account;

use crate::error::StoreError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Genesis {
	pub genesis_time: String,
	pub chain_id: String,
	pub balances: BTreeMap<Account, u64>,
}

pub fn load(path: &Path) -> Result<Genesis, StoreError> {
	let bytes = std::fs::read(path).map_err(StoreError::Io)?;
	serde_json::from_slice(&bytes).map_err(StoreError::Codec)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_through_json() {
		let mut balances = BTreeMap::new();
		balances.insert(Account::from_bytes([1; 20]), 1_000_000);
		let genesis = Genesis { genesis_time: "2026-01-01T00:00:00Z".into(), chain_id: "tbs-test-ledger".into(), balances };

		let bytes = serde_json::to_vec(&genesis).unwrap();
		let back: Genesis = serde_json::from_slice(&bytes).unwrap();
		assert_eq!(back.chain_id, genesis.chain_id);
		assert_eq!(back.balances, genesis.balances);
	}
}
