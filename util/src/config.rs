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

//! Chain-wide constants. Kept here rather than scattered across crates so
//! that `tbs-state`, `tbs-miner` and `tbs-node` agree on one definition.

/// Number of leading hex digits of a block hash that must be `'0'`.
pub const MINING_DIFFICULTY: usize = 6;

/// Credited to the miner of a block, on top of collected gas fees.
pub const BLOCK_REWARD: u64 = 100;

/// Flat fee charged on every user transaction, credited to the miner.
pub const TX_GAS_FEE: u64 = 50;

/// How often the node attempts to mine a block out of the mempool.
pub const MINING_INTERVAL_SECS: u64 = 10;

/// How often the node pulls status/blocks/peers from each known peer.
pub const SYNC_INTERVAL_SECS: u64 = 45;

/// Default HTTP port for the node's RPC surface.
pub const DEFAULT_PORT: u16 = 8080;

/// Reserved transaction `data` tag: only the miner-reward credit and
/// legacy-log replay may produce a transaction with this tag.
pub const REWARD_TX_DATA: &str = "reward";

/// Bound on the `new_pending_txs` channel (backpressure, not a silent drop).
pub const PENDING_TX_CHANNEL_CAPACITY: usize = 10_000;
