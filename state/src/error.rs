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

use std::fmt;

/// Everything that can make `apply_tx`/`apply_block` reject a value.
/// Rejection is total: a single bad transaction aborts the whole block,
/// and the live `Ledger` is left untouched.
#[derive(Debug, PartialEq, Eq)]
pub enum StateError {
	/// `tx.sig` does not recover to `tx.from`.
	ForgedSignature,
	/// A reward-tagged transaction arrived through user intake rather
	/// than the miner-reward mechanism or log replay.
	RewardTxNotAllowed,
	/// `tx.nonce != nonces[from] + 1`.
	BadNonce { expected: u64, got: u64 },
	/// `balances[from] < value + TxGasFee`.
	InsufficientBalance { have: u64, need: u64 },
	/// `block.header.number` did not follow the chain tip.
	BadBlockNumber { expected: u64, got: u64 },
	/// `block.header.parent != last_hash` for a non-genesis, non-first block.
	BadParentHash,
	/// The block hash did not satisfy the difficulty predicate.
	InvalidProofOfWork,
	/// A block carried no transactions.
	EmptyBlock,
}

impl fmt::Display for StateError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StateError::ForgedSignature => write!(f, "forged: signature does not recover to sender"),
			StateError::RewardTxNotAllowed => write!(f, "reward transactions are not accepted from users"),
			StateError::BadNonce { expected, got } => {
				write!(f, "bad nonce: expected {}, got {}", expected, got)
			}
			StateError::InsufficientBalance { have, need } => {
				write!(f, "insufficient balance: have {}, need {}", have, need)
			}
			StateError::BadBlockNumber { expected, got } => {
				write!(f, "bad block number: expected {}, got {}", expected, got)
			}
			StateError::BadParentHash => write!(f, "block parent does not match the chain tip"),
			StateError::InvalidProofOfWork => write!(f, "block hash does not satisfy the difficulty predicate"),
			StateError::EmptyBlock => write!(f, "mining empty blocks is forbidden"),
		}
	}
}

impl std::error::Error for StateError {}
