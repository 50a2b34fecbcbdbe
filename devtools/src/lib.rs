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

//! Test-only fixtures shared across crates: unique temp data directories,
//! a deterministic keypair generator, a brute-force block miner for tests
//! that don't want to pull in `tbs-miner`'s cooperative cancellation, and
//! a small two-chain harness for exercising replay and sync scenarios.
//!
//! Not used by any non-test code; every crate that depends on this one
//! does so only under `[dev-dependencies]`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::OsRng;

use tbs_crypto::{KeyPair, Signer};
use tbs_state::ledger::is_valid_pow;
use tbs_state::{Block, BlockHeader, SignedTx, Tx};
use tbs_store::{BlockStore, Genesis};
use tbs_util::{Account, Hash};

static DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A fresh, unique path under the system temp dir. Does not create the
/// directory -- `BlockStore::new_from_disk` does that.
pub fn temp_data_dir(label: &str) -> PathBuf {
	let count = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
	let nanos = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos();
	let mut path = std::env::temp_dir();
	path.push(format!("tbs-devtools-{}-{}-{}-{}", label, std::process::id(), nanos, count));
	path
}

/// A fresh keypair. Not seeded -- "deterministic" here means "one call
/// always yields a usable, distinct account", not a fixed test vector.
pub fn test_keypair() -> KeyPair {
	KeyPair::generate(&mut OsRng)
}

/// `count` distinct keypairs, handy for seeding a genesis balance map.
pub fn test_keypairs(count: usize) -> Vec<KeyPair> {
	(0..count).map(|_| test_keypair()).collect()
}

/// A signed, validly-nonced transfer from `from`'s keypair to `to`.
pub fn signed_transfer(from: &KeyPair, to: Account, value: u64, nonce: u64, time: u64) -> SignedTx {
	let tx = Tx::new(from.account(), to, value, nonce, "", time);
	let signature = from.sign(&tx.canonical_bytes(), &from.account()).expect("signing with a held key cannot fail");
	SignedTx::new(tx, signature)
}

/// A genesis crediting each of `keys` with `balance_per_account`.
pub fn test_genesis(keys: &[KeyPair], balance_per_account: u64) -> Genesis {
	let mut balances = BTreeMap::new();
	for key in keys {
		balances.insert(key.account(), balance_per_account);
	}
	Genesis { genesis_time: "2026-01-01T00:00:00Z".into(), chain_id: "tbs-devtools".into(), balances }
}

/// Brute-force a valid-PoW block. Deliberately independent of
/// `tbs-miner`'s `CancelHandle` machinery -- tests that only need a block
/// on the chain, not mining semantics, should not have to thread a
/// cancellation handle through.
pub fn mine_block(parent: Hash, number: u64, time: u64, miner: Account, txs: Vec<SignedTx>) -> Block {
	let mut nonce: u32 = 0;
	loop {
		let header = BlockHeader { parent, number, nonce, time, miner };
		let block = Block::new(header, txs.clone());
		if is_valid_pow(&block.hash()) {
			return block;
		}
		nonce = nonce.wrapping_add(1);
	}
}

/// Two independently-initialized `BlockStore`s sharing one genesis, as a
/// stand-in for two peers starting from the same chain tip. Neither
/// store knows about the other; a test drives replication by hand
/// (mine on one, fetch `blocks_after` / `add_block` into the other).
pub struct TwoChains {
	pub genesis: Genesis,
	pub keys: Vec<KeyPair>,
	pub a: BlockStore,
	pub b: BlockStore,
}

/// Seed `account_count` funded accounts and open two fresh stores against
/// the same genesis at distinct temp directories.
pub fn two_chains(label: &str, account_count: usize, balance_per_account: u64) -> TwoChains {
	let keys = test_keypairs(account_count);
	let genesis = test_genesis(&keys, balance_per_account);

	let a = BlockStore::new_from_disk(temp_data_dir(&format!("{}-a", label)), &genesis).expect("fresh store a opens");
	let b = BlockStore::new_from_disk(temp_data_dir(&format!("{}-b", label)), &genesis).expect("fresh store b opens");

	TwoChains { genesis, keys, a, b }
}

/// A keypair-seeded deterministic byte source, for tests that want the
/// *shape* of randomness without depending on `OsRng`'s availability in
/// restricted sandboxes.
pub fn deterministic_secret_bytes(seed: u64) -> [u8; 32] {
	let mut bytes = [0u8; 32];
	let mut state = seed.wrapping_mul(0x9E3779B97F4A7C15).wrapping_add(1);
	for chunk in bytes.chunks_mut(8) {
		state ^= state << 13;
		state ^= state >> 7;
		state ^= state << 17;
		chunk.copy_from_slice(&state.to_le_bytes()[..chunk.len()]);
	}
	bytes
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn temp_data_dir_is_unique_across_calls() {
		let a = temp_data_dir("x");
		let b = temp_data_dir("x");
		assert_ne!(a, b);
	}

	#[test]
	fn deterministic_secret_bytes_is_a_function_of_the_seed() {
		assert_eq!(deterministic_secret_bytes(7), deterministic_secret_bytes(7));
		assert_ne!(deterministic_secret_bytes(7), deterministic_secret_bytes(8));
	}

	#[test]
	fn two_chains_share_a_genesis_but_are_independent_stores() {
		let chains = two_chains("share", 2, 1_000);
		assert_eq!(chains.a.ledger().balance_of(&chains.keys[0].account()), 1_000);
		assert_eq!(chains.b.ledger().balance_of(&chains.keys[0].account()), 1_000);
		assert!(!chains.a.ledger().has_genesis());
	}

	#[test]
	fn mine_block_produces_a_block_satisfying_the_difficulty_predicate() {
		let key = test_keypair();
		let tx = signed_transfer(&key, Account::from_bytes([3; 20]), 1, 1, 1);
		let block = mine_block(Hash::zero(), 0, 1, key.account(), vec![tx]);
		assert!(is_valid_pow(&block.hash()));
	}
}
