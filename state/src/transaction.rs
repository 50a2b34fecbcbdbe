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

//! Unsigned and signed transactions. Field order matches the wire format
//! exactly -- it is part of the hash, not just the schema.

use serde::{Deserialize, Serialize};
use tbs_util::{Account, Hash};

/// Reserved `data` tag: only the miner-reward credit, and legacy-log
/// replay, may carry it. User intake must reject it.
pub const REWARD_TX_DATA: &str = tbs_util::config::REWARD_TX_DATA;

/// An unsigned value transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
	pub from: Account,
	pub to: Account,
	pub value: u64,
	pub nonce: u64,
	pub data: String,
	pub time: u64,
}

impl Tx {
	pub fn new(from: Account, to: Account, value: u64, nonce: u64, data: impl Into<String>, time: u64) -> Tx {
		Tx { from, to, value, nonce, data: data.into(), time }
	}

	pub fn is_reward(&self) -> bool {
		self.data == REWARD_TX_DATA
	}

	/// Canonical JSON encoding of the unsigned transaction: the payload a
	/// signature covers, and the preimage of `hash`.
	pub fn canonical_bytes(&self) -> Vec<u8> {
		serde_json::to_vec(self).expect("Tx serialization cannot fail")
	}

	/// SHA-256 of the canonical encoding. This is the transaction's
	/// identity hash, distinct from the digest a signature covers (see
	/// `tbs_crypto::signer`, which signs Keccak-256 of the same bytes).
	pub fn hash(&self) -> Hash {
		Hash::of(&self.canonical_bytes())
	}
}

/// A `Tx` plus the 65-byte recoverable signature over its canonical
/// encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTx {
	#[serde(flatten)]
	pub tx: Tx,
	#[serde(with = "hex_signature")]
	pub signature: [u8; 65],
}

impl SignedTx {
	pub fn new(tx: Tx, signature: [u8; 65]) -> SignedTx {
		SignedTx { tx, signature }
	}

	pub fn is_reward(&self) -> bool {
		self.tx.is_reward()
	}

	/// Hash of the signed transaction as a whole (what keys `pending_txs`
	/// / `archived_txs` and is checked for replay). Equal to the unsigned
	/// hash unless callers specifically need to key by a
	/// signature-inclusive identity; TBS uses the unsigned hash for
	/// replay detection, matching `Tx::hash`.
	pub fn hash(&self) -> Hash {
		self.tx.hash()
	}

	/// Recover the account that produced `signature` and compare it
	/// against `from`. This is invariant 7 from the data model: a
	/// transaction's signature must recover to its claimed sender.
	pub fn verify_signature(&self) -> Result<(), crate::StateError> {
		let recovered = tbs_crypto::recover(&self.tx.canonical_bytes(), &self.signature)
			.map_err(|_| crate::StateError::ForgedSignature)?;
		if recovered != self.tx.from {
			return Err(crate::StateError::ForgedSignature);
		}
		Ok(())
	}
}

mod hex_signature {
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(sig: &[u8; 65], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&hex::encode(sig))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 65], D::Error> {
		let s = String::deserialize(deserializer)?;
		let bytes = hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
		bytes.try_into().map_err(|_| serde::de::Error::custom("signature must be 65 bytes"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn account(byte: u8) -> Account {
		Account::from_bytes([byte; 20])
	}

	#[test]
	fn hash_is_stable_for_equal_transactions() {
		let a = Tx::new(account(1), account(2), 100, 1, "", 42);
		let b = Tx::new(account(1), account(2), 100, 1, "", 42);
		assert_eq!(a.hash(), b.hash());
	}

	#[test]
	fn hash_changes_with_any_field() {
		let base = Tx::new(account(1), account(2), 100, 1, "", 42);
		let bumped_value = Tx::new(account(1), account(2), 101, 1, "", 42);
		assert_ne!(base.hash(), bumped_value.hash());
	}

	#[test]
	fn reward_tag_is_recognized() {
		let reward = Tx::new(account(1), account(2), 100, 0, REWARD_TX_DATA, 0);
		assert!(reward.is_reward());
		let normal = Tx::new(account(1), account(2), 100, 1, "", 0);
		assert!(!normal.is_reward());
	}

	#[test]
	fn signed_tx_round_trips_through_json() {
		let tx = Tx::new(account(1), account(2), 100, 1, "", 42);
		let signed = SignedTx::new(tx, [7u8; 65]);
		let json = serde_json::to_string(&signed).unwrap();
		let back: SignedTx = serde_json::from_str(&json).unwrap();
		assert_eq!(signed, back);
	}
}
