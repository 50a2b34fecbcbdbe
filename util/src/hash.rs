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

//! The 32-byte block/transaction hash type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A SHA-256 digest, displayed and parsed as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash(pub [u8; 32]);

impl Hash {
	/// The all-zero hash, used as the parent of the genesis block and as
	/// the sentinel value for "give me the whole chain" in `blocks_after`.
	pub const fn zero() -> Hash {
		Hash([0u8; 32])
	}

	/// SHA-256 of `bytes`.
	pub fn of(bytes: &[u8]) -> Hash {
		let digest = Sha256::digest(bytes);
		let mut out = [0u8; 32];
		out.copy_from_slice(&digest);
		Hash(out)
	}

	/// Whether every byte is zero.
	pub fn is_empty(&self) -> bool {
		self.0 == [0u8; 32]
	}

	/// First `n` hex digits of the lowercase encoding, used for the
	/// difficulty predicate.
	pub fn leading_hex_digits(&self, n: usize) -> String {
		let hex = self.to_string();
		hex.chars().take(n).collect()
	}
}

impl fmt::Display for Hash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Hash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Hash({})", self)
	}
}

impl FromStr for Hash {
	type Err = HashParseError;

	fn from_str(s: &str) -> Result<Hash, HashParseError> {
		let bytes = hex::decode(s).map_err(|_| HashParseError)?;
		let array: [u8; 32] = bytes.try_into().map_err(|_| HashParseError)?;
		Ok(Hash(array))
	}
}

/// Returned when a hex string is not a valid 32-byte hash.
#[derive(Debug)]
pub struct HashParseError;

impl fmt::Display for HashParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "invalid hash: expected 64 hex characters")
	}
}

impl std::error::Error for HashParseError {}

impl Serialize for Hash {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for Hash {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_is_empty() {
		assert!(Hash::zero().is_empty());
		assert!(!Hash::of(b"toshi").is_empty());
	}

	#[test]
	fn round_trips_through_hex() {
		let h = Hash::of(b"the-blockchain-shiba");
		let parsed: Hash = h.to_string().parse().unwrap();
		assert_eq!(h, parsed);
	}

	#[test]
	fn leading_digits_match_known_vector() {
		// sha256("") == e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85
		let h = Hash::of(b"");
		assert_eq!(h.leading_hex_digits(6), "e3b0c4");
	}
}
