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

//! The 20-byte account address, derived elsewhere (see `tbs-crypto`) from
//! the Keccak-256 hash of an uncompressed secp256k1 public key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Account(pub [u8; 20]);

impl Account {
	/// Build an account directly from raw bytes, skipping derivation.
	/// Used by genesis loading and tests, where the address is already
	/// known rather than derived from a public key.
	pub fn from_bytes(bytes: [u8; 20]) -> Account {
		Account(bytes)
	}

	pub fn as_bytes(&self) -> &[u8; 20] {
		&self.0
	}

	/// Lowercase hex, no checksum, no `0x` prefix -- used nowhere at the
	/// API boundary but handy for logging.
	pub fn to_hex_lower(&self) -> String {
		hex::encode(self.0)
	}

	/// EIP-55 mixed-case checksum encoding with a `0x` prefix, used in
	/// every JSON response that names an account.
	pub fn to_checksum_hex(&self) -> String {
		let lower = self.to_hex_lower();
		let mut keccak = Keccak::v256();
		let mut digest = [0u8; 32];
		keccak.update(lower.as_bytes());
		keccak.finalize(&mut digest);

		let mut out = String::with_capacity(42);
		out.push_str("0x");
		for (i, c) in lower.chars().enumerate() {
			if c.is_ascii_digit() {
				out.push(c);
				continue;
			}
			// nibble i of the hash selects upper/lower case for hex digit i
			let nibble = if i % 2 == 0 { digest[i / 2] >> 4 } else { digest[i / 2] & 0x0f };
			if nibble >= 8 {
				out.push(c.to_ascii_uppercase());
			} else {
				out.push(c);
			}
		}
		out
	}
}

impl fmt::Display for Account {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_checksum_hex())
	}
}

impl fmt::Debug for Account {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Account({})", self)
	}
}

impl FromStr for Account {
	type Err = AccountParseError;

	fn from_str(s: &str) -> Result<Account, AccountParseError> {
		let trimmed = s.strip_prefix("0x").unwrap_or(s);
		let bytes = hex::decode(trimmed).map_err(|_| AccountParseError)?;
		let array: [u8; 20] = bytes.try_into().map_err(|_| AccountParseError)?;
		Ok(Account(array))
	}
}

/// Returned when a hex string is not a valid 20-byte account address.
#[derive(Debug)]
pub struct AccountParseError;

impl fmt::Display for AccountParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "invalid account: expected 40 hex characters, optionally 0x-prefixed")
	}
}

impl std::error::Error for AccountParseError {}

impl Serialize for Account {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_checksum_hex())
	}
}

impl<'de> Deserialize<'de> for Account {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Account, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

/// Keccak-256 of `bytes`. Exposed for `tbs-crypto`'s account derivation and
/// for the ECDSA signing digest (the wire format signs Keccak-256 of the
/// canonical transaction encoding, not the SHA-256 identity hash).
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
	let mut keccak = Keccak::v256();
	let mut out = [0u8; 32];
	keccak.update(bytes);
	keccak.finalize(&mut out);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn checksum_is_case_insensitively_equal_to_lower() {
		let account = Account([0xabu8; 20]);
		let checksum = account.to_checksum_hex();
		assert_eq!(checksum.to_lowercase(), format!("0x{}", account.to_hex_lower()));
	}

	#[test]
	fn parses_with_and_without_prefix() {
		let a: Account = "0x0000000000000000000000000000000000000001".parse().unwrap();
		let b: Account = "0000000000000000000000000000000000000001".parse().unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn rejects_wrong_length() {
		let res: Result<Account, _> = "0x1234".parse();
		assert!(res.is_err());
	}

	#[test]
	fn comparable_by_value() {
		let a = Account([1u8; 20]);
		let b = Account([1u8; 20]);
		let c = Account([2u8; 20]);
		assert_eq!(a, b);
		assert_ne!(a, c);
	}
}
