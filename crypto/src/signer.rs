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

//! The `Signer` capability and the free-standing `recover` used by
//! transaction verification. Every signature covers the Keccak-256 digest
//! of the payload, never the payload itself and never the SHA-256 identity
//! hash used for block and transaction hashing -- the two digests serve
//! different purposes and must not be confused.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};
use std::fmt;
use tbs_util::account::keccak256;
use tbs_util::Account;

/// A 65-byte recoverable ECDSA signature: a 64-byte compact `(r, s)` pair
/// followed by a single recovery-id byte (`0` or `1`).
pub type Signature = [u8; 65];

/// Something that can sign a payload on behalf of an `Account` it holds
/// the private key for. Key custody (encryption, password prompts,
/// on-disk format) is deliberately out of scope here; see
/// `tbs_crypto::keystore::PlaintextKeystore` for the one minimal
/// implementation this crate ships.
pub trait Signer {
	/// Sign `payload` as `account`. Fails if this signer does not hold a
	/// key for `account`.
	fn sign(&self, payload: &[u8], account: &Account) -> Result<Signature, SignerError>;
}

/// Recover the account that produced `signature` over `payload`. This is
/// the verification half of the signing covenant: it does not take an
/// expected account, since the caller (see `tbs-state`) must compare the
/// recovered account against the transaction's claimed `from` field.
pub fn recover(payload: &[u8], signature: &Signature) -> Result<Account, SignerError> {
	let digest = keccak256(payload);
	let message = Message::from_digest(digest);

	let recovery_id =
		RecoveryId::from_i32(signature[64] as i32).map_err(|_| SignerError::InvalidRecoveryId)?;
	let compact = &signature[..64];
	let recoverable = RecoverableSignature::from_compact(compact, recovery_id)
		.map_err(|_| SignerError::MalformedSignature)?;

	let secp = Secp256k1::verification_only();
	let public_key: PublicKey = secp
		.recover_ecdsa(&message, &recoverable)
		.map_err(|_| SignerError::RecoveryFailed)?;

	Ok(account_from_public_key(&public_key))
}

/// Derive the 20-byte account from an uncompressed public key: Keccak-256
/// of the 64-byte `(x, y)` encoding (the leading `0x04` tag is dropped),
/// keeping the low 20 bytes.
pub fn account_from_public_key(public_key: &PublicKey) -> Account {
	let uncompressed = public_key.serialize_uncompressed();
	let digest = keccak256(&uncompressed[1..]);
	let mut bytes = [0u8; 20];
	bytes.copy_from_slice(&digest[12..]);
	Account::from_bytes(bytes)
}

#[derive(Debug)]
pub enum SignerError {
	/// The signer was asked to sign on behalf of an account it has no key
	/// for.
	UnknownAccount(Account),
	/// A signature was not 65 bytes, or its recovery-id byte was not 0/1.
	InvalidRecoveryId,
	/// The 64-byte `(r, s)` portion of a signature did not parse.
	MalformedSignature,
	/// `libsecp256k1` could not recover a public key from the signature.
	RecoveryFailed,
}

impl fmt::Display for SignerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SignerError::UnknownAccount(account) => {
				write!(f, "no key held for account {}", account)
			}
			SignerError::InvalidRecoveryId => write!(f, "signature recovery id must be 0 or 1"),
			SignerError::MalformedSignature => write!(f, "malformed signature"),
			SignerError::RecoveryFailed => write!(f, "could not recover a public key from signature"),
		}
	}
}

impl std::error::Error for SignerError {}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::KeyPair;
	use rand::rngs::OsRng;

	#[test]
	fn sign_then_recover_round_trips_to_signing_account() {
		let key_pair = KeyPair::generate(&mut OsRng);
		let payload = br#"{"from":"x","to":"y","value":5}"#;

		let signature = key_pair.sign(payload, &key_pair.account()).unwrap();
		let recovered = recover(payload, &signature).unwrap();

		assert_eq!(recovered, key_pair.account());
	}

	#[test]
	fn forged_signature_does_not_recover_to_the_claimed_account() {
		let signer_key = KeyPair::generate(&mut OsRng);
		let attacker_key = KeyPair::generate(&mut OsRng);
		let payload = br#"{"from":"victim","to":"attacker","value":1000000}"#;

		let forged = attacker_key.sign(payload, &attacker_key.account()).unwrap();
		let recovered = recover(payload, &forged).unwrap();

		assert_ne!(recovered, signer_key.account());
	}

	#[test]
	fn tampering_with_the_payload_changes_the_recovered_account() {
		let key_pair = KeyPair::generate(&mut OsRng);
		let payload = br#"{"value":1}"#;
		let tampered = br#"{"value":2}"#;

		let signature = key_pair.sign(payload, &key_pair.account()).unwrap();
		let recovered = recover(tampered, &signature).unwrap();

		assert_ne!(recovered, key_pair.account());
	}
}
