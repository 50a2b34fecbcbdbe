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

//! A bare secp256k1 keypair: generation, account derivation, signing.
//! Holds the private key in memory in the clear -- callers that need
//! at-rest protection must go through `keystore::PlaintextKeystore` (which,
//! true to its name, does not actually provide that protection either) or
//! bring their own.

use rand::{CryptoRng, RngCore};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use tbs_util::Account;

use crate::signer::{account_from_public_key, Signature, Signer, SignerError};

/// An in-memory secp256k1 keypair and the account it derives to.
#[derive(Clone)]
pub struct KeyPair {
	secret_key: SecretKey,
	public_key: PublicKey,
	account: Account,
}

impl KeyPair {
	/// Generate a fresh keypair from `rng`.
	pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> KeyPair {
		let secp = Secp256k1::new();
		let mut secret_bytes = [0u8; 32];
		let secret_key = loop {
			rng.fill_bytes(&mut secret_bytes);
			if let Ok(key) = SecretKey::from_slice(&secret_bytes) {
				break key;
			}
		};
		KeyPair::from_secret_key(&secp, secret_key)
	}

	/// Reconstruct a keypair from a raw 32-byte private key, e.g. one
	/// loaded from a keyfile.
	pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<KeyPair, secp256k1::Error> {
		let secp = Secp256k1::new();
		let secret_key = SecretKey::from_slice(bytes)?;
		Ok(KeyPair::from_secret_key(&secp, secret_key))
	}

	fn from_secret_key(secp: &Secp256k1<secp256k1::All>, secret_key: SecretKey) -> KeyPair {
		let public_key = PublicKey::from_secret_key(secp, &secret_key);
		let account = account_from_public_key(&public_key);
		KeyPair { secret_key, public_key, account }
	}

	pub fn account(&self) -> Account {
		self.account
	}

	pub fn public_key(&self) -> &PublicKey {
		&self.public_key
	}

	/// The raw 32-byte private key, for persistence by a keystore. Treat
	/// the result as sensitive.
	pub fn secret_bytes(&self) -> [u8; 32] {
		self.secret_key.secret_bytes()
	}

	/// Sign `payload` with this keypair's private key, independent of the
	/// `Signer` trait's account lookup.
	pub fn sign_payload(&self, payload: &[u8]) -> Signature {
		let secp = Secp256k1::signing_only();
		let digest = tbs_util::account::keccak256(payload);
		let message = secp256k1::Message::from_digest(digest);
		let recoverable = secp.sign_ecdsa_recoverable(&message, &self.secret_key);
		let (recovery_id, compact) = recoverable.serialize_compact();

		let mut signature = [0u8; 65];
		signature[..64].copy_from_slice(&compact);
		signature[64] = recovery_id.to_i32() as u8;
		signature
	}
}

impl Signer for KeyPair {
	fn sign(&self, payload: &[u8], account: &Account) -> Result<Signature, SignerError> {
		if *account != self.account {
			return Err(SignerError::UnknownAccount(*account));
		}
		Ok(self.sign_payload(payload))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::OsRng;

	#[test]
	fn generated_keypairs_derive_distinct_accounts() {
		let a = KeyPair::generate(&mut OsRng);
		let b = KeyPair::generate(&mut OsRng);
		assert_ne!(a.account(), b.account());
	}

	#[test]
	fn secret_bytes_round_trip_to_the_same_account() {
		let original = KeyPair::generate(&mut OsRng);
		let restored = KeyPair::from_secret_bytes(&original.secret_bytes()).unwrap();
		assert_eq!(original.account(), restored.account());
	}

	#[test]
	fn signing_as_an_unheld_account_is_rejected() {
		let key_pair = KeyPair::generate(&mut OsRng);
		let other = KeyPair::generate(&mut OsRng).account();
		assert!(key_pair.sign(b"payload", &other).is_err());
	}
}
