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

//! `PlaintextKeystore`: a directory of one hex-encoded private key per
//! file, named by the account it belongs to. There is no password, no
//! key-derivation function and no encryption -- this exists to let the
//! CLI and the node's integration tests create and reload accounts
//! without pulling in a real keystore. Do not point this at real funds.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::{CryptoRng, RngCore};
use tbs_util::Account;

use crate::keypair::KeyPair;
use crate::signer::{Signature, Signer, SignerError};

pub struct PlaintextKeystore {
	dir: PathBuf,
	keys: BTreeMap<Account, KeyPair>,
}

impl PlaintextKeystore {
	/// Load every keyfile already present under `dir`, creating `dir` if it
	/// does not exist yet.
	pub fn open(dir: impl AsRef<Path>) -> Result<PlaintextKeystore, KeystoreError> {
		let dir = dir.as_ref().to_path_buf();
		fs::create_dir_all(&dir).map_err(KeystoreError::Io)?;

		let mut keys = BTreeMap::new();
		for entry in fs::read_dir(&dir).map_err(KeystoreError::Io)? {
			let entry = entry.map_err(KeystoreError::Io)?;
			if !entry.file_type().map_err(KeystoreError::Io)?.is_file() {
				continue;
			}
			let contents = fs::read_to_string(entry.path()).map_err(KeystoreError::Io)?;
			let secret_bytes: [u8; 32] = hex::decode(contents.trim())
				.ok()
				.and_then(|v| v.try_into().ok())
				.ok_or(KeystoreError::MalformedKeyfile(entry.path()))?;
			let key_pair = KeyPair::from_secret_bytes(&secret_bytes)
				.map_err(|_| KeystoreError::MalformedKeyfile(entry.path()))?;
			keys.insert(key_pair.account(), key_pair);
		}

		Ok(PlaintextKeystore { dir, keys })
	}

	/// Generate a new account, persist its key to `dir` and hold it in
	/// memory for subsequent `sign` calls.
	pub fn new_account<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<Account, KeystoreError> {
		let key_pair = KeyPair::generate(rng);
		let account = key_pair.account();
		let path = self.keyfile_path(&account);
		fs::write(&path, hex::encode(key_pair.secret_bytes())).map_err(KeystoreError::Io)?;
		self.keys.insert(account, key_pair);
		Ok(account)
	}

	pub fn accounts(&self) -> impl Iterator<Item = &Account> {
		self.keys.keys()
	}

	pub fn contains(&self, account: &Account) -> bool {
		self.keys.contains_key(account)
	}

	fn keyfile_path(&self, account: &Account) -> PathBuf {
		self.dir.join(account.to_hex_lower())
	}
}

impl Signer for PlaintextKeystore {
	fn sign(&self, payload: &[u8], account: &Account) -> Result<Signature, SignerError> {
		let key_pair = self.keys.get(account).ok_or(SignerError::UnknownAccount(*account))?;
		key_pair.sign(payload, account)
	}
}

#[derive(Debug)]
pub enum KeystoreError {
	Io(io::Error),
	MalformedKeyfile(PathBuf),
}

impl std::fmt::Display for KeystoreError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			KeystoreError::Io(err) => write!(f, "keystore io error: {}", err),
			KeystoreError::MalformedKeyfile(path) => {
				write!(f, "malformed keyfile: {}", path.display())
			}
		}
	}
}

impl std::error::Error for KeystoreError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			KeystoreError::Io(err) => Some(err),
			KeystoreError::MalformedKeyfile(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::OsRng;

	#[test]
	fn new_account_can_sign_immediately() {
		let dir = tempdir();
		let mut keystore = PlaintextKeystore::open(&dir).unwrap();
		let account = keystore.new_account(&mut OsRng).unwrap();

		let signature = keystore.sign(b"payload", &account).unwrap();
		let recovered = crate::recover(b"payload", &signature).unwrap();
		assert_eq!(recovered, account);
	}

	#[test]
	fn reopening_the_directory_recovers_the_same_accounts() {
		let dir = tempdir();
		let account = {
			let mut keystore = PlaintextKeystore::open(&dir).unwrap();
			keystore.new_account(&mut OsRng).unwrap()
		};

		let reopened = PlaintextKeystore::open(&dir).unwrap();
		assert!(reopened.contains(&account));
	}

	#[test]
	fn signing_for_an_unknown_account_fails() {
		let dir = tempdir();
		let keystore = PlaintextKeystore::open(&dir).unwrap();
		let stranger = KeyPair::generate(&mut OsRng).account();
		assert!(keystore.sign(b"payload", &stranger).is_err());
	}

	fn tempdir() -> PathBuf {
		use std::sync::atomic::{AtomicU64, Ordering};
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let nanos = std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.unwrap()
			.as_nanos();
		let count = COUNTER.fetch_add(1, Ordering::Relaxed);

		let mut path = std::env::temp_dir();
		path.push(format!("tbs-crypto-test-{}-{}-{}", std::process::id(), nanos, count));
		path
	}
}
