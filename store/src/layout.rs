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

//! The on-disk layout under a node's data directory:
//!
//! ```text
//! <dataDir>/database/genesis.json
//! <dataDir>/database/block.db
//! <dataDir>/keystore/<file-per-account>   (owned by tbs-crypto)
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::genesis::Genesis;

pub struct DataDir {
	root: PathBuf,
}

impl DataDir {
	pub fn new(root: impl Into<PathBuf>) -> DataDir {
		DataDir { root: root.into() }
	}

	pub fn database_dir(&self) -> PathBuf {
		self.root.join("database")
	}

	pub fn genesis_json_path(&self) -> PathBuf {
		self.database_dir().join("genesis.json")
	}

	pub fn block_db_path(&self) -> PathBuf {
		self.database_dir().join("block.db")
	}

	/// Create `database/`, write `genesis.json` and an empty `block.db` if
	/// neither exists yet. A pre-existing directory is left untouched.
	pub fn init_if_absent(&self, genesis: &Genesis) -> Result<(), StoreError> {
		fs::create_dir_all(self.database_dir()).map_err(StoreError::Io)?;

		if !path_exists(&self.genesis_json_path()) {
			let bytes = serde_json::to_vec_pretty(genesis).map_err(StoreError::Codec)?;
			fs::write(self.genesis_json_path(), bytes).map_err(StoreError::Io)?;
		}

		if !path_exists(&self.block_db_path()) {
			File::create(self.block_db_path()).map_err(StoreError::Io)?;
		}

		Ok(())
	}
}

fn path_exists(path: &Path) -> bool {
	path.try_exists().unwrap_or(false)
}
