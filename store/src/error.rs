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

#[derive(Debug)]
pub enum StoreError {
	/// Disk IO failed: opening the data directory, the log, or a read/write
	/// on either.
	Io(std::io::Error),
	/// A genesis or block-log record did not parse as valid JSON.
	Codec(serde_json::Error),
	/// A replayed or newly appended block failed ledger validation.
	Validation(tbs_state::StateError),
}

impl fmt::Display for StoreError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StoreError::Io(err) => write!(f, "store io error: {}", err),
			StoreError::Codec(err) => write!(f, "malformed record: {}", err),
			StoreError::Validation(err) => write!(f, "rejected: {}", err),
		}
	}
}

impl std::error::Error for StoreError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			StoreError::Io(err) => Some(err),
			StoreError::Codec(err) => Some(err),
			StoreError::Validation(err) => Some(err),
		}
	}
}
