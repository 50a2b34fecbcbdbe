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

/// A peer that fails `queryPeerStatus` is removed from `known_peers` by
/// the caller; rediscovery happens later via another peer's status.
#[derive(Debug)]
pub enum SyncError {
	PeerUnreachable(reqwest::Error),
	MalformedResponse(reqwest::Error),
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::PeerUnreachable(err) => write!(f, "peer unreachable: {}", err),
			SyncError::MalformedResponse(err) => write!(f, "malformed response: {}", err),
		}
	}
}

impl std::error::Error for SyncError {}
