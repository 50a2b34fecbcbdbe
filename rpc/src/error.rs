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

/// Every variant here surfaces to the caller as `500 {"error": message}`.
#[derive(Debug)]
pub enum RpcError {
	/// The request body or a query parameter did not parse.
	BadRequest(String),
	/// A domain operation (tx validation, block application) rejected the
	/// request.
	Rejected(String),
	/// Could not bind or accept on the configured HTTP port.
	Io(std::io::Error),
}

impl fmt::Display for RpcError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RpcError::BadRequest(msg) => write!(f, "{}", msg),
			RpcError::Rejected(msg) => write!(f, "{}", msg),
			RpcError::Io(err) => write!(f, "{}", err),
		}
	}
}

impl std::error::Error for RpcError {}

impl From<tbs_state::StateError> for RpcError {
	fn from(err: tbs_state::StateError) -> RpcError {
		RpcError::Rejected(err.to_string())
	}
}
