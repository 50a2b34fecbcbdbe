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

//! Periodic pull-based reconciliation with known peers: query status,
//! register ourselves if the peer doesn't yet know us, pull blocks past
//! our local tip, and merge the peer's known-peers set into our own.
//!
//! This crate only speaks HTTP; it has no notion of what to do with a
//! fetched block beyond handing it back to the caller (see `tbs-node`,
//! which applies it and routes it through the mining-cancellation
//! channel).

pub mod client;
pub mod error;

pub use client::{new_peers_from_status, sync_once, PeerUpdate};
pub use error::SyncError;
