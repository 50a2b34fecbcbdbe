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

//! Transaction and block types, and the in-memory ledger (`Ledger`) that
//! applies them. This crate knows nothing about persistence (see
//! `tbs-store`) or the network (see `tbs-rpc`/`tbs-sync`) -- it is the
//! single place that decides whether a transaction or block is valid.

pub mod block;
pub mod error;
pub mod ledger;
pub mod transaction;

pub use block::{Block, BlockHeader};
pub use error::StateError;
pub use ledger::Ledger;
pub use transaction::{SignedTx, Tx};
