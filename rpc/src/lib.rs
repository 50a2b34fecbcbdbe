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

//! The node's HTTP surface: five routes, translating JSON requests to
//! `NodeApi` calls and back. This crate does not know how the node is
//! wired internally -- `tbs-node` implements `NodeApi` and hands this
//! crate an `Arc<dyn NodeApi>`, which keeps the dependency pointed one
//! way (`tbs-node` depends on `tbs-rpc`, never the reverse).

pub mod error;
pub mod node_api;
pub mod server;

pub use error::RpcError;
pub use node_api::NodeApi;
pub use server::{serve, ShutdownFlag};
