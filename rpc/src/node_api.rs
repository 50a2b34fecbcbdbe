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

//! The operations the five HTTP routes dispatch to. `tbs-node` implements
//! this trait over its own locking discipline; this crate only calls it.

use tbs_api::{AddTxReq, BalancesListRes, StatusRes, SyncRes};
use tbs_util::{Account, Hash};

use crate::error::RpcError;

pub trait NodeApi: Send + Sync {
	fn balances_list(&self) -> BalancesListRes;

	fn status(&self) -> StatusRes;

	/// `from_pwd` in `req` is passed through to the (external) signing
	/// capability; this crate neither inspects nor stores it.
	fn add_tx(&self, req: AddTxReq) -> Result<(), RpcError>;

	fn sync_blocks_after(&self, from_block: Hash) -> SyncRes;

	fn add_peer(&self, ip: String, port: u16, account: Account) -> Result<(), RpcError>;
}
