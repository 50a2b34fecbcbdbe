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

//! Key management here is deliberately minimal: a real node would sign
//! with an encrypted, password-protected keystore. This crate only
//! models the *capability* (the `Signer` trait) plus one minimal,
//! explicitly-insecure concrete implementation (`PlaintextKeystore`)
//! that is enough to run the node and drive the CLI and tests. It must
//! never be used to protect funds.

pub mod keypair;
pub mod keystore;
pub mod signer;

pub use keypair::KeyPair;
pub use keystore::PlaintextKeystore;
pub use signer::{recover, Signer, SignerError};
