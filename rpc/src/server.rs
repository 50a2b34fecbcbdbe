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

//! A tiny, synchronous router over the five routes. Polls for shutdown
//! between requests rather than blocking forever, so `ctx` cancellation
//! (see the node loop) can close the server gracefully.

use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tiny_http::{Method, Request, Response, Server};

use tbs_api::{AddPeerRes, AddTxReq, ErrorRes};
use tbs_util::Hash;

use crate::error::RpcError;
use crate::node_api::NodeApi;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A cloneable cancellation flag for the HTTP accept loop. Distinct from
/// `tbs_miner::CancelHandle` -- it closes the server, not a mining
/// attempt -- but follows the same "poll a shared `AtomicBool`" shape.
#[derive(Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
	pub fn new() -> ShutdownFlag {
		ShutdownFlag(Arc::new(AtomicBool::new(false)))
	}

	pub fn shutdown(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_shutdown(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

/// Bind `addr` and serve requests until `shutdown` is signalled.
pub fn serve(api: Arc<dyn NodeApi>, addr: &str, shutdown: ShutdownFlag) -> Result<(), RpcError> {
	let server = Server::http(addr).map_err(|e| RpcError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

	while !shutdown.is_shutdown() {
		match server.recv_timeout(POLL_INTERVAL) {
			Ok(Some(request)) => dispatch(&api, request),
			Ok(None) => continue,
			Err(err) => return Err(RpcError::Io(err)),
		}
	}
	Ok(())
}

fn dispatch(api: &Arc<dyn NodeApi>, mut request: Request) {
	let (path, query) = split_url(request.url());
	let method = request.method().clone();

	let outcome = match (method, path.as_str()) {
		(Method::Get, "/balances/list") => Outcome::Json(200, serde_json::to_string(&api.balances_list()).unwrap()),
		(Method::Get, "/node/status") => Outcome::Json(200, serde_json::to_string(&api.status()).unwrap()),
		(Method::Post, "/tx/add") => match handle_add_tx(api, &mut request) {
			Ok(()) => Outcome::Json(200, serde_json::to_string(&tbs_api::AddTxRes { success: true }).unwrap()),
			Err(err) => Outcome::Error(500, err.to_string()),
		},
		(Method::Get, "/node/sync") => match parse_from_block(&query) {
			Ok(from_block) => Outcome::Json(200, serde_json::to_string(&api.sync_blocks_after(from_block)).unwrap()),
			Err(err) => Outcome::Error(500, err.to_string()),
		},
		(Method::Get, "/node/peer") => Outcome::Json(200, serde_json::to_string(&handle_add_peer(api, &query)).unwrap()),
		_ => Outcome::Error(404, "no such route".to_string()),
	};

	let result = match outcome {
		Outcome::Json(status, body) => {
			let response = Response::from_string(body).with_status_code(status).with_header(json_content_type());
			request.respond(response)
		}
		Outcome::Error(status, message) => {
			let body = serde_json::to_string(&ErrorRes::new(message)).expect("ErrorRes always serializes");
			let response = Response::from_string(body).with_status_code(status).with_header(json_content_type());
			request.respond(response)
		}
	};

	if let Err(err) = result {
		log::warn!("rpc: failed to write response: {}", err);
	}
}

enum Outcome {
	Json(u16, String),
	Error(u16, String),
}

fn handle_add_tx(api: &Arc<dyn NodeApi>, request: &mut Request) -> Result<(), RpcError> {
	let mut body = String::new();
	request.as_reader().read_to_string(&mut body).map_err(RpcError::Io)?;
	let req: AddTxReq = serde_json::from_str(&body).map_err(|e| RpcError::BadRequest(e.to_string()))?;
	api.add_tx(req)
}

fn parse_from_block(query: &HashMap<String, String>) -> Result<Hash, RpcError> {
	match query.get("fromBlock") {
		Some(hex) => hex.parse::<Hash>().map_err(|e| RpcError::BadRequest(e.to_string())),
		None => Ok(Hash::zero()),
	}
}

fn handle_add_peer(api: &Arc<dyn NodeApi>, query: &HashMap<String, String>) -> AddPeerRes {
	let parsed = (|| -> Result<(String, u16, tbs_util::Account), RpcError> {
		let ip = query.get("ip").cloned().ok_or_else(|| RpcError::BadRequest("missing ip".into()))?;
		let port: u16 = query
			.get("port")
			.ok_or_else(|| RpcError::BadRequest("missing port".into()))?
			.parse()
			.map_err(|_| RpcError::BadRequest("bad port".into()))?;
		let account = query
			.get("miner")
			.ok_or_else(|| RpcError::BadRequest("missing miner".into()))?
			.parse()
			.map_err(|_| RpcError::BadRequest("bad miner account".into()))?;
		Ok((ip, port, account))
	})();

	match parsed {
		Ok((ip, port, account)) => match api.add_peer(ip, port, account) {
			Ok(()) => AddPeerRes { success: true, error: None },
			Err(err) => AddPeerRes { success: false, error: Some(err.to_string()) },
		},
		Err(err) => AddPeerRes { success: false, error: Some(err.to_string()) },
	}
}

fn json_content_type() -> tiny_http::Header {
	tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).expect("static header is valid")
}

fn split_url(url: &str) -> (String, HashMap<String, String>) {
	match url.split_once('?') {
		None => (url.to_string(), HashMap::new()),
		Some((path, query)) => {
			let mut params = HashMap::new();
			for pair in query.split('&') {
				if let Some((key, value)) = pair.split_once('=') {
					params.insert(key.to_string(), value.to_string());
				}
			}
			(path.to_string(), params)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn split_url_separates_path_and_query_params() {
		let (path, query) = split_url("/node/sync?fromBlock=abcd&x=1");
		assert_eq!(path, "/node/sync");
		assert_eq!(query.get("fromBlock").map(String::as_str), Some("abcd"));
		assert_eq!(query.get("x").map(String::as_str), Some("1"));
	}

	#[test]
	fn split_url_with_no_query_string() {
		let (path, query) = split_url("/node/status");
		assert_eq!(path, "/node/status");
		assert!(query.is_empty());
	}
}
