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

//! The `tbs` binary: run a node, inspect balances, submit transactions
//! and manage a local plaintext keystore.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use tbs_api::{AddTxReq, BalancesListRes};
use tbs_crypto::{KeyPair, PlaintextKeystore};
use tbs_node::{Node, NodeConfig};
use tbs_store::{BlockStore, Genesis};
use tbs_util::{Account, Hash};

#[derive(Parser)]
#[command(name = "tbs", about = "A single-chain proof-of-work node")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print the build version and exit.
	Version,
	/// Run a node: the HTTP surface, the mine loop and the sync loop.
	Run(RunArgs),
	#[command(subcommand)]
	Balances(BalancesCommand),
	#[command(subcommand)]
	Tx(TxCommand),
	#[command(subcommand)]
	Wallet(WalletCommand),
	/// Re-read every block from `--datadir`'s log and re-append it, in
	/// order, into a fresh store at `--to`, validating each block as it
	/// goes. A dry-run / repair tool for a log suspected of hand-editing
	/// or corruption.
	Migrate {
		#[arg(long)]
		datadir: PathBuf,
		#[arg(long)]
		to: PathBuf,
	},
}

#[derive(clap::Args)]
struct RunArgs {
	#[arg(long)]
	datadir: PathBuf,
	#[arg(long, default_value = "127.0.0.1")]
	ip: String,
	#[arg(long)]
	port: Option<u16>,
	#[arg(long)]
	miner: Account,
	#[arg(long)]
	bootstrap_ip: Option<String>,
	#[arg(long)]
	bootstrap_port: Option<u16>,
	#[arg(long)]
	bootstrap_account: Option<Account>,
	#[arg(long)]
	keystore: Option<PathBuf>,
}

#[derive(Subcommand)]
enum BalancesCommand {
	/// Fetch `/balances/list` from a running node.
	List {
		#[arg(long)]
		node: String,
	},
}

#[derive(Subcommand)]
enum TxCommand {
	/// Submit a transfer to a running node via `/tx/add`.
	Add {
		#[arg(long)]
		node: String,
		#[arg(long)]
		from: Account,
		#[arg(long, default_value = "")]
		from_pwd: String,
		#[arg(long)]
		to: Account,
		#[arg(long)]
		value: u64,
		#[arg(long, default_value = "")]
		data: String,
	},
}

#[derive(Subcommand)]
enum WalletCommand {
	/// Generate a new account and persist it under a keystore directory.
	NewAccount {
		#[arg(long)]
		keystore: PathBuf,
	},
	/// Print the raw private key for an account already in the keystore.
	/// Plaintext in, plaintext out -- see `PlaintextKeystore`'s own
	/// warning.
	PkPrint {
		#[arg(long)]
		keystore: PathBuf,
		#[arg(long)]
		account: Account,
	},
}

fn main() -> ExitCode {
	env_logger::init();
	let cli = Cli::parse();

	let result = match cli.command {
		Command::Version => {
			println!("tbs {}", env!("CARGO_PKG_VERSION"));
			Ok(())
		}
		Command::Run(args) => run(args),
		Command::Balances(BalancesCommand::List { node }) => balances_list(&node),
		Command::Tx(TxCommand::Add { node, from, from_pwd, to, value, data }) => {
			tx_add(&node, from, from_pwd, to, value, data)
		}
		Command::Wallet(WalletCommand::NewAccount { keystore }) => wallet_new_account(&keystore),
		Command::Wallet(WalletCommand::PkPrint { keystore, account }) => wallet_pk_print(&keystore, account),
		Command::Migrate { datadir, to } => migrate(&datadir, &to),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			log::error!("{}", err);
			ExitCode::FAILURE
		}
	}
}

fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
	let mut config = NodeConfig::new(args.datadir.clone(), args.ip, args.miner);
	if let Some(port) = args.port {
		config.port = port;
	}
	let config = match (args.bootstrap_ip, args.bootstrap_port, args.bootstrap_account) {
		(Some(ip), Some(port), Some(account)) => config.with_bootstrap_peer(ip, port, account),
		(None, None, None) => config,
		_ => return Err("--bootstrap-ip, --bootstrap-port and --bootstrap-account must be given together".into()),
	};

	let keystore_dir = args.keystore.unwrap_or_else(|| args.datadir.join("keystore"));
	let keystore = PlaintextKeystore::open(&keystore_dir)?;
	if !keystore.contains(&config.miner) {
		return Err(format!("miner account {} has no key under {}", config.miner, keystore_dir.display()).into());
	}

	// A freshly-initialized data dir with no prior genesis starts every
	// account at zero; operators fund accounts by mining to them, not by
	// a CLI-provided initial balance.
	let genesis =
		Genesis { genesis_time: "unset".into(), chain_id: "tbs".into(), balances: Default::default() };
	let store = BlockStore::new_from_disk(&config.data_dir, &genesis)?;

	let node = Arc::new(Node::new(&config, store, Arc::new(keystore)));
	log::info!("tbs node {} listening on {}", node.info().account, config.addr());

	let handles = tbs_node::run(node, &config);
	handles.http.join().expect("http thread panicked")?;
	Ok(())
}

fn balances_list(node: &str) -> Result<(), Box<dyn std::error::Error>> {
	let url = format!("http://{}/balances/list", node);
	let res: BalancesListRes = reqwest::blocking::get(url)?.json()?;
	println!("{}", serde_json::to_string_pretty(&res)?);
	Ok(())
}

fn tx_add(
	node: &str,
	from: Account,
	from_pwd: String,
	to: Account,
	value: u64,
	data: String,
) -> Result<(), Box<dyn std::error::Error>> {
	let url = format!("http://{}/tx/add", node);
	let req = AddTxReq { from, from_pwd, to, value, data };
	let response = reqwest::blocking::Client::new().post(url).json(&req).send()?;
	if !response.status().is_success() {
		return Err(format!("node rejected the transaction: {}", response.text()?).into());
	}
	println!("submitted");
	Ok(())
}

fn wallet_new_account(keystore_dir: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
	let mut keystore = PlaintextKeystore::open(keystore_dir)?;
	let account = keystore.new_account(&mut rand::rngs::OsRng)?;
	println!("{}", account);
	Ok(())
}

fn wallet_pk_print(keystore_dir: &std::path::Path, account: Account) -> Result<(), Box<dyn std::error::Error>> {
	// PlaintextKeystore has no accessor for a held key's raw bytes (it
	// only signs); re-read the keyfile directly, matching how it stores
	// the key (hex-encoded, named by account, under `keystore_dir`).
	let path = keystore_dir.join(account.to_hex_lower());
	let contents = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
	let secret_bytes: [u8; 32] = hex::decode(contents.trim())?
		.try_into()
		.map_err(|_| "keyfile did not contain a 32-byte private key")?;
	let key_pair = KeyPair::from_secret_bytes(&secret_bytes)?;
	if key_pair.account() != account {
		return Err("keyfile does not match the requested account".into());
	}
	println!("{}", hex::encode(secret_bytes));
	Ok(())
}

fn migrate(datadir: &std::path::Path, to: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
	let genesis_path = datadir.join("database").join("genesis.json");
	let genesis = tbs_store::genesis::load(&genesis_path)?;
	let source = BlockStore::new_from_disk(datadir, &genesis)?;
	let blocks = source.blocks_after(Hash::zero())?;

	let mut dest = BlockStore::new_from_disk(to, &genesis)?;
	dest.add_blocks(blocks.clone())?;

	println!(
		"migrated {} block(s) from {} to {}, now at block {}",
		blocks.len(),
		datadir.display(),
		to.display(),
		dest.ledger().next_block_number()
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tbs_devtools::{deterministic_secret_bytes, mine_block, signed_transfer, temp_data_dir, test_genesis};

	#[test]
	fn migrate_replays_every_block_into_a_fresh_destination_store() {
		let miner_key = KeyPair::from_secret_bytes(&deterministic_secret_bytes(1)).unwrap();
		let sender_key = KeyPair::from_secret_bytes(&deterministic_secret_bytes(2)).unwrap();
		let recipient = KeyPair::from_secret_bytes(&deterministic_secret_bytes(3)).unwrap().account();
		let genesis = test_genesis(&[sender_key.clone()], 10_000);

		let source_dir = temp_data_dir("migrate-source");
		let mut source = BlockStore::new_from_disk(&source_dir, &genesis).unwrap();
		let tx = signed_transfer(&sender_key, recipient, 500, 1, 1);
		let block = mine_block(Hash::zero(), 0, 1, miner_key.account(), vec![tx]);
		source.add_block(block.clone()).unwrap();
		drop(source);

		let dest_dir = temp_data_dir("migrate-dest");
		migrate(&source_dir, &dest_dir).unwrap();

		let dest = BlockStore::new_from_disk(&dest_dir, &genesis).unwrap();
		assert_eq!(dest.ledger().next_block_number(), 1);
		assert_eq!(dest.ledger().latest_block_hash(), block.hash());
		assert_eq!(dest.ledger().balance_of(&recipient), 500);
	}
}
