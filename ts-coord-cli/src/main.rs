use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::info;
use ts_coord::coordinator::TimestampCoordinator;
use ts_coord_cli::config::{parse_query_config, parse_set_config, parse_transaction_config};
use ts_coord_cli::trace;

#[derive(Debug, Parser)]
#[command(author, version, about = "Global timestamp coordinator CLI")]
struct Args {
    #[clap(short = 'l', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Apply a `set_timestamp` config string to a fresh coordinator.
    Set {
        #[clap(long)]
        config: String,
    },
    /// Apply a `query_timestamp` config string to a fresh coordinator.
    Query {
        #[clap(long)]
        config: String,
    },
    /// Begin a transaction on a fresh coordinator, apply a
    /// `timestamp_transaction` config string to it, and commit.
    Txn {
        #[clap(long)]
        config: String,
    },
    /// Run a short scripted walk through begin/set/query/commit.
    Demo,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_dir = format!(
        "{}/.ts-coord-cli",
        std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
    );
    let _guards = trace::init_logging(&log_dir, &args.log_level)?;
    info!("ts-coord-cli start args: {:?}", &args);

    match args.cmd {
        Cmd::Set { config } => {
            let coord = TimestampCoordinator::new();
            let parsed = parse_set_config(&config).map_err(|e| anyhow!(e.to_string()))?;
            coord
                .set_timestamp(parsed)
                .map_err(|e| anyhow!(e.to_string()))?;
            println!("set_timestamp({config}) -> ok");
        }
        Cmd::Query { config } => {
            let coord = TimestampCoordinator::new();
            let selector = parse_query_config(&config).map_err(|e| anyhow!(e.to_string()))?;
            match coord.query_timestamp(selector) {
                Ok(ts) => println!("query_timestamp({config}) -> {ts}"),
                Err(e) => println!("query_timestamp({config}) -> error: {e}"),
            }
        }
        Cmd::Txn { config } => {
            let coord = TimestampCoordinator::new();
            let parsed = parse_transaction_config(&config).map_err(|e| anyhow!(e.to_string()))?;
            let txn = coord.begin_transaction();
            coord
                .set_transaction_timestamp(&txn, parsed)
                .map_err(|e| anyhow!(e.to_string()))?;
            coord.commit_transaction(&txn).map_err(|e| anyhow!(e.to_string()))?;
            println!("timestamp_transaction({config}) -> committed at {}", txn.commit_timestamp());
        }
        Cmd::Demo => run_demo()?,
    }

    Ok(())
}

fn run_demo() -> Result<()> {
    let coord = TimestampCoordinator::new();

    let set_config = "oldest_timestamp=5,stable_timestamp=a,commit_timestamp=f";
    coord
        .set_timestamp(parse_set_config(set_config).map_err(|e| anyhow!(e.to_string()))?)
        .map_err(|e| anyhow!(e.to_string()))?;
    println!("set-timestamp  {set_config} -> ok");

    for selector in ["get=oldest", "get=stable", "get=pinned"] {
        let parsed = parse_query_config(selector).map_err(|e| anyhow!(e.to_string()))?;
        let value = coord
            .query_timestamp(parsed)
            .map_err(|e| anyhow!(e.to_string()))?;
        println!("query-timestamp {selector} -> {value}");
    }

    let txn = coord.begin_transaction();
    coord
        .set_transaction_read_timestamp(&txn, ts_coord::timestamp::Timestamp8::from_hex("read", "7")?)
        .map_err(|e| anyhow!(e.to_string()))?;
    println!("transaction read_timestamp=7 -> ok, still pinned at oldest (5)");

    coord
        .set_timestamp(parse_set_config("oldest_timestamp=8").map_err(|e| anyhow!(e.to_string()))?)
        .map_err(|e| anyhow!(e.to_string()))?;
    let pinned = coord
        .query_timestamp(ts_coord::query::QueryTimestampSelector::Pinned)
        .map_err(|e| anyhow!(e.to_string()))?;
    println!("set-timestamp  oldest_timestamp=8 -> ok, pinned now {pinned} (held by the reader)");

    coord
        .commit_transaction(&txn)
        .map_err(|e| anyhow!(e.to_string()))?;
    println!("transaction committed, reader released");

    let writer = coord.begin_transaction();
    let txn_config = "commit_timestamp=10";
    coord
        .set_transaction_timestamp(
            &writer,
            parse_transaction_config(txn_config).map_err(|e| anyhow!(e.to_string()))?,
        )
        .map_err(|e| anyhow!(e.to_string()))?;
    coord.commit_transaction(&writer).map_err(|e| anyhow!(e.to_string()))?;
    println!("timestamp-transaction {txn_config} -> committed at {}", writer.commit_timestamp());

    Ok(())
}
