//! `ts-coord` is a global timestamp coordinator for an MVCC storage
//! engine: it tracks the `commit`, `oldest`, `stable`, and `pinned`
//! timestamps of the system as a whole, and the per-transaction commit
//! and read timestamps that feed into them.
//!
//! ## Getting started
//!
//! ```rust
//! use ts_coord::coordinator::TimestampCoordinator;
//! use ts_coord::setter::SetTimestampConfig;
//! use ts_coord::query::QueryTimestampSelector;
//! use ts_coord::timestamp::Timestamp8;
//!
//! fn run() -> ts_coord::error::CResult<()> {
//!     let coord = TimestampCoordinator::new();
//!
//!     coord.set_timestamp(SetTimestampConfig {
//!         oldest: Some(Timestamp8::from_hex("oldest", "1")?),
//!         ..Default::default()
//!     })?;
//!
//!     let txn = coord.begin_transaction();
//!     coord.set_transaction_commit_timestamp(&txn, Timestamp8::from_hex("commit", "5")?)?;
//!     coord.commit_transaction(&txn)?;
//!
//!     assert_eq!(
//!         coord.query_timestamp(QueryTimestampSelector::AllCommitted)?,
//!         Timestamp8::from_hex("commit", "5")?,
//!     );
//!     Ok(())
//! }
//! ```

pub mod coordinator;
pub mod error;
pub mod pinned;
pub mod query;
pub mod queue;
pub mod registry;
pub mod setter;
pub mod timestamp;
pub mod transaction;
pub mod validator;

pub use coordinator::TimestampCoordinator;
pub use error::{CResult, Error};
pub use query::QueryTimestampSelector;
pub use setter::SetTimestampConfig;
pub use timestamp::{Timestamp, Timestamp8};
pub use transaction::{Transaction, TransactionState, TransactionTimestampConfig};
