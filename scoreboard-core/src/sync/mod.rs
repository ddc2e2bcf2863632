//! Remote transaction store
//!
//! The remote store is an append-only transaction log behind a single HTTP
//! endpoint: POST appends one transaction, GET returns all of them. Clients
//! never touch the [`LedgerStore`](crate::LedgerStore); the session decides
//! what to do with the result.

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpRemote;
pub use mock::MockRemote;
pub use traits::{RemoteLedger, TransactionDraft};
