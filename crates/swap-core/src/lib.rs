pub mod config;
pub mod directory;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod report;
pub mod seed;
pub mod store;
pub mod types;

pub use config::Config;
pub use directory::{Directory, NewMember, ProfileUpdate};
pub use error::{ErrorKind, ExchangeError};
pub use exchange::Exchange;
pub use ledger::{Ledger, LedgerPolicy, MemberRequests, NewSwapRequest};
pub use report::{ActivityReport, ReportKind};
pub use store::{JsonFileStore, MemoryStore, StorageError, Store};
pub use types::*;
