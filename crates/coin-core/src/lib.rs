//! coin-core
//!
//! Business logic over the coin ledger: goal resolution, the validated ledger
//! writer, debt accrual, aggregation, session-scoped undo and schema migration.
//! Depends on coin-domain. No CLI, no terminal I/O, no direct filesystem access.

pub mod debt_service;
pub mod error;
pub mod events;
pub mod goal_service;
pub mod ledger_service;
pub mod migration_service;
pub mod session;
pub mod settings_service;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use debt_service::*;
pub use error::CoreError;
pub use events::{ChangeNotifier, LedgerEvent};
pub use goal_service::*;
pub use ledger_service::*;
pub use migration_service::*;
pub use session::*;
pub use settings_service::*;
pub use summary_service::*;
pub use storage::{ledger_warnings, AppDataStorage};
pub use time::{Clock, FixedClock, SystemClock};
