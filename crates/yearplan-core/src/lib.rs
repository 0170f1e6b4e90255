//! yearplan-core - UI-agnostic year plan grid: registry, rows, sessions and backend.

pub mod backend;
pub mod command;
pub mod error;
pub mod executor;
pub mod notice;
pub mod plan;
pub mod registry;
pub mod resize;
pub mod rows;
pub mod session;
pub mod storage;

pub use backend::{Backend, HttpBackend, MemoryBackend};
pub use command::{Command, Outcome, Snapshot, Target, Ticket};
pub use error::{Result, YearPlanError};
pub use executor::{Executor, Inline, Worker};
pub use notice::{Notice, NoticeLevel, Notices};
pub use plan::YearPlan;
pub use registry::ColumnRegistry;
pub use resize::{ResizeController, ResizeSession};
pub use rows::RowStore;
pub use session::{CellEditSession, EditTarget};

pub use yearplan_model::{Column, ColumnId, ColumnType, Direction, Row, RowId};
