//! yearplan_model - Column/row model, currency codec and reordering for the year plan grid.

pub mod column;
pub mod currency;
pub mod reorder;
pub mod row;

pub use column::{Column, ColumnId, ColumnType, DEFAULT_COLUMN_WIDTH, MIN_COLUMN_WIDTH, clamp_width};
pub use currency::{CurrencyLocale, NL_NL, SymbolPosition, canonicalize, currency_locale, format};
pub use reorder::{Direction, Ordered};
pub use row::{Row, RowData, RowId, blank_data};
