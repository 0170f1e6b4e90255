//! The year plan grid behind one facade (UI-agnostic).

mod ops;
mod state;

pub use state::YearPlan;
