//! Export of the year plan grid.

mod md;

pub use md::{render_markdown, write_markdown};
