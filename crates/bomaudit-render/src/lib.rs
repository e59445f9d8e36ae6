//! Rendering utilities for human review (grid table, Markdown).

#![forbid(unsafe_code)]

mod markdown;
mod model;
mod table;

pub use markdown::render_markdown;
pub use model::{
    RenderableReport, RenderableRow, RenderableSkip, RenderableSummary, RenderableVerdict,
};
pub use table::{TABLE_HEADERS, render_table};
