//! CLI command handlers. Each command is in its own file.

mod annotate;
mod clean;
mod fetch;
mod path;
mod report;
mod rows;

pub use annotate::run_annotate;
pub use clean::run_clean;
pub use fetch::run_fetch;
pub use path::run_path;
pub use rows::run_rows;
