//! CLI command handlers, one per file.

mod download;
mod filter;
mod menu;
mod report;

pub use download::run_download;
pub use filter::run_filter;
pub use menu::run_menu;
pub use report::run_report;
