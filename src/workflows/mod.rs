//! End-to-end workflows behind each CLI subcommand.

pub mod analyze;
pub mod clean;
pub mod collect;
pub mod database;
pub mod filter;

pub use analyze::analyze_center_impact;
pub use clean::clean_all;
pub use collect::{collect, RetryPolicy};
pub use database::{export_to_sqlite, run_example_queries};
pub use filter::{run_filters, FilterOptions};
