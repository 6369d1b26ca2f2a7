pub mod csv_store;
pub mod sqlite;

pub use csv_store::{read_records, read_records_if_exists, write_records};
