pub mod connection;
pub mod records;
pub mod work_plans;

pub use connection::{init_db, Database};
pub use records::load_snapshot;
