pub mod status_xlsx;

pub use status_xlsx::building_status_xlsx;
