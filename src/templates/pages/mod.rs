pub mod board;
pub mod flat;
pub mod home;
pub mod kits;

pub use board::board_page;
pub use flat::{flat_page, FlatVm};
pub use home::{home_page, BuildingRow};
pub use kits::kits_page;
