pub mod aggregate;
pub mod badges;
pub mod billing;
pub mod board;
pub mod catalog;
pub mod kits;
pub mod locator;
pub mod logic;
pub mod models;
pub mod snapshot;
