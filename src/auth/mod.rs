pub mod permissions;

pub use permissions::{Permission, PermissionCheck, PermissionSet};
