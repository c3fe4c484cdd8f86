pub mod errors;
pub mod html;
pub mod xlsx;

pub use errors::error_to_response;
pub use html::{html_response, json_response, not_modified, redirect};
pub use xlsx::xlsx_response;
