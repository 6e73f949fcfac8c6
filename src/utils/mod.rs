pub mod assertions;
pub mod parameter_error_handler;

pub use assertions::{assert_authorized, assert_found, assert_state, assert_valid};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
