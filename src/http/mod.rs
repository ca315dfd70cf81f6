//! HTTP protocol layer module
//!
//! Response building shared by the router and the artifact endpoint,
//! decoupled from specific business logic.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_json_response, build_options_response,
};
