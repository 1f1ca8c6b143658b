pub mod error;
pub mod response;

pub use error::{Error, Result};
pub use response::ApiResponse;
