pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod model;
pub mod worker;

pub use error::{Error, Result};
