pub mod signal_handling;
pub mod timeout;
pub mod tour;

pub use timeout::parse_timeout;
pub use tour::*;
