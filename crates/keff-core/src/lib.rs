#![deny(missing_docs)]
#![doc = "Shared error and value primitives for the keff parameter-sweep harness."]

pub mod encoding;
pub mod errors;
pub mod values;

pub use errors::{ErrorInfo, KeffError};
pub use values::{format_sci, log_space, RatioLink};
