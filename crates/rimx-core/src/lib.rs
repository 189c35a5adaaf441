pub mod config;
pub mod logging;

pub mod decode;
pub mod error;
pub mod http;
pub mod invocation;
pub mod registry;
pub mod store;

pub use error::ExchangeError;
pub use invocation::{ImageOutput, Invocation, InvocationContext};
pub use store::{ImageRef, ImageStore};
