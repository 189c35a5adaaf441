//! CLI command handlers, one per file.

mod describe;
mod fetch;
mod import;
mod list;
mod ops;
mod post;

pub use describe::run_describe;
pub use fetch::run_fetch;
#[cfg(test)]
pub(crate) use fetch::fetch_inputs;
pub use import::run_import;
pub use list::run_list;
pub use ops::run_ops;
pub use post::run_post;
#[cfg(test)]
pub(crate) use post::post_inputs;

use anyhow::Result;
use serde::Serialize;

/// Print `value` as pretty JSON on stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
