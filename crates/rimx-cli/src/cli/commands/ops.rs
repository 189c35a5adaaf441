//! `rimx ops` – print the operation registry.

use anyhow::Result;
use rimx_core::registry::Registry;

use super::print_json;

pub fn run_ops(registry: &Registry) -> Result<()> {
    let specs: Vec<_> = registry.iter().collect();
    print_json(&specs)
}
