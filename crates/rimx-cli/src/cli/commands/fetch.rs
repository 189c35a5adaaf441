//! `rimx fetch <url>` – fetch, decode and register a remote image.

use anyhow::Result;
use rimx_core::registry::{Registry, LOAD_REMOTE_IMAGE};
use rimx_core::InvocationContext;
use serde_json::{json, Value};

use super::print_json;

pub fn run_fetch(
    registry: &Registry,
    ctx: &InvocationContext<'_>,
    url: &str,
    node_id: &str,
    intermediate: bool,
) -> Result<()> {
    let out = registry.invoke(LOAD_REMOTE_IMAGE, fetch_inputs(url, node_id, intermediate), ctx)?;
    print_json(&out)
}

pub(crate) fn fetch_inputs(url: &str, node_id: &str, intermediate: bool) -> Value {
    json!({
        "id": node_id,
        "is_intermediate": intermediate,
        "image_url": url,
    })
}
