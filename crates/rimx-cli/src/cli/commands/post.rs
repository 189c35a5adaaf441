//! `rimx post <image> [endpoint]` – upload a stored image.

use anyhow::Result;
use rimx_core::registry::{Registry, POST_IMAGE_TO_REMOTE};
use rimx_core::{ImageRef, InvocationContext};
use serde_json::{json, Value};

use super::print_json;

pub fn run_post(
    registry: &Registry,
    ctx: &InvocationContext<'_>,
    image: &str,
    endpoint: &str,
) -> Result<()> {
    let out = registry.invoke(POST_IMAGE_TO_REMOTE, post_inputs(image, endpoint), ctx)?;
    print_json(&out)
}

pub(crate) fn post_inputs(image: &str, endpoint: &str) -> Value {
    json!({
        "id": "cli",
        "image": ImageRef::new(image),
        "endpoint": endpoint,
    })
}
