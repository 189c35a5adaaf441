//! `rimx import <path>` – register a local image file.

use anyhow::{Context, Result};
use rimx_core::decode;
use rimx_core::store::{ImageCategory, ImageMetadata, ResourceOrigin};
use rimx_core::{ImageOutput, InvocationContext};
use std::path::Path;

use super::print_json;

pub fn run_import(ctx: &InvocationContext<'_>, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let rgb = decode::decode_rgb(&bytes)
        .with_context(|| format!("decode {}", path.display()))?;
    let meta = ImageMetadata {
        node_id: "import".to_string(),
        session_id: ctx.session_id.clone(),
        is_intermediate: false,
        origin: ResourceOrigin::External,
        category: ImageCategory::User,
    };
    let stored = ctx.store.save(rgb, meta)?;
    tracing::info!(image = %stored.image, "imported {}", path.display());
    print_json(&ImageOutput::from_stored(stored))
}
