//! `rimx list` – list stored images, oldest first.

use anyhow::Result;
use rimx_core::store::DirStore;

pub fn run_list(store: &DirStore) -> Result<()> {
    let records = store.list()?;
    if records.is_empty() {
        println!("No images in {}.", store.root().display());
        return Ok(());
    }
    println!("{:<18} {:>6} {:>6} {:<12} {}", "NAME", "WIDTH", "HEIGHT", "SESSION", "NODE");
    for r in records {
        println!(
            "{:<18} {:>6} {:>6} {:<12} {}",
            r.image_name, r.width, r.height, r.metadata.session_id, r.metadata.node_id
        );
    }
    Ok(())
}
