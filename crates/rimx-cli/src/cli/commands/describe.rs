//! `rimx describe <image>` – show a stored image's record.

use anyhow::Result;
use rimx_core::store::DirStore;
use rimx_core::ImageRef;

use super::print_json;

pub fn run_describe(store: &DirStore, image: &str) -> Result<()> {
    let record = store.record(&ImageRef::new(image))?;
    print_json(&record)
}
