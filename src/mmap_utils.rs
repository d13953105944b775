use crate::error::{Result, SeizureError};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Open a file and map it into memory (read-only)
pub fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(|e| {
        SeizureError::StoreRead(format!("failed to open {}: {}", path.display(), e))
    })?;
    // Safety: the map is read-only and dropped before the store returns
    let mmap = unsafe { Mmap::map(&file).map_err(SeizureError::IoError)? };
    Ok(mmap)
}
