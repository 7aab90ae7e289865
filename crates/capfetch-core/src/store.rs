//! On-disk asset store.
//!
//! Assets live flat under one data directory, one file per derived filename.
//! Files are written to a `.part` sibling first and renamed into place, so a
//! reader never observes a half-written asset under its final name.

use crate::url_model::derive_filename;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.png` → `a.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Maps URLs to paths inside a fixed data directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    data_dir: PathBuf,
}

impl AssetStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Local path for `url`. Same URL, same path, always.
    pub fn derive_path(&self, url: &str) -> PathBuf {
        self.data_dir.join(derive_filename(url))
    }
}

/// Creates every missing parent directory of `path`.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// Writes `data` to `final_path` through a `.part` file and an atomic rename.
/// On failure the temp file is removed and `final_path` is left untouched.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp = temp_path(final_path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp, final_path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
