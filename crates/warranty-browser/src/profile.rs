use std::path::Path;
use tempfile::TempDir;
use warranty_core::Result;

/// Throwaway Chrome user-data directory, one per launched session.
///
/// A relaunch after a crash gets a fresh directory, so a stale profile lock
/// left by the dead browser cannot block it.
pub struct ProfileDir {
    dir: TempDir,
}

impl ProfileDir {
    pub fn temporary() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("warranty-check-profile-")
            .tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
