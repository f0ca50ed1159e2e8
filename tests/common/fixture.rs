use std::{
    fmt::{self, Display, Formatter},
    ops::Deref,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// File (or directory) living inside its own temporary directory, removed on drop.
pub struct Fixture {
    path: PathBuf,
    _tempdir: TempDir,
}

impl Fixture {
    /// Path to a file which does not exist yet.
    pub fn blank(filename: &str) -> Self {
        let tempdir = tempfile::tempdir().expect("Failed to generate temp directory");
        let path = tempdir.path().join(filename);
        Fixture { path, _tempdir: tempdir }
    }

    pub fn with_content(filename: &str, content: &str) -> Self {
        let fixture = Self::blank(filename);
        std::fs::write(&fixture.path, content).expect("Failed to write fixture");
        fixture
    }
}

impl Deref for Fixture {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
