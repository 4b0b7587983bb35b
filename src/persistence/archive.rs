//! Archive containers
//!
//! The replay archive is two named text entries. The container format itself
//! (zip on the web) belongs to the host; this trait is the seam, with an
//! in-memory map and a plain directory as the reference containers.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Entry holding the per-tick frames table
pub const FRAMES_ENTRY: &str = "frames.csv";
/// Entry holding the one-row metadata table
pub const METADATA_ENTRY: &str = "metadata.csv";

/// A container of named binary entries
pub trait Archive {
    /// Contents of `name`, or `None` if the entry does not exist
    fn read_entry(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Create or replace `name`
    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Entries kept in memory (tests, hosts that own the container bytes)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn remove_entry(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }
}

impl Archive for MemoryArchive {
    fn read_entry(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(name).cloned())
    }

    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// One directory per archive, one file per entry
#[derive(Debug, Clone)]
pub struct DirArchive {
    root: PathBuf,
}

impl DirArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Archive for DirArchive {
    fn read_entry(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(name), bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_archive() {
        let mut archive = MemoryArchive::new();
        assert_eq!(archive.read_entry(FRAMES_ENTRY).unwrap(), None);
        archive.write_entry(FRAMES_ENTRY, b"a,b").unwrap();
        archive.write_entry(FRAMES_ENTRY, b"c,d").unwrap();
        assert_eq!(archive.read_entry(FRAMES_ENTRY).unwrap(), Some(b"c,d".to_vec()));
        assert_eq!(archive.entry_names().collect::<Vec<_>>(), vec![FRAMES_ENTRY]);
    }

    #[test]
    fn test_dir_archive() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = DirArchive::new(dir.path().join("replay"));
        assert_eq!(archive.read_entry(METADATA_ENTRY).unwrap(), None);

        archive.write_entry(METADATA_ENTRY, b"agent_type\nhuman").unwrap();
        assert_eq!(
            archive.read_entry(METADATA_ENTRY).unwrap(),
            Some(b"agent_type\nhuman".to_vec())
        );
        assert!(archive.root().join(METADATA_ENTRY).exists());
    }
}
