//! Memory-mapped input acquisition
//!
//! The whole input is mapped read-only once and shared by every pipeline
//! thread; the map outlives the workers because the importing call owns it
//! across the join.

use memmap2::Mmap;
use meshpipe_core::{Error, Result};
use std::fs::File;
use std::path::Path;

/// Read-only memory map of an input file
pub struct MappedObj {
    mmap: Mmap,
}

impl MappedObj {
    /// Open and map `path`, hinting sequential access to the OS
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if metadata.len() == 0 {
            return Err(Error::EmptyInput(path.display().to_string()));
        }

        let mmap = unsafe { Mmap::map(&file)? };

        // The parse is one front-to-back pass; tell the pager so.
        #[cfg(unix)]
        {
            let _ = mmap.advise(memmap2::Advice::Sequential);
            let _ = mmap.advise(memmap2::Advice::WillNeed);
        }

        Ok(Self { mmap })
    }

    /// The mapped bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// Size of the mapping in bytes
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Check whether the mapping is empty (never true for an open map)
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_maps_file_contents() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"v 1 2 3\n").unwrap();
        file.flush().unwrap();

        let mapped = MappedObj::open(file.path()).unwrap();
        assert_eq!(mapped.as_bytes(), b"v 1 2 3\n");
        assert_eq!(mapped.len(), 8);
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        match MappedObj::open(file.path()) {
            Err(Error::EmptyInput(_)) => {}
            other => panic!("expected EmptyInput, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        match MappedObj::open("/definitely/not/here.obj") {
            Err(Error::Io(_)) => {}
            other => panic!("expected Io, got {:?}", other.map(|_| ())),
        }
    }
}
