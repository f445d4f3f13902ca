//! Backends with injected failures, shared by the scaffold tests.

use std::path::{Path, PathBuf};

use crate::core::{FsBackend, Metadata};
use crate::{MapFS, MapHandle};

/// MapFS that refuses to create one path with `StorageFull`.
pub(crate) struct RejectingFs {
    pub(crate) inner: MapFS,
    reject: PathBuf,
}

impl RejectingFs {
    pub(crate) fn new<P: AsRef<Path>>(inner: MapFS, reject: P) -> Self {
        Self {
            inner,
            reject: reject.as_ref().to_path_buf(),
        }
    }
}

impl FsBackend for RejectingFs {
    type Handle = MapHandle;

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.inner.exists(path)
    }
    fn is_dir<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<bool> {
        self.inner.is_dir(path)
    }
    fn is_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<bool> {
        self.inner.is_file(path)
    }
    fn ls<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<Vec<PathBuf>> {
        self.inner.ls(path)
    }
    fn mkdir_all<P: AsRef<Path>>(&mut self, path: P, mode: u32) -> anyhow::Result<()> {
        self.inner.mkdir_all(path, mode)
    }
    fn open<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<MapHandle> {
        self.inner.open(path)
    }
    fn create<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<MapHandle> {
        if path.as_ref() == self.reject {
            return Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full").into());
        }
        self.inner.create(path)
    }
    fn write_all(&mut self, handle: &mut MapHandle, content: &[u8]) -> anyhow::Result<usize> {
        self.inner.write_all(handle, content)
    }
    fn read<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<Vec<u8>> {
        self.inner.read(path)
    }
    fn stat(&self, handle: &MapHandle) -> anyhow::Result<Metadata> {
        self.inner.stat(handle)
    }
}
