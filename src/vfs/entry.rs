use std::time::SystemTime;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// A node stored by [`MapFS`](crate::MapFS).
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    entry_type: EntryType,
    content: Option<Vec<u8>>,
    modified: SystemTime,
}

impl Entry {
    pub fn new(entry_type: EntryType) -> Entry {
        Entry {
            entry_type,
            content: None,
            modified: SystemTime::now(),
        }
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn content(&self) -> Option<&Vec<u8>> {
        self.content.as_ref()
    }

    pub fn size(&self) -> u64 {
        self.content.as_ref().map_or(0, |c| c.len() as u64)
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn append_content(&mut self, content: &[u8]) {
        self.content
            .get_or_insert_with(Vec::new)
            .extend_from_slice(content);
        self.modified = SystemTime::now();
    }

    pub fn truncate(&mut self) {
        self.content = None;
        self.modified = SystemTime::now();
    }
}
