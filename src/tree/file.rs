use derive_more::Display;

use crate::sync::ReaderWriterLock;

/// A leaf of the tree carrying an opaque byte payload.
///
/// The payload has its own lock, so reading or writing content never blocks structural
/// changes of the folder the file lives in.
#[derive(Debug, Display)]
#[display("{name}")]
pub struct File {
    name: String,
    content: ReaderWriterLock<Vec<u8>>,
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: ReaderWriterLock::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> Vec<u8> {
        self.content.read().clone()
    }

    pub fn set_content(&self, content: impl Into<Vec<u8>>) {
        *self.content.write() = content.into();
    }
}
