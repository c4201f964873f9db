//! Blob object
//!
//! Blobs store file content. They contain only the raw file data, without
//! any metadata like filename or permissions (those live in trees).
//!
//! ## Format
//!
//! On disk: the file contents, byte for byte. No header, no framing.
//! Identity is therefore the SHA-1 of the contents themselves.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Blob object representing one file's contents
///
/// Each unique file content is stored as a blob, identified by its SHA-1
/// hash. All blobs are regular files; there is no mode or symlink tracking.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// File content
    content: String,
}

impl Blob {
    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(self.content.clone().into_bytes()))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        self.content.to_string()
    }
}
