//! Core object traits and the content hasher
//!
//! This module defines the fundamental traits that all objects implement:
//! - `Packable`: Serialization to the textual object format
//! - `Unpackable`: Deserialization from the textual object format
//! - `Object`: Common object operations (ID computation, display)
//!
//! ## Object Format
//!
//! Objects are stored as their raw serialized bytes, without any type or
//! size framing. An object's identity is the SHA-1 digest of exactly those
//! bytes, so re-serializing any object yields its stored name.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;
use std::path::PathBuf;

/// Compute the lowercase 40-hex SHA-1 digest of a byte sequence
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Trait for serializing objects to their on-disk byte form
pub trait Packable {
    /// Serialize the object to bytes
    fn serialize(&self) -> Result<Bytes>;
}

/// Trait for deserializing objects from their on-disk byte form
pub trait Unpackable {
    /// Deserialize the object from a reader
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Core object trait
///
/// Implemented by all object types (Blob, Tree, Commit).
/// Provides common operations like ID computation and display.
pub trait Object: Packable {
    /// Get the object's type
    fn object_type(&self) -> ObjectType;

    /// Get a human-readable representation
    fn display(&self) -> String;

    /// Compute the object ID (SHA-1 hash of the serialized content)
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        ObjectId::try_parse(hash_bytes(&content))
    }

    /// Get the file system path where this object would be stored
    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}
