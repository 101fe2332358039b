//! Builder pattern for creating resource archives

use super::entry::ResourceName;
use super::file::{MAX_FILES, ResourceArchive, ResourceFile};
use crate::codec::FixedString;
use crate::error::{FormatError, Result};
use crate::options::{FormatOptions, StringOverflow};

/// Builder for creating resource archives
///
/// Adding a file whose name is already present replaces its content in
/// place, so every name appears once.
///
/// # Example
///
/// ```rust
/// use across_formats::resource::ResourceArchiveBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let archive = ResourceArchiveBuilder::new()
///     .add_file("QFOOD1.PCX", b"apple".to_vec())?
///     .add_file("QFOOD2.PCX", b"pear".to_vec())?
///     .build()?;
///
/// let bytes = archive.build()?;
/// assert_eq!(bytes.len(), 3608 + 9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceArchiveBuilder {
    files: Vec<ResourceFile>,
    overflow: StringOverflow,
}

impl ResourceArchiveBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing archive
    pub fn from_archive(archive: &ResourceArchive) -> Self {
        Self {
            files: archive.files.clone(),
            overflow: StringOverflow::default(),
        }
    }

    /// Choose what happens to names longer than 16 bytes
    #[must_use]
    pub fn string_overflow(mut self, overflow: StringOverflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Take the string overflow policy from `options`
    #[must_use]
    pub fn with_options(self, options: &FormatOptions) -> Self {
        self.string_overflow(options.string_overflow)
    }

    /// Add or replace a file
    ///
    /// # Errors
    /// - `LengthMismatch` if the name does not fit under
    ///   [`StringOverflow::Reject`]
    pub fn add_file(mut self, name: &str, data: Vec<u8>) -> Result<Self> {
        let name: ResourceName = FixedString::with_overflow(name.as_bytes(), self.overflow)?;
        match self.files.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.data = data,
            None => self.files.push(ResourceFile { name, data }),
        }
        Ok(self)
    }

    /// Remove a file by name
    #[must_use]
    pub fn remove_file(mut self, name: &str) -> Self {
        self.files.retain(|f| f.name.as_bytes() != name.as_bytes());
        self
    }

    /// Number of files collected so far
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file has been added
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Produce the archive
    ///
    /// # Errors
    /// - `LengthMismatch` if more than 150 files were added
    pub fn build(self) -> Result<ResourceArchive> {
        if self.files.len() > MAX_FILES {
            return Err(FormatError::LengthMismatch {
                field: "resource table",
                expected: MAX_FILES,
                actual: self.files.len(),
            });
        }
        let archive = ResourceArchive { files: self.files };
        archive.table()?;
        Ok(archive)
    }
}
