//! Resource archive (`.res`) files
//!
//! An archive bundles up to 150 named files. The file table is encrypted
//! with the resource stream cipher parameters and always occupies 150 slots;
//! file data follows the table back to back.
//!
//! # Example
//!
//! ```rust,no_run
//! use across_formats::resource::ResourceArchive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("ACROSS.RES")?;
//! let archive = ResourceArchive::parse(&data)?;
//!
//! for file in &archive.files {
//!     println!("{:16} {:>8} bytes", file.name, file.data.len());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod entry;
mod file;

pub use builder::ResourceArchiveBuilder;
pub use entry::{DATA_OFFSET, ResourceEntry, ResourceName};
pub use file::{MAX_FILES, ResourceArchive, ResourceFile, TableMarker};
