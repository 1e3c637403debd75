//! # stlrelief
//!
//! Writes triangle meshes as binary or ASCII STL and reads them back.
//!
//! ## Features
//!
//! - **Byte-exact binary STL**: 80-byte header, facet count patched after
//!   streaming, 50 bytes per facet
//! - **ASCII STL** with C `%e` number formatting
//! - **Polygon builder**: fan triangulation with right-hand-rule normals
//! - **Relief builder**: turns a heightmap into a masked triangle surface
//!
//! ## Example
//!
//! ```rust,no_run
//! use stlrelief::{Heightmap, ReliefConfig, StlDocument, StlMode};
//!
//! let mut map = Heightmap::filled(32, 8, 255.0);
//! for row in 4..28 {
//!     map.set_value(row, 3, 0.0);
//!     map.set_value(row, 4, 0.0);
//! }
//!
//! let mut doc = StlDocument::open("strip.stl", "strip")?;
//! doc.add_relief(&map, &ReliefConfig::default())?;
//! doc.finish(StlMode::Binary)?;
//! # Ok::<(), stlrelief::Error>(())
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod heightmap;
pub mod image_io;
pub mod log;
pub mod mesh;
pub mod types;
pub mod utils;

// Re-exports
pub use config::{EncoderConfig, ReliefConfig, StlHeader, StlMode};
pub use document::{FinishSummary, Output, StlDocument, WriteSeek};
pub use error::{Error, Result};
pub use heightmap::Heightmap;
pub use image_io::TgaIo;
pub use log::LogFile;
pub use mesh::{
    format_exp, read_ascii, read_binary, triangle_normal, write_ascii, write_binary,
    write_binary_seekable, FaceReport, Mesh,
};
pub use types::{Axis, BBox3, Facet};
pub use utils::{TempFolder, Utils};
