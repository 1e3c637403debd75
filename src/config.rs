//! Configuration for the relief builder and the STL encoder

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of the binary STL header
pub const HEADER_LEN: usize = 80;

/// Intensity of the empty background in a rendered heightmap
pub const BACKGROUND: f32 = 255.0;

/// Intensity of fully inked foreground in a rendered heightmap
pub const FOREGROUND: f32 = 0.0;

/// Solid name used when none is given
pub const DEFAULT_SOLID_NAME: &str = "strip_braille_geom";

/// Output layout selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StlMode {
    #[default]
    Binary,
    Ascii,
}

/// Heightmap to relief conversion settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReliefConfig {
    /// Cells with intensity at or above this value are background and masked out
    pub threshold: f32,
    /// Linear factor turning intensity into depth; negative so ink is raised
    pub depth_scale: f32,
    /// Rotate wide grids a quarter turn so the long side becomes rows
    pub rotate: bool,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            threshold: BACKGROUND,
            depth_scale: -0.1,
            rotate: true,
        }
    }
}

impl ReliefConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_depth_scale(mut self, depth_scale: f32) -> Self {
        self.depth_scale = depth_scale;
        self
    }

    pub fn with_rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }
}

/// Header and naming used when encoding
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EncoderConfig {
    /// Name written after `solid` / `endsolid` in ASCII output
    pub solid_name: String,
    /// Raw 80-byte binary header
    pub header: StlHeader,
}

impl EncoderConfig {
    /// Config with the conventional header for the given solid name
    pub fn named(name: &str) -> Self {
        Self {
            solid_name: name.to_string(),
            header: StlHeader::for_name(name),
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::named(DEFAULT_SOLID_NAME)
    }
}

/// Fixed 80-byte binary STL header
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StlHeader([u8; HEADER_LEN]);

impl StlHeader {
    /// Header from raw bytes
    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Self {
        Self(bytes)
    }

    /// Header from text, truncated to 80 bytes and NUL-padded
    pub fn from_text(text: &str) -> Self {
        let mut bytes = [0u8; HEADER_LEN];
        let src = text.as_bytes();
        let len = src.len().min(HEADER_LEN);
        bytes[..len].copy_from_slice(&src[..len]);
        Self(bytes)
    }

    /// `Created by STL_Writer:( name:<name> )`
    pub fn for_name(name: &str) -> Self {
        Self::from_text(&format!("Created by STL_Writer:( name:{} )", name))
    }

    pub fn as_bytes(&self) -> &[u8; HEADER_LEN] {
        &self.0
    }

    /// Header text up to the first NUL, lossily decoded
    pub fn text(&self) -> String {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(HEADER_LEN);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl Default for StlHeader {
    fn default() -> Self {
        Self::from_text("Created by STL Converter")
    }
}

impl std::fmt::Debug for StlHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StlHeader({:?})", self.text())
    }
}

#[cfg(feature = "serde")]
impl Serialize for StlHeader {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for StlHeader {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        if bytes.len() > HEADER_LEN {
            return Err(serde::de::Error::invalid_length(
                bytes.len(),
                &"at most 80 bytes",
            ));
        }
        let mut out = [0u8; HEADER_LEN];
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(Self(out))
    }
}
