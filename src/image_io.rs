//! TGA image I/O for heightmaps
//!
//! Uncompressed 8-bit grayscale (type 3) and 24-bit color (type 2) images
//! load as a heightmap with one cell per pixel and intensities in 0..=255.
//! Color pixels are reduced to the mean of their channels.

use crate::{Error, Heightmap, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub struct TgaIo;

impl TgaIo {
    /// Save as 8-bit grayscale TGA, top row first
    pub fn save_tga<P: AsRef<Path>>(path: P, map: &Heightmap) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        Self::save_tga_writer(&mut writer, map)?;
        writer.flush()?;
        Ok(())
    }

    pub fn save_tga_writer<W: Write>(mut writer: W, map: &Heightmap) -> Result<()> {
        if map.cols() > u16::MAX as usize {
            return Err(Error::InvalidParameter(
                "Heightmap width too large for TGA".to_string(),
            ));
        }
        if map.rows() > u16::MAX as usize {
            return Err(Error::InvalidParameter(
                "Heightmap height too large for TGA".to_string(),
            ));
        }

        let header = TgaHeader::new(map.cols() as u16, map.rows() as u16);
        writer.write_all(&header.to_bytes())?;

        let bytes: Vec<u8> = map
            .values()
            .iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect();
        writer.write_all(&bytes)?;
        Ok(())
    }

    pub fn load_tga<P: AsRef<Path>>(path: P) -> Result<Heightmap> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_tga_reader(BufReader::new(file))
    }

    pub fn load_tga_reader<R: Read>(mut reader: R) -> Result<Heightmap> {
        let header = TgaHeader::read(&mut reader)?;

        let is_color = match header.image_type {
            2 => true,
            3 => false,
            _ => {
                return Err(Error::InvalidParameter(
                    "TGA has unsupported format (expecting grayscale or color)".to_string(),
                ))
            }
        };

        if is_color && header.pixel_depth != 24 {
            return Err(Error::InvalidParameter(
                "TGA has unsupported bit depth (expecting 24) for color TGAs".to_string(),
            ));
        }
        if !is_color && header.pixel_depth != 8 {
            return Err(Error::InvalidParameter(
                "TGA has unsupported bit depth (expecting 8) for grayscale TGAs".to_string(),
            ));
        }

        // skip the optional image id field
        let mut id = vec![0u8; header.id_length as usize];
        reader.read_exact(&mut id)?;

        let width = header.width as usize;
        let height = header.height as usize;
        let flipped = header.y_axis_flipped();
        let mut map = Heightmap::filled(height, width, 0.0);

        let channels = if is_color { 3 } else { 1 };
        let mut row = vec![0u8; width * channels];
        for y in 0..height {
            reader.read_exact(&mut row)?;
            let iy = if flipped { height - y - 1 } else { y };
            for (x, pixel) in row.chunks_exact(channels).enumerate() {
                let value = pixel.iter().map(|&b| b as f32).sum::<f32>() / channels as f32;
                map.set_value(iy, x, value);
            }
        }

        Ok(map)
    }
}

struct TgaHeader {
    id_length: u8,
    image_type: u8,
    width: u16,
    height: u16,
    pixel_depth: u8,
    image_desc: u8,
}

impl TgaHeader {
    fn new(width: u16, height: u16) -> Self {
        Self {
            id_length: 0,
            image_type: 3,
            width,
            height,
            pixel_depth: 8,
            image_desc: 32,
        }
    }

    fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; 18];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_bytes(bytes))
    }

    fn y_axis_flipped(&self) -> bool {
        (self.image_desc & 0x20) == 0
    }

    fn from_bytes(bytes: [u8; 18]) -> Self {
        let width = u16::from_le_bytes([bytes[12], bytes[13]]);
        let height = u16::from_le_bytes([bytes[14], bytes[15]]);
        Self {
            id_length: bytes[0],
            image_type: bytes[2],
            width,
            height,
            pixel_depth: bytes[16],
            image_desc: bytes[17],
        }
    }

    fn to_bytes(&self) -> [u8; 18] {
        let mut bytes = [0u8; 18];
        bytes[0] = self.id_length;
        bytes[2] = self.image_type;
        bytes[12..14].copy_from_slice(&self.width.to_le_bytes());
        bytes[14..16].copy_from_slice(&self.height.to_le_bytes());
        bytes[16] = self.pixel_depth;
        bytes[17] = self.image_desc;
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_gray_roundtrip() {
        let map = Heightmap::from_rows(&[[0.0, 128.0, 255.0], [10.0, 20.0, 30.0]]).unwrap();
        let mut bytes = Vec::new();
        TgaIo::save_tga_writer(&mut bytes, &map).unwrap();
        assert_eq!(bytes.len(), 18 + 6);

        let loaded = TgaIo::load_tga_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_bottom_up_rows_are_flipped() {
        let mut bytes = TgaHeader::new(2, 2).to_bytes().to_vec();
        bytes[17] = 0;
        bytes.extend_from_slice(&[1, 2, 3, 4]);

        let map = TgaIo::load_tga_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(map.values(), &[3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_color_is_averaged() {
        let mut header = TgaHeader::new(1, 1);
        header.image_type = 2;
        header.pixel_depth = 24;
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&[30, 60, 90]);

        let map = TgaIo::load_tga_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(map.get(0, 0), Some(60.0));
    }

    #[test]
    fn test_unsupported_type() {
        let mut bytes = TgaHeader::new(1, 1).to_bytes().to_vec();
        bytes[2] = 10;
        bytes.push(0);
        assert!(matches!(
            TgaIo::load_tga_reader(Cursor::new(bytes)),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_short_pixel_data() {
        let mut bytes = TgaHeader::new(4, 4).to_bytes().to_vec();
        bytes.extend_from_slice(&[0; 5]);
        assert!(matches!(
            TgaIo::load_tga_reader(Cursor::new(bytes)),
            Err(Error::Io(_))
        ));
    }
}
