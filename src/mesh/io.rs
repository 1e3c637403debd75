//! STL encoding and decoding
//!
//! # Binary layout
//!
//! ```text
//! UINT8[80]    - Header (free-form, NUL padded)
//! UINT32       - Number of facets (little-endian)
//! foreach facet
//!     REAL32[3] - Normal
//!     REAL32[3] - Vertex 1
//!     REAL32[3] - Vertex 2
//!     REAL32[3] - Vertex 3
//!     UINT16    - Attribute byte count (always 0)
//! end
//! ```
//!
//! # ASCII layout
//!
//! ```text
//! solid name
//! facet normal ni nj nk
//!   outer loop
//!     vertex v1x v1y v1z
//!     vertex v2x v2y v2z
//!     vertex v3x v3y v3z
//!   endloop
//! endfacet
//! endsolid name
//! ```

use super::Mesh;
use crate::config::HEADER_LEN;
use crate::{EncoderConfig, Error, Facet, Result, StlHeader, StlMode};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Size of one binary facet record (12 floats + attribute)
pub const FACET_LEN: usize = Facet::FLOAT_COUNT * 4 + 2;

/// Size of header plus facet count
pub const PREAMBLE_LEN: usize = HEADER_LEN + 4;

/// Byte length of a binary STL holding `count` facets
pub fn binary_len(count: usize) -> u64 {
    PREAMBLE_LEN as u64 + FACET_LEN as u64 * count as u64
}

/// Fail on the first facet with a NaN or infinite component
pub(crate) fn validate_finite(facets: &[Facet]) -> Result<()> {
    for (index, facet) in facets.iter().enumerate() {
        if let Some(value) = facet.first_non_finite() {
            return Err(Error::EncodingRange {
                facet: index,
                value,
            });
        }
    }
    Ok(())
}

fn facet_count_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        Error::InvalidParameter(format!("{} facets exceed the binary STL count field", len))
    })
}

fn write_preamble<W: Write>(writer: &mut W, header: &StlHeader, count: u32) -> io::Result<()> {
    writer.write_all(header.as_bytes())?;
    writer.write_all(&count.to_le_bytes())
}

fn write_facet<W: Write>(writer: &mut W, facet: &Facet) -> io::Result<()> {
    let mut record = [0u8; FACET_LEN];
    for (i, value) in facet.to_array().iter().enumerate() {
        record[i * 4..i * 4 + 4].copy_from_slice(&value.to_le_bytes());
    }
    // attribute byte count stays zero
    writer.write_all(&record)
}

/// Write a binary STL in a single pass
///
/// Suitable for outputs that cannot seek: the facet count is known up front
/// because all facets are already in memory. Returns the facet count written.
pub fn write_binary<W: Write>(writer: W, header: &StlHeader, facets: &[Facet]) -> Result<u32> {
    validate_finite(facets)?;
    let count = facet_count_u32(facets.len())?;

    let mut writer = BufWriter::new(writer);
    write_preamble(&mut writer, header, count)?;
    for facet in facets {
        write_facet(&mut writer, facet)?;
    }
    writer.flush()?;
    Ok(count)
}

/// Write a binary STL with a placeholder count that is patched afterwards
///
/// The header is written with a count of 0, facets are streamed, then the
/// writer seeks back to where the header started and rewrites it with the
/// number of facets actually written. The stream is left positioned after the
/// last facet. Returns the facet count written.
pub fn write_binary_seekable<W: Write + Seek>(
    writer: W,
    header: &StlHeader,
    facets: &[Facet],
) -> Result<u32> {
    validate_finite(facets)?;
    facet_count_u32(facets.len())?;

    let mut writer = BufWriter::new(writer);
    let start = writer.stream_position()?;
    write_preamble(&mut writer, header, 0)?;

    let mut count: u32 = 0;
    for facet in facets {
        write_facet(&mut writer, facet)?;
        count += 1;
    }

    writer.seek(SeekFrom::Start(start))?;
    write_preamble(&mut writer, header, count)?;
    writer.seek(SeekFrom::Start(start + binary_len(count as usize)))?;
    writer.flush()?;
    Ok(count)
}

/// Format a value like C's `%e`: `d.dddddde±XX`
pub fn format_exp(value: f32) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{:.6e}", value as f64);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

fn format_triple(v: &Vector3<f32>) -> String {
    format!(
        "{} {} {}",
        format_exp(v.x),
        format_exp(v.y),
        format_exp(v.z)
    )
}

/// Write an ASCII STL
///
/// Lines are joined with `\n`; no newline follows `endsolid`.
pub fn write_ascii<W: Write>(writer: W, name: &str, facets: &[Facet]) -> Result<()> {
    validate_finite(facets)?;

    let mut writer = BufWriter::new(writer);
    write!(writer, "solid {}", name)?;
    for facet in facets {
        write!(writer, "\nfacet normal {}", format_triple(&facet.normal))?;
        write!(writer, "\n  outer loop")?;
        for vertex in &facet.vertices {
            write!(writer, "\n    vertex {}", format_triple(vertex))?;
        }
        write!(writer, "\n  endloop")?;
        write!(writer, "\nendfacet")?;
    }
    write!(writer, "\nendsolid {}", name)?;
    writer.flush()?;
    Ok(())
}

fn map_eof(e: io::Error, truncated: Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        truncated
    } else {
        Error::Io(e)
    }
}

/// Read a binary STL
///
/// Reads exactly the declared number of facets; trailing bytes are ignored.
/// Attribute bytes are read and discarded.
pub fn read_binary<R: Read>(reader: R) -> Result<(StlHeader, Mesh)> {
    let mut reader = BufReader::new(reader);

    let mut preamble = [0u8; PREAMBLE_LEN];
    reader.read_exact(&mut preamble).map_err(|e| {
        map_eof(
            e,
            Error::InvalidParameter(format!(
                "File too small for STL header (need {} bytes)",
                PREAMBLE_LEN
            )),
        )
    })?;

    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&preamble[..HEADER_LEN]);
    let count = u32::from_le_bytes([
        preamble[HEADER_LEN],
        preamble[HEADER_LEN + 1],
        preamble[HEADER_LEN + 2],
        preamble[HEADER_LEN + 3],
    ]);

    // a bogus count must not trigger a huge allocation
    let mut mesh = Mesh::with_capacity(count.min(1 << 16) as usize);
    let mut record = [0u8; FACET_LEN];
    for index in 0..count {
        reader.read_exact(&mut record).map_err(|e| {
            map_eof(
                e,
                Error::TruncatedFile {
                    expected: count,
                    got: index,
                },
            )
        })?;

        let mut values = [0.0f32; Facet::FLOAT_COUNT];
        for (i, value) in values.iter_mut().enumerate() {
            *value = f32::from_le_bytes([
                record[i * 4],
                record[i * 4 + 1],
                record[i * 4 + 2],
                record[i * 4 + 3],
            ]);
        }
        mesh.add_facet(Facet::from_array(values));
    }

    Ok((StlHeader::from_bytes(header), mesh))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AsciiState {
    Start,
    Solid,
    Facet,
    Loop,
    LoopClosed,
}

fn parse_triple<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Vector3<f32>> {
    let mut values = [0.0f32; 3];
    for value in values.iter_mut() {
        let token = parts
            .next()
            .ok_or_else(|| Error::parse(line, "expected three coordinates"))?;
        *value = token
            .parse()
            .map_err(|e| Error::parse(line, format!("invalid number '{}': {}", token, e)))?;
    }
    if let Some(extra) = parts.next() {
        return Err(Error::parse(line, format!("unexpected token '{}'", extra)));
    }
    Ok(Vector3::from(values))
}

/// Read an ASCII STL
///
/// Returns the solid name and the facets. Indentation and spacing are free.
pub fn read_ascii<R: BufRead>(reader: R) -> Result<(String, Mesh)> {
    let mut state = AsciiState::Start;
    let mut name = String::new();
    let mut mesh = Mesh::new();
    let mut normal = Vector3::zeros();
    let mut corners: Vec<Vector3<f32>> = Vec::with_capacity(3);
    let mut line_no = 0;

    for (index, line) in reader.lines().enumerate() {
        line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match (keyword, state) {
            ("solid", AsciiState::Start) => {
                name = trimmed["solid".len()..].trim().to_string();
                state = AsciiState::Solid;
            }
            ("facet", AsciiState::Solid) => {
                if parts.next() != Some("normal") {
                    return Err(Error::parse(line_no, "expected 'facet normal'"));
                }
                normal = parse_triple(parts, line_no)?;
                corners.clear();
                state = AsciiState::Facet;
            }
            ("outer", AsciiState::Facet) => {
                if parts.next() != Some("loop") || parts.next().is_some() {
                    return Err(Error::parse(line_no, "expected 'outer loop'"));
                }
                state = AsciiState::Loop;
            }
            ("vertex", AsciiState::Loop) => {
                if corners.len() == 3 {
                    return Err(Error::parse(line_no, "more than three vertices in facet"));
                }
                corners.push(parse_triple(parts, line_no)?);
            }
            ("endloop", AsciiState::Loop) => {
                if corners.len() != 3 {
                    return Err(Error::parse(
                        line_no,
                        format!("facet has {} vertices, expected 3", corners.len()),
                    ));
                }
                state = AsciiState::LoopClosed;
            }
            ("endfacet", AsciiState::LoopClosed) => {
                mesh.add_facet(Facet::new(normal, corners[0], corners[1], corners[2]));
                state = AsciiState::Solid;
            }
            ("endsolid", AsciiState::Solid) => {
                return Ok((name, mesh));
            }
            (keyword, state) => {
                return Err(Error::parse(
                    line_no,
                    format!("unexpected '{}' while in {:?}", keyword, state),
                ));
            }
        }
    }

    Err(Error::parse(line_no, "missing 'endsolid'"))
}

fn open_for_read(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::ResourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn create_for_write(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::ResourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn save_stl_impl<P: AsRef<Path>>(
    mesh: &Mesh,
    path: P,
    mode: StlMode,
    config: &EncoderConfig,
) -> Result<()> {
    // validate before the file is created so a bad mesh leaves nothing behind
    validate_finite(mesh.facets())?;
    let mut file = create_for_write(path.as_ref())?;
    match mode {
        StlMode::Binary => {
            write_binary_seekable(&mut file, &config.header, mesh.facets())?;
        }
        StlMode::Ascii => write_ascii(&mut file, &config.solid_name, mesh.facets())?,
    }
    file.sync_all()?;
    Ok(())
}

pub(super) fn load_stl_impl<P: AsRef<Path>>(path: P) -> Result<(StlHeader, Mesh)> {
    let file = open_for_read(path.as_ref())?;
    read_binary(file)
}

pub(super) fn load_stl_ascii_impl<P: AsRef<Path>>(path: P) -> Result<(String, Mesh)> {
    let file = open_for_read(path.as_ref())?;
    read_ascii(BufReader::new(file))
}
