//! STL document: collects faces and writes them out once
//!
//! A document owns its output from construction on. `finish` encodes the
//! accumulated mesh and releases the output whether encoding succeeds or not;
//! it consumes the document, so nothing can be written afterwards.

use crate::mesh::io::{binary_len, create_for_write, write_ascii, write_binary, write_binary_seekable};
use crate::utils::Utils;
use crate::{
    EncoderConfig, FaceReport, Heightmap, LogFile, Mesh, ReliefConfig, Result, StlHeader, StlMode,
};
use nalgebra::Vector3;
use std::fs;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

/// Writer that can also seek
pub trait WriteSeek: Write + Seek {}

impl<T: Write + Seek> WriteSeek for T {}

/// Destination of an STL document
pub enum Output<'a> {
    /// Supports seeking; binary output patches the facet count in place
    Seekable(Box<dyn WriteSeek + 'a>),
    /// Forward-only; binary output is written in one pass
    Stream(Box<dyn Write + 'a>),
}

impl Output<'_> {
    pub fn is_seekable(&self) -> bool {
        matches!(self, Output::Seekable(_))
    }
}

impl std::fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Seekable(_) => write!(f, "Output::Seekable"),
            Output::Stream(_) => write!(f, "Output::Stream"),
        }
    }
}

/// What `finish` wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishSummary {
    pub mode: StlMode,
    pub facets: usize,
    pub bytes: u64,
    /// Facets stored with a zero normal because their points were degenerate
    pub degenerate: usize,
}

/// Staged file renamed over its destination on success, removed otherwise
struct Staging {
    staged: PathBuf,
    dest: PathBuf,
    committed: bool,
}

impl Staging {
    fn commit(mut self) -> Result<()> {
        fs::rename(&self.staged, &self.dest)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.staged);
        }
    }
}

/// Single-use STL writer
///
/// # Example
///
/// ```rust,no_run
/// use stlrelief::{StlDocument, StlMode};
/// use nalgebra::Vector3;
///
/// let mut doc = StlDocument::open("square.stl", "square")?;
/// doc.add_polygon(&[
///     Vector3::new(0.0, 0.0, 0.0),
///     Vector3::new(1.0, 0.0, 0.0),
///     Vector3::new(1.0, 1.0, 0.0),
///     Vector3::new(0.0, 1.0, 0.0),
/// ])?;
/// let summary = doc.finish(StlMode::Binary)?;
/// assert_eq!(summary.facets, 2);
/// # Ok::<(), stlrelief::Error>(())
/// ```
#[derive(Debug)]
pub struct StlDocument<'a> {
    config: EncoderConfig,
    mesh: Mesh,
    output: Output<'a>,
    target: Option<PathBuf>,
    staging: Option<Staging>,
    log: Option<LogFile>,
    degenerate: usize,
}

impl std::fmt::Debug for Staging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Staging({} -> {})", self.staged.display(), self.dest.display())
    }
}

impl StlDocument<'static> {
    /// Create (truncate) `path` and start an empty document named `name`
    pub fn open<P: AsRef<Path>>(path: P, name: &str) -> Result<Self> {
        let path = path.as_ref();
        let file = create_for_write(path)?;
        let mut doc = Self::with_output(Output::Seekable(Box::new(file)), name);
        doc.target = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Like [`StlDocument::open`], but write to `<path>.partial` and rename
    /// it over `path` only when `finish` succeeds
    pub fn open_staged<P: AsRef<Path>>(path: P, name: &str) -> Result<Self> {
        let dest = path.as_ref().to_path_buf();
        let staged = Utils::staging_path_for(&dest);
        let file = create_for_write(&staged)?;
        let mut doc = Self::with_output(Output::Seekable(Box::new(file)), name);
        doc.staging = Some(Staging {
            staged,
            dest: dest.clone(),
            committed: false,
        });
        doc.target = Some(dest);
        Ok(doc)
    }
}

impl<'a> StlDocument<'a> {
    /// Document over a seekable writer (file, cursor)
    pub fn from_writer<W: Write + Seek + 'a>(writer: W, name: &str) -> Self {
        Self::with_output(Output::Seekable(Box::new(writer)), name)
    }

    /// Document over a forward-only writer (pipe, socket)
    pub fn from_stream<W: Write + 'a>(writer: W, name: &str) -> Self {
        Self::with_output(Output::Stream(Box::new(writer)), name)
    }

    pub fn with_output(output: Output<'a>, name: &str) -> Self {
        Self {
            config: EncoderConfig::named(name),
            mesh: Mesh::new(),
            output,
            target: None,
            staging: None,
            log: None,
            degenerate: 0,
        }
    }

    /// Replace the binary header
    pub fn with_header(mut self, header: StlHeader) -> Self {
        self.config.header = header;
        self
    }

    /// Replace header and solid name together
    pub fn with_config(mut self, config: EncoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Report degenerate faces and the final write to `log`
    pub fn with_log(mut self, log: LogFile) -> Self {
        self.log = Some(log);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.solid_name
    }

    pub fn header(&self) -> &StlHeader {
        &self.config.header
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn facet_count(&self) -> usize {
        self.mesh.facet_count()
    }

    pub fn degenerate_count(&self) -> usize {
        self.degenerate
    }

    pub fn is_seekable(&self) -> bool {
        self.output.is_seekable()
    }

    fn log(&self, message: impl AsRef<str>) {
        if let Some(log) = &self.log {
            let _ = log.log(message);
        }
    }

    fn note(&mut self, report: FaceReport) -> FaceReport {
        if report.is_degenerate() {
            self.degenerate += 1;
            if let Some(facet) = self.mesh.facet(report.index()) {
                let message = format!(
                    "[{}] degenerate triangle, zero normal: {}",
                    self.config.solid_name, facet
                );
                self.log(message);
            }
        }
        report
    }

    /// Add triangle ABC; normal from the right-hand rule
    pub fn add_triangle(&mut self, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> FaceReport {
        let report = self.mesh.add_triangle(a, b, c);
        self.note(report)
    }

    /// Add a fan-triangulated polygon
    pub fn add_polygon(&mut self, points: &[Vector3<f32>]) -> Result<Vec<FaceReport>> {
        let reports = self.mesh.add_polygon(points)?;
        Ok(reports.into_iter().map(|r| self.note(r)).collect())
    }

    /// Add a facet with an explicit normal
    pub fn add_face_with_normal(
        &mut self,
        a: Vector3<f32>,
        b: Vector3<f32>,
        c: Vector3<f32>,
        normal: impl Into<Vector3<f32>>,
    ) -> usize {
        self.mesh.add_face_with_normal(a, b, c, normal)
    }

    /// Add the relief surface of a heightmap
    pub fn add_relief(&mut self, map: &Heightmap, config: &ReliefConfig) -> Result<usize> {
        let added = self.mesh.add_relief(map, config)?;
        self.log(format!(
            "[{}] relief {}x{} -> {} facets",
            self.config.solid_name,
            map.rows(),
            map.cols(),
            added
        ));
        Ok(added)
    }

    /// Append all facets of an existing mesh
    pub fn add_mesh(&mut self, mesh: &Mesh) {
        self.mesh.extend(mesh.iter().copied());
    }

    /// Encode the collected facets and release the output
    ///
    /// The output is closed on every path, including encoding errors. For
    /// staged documents the destination only appears on success.
    pub fn finish(self, mode: StlMode) -> Result<FinishSummary> {
        let StlDocument {
            config,
            mesh,
            output,
            target,
            staging,
            log,
            degenerate,
        } = self;

        let written = encode(output, mode, &config, &mesh);
        let written = match (written, staging) {
            (Ok(bytes), Some(staging)) => staging.commit().map(|_| bytes),
            (result, _) => result,
        };

        let where_to = target
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "writer".to_string());
        match &written {
            Ok(bytes) => {
                if let Some(log) = &log {
                    let _ = log.log(format!(
                        "[{}] wrote {} facets ({} bytes, {:?}) to {}",
                        config.solid_name,
                        mesh.facet_count(),
                        bytes,
                        mode,
                        where_to
                    ));
                }
            }
            Err(e) => {
                if let Some(log) = &log {
                    let _ = log.log(format!(
                        "[{}] failed writing {}: {}",
                        config.solid_name, where_to, e
                    ));
                }
            }
        }

        Ok(FinishSummary {
            mode,
            facets: mesh.facet_count(),
            bytes: written?,
            degenerate,
        })
    }
}

/// Counts bytes passed through to the inner writer
struct CountingWriter<W> {
    inner: W,
    bytes: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Takes the output by value so it is dropped on return
fn encode(output: Output<'_>, mode: StlMode, config: &EncoderConfig, mesh: &Mesh) -> Result<u64> {
    match (mode, output) {
        (StlMode::Binary, Output::Seekable(mut writer)) => {
            let count = write_binary_seekable(&mut writer, &config.header, mesh.facets())?;
            writer.flush()?;
            Ok(binary_len(count as usize))
        }
        (StlMode::Binary, Output::Stream(mut writer)) => {
            let count = write_binary(&mut writer, &config.header, mesh.facets())?;
            writer.flush()?;
            Ok(binary_len(count as usize))
        }
        (StlMode::Ascii, Output::Seekable(writer)) => encode_ascii(writer, config, mesh),
        (StlMode::Ascii, Output::Stream(writer)) => encode_ascii(writer, config, mesh),
    }
}

fn encode_ascii<W: Write>(writer: W, config: &EncoderConfig, mesh: &Mesh) -> Result<u64> {
    let mut counting = CountingWriter {
        inner: writer,
        bytes: 0,
    };
    write_ascii(&mut counting, &config.solid_name, mesh.facets())?;
    counting.flush()?;
    Ok(counting.bytes)
}
