use stlrelief::config::FOREGROUND;
use stlrelief::{Heightmap, LogFile, ReliefConfig, StlDocument, StlMode, TgaIo};
use std::env;
use std::path::PathBuf;

/// Six-dot cell pattern, row-major over a 3x2 grid
const DOTS: [[bool; 6]; 3] = [
    [true, false, true, true, false, false],
    [true, true, false, false, true, false],
    [false, true, true, true, true, true],
];

const DOT_SIZE: usize = 4;
const DOT_PITCH: usize = 6;
const CELL_PITCH: usize = 16;
const MARGIN: usize = 4;

/// Paint raised dots (dark pixels) onto a white strip
fn dot_strip() -> Heightmap {
    let rows = MARGIN * 2 + 2 * DOT_PITCH + DOT_SIZE;
    let cols = MARGIN * 2 + DOTS.len() * CELL_PITCH;
    let mut map = Heightmap::filled(rows, cols, 255.0);

    for (cell, dots) in DOTS.iter().enumerate() {
        for (dot, raised) in dots.iter().enumerate() {
            if !raised {
                continue;
            }
            let top = MARGIN + (dot / 2) * DOT_PITCH;
            let left = MARGIN + cell * CELL_PITCH + (dot % 2) * DOT_PITCH;
            for row in top..top + DOT_SIZE {
                for col in left..left + DOT_SIZE {
                    map.set_value(row, col, FOREGROUND);
                }
            }
        }
    }
    map
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== stlrelief - Relief Strip ===\n");

    let out_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir);

    let log = LogFile::new(Some(out_dir.join("relief_strip.log").as_path()), true)?;

    // Heightmap either from a TGA given as second argument or painted here
    let map = match env::args().nth(2) {
        Some(path) => TgaIo::load_tga(&path)?,
        None => {
            let map = dot_strip();
            TgaIo::save_tga(out_dir.join("relief_strip.tga"), &map)?;
            map
        }
    };
    println!("✓ Heightmap {} x {}", map.rows(), map.cols());

    let config = ReliefConfig::default().with_depth_scale(-0.05);
    if !map.contains_active_cells(config.threshold) {
        println!("Nothing below threshold {}, skipping", config.threshold);
        return Ok(());
    }

    let stl_path = out_dir.join("relief_strip.stl");
    let mut doc = StlDocument::open_staged(&stl_path, "strip_braille_geom")?.with_log(log);
    let added = doc.add_relief(&map, &config)?;
    println!("✓ Relief added {} facets", added);

    let bbox = doc.mesh().bounding_box();
    println!("  Bounds: {}", bbox);

    let summary = doc.finish(StlMode::Binary)?;
    println!("✓ Wrote {} ({} bytes)", stl_path.display(), summary.bytes);

    Ok(())
}
