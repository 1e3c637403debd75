use nalgebra::Vector3;
use stlrelief::{StlDocument, StlMode};
use std::env;
use std::path::PathBuf;

fn p(x: f32, y: f32, z: f32) -> Vector3<f32> {
    Vector3::new(x, y, z)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== stlrelief - Polygon Faces ===\n");

    let out_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir);

    // ========================================
    // 1. Unit cube from six quads
    // ========================================
    println!("--- 1. Cube ---");

    let a = p(0.0, 0.0, 1.0);
    let b = p(1.0, 0.0, 1.0);
    let c = p(1.0, 0.0, 0.0);
    let d = p(0.0, 0.0, 0.0);
    let e = p(1.0, 1.0, 0.0);
    let f = p(1.0, 1.0, 1.0);
    let g = p(0.0, 1.0, 0.0);
    let h = p(0.0, 1.0, 1.0);

    let cube_path = out_dir.join("cube.stl");
    let mut doc = StlDocument::open(&cube_path, "cube")?;
    for face in [
        [b, a, d, c],
        [e, f, b, c],
        [f, h, a, b],
        [g, e, c, d],
        [h, f, e, g],
        [h, g, d, a],
    ] {
        doc.add_polygon(&face)?;
    }
    println!(
        "✓ {} facets, volume {:.3}, area {:.3}",
        doc.facet_count(),
        doc.mesh().signed_volume(),
        doc.mesh().surface_area()
    );
    let summary = doc.finish(StlMode::Binary)?;
    println!("✓ Wrote {} ({} bytes)", cube_path.display(), summary.bytes);

    // ========================================
    // 2. Prism with a pentagon cross-section
    // ========================================
    println!("\n--- 2. Pentagon prism ---");

    let a = p(3.0, 0.0, 0.0);
    let b = p(3.0, 10.0, 0.0);
    let c = p(1.5, 12.0, 0.0);
    let d = p(0.0, 10.0, 0.0);
    let e = p(0.0, 0.0, 0.0);
    let f = p(3.0, 0.0, 2.0);
    let g = p(3.0, 10.0, 2.0);
    let h = p(1.5, 12.0, 2.0);
    let i = p(0.0, 10.0, 2.0);
    let j = p(0.0, 0.0, 2.0);

    let prism_path = out_dir.join("difficult_shape.stl");
    let mut doc = StlDocument::open(&prism_path, "difficult_shape")?;
    doc.add_polygon(&[j, e, a, f])?;
    doc.add_polygon(&[g, f, a, b])?;
    doc.add_polygon(&[h, g, b, c])?;
    doc.add_polygon(&[i, h, c, d])?;
    doc.add_polygon(&[j, i, d, e])?;
    doc.add_polygon(&[i, j, f, g, h])?;
    doc.add_polygon(&[a, e, d, c, b])?;
    println!(
        "✓ {} facets, volume {:.3}",
        doc.facet_count(),
        doc.mesh().signed_volume()
    );
    let summary = doc.finish(StlMode::Ascii)?;
    println!("✓ Wrote {} ({} bytes, ASCII)", prism_path.display(), summary.bytes);

    Ok(())
}
