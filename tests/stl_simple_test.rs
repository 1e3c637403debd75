use nalgebra::Vector3;
use stlrelief::{Mesh, StlMode, TempFolder};
use std::fs;

#[test]
fn test_stl_save_manual_mesh() {
    // Create a simple triangle mesh manually
    let mut mesh = Mesh::new();
    mesh.add_triangle(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(10.0, 0.0, 0.0),
        Vector3::new(5.0, 10.0, 0.0),
    );

    println!("Manual mesh has {} facets", mesh.facet_count());

    // Save to STL file
    let tmp = TempFolder::new().expect("Failed to create temp folder");
    let output_path = tmp.path().join("test_triangle.stl");
    mesh.save_stl(&output_path, StlMode::Binary)
        .expect("Failed to save STL");

    // Verify file exists and has correct size
    assert!(output_path.exists(), "STL file was not created");

    let metadata = fs::metadata(&output_path).expect("Failed to read file metadata");
    let expected_size = 80 + 4 + 50; // header + count + 1 triangle
    assert_eq!(
        metadata.len(),
        expected_size as u64,
        "STL file size mismatch for single triangle: expected {}, got {}",
        expected_size,
        metadata.len()
    );

    println!(
        "✓ Manual triangle STL saved successfully: {} bytes",
        metadata.len()
    );
}

#[test]
fn test_count_field_and_length_for_many_sizes() {
    let tmp = TempFolder::new().expect("Failed to create temp folder");

    for k in [0usize, 1, 2, 7, 100] {
        let mut mesh = Mesh::new();
        for i in 0..k {
            let x = i as f32;
            mesh.add_triangle(
                Vector3::new(x, 0.0, 0.0),
                Vector3::new(x + 1.0, 0.0, 0.0),
                Vector3::new(x, 1.0, 0.0),
            );
        }

        let path = tmp.path().join(format!("count_{}.stl", k));
        mesh.save_stl(&path, StlMode::Binary)
            .expect("Failed to save STL");

        let bytes = fs::read(&path).expect("Failed to read STL");
        assert_eq!(bytes.len(), 84 + 50 * k, "length for {} facets", k);
        let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
        assert_eq!(count as usize, k, "count field for {} facets", k);
    }
}

#[test]
fn test_ascii_file_layout() {
    let mut mesh = Mesh::new();
    mesh.add_triangle(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    );

    let tmp = TempFolder::new().expect("Failed to create temp folder");
    let path = tmp.path().join("tri_ascii.stl");
    mesh.save_stl(&path, StlMode::Ascii)
        .expect("Failed to save ASCII STL");

    let text = fs::read_to_string(&path).expect("Failed to read ASCII STL");
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(
        lines,
        vec![
            "solid strip_braille_geom",
            "facet normal 0.000000e+00 0.000000e+00 1.000000e+00",
            "  outer loop",
            "    vertex 0.000000e+00 0.000000e+00 0.000000e+00",
            "    vertex 1.000000e+00 0.000000e+00 0.000000e+00",
            "    vertex 0.000000e+00 1.000000e+00 0.000000e+00",
            "  endloop",
            "endfacet",
            "endsolid strip_braille_geom",
        ]
    );
}
