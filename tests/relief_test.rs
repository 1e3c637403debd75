use stlrelief::{
    Heightmap, Mesh, ReliefConfig, StlDocument, StlMode, TempFolder, TgaIo,
};

/// Vertical stroke two cells wide, rows 4..28 of a 32x8 map
fn stroke_map() -> Heightmap {
    let mut map = Heightmap::filled(32, 8, 255.0);
    for row in 4..28 {
        map.set_value(row, 3, 100.0);
        map.set_value(row, 4, 100.0);
    }
    map
}

#[test]
fn test_relief_from_tga_to_stl() {
    let tmp = TempFolder::new().expect("Failed to create temp folder");
    let tga_path = tmp.path().join("stroke.tga");
    let stl_path = tmp.path().join("stroke.stl");

    TgaIo::save_tga(&tga_path, &stroke_map()).expect("Failed to save TGA");
    let map = TgaIo::load_tga(&tga_path).expect("Failed to load TGA");
    assert_eq!(map, stroke_map());
    println!("✓ Heightmap survived TGA round trip");

    let mut doc = StlDocument::open(&stl_path, "stroke").expect("Failed to open document");
    let added = doc
        .add_relief(&map, &ReliefConfig::default())
        .expect("Failed to build relief");
    // 23 fully active windows in the single column pair
    assert_eq!(added, 46);
    doc.finish(StlMode::Binary).expect("Failed to finish document");

    let mesh = Mesh::load_stl(&stl_path).expect("Failed to load STL");
    assert_eq!(mesh.facet_count(), 46);
    assert_eq!(mesh.zero_normal_count(), 46);

    for facet in mesh.iter() {
        for vertex in facet.vertices.iter() {
            assert!((vertex.z + 10.0).abs() < 1e-4, "z was {}", vertex.z);
        }
    }

    let bbox = mesh.bounding_box();
    assert_eq!(bbox.min().x, 4.0 - 16.0);
    assert_eq!(bbox.max().x, 27.0 - 16.0);
    assert_eq!(bbox.min().y, 3.0 - 4.0);
    assert_eq!(bbox.max().y, 4.0 - 4.0);
    println!("✓ Relief mesh: {} facets, bounds {}", mesh.facet_count(), bbox);
}

#[test]
fn test_wide_map_is_rotated() {
    let tall = stroke_map();
    let wide = {
        let mut map = Heightmap::filled(8, 32, 255.0);
        for col in 4..28 {
            map.set_value(3, col, 100.0);
            map.set_value(4, col, 100.0);
        }
        map
    };

    let config = ReliefConfig::default();
    let from_wide = Mesh::from_relief(&wide, &config).expect("Failed to build relief");
    let from_tall = Mesh::from_relief(&tall, &config).expect("Failed to build relief");
    assert_eq!(from_wide.facet_count(), from_tall.facet_count());

    // Rotation lays the stroke along x in both cases
    let size = from_wide.bounding_box().size();
    assert!(size.x > size.y);

    let unrotated =
        Mesh::from_relief(&wide, &config.with_rotate(false)).expect("Failed to build relief");
    let size = unrotated.bounding_box().size();
    assert!(size.y > size.x);
}

#[test]
fn test_all_background_map_writes_empty_solid() {
    let tmp = TempFolder::new().expect("Failed to create temp folder");
    let path = tmp.path().join("blank.stl");

    let map = Heightmap::filled(6, 6, 255.0);
    assert!(!map.contains_active_cells(255.0));

    let mut doc = StlDocument::open(&path, "blank").expect("Failed to open document");
    assert_eq!(
        doc.add_relief(&map, &ReliefConfig::default())
            .expect("Failed to build relief"),
        0
    );
    let summary = doc.finish(StlMode::Binary).expect("Failed to finish document");
    assert_eq!(summary.bytes, 84);
}
