// 端到端验证：字节 → 点集 → 三角网格 → 字节
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use triangulator::delaunay::{convex_hull_size, is_planar, validate_delaunay};
use triangulator::{
    decode_point_set, decode_triangle_mesh, encode_point_set, encode_triangle_mesh, Error,
    FailureKind, PointSet, TriangleMesh, Triangulator,
};

/// delaunator 给出的参考三角形数量
fn reference_triangle_count(ps: &PointSet) -> usize {
    let points: Vec<delaunator::Point> = ps
        .points()
        .iter()
        .map(|p| delaunator::Point {
            x: f64::from(p.x),
            y: f64::from(p.y),
        })
        .collect();
    delaunator::triangulate(&points).len()
}

fn random_point_set(n: usize, seed: u64) -> PointSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let coords: Vec<[f32; 2]> = (0..n)
        .map(|_| [rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)])
        .collect();
    PointSet::from_coords(&coords)
}

#[test]
fn test_point_set_literal_bytes() {
    println!("\n=== Testing PointSet Literal Bytes ===");

    let ps = PointSet::from_coords(&[[1.0, 2.0], [1.0, 6.0], [4.0, 4.0]]);
    let bytes = encode_point_set(&ps).unwrap();

    let mut expected = 3u32.to_le_bytes().to_vec();
    for v in [1.0f32, 2.0, 1.0, 6.0, 4.0, 4.0] {
        expected.extend_from_slice(&v.to_le_bytes());
    }
    println!("Encoded {} bytes", bytes.len());
    assert_eq!(bytes.len(), 28);
    assert_eq!(bytes, expected);
    assert_eq!(decode_point_set(&bytes).unwrap(), ps);

    println!("✓ PointSet literal bytes test passed");
}

#[test]
fn test_full_pipeline() {
    println!("\n=== Testing Full Pipeline ===");

    let ps = random_point_set(50, 7);
    let input = encode_point_set(&ps).unwrap();
    println!("Input: {} points, {} bytes", ps.count(), input.len());

    let output = Triangulator::default().triangulate_bytes(&input).unwrap();
    let mesh = decode_triangle_mesh(&output).unwrap();
    println!("Output: {} triangles, {} bytes", mesh.triangle_count(), output.len());

    assert_eq!(mesh.point_set(), &ps);
    assert!(mesh.validate().is_ok());
    assert!(is_planar(&mesh));
    assert!(validate_delaunay(&mesh, 1e-9));

    // 与直接调用得到的网格一致
    let direct = Triangulator::default().triangulate(ps).unwrap();
    assert_eq!(direct, mesh);
    assert_eq!(encode_triangle_mesh(&direct).unwrap(), output);

    println!("✓ Full pipeline test passed");
}

#[test]
fn test_random_point_sets_are_delaunay() {
    println!("\n=== Testing Random Point Sets ===");

    let triangulator = Triangulator::default();
    for seed in 0..10 {
        let ps = random_point_set(50, seed);
        let hull = convex_hull_size(&ps);
        let expected = reference_triangle_count(&ps);
        let mesh = triangulator.triangulate(ps).unwrap();
        println!(
            "  seed {}: {} triangles, {} hull points",
            seed,
            mesh.triangle_count(),
            hull
        );

        assert!(is_planar(&mesh), "seed {} is not planar", seed);
        assert!(validate_delaunay(&mesh, 1e-9), "seed {} is not Delaunay", seed);
        // 整个凸包都被覆盖，包括贴着凸包的细长三角形
        assert_eq!(mesh.triangle_count(), expected, "seed {}", seed);
        assert_eq!(mesh.triangle_count(), 2 * 50 - 2 - hull, "seed {}", seed);
    }

    println!("✓ Random point sets test passed");
}

#[test]
fn test_mesh_round_trip() {
    println!("\n=== Testing Mesh Round Trip ===");

    let ps = PointSet::from_coords(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    let mesh = TriangleMesh::new(ps, vec![[0, 1, 2], [0, 2, 3]]);
    let bytes = encode_triangle_mesh(&mesh).unwrap();
    assert_eq!(bytes.len(), 4 + 4 * 8 + 4 + 2 * 12);
    assert_eq!(decode_triangle_mesh(&bytes).unwrap(), mesh);

    let empty = TriangleMesh::empty(PointSet::empty());
    let bytes = encode_triangle_mesh(&empty).unwrap();
    assert_eq!(bytes, vec![0; 8]);
    assert_eq!(decode_triangle_mesh(&bytes).unwrap(), empty);

    println!("✓ Mesh round trip test passed");
}

#[test]
fn test_failure_tags() {
    println!("\n=== Testing Failure Tags ===");

    let triangulator = Triangulator::default();

    // 5 个任意字节：声明的点数远超实际长度
    let err = triangulator.triangulate_bytes(&[9, 0, 0, 0, 1]).unwrap_err();
    println!("Truncated input: {} ({})", err.kind(), err);
    assert_eq!(err.kind(), FailureKind::MalformedInput);

    let err = triangulator.triangulate_bytes(&[1, 2, 3]).unwrap_err();
    assert_eq!(err.kind().code(), "INVALID_FORMAT");

    let coincident = PointSet::from_coords(&[[4.0, 4.0]; 5]);
    let err = triangulator
        .triangulate_bytes(&encode_point_set(&coincident).unwrap())
        .unwrap_err();
    println!("Coincident input: {} ({})", err.kind(), err);
    assert_eq!(err.kind().code(), "TRIANGULATION_FAILED");

    let out_of_range = TriangleMesh::new(
        PointSet::from_coords(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
        vec![[0, 1, 3]],
    );
    let err: Error = encode_triangle_mesh(&out_of_range).unwrap_err().into();
    println!("Out of range mesh: {} ({})", err.kind(), err);
    assert_eq!(err.kind(), FailureKind::Encode);
    assert_eq!(err.kind().code(), "ENCODE_FAILED");

    println!("✓ Failure tags test passed");
}

#[test]
fn test_batch_matches_sequential() {
    println!("\n=== Testing Batch Triangulation ===");

    let triangulator = Triangulator::default();
    let sets: Vec<PointSet> = (0..8).map(|seed| random_point_set(30 + seed as usize, seed)).collect();

    let sequential: Vec<TriangleMesh> = sets
        .iter()
        .map(|ps| triangulator.triangulate(ps.clone()).unwrap())
        .collect();
    let batch = triangulator.triangulate_batch(sets);

    assert_eq!(batch.len(), sequential.len());
    for (b, s) in batch.into_iter().zip(sequential) {
        assert_eq!(b.unwrap(), s);
    }

    println!("✓ Batch triangulation test passed");
}
