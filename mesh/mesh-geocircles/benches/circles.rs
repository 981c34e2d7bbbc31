//! Benchmarks for geodesic circle computation.
//!
//! Run with: cargo bench -p mesh-geocircles

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mesh_geocircles::{circle_stats, geodesic_circles, CircleParams};
use mesh_geodesic::GeodesicSolver;
use mesh_types::{grid, IndexedMesh};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create a wavy square sheet with `n x n` cells.
fn create_sheet(n: usize) -> IndexedMesh {
    let mut mesh = grid(n, n, 1.0);
    for vertex in &mut mesh.vertices {
        let p = vertex.position;
        vertex.position.z = (p.x * 0.3).sin() * (p.y * 0.2).cos();
    }
    mesh
}

// =============================================================================
// Coverage Benchmarks
// =============================================================================

fn bench_circle_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("CircleStats");

    for n in [32, 64] {
        let mesh = create_sheet(n);
        let Ok(solver) = GeodesicSolver::new(&mesh) else {
            continue;
        };
        let Ok(field) = solver.compute_from_vertex(mesh.vertices.len() / 2) else {
            continue;
        };
        let field = field.corrected();
        let radii: Vec<f64> = (1..=10).map(f64::from).collect();

        group.throughput(Throughput::Elements(mesh.faces.len() as u64));
        group.bench_with_input(BenchmarkId::new("ten_radii", n), &field, |b, field| {
            b.iter(|| circle_stats(solver.graph(), black_box(field), &radii, None));
        });
    }

    group.finish();
}

// =============================================================================
// Batch Benchmarks
// =============================================================================

fn bench_geodesic_circles(c: &mut Criterion) {
    let mut group = c.benchmark_group("GeodesicCircles");
    group.sample_size(10);

    let mesh = create_sheet(24);
    if let Ok(solver) = GeodesicSolver::new(&mesh) {
        let bounded = CircleParams::default();
        let with_mean = CircleParams::default().mean_distance(true);

        group.throughput(Throughput::Elements(mesh.vertices.len() as u64));
        group.bench_function("sheet_24_bounded", |b| {
            b.iter(|| geodesic_circles(black_box(&solver), None, &bounded, None));
        });
        group.bench_function("sheet_24_mean_distance", |b| {
            b.iter(|| geodesic_circles(black_box(&solver), None, &with_mean, None));
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_circle_stats, bench_geodesic_circles);
criterion_main!(benches);
