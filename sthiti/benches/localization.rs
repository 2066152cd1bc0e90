//! Localization Benchmarks
//!
//! - Ray casting through the segment index vs. a linear scan
//! - Particle filter motion and scan updates
//!
//! Run with: `cargo bench`
//! View HTML reports in: `target/criterion/`

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use std::f32::consts::{FRAC_PI_4, TAU};
use std::time::Duration;

use sthiti::{
    BeamModel, BeamModelConfig, GeometryIndex, LaserScan, LocalizationConfig, ParticleFilter,
    Point2D, Pose2D, Ray, Segment,
};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Outer walls plus a grid of short axis-aligned walls and a few diagonals.
fn create_grid_map(cells: usize, cell_size: f32) -> Vec<Segment> {
    let extent = cells as f32 * cell_size;
    let mut segments = vec![
        Segment::from_coords(0.0, 0.0, extent, 0.0),
        Segment::from_coords(extent, 0.0, extent, extent),
        Segment::from_coords(extent, extent, 0.0, extent),
        Segment::from_coords(0.0, extent, 0.0, 0.0),
    ];

    for i in 1..cells {
        for j in 1..cells {
            let x = i as f32 * cell_size;
            let y = j as f32 * cell_size;
            // Stubs leave gaps so rays travel several cells.
            if (i + j) % 2 == 0 {
                segments.push(Segment::from_coords(x - 0.3, y, x + 0.3, y));
            } else {
                segments.push(Segment::from_coords(x, y - 0.3, x, y + 0.3));
            }
            if (i * j) % 7 == 0 {
                segments.push(Segment::from_coords(x + 0.2, y + 0.2, x + 0.6, y + 0.6));
            }
        }
    }

    segments
}

fn create_rays(origin: Point2D, n: usize) -> Vec<Ray> {
    (0..n)
        .map(|i| Ray::new(origin, i as f32 / n as f32 * TAU, 0.05, 12.0))
        .collect()
}

fn brute_force(segments: &[Segment], ray: &Ray) -> f32 {
    segments
        .iter()
        .filter_map(|s| s.ray_intersection(ray.origin, ray.direction))
        .filter(|&t| t >= ray.min_range && t <= ray.max_range)
        .fold(ray.max_range, f32::min)
}

fn create_benchmark_scan(n: usize) -> LaserScan {
    LaserScan::new(vec![2.0; n], 0.05, 12.0, -3.0 * FRAC_PI_4, 3.0 * FRAC_PI_4)
}

// ============================================================================
// Ray Casting Benchmarks
// ============================================================================

fn bench_raycast(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));

    let segments = create_grid_map(20, 1.0);
    let index = GeometryIndex::build(segments.clone(), 1e-4);
    let rays = create_rays(Point2D::new(10.5, 9.5), 360);

    group.bench_function("indexed/360", |b| {
        b.iter(|| {
            for ray in &rays {
                black_box(index.nearest_intersection(black_box(ray)));
            }
        })
    });

    group.bench_function("linear/360", |b| {
        b.iter(|| {
            for ray in &rays {
                black_box(brute_force(black_box(&segments), ray));
            }
        })
    });

    group.bench_function("build/20x20", |b| {
        b.iter_batched(
            || segments.clone(),
            |segments| GeometryIndex::build(segments, 1e-4),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Particle Filter Benchmarks
// ============================================================================

fn bench_particle_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_filter");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));

    let segments = create_grid_map(10, 1.0);
    let scan = create_benchmark_scan(270);
    let start = Pose2D::new(5.5, 4.5, 0.0);

    let mut config = LocalizationConfig::default();
    config.filter.num_particles = 1000;
    config.filter.seed = 1;

    let new_filter = || {
        let mut filter = ParticleFilter::new(config.clone());
        filter.observe_odometry(Pose2D::identity());
        filter.initialize(segments.clone(), start);
        filter
    };

    // Motion model prediction (1000 particles)
    group.bench_function("predict/1000", |b| {
        b.iter_batched(
            new_filter,
            |mut filter| {
                filter.observe_odometry(black_box(Pose2D::new(0.05, 0.0, 0.02)));
            },
            BatchSize::SmallInput,
        )
    });

    // Sensor model update plus resample (1000 particles, 27 beams)
    group.bench_function("update/1000", |b| {
        b.iter_batched(
            || {
                let mut filter = new_filter();
                filter.observe_odometry(Pose2D::new(0.15, 0.0, 0.0));
                filter
            },
            |mut filter| {
                filter.observe_laser(black_box(&scan));
            },
            BatchSize::SmallInput,
        )
    });

    // Single-pose likelihood at full beam resolution
    let index = GeometryIndex::build(segments.clone(), 1e-4);
    let model = BeamModel::new(BeamModelConfig::high_quality());
    group.bench_function("log_likelihood/135", |b| {
        b.iter(|| model.log_likelihood(black_box(&index), black_box(&scan), black_box(&start)))
    });

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(benches, bench_raycast, bench_particle_filter);
criterion_main!(benches);
