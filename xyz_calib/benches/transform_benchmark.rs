//! Transform micro-benchmark.
//!
//! Measures the per-command cost the calibration layer adds to a move:
//! - forward map (position read)
//! - inverse map (absolute move)
//! - full four-point primary calibration

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use xyz_calib::simulation::SimulatedStage;
use xyz_calib::{Transform, VirtualXyzUnit};
use xyz_common::device::{DeviceError, XyzDevice};
use xyz_common::geometry::{Mat3, Vec3};

struct NullDevice;

impl XyzDevice for NullDevice {
    fn position(&mut self) -> Result<Vec3, DeviceError> {
        Ok(Vec3::zeros())
    }

    fn absolute_move(&mut self, _target: Vec3) -> Result<(), DeviceError> {
        Ok(())
    }

    fn relative_move(&mut self, _delta: Vec3) -> Result<(), DeviceError> {
        Ok(())
    }
}

fn reference_transform() -> Transform {
    let m = Mat3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    Transform::from_parts(m, Vec3::new(12.0, -3.0, 40.0)).unwrap()
}

fn bench_forward(c: &mut Criterion) {
    let t = reference_transform();
    let v = Vec3::new(100.0, 200.0, 300.0);
    c.bench_function("transform_forward", |b| b.iter(|| t.forward(black_box(&v))));
}

fn bench_inverse(c: &mut Criterion) {
    let t = reference_transform();
    let v = Vec3::new(100.0, 200.0, 300.0);
    c.bench_function("transform_inverse", |b| b.iter(|| t.inverse(black_box(&v))));
}

fn bench_primary_calibration(c: &mut Criterion) {
    let t = reference_transform();
    let device_points = [
        Vec3::zeros(),
        Vec3::new(100.0, 0.0, 0.0),
        Vec3::new(0.0, 100.0, 0.0),
        Vec3::new(0.0, 0.0, 100.0),
    ];
    let stage_points = device_points.map(|p| t.forward(&p));
    let stage = SimulatedStage::default();
    let mut unit = VirtualXyzUnit::new(NullDevice, &stage);

    c.bench_function("primary_calibration", |b| {
        b.iter(|| {
            unit.primary_calibration(black_box(&stage_points), black_box(&device_points))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_forward, bench_inverse, bench_primary_calibration);
criterion_main!(benches);
