use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::DVec2;
use kinematic_calibration_data::correlate::correlate_frames;
use kinematic_calibration_data::detection::{DetectedImage, DetectionResult, TagObservation};
use kinematic_calibration_data::{CameraAsset, CameraAssets};
use serde_json::json;
use std::path::Path;

const CAMERAS: u32 = 2;
const FRAMES: usize = 200;
const TAGS_PER_IMAGE: u32 = 36;

fn synthetic_cameras() -> CameraAssets<()> {
    (0..CAMERAS)
        .map(|camera_id| {
            let images = (0..FRAMES)
                .map(|i| DetectedImage {
                    filename: format!("cam{camera_id}/{i:06}.png"),
                })
                .collect();
            let tag_observations = (0..FRAMES)
                .flat_map(|i| {
                    (0..TAGS_PER_IMAGE).map(move |tag_id| TagObservation {
                        tag_id,
                        image_index: i,
                        corners: [DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y],
                    })
                })
                .collect();
            (
                camera_id,
                CameraAsset {
                    intrinsics: (),
                    detections: DetectionResult {
                        images,
                        tag_observations,
                    },
                },
            )
        })
        .collect()
}

fn bench_correlate_frames(c: &mut Criterion) {
    let cameras = synthetic_cameras();
    let frames: Vec<_> = (0..FRAMES)
        .map(|i| {
            json!({
                "camera_image_path_0": format!("images/cam0/{i:06}.png"),
                "camera_image_path_1": format!("images/cam1/{i:06}.png"),
                "joint_ticks_0": i,
                "joint_ticks_1": -(i as i64),
            })
        })
        .collect();

    c.bench_function("correlate_frames", |b| {
        b.iter(|| correlate_frames(black_box(&frames), 2, &cameras, Path::new("/data")))
    });
}

criterion_group!(benches, bench_correlate_frames);
criterion_main!(benches);
