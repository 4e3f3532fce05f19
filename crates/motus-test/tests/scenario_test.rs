//! Reference scenarios for the stabilization and comparison engine

use std::time::Duration;

use motus_core::{AngleMapping, BodyLandmark, JointAngle, LandmarkSet, MotionTime, Point3D};
use motus_runtime::Recording;
use motus_test::{pose_with_left_elbow, standing_pose};
use motus_time::PlaybackSynchronizer;
use motus_visual::{angle_at, compute_angles, diff, Stabilizer, StabilizerConfig};
use proptest::prelude::*;

#[test]
fn scenario_five_identical_pushes() {
    let mut stabilizer = Stabilizer::with_config(StabilizerConfig::with_window_size(5));
    let frame = LandmarkSet::new(vec![Point3D::visible(0.5, 0.5, 0.0)]);

    let mut out = None;
    for _ in 0..5 {
        out = stabilizer.push(Some(&frame));
    }

    let p = *out.unwrap().get(0).unwrap();
    assert_eq!((p.x, p.y, p.z), (0.5, 0.5, 0.0));
}

#[test]
fn scenario_collinear_arm() {
    let mut set = standing_pose();
    set.set(BodyLandmark::LeftShoulder.index(), Point3D::visible(0.2, 0.3, 0.0));
    set.set(BodyLandmark::LeftElbow.index(), Point3D::visible(0.3, 0.3, 0.0));
    set.set(BodyLandmark::LeftWrist.index(), Point3D::visible(0.4, 0.3, 0.0));

    let angles = compute_angles(Some(&set)).unwrap();
    assert!((angles.get(JointAngle::LeftElbow).unwrap() - 180.0).abs() < 0.01);
}

#[test]
fn scenario_sync_index_at_two_seconds() {
    let mut sync = PlaybackSynchronizer::new();
    sync.start(120, true, MotionTime::ZERO).unwrap();

    assert_eq!(sync.advance(MotionTime::from_millis(2000), 120), Some(60));
    assert_eq!(sync.advance(MotionTime::from_millis(4000), 120), Some(0));
}

#[test]
fn scenario_diff_against_absent_reference() {
    let live = compute_angles(Some(&standing_pose()));
    assert!(diff(live.as_ref(), None).is_none());
}

#[test]
fn scenario_null_landmarks_propagate() {
    let mut stabilizer = Stabilizer::new();
    assert!(stabilizer.push(None).is_none());
    assert!(compute_angles(None).is_none());
}

#[test]
fn scenario_round_trip() {
    let frames: Vec<LandmarkSet> = [180.0, 150.0, 120.0, 90.0]
        .into_iter()
        .map(pose_with_left_elbow)
        .collect();
    let recording = Recording::from_frames(frames, 30);

    let back = Recording::import_json(&recording.export_json().unwrap()).unwrap();
    assert_eq!(back.len(), recording.len());
    assert_eq!(back.frames(), recording.frames());
    for i in 0..recording.len() {
        let (a, b) = (back.angles_at(i).unwrap(), recording.angles_at(i).unwrap());
        for joint in JointAngle::all() {
            assert!((a.get(*joint).unwrap() - b.get(*joint).unwrap()).abs() < 1e-4);
        }
    }
}

proptest! {
    #[test]
    fn prop_symmetric_points_are_straight(
        bx in 0.2f32..0.8, by in 0.2f32..0.8, dx in -0.2f32..0.2, dy in -0.2f32..0.2
    ) {
        prop_assume!(dx.abs() + dy.abs() > 0.01);
        let b = Point3D::visible(bx, by, 0.0);
        let a = Point3D::visible(bx - dx, by - dy, 0.0);
        let c = Point3D::visible(bx + dx, by + dy, 0.0);
        prop_assert!((angle_at(&b, &a, &c) - 180.0).abs() < 0.1);
    }

    #[test]
    fn prop_angles_in_range(deg in 1.0f32..180.0) {
        let angles: AngleMapping = compute_angles(Some(&pose_with_left_elbow(deg))).unwrap();
        prop_assert_eq!(angles.len(), JointAngle::count());
        for (_, value) in angles.iter() {
            prop_assert!((0.0..=180.0).contains(&value));
        }
    }

    #[test]
    fn prop_sync_wraps_after_full_pass(frames in 1usize..300) {
        let mut sync = PlaybackSynchronizer::new();
        sync.start(frames, true, MotionTime::ZERO).unwrap();
        let full = sync.loop_duration(frames);
        prop_assert_eq!(sync.advance(MotionTime::ZERO + full, frames), Some(0));
        let before = full - Duration::from_micros(1);
        prop_assert_eq!(sync.advance(MotionTime::ZERO + before, frames), Some(frames - 1));
    }
}
