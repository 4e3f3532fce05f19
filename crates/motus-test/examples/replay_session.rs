//! Replay Session Example
//!
//! An instructor records a 4 second arm curl at 30fps, the recording goes
//! through JSON, and a student performing the same curl at 60fps is
//! compared against it.

use std::time::Duration;

use motus_runtime::{init_tracing, EngineConfig, LogFormat};
use motus_test::{NoiseModel, PoseGenerator, PoseGeneratorConfig, SessionSimulator};

fn main() {
    if let Err(e) = init_tracing(LogFormat::Pretty) {
        eprintln!("logging disabled: {}", e);
    }

    println!("=== MOTUS Replay Session ===\n");

    // 1. Instructor records
    let config = EngineConfig::default();
    let instructor_motion = PoseGeneratorConfig {
        noise: NoiseModel::Normal { stddev: 0.003 },
        ..Default::default()
    };
    let mut instructor =
        SessionSimulator::at_fps(config.clone(), PoseGenerator::new(instructor_motion, 1), 30);

    let recorded = match instructor.record_instructor(Duration::from_secs(6)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("recording failed: {}", e);
            return;
        }
    };
    if let Some(stopped) = recorded.recording_stopped {
        println!("1. Recording {} with {} frames", stopped.reason, stopped.frames);
    }

    // 2. Export / import
    let json = match instructor.engine().export_recording() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("export failed: {}", e);
            return;
        }
    };
    println!("2. Exported {} bytes of JSON", json.len());

    let student_motion = PoseGeneratorConfig {
        min_elbow_deg: 75.0,
        ..PoseGeneratorConfig::noisy()
    };
    let mut student = SessionSimulator::at_fps(config, PoseGenerator::new(student_motion, 2), 60);
    match student.engine_mut().import_recording(&json) {
        Ok(frames) => println!("   Imported {} frames", frames),
        Err(e) => {
            eprintln!("import failed: {}", e);
            return;
        }
    }

    // 3. Compare
    println!("\n3. Student comparison (8s, looping playback at 30fps)");
    match student.compare_student(Duration::from_secs(8)) {
        Ok(report) => {
            for r in &report.reports {
                println!("   {}", r);
            }
            println!("   Ticks: {}, missing poses: {}", report.ticks, report.poses_missing);
            println!("   Worst joint difference: {:.1} deg", report.max_abs_diff);
        }
        Err(e) => eprintln!("comparison failed: {}", e),
    }
}
