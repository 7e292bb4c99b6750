use cogniscript_processing_core::kinematics::{calculate_velocity, HesitationAnalyzer, MotionSample};
use cogniscript_processing_core::letterbox::{CoordinateMapper, LetterboxTransform};
use cogniscript_processing_core::pinch::classify_pinch;
use cogniscript_processing_core::smoothing::KeypointSmoother;
use cogniscript_processing_core::tool_proximity::{find_nearest_tool, ToolClassSet};
use cogniscript_scene_model::detection::DetectedObject;
use cogniscript_scene_model::geometry::{BoundingBox, FrameSize, MirrorMode, Point2D};
use cogniscript_scene_model::status::MetricsState;

#[test]
fn two_points_a_tenth_apart_in_fifty_ms() {
    let a = MotionSample::new(0.2, 0.2, 10_000);
    let b = MotionSample::new(0.2, 0.3, 10_050);
    let v = calculate_velocity(Some(&a), Some(&b));
    assert!((v - 0.002).abs() < 1e-12, "v={v}");
}

#[test]
fn long_pause_is_rate_limited_regardless_of_frame_rate() {
    let analyzer = HesitationAnalyzer::with_defaults();

    for step_ms in [5u64, 16, 33, 100] {
        let mut state = MetricsState::default();
        let mut prev = None;
        // 2.5 s of stillness: events at 0, 1000, 2000
        let mut t = 0;
        while t <= 2_500 {
            let cur = MotionSample::new(0.4, 0.4, t);
            state = analyzer.step(&state, prev.as_ref(), &cur);
            prev = Some(cur);
            t += step_ms;
        }
        assert_eq!(state.hesitation_count, 3, "step {step_ms} ms");
    }
}

#[test]
fn pinch_measured_after_letterboxing() {
    // 640x480 video on a 1280x720 surface: scale 1.5
    let t = LetterboxTransform::fit(FrameSize::new(640, 480), FrameSize::new(1280, 720)).unwrap();
    // 40 source px apart: under 50 in the source, 60 on the surface
    let thumb = t.map_normalized(0.5, 0.5, MirrorMode::Horizontal);
    let index = t.map_normalized(0.5 + 40.0 / 640.0, 0.5, MirrorMode::Horizontal);
    let reading = classify_pinch(thumb, index, 50.0);
    assert!((reading.distance_px - 60.0).abs() < 1e-9);
    assert!(!reading.engaged);
}

#[test]
fn smoothed_ink_converges_on_a_still_fingertip() {
    let mut mapper = CoordinateMapper::default();
    assert!(mapper.transform().is_none());
    mapper.update(FrameSize::new(640, 480), FrameSize::new(640, 480));
    let t = *mapper.transform().unwrap();

    let mut smoother = KeypointSmoother::new(0.4);
    let target = t.map_normalized(0.25, 0.75, MirrorMode::None);
    smoother.update(Point2D::new(0.0, 0.0));
    let mut last = Point2D::default();
    for _ in 0..60 {
        last = smoother.update(target);
    }
    assert!(last.distance_to(&target) < 1e-6);
}

#[test]
fn nearest_of_ordered_candidates_wins() {
    let wrist = Point2D::new(100.0, 100.0);
    // Centers at distances 10, 20, 30, 40 from the wrist, shuffled
    let objects: Vec<DetectedObject> = [30.0, 10.0, 40.0, 20.0]
        .iter()
        .zip(["pen", "pencil", "scissors", "knife"])
        .map(|(d, label)| {
            DetectedObject::new(label, 0.5, BoundingBox::new(100.0 + d - 5.0, 95.0, 10.0, 10.0))
        })
        .collect();

    let found = find_nearest_tool(&objects, wrist, &ToolClassSet::default()).unwrap();
    assert_eq!(found.object.label, "pencil");
    assert!((found.distance - 10.0).abs() < 1e-9);
}
