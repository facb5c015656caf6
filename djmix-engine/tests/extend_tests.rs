//! Integration tests for self-loop extension

mod helpers;

use djmix_common::AudioFormat;
use djmix_engine::mix::{extend_track, LoopAccumulator, LoopPlan, LoopState};
use djmix_engine::{BlendStyle, MixOptions};
use helpers::{click_track, grid_track, TestTone, TEST_RATE};

fn format() -> AudioFormat {
    AudioFormat::new(TEST_RATE, 2)
}

#[test]
fn test_loop_arithmetic() {
    // 60s track, loop of 20s entering at 5s, 200s wanted
    let plan = LoopPlan::from_points(60.0, 25.0, 5.0, 8.0, 200.0);
    assert_eq!(plan.loop_length, 20.0);
    assert_eq!(plan.required_loops, 10);

    let source = click_track(format(), 120.0, 60.0, TestTone::default());
    let mut acc = LoopAccumulator::new(&source, plan, BlendStyle::Classic);
    while acc.step().unwrap() == LoopState::Accumulating {}

    let seconds = acc.current().duration_seconds();
    assert!(seconds >= 200.0, "{}", seconds);
    assert!(acc.iterations() <= plan.required_loops as u64 - 1);
}

#[test]
fn test_extend_grid_track() {
    let track = grid_track(format(), 120.0, 60.0, "8A", TestTone::default());
    let options = MixOptions::default();

    let result = extend_track(&track, &options, 200.0).unwrap();

    // intro ends at 9s, outro starts at 51s: 42s per repetition
    assert!((result.plan.mixin_point - 9.0).abs() < 1e-9);
    assert!((result.plan.mixout_point - 51.0).abs() < 1e-9);
    assert_eq!(result.plan.required_loops, 5);
    assert_eq!(result.iterations, 4);
    assert_eq!(result.buffer.frames(), format().seconds_to_frames(228.0));
    assert!(!result.is_passthrough());
    assert!(result.buffer.is_finite());
}

#[test]
fn test_target_within_source_is_passthrough() {
    let track = grid_track(format(), 120.0, 60.0, "8A", TestTone::default());

    for target in [0.0, 30.0, 60.0] {
        let result = extend_track(&track, &MixOptions::default(), target).unwrap();
        assert!(result.plan.required_loops <= 1);
        assert!(result.is_passthrough());
        assert_eq!(result.buffer, track.buffer);
    }
}

#[test]
fn test_bass_swap_extension_reaches_target() {
    let track = grid_track(format(), 128.0, 45.0, "2B", TestTone::default());
    let options = MixOptions {
        style: BlendStyle::BassSwap,
        transition_bars: 8,
        ..MixOptions::default()
    };

    let result = extend_track(&track, &options, 150.0).unwrap();
    let seconds = result.buffer.duration_seconds();
    assert!(seconds >= 150.0);
    assert!(seconds < 150.0 + result.plan.loop_length);
}

#[test]
fn test_nan_target_rejected() {
    let track = grid_track(format(), 120.0, 20.0, "8A", TestTone::default());
    assert!(extend_track(&track, &MixOptions::default(), f64::NAN).is_err());
}
