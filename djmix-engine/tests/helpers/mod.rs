//! Test Helper Utilities
//!
//! Shared utilities for djmix-engine integration tests

#![allow(dead_code)]

pub mod audio_generator;

pub use audio_generator::{click_track, grid_analysis, grid_track, write_test_wav, TestTone};

/// Reduced pipeline rate for tests that do not depend on 44.1 kHz
pub const TEST_RATE: u32 = 8000;
