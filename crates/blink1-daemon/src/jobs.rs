//! Timed blink jobs.
//!
//! A blink alternates one LED channel between a target color and black.
//! The full phase schedule is computed when the job is created; a single
//! spawned task then sleeps to each phase instant and issues the fade.
//! Jobs carry no identity and are never cancelled; overlapping jobs
//! interleave at the device and the last write wins.

use blink1_hw::Rgb;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::state::{AppState, FadeOutcome};

/// Parameters of one blink job.
#[derive(Debug, Clone, Copy)]
pub struct BlinkParams {
    pub color: Rgb,
    pub ledn: u8,
    pub repeats: u32,
    /// Interval between phases; each fade runs for half of it.
    pub period_ms: u64,
}

/// One scheduled phase of a blink job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub offset_ms: u64,
    pub color: Rgb,
    pub fade_ms: u64,
}

/// Computes the phase schedule for a blink job.
///
/// Phases alternate target color and black at offsets `0, period,
/// 2*period, ...`. The repeat counter is consumed on leaving a black
/// phase and checked only there, so `repeats = 0` still produces one
/// full on/off cycle.
pub fn blink_phases(params: &BlinkParams) -> Vec<Phase> {
    let cycles = u64::from(params.repeats.max(1));
    let fade_ms = params.period_ms / 2;
    (0..cycles * 2)
        .map(|i| Phase {
            offset_ms: i * params.period_ms,
            color: if i % 2 == 0 { params.color } else { Rgb::BLACK },
            fade_ms,
        })
        .collect()
}

/// Starts a blink job immediately.
pub fn spawn_blink(state: Arc<AppState>, params: BlinkParams) {
    spawn_blink_after(state, Duration::ZERO, params);
}

/// Starts a blink job after a delay.
///
/// Fire-and-forget: the task owns its schedule, executes phases in
/// chronological order, and reports per-phase device trouble at debug
/// level only.
pub fn spawn_blink_after(state: Arc<AppState>, delay: Duration, params: BlinkParams) {
    let phases = blink_phases(&params);
    tokio::spawn(async move {
        let start = Instant::now() + delay;
        for phase in phases {
            tokio::time::sleep_until(start + Duration::from_millis(phase.offset_ms)).await;
            let outcome = state.fade(phase.fade_ms, phase.color, params.ledn);
            if outcome != FadeOutcome::Success {
                debug!("blink phase not delivered: {}", outcome);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(repeats: u32, period_ms: u64) -> BlinkParams {
        BlinkParams {
            color: Rgb::new(255, 0, 0),
            ledn: 0,
            repeats,
            period_ms,
        }
    }

    #[test]
    fn test_three_repeats_six_phases() {
        let phases = blink_phases(&params(3, 1000));
        assert_eq!(phases.len(), 6);
        for (i, phase) in phases.iter().enumerate() {
            assert_eq!(phase.offset_ms, i as u64 * 1000);
            assert_eq!(phase.fade_ms, 500);
        }
        assert_eq!(phases[0].color, Rgb::new(255, 0, 0));
        assert_eq!(phases[1].color, Rgb::BLACK);
        assert_eq!(phases[4].color, Rgb::new(255, 0, 0));
        assert_eq!(phases[5].color, Rgb::BLACK);
    }

    #[test]
    fn test_zero_repeats_still_one_cycle() {
        let phases = blink_phases(&params(0, 500));
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].offset_ms, 0);
        assert_eq!(phases[1].offset_ms, 500);
        assert_eq!(phases[1].color, Rgb::BLACK);
    }

    #[test]
    fn test_single_repeat() {
        let phases = blink_phases(&params(1, 200));
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].fade_ms, 100);
    }

    #[test]
    fn test_zero_period() {
        let phases = blink_phases(&params(2, 0));
        assert_eq!(phases.len(), 4);
        assert!(phases.iter().all(|p| p.offset_ms == 0 && p.fade_ms == 0));
    }
}
