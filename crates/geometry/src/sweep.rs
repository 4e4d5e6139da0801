//! Shadow heights sampled over a time window, and the umbra crossings between samples.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shadow_astro::AstronomyService;
use tracing::{debug, info};

use crate::ShadowError;
use crate::elevator::Elevator;
use crate::shadow::ShadowHeights;

/// Shadow heights at one sampled instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSample {
    pub instant: DateTime<Utc>,
    /// Sun elevation at the base (radians).
    pub sun_elevation: f64,
    pub heights: ShadowHeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// The base went from sunlight or penumbra into the umbra.
    EnterUmbra,
    /// The base left the umbra.
    ExitUmbra,
}

/// Umbra crossing bracketed by two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub kind: TransitionKind,
    pub after: DateTime<Utc>,
    pub before: DateTime<Utc>,
}

/// Upper bound on the samples a single sweep may produce.
pub const MAX_SWEEP_SAMPLES: usize = 100_000;

/// Sample shadow heights from `start` to `end` (inclusive) every `step`.
///
/// Windows needing more than [`MAX_SWEEP_SAMPLES`] samples are rejected.
pub fn sweep<S: AstronomyService + ?Sized>(
    elevator: &Elevator,
    astro: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Result<Vec<ShadowSample>, ShadowError> {
    if step <= Duration::zero() || end < start {
        return Err(ShadowError::InvalidSweep);
    }
    let step_ms = step
        .num_microseconds()
        .map_or(f64::INFINITY, |us| us as f64 / 1_000.0);
    let expected = ((end - start).num_milliseconds() as f64 / step_ms).floor() + 1.0;
    if expected > MAX_SWEEP_SAMPLES as f64 {
        return Err(ShadowError::InvalidSweep);
    }

    let mut samples = Vec::with_capacity(expected as usize);
    let mut instant = start;
    let mut state = elevator.at(astro, start)?;
    while instant <= end {
        if state.instant() != instant {
            state = state.set_time(astro, instant)?;
        }
        let horizontal =
            astro.azimuth_elevation(&elevator.base(), &state.sun().position_km, instant)?;
        let heights = state.shadow_heights(astro)?;
        samples.push(ShadowSample {
            instant,
            sun_elevation: horizontal.elevation,
            heights,
        });
        instant += step;
    }

    info!(count = samples.len(), %start, %end, "shadow sweep complete");
    Ok(samples)
}

/// Umbra entries and exits between consecutive samples.
pub fn transitions(samples: &[ShadowSample]) -> Vec<Transition> {
    let found: Vec<Transition> = samples
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let kind = match (a.heights.in_umbra(), b.heights.in_umbra()) {
                (false, true) => TransitionKind::EnterUmbra,
                (true, false) => TransitionKind::ExitUmbra,
                _ => return None,
            };
            Some(Transition {
                kind,
                after: a.instant,
                before: b.instant,
            })
        })
        .collect();
    debug!(count = found.len(), "umbra transitions");
    found
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use shadow_astro::AnalyticAstronomy;

    use super::*;

    fn sample(hour: u32, umbra_km: f64) -> ShadowSample {
        ShadowSample {
            instant: Utc.with_ymd_and_hms(2024, 3, 20, hour, 0, 0).unwrap(),
            sun_elevation: 0.0,
            heights: ShadowHeights {
                umbra_km,
                penumbra_km: umbra_km,
            },
        }
    }

    #[test]
    fn transitions_bracket_umbra_changes() {
        let samples = [
            sample(9, 0.0),
            sample(10, 0.0),
            sample(11, 150.0),
            sample(12, 800.0),
            sample(13, 0.0),
        ];
        let found = transitions(&samples);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, TransitionKind::EnterUmbra);
        assert_eq!(found[0].after, samples[1].instant);
        assert_eq!(found[0].before, samples[2].instant);
        assert_eq!(found[1].kind, TransitionKind::ExitUmbra);
    }

    #[test]
    fn sweep_includes_both_ends_on_grid() {
        let astro = AnalyticAstronomy::default();
        let elevator = Elevator::new(0.0, 120.0, 100_000.0);
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 21, 0, 0, 0).unwrap();
        let samples = sweep(&elevator, &astro, start, end, Duration::minutes(30)).unwrap();
        assert_eq!(samples.len(), 49);
        assert_eq!(samples.first().unwrap().instant, start);
        assert_eq!(samples.last().unwrap().instant, end);

        // One night at longitude 120°E: the base enters the umbra once and leaves once.
        let found = transitions(&samples);
        assert_eq!(found.len(), 2, "{found:?}");
        assert_eq!(found[0].kind, TransitionKind::EnterUmbra);
        assert_eq!(found[1].kind, TransitionKind::ExitUmbra);

        for s in &samples {
            assert!(s.heights.umbra_km >= 0.0 && s.heights.umbra_km <= 100_000.0);
            assert!(s.heights.penumbra_km >= 0.0 && s.heights.penumbra_km <= 100_000.0);
            if s.sun_elevation > 0.0 {
                assert_eq!(s.heights, ShadowHeights::NONE);
            }
        }
    }

    #[test]
    fn sweep_rejects_non_positive_step_and_reversed_window() {
        let astro = AnalyticAstronomy::default();
        let elevator = Elevator::new(0.0, 120.0, 1_000.0);
        let t = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        assert!(matches!(
            sweep(&elevator, &astro, t, t, Duration::zero()),
            Err(ShadowError::InvalidSweep)
        ));
        assert!(matches!(
            sweep(&elevator, &astro, t, t - Duration::hours(1), Duration::minutes(5)),
            Err(ShadowError::InvalidSweep)
        ));
    }

    #[test]
    fn sweep_rejects_windows_with_too_many_samples() {
        let astro = AnalyticAstronomy::default();
        let elevator = Elevator::new(0.0, 120.0, 1_000.0);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            sweep(&elevator, &astro, start, end, Duration::minutes(1)),
            Err(ShadowError::InvalidSweep)
        ));

        // Exactly at the limit is still accepted.
        let end = start + Duration::seconds(MAX_SWEEP_SAMPLES as i64 - 1);
        let samples = sweep(&elevator, &astro, start, end, Duration::seconds(1)).unwrap();
        assert_eq!(samples.len(), MAX_SWEEP_SAMPLES);
    }
}
