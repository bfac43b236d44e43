use crate::types::GuideColor;
use std::time::{Duration, Instant};

/// Steady-alignment hysteresis: the subject center must stay within
/// tolerance of the target on both axes for `steady_duration` before the
/// alignment counts as steady. One out-of-tolerance frame resets the dwell.
///
/// The caller only runs this while a face is tracked; losing the face
/// freezes the state rather than resetting it (the face timeout bounds how
/// long a stale dwell can live).
pub struct AlignmentEvaluator {
    target: (f32, f32),
    tolerance: f32,
    steady_duration: Duration,
    steady_started: Option<Instant>,
    is_steady: bool,
    guide_color: GuideColor,
}

impl AlignmentEvaluator {
    pub fn new(target: (f32, f32), tolerance: f32, steady_duration: Duration) -> Self {
        Self {
            target,
            tolerance,
            steady_duration,
            steady_started: None,
            is_steady: false,
            guide_color: GuideColor::Neutral,
        }
    }

    pub fn update(&mut self, center: (f32, f32), now: Instant) {
        let dx = (center.0 - self.target.0).abs();
        let dy = (center.1 - self.target.1).abs();
        let aligned = dx < self.tolerance && dy < self.tolerance;

        if aligned {
            match self.steady_started {
                None => {
                    self.steady_started = Some(now);
                }
                Some(started) => {
                    if now.saturating_duration_since(started) >= self.steady_duration {
                        self.is_steady = true;
                        self.guide_color = GuideColor::Confirmed;
                    }
                }
            }
        } else {
            self.steady_started = None;
            self.is_steady = false;
            self.guide_color = GuideColor::Neutral;
        }
    }

    /// Single-fire debounce: the orchestrator clears the steady flag the
    /// moment a trigger is accepted so the same window cannot re-fire.
    /// The dwell itself is kept; continued alignment may re-confirm.
    pub fn clear_steady(&mut self) {
        self.is_steady = false;
    }

    /// Called when the post-burst cooldown starts.
    pub fn reset_guide(&mut self) {
        self.guide_color = GuideColor::Neutral;
    }

    pub fn is_steady(&self) -> bool {
        self.is_steady
    }

    pub fn guide_color(&self) -> GuideColor {
        self.guide_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> AlignmentEvaluator {
        AlignmentEvaluator::new((0.5, 0.5), 0.05, Duration::from_secs(2))
    }

    #[test]
    fn steady_only_after_full_dwell() {
        let t0 = Instant::now();
        let mut eval = evaluator();

        eval.update((0.5, 0.5), t0);
        assert!(!eval.is_steady());
        assert_eq!(eval.guide_color(), GuideColor::Neutral);

        eval.update((0.5, 0.5), t0 + Duration::from_millis(1900));
        assert!(!eval.is_steady());

        eval.update((0.5, 0.5), t0 + Duration::from_millis(2000));
        assert!(eval.is_steady());
        assert_eq!(eval.guide_color(), GuideColor::Confirmed);

        // Remains steady on subsequent aligned frames.
        eval.update((0.51, 0.49), t0 + Duration::from_millis(2100));
        assert!(eval.is_steady());
    }

    #[test]
    fn single_excursion_resets_dwell() {
        let t0 = Instant::now();
        let mut eval = evaluator();

        eval.update((0.5, 0.5), t0);
        eval.update((0.6, 0.5), t0 + Duration::from_millis(1000));
        assert!(!eval.is_steady());

        // Dwell restarts: 1.9s of prior alignment is gone.
        eval.update((0.5, 0.5), t0 + Duration::from_millis(1100));
        eval.update((0.5, 0.5), t0 + Duration::from_millis(3000));
        assert!(!eval.is_steady());
        eval.update((0.5, 0.5), t0 + Duration::from_millis(3100));
        assert!(eval.is_steady());
    }

    #[test]
    fn tolerance_is_strict_and_per_axis() {
        let t0 = Instant::now();
        let mut eval = evaluator();

        // Exactly at tolerance counts as misaligned (strict <).
        eval.update((0.55, 0.5), t0);
        assert!(eval_dwell_cleared(&eval));

        // One axis out is enough to reset, even if the other is perfect.
        eval.update((0.5, 0.5), t0 + Duration::from_millis(100));
        eval.update((0.5, 0.56), t0 + Duration::from_millis(200));
        assert!(eval_dwell_cleared(&eval));
    }

    fn eval_dwell_cleared(eval: &AlignmentEvaluator) -> bool {
        eval.steady_started.is_none() && !eval.is_steady
    }

    #[test]
    fn misalignment_after_steady_drops_everything() {
        let t0 = Instant::now();
        let mut eval = evaluator();
        eval.update((0.5, 0.5), t0);
        eval.update((0.5, 0.5), t0 + Duration::from_secs(2));
        assert!(eval.is_steady());

        eval.update((0.3, 0.5), t0 + Duration::from_millis(2100));
        assert!(!eval.is_steady());
        assert_eq!(eval.guide_color(), GuideColor::Neutral);
    }

    #[test]
    fn clear_steady_keeps_dwell_for_reconfirmation() {
        let t0 = Instant::now();
        let mut eval = evaluator();
        eval.update((0.5, 0.5), t0);
        eval.update((0.5, 0.5), t0 + Duration::from_secs(2));
        assert!(eval.is_steady());

        eval.clear_steady();
        assert!(!eval.is_steady());

        // Still aligned on the next frame: dwell is already past the
        // threshold, so steadiness comes straight back.
        eval.update((0.5, 0.5), t0 + Duration::from_millis(2100));
        assert!(eval.is_steady());
    }
}
