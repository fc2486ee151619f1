use aethersense::dsp::phase::detrend;
use aethersense::dsp::smoothing::{ema_smooth, median_smooth};
use aethersense::runtime::decision::{DecisionEngine, PresenceState};
use proptest::prelude::*;

proptest! {
    #[test]
    fn detrend_is_idempotent(values in prop::collection::vec(-100.0f32..100.0, 2..64)) {
        let once = detrend(&values);
        let twice = detrend(&once);
        for (a, b) in once.iter().zip(twice.iter()) {
            prop_assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
        }
    }

    #[test]
    fn ema_alpha_one_is_identity(values in prop::collection::vec(-100.0f32..100.0, 0..32)) {
        prop_assert_eq!(ema_smooth(&values, 1.0), values);
    }

    #[test]
    fn median_smooth_kernel_one_is_identity(values in prop::collection::vec(-100.0f32..100.0, 0..32)) {
        prop_assert_eq!(median_smooth(&values, 1), values);
    }

    #[test]
    fn decision_engine_holds_state_for_hold_counter_updates(hold_frames in 1u32..10) {
        let mut engine = DecisionEngine::new(1.0, 0.5, hold_frames);
        // Force an initial transition to Present; hold_counter is now
        // hold_frames - 1 (decremented once post-transition).
        engine.update(2.0);
        prop_assert_eq!(engine.is_present(), true);
        let pending = engine.hold_counter();
        for _ in 0..pending {
            // Input well below threshold_off must not flip state while
            // the hold counter is still positive.
            prop_assert_eq!(engine.update(-5.0), PresenceState::Present);
        }
        prop_assert_eq!(engine.update(-5.0), PresenceState::Absent);
    }
}
