//! Flavor text attached to phase-start notifications.

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;

use super::phase::Phase;

const FOCUS_MESSAGES: [&str; 4] = [
    "Come on, just 25 minutes to reach your goals!",
    "Time to focus, success is waiting for you!",
    "Focus is the path to success. Go for it!",
    "Don't stop now, every second counts.",
];

const BREAK_MESSAGES: [&str; 4] = [
    "Well done! Relax, you deserve this break.",
    "Take a breather and enjoy this moment of calm.",
    "Recharge your energy! A productive break is key.",
    "Breathe deeply and relax. Your mind needs it!",
];

/// Rejection sampling gives up after this many draws and uses the fallback.
const MAX_DRAWS: usize = 8;

/// Seed used when the OS entropy source cannot seed the picker.
const FALLBACK_SEED: u64 = 0x5EED_F0C5;

pub fn messages_for(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Focus => &FOCUS_MESSAGES,
        Phase::Break => &BREAK_MESSAGES,
    }
}

/// Picks a message uniformly from the phase's set.
pub struct MessagePicker {
    rng: Box<dyn RngCore + Send>,
}

impl MessagePicker {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self::seeded_from(OsRng)
    }

    /// Seed a `StdRng` from `source`, or a fixed-seed `Pcg64` when it fails.
    fn seeded_from(source: impl RngCore) -> Self {
        match StdRng::from_rng(source) {
            Ok(rng) => Self::with_rng(rng),
            Err(e) => {
                tracing::warn!(error = %e, "entropy unavailable; seeding messages deterministically");
                Self::seeded(FALLBACK_SEED)
            }
        }
    }

    /// Deterministic picker for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Pcg64::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Never fails: an unavailable randomness source yields the first message.
    pub fn pick(&mut self, phase: Phase) -> &'static str {
        let set = messages_for(phase);
        let idx = uniform_index(self.rng.as_mut(), set.len()).unwrap_or(0);
        set[idx]
    }
}

impl Default for MessagePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessagePicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePicker").finish_non_exhaustive()
    }
}

fn uniform_index(rng: &mut dyn RngCore, len: usize) -> Option<usize> {
    let len = u32::try_from(len).ok().filter(|&n| n > 0)?;
    // Largest multiple of `len` representable; draws at or above it are biased.
    let limit = u32::MAX - (u32::MAX % len);
    for _ in 0..MAX_DRAWS {
        let mut buf = [0u8; 4];
        rng.try_fill_bytes(&mut buf).ok()?;
        let v = u32::from_le_bytes(buf);
        if v < limit {
            return Some((v % len) as usize);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source unavailable"))
        }
    }

    #[test]
    fn every_message_is_reachable() {
        let mut picker = MessagePicker::seeded(7);
        for phase in [Phase::Focus, Phase::Break] {
            let seen: HashSet<_> = (0..200).map(|_| picker.pick(phase)).collect();
            assert_eq!(seen.len(), messages_for(phase).len());
        }
    }

    #[test]
    fn picks_stay_within_phase_set() {
        let mut picker = MessagePicker::seeded(42);
        for _ in 0..50 {
            assert!(BREAK_MESSAGES.contains(&picker.pick(Phase::Break)));
            assert!(FOCUS_MESSAGES.contains(&picker.pick(Phase::Focus)));
        }
    }

    #[test]
    fn distribution_is_roughly_uniform() {
        let mut picker = MessagePicker::seeded(1234);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let msg = picker.pick(Phase::Focus);
            let idx = FOCUS_MESSAGES.iter().position(|m| *m == msg).unwrap();
            counts[idx] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "skewed counts: {counts:?}");
        }
    }

    #[test]
    fn failed_seeding_still_picks_from_the_set() {
        let mut picker = MessagePicker::seeded_from(BrokenRng);
        for _ in 0..20 {
            assert!(FOCUS_MESSAGES.contains(&picker.pick(Phase::Focus)));
        }
        let seen: HashSet<_> = (0..200).map(|_| picker.pick(Phase::Break)).collect();
        assert_eq!(seen.len(), BREAK_MESSAGES.len());
    }

    #[test]
    fn entropy_seeded_picker_picks_from_the_set() {
        let mut picker = MessagePicker::new();
        assert!(BREAK_MESSAGES.contains(&picker.pick(Phase::Break)));
    }

    #[test]
    fn broken_rng_falls_back_to_first_message() {
        let mut picker = MessagePicker::with_rng(BrokenRng);
        assert_eq!(picker.pick(Phase::Focus), FOCUS_MESSAGES[0]);
        assert_eq!(picker.pick(Phase::Break), BREAK_MESSAGES[0]);
    }
}
