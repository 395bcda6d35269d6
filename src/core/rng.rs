//! Deterministic random number generation for rule conditions.
//!
//! Conditions such as `rand(100) < 30` draw from a seeded ChaCha8 stream,
//! so the same seed and the same sequence of events always apply the same
//! states. The state can be captured and restored for save data.
//!
//! ```
//! use battler_rules::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let roll = rng.rand(100);
//! assert!((0..100).contains(&roll));
//!
//! let mut again = GameRng::new(42);
//! assert_eq!(again.rand(100), roll);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded RNG used by the expression interpreter.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Draw an integer in `0..n`.
    ///
    /// Returns 0 when `n <= 0`.
    pub fn rand(&mut self, n: i64) -> i64 {
        if n <= 0 {
            return 0;
        }
        self.inner.gen_range(0..n)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position, so capture is O(1) regardless of how
/// many numbers were drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
