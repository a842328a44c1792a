//! Random sources for respawn placement
//!
//! Respawn square selection is the only nondeterminism in a turn. The engine
//! draws through the `RandomSource` trait so tests can script the draws.

use rand::Rng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Source of uniform indices
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is always non-zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl RandomSource for ChaCha12Rng {
    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// A random source that replays a fixed script of indices
///
/// Each draw takes the next scripted value modulo `len`. Once the script is
/// exhausted it always returns 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptedRandom {
    script: Vec<usize>,
    /// Current position in the script
    pub current_index: usize,
}

impl ScriptedRandom {
    pub fn new(script: Vec<usize>) -> Self {
        ScriptedRandom {
            script,
            current_index: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        match self.script.get(self.current_index) {
            Some(&choice) => {
                self.current_index += 1;
                choice % len
            }
            None => 0,
        }
    }
}
