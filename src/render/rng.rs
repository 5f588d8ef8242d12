//! Counter-based sample stream RNG (Deep Fried Edition)
//!
//! Every (frame seed, invocation, sample) triple hashes to its own
//! PCG stream, so parallel pixels never share state and a re-render
//! with the same seed reproduces the image bit for bit.
//!
//! # Deep Fried Optimizations
//! - **Stateless Keying**: No channel, no lock, no atomic; the stream
//!   key is pure arithmetic on the invocation counters.
//!
//! Author: Moroya Sakamoto

use glam::{Vec2, Vec3};

/// PCG output permutation on a 32-bit state
#[inline(always)]
fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Per-path random stream
#[derive(Debug, Clone)]
pub struct PathRng {
    state: u32,
}

impl PathRng {
    /// Key a stream from the frame seed vector and invocation counters
    pub fn new(seed: Vec3, invocation: u32, sample: u32) -> Self {
        let mut s = seed.x.to_bits();
        s ^= seed.y.to_bits().rotate_left(11);
        s ^= seed.z.to_bits().rotate_left(22);
        s = s.wrapping_add(invocation.wrapping_mul(0x9E37_79B9));
        s = s.wrapping_add(sample.wrapping_mul(0x85EB_CA6B));
        PathRng {
            state: pcg_hash(s),
        }
    }

    /// Next raw 32-bit value
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = pcg_hash(self.state);
        self.state
    }

    /// Uniform float in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Two uniform floats in [0, 1)
    #[inline]
    pub fn next_vec2(&mut self) -> Vec2 {
        Vec2::new(self.next_f32(), self.next_f32())
    }
}
