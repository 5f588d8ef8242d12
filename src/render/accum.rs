//! Progressive frame accumulator (Deep Fried Edition)
//!
//! Merges each new frame into the running mean with the incremental
//! form `merged = prev + (new - prev) / (index + 1)`, so the buffer
//! always holds the unbiased average of every frame so far and never
//! needs a second pass to normalize.
//!
//! # Deep Fried Optimizations
//! - **Incremental Mean**: No sum buffer, no divide pass, no overflow
//!   as the sample count grows.
//!
//! Author: Moroya Sakamoto

use crate::scene::AccumUniform;
use crate::types::ModelError;
use glam::Vec4;
use rayon::prelude::*;

/// Merge one pixel of a new frame into the running mean
///
/// `sample_index` is the number of frames already merged; index 0
/// replaces the previous value outright.
#[inline(always)]
pub fn accumulate(previous: Vec4, incoming: Vec4, sample_index: u32) -> Vec4 {
    previous + (incoming - previous) / (sample_index as f32 + 1.0)
}

/// Running-mean frame buffer
#[derive(Debug, Clone)]
pub struct Accumulator {
    width: usize,
    height: usize,
    samples: u32,
    buffer: Vec<Vec4>,
}

impl Accumulator {
    /// Zeroed accumulator for the given resolution
    pub fn new(width: usize, height: usize) -> Self {
        Accumulator {
            width,
            height,
            samples: 0,
            buffer: vec![Vec4::ZERO; width * height],
        }
    }

    /// Buffer width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Frames merged since the last reset
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Current running mean
    pub fn buffer(&self) -> &[Vec4] {
        &self.buffer
    }

    /// Merge a frame into the running mean across all cores
    pub fn accumulate_frame(&mut self, frame: &[Vec4]) -> Result<(), ModelError> {
        if frame.len() != self.buffer.len() {
            return Err(ModelError::BufferSize {
                expected: self.buffer.len(),
                actual: frame.len(),
            });
        }
        let index = self.samples;
        self.buffer
            .par_iter_mut()
            .zip(frame.par_iter())
            .for_each(|(prev, &new)| {
                *prev = accumulate(*prev, new, index);
            });
        self.samples += 1;
        Ok(())
    }

    /// Drop all accumulated frames; the scene changed
    pub fn reset(&mut self) {
        self.samples = 0;
        self.buffer.fill(Vec4::ZERO);
        log::debug!("accumulator reset ({}x{})", self.width, self.height);
    }

    /// Pack the sample count for upload
    pub fn to_uniform(&self) -> AccumUniform {
        AccumUniform {
            samples: self.samples as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_replaces() {
        let mut acc = Accumulator::new(2, 2);
        let frame = vec![Vec4::new(0.5, 0.25, 1.0, 1.0); 4];
        acc.accumulate_frame(&frame).unwrap();
        assert_eq!(acc.buffer()[0], frame[0]);
        assert_eq!(acc.samples(), 1);
    }

    #[test]
    fn test_running_mean() {
        let mut acc = Accumulator::new(1, 1);
        acc.accumulate_frame(&[Vec4::splat(1.0)]).unwrap();
        acc.accumulate_frame(&[Vec4::splat(0.0)]).unwrap();
        assert!((acc.buffer()[0].x - 0.5).abs() < 1e-6);
        acc.accumulate_frame(&[Vec4::splat(0.5)]).unwrap();
        assert!((acc.buffer()[0].x - 0.5).abs() < 1e-6);
        assert_eq!(acc.samples(), 3);
    }

    #[test]
    fn test_identical_frames_idempotent() {
        let mut acc = Accumulator::new(1, 1);
        let v = Vec4::new(0.3, 0.6, 0.9, 1.0);
        for _ in 0..16 {
            acc.accumulate_frame(&[v]).unwrap();
            assert_eq!(acc.buffer()[0], v);
        }
    }

    #[test]
    fn test_reset_clears() {
        let mut acc = Accumulator::new(1, 1);
        acc.accumulate_frame(&[Vec4::ONE]).unwrap();
        acc.reset();
        assert_eq!(acc.samples(), 0);
        assert_eq!(acc.buffer()[0], Vec4::ZERO);
        assert_eq!(acc.to_uniform().samples, 0);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut acc = Accumulator::new(2, 2);
        let err = acc.accumulate_frame(&[Vec4::ZERO]);
        assert!(matches!(err, Err(ModelError::BufferSize { expected: 4, actual: 1 })));
    }
}
