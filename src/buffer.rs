/*
 *  buffer.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Shared sweep buffer, reused by every channel
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use crate::constants::ADC_MIDSCALE;

/// Fixed-capacity run of unsigned 16-bit samples centered on midscale.
///
/// Allocated once at startup. The active channel borrows it mutably for a
/// sweep, the renderer borrows it immutably for draw and erase.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<u16>,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self { samples: vec![ADC_MIDSCALE as u16; capacity] }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }

    /// Leading `count` samples for a sweep, saturated to the capacity
    pub fn sweep_mut(&mut self, count: usize) -> &mut [u16] {
        let n = count.min(self.samples.len());
        &mut self.samples[..n]
    }
}
