/*
 *  channel/sawtooth.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Synthetic ramp generator, no hardware behind it
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

use crate::constants::{ADC_MIDSCALE, SAWTOOTH_PEAK, SAWTOOTH_STEP};

/// Ramp from `midscale - peak` up to `midscale + peak`, then wrap.
///
/// The ramp position survives between sweeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sawtooth {
    value: i32,
    low: i32,
    high: i32,
    step: i32,
}

impl Default for Sawtooth {
    fn default() -> Self {
        Self::new(SAWTOOTH_PEAK, SAWTOOTH_STEP)
    }
}

impl Sawtooth {
    pub fn new(peak: i32, step: i32) -> Self {
        let peak = peak.clamp(1, ADC_MIDSCALE - 1);
        let low = ADC_MIDSCALE - peak;
        Self { value: low, low, high: ADC_MIDSCALE + peak, step: step.max(1) }
    }

    pub fn low(&self) -> u16 {
        self.low as u16
    }

    pub fn high(&self) -> u16 {
        self.high as u16
    }

    #[inline]
    pub fn next_sample(&mut self) -> u16 {
        let out = self.value;
        self.value += self.step;
        if self.value > self.high {
            self.value = self.low;
        }
        out as u16
    }

    pub fn fill(&mut self, samples: &mut [u16]) {
        for s in samples.iter_mut() {
            *s = self.next_sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_stays_in_band() {
        let mut saw = Sawtooth::new(1000, 300);
        let mut buf = [0u16; 64];
        saw.fill(&mut buf);
        assert!(buf.iter().all(|&s| s >= saw.low() && s <= saw.high()));
        assert_eq!(buf[0], saw.low());
    }

    #[test]
    fn test_ramp_rises_with_fixed_step_then_wraps() {
        let mut saw = Sawtooth::new(1000, 300);
        let mut buf = [0u16; 32];
        saw.fill(&mut buf);
        for pair in buf.windows(2) {
            let (a, b) = (pair[0] as i32, pair[1] as i32);
            if b < a {
                assert_eq!(b, saw.low() as i32);
            } else {
                assert_eq!(b - a, 300);
            }
        }
        // 31768, 32068, .. 33568 is the highest value <= 33768
        assert!(buf.contains(&33568));
    }

    #[test]
    fn test_ramp_resumes_across_sweeps() {
        let mut saw = Sawtooth::new(1000, 300);
        let mut one = [0u16; 10];
        let mut two = [0u16; 10];
        saw.fill(&mut one);
        saw.fill(&mut two);

        let mut reference = Sawtooth::new(1000, 300);
        let mut joined = [0u16; 20];
        reference.fill(&mut joined);
        assert_eq!(&joined[..10], &one);
        assert_eq!(&joined[10..], &two);
    }
}
