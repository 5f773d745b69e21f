/*
 *  channel/params.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Tunable display parameters shared by every channel kind
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

use crate::constants::*;

/// Bounds and step sizes for the tunable parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLimits {
    pub min_vertical_offset: i32,
    pub max_vertical_offset: i32,
    pub vertical_offset_increment: i32,
    pub min_gain: u32,
    pub max_gain: u32,
    pub min_samples_per_px: usize,
    pub max_samples_per_px: usize,
    pub min_num_samples: usize,
    pub max_num_samples: usize,
}

impl Default for ChannelLimits {
    fn default() -> Self {
        Self {
            min_vertical_offset: MIN_VERTICAL_OFFSET,
            max_vertical_offset: MAX_VERTICAL_OFFSET,
            vertical_offset_increment: VERTICAL_OFFSET_INCREMENT,
            min_gain: MIN_VERTICAL_GAIN,
            max_gain: MAX_VERTICAL_GAIN,
            min_samples_per_px: MIN_SAMPLES_PER_PX,
            max_samples_per_px: MAX_SAMPLES_PER_PX,
            min_num_samples: MIN_NUM_SAMPLES,
            max_num_samples: MAX_NUM_SAMPLES,
        }
    }
}

impl ChannelLimits {
    /// Largest sweep any setting can request for a graph `graph_width` wide.
    ///
    /// The sample-count recompute adopts candidates above `max_num_samples`,
    /// so the shared buffer is sized for the densest setting as well.
    pub fn buffer_len(&self, graph_width: usize) -> usize {
        let densest = (1 + self.max_samples_per_px) * graph_width + START_SAMPLE;
        densest.max(self.max_num_samples)
    }
}

/// Per-kind defaults restored by `preset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub vertical_offset: i32,
    pub vertical_gain: u32,
    pub num_samples_per_px: usize,
}

/// Display tuning owned by one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelParameters {
    /// pixel-row bias added to the scaled sample
    pub vertical_offset: i32,
    /// right shift applied to `sample - adc_midscale`
    pub vertical_gain: u32,
    /// samples skipped between plotted columns
    pub num_samples_per_px: usize,
    /// samples in a full sweep, derived from the density
    pub num_samples: usize,
    pub start_sample: usize,
    pub adc_midscale: i32,
}

impl ChannelParameters {
    pub fn from_preset(preset: &Preset, graph_width: usize, limits: &ChannelLimits) -> Self {
        let mut params = Self {
            vertical_offset: preset.vertical_offset,
            vertical_gain: preset.vertical_gain,
            num_samples_per_px: preset.num_samples_per_px,
            num_samples: limits.max_num_samples,
            start_sample: START_SAMPLE,
            adc_midscale: ADC_MIDSCALE,
        };
        params.recompute_sample_count(graph_width, limits);
        params
    }

    pub fn apply_preset(&mut self, preset: &Preset, graph_width: usize, limits: &ChannelLimits) {
        self.vertical_offset = preset.vertical_offset;
        self.num_samples_per_px = preset.num_samples_per_px;
        self.vertical_gain = preset.vertical_gain;
        self.recompute_sample_count(graph_width, limits);
    }

    pub fn increase_gain(&mut self, limits: &ChannelLimits) {
        if self.vertical_gain < limits.max_gain {
            self.vertical_gain += 1;
        }
    }

    pub fn decrease_gain(&mut self, limits: &ChannelLimits) {
        if self.vertical_gain > limits.min_gain {
            self.vertical_gain -= 1;
        }
    }

    /// Steps up while at or below the limit, so the offset can settle one
    /// increment past `max_vertical_offset`.
    pub fn increase_offset(&mut self, limits: &ChannelLimits) {
        if self.vertical_offset <= limits.max_vertical_offset {
            self.vertical_offset += limits.vertical_offset_increment;
        }
    }

    /// Steps down only while the result stays at or above the limit
    pub fn decrease_offset(&mut self, limits: &ChannelLimits) {
        if self.vertical_offset - limits.vertical_offset_increment >= limits.min_vertical_offset {
            self.vertical_offset -= limits.vertical_offset_increment;
        }
    }

    /// Fewer samples skipped per column: denser, slower sweep
    pub fn increase_samples(&mut self, graph_width: usize, limits: &ChannelLimits) {
        if self.num_samples_per_px > limits.min_samples_per_px {
            self.num_samples_per_px -= 1;
        }
        self.num_samples_per_px = self
            .num_samples_per_px
            .clamp(limits.min_samples_per_px, limits.max_samples_per_px);
        self.recompute_sample_count(graph_width, limits);
    }

    /// More samples skipped per column: sparser, faster sweep
    pub fn decrease_samples(&mut self, graph_width: usize, limits: &ChannelLimits) {
        if self.num_samples_per_px < limits.max_samples_per_px {
            self.num_samples_per_px += 1;
        }
        self.num_samples_per_px = self
            .num_samples_per_px
            .clamp(limits.min_samples_per_px, limits.max_samples_per_px);
        self.recompute_sample_count(graph_width, limits);
    }

    /// Derive the sweep length from the horizontal density.
    ///
    /// Anything at or below the maximum is adopted, and so is anything at or
    /// above the minimum; only the final fallback uses the maximum.
    #[allow(clippy::if_same_then_else)]
    pub fn recompute_sample_count(&mut self, graph_width: usize, limits: &ChannelLimits) {
        let candidate = (1 + self.num_samples_per_px) * graph_width + self.start_sample;
        self.num_samples = if candidate <= limits.max_num_samples {
            candidate
        } else if candidate >= limits.min_num_samples {
            candidate
        } else {
            limits.max_num_samples
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: usize = 130;

    fn params() -> (ChannelParameters, ChannelLimits) {
        let limits = ChannelLimits::default();
        let preset = Preset { vertical_offset: 64, vertical_gain: 6, num_samples_per_px: 2 };
        (ChannelParameters::from_preset(&preset, WIDTH, &limits), limits)
    }

    #[test]
    fn test_sample_count_from_density() {
        let (p, _) = params();
        // (1+2)*130+3
        assert_eq!(p.num_samples, 393);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let (mut p, limits) = params();
        p.recompute_sample_count(WIDTH, &limits);
        let first = p.num_samples;
        p.recompute_sample_count(WIDTH, &limits);
        assert_eq!(p.num_samples, first);
    }

    #[test]
    fn test_recompute_adopts_candidate_above_max() {
        let (mut p, limits) = params();
        p.num_samples_per_px = 39;
        p.recompute_sample_count(400, &limits);
        assert_eq!(p.num_samples, 40 * 400 + 3);
        assert!(p.num_samples > limits.max_num_samples);
        assert!(p.num_samples <= limits.buffer_len(400));
    }

    #[test]
    fn test_recompute_adopts_candidate_below_min() {
        let (mut p, limits) = params();
        p.num_samples_per_px = 1;
        p.recompute_sample_count(20, &limits);
        assert_eq!(p.num_samples, 43);
    }

    #[test]
    fn test_gain_saturates() {
        let (mut p, limits) = params();
        for _ in 0..50 {
            p.increase_gain(&limits);
            assert!(p.vertical_gain <= limits.max_gain);
        }
        assert_eq!(p.vertical_gain, limits.max_gain);
        for _ in 0..50 {
            p.decrease_gain(&limits);
        }
        assert_eq!(p.vertical_gain, limits.min_gain);
    }

    #[test]
    fn test_offset_overshoots_max_by_one_increment() {
        let (mut p, limits) = params();
        p.vertical_offset = 1000;
        p.increase_offset(&limits);
        assert_eq!(p.vertical_offset, 1004);
        p.increase_offset(&limits);
        assert_eq!(p.vertical_offset, 1004);

        p.vertical_offset = 998;
        p.increase_offset(&limits);
        assert_eq!(p.vertical_offset, 1002);
        p.increase_offset(&limits);
        assert_eq!(p.vertical_offset, 1002);
    }

    #[test]
    fn test_offset_never_undershoots_min() {
        let (mut p, limits) = params();
        for _ in 0..1000 {
            p.decrease_offset(&limits);
            assert!(p.vertical_offset >= limits.min_vertical_offset);
        }
        assert_eq!(p.vertical_offset, -1000);

        p.vertical_offset = -998;
        p.decrease_offset(&limits);
        assert_eq!(p.vertical_offset, -998);
    }

    #[test]
    fn test_sample_density_naming() {
        let (mut p, limits) = params();
        p.increase_samples(WIDTH, &limits);
        assert_eq!(p.num_samples_per_px, 1);
        assert_eq!(p.num_samples, 2 * 130 + 3);
        p.increase_samples(WIDTH, &limits);
        assert_eq!(p.num_samples_per_px, 1);

        for _ in 0..100 {
            p.decrease_samples(WIDTH, &limits);
        }
        assert_eq!(p.num_samples_per_px, limits.max_samples_per_px);
        assert_eq!(p.num_samples, 40 * 130 + 3);
    }

    #[test]
    fn test_preset_is_path_independent() {
        let (mut p, limits) = params();
        let preset = Preset { vertical_offset: 64, vertical_gain: 6, num_samples_per_px: 2 };
        let fresh = p;
        p.increase_gain(&limits);
        p.decrease_offset(&limits);
        p.decrease_samples(WIDTH, &limits);
        p.apply_preset(&preset, WIDTH, &limits);
        assert_eq!(p, fresh);
    }
}
