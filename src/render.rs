/*
 *  render.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sample-to-pixel scaling and the draw/erase trace walk
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

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};

use crate::buffer::SampleBuffer;
use crate::channel::{Channel, ChannelParameters};
use crate::display::{IndexedBitmapSurface, PaletteIndex};
use crate::geometry::GraphGeometry;

/// Unclamped pixel row for one sample.
///
/// The centered value is signed so the gain shift rounds toward negative
/// infinity.
#[inline]
pub fn scale_sample(params: &ChannelParameters, sample: u16) -> i32 {
    params.vertical_offset - ((sample as i32 - params.adc_midscale) >> params.vertical_gain)
}

/// Plotted points of one sweep, left to right.
///
/// Each column consumes `1 + num_samples_per_px` samples and plots the last
/// one. The walk ends at `x_right` or when the sweep runs out, whichever
/// comes first.
pub struct TracePoints<'a> {
    geometry: &'a GraphGeometry,
    params: &'a ChannelParameters,
    samples: &'a [u16],
    index: usize,
    x: i32,
}

impl<'a> TracePoints<'a> {
    pub fn new(geometry: &'a GraphGeometry, params: &'a ChannelParameters, samples: &'a [u16]) -> Self {
        let end = params.num_samples.min(samples.len());
        Self {
            geometry,
            params,
            samples: &samples[..end],
            index: params.start_sample,
            x: geometry.x_left,
        }
    }
}

impl Iterator for TracePoints<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let idx = self.index + self.params.num_samples_per_px;
        if self.x >= self.geometry.x_right || idx >= self.samples.len() {
            return None;
        }
        let y = self.geometry.clamp_y(scale_sample(self.params, self.samples[idx]));
        let p = Point::new(self.x, y);
        self.index = idx + 1;
        self.x += 1;
        Some(p)
    }
}

/// Paints and erases traces inside a fixed graph region
#[derive(Debug, Clone)]
pub struct TraceRenderer {
    geometry: GraphGeometry,
}

impl TraceRenderer {
    pub fn new(geometry: GraphGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &GraphGeometry {
        &self.geometry
    }

    pub fn points<'a>(&'a self, params: &'a ChannelParameters, buffer: &'a SampleBuffer) -> TracePoints<'a> {
        TracePoints::new(&self.geometry, params, buffer.as_slice())
    }

    /// Plot the channel's current sweep in `color`.
    ///
    /// Erasing is the same walk in the background color, so channel state
    /// must not change between the two calls. Returns the pixels written.
    pub fn draw_trace<S>(&self, surface: &mut S, color: PaletteIndex, channel: &Channel, buffer: &SampleBuffer) -> usize
    where
        S: IndexedBitmapSurface + ?Sized,
    {
        let mut n = 0;
        for p in self.points(channel.params(), buffer) {
            surface.set_pixel(p.x, p.y, color);
            n += 1;
        }
        n
    }

    /// One pixel outside the plotting region on every side
    pub fn draw_frame<S>(&self, surface: &mut S)
    where
        S: IndexedBitmapSurface + ?Sized,
    {
        let (tl, br) = self.geometry.frame_corners();
        let tr = Point::new(br.x, tl.y);
        let bl = Point::new(tl.x, br.y);
        let style = PrimitiveStyle::with_stroke(PaletteIndex::FRAME, 1);
        let bitmap = surface.bitmap_mut();
        for (a, b) in [(tl, tr), (bl, br), (tl, bl), (tr, br)] {
            Line::new(a, b).into_styled(style).draw(bitmap).ok();
        }
    }
}
