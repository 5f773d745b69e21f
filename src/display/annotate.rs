/*
 *  display/annotate.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text annotations drawn around the graph
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

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::display::bitmap::IndexedBitmap;
use crate::display::palette::PaletteIndex;
use crate::geometry::GraphGeometry;

const LABEL_HEIGHT: u32 = 12;
const SWEEP_LABEL_WIDTH: u32 = 52;

/// A fixed box of text, cleared to background before every write
#[derive(Debug, Clone, Copy)]
pub struct Annotation {
    area: Rectangle,
}

impl Annotation {
    pub fn new(area: Rectangle) -> Self {
        Self { area }
    }

    /// Channel name, top left above the frame
    pub fn channel_name(geometry: &GraphGeometry) -> Self {
        let left = geometry.x_left - 1;
        let top = (geometry.y_top - 1 - LABEL_HEIGHT as i32 - 2).max(0);
        let right = geometry.x_right + 1 - SWEEP_LABEL_WIDTH as i32;
        let width = (right - left).max(0) as u32;
        Self::new(Rectangle::new(Point::new(left, top), Size::new(width, LABEL_HEIGHT)))
    }

    /// Sweep time, top right above the frame
    pub fn sweep_time(geometry: &GraphGeometry) -> Self {
        let top = (geometry.y_top - 1 - LABEL_HEIGHT as i32 - 2).max(0);
        let left = geometry.x_right + 2 - SWEEP_LABEL_WIDTH as i32;
        Self::new(Rectangle::new(Point::new(left, top), Size::new(SWEEP_LABEL_WIDTH, LABEL_HEIGHT)))
    }

    pub fn area(&self) -> Rectangle {
        self.area
    }

    pub fn clear(&self, bitmap: &mut IndexedBitmap) {
        self.area
            .into_styled(PrimitiveStyle::with_fill(PaletteIndex::BACKGROUND))
            .draw(bitmap)
            .ok();
    }

    pub fn write(&self, bitmap: &mut IndexedBitmap, text: &str) {
        self.clear(bitmap);
        let style = MonoTextStyle::new(&FONT_6X10, PaletteIndex::TEXT);
        let origin = self.area.top_left + Point::new(1, 1);
        // clip so long labels never spill onto the frame
        let mut clipped = bitmap.clipped(&self.area);
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(&mut clipped)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_sit_above_frame() {
        let g = GraphGeometry::default();
        for label in [Annotation::channel_name(&g), Annotation::sweep_time(&g)] {
            let area = label.area();
            let bottom = area.top_left.y + area.size.height as i32;
            assert!(bottom < g.y_top - 1);
        }
    }

    #[test]
    fn test_write_then_clear() {
        let g = GraphGeometry::default();
        let mut bmp = IndexedBitmap::new(160, 128);
        let label = Annotation::channel_name(&g);
        label.write(&mut bmp, "Microphone");
        assert!(bmp.count(PaletteIndex::TEXT) > 0);
        label.clear(&mut bmp);
        assert_eq!(bmp.count(PaletteIndex::TEXT), 0);
    }

    #[test]
    fn test_labels_do_not_overlap() {
        let g = GraphGeometry::default();
        let name = Annotation::channel_name(&g).area();
        let sweep = Annotation::sweep_time(&g).area();
        let overlap = name.intersection(&sweep);
        assert!(overlap.size.width == 0 || overlap.size.height == 0);
    }
}
