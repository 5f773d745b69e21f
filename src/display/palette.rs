/*
 *  display/palette.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Color-indexed pixels and the palette that maps them to the panel
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

use embedded_graphics::pixelcolor::raw::RawU8;
use embedded_graphics::pixelcolor::{PixelColor, Rgb888};

use crate::constants::{COLOR_BACKGROUND, COLOR_FRAME, COLOR_TEXT, COLOR_TRACE, PALETTE_SIZE};

/// Palette slot of a pixel in the indexed bitmap
///
/// Implements [`PixelColor`] so embedded-graphics primitives and text can
/// be drawn straight into the bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PaletteIndex(pub u8);

impl PaletteIndex {
    pub const BACKGROUND: PaletteIndex = PaletteIndex(COLOR_BACKGROUND);
    pub const TRACE: PaletteIndex = PaletteIndex(COLOR_TRACE);
    pub const FRAME: PaletteIndex = PaletteIndex(COLOR_FRAME);
    pub const TEXT: PaletteIndex = PaletteIndex(COLOR_TEXT);

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl PixelColor for PaletteIndex {
    type Raw = RawU8;
}

/// Panel colors for each palette slot
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: [Rgb888; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [
                Rgb888::new(0x00, 0x00, 0x00), // background
                Rgb888::new(0x00, 0xff, 0x00), // trace
                Rgb888::new(0xaa, 0xaa, 0xaa), // frame
                Rgb888::new(0xff, 0xff, 0xff), // text
            ],
        }
    }
}

impl Palette {
    /// Panel color for a slot; unknown slots render as background
    pub fn color(&self, index: PaletteIndex) -> Rgb888 {
        self.colors
            .get(index.index())
            .copied()
            .unwrap_or(self.colors[0])
    }
}
