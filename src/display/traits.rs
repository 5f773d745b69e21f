/*
 *  display/traits.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for the manually refreshed panel
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

use crate::display::bitmap::IndexedBitmap;
use crate::display::error::DisplayError;
use crate::display::palette::PaletteIndex;

/// Indexed bitmap surface with an explicit refresh
///
/// The scope mutates pixels directly in the off-screen bitmap and then
/// asks the surface to push it to the panel. There is no automatic
/// refresh and no dirty-region tracking: whatever the bitmap holds when a
/// frame completes is what the panel shows.
pub trait IndexedBitmapSurface {
    /// The off-screen bitmap
    fn bitmap(&self) -> &IndexedBitmap;

    /// Mutable access for drawing
    fn bitmap_mut(&mut self) -> &mut IndexedBitmap;

    /// Returns the bitmap dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let bmp = self.bitmap();
        (bmp.width() as u32, bmp.height() as u32)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: PaletteIndex) {
        self.bitmap_mut().set_pixel(x, y, color);
    }

    /// Push the bitmap towards the panel
    ///
    /// A single call may apply only part of a frame. Returns `Ok(true)`
    /// once the whole frame is on the panel; callers retry until then.
    /// `minimum_fps` is a timing hint, 0 means no constraint.
    fn refresh(&mut self, minimum_fps: u32) -> Result<bool, DisplayError>;
}

/// Counts refresh passes until a frame is complete
///
/// Surfaces use this to model panels that need several `refresh` calls
/// before a frame is fully applied.
#[derive(Debug, Clone)]
pub struct RefreshGate {
    passes_per_frame: u32,
    pending: u32,
}

impl RefreshGate {
    pub fn new(passes_per_frame: u32) -> Self {
        Self { passes_per_frame: passes_per_frame.max(1), pending: 0 }
    }

    pub fn passes_per_frame(&self) -> u32 {
        self.passes_per_frame
    }

    /// Record one pass; true when it completed the frame
    pub fn pass(&mut self) -> bool {
        self.pending += 1;
        if self.pending >= self.passes_per_frame {
            self.pending = 0;
            true
        } else {
            false
        }
    }
}
