/*
 *  display/bitmap.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Off-screen color-indexed bitmap
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::palette::PaletteIndex;

/// A runtime-sized indexed bitmap, also an embedded-graphics target.
#[derive(Debug, Clone)]
pub struct IndexedBitmap {
    buf: Vec<PaletteIndex>,
    w: usize,
    h: usize,
}

impl IndexedBitmap {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![PaletteIndex::BACKGROUND; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    pub fn as_slice(&self) -> &[PaletteIndex] { &self.buf }

    /// Write one pixel; off-bitmap coordinates are dropped
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: PaletteIndex) {
        if let Some(i) = self.idx(Point::new(x, y)) {
            self.buf[i] = color;
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<PaletteIndex> {
        self.idx(Point::new(x, y)).map(|i| self.buf[i])
    }

    pub fn clear_color(&mut self, color: PaletteIndex) {
        self.buf.fill(color);
    }

    /// Number of pixels currently holding `color`
    pub fn count(&self, color: PaletteIndex) -> usize {
        self.buf.iter().filter(|&&p| p == color).count()
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for IndexedBitmap {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for IndexedBitmap {
    type Color = PaletteIndex;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clip to the bitmap so partially visible annotations still clear
        let area = area.intersection(&self.bounding_box());
        let Size { width, height } = area.size;
        if width == 0 || height == 0 { return Ok(()); }
        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        for row in y0..y0 + height as usize {
            let base = row * self.w;
            self.buf[base + x0..base + x0 + width as usize].fill(color);
        }
        Ok(())
    }
}
