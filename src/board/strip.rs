/*
 *  board/strip.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory LED strip
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

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::hal::RgbIndicatorStrip;

/// Holds the last color per LED, optionally recording every write
#[derive(Debug, Clone)]
pub struct MemoryStrip {
    pixels: Vec<Rgb888>,
    history: Option<Vec<(usize, Rgb888)>>,
}

impl MemoryStrip {
    pub fn new(len: usize) -> Self {
        Self { pixels: vec![Rgb888::BLACK; len], history: None }
    }

    /// Like `new` but keeps a log of every accepted write
    pub fn recording(len: usize) -> Self {
        Self { history: Some(Vec::new()), ..Self::new(len) }
    }

    pub fn get(&self, index: usize) -> Option<Rgb888> {
        self.pixels.get(index).copied()
    }

    pub fn history(&self) -> &[(usize, Rgb888)] {
        self.history.as_deref().unwrap_or(&[])
    }
}

impl RgbIndicatorStrip for MemoryStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn set(&mut self, index: usize, color: Rgb888) {
        if let Some(p) = self.pixels.get_mut(index) {
            *p = color;
            if let Some(h) = self.history.as_mut() {
                h.push((index, color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_ignored() {
        let mut strip = MemoryStrip::recording(2);
        strip.set(5, Rgb888::RED);
        strip.set(1, Rgb888::GREEN);
        assert_eq!(strip.get(1), Some(Rgb888::GREEN));
        assert_eq!(strip.get(5), None);
        assert_eq!(strip.history(), &[(1, Rgb888::GREEN)]);
    }
}
