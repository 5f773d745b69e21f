/*
 *  geometry.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Plotting region of the graph
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

use crate::constants::{GRAPH_X_LEFT, GRAPH_X_RIGHT, GRAPH_Y_BOTTOM, GRAPH_Y_TOP};

/// Pixel bounds of the plotting region.
///
/// Traces are plotted on columns `x_left..x_right` and rows
/// `y_top..=y_bottom`; the frame sits one pixel outside on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphGeometry {
    pub x_left: i32,
    pub x_right: i32,
    pub y_top: i32,
    pub y_bottom: i32,
}

impl Default for GraphGeometry {
    fn default() -> Self {
        Self {
            x_left: GRAPH_X_LEFT,
            x_right: GRAPH_X_RIGHT,
            y_top: GRAPH_Y_TOP,
            y_bottom: GRAPH_Y_BOTTOM,
        }
    }
}

impl GraphGeometry {
    pub fn new(x_left: i32, x_right: i32, y_top: i32, y_bottom: i32) -> Self {
        Self { x_left, x_right, y_top, y_bottom }
    }

    /// Number of plotted columns
    pub fn width(&self) -> usize {
        (self.x_right - self.x_left).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.y_bottom - self.y_top + 1).max(0) as usize
    }

    #[inline]
    pub fn clamp_y(&self, y: i32) -> i32 {
        y.clamp(self.y_top, self.y_bottom)
    }

    /// Corners of the frame, drawn outside the plotting region
    pub fn frame_corners(&self) -> (Point, Point) {
        (
            Point::new(self.x_left - 1, self.y_top - 1),
            Point::new(self.x_right + 1, self.y_bottom + 1),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_left && p.x < self.x_right && p.y >= self.y_top && p.y <= self.y_bottom
    }
}
