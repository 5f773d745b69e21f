/*
 *  display/drivers/mock.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock surface for testing without hardware
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
use crate::display::traits::{IndexedBitmapSurface, RefreshGate};

/// Mock surface for testing
///
/// This surface simulates the badge panel without requiring hardware.
/// It's useful for:
/// - Unit tests
/// - Integration tests
/// - Development without hardware
///
/// The mock records every refresh and snapshots the trace pixel count of
/// each applied frame, so tests can check what the panel actually showed.
#[derive(Debug, Clone)]
pub struct MockSurface {
    bitmap: IndexedBitmap,
    gate: RefreshGate,
    state: MockSurfaceState,
}

/// Internal state for the mock surface
#[derive(Debug, Default, Clone)]
pub struct MockSurfaceState {
    /// Number of times refresh() was called
    pub refresh_calls: usize,

    /// Number of frames fully applied
    pub frames_applied: usize,

    /// Trace-colored pixel count at each applied frame
    pub trace_pixels_per_frame: Vec<usize>,

    /// Last timing hint passed to refresh()
    pub last_minimum_fps: Option<u32>,

    /// Simulate failures (for error testing)
    pub simulate_refresh_failure: bool,
}

impl MockSurface {
    /// Create a new mock surface that applies a frame per refresh call
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_passes(width, height, 1)
    }

    /// Create a mock surface needing `passes` refresh calls per frame
    pub fn with_passes(width: u32, height: u32, passes: u32) -> Self {
        Self {
            bitmap: IndexedBitmap::new(width, height),
            gate: RefreshGate::new(passes),
            state: MockSurfaceState::default(),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> &MockSurfaceState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MockSurfaceState {
        &mut self.state
    }

    /// Reset state counters (useful between tests)
    pub fn reset_state(&mut self) {
        self.state = MockSurfaceState::default();
    }

    /// Count number of pixels set to the trace color
    pub fn count_trace_pixels(&self) -> usize {
        self.bitmap.count(PaletteIndex::TRACE)
    }
}

impl IndexedBitmapSurface for MockSurface {
    fn bitmap(&self) -> &IndexedBitmap {
        &self.bitmap
    }

    fn bitmap_mut(&mut self) -> &mut IndexedBitmap {
        &mut self.bitmap
    }

    fn refresh(&mut self, minimum_fps: u32) -> Result<bool, DisplayError> {
        if self.state.simulate_refresh_failure {
            return Err(DisplayError::RefreshFailed("Simulated refresh failure".to_string()));
        }

        self.state.refresh_calls += 1;
        self.state.last_minimum_fps = Some(minimum_fps);

        if self.gate.pass() {
            self.state.frames_applied += 1;
            let lit = self.bitmap.count(PaletteIndex::TRACE);
            self.state.trace_pixels_per_frame.push(lit);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
