/*
 *  hal.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Capability traits for the badge hardware the scope drives
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

use crate::error::SensorError;

/// Blocking audio capture (PDM microphone on the badge)
pub trait AudioCapture {
    /// Fill every slot of `buffer` with a fresh sample.
    ///
    /// Blocks for the whole capture; the caller sizes the slice to the sweep.
    fn capture(&mut self, buffer: &mut [u16]);
}

/// Single instantaneous scalar reading (ambient light ADC)
pub trait ScalarSensor {
    fn read(&mut self) -> u16;
}

/// Acceleration in m/s^2 along the three sensor axes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn sum(&self) -> f32 {
        self.x + self.y + self.z
    }
}

/// Tri-axis accelerometer.
///
/// Reads are slow relative to the sweep rate, the channel interpolates
/// between them.
pub trait TriAxisSensor {
    fn read(&mut self) -> Result<Acceleration, SensorError>;
}

/// Button matrix / shift register.
///
/// `scan` latches the current key state and returns it as a bitmask, one
/// bit per logical button (see [`crate::input::Button`]).
pub trait ButtonMatrix {
    fn scan(&mut self) -> u8;
}

/// Addressable status LEDs
pub trait RgbIndicatorStrip {
    fn len(&self) -> usize;

    /// Set one LED; indices past the strip are ignored
    fn set(&mut self, index: usize, color: Rgb888);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
