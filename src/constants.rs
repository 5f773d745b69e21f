/*
 *  constants.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed sampling constants, parameter limits and badge layout
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

// sample domain
pub const ADC_MIDSCALE: i32 = 32768;
pub const START_SAMPLE: usize = 3;

// vertical offset, pixel rows
pub const MIN_VERTICAL_OFFSET: i32 = -1000;
pub const MAX_VERTICAL_OFFSET: i32 = 1000;
pub const VERTICAL_OFFSET_INCREMENT: i32 = 4;

// vertical gain, right shift applied to the centered sample
pub const MIN_VERTICAL_GAIN: u32 = 0;
pub const MAX_VERTICAL_GAIN: u32 = 12;

// horizontal density
pub const MIN_SAMPLES_PER_PX: usize = 1;
pub const MAX_SAMPLES_PER_PX: usize = 39;
pub const MIN_NUM_SAMPLES: usize = 100;
pub const MAX_NUM_SAMPLES: usize = 8000;

// badge panel is 160x128, positive y is down
pub const DISPLAY_WIDTH: u32 = 160;
pub const DISPLAY_HEIGHT: u32 = 128;

pub const GRAPH_X_LEFT: i32 = 10;
pub const GRAPH_X_RIGHT: i32 = 140;
pub const GRAPH_Y_TOP: i32 = 20;
pub const GRAPH_Y_BOTTOM: i32 = 120;

// palette slots
pub const COLOR_BACKGROUND: u8 = 0;
pub const COLOR_TRACE: u8 = 1;
pub const COLOR_FRAME: u8 = 2;
pub const COLOR_TEXT: u8 = 3;
pub const PALETTE_SIZE: usize = 4;

// status strip, five NeoPixels along the bottom edge
pub const LED_COUNT: usize = 5;
pub const LED_ACQUIRE: usize = 0;
pub const LED_REFRESH: usize = 1;
pub const LED_BUTTON: usize = 2;
pub const LED_CHANNEL: usize = 4;

// polling loops
pub const DEFAULT_TICK_US: u32 = 2_000;
pub const RUN_SLOW_FPS: u32 = 10;

// synthetic sawtooth
pub const SAWTOOTH_PEAK: i32 = 12_000;
pub const SAWTOOTH_STEP: i32 = 250;

// composite accelerometer reading, counts per m/s^2
pub const ACCEL_SCALE: f32 = 25.0;

pub const MIC_SAMPLE_RATE_HZ: u32 = 16_000;

// LIS3DH with SDO pulled low
pub const LIS3DH_DEFAULT_ADDRESS: u8 = 0x18;
