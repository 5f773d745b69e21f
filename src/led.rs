/*
 *  led.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Status LEDs - acquisition, refresh, select and channel
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

use crate::channel::ChannelKind;
use crate::constants::{LED_ACQUIRE, LED_BUTTON, LED_CHANNEL, LED_REFRESH};
use crate::hal::RgbIndicatorStrip;

const OFF: Rgb888 = Rgb888::BLACK;
const ACQUIRE: Rgb888 = Rgb888::RED;
const REFRESH: Rgb888 = Rgb888::BLUE;
const HELD: Rgb888 = Rgb888::YELLOW;

/// Identifying color for a channel
pub fn channel_color(kind: ChannelKind) -> Rgb888 {
    match kind {
        ChannelKind::Microphone => Rgb888::GREEN,
        ChannelKind::LightSensor => Rgb888::new(255, 160, 0),
        ChannelKind::Sawtooth => Rgb888::CYAN,
        ChannelKind::Accelerometer => Rgb888::MAGENTA,
    }
}

/// Maps loop activity onto fixed strip slots, all scaled by one brightness
pub struct LedIndicator<S: RgbIndicatorStrip> {
    strip: S,
    brightness: u8,
}

impl<S: RgbIndicatorStrip> LedIndicator<S> {
    pub fn new(strip: S, brightness: u8) -> Self {
        Self { strip, brightness }
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }

    #[inline]
    fn scale(&self, color: Rgb888) -> Rgb888 {
        let b = self.brightness as u16;
        let ch = |c: u8| ((c as u16 * b + 127) / 255) as u8;
        Rgb888::new(ch(color.r()), ch(color.g()), ch(color.b()))
    }

    fn put(&mut self, index: usize, color: Rgb888) {
        let color = self.scale(color);
        self.strip.set(index, color);
    }

    pub fn acquiring(&mut self) {
        self.put(LED_ACQUIRE, ACQUIRE);
    }

    pub fn refreshing(&mut self) {
        self.put(LED_REFRESH, REFRESH);
    }

    /// Both activity slots off
    pub fn clear_activity(&mut self) {
        self.put(LED_ACQUIRE, OFF);
        self.put(LED_REFRESH, OFF);
    }

    pub fn button_held(&mut self) {
        self.put(LED_BUTTON, HELD);
    }

    pub fn button_released(&mut self) {
        self.put(LED_BUTTON, OFF);
    }

    pub fn show_channel(&mut self, kind: ChannelKind) {
        self.put(LED_CHANNEL, channel_color(kind));
    }
}
