/*
 *  input.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Button polling - level state plus a blocking select edge
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

use std::fmt;
use std::str::FromStr;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::hal::{ButtonMatrix, RgbIndicatorStrip};
use crate::led::LedIndicator;

/// Logical buttons, discriminant is the bit in the scanned mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    B = 0,
    A = 1,
    Start = 2,
    Select = 3,
    Right = 4,
    Down = 5,
    Up = 6,
    Left = 7,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::B,
        Button::A,
        Button::Start,
        Button::Select,
        Button::Right,
        Button::Down,
        Button::Up,
        Button::Left,
    ];

    #[inline]
    pub fn mask(self) -> u8 {
        1 << self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::B => "b",
            Button::A => "a",
            Button::Start => "start",
            Button::Select => "select",
            Button::Right => "right",
            Button::Down => "down",
            Button::Up => "up",
            Button::Left => "left",
        }
    }
}

impl FromStr for Button {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Button::ALL
            .into_iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| format!("unknown button '{}'", s.trim()))
    }
}

/// One latched scan of the matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState(u8);

impl ButtonState {
    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }
}

/// `"a+left"`, `"select"`, or empty for nothing held
impl FromStr for ButtonState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = 0u8;
        for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            bits |= part.parse::<Button>()?.mask();
        }
        Ok(Self(bits))
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for b in Button::ALL.into_iter().filter(|b| self.is_pressed(*b)) {
            if !first {
                f.write_str("+")?;
            }
            f.write_str(b.name())?;
            first = false;
        }
        Ok(())
    }
}

pub struct ButtonInput<M: ButtonMatrix> {
    matrix: M,
    state: ButtonState,
}

impl<M: ButtonMatrix> ButtonInput<M> {
    pub fn new(matrix: M) -> Self {
        Self { matrix, state: ButtonState::default() }
    }

    /// Latch a fresh scan
    pub fn poll(&mut self) -> ButtonState {
        self.state = ButtonState::from_bits(self.matrix.scan());
        self.state
    }

    /// State from the last scan
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.state.is_pressed(button)
    }

    /// Edge on the mode-select button.
    ///
    /// When the last poll saw select held this lights the button LED, then
    /// blocks rescanning every `tick_us` until release and returns true once.
    pub fn select_edge<S, D>(&mut self, led: &mut LedIndicator<S>, delay: &mut D, tick_us: u32) -> bool
    where
        S: RgbIndicatorStrip,
        D: DelayNs,
    {
        if !self.state.is_pressed(Button::Select) {
            return false;
        }
        led.button_held();
        let mut ticks = 0u32;
        while self.poll().is_pressed(Button::Select) {
            delay.delay_us(tick_us);
            ticks = ticks.saturating_add(1);
        }
        led.button_released();
        debug!("select released after {} ticks", ticks);
        true
    }
}
