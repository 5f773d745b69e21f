/*
 *  board/buttons.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Scripted button matrix for unattended runs
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

use std::collections::VecDeque;

use crate::hal::ButtonMatrix;
use crate::input::ButtonState;

/// Replays one entry per scan, then reports nothing held
#[derive(Debug, Clone, Default)]
pub struct ScriptedButtons {
    script: VecDeque<ButtonState>,
    scans: u64,
}

impl ScriptedButtons {
    pub fn new<I: IntoIterator<Item = ButtonState>>(script: I) -> Self {
        Self { script: script.into_iter().collect(), scans: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn scans(&self) -> u64 {
        self.scans
    }
}

impl ButtonMatrix for ScriptedButtons {
    fn scan(&mut self) -> u8 {
        self.scans += 1;
        self.script.pop_front().map(|s| s.bits()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;

    #[test]
    fn test_replays_then_idles() {
        let script = ["select", "", "a+b"].map(|s| s.parse::<ButtonState>().unwrap());
        let mut m = ScriptedButtons::new(script);
        assert_eq!(m.scan(), Button::Select.mask());
        assert_eq!(m.scan(), 0);
        assert_eq!(m.scan(), Button::A.mask() | Button::B.mask());
        assert_eq!(m.remaining(), 0);
        assert_eq!(m.scan(), 0);
        assert_eq!(m.scans(), 4);
    }
}
