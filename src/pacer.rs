/*
 *  pacer.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame pacing for slow-motion runs
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

use std::time::{Duration, Instant};

/// Fixed frame-rate governor.
///
/// `remaining` reports how long to wait before the next frame may start
/// and books the following deadline, so a caller that sleeps out every
/// wait runs at exactly the target rate.
#[derive(Debug, Clone)]
pub struct Pacer {
    next_deadline: Instant,
    frame: Duration,
}

impl Pacer {
    pub fn new(target_fps: u32) -> Self {
        let frame = Duration::from_micros((1_000_000u32 / target_fps.max(1)) as u64);
        Self { next_deadline: Instant::now(), frame }
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }

    /// Time left before the next frame; `None` when it is already due.
    ///
    /// A late frame restarts the schedule from now rather than bursting to
    /// catch up.
    #[inline]
    pub fn remaining(&mut self) -> Option<Duration> {
        let now = Instant::now();
        if now >= self.next_deadline {
            self.next_deadline = now + self.frame;
            None
        } else {
            let wait = self.next_deadline - now;
            self.next_deadline += self.frame;
            Some(wait)
        }
    }
}
