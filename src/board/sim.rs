/*
 *  board/sim.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Simulated sensors for running off-badge
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

use std::f32::consts::TAU;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{ADC_MIDSCALE, MIC_SAMPLE_RATE_HZ};
use crate::error::SensorError;
use crate::hal::{Acceleration, AudioCapture, ScalarSensor, TriAxisSensor};

/// Tone plus noise at the microphone sample rate
pub struct SimulatedMicrophone {
    rng: StdRng,
    phase: f32,
    step: f32,
    amplitude: f32,
    noise: i32,
    realtime: bool,
}

impl SimulatedMicrophone {
    pub fn new(seed: u64, tone_hz: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            phase: 0.0,
            step: TAU * tone_hz / MIC_SAMPLE_RATE_HZ as f32,
            amplitude: 6000.0,
            noise: 400,
            realtime: false,
        }
    }

    /// Block for as long as a real capture of the same length would
    pub fn realtime(mut self, on: bool) -> Self {
        self.realtime = on;
        self
    }
}

impl AudioCapture for SimulatedMicrophone {
    fn capture(&mut self, buffer: &mut [u16]) {
        for s in buffer.iter_mut() {
            let tone = self.amplitude * self.phase.sin();
            let noise = self.rng.random_range(-self.noise..=self.noise);
            *s = (ADC_MIDSCALE + tone as i32 + noise).clamp(0, u16::MAX as i32) as u16;
            self.phase = (self.phase + self.step) % TAU;
        }
        if self.realtime {
            let us = buffer.len() as u64 * 1_000_000 / MIC_SAMPLE_RATE_HZ as u64;
            thread::sleep(Duration::from_micros(us));
        }
    }
}

/// Slow random walk, like a room with moving shadows
pub struct SimulatedLight {
    rng: StdRng,
    level: i32,
}

impl SimulatedLight {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), level: ADC_MIDSCALE }
    }
}

impl ScalarSensor for SimulatedLight {
    fn read(&mut self) -> u16 {
        self.level = (self.level + self.rng.random_range(-300..=300)).clamp(4_000, 61_000);
        self.level as u16
    }
}

/// Resting on a desk: gravity on z plus a little jitter
pub struct SimulatedAccelerometer {
    rng: StdRng,
    jitter: f32,
}

impl SimulatedAccelerometer {
    const GRAVITY: f32 = 9.806_65;

    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), jitter: 0.3 }
    }
}

impl TriAxisSensor for SimulatedAccelerometer {
    fn read(&mut self) -> Result<Acceleration, SensorError> {
        let j = self.jitter;
        Ok(Acceleration::new(
            self.rng.random_range(-j..=j),
            self.rng.random_range(-j..=j),
            Self::GRAVITY + self.rng.random_range(-j..=j),
        ))
    }
}
