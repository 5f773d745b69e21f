/*
 *  channel/mod.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Pluggable signal channels - shared tuning plus per-kind sampling
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

pub mod accel;
pub mod params;
pub mod sawtooth;

use std::fmt;
use std::time::Duration;

use log::debug;

use crate::buffer::SampleBuffer;
use crate::error::ChannelError;
use crate::func_timer::FunctionTimer;
use crate::hal::{AudioCapture, ScalarSensor, TriAxisSensor};
use crate::input::{Button, ButtonState};

pub use params::{ChannelLimits, ChannelParameters, Preset};
pub use sawtooth::Sawtooth;

/// The four channel kinds, in mode-select order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Microphone,
    LightSensor,
    Sawtooth,
    Accelerometer,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::Microphone,
        ChannelKind::LightSensor,
        ChannelKind::Sawtooth,
        ChannelKind::Accelerometer,
    ];

    /// On-screen label
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Microphone    => "Microphone",
            Self::LightSensor   => "Light",
            Self::Sawtooth      => "Sawtooth",
            Self::Accelerometer => "Accelerometer",
        }
    }

    /// Defaults restored by `preset`
    pub fn preset(&self) -> Preset {
        match self {
            Self::Microphone => Preset { vertical_offset: 64, vertical_gain: 6, num_samples_per_px: 1 },
            Self::LightSensor => Preset { vertical_offset: 70, vertical_gain: 9, num_samples_per_px: 1 },
            Self::Sawtooth => Preset { vertical_offset: 70, vertical_gain: 8, num_samples_per_px: 1 },
            // resting gravity lifts the composite by ~245 counts, offset pulls it back mid-graph
            Self::Accelerometer => Preset { vertical_offset: 128, vertical_gain: 2, num_samples_per_px: 1 },
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Sampling strategy behind a channel
pub enum Source {
    Microphone(Box<dyn AudioCapture>),
    LightSensor(Box<dyn ScalarSensor>),
    Sawtooth(Sawtooth),
    Accelerometer(Box<dyn TriAxisSensor>),
    /// Sensor absent at startup
    Disabled,
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Microphone(_) => f.write_str("Microphone"),
            Source::LightSensor(_) => f.write_str("LightSensor"),
            Source::Sawtooth(saw) => f.debug_tuple("Sawtooth").field(saw).finish(),
            Source::Accelerometer(_) => f.write_str("Accelerometer"),
            Source::Disabled => f.write_str("Disabled"),
        }
    }
}

/// Outcome of a completed sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub samples: usize,
    pub elapsed: Duration,
}

/// A signal source plus its own display tuning
#[derive(Debug)]
pub struct Channel {
    kind: ChannelKind,
    params: ChannelParameters,
    limits: ChannelLimits,
    graph_width: usize,
    source: Source,
}

impl Channel {
    /// Build a channel and apply its preset
    pub fn new(kind: ChannelKind, source: Source, graph_width: usize) -> Self {
        let limits = ChannelLimits::default();
        let params = ChannelParameters::from_preset(&kind.preset(), graph_width, &limits);
        Self { kind, params, limits, graph_width, source }
    }

    pub fn microphone(mic: Box<dyn AudioCapture>, graph_width: usize) -> Self {
        Self::new(ChannelKind::Microphone, Source::Microphone(mic), graph_width)
    }

    pub fn light(sensor: Box<dyn ScalarSensor>, graph_width: usize) -> Self {
        Self::new(ChannelKind::LightSensor, Source::LightSensor(sensor), graph_width)
    }

    pub fn sawtooth(generator: Sawtooth, graph_width: usize) -> Self {
        Self::new(ChannelKind::Sawtooth, Source::Sawtooth(generator), graph_width)
    }

    pub fn accelerometer(sensor: Box<dyn TriAxisSensor>, graph_width: usize) -> Self {
        Self::new(ChannelKind::Accelerometer, Source::Accelerometer(sensor), graph_width)
    }

    /// A channel whose sensor never came up; tunable but cannot sweep
    pub fn disabled(kind: ChannelKind, graph_width: usize) -> Self {
        Self::new(kind, Source::Disabled, graph_width)
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn params(&self) -> &ChannelParameters {
        &self.params
    }

    pub fn limits(&self) -> &ChannelLimits {
        &self.limits
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.source, Source::Disabled)
    }

    /// Shared buffer length this channel may need
    pub fn required_buffer_len(&self) -> usize {
        self.limits.buffer_len(self.graph_width).max(self.params.num_samples)
    }

    pub fn preset(&mut self) {
        self.params.apply_preset(&self.kind.preset(), self.graph_width, &self.limits);
        debug!("{} preset: {:?}", self.kind, self.params);
    }

    pub fn increase_gain(&mut self) {
        self.params.increase_gain(&self.limits);
    }

    pub fn decrease_gain(&mut self) {
        self.params.decrease_gain(&self.limits);
    }

    pub fn increase_offset(&mut self) {
        self.params.increase_offset(&self.limits);
    }

    pub fn decrease_offset(&mut self) {
        self.params.decrease_offset(&self.limits);
    }

    pub fn increase_samples(&mut self) {
        self.params.increase_samples(self.graph_width, &self.limits);
    }

    pub fn decrease_samples(&mut self) {
        self.params.decrease_samples(self.graph_width, &self.limits);
    }

    pub fn recompute_sample_count(&mut self) {
        self.params.recompute_sample_count(self.graph_width, &self.limits);
    }

    /// Apply every held tuning button once; held buttons repeat each cycle
    pub fn apply_buttons(&mut self, buttons: &ButtonState) {
        let before = self.params;
        if buttons.is_pressed(Button::A) { self.increase_gain(); }
        if buttons.is_pressed(Button::B) { self.decrease_gain(); }
        if buttons.is_pressed(Button::Down) { self.increase_offset(); }
        if buttons.is_pressed(Button::Up) { self.decrease_offset(); }
        if buttons.is_pressed(Button::Left) { self.increase_samples(); }
        if buttons.is_pressed(Button::Right) { self.decrease_samples(); }
        if buttons.is_pressed(Button::Start) { self.preset(); }
        if self.params != before {
            debug!(
                "{}: offset {} gain {} samples/px {} samples {}",
                self.kind,
                self.params.vertical_offset,
                self.params.vertical_gain,
                self.params.num_samples_per_px,
                self.params.num_samples
            );
        }
    }

    /// Fill the leading `num_samples` slots of the shared buffer.
    ///
    /// A disabled channel leaves the buffer untouched and reports
    /// [`ChannelError::Disabled`].
    pub fn take_sweep(&mut self, buffer: &mut SampleBuffer) -> Result<Sweep, ChannelError> {
        let timer = FunctionTimer::new(self.kind.display_name());
        let samples = buffer.sweep_mut(self.params.num_samples);
        match &mut self.source {
            Source::Microphone(mic) => mic.capture(samples),
            Source::LightSensor(sensor) => {
                let level = sensor.read();
                samples.fill(level);
            }
            Source::Sawtooth(saw) => saw.fill(samples),
            Source::Accelerometer(sensor) => {
                accel::fill_interpolated(sensor.as_mut(), samples, self.params.adc_midscale)
                    .map_err(|source| ChannelError::Sensor { kind: self.kind, source })?;
            }
            Source::Disabled => return Err(ChannelError::Disabled(self.kind)),
        }
        Ok(Sweep { samples: samples.len(), elapsed: timer.elapsed() })
    }
}
