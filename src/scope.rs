/*
 *  scope.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Main loop - poll, switch, sweep, draw, refresh, erase
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

use std::fmt::Write;

use arrayvec::ArrayString;
use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::buffer::SampleBuffer;
use crate::channel::{Channel, ChannelKind, Sweep};
use crate::constants::{DEFAULT_TICK_US, RUN_SLOW_FPS};
use crate::display::{Annotation, IndexedBitmapSurface, PaletteIndex};
use crate::error::ScopeError;
use crate::func_timer::FunctionTimer;
use crate::geometry::GraphGeometry;
use crate::hal::{ButtonMatrix, RgbIndicatorStrip};
use crate::input::ButtonInput;
use crate::led::LedIndicator;
use crate::pacer::Pacer;
use crate::render::TraceRenderer;

/// Polling and pacing knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// delay between rescans while waiting on select or refresh
    pub tick_us: u32,
    /// passed through to every refresh
    pub minimum_fps: u32,
    /// pace whole cycles to a slow, watchable rate
    pub run_slow: bool,
}

impl Default for Timing {
    fn default() -> Self {
        Self { tick_us: DEFAULT_TICK_US, minimum_fps: 0, run_slow: false }
    }
}

/// Everything fixed at startup and shared by the loop's parts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeContext {
    pub geometry: GraphGeometry,
    pub timing: Timing,
}

/// The scope: owns the channels, the shared buffer and every collaborator.
///
/// Each `cycle` runs one full acquisition and display pass in fixed
/// order; the trace is erased before the next sweep starts.
pub struct Scope<S, L, M, D>
where
    S: IndexedBitmapSurface,
    L: RgbIndicatorStrip,
    M: ButtonMatrix,
    D: DelayNs,
{
    ctx: ScopeContext,
    channels: Vec<Channel>,
    active: usize,
    buffer: SampleBuffer,
    renderer: TraceRenderer,
    input: ButtonInput<M>,
    led: LedIndicator<L>,
    surface: S,
    delay: D,
    name_label: Annotation,
    sweep_label: Annotation,
    pacer: Option<Pacer>,
    reported_failure: bool,
    cycles: u64,
}

impl<S, L, M, D> Scope<S, L, M, D>
where
    S: IndexedBitmapSurface,
    L: RgbIndicatorStrip,
    M: ButtonMatrix,
    D: DelayNs,
{
    /// Size the buffer, draw the frame and label the first channel
    pub fn new(
        ctx: ScopeContext,
        channels: Vec<Channel>,
        surface: S,
        input: ButtonInput<M>,
        led: LedIndicator<L>,
        delay: D,
    ) -> Result<Self, ScopeError> {
        if channels.is_empty() {
            return Err(ScopeError::NoChannels);
        }
        let capacity = channels
            .iter()
            .map(Channel::required_buffer_len)
            .max()
            .unwrap_or_default();

        let mut scope = Self {
            ctx,
            channels,
            active: 0,
            buffer: SampleBuffer::new(capacity),
            renderer: TraceRenderer::new(ctx.geometry),
            input,
            led,
            surface,
            delay,
            name_label: Annotation::channel_name(&ctx.geometry),
            sweep_label: Annotation::sweep_time(&ctx.geometry),
            pacer: ctx.timing.run_slow.then(|| Pacer::new(RUN_SLOW_FPS)),
            reported_failure: false,
            cycles: 0,
        };
        debug!("Sample buffer holds {} samples", scope.buffer.capacity());

        scope.renderer.draw_frame(&mut scope.surface);
        scope.led.clear_activity();
        scope.show_active();
        info!("Channel: {}", scope.active_kind());
        Ok(scope)
    }

    pub fn active_kind(&self) -> ChannelKind {
        self.channels[self.active].kind()
    }

    pub fn active_channel(&self) -> &Channel {
        &self.channels[self.active]
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn led(&self) -> &LedIndicator<L> {
        &self.led
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Cycle `limit` times, or until an error when `None`
    pub fn run(&mut self, limit: Option<u64>) -> Result<u64, ScopeError> {
        match self.pacer.as_ref() {
            Some(pacer) => info!("Scope running, paced to {:?} per cycle", pacer.frame()),
            None => info!("Scope running"),
        }
        let start = self.cycles;
        while limit.is_none_or(|n| self.cycles - start < n) {
            self.cycle()?;
        }
        Ok(self.cycles - start)
    }

    /// One pass of the loop
    pub fn cycle(&mut self) -> Result<(), ScopeError> {
        let _timer = FunctionTimer::new("cycle");
        let tick = self.ctx.timing.tick_us;

        let buttons = self.input.poll();
        self.channels[self.active].apply_buttons(&buttons);
        if self.input.select_edge(&mut self.led, &mut self.delay, tick) {
            self.next_channel();
        }

        self.led.acquiring();
        let sweep = self.channels[self.active].take_sweep(&mut self.buffer);
        self.led.clear_activity();
        self.led.refreshing();

        match sweep {
            Ok(sweep) => {
                self.reported_failure = false;
                self.annotate_sweep(&sweep);
                self.draw(PaletteIndex::TRACE);
                self.refresh()?;
                self.draw(PaletteIndex::BACKGROUND);
            }
            Err(e) => {
                if !self.reported_failure {
                    warn!("{}", e);
                    self.reported_failure = true;
                }
                self.refresh()?;
            }
        }
        self.led.clear_activity();
        self.cycles += 1;

        if let Some(wait) = self.pacer.as_mut().and_then(Pacer::remaining) {
            self.delay.delay_us(wait.as_micros().min(u32::MAX as u128) as u32);
        }
        Ok(())
    }

    /// Step to the next channel in fixed order, wrapping
    pub fn next_channel(&mut self) {
        let leaving = self.active_kind();
        self.active = (self.active + 1) % self.channels.len();
        if leaving == ChannelKind::Microphone {
            self.sweep_label.clear(self.surface.bitmap_mut());
        }
        self.reported_failure = false;
        self.show_active();
        info!("Channel: {} -> {}", leaving, self.active_kind());
    }

    fn draw(&mut self, color: PaletteIndex) {
        let channel = &self.channels[self.active];
        self.renderer.draw_trace(&mut self.surface, color, channel, &self.buffer);
    }

    fn show_active(&mut self) {
        let channel = &self.channels[self.active];
        let mut label = ArrayString::<32>::new();
        write!(label, "{}", channel.kind()).ok();
        if !channel.is_enabled() {
            write!(label, " (off)").ok();
        }
        self.name_label.write(self.surface.bitmap_mut(), &label);
        self.led.show_channel(channel.kind());
    }

    fn annotate_sweep(&mut self, sweep: &Sweep) {
        if self.active_kind() != ChannelKind::Microphone {
            return;
        }
        let mut text = ArrayString::<16>::new();
        write!(text, "{:.1}ms", sweep.elapsed.as_secs_f32() * 1000.0).ok();
        self.sweep_label.write(self.surface.bitmap_mut(), &text);
    }

    /// Retry until the surface reports the whole frame applied
    fn refresh(&mut self) -> Result<(), ScopeError> {
        let hint = self.ctx.timing.minimum_fps;
        let mut passes = 1u32;
        while !self.surface.refresh(hint)? {
            self.delay.delay_us(self.ctx.timing.tick_us);
            passes += 1;
        }
        if passes > 1 {
            log::trace!("frame applied after {} refresh passes", passes);
        }
        Ok(())
    }
}
