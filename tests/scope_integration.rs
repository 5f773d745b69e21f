/*
 *  tests/scope_integration.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  End-to-end scope cycles against in-memory collaborators
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

use badgescope::board::{build_channels, MemoryStrip, ScriptedButtons};
use badgescope::channel::{Channel, ChannelKind, Sawtooth};
use badgescope::config::parse_yaml;
use badgescope::constants::LED_COUNT;
use badgescope::display::{
    Annotation, DisplayError, IndexedBitmap, IndexedBitmapSurface, MockSurface, PaletteIndex,
};
use badgescope::geometry::GraphGeometry;
use badgescope::error::SensorError;
use badgescope::hal::{Acceleration, AudioCapture, ScalarSensor, TriAxisSensor};
use badgescope::input::{Button, ButtonInput, ButtonState};
use badgescope::led::LedIndicator;
use badgescope::scope::{Scope, ScopeContext};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_hal_mock::eh1::delay::NoopDelay;

/// Keeps a copy of the bitmap each time a frame lands
struct CapturingSurface {
    bitmap: IndexedBitmap,
    frames: Vec<IndexedBitmap>,
}

impl CapturingSurface {
    fn new() -> Self {
        Self { bitmap: IndexedBitmap::new(160, 128), frames: Vec::new() }
    }
}

impl IndexedBitmapSurface for CapturingSurface {
    fn bitmap(&self) -> &IndexedBitmap {
        &self.bitmap
    }

    fn bitmap_mut(&mut self) -> &mut IndexedBitmap {
        &mut self.bitmap
    }

    fn refresh(&mut self, _minimum_fps: u32) -> Result<bool, DisplayError> {
        self.frames.push(self.bitmap.clone());
        Ok(true)
    }
}

struct Level(u16);

impl ScalarSensor for Level {
    fn read(&mut self) -> u16 {
        self.0
    }
}

struct Flat;

impl AudioCapture for Flat {
    fn capture(&mut self, buffer: &mut [u16]) {
        buffer.fill(32768);
    }
}

/// Fails the first `failures` reads, then rests at one g
struct Flaky {
    failures: u32,
}

impl TriAxisSensor for Flaky {
    fn read(&mut self) -> Result<Acceleration, SensorError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(SensorError::Bus("nack".into()));
        }
        Ok(Acceleration::new(0.0, 0.0, 9.81))
    }
}

fn script(entries: &[&str]) -> ScriptedButtons {
    ScriptedButtons::new(entries.iter().map(|e| e.parse::<ButtonState>().unwrap()))
}

fn scope<S: IndexedBitmapSurface>(
    channels: Vec<Channel>,
    surface: S,
    buttons: ScriptedButtons,
) -> Scope<S, MemoryStrip, ScriptedButtons, NoopDelay> {
    Scope::new(
        ScopeContext::default(),
        channels,
        surface,
        ButtonInput::new(buttons),
        LedIndicator::new(MemoryStrip::recording(LED_COUNT), 255),
        NoopDelay::new(),
    )
    .unwrap()
}

fn four_channels() -> Vec<Channel> {
    let w = GraphGeometry::default().width();
    vec![
        Channel::microphone(Box::new(Flat), w),
        Channel::light(Box::new(Level(30000)), w),
        Channel::sawtooth(Sawtooth::default(), w),
        Channel::disabled(ChannelKind::Accelerometer, w),
    ]
}

fn text_pixels(bitmap: &IndexedBitmap, label: &Annotation) -> usize {
    label
        .area()
        .points()
        .filter(|p| bitmap.get_pixel(p.x, p.y) == Some(PaletteIndex::TEXT))
        .count()
}

#[test]
fn test_select_cycles_channels_and_wraps() {
    let buttons = script(&["select", "", "select", "", "select", "", "select", ""]);
    let mut scope = scope(four_channels(), MockSurface::new(160, 128), buttons);
    assert_eq!(scope.active_kind(), ChannelKind::Microphone);

    let expected = [
        ChannelKind::LightSensor,
        ChannelKind::Sawtooth,
        ChannelKind::Accelerometer,
        ChannelKind::Microphone,
    ];
    for kind in expected {
        scope.cycle().unwrap();
        assert_eq!(scope.active_kind(), kind);
    }
    scope.cycle().unwrap();
    assert_eq!(scope.active_kind(), ChannelKind::Microphone);
}

#[test]
fn test_trace_visible_only_while_refreshing() {
    let buttons = script(&[]);
    let channels = vec![Channel::sawtooth(Sawtooth::default(), GraphGeometry::default().width())];
    let mut scope = scope(channels, MockSurface::new(160, 128), buttons);
    scope.run(Some(5)).unwrap();

    let state = scope.surface().state();
    assert_eq!(state.frames_applied, 5);
    assert!(state.trace_pixels_per_frame.iter().all(|&n| n > 0));
    assert_eq!(scope.surface().count_trace_pixels(), 0);
}

#[test]
fn test_frame_survives_erase() {
    let g = GraphGeometry::default();
    let channels = vec![Channel::light(Box::new(Level(0)), g.width())];
    let mut scope = scope(channels, CapturingSurface::new(), script(&[]));
    scope.run(Some(3)).unwrap();

    let bmp = scope.surface().bitmap();
    for x in (g.x_left - 1)..=(g.x_right + 1) {
        assert_eq!(bmp.get_pixel(x, g.y_top - 1), Some(PaletteIndex::FRAME));
        assert_eq!(bmp.get_pixel(x, g.y_bottom + 1), Some(PaletteIndex::FRAME));
    }
    for y in (g.y_top - 1)..=(g.y_bottom + 1) {
        assert_eq!(bmp.get_pixel(g.x_left - 1, y), Some(PaletteIndex::FRAME));
        assert_eq!(bmp.get_pixel(g.x_right + 1, y), Some(PaletteIndex::FRAME));
    }
}

#[test]
fn test_floor_sample_clamps_to_bottom_row() {
    let g = GraphGeometry::default();
    let channels = vec![Channel::light(Box::new(Level(0)), g.width())];
    let mut scope = scope(channels, CapturingSurface::new(), script(&[]));
    scope.cycle().unwrap();

    let frame = &scope.surface().frames[0];
    for x in g.x_left..g.x_right {
        assert_eq!(frame.get_pixel(x, g.y_bottom), Some(PaletteIndex::TRACE));
    }
    assert_eq!(frame.count(PaletteIndex::TRACE), g.width());
}

#[test]
fn test_gain_and_offset_from_buttons() {
    // light preset is offset 70 gain 9; four b and two up leave gain 5 offset 62
    let g = GraphGeometry::default();
    let mut entries = vec!["b"; 4];
    entries.extend(["up"; 2]);
    entries.push("");
    let channels = vec![Channel::light(Box::new(Level(32768)), g.width())];
    let mut scope = scope(channels, CapturingSurface::new(), script(&entries));
    scope.run(Some(7)).unwrap();

    let p = scope.active_channel().params();
    assert_eq!(p.vertical_gain, 5);
    assert_eq!(p.vertical_offset, 62);
    let frame = scope.surface().frames.last().unwrap();
    for x in g.x_left..g.x_right {
        assert_eq!(frame.get_pixel(x, 62), Some(PaletteIndex::TRACE));
    }
}

#[test]
fn test_multi_pass_refresh_completes_frame() {
    let channels = vec![Channel::sawtooth(Sawtooth::default(), GraphGeometry::default().width())];
    let mut scope = scope(channels, MockSurface::with_passes(160, 128, 3), script(&[]));
    scope.run(Some(2)).unwrap();

    let state = scope.surface().state();
    assert_eq!(state.refresh_calls, 6);
    assert_eq!(state.frames_applied, 2);
    assert!(state.trace_pixels_per_frame.iter().all(|&n| n > 0));
}

#[test]
fn test_disabled_channel_skips_trace() {
    let buttons = script(&["select", "", "select", "", "select", ""]);
    let mut scope = scope(four_channels(), MockSurface::new(160, 128), buttons);
    scope.run(Some(3)).unwrap();
    assert_eq!(scope.active_kind(), ChannelKind::Accelerometer);
    assert!(!scope.active_channel().is_enabled());

    scope.surface_mut().reset_state();
    scope.run(Some(2)).unwrap();
    let state = scope.surface().state();
    assert_eq!(state.frames_applied, 2);
    assert_eq!(state.trace_pixels_per_frame, vec![0, 0]);
}

#[test]
fn test_sweep_time_only_in_microphone_mode() {
    let g = GraphGeometry::default();
    let label = Annotation::sweep_time(&g);
    let mut scope = scope(four_channels(), MockSurface::new(160, 128), script(&["", "select", ""]));

    scope.cycle().unwrap();
    assert!(text_pixels(scope.surface().bitmap(), &label) > 0);

    scope.cycle().unwrap();
    assert_eq!(scope.active_kind(), ChannelKind::LightSensor);
    assert_eq!(text_pixels(scope.surface().bitmap(), &label), 0);

    let name = Annotation::channel_name(&g);
    assert!(text_pixels(scope.surface().bitmap(), &name) > 0);
}

#[test]
fn test_led_sequence_per_cycle() {
    let channels = vec![Channel::sawtooth(Sawtooth::default(), GraphGeometry::default().width())];
    let mut scope = scope(channels, MockSurface::new(160, 128), script(&[]));
    let before = scope.led().strip().history().len();
    scope.cycle().unwrap();

    let off = Rgb888::BLACK;
    let cycle = &scope.led().strip().history()[before..];
    assert_eq!(
        cycle,
        &[
            (0, Rgb888::RED),
            (0, off),
            (1, off),
            (1, Rgb888::BLUE),
            (0, off),
            (1, off),
        ]
    );
}

#[test]
fn test_select_lights_button_led_until_release() {
    let mut scope = scope(four_channels(), MockSurface::new(160, 128), script(&["select", "select", ""]));
    scope.cycle().unwrap();
    let history = scope.led().strip().history();
    let held = history.iter().position(|&(i, c)| i == 2 && c == Rgb888::YELLOW).unwrap();
    let released = history.iter().position(|&(i, c)| i == 2 && c == Rgb888::BLACK).unwrap();
    assert!(held < released);
    assert_eq!(scope.active_kind(), ChannelKind::LightSensor);
}

#[test]
fn test_level_buttons_repeat_each_cycle() {
    let a = Button::A.name();
    let channels = vec![Channel::sawtooth(Sawtooth::default(), GraphGeometry::default().width())];
    let mut scope = scope(channels, MockSurface::new(160, 128), script(&[a, a, a]));
    let gain = scope.active_channel().params().vertical_gain;
    scope.run(Some(4)).unwrap();
    assert_eq!(scope.active_channel().params().vertical_gain, gain + 3);
}

#[test]
fn test_channels_from_config() {
    let cfg = parse_yaml("sources:\n  accelerometer:\n    type: absent\n").unwrap();
    let ctx = cfg.context();
    let channels = build_channels(&cfg, &ctx.geometry);
    assert_eq!(channels.len(), 4);
    assert!(!channels[3].is_enabled());

    let mut scope = Scope::new(
        ctx,
        channels,
        MockSurface::new(160, 128),
        ButtonInput::new(script(&["", "select", ""])),
        LedIndicator::new(MemoryStrip::new(LED_COUNT), cfg.led_brightness()),
        NoopDelay::new(),
    )
    .unwrap();
    scope.run(Some(3)).unwrap();
    assert_eq!(scope.active_kind(), ChannelKind::LightSensor);
    assert_eq!(scope.surface().state().frames_applied, 3);
}

#[test]
fn test_sensor_failure_skips_one_frame() {
    let g = GraphGeometry::default();
    let channels = vec![Channel::accelerometer(Box::new(Flaky { failures: 2 }), g.width())];
    let mut scope = scope(channels, MockSurface::new(160, 128), script(&[]));

    // each failing read costs exactly one frame
    scope.run(Some(2)).unwrap();
    let state = scope.surface().state();
    assert_eq!(state.frames_applied, 2);
    assert_eq!(state.trace_pixels_per_frame, vec![0, 0]);
    assert!(scope.active_channel().is_enabled());

    scope.cycle().unwrap();
    let state = scope.surface().state();
    assert_eq!(state.frames_applied, 3);
    assert!(state.trace_pixels_per_frame[2] > 0);
    assert_eq!(scope.surface().count_trace_pixels(), 0);
}
