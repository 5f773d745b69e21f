/*
 *  main.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Host binary - simulated or LIS3DH-backed scope with PPM frames
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

use anyhow::Context;
use env_logger::Env;
use linux_embedded_hal::Delay;
use log::info;

use badgescope::board::{build_channels, MemoryStrip, ScriptedButtons};
use badgescope::config;
use badgescope::constants::LED_COUNT;
use badgescope::display::SnapshotSurface;
use badgescope::input::ButtonInput;
use badgescope::led::LedIndicator;
use badgescope::scope::Scope;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> anyhow::Result<()> {
    let cfg = config::load().context("loading configuration")?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level.as_deref().unwrap_or("info")))
        .format_timestamp_secs()
        .init();

    info!("This {} fits on a lanyard", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let ctx = cfg.context();
    let (width, height) = cfg.display_size();
    let mut surface = SnapshotSurface::new(width, height, cfg.refresh_passes());
    if let Some((path, every)) = cfg.snapshot() {
        surface = surface.with_snapshots(path, every);
    }
    info!(
        "Display {}x{}, graph {}..{} x {}..{}",
        width, height, ctx.geometry.x_left, ctx.geometry.x_right, ctx.geometry.y_top, ctx.geometry.y_bottom
    );

    let buttons = ScriptedButtons::new(cfg.button_script()?);
    let led = LedIndicator::new(MemoryStrip::new(LED_COUNT), cfg.led_brightness());
    let channels = build_channels(&cfg, &ctx.geometry);

    let mut scope = Scope::new(ctx, channels, surface, ButtonInput::new(buttons), led, Delay)?;
    let cycles = scope.run(cfg.cycles())?;

    info!("Stopped after {} cycles, {} frames", cycles, scope.surface().frames());
    Ok(())
}
