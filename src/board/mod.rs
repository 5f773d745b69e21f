/*
 *  board/mod.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Host-side collaborators and channel assembly
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

pub mod buttons;
pub mod lis3dh;
pub mod sim;
pub mod strip;

use linux_embedded_hal::I2cdev;
use log::{info, warn};

use crate::channel::{Channel, ChannelKind, Sawtooth};
use crate::config::{Config, SourceConfig};
use crate::error::SensorError;
use crate::geometry::GraphGeometry;
use crate::hal::TriAxisSensor;

pub use buttons::ScriptedButtons;
pub use lis3dh::Lis3dh;
pub use sim::{SimulatedAccelerometer, SimulatedLight, SimulatedMicrophone};
pub use strip::MemoryStrip;

const SIM_TONE_HZ: f32 = 440.0;

/// All four channels in mode-select order.
///
/// A sensor that cannot be opened leaves its channel disabled.
pub fn build_channels(cfg: &Config, geometry: &GraphGeometry) -> Vec<Channel> {
    let width = geometry.width();
    let (peak, step) = cfg.sawtooth();

    ChannelKind::ALL
        .into_iter()
        .map(|kind| match kind {
            ChannelKind::Microphone => match cfg.microphone() {
                SourceConfig::Simulated => Channel::microphone(
                    Box::new(SimulatedMicrophone::new(rand::random(), SIM_TONE_HZ).realtime(true)),
                    width,
                ),
                _ => absent(kind, width),
            },
            ChannelKind::LightSensor => match cfg.light() {
                SourceConfig::Simulated => Channel::light(Box::new(SimulatedLight::new(rand::random())), width),
                _ => absent(kind, width),
            },
            ChannelKind::Sawtooth => Channel::sawtooth(Sawtooth::new(peak, step), width),
            ChannelKind::Accelerometer => match cfg.accelerometer() {
                SourceConfig::Simulated => {
                    Channel::accelerometer(Box::new(SimulatedAccelerometer::new(rand::random())), width)
                }
                SourceConfig::I2c { bus, address } => match open_lis3dh(&bus, address) {
                    Ok(dev) => {
                        info!("LIS3DH on {} at {:#04x}", bus, address);
                        Channel::accelerometer(dev, width)
                    }
                    Err(e) => {
                        warn!("Accelerometer on {} unavailable: {}", bus, e);
                        Channel::disabled(kind, width)
                    }
                },
                SourceConfig::Absent => absent(kind, width),
            },
        })
        .collect()
}

fn absent(kind: ChannelKind, width: usize) -> Channel {
    info!("{} source absent, channel disabled", kind);
    Channel::disabled(kind, width)
}

fn open_lis3dh(bus: &str, address: u8) -> Result<Box<dyn TriAxisSensor>, SensorError> {
    let i2c = I2cdev::new(bus).map_err(|e| SensorError::Bus(format!("{bus}: {e}")))?;
    Ok(Box::new(Lis3dh::new(i2c, address)?))
}
