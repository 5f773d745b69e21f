/*
 *  error.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for sensors, channels and the main loop
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

use thiserror::Error;

use crate::channel::ChannelKind;
use crate::display::DisplayError;

/// Failure of a sensor collaborator.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("bus error: {0}")]
    Bus(String),
    #[error("device not present (expected id {expected:#04x}, found {found:#04x})")]
    NotPresent { expected: u8, found: u8 },
}

/// Result of asking a channel for a sweep it cannot take.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("{0} channel is disabled, no sensor")]
    Disabled(ChannelKind),
    #[error("{kind} sensor read failed: {source}")]
    Sensor {
        kind: ChannelKind,
        #[source]
        source: SensorError,
    },
}

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("at least one channel is required")]
    NoChannels,
    #[error(transparent)]
    Display(#[from] DisplayError),
}
