/*
 *  lib.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Library root
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

pub mod board;
pub mod buffer;
pub mod channel;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod func_timer;
pub mod geometry;
pub mod hal;
pub mod input;
pub mod led;
pub mod pacer;
pub mod render;
pub mod scope;

pub use channel::{Channel, ChannelKind};
pub use error::{ChannelError, ScopeError, SensorError};
pub use geometry::GraphGeometry;
pub use scope::{Scope, ScopeContext, Timing};
