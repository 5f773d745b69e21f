/*
 *  display/mod.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - indexed bitmap, palette and refreshable surfaces
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod bitmap;
pub mod palette;

// Text around the graph
pub mod annotate;

// Surfaces
pub mod drivers;

// Re-exports for convenience
pub use traits::{IndexedBitmapSurface, RefreshGate};
pub use error::DisplayError;
pub use bitmap::IndexedBitmap;
pub use palette::{Palette, PaletteIndex};
pub use annotate::Annotation;
pub use drivers::mock::MockSurface;
pub use drivers::snapshot::SnapshotSurface;
