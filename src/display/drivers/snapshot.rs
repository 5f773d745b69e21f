/*
 *  display/drivers/snapshot.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Headless surface writing applied frames out as PPM images
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

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use embedded_graphics::pixelcolor::RgbColor;
use log::{debug, info};

use crate::display::bitmap::IndexedBitmap;
use crate::display::error::DisplayError;
use crate::display::palette::Palette;
use crate::display::traits::{IndexedBitmapSurface, RefreshGate};

/// Surface for running the scope on a desktop without a panel
///
/// Every `every` applied frames the bitmap is rendered through the palette
/// and written as a binary PPM. A `{frame}` token in the path is replaced
/// by the frame number, otherwise the same file is overwritten.
#[derive(Debug)]
pub struct SnapshotSurface {
    bitmap: IndexedBitmap,
    palette: Palette,
    gate: RefreshGate,
    path: Option<PathBuf>,
    every: u64,
    frames: u64,
}

impl SnapshotSurface {
    pub fn new(width: u32, height: u32, passes_per_frame: u32) -> Self {
        Self {
            bitmap: IndexedBitmap::new(width, height),
            palette: Palette::default(),
            gate: RefreshGate::new(passes_per_frame),
            path: None,
            every: 1,
            frames: 0,
        }
    }

    /// Enable snapshots to `path` every `every` frames
    pub fn with_snapshots(mut self, path: impl Into<PathBuf>, every: u64) -> Self {
        let path = path.into();
        info!("Writing frame snapshots to {} every {} frame(s)", path.display(), every.max(1));
        self.path = Some(path);
        self.every = every.max(1);
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn snapshot_path(&self) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        let s = path.to_string_lossy();
        if s.contains("{frame}") {
            Some(PathBuf::from(s.replace("{frame}", &format!("{:06}", self.frames))))
        } else {
            Some(path.clone())
        }
    }

    /// Encode the bitmap as binary PPM (P6)
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "P6")?;
        writeln!(out, "{} {}", self.bitmap.width(), self.bitmap.height())?;
        writeln!(out, "255")?;
        for &px in self.bitmap.as_slice() {
            let c = self.palette.color(px);
            out.write_all(&[c.r(), c.g(), c.b()])?;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), DisplayError> {
        if let Some(path) = self.snapshot_path() {
            let mut out = BufWriter::new(File::create(&path)?);
            self.write_ppm(&mut out)?;
            out.flush()?;
            debug!("Frame {} written to {}", self.frames, path.display());
        }
        Ok(())
    }
}

impl IndexedBitmapSurface for SnapshotSurface {
    fn bitmap(&self) -> &IndexedBitmap {
        &self.bitmap
    }

    fn bitmap_mut(&mut self) -> &mut IndexedBitmap {
        &mut self.bitmap
    }

    fn refresh(&mut self, _minimum_fps: u32) -> Result<bool, DisplayError> {
        if !self.gate.pass() {
            return Ok(false);
        }
        self.frames += 1;
        if self.frames % self.every == 0 {
            self.save()?;
        }
        Ok(true)
    }
}
