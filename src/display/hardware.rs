/*
 *  display/hardware.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Physical panel profiles
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

use serde::{Deserialize, Serialize};

use crate::constants::CTL_REGRES;
use crate::display::error::DisplayError;

/// Number of 8 pixel pages a row lookup can map.
///
/// Eight pages cover a 64 row panel; the ninth holds the rows pushed down
/// by a non-zero `y_offset` (64 rows + offset 4 spans 9 pages).
pub const MAX_PAGES: usize = 9;

/// Logical page -> controller page permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLookup {
    Identity,
    Reverse,
    Split,
    Tiffany,
    SplitReverse,
}

impl RowLookup {
    pub fn table(self) -> &'static [u8; MAX_PAGES] {
        match self {
            RowLookup::Identity => &[0, 1, 2, 3, 4, 5, 6, 7, 8],
            RowLookup::Reverse => &[7, 6, 5, 4, 3, 2, 1, 0, 8],
            RowLookup::Split => &[4, 5, 6, 7, 0, 1, 2, 3, 8],
            RowLookup::Tiffany => &[5, 4, 3, 2, 1, 0, 8, 7, 6],
            RowLookup::SplitReverse => &[3, 2, 1, 0, 7, 6, 5, 4, 8],
        }
    }

    /// Controller page for a logical page.
    pub fn hardware_page(self, page: usize) -> u8 {
        self.table().get(page).copied().unwrap_or(page as u8)
    }
}

/// Per-panel constants. Chosen once at init.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareProfile {
    pub name: &'static str,
    pub width_px: usize,
    pub height_px: usize,
    pub x_offset: usize,
    pub y_offset: usize,
    pub row_lookup: RowLookup,
    /// Controller expects the top pixel in bit 0
    pub flip_bits: bool,
    pub greyscale: bool,
    pub has_contrast: bool,
    pub regulator_resistor: u8,
    pub reference_v: u8,
}

/// Field-by-field replacement of a profile, from config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareOverride {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub x_offset: Option<usize>,
    pub y_offset: Option<usize>,
    pub row_lookup: Option<RowLookup>,
    pub flip: Option<bool>,
    pub greyscale: Option<bool>,
    pub has_contrast: Option<bool>,
    pub regulator_resistor: Option<u8>,
    pub reference_v: Option<u8>,
}

const PROFILES: &[HardwareProfile] = &[
    HardwareProfile {
        name: "tm13264cbcg",
        width_px: 132,
        height_px: 64,
        x_offset: 0,
        y_offset: 0,
        row_lookup: RowLookup::Identity,
        flip_bits: true,
        greyscale: false,
        has_contrast: true,
        regulator_resistor: CTL_REGRES | 6,
        reference_v: 0x12,
    },
    HardwareProfile {
        name: "tiffany",
        width_px: 132,
        height_px: 64,
        x_offset: 0,
        y_offset: 0,
        row_lookup: RowLookup::Tiffany,
        flip_bits: true,
        greyscale: false,
        has_contrast: true,
        regulator_resistor: CTL_REGRES | 6,
        reference_v: 0x12,
    },
    HardwareProfile {
        name: "amax_kdc162a28",
        width_px: 95,
        height_px: 17,
        x_offset: 0,
        y_offset: 15,
        row_lookup: RowLookup::Reverse,
        flip_bits: true,
        greyscale: false,
        has_contrast: true,
        regulator_resistor: CTL_REGRES | 3,
        reference_v: 31,
    },
    HardwareProfile {
        name: "ssd0323",
        width_px: 128,
        height_px: 64,
        x_offset: 0,
        y_offset: 0,
        row_lookup: RowLookup::Identity,
        flip_bits: true,
        greyscale: true,
        has_contrast: false,
        regulator_resistor: CTL_REGRES | 6,
        reference_v: 0x12,
    },
    HardwareProfile {
        name: "config1009",
        width_px: 132,
        height_px: 64,
        x_offset: 0,
        y_offset: 0,
        row_lookup: RowLookup::Split,
        flip_bits: true,
        greyscale: false,
        has_contrast: true,
        regulator_resistor: CTL_REGRES | 3,
        reference_v: 12,
    },
    HardwareProfile {
        name: "config983",
        width_px: 132,
        height_px: 32,
        x_offset: 0,
        y_offset: 0,
        row_lookup: RowLookup::SplitReverse,
        flip_bits: true,
        greyscale: false,
        has_contrast: true,
        regulator_resistor: CTL_REGRES | 6,
        reference_v: 0x08,
    },
];

impl HardwareProfile {
    /// Look a profile up by name.
    pub fn by_name(name: &str) -> Result<Self, DisplayError> {
        PROFILES
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| DisplayError::UnknownHardware(name.to_string()))
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        PROFILES.iter().map(|p| p.name)
    }

    /// Bytes per framebuffer column.
    pub fn height_bytes(&self) -> usize {
        (self.height_px + self.y_offset).div_ceil(8)
    }

    pub fn with_overrides(mut self, o: &HardwareOverride) -> Self {
        if let Some(v) = o.width              { self.width_px = v; }
        if let Some(v) = o.height             { self.height_px = v; }
        if let Some(v) = o.x_offset           { self.x_offset = v; }
        if let Some(v) = o.y_offset           { self.y_offset = v; }
        if let Some(v) = o.row_lookup         { self.row_lookup = v; }
        if let Some(v) = o.flip               { self.flip_bits = v; }
        if let Some(v) = o.greyscale          { self.greyscale = v; }
        if let Some(v) = o.has_contrast       { self.has_contrast = v; }
        if let Some(v) = o.regulator_resistor { self.regulator_resistor = v; }
        if let Some(v) = o.reference_v        { self.reference_v = v; }
        self
    }

    pub fn validate(&self) -> Result<(), DisplayError> {
        if self.width_px == 0 || self.height_px == 0 {
            return Err(DisplayError::InvalidConfiguration(format!(
                "{}: width/height must be > 0", self.name
            )));
        }
        if self.x_offset >= self.width_px {
            return Err(DisplayError::InvalidConfiguration(format!(
                "{}: x_offset {} leaves no visible columns", self.name, self.x_offset
            )));
        }
        if self.height_bytes() > MAX_PAGES {
            return Err(DisplayError::InvalidConfiguration(format!(
                "{}: {} rows + {} offset exceed {} pages",
                self.name, self.height_px, self.y_offset, MAX_PAGES
            )));
        }
        Ok(())
    }
}
