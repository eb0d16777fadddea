/*
 *  display/icons.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Status icon strip, separator line and signal strength meter
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

use arrayvec::ArrayVec;
use log::{debug, warn};

use crate::constants::{
    DEFAULT_ICON_SPACING, DEFAULT_MAX_ICONS, SIG_STRENGTH_BARS,
    SIG_STRENGTH_COLUMN_FROM_RIGHT, SIG_STRENGTH_WIDTH,
};
use crate::display::error::DisplayError;
use crate::display::framebuffer::FrameBuffer;
use crate::display::mode::{DisplayModeProfile, IconKind};
use crate::glyphs::{get_glyph_slice, icon_16x16, ICON_8X8, ICON_BLANK, ICON_MAP, SIGNAL_STRENGTH_8X6};

/// Columns of a 16x16 icon that are drawn.
pub const ICON_16X16_COLUMNS: usize = 14;
/// Left margin of the strip.
pub const ICON_STRIP_COLUMN: usize = 2;

/// Icon ids for the set bits of `bitmask`, lowest bit first, at most `max`.
pub fn icons_for(bitmask: u32, max: usize) -> ArrayVec<usize, DEFAULT_MAX_ICONS> {
    let max = max.min(DEFAULT_MAX_ICONS);
    let mut icons = ArrayVec::new();
    let mut mask = bitmask;
    let mut bit = 0;
    while icons.len() < max && mask != 0 && bit < ICON_MAP.len() {
        if mask & 1 != 0 {
            match ICON_MAP[bit] {
                ICON_BLANK => debug!("icon bit {} has no icon", bit),
                id => icons.push(id),
            }
        }
        mask >>= 1;
        bit += 1;
    }
    if mask != 0 && bit >= ICON_MAP.len() {
        warn!("ignoring unknown icon bits {:#x}", mask << bit);
    }
    icons
}

/// Icon row settings that outlive a mode switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconStrip {
    pub max_icons: usize,
    pub spacing: usize,
    /// Set by full screen redraws, cleared by bitmap replays
    pub separator_armed: bool,
}

impl Default for IconStrip {
    fn default() -> Self {
        Self {
            max_icons: DEFAULT_MAX_ICONS,
            spacing: DEFAULT_ICON_SPACING,
            separator_armed: false,
        }
    }
}

impl IconStrip {
    pub fn set_slots(&mut self, slots: usize) -> Result<(), DisplayError> {
        if slots > DEFAULT_MAX_ICONS {
            return Err(DisplayError::InvalidArgument(format!(
                "{} icon slots, at most {}", slots, DEFAULT_MAX_ICONS
            )));
        }
        self.max_icons = slots;
        Ok(())
    }

    /// Row of the dashed separator for an 8x8 icon row.
    pub fn separator_row(mode: &DisplayModeProfile) -> usize {
        mode.icon_line_position.unwrap_or_else(|| {
            mode.icon_y.checked_sub(5).filter(|&y| y >= 8).unwrap_or(mode.icon_y + 12)
        })
    }

    /// Draws the icon row; a no-op in modes without one.
    pub fn draw(&self, fb: &mut FrameBuffer, mode: &DisplayModeProfile, bitmask: u32) -> Result<(), DisplayError> {
        if mode.icon_kind == IconKind::None {
            return Ok(());
        }
        let icons = icons_for(bitmask, self.max_icons);
        fb.set_position(mode.icon_kind.height(), ICON_STRIP_COLUMN, mode.icon_y)?;
        for slot in 0..self.max_icons {
            let id = icons.get(slot).copied().unwrap_or(ICON_BLANK);
            match mode.icon_kind {
                IconKind::Icon8x8 => {
                    fb.draw_8bit(get_glyph_slice(&ICON_8X8, id, 8), false)?;
                    fb.draw_blank_columns(self.spacing, false)?;
                }
                IconKind::Icon16x16 => {
                    fb.draw_16bit(&icon_16x16(id)[..ICON_16X16_COLUMNS], false)?;
                }
                IconKind::None => {}
            }
        }

        if mode.icon_kind == IconKind::Icon8x8 && self.separator_armed {
            fb.set_position(1, 0, Self::separator_row(mode))?;
            fb.draw_columns((0..fb.visible_width()).map(|x| u32::from(x % 2 == 0)), false)?;
        }
        Ok(())
    }
}

/// Bars lit for a 0..=100 level.
pub fn signal_bars(level: i32) -> Option<usize> {
    if level < 0 {
        return None;
    }
    Some(((level as usize) * 5 / 100).min(SIG_STRENGTH_BARS))
}

/// Antenna plus four bars at the right of the icon row. Below zero is off.
pub fn draw_signal_strength(fb: &mut FrameBuffer, mode: &DisplayModeProfile, level: i32) -> Result<(), DisplayError> {
    if mode.icon_kind == IconKind::None || mode.no_signal_strength {
        return Ok(());
    }
    let bars = signal_bars(level);
    let y = match mode.icon_kind {
        IconKind::Icon16x16 => mode.icon_y + 8,
        _ => mode.icon_y,
    };
    let col = fb.visible_width().saturating_sub(SIG_STRENGTH_COLUMN_FROM_RIGHT);
    fb.set_position(8, col, y)?;
    for (i, glyph) in SIGNAL_STRENGTH_8X6.iter().enumerate() {
        match bars {
            Some(lit) if lit >= i => fb.draw_8bit(glyph, false)?,
            _ => fb.draw_blank_columns(SIG_STRENGTH_WIDTH, false)?,
        }
    }
    Ok(())
}
