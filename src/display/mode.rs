/*
 *  display/mode.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Logical display modes: text grid, fonts, icon row, arrows, clock layout
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

use crate::display::error::DisplayError;
use crate::display::framebuffer::MAX_BLIT_HEIGHT;
use crate::display::hardware::HardwareProfile;
use crate::display::text::SMALL_ARROW_WIDTH;

/// Text font of a mode, named height x width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontKind {
    #[serde(rename = "8x6")]
    Font8x6,
    #[serde(rename = "16x8")]
    Font16x8,
    #[serde(rename = "32x16")]
    Font32x16,
    #[serde(rename = "11x8")]
    Font11x8,
}

impl FontKind {
    pub fn width(self) -> usize {
        match self {
            FontKind::Font8x6 => 6,
            FontKind::Font16x8 => 8,
            FontKind::Font32x16 => 16,
            FontKind::Font11x8 => 8,
        }
    }

    pub fn height(self) -> usize {
        match self {
            FontKind::Font8x6 => 8,
            FontKind::Font16x8 => 16,
            FontKind::Font32x16 => 32,
            FontKind::Font11x8 => 11,
        }
    }

    /// Whether double-width glyphs can be drawn in this font.
    pub fn has_double_width(self) -> bool {
        matches!(self, FontKind::Font16x8 | FontKind::Font32x16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    None,
    #[serde(rename = "8x8")]
    Icon8x8,
    #[serde(rename = "16x16")]
    Icon16x16,
}

impl IconKind {
    pub fn height(self) -> usize {
        match self {
            IconKind::None => 0,
            IconKind::Icon8x8 => 8,
            IconKind::Icon16x16 => 16,
        }
    }
}

/// How the edge columns of a text line are reserved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKind {
    None,
    /// 16 pixel arrows; width is whatever margin the text grid leaves, max 6
    Tall,
    /// 5 columns cut from the 8x6 font's '<' and '>'
    Small,
}

/// Big clock layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockLayout {
    /// Big digits, alarm time as text underneath
    BigAlarmText,
    /// Zoomed time, date line, icon row
    ZoomedDate,
    /// Narrow big digits with AM/PM and alarm icons on the right
    NarrowIcons,
    /// Zoomed time, date line, alarm time as text
    ZoomedAlarmText,
    /// Big digits with the alarm shown on the icon row
    BigAlarmIcons,
}

impl ClockLayout {
    /// Layouts by style number.
    pub fn from_style(style: u8) -> Option<Self> {
        match style {
            0 => Some(ClockLayout::BigAlarmText),
            1 => Some(ClockLayout::ZoomedDate),
            2 => Some(ClockLayout::NarrowIcons),
            3 => Some(ClockLayout::ZoomedAlarmText),
            4 => Some(ClockLayout::BigAlarmIcons),
            _ => None,
        }
    }

    /// Columns the layout needs.
    fn min_width(self) -> usize {
        match self {
            ClockLayout::NarrowIcons => 132,
            _ => 128,
        }
    }
}

/// Per logical mode constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModeProfile {
    pub id: usize,
    pub char_rows: usize,
    pub char_cols: usize,
    pub font: FontKind,
    pub top_row_offset: usize,
    pub icon_kind: IconKind,
    pub icon_y: usize,
    pub arrow_kind: ArrowKind,
    pub clock: Option<ClockLayout>,
    pub small_clock: bool,
    pub zoom_target: Option<usize>,
    pub inverse_bleed: bool,
    pub no_signal_strength: bool,
    pub icon_line_position: Option<usize>,
}

/// Field-by-field replacement of a mode, from config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeOverride {
    pub char_rows: Option<usize>,
    pub char_cols: Option<usize>,
    pub top_row_offset: Option<usize>,
    pub icon_kind: Option<IconKind>,
    pub icon_y: Option<usize>,
    pub icon_line_position: Option<usize>,
    pub inverse_bleed: Option<bool>,
}

impl DisplayModeProfile {
    /// A bare text grid, used for the clock's time and date lines.
    pub fn scratch(char_rows: usize, char_cols: usize, font: FontKind, top_row_offset: usize) -> Self {
        Self {
            id: usize::MAX,
            char_rows,
            char_cols,
            font,
            top_row_offset,
            icon_kind: IconKind::None,
            icon_y: 0,
            arrow_kind: ArrowKind::None,
            clock: None,
            small_clock: false,
            zoom_target: None,
            inverse_bleed: false,
            no_signal_strength: false,
            icon_line_position: None,
        }
    }

    fn text(id: usize, char_rows: usize, char_cols: usize, font: FontKind, top_row_offset: usize) -> Self {
        let arrow_kind = match font {
            FontKind::Font16x8 | FontKind::Font32x16 => ArrowKind::Tall,
            FontKind::Font8x6 => ArrowKind::Small,
            FontKind::Font11x8 => ArrowKind::None,
        };
        Self { id, arrow_kind, ..Self::scratch(char_rows, char_cols, font, top_row_offset) }
    }

    fn icons(mut self, kind: IconKind, y: usize) -> Self {
        self.icon_kind = kind;
        self.icon_y = y;
        self
    }

    fn clock(mut self, layout: ClockLayout, small_clock: bool) -> Self {
        self.clock = Some(layout);
        self.small_clock = small_clock;
        self
    }

    fn zoom(mut self, target: usize) -> Self {
        self.zoom_target = Some(target);
        self
    }

    fn bleed(mut self) -> Self {
        self.inverse_bleed = true;
        self
    }

    pub fn with_overrides(mut self, o: &ModeOverride) -> Self {
        if let Some(v) = o.char_rows          { self.char_rows = v; }
        if let Some(v) = o.char_cols          { self.char_cols = v; }
        if let Some(v) = o.top_row_offset     { self.top_row_offset = v; }
        if let Some(v) = o.icon_kind          { self.icon_kind = v; }
        if let Some(v) = o.icon_y             { self.icon_y = v; }
        if let Some(v) = o.inverse_bleed      { self.inverse_bleed = v; }
        if o.icon_line_position.is_some()     { self.icon_line_position = o.icon_line_position; }
        self
    }

    /// Checks the text grid, icon row and clock fit on the panel.
    pub fn validate_for(&self, hw: &HardwareProfile) -> Result<(), DisplayError> {
        let fail = |msg: String| Err(DisplayError::InvalidConfiguration(format!("mode {}: {}", self.id, msg)));
        let text_height = self.char_rows * self.font.height() + self.top_row_offset;
        if text_height > hw.height_px {
            return fail(format!("{} text rows need {} pixels, panel has {}", self.char_rows, text_height, hw.height_px));
        }
        if self.inverse_bleed && self.font.height() >= MAX_BLIT_HEIGHT {
            return fail(format!("{:?} is too tall to bleed into the line above", self.font));
        }
        let arrows = if self.arrow_kind == ArrowKind::Small { 2 * SMALL_ARROW_WIDTH } else { 0 };
        let text_width = self.char_cols * self.font.width() + arrows;
        if text_width > hw.width_px - hw.x_offset {
            return fail(format!("{} text columns need {} pixels, panel has {}", self.char_cols, text_width, hw.width_px - hw.x_offset));
        }
        if self.icon_kind != IconKind::None && self.icon_y + self.icon_kind.height() > hw.height_px {
            return fail(format!("icon row at {} runs off the panel", self.icon_y));
        }
        if let Some(layout) = self.clock {
            if hw.height_px < 64 || hw.width_px - hw.x_offset < layout.min_width() {
                return fail(format!("{:?} clock needs a 64 row, {} column panel", layout, layout.min_width()));
            }
        }
        Ok(())
    }
}

/// The mode table. Ids 9 and 10 are the zoomed forms of 0 and 5.
#[derive(Debug, Clone)]
pub struct ModeTable {
    modes: Vec<DisplayModeProfile>,
}

impl ModeTable {
    pub fn standard() -> Self {
        use ClockLayout::*;
        use FontKind::*;
        use IconKind::*;

        let mut amax = DisplayModeProfile::text(4, 2, 14, Font8x6, 0);
        amax.no_signal_strength = true;

        let modes = vec![
            // 2 lines, 16x16 icons on the bottom, zooms to 2 big lines
            DisplayModeProfile::text(0, 2, 15, Font16x8, 8)
                .icons(Icon16x16, 48)
                .clock(BigAlarmText, true)
                .zoom(9),
            // 3 lines, icons on the bottom
            DisplayModeProfile::text(1, 3, 15, Font16x8, 0)
                .icons(Icon8x8, 56)
                .clock(ZoomedDate, true),
            // 4 lines, no icons
            DisplayModeProfile::text(2, 4, 15, Font16x8, 0).clock(NarrowIcons, false),
            // 3 lines, icons on top
            DisplayModeProfile::text(3, 3, 15, Font16x8, 16)
                .icons(Icon8x8, 0)
                .clock(ZoomedAlarmText, false),
            // AMAX 95x17, no clock
            amax,
            // SSD0323 greyscale OLED
            DisplayModeProfile::text(5, 3, 15, Font16x8, 0)
                .icons(Icon8x8, 56)
                .clock(ZoomedDate, true)
                .zoom(10),
            // CONFIG1009: 6 lines of 8x6
            DisplayModeProfile::text(6, 6, 20, Font8x6, 0)
                .icons(Icon8x8, 56)
                .clock(BigAlarmIcons, true)
                .bleed(),
            // CONFIG985: 3 lines with the icon alarm clock
            DisplayModeProfile::text(7, 3, 15, Font16x8, 0)
                .icons(Icon8x8, 56)
                .clock(BigAlarmIcons, true),
            // CONFIG983: 132x32, 11 pixel font
            DisplayModeProfile::text(8, 2, 15, Font11x8, 5).bleed(),
            // zoomed forms
            DisplayModeProfile::text(9, 2, 8, Font32x16, 0)
                .clock(BigAlarmText, false)
                .zoom(0),
            DisplayModeProfile::text(10, 2, 8, Font32x16, 0)
                .clock(ZoomedDate, false)
                .zoom(5),
        ];
        Self { modes }
    }

    pub fn get(&self, id: usize) -> Result<&DisplayModeProfile, DisplayError> {
        self.modes.get(id).ok_or(DisplayError::UnknownDisplayMode(id))
    }

    /// Zoomed forms, reached through a lower mode's zoom.
    pub fn is_zoom_form(&self, id: usize) -> bool {
        self.modes.iter().any(|m| m.zoom_target == Some(id) && m.id < id)
    }

    /// A mode that can be picked directly; zoomed forms are not.
    pub fn selectable(&self, id: usize) -> Result<&DisplayModeProfile, DisplayError> {
        if self.is_zoom_form(id) {
            return Err(DisplayError::UnknownDisplayMode(id));
        }
        self.get(id)
    }

    /// Replace a mode in place, keeping its id.
    pub fn set(&mut self, mode: DisplayModeProfile) -> Result<(), DisplayError> {
        let slot = self.modes.get_mut(mode.id).ok_or(DisplayError::UnknownDisplayMode(mode.id))?;
        *slot = mode;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}
