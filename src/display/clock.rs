/*
 *  display/clock.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Clock faces: big digit layouts, zoomed time with date, status line clock
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
use log::debug;

use crate::clock_font::{ClockFontData, ClockIcon, CLOCK_FONT_HEIGHT};
use crate::constants::{
    AMPM_LENGTH, COL_OFFSET_12HR, COL_OFFSET_24HR, COL_OFFSET_ALARM, COL_OFFSET_AMPM,
    SMALL_CLOCK_HEIGHT, SMALL_CLOCK_ROW, SMALL_CLOCK_SHIFT,
};
use crate::display::error::DisplayError;
use crate::display::fonts::{Glyph, GlyphStore};
use crate::display::framebuffer::FrameBuffer;
use crate::display::icons::IconStrip;
use crate::display::mode::{ClockLayout, DisplayModeProfile, FontKind};
use crate::display::text::{decode_line, draw_glyph, draw_line, glyph_columns, TextLine};

pub const CLOCK_12HR: u32 = 0;
pub const CLOCK_24HR: u32 = 1;
pub const CLOCK_HOURS_MASK: u32 = 1;
pub const CLOCK_BLANK: u32 = 16;

/// Top row of the big digits in layouts 0 and 4.
const BIG_DIGIT_ROW: usize = 8;
const ALARM_TEXT_ROW: usize = 48;
/// 8 pixel AM/PM sits this far below the zoomed time's top.
const SMALL_AMPM_DROP: usize = 16;
const NARROW_DIGIT_GAP: usize = 4;
const NARROW_LEAD: usize = 1;
const NARROW_TAIL: usize = 20;
const CLOCK_ICON_COLUMN: usize = 116;
/// Offset of AM/PM after the small clock's "hh:mm".
const SMALL_AMPM_COLUMN: usize = 5 * 8;
/// Columns the small clock moves left to make room for AM/PM.
const SMALL_12HR_SHIFT: usize = 16;

/// Mode word of a clock request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockFlags(pub u32);

impl ClockFlags {
    pub const TWELVE_HOUR: Self = Self(CLOCK_12HR);
    pub const TWENTY_FOUR_HOUR: Self = Self(CLOCK_24HR);

    pub fn twelve_hour(self) -> bool {
        self.0 & CLOCK_HOURS_MASK == CLOCK_12HR
    }

    pub fn blank(self) -> bool {
        self.0 & CLOCK_BLANK != 0
    }

    pub fn with_blank(self) -> Self {
        Self(self.0 | CLOCK_BLANK)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClockState<'a> {
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub flags: ClockFlags,
    /// Alarm status bits for the icon row; zero when no alarm is set
    pub alarm: u32,
    pub alarm_hours: i32,
    pub alarm_minutes: i32,
    pub date: Option<&'a str>,
}

impl ClockState<'_> {
    pub fn alarm_on(&self) -> bool {
        self.alarm != 0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmallClockState {
    pub hours: i32,
    pub minutes: i32,
    pub flags: ClockFlags,
    /// Column of the first digit in 24 hour format
    pub position: usize,
}

/// Hours on a 12 hour dial.
pub fn make_12_hour(hours: i32) -> i32 {
    match hours.rem_euclid(12) {
        0 => 12,
        h => h,
    }
}

pub type AmPmLabel = ArrayVec<Glyph, AMPM_LENGTH>;

/// Localised AM/PM strings, already looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmPmLabels {
    pub am: AmPmLabel,
    pub pm: AmPmLabel,
}

impl AmPmLabels {
    /// Each label keeps at most `AMPM_LENGTH` cells; a double-width glyph takes two.
    pub fn new(store: &GlyphStore, am: &[u8], pm: &[u8]) -> Self {
        let lookup = |text: &[u8]| -> AmPmLabel {
            decode_line(store, text, AMPM_LENGTH).glyphs.into_iter().take(AMPM_LENGTH).collect()
        };
        Self { am: lookup(am), pm: lookup(pm) }
    }

    pub fn for_hour(&self, hours: i32) -> &[Glyph] {
        if hours < 12 { &self.am } else { &self.pm }
    }

    pub fn is_complete(&self) -> bool {
        !self.am.is_empty() && !self.pm.is_empty()
    }
}

/// Draws glyphs at the cursor while they fit, returning columns used.
fn draw_label(
    fb: &mut FrameBuffer,
    store: &GlyphStore,
    font: FontKind,
    glyphs: &[Glyph],
    col: usize,
) -> Result<usize, DisplayError> {
    let mut used = 0;
    for &glyph in glyphs {
        let width = glyph_columns(font, glyph);
        if col + used + width > fb.visible_width() {
            debug!("label clipped after {} columns", used);
            break;
        }
        draw_glyph(fb, store, font, glyph, false)?;
        used += width;
    }
    Ok(used)
}

fn draw_digit(fb: &mut FrameBuffer, font: &ClockFontData, digit: i32) -> Result<(), DisplayError> {
    match font.digit(digit) {
        Some(columns) => fb.draw_32bit(columns, false),
        None => fb.draw_blank_columns(font.digit_width(), false),
    }
}

/// Big clock faces and the status line clock.
#[derive(Debug, Clone)]
pub struct ClockRenderer {
    wide: ClockFontData,
    narrow: ClockFontData,
    labels: AmPmLabels,
    /// Layout 1 leaves out the date line
    pub disable_date: bool,
    drew_12_hour: bool,
}

impl Default for ClockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockRenderer {
    pub fn new() -> Self {
        Self {
            wide: ClockFontData::wide(),
            narrow: ClockFontData::narrow(),
            labels: AmPmLabels::default(),
            disable_date: false,
            drew_12_hour: false,
        }
    }

    pub fn set_labels(&mut self, labels: AmPmLabels) {
        self.labels = labels;
    }

    pub fn labels(&self) -> &AmPmLabels {
        &self.labels
    }

    /// 12 hour format needs the flag and both labels.
    pub fn twelve_hour(&self, flags: ClockFlags) -> bool {
        flags.twelve_hour() && self.labels.is_complete()
    }

    pub fn draw(
        &self,
        fb: &mut FrameBuffer,
        store: &GlyphStore,
        mode: &DisplayModeProfile,
        layout: ClockLayout,
        icons: &IconStrip,
        state: &ClockState<'_>,
    ) -> Result<(), DisplayError> {
        let twelve = self.twelve_hour(state.flags);
        debug!("clock {:?} {:02}:{:02} 12h={}", layout, state.hours, state.minutes, twelve);
        match layout {
            ClockLayout::BigAlarmText => {
                self.draw_big_digits(fb, store, state, twelve)?;
                if state.alarm_on() {
                    let offset = if twelve { COL_OFFSET_12HR } else { COL_OFFSET_24HR };
                    self.draw_alarm_time(fb, store, state, twelve, offset)?;
                }
                Ok(())
            }
            ClockLayout::BigAlarmIcons => {
                self.draw_big_digits(fb, store, state, twelve)?;
                icons.draw(fb, mode, state.alarm)
            }
            ClockLayout::ZoomedDate => {
                let date_top = (!self.disable_date).then_some(32);
                self.draw_zoomed(fb, store, state, twelve, 8, date_top)?;
                icons.draw(fb, mode, state.alarm)
            }
            ClockLayout::ZoomedAlarmText => {
                self.draw_zoomed(fb, store, state, twelve, 0, Some(28))?;
                if state.alarm_on() {
                    self.draw_alarm_time(fb, store, state, twelve, COL_OFFSET_24HR)?;
                }
                Ok(())
            }
            ClockLayout::NarrowIcons => self.draw_narrow(fb, state, twelve),
        }
    }

    fn draw_big_digits(
        &self,
        fb: &mut FrameBuffer,
        store: &GlyphStore,
        state: &ClockState<'_>,
        twelve: bool,
    ) -> Result<(), DisplayError> {
        let hours = if twelve { make_12_hour(state.hours) } else { state.hours };
        let offset = if twelve { COL_OFFSET_12HR } else { COL_OFFSET_24HR };
        let width = self.wide.digit_width();

        fb.set_position(CLOCK_FONT_HEIGHT as usize, offset, BIG_DIGIT_ROW)?;
        if state.flags.blank() {
            fb.draw_blank_columns(2 * width, false)?;
            fb.draw_32bit(self.wide.colon(), false)?;
            fb.draw_blank_columns(2 * width, false)?;
        } else {
            if !twelve || hours > 9 {
                draw_digit(fb, &self.wide, hours / 10)?;
            } else {
                fb.draw_blank_columns(width, false)?;
            }
            draw_digit(fb, &self.wide, hours % 10)?;
            fb.draw_32bit(self.wide.colon(), false)?;
            draw_digit(fb, &self.wide, state.minutes / 10)?;
            draw_digit(fb, &self.wide, state.minutes % 10)?;
        }

        if twelve {
            fb.set_position(16, COL_OFFSET_AMPM, BIG_DIGIT_ROW)?;
            draw_label(fb, store, FontKind::Font16x8, self.labels.for_hour(state.hours), COL_OFFSET_AMPM)?;
        }
        Ok(())
    }

    fn draw_zoomed(
        &self,
        fb: &mut FrameBuffer,
        store: &GlyphStore,
        state: &ClockState<'_>,
        twelve: bool,
        time_top: usize,
        date_top: Option<usize>,
    ) -> Result<(), DisplayError> {
        let hours = if twelve { make_12_hour(state.hours) } else { state.hours };
        let time = format!("{:2}:{:02}", hours, state.minutes);
        let time_mode = DisplayModeProfile::scratch(4, 8, FontKind::Font32x16, time_top);
        draw_line(fb, store, &time_mode, 0, &TextLine::plain(&time))?;

        if let Some(top) = date_top {
            let date_mode = DisplayModeProfile::scratch(3, 15, FontKind::Font16x8, top);
            draw_line(fb, store, &date_mode, 0, &TextLine::plain(state.date.unwrap_or("")))?;
        }

        // after the date line, whose padding would wipe it
        if twelve {
            fb.set_position(8, COL_OFFSET_AMPM, time_top + SMALL_AMPM_DROP)?;
            draw_label(fb, store, FontKind::Font8x6, self.labels.for_hour(state.hours), COL_OFFSET_AMPM)?;
        }
        Ok(())
    }

    fn draw_narrow(&self, fb: &mut FrameBuffer, state: &ClockState<'_>, twelve: bool) -> Result<(), DisplayError> {
        let hours = if twelve { make_12_hour(state.hours) } else { state.hours };
        let width = self.narrow.digit_width();

        fb.set_position(CLOCK_FONT_HEIGHT as usize, 0, 0)?;
        fb.draw_blank_columns(NARROW_LEAD, false)?;
        if !twelve || hours > 9 {
            draw_digit(fb, &self.narrow, hours / 10)?;
        } else {
            fb.draw_blank_columns(width, false)?;
        }
        fb.draw_blank_columns(NARROW_DIGIT_GAP, false)?;
        draw_digit(fb, &self.narrow, hours % 10)?;
        fb.draw_32bit(self.narrow.colon(), false)?;
        draw_digit(fb, &self.narrow, state.minutes / 10)?;
        fb.draw_blank_columns(NARROW_DIGIT_GAP, false)?;
        draw_digit(fb, &self.narrow, state.minutes % 10)?;
        fb.draw_blank_columns(NARROW_TAIL, false)?;

        if twelve {
            let icon = if state.hours < 12 { ClockIcon::Am } else { ClockIcon::Pm };
            fb.set_position(16, CLOCK_ICON_COLUMN, 16)?;
            fb.draw_16bit(&icon.columns(), false)?;
        }
        if state.alarm_on() {
            fb.set_position(16, CLOCK_ICON_COLUMN, 0)?;
            fb.draw_16bit(&ClockIcon::Alarm.columns(), false)?;
        }
        Ok(())
    }

    /// "(hh:mm)" under the big clock, colon aligned with the time above.
    fn draw_alarm_time(
        &self,
        fb: &mut FrameBuffer,
        store: &GlyphStore,
        state: &ClockState<'_>,
        twelve: bool,
        offset: usize,
    ) -> Result<(), DisplayError> {
        let mut col = COL_OFFSET_ALARM + offset;
        let text = if twelve {
            let hours = make_12_hour(state.alarm_hours);
            if hours < 10 {
                col += 8;
            }
            format!("({}:{:02} ", hours, state.alarm_minutes)
        } else {
            format!("({:02}:{:02})", state.alarm_hours, state.alarm_minutes)
        };

        fb.set_position(16, col, ALARM_TEXT_ROW)?;
        for b in text.bytes() {
            fb.draw_16bit(store.glyph_16x8(b), false)?;
        }
        if twelve {
            let mut tail: ArrayVec<Glyph, { AMPM_LENGTH + 1 }> =
                self.labels.for_hour(state.alarm_hours).iter().copied().collect();
            tail.push(Glyph::Narrow(b')'));
            draw_label(fb, store, FontKind::Font16x8, &tail, col + text.len() * 8)?;
        }
        Ok(())
    }

    /// Status line clock at row 52. Remembers whether the last one was 12 hour.
    pub fn draw_small(
        &mut self,
        fb: &mut FrameBuffer,
        store: &GlyphStore,
        state: &SmallClockState,
    ) -> Result<(), DisplayError> {
        let twelve = state.flags.twelve_hour();
        let col = if twelve {
            state.position.checked_sub(SMALL_12HR_SHIFT).ok_or_else(|| {
                DisplayError::InvalidArgument(format!(
                    "small clock at column {} leaves no room for AM/PM", state.position
                ))
            })?
        } else {
            state.position
        };

        let text = if twelve {
            format!("{:2}:{:02}  ", make_12_hour(state.hours), state.minutes)
        } else {
            if self.drew_12_hour {
                // wipe what the wider 12 hour string left behind
                if let Some(stale) = state.position.checked_sub(SMALL_12HR_SHIFT) {
                    fb.set_position(SMALL_CLOCK_HEIGHT, stale, SMALL_CLOCK_ROW)?;
                    self.draw_small_chars(fb, store, b"  ")?;
                }
            }
            format!("{:02}:{:02}", state.hours, state.minutes)
        };
        self.drew_12_hour = twelve;

        fb.set_position(SMALL_CLOCK_HEIGHT, col, SMALL_CLOCK_ROW)?;
        let label = self.labels.for_hour(state.hours);
        if state.flags.blank() {
            let blanks = text.len() + if twelve { label.iter().map(|g| g.cells()).sum::<usize>() } else { 0 };
            return self.draw_small_chars(fb, store, " ".repeat(blanks).as_bytes());
        }
        self.draw_small_chars(fb, store, text.as_bytes())?;

        if twelve {
            let mut ampm_col = col + SMALL_AMPM_COLUMN;
            for (i, &glyph) in label.iter().enumerate() {
                match glyph {
                    Glyph::Wide(_) if i == 0 => {
                        fb.set_position(16, ampm_col, SMALL_CLOCK_ROW - 4)?;
                        ampm_col += draw_label(fb, store, FontKind::Font16x8, &[glyph], ampm_col)?;
                    }
                    // only one double-width glyph fits
                    Glyph::Wide(_) => {}
                    Glyph::Narrow(_) => {
                        fb.set_position(8, ampm_col, SMALL_CLOCK_ROW + 1)?;
                        ampm_col += draw_label(fb, store, FontKind::Font8x6, &[glyph], ampm_col)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// 16x8 glyphs cut down to 12 rows.
    fn draw_small_chars(&self, fb: &mut FrameBuffer, store: &GlyphStore, text: &[u8]) -> Result<(), DisplayError> {
        for &b in text {
            let columns = store.glyph_16x8(b).iter().map(|&c| u32::from(c >> SMALL_CLOCK_SHIFT));
            fb.draw_columns(columns, false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::fonts::DoubleWidthFont;
    use crate::display::hardware::HardwareProfile;
    use crate::display::mode::ModeTable;

    struct Rig {
        fb: FrameBuffer,
        store: GlyphStore,
        mode: DisplayModeProfile,
        icons: IconStrip,
        clock: ClockRenderer,
    }

    fn rig(mode: usize) -> Rig {
        let hw = HardwareProfile::by_name("tm13264cbcg").unwrap();
        let store = GlyphStore::new();
        let mut clock = ClockRenderer::new();
        clock.set_labels(AmPmLabels::new(&store, b"AM", b"PM"));
        Rig {
            fb: FrameBuffer::new(&hw),
            store,
            mode: ModeTable::standard().get(mode).unwrap().clone(),
            icons: IconStrip::default(),
            clock,
        }
    }

    impl Rig {
        fn draw(&mut self, layout: ClockLayout, state: &ClockState<'_>) {
            self.fb.clear();
            self.clock
                .draw(&mut self.fb, &self.store, &self.mode, layout, &self.icons, state)
                .unwrap();
        }

        fn region_blank(&self, x0: usize, x1: usize, y0: usize, y1: usize) -> bool {
            (x0..x1).all(|x| (y0..y1).all(|y| !self.fb.get_pixel(x, y)))
        }
    }

    #[test]
    fn test_make_12_hour() {
        assert_eq!(make_12_hour(0), 12);
        assert_eq!(make_12_hour(12), 12);
        assert_eq!(make_12_hour(13), 1);
        assert_eq!(make_12_hour(23), 11);
    }

    #[test]
    fn test_clock_flags() {
        assert!(ClockFlags::TWELVE_HOUR.twelve_hour());
        assert!(!ClockFlags::TWENTY_FOUR_HOUR.twelve_hour());
        assert!(ClockFlags(CLOCK_24HR | CLOCK_BLANK).blank());
        assert!(!ClockFlags(CLOCK_24HR | CLOCK_BLANK).twelve_hour());
    }

    #[test]
    fn test_twelve_hour_needs_both_labels() {
        let store = GlyphStore::new();
        let mut clock = ClockRenderer::new();
        clock.set_labels(AmPmLabels::new(&store, b"AM", b""));
        assert!(!clock.twelve_hour(ClockFlags::TWELVE_HOUR));
        clock.set_labels(AmPmLabels::new(&store, b"AM", b"PM"));
        assert!(clock.twelve_hour(ClockFlags::TWELVE_HOUR));
    }

    #[test]
    fn test_ampm_labels_are_capped() {
        let store = GlyphStore::new();
        let labels = AmPmLabels::new(&store, b"a.m.", b"PM");
        assert_eq!(labels.am.len(), AMPM_LENGTH);
        assert_eq!(labels.for_hour(13), &labels.pm[..]);
    }

    #[test]
    fn test_ampm_labels_count_double_width_cells() {
        let mut store = GlyphStore::new();
        store.install(DoubleWidthFont::chinese(vec![0xff; 0x600 * 32]).unwrap());
        let labels = AmPmLabels::new(&store, "上午".as_bytes(), "P午".as_bytes());
        assert_eq!(labels.am.as_slice(), &[Glyph::Wide('上')]);
        // a wide glyph after one narrow cell does not fit
        assert_eq!(labels.pm.len(), 1);
        assert!(matches!(labels.pm[0], Glyph::Narrow(_)));
        let cells: usize = labels.am.iter().map(|g| g.cells()).sum();
        assert_eq!(cells, AMPM_LENGTH);
    }

    #[test]
    fn test_big_clock_midnight_and_noon_read_twelve() {
        let mut r = rig(0);
        let midnight = ClockState { hours: 0, minutes: 0, ..Default::default() };
        r.draw(ClockLayout::BigAlarmText, &midnight);
        let a = r.fb.grab_region(0, 8, 112, 32).unwrap();
        let noon = ClockState { hours: 12, ..midnight };
        r.draw(ClockLayout::BigAlarmText, &noon);
        let b = r.fb.grab_region(0, 8, 112, 32).unwrap();
        assert_eq!(a, b);
        assert!(!r.region_blank(0, 26, 8, 40));
    }

    #[test]
    fn test_big_clock_drops_leading_hour_in_12_hour_format() {
        let mut r = rig(0);
        r.draw(ClockLayout::BigAlarmText, &ClockState { hours: 13, minutes: 5, ..Default::default() });
        assert!(r.region_blank(0, 26, 8, 40));
        assert!(!r.region_blank(26, 52, 8, 40));
        // minutes keep their leading zero
        assert!(!r.region_blank(62, 88, 8, 40));
        // PM label at 112
        assert!(!r.region_blank(112, 132, 8, 24));
    }

    #[test]
    fn test_big_clock_minutes_59_differs_from_5() {
        let mut r = rig(0);
        let flags = ClockFlags::TWENTY_FOUR_HOUR;
        r.draw(ClockLayout::BigAlarmText, &ClockState { hours: 10, minutes: 5, flags, ..Default::default() });
        let five = r.fb.grab_region(74, 8, 52, 32).unwrap();
        r.draw(ClockLayout::BigAlarmText, &ClockState { hours: 10, minutes: 59, flags, ..Default::default() });
        let fifty_nine = r.fb.grab_region(74, 8, 52, 32).unwrap();
        assert_ne!(five, fifty_nine);
        // 24 hour format starts at column 12
        assert!(r.region_blank(0, 12, 0, 64));
    }

    #[test]
    fn test_big_clock_out_of_range_digit_is_blank() {
        let mut r = rig(0);
        let flags = ClockFlags::TWENTY_FOUR_HOUR;
        r.draw(ClockLayout::BigAlarmText, &ClockState { hours: -5, minutes: 0, flags, ..Default::default() });
        // tens is 0, units is -5
        assert!(!r.region_blank(12, 38, 8, 40));
        assert!(r.region_blank(38, 64, 8, 40));
    }

    #[test]
    fn test_big_clock_blank_keeps_colon() {
        let mut r = rig(0);
        let flags = ClockFlags::TWENTY_FOUR_HOUR.with_blank();
        r.draw(ClockLayout::BigAlarmText, &ClockState { hours: 10, minutes: 10, flags, ..Default::default() });
        assert!(r.region_blank(12, 64, 0, 64));
        assert!(!r.region_blank(64, 74, 8, 40));
        assert!(r.region_blank(74, 132, 0, 64));
    }

    #[test]
    fn test_big_clock_alarm_text() {
        let mut r = rig(0);
        let flags = ClockFlags::TWENTY_FOUR_HOUR;
        let state = ClockState { hours: 7, minutes: 30, flags, alarm: 1, alarm_hours: 6, alarm_minutes: 45, ..Default::default() };
        r.draw(ClockLayout::BigAlarmText, &state);
        // "(06:45)" from column 38, 7 glyphs
        assert!(!r.region_blank(38, 94, 48, 64));
        assert!(r.region_blank(94, 132, 48, 64));
    }

    #[test]
    fn test_big_clock_alarm_icons() {
        let mut r = rig(7);
        r.icons.separator_armed = false;
        let state = ClockState { hours: 7, minutes: 30, alarm: crate::glyphs::BITMASK_ALARM, ..Default::default() };
        r.draw(ClockLayout::BigAlarmIcons, &state);
        assert!(!r.region_blank(2, 10, 56, 64));
    }

    #[test]
    fn test_zoomed_clock_date_line_and_disable() {
        let mut r = rig(1);
        let state = ClockState { hours: 9, minutes: 15, flags: ClockFlags::TWENTY_FOUR_HOUR, date: Some("Mon 1 Jan"), ..Default::default() };
        r.draw(ClockLayout::ZoomedDate, &state);
        assert!(!r.region_blank(0, 132, 8, 32));
        assert!(!r.region_blank(0, 132, 32, 48));

        r.clock.disable_date = true;
        r.draw(ClockLayout::ZoomedDate, &state);
        assert!(r.region_blank(0, 132, 40, 48));
    }

    #[test]
    fn test_zoomed_clock_ampm_survives_date_line() {
        let mut r = rig(3);
        let state = ClockState { hours: 15, minutes: 0, date: Some("x"), ..Default::default() };
        r.draw(ClockLayout::ZoomedAlarmText, &state);
        assert!(!r.region_blank(112, 132, 16, 24));
    }

    #[test]
    fn test_narrow_clock_icons() {
        let mut r = rig(2);
        let state = ClockState { hours: 14, minutes: 0, alarm: 1, ..Default::default() };
        r.draw(ClockLayout::NarrowIcons, &state);
        assert!(!r.region_blank(116, 131, 0, 16));
        assert!(!r.region_blank(116, 131, 16, 32));
        assert!(r.region_blank(0, 132, 32, 64));
        // 2 pm: tens blank
        assert!(r.region_blank(0, 23, 0, 32));
    }

    #[test]
    fn test_small_clock_erases_stale_12_hour_columns() {
        let mut r = rig(1);
        let twelve = SmallClockState { hours: 21, minutes: 5, flags: ClockFlags::TWELVE_HOUR, position: 88 };
        r.clock.draw_small(&mut r.fb, &r.store, &twelve).unwrap();
        assert!(!r.region_blank(72, 88, 52, 64));
        assert!(!r.region_blank(112, 124, 52, 64));

        let mut fb = r.fb.clone();
        let fresh = SmallClockState { flags: ClockFlags::TWENTY_FOUR_HOUR, ..twelve };
        r.clock.draw_small(&mut fb, &r.store, &fresh).unwrap();
        assert!((72..88).all(|x| (52..64).all(|y| !fb.get_pixel(x, y))));
        assert!((0..132).all(|x| (0..52).all(|y| !fb.get_pixel(x, y))));
    }

    #[test]
    fn test_small_clock_blank_and_bounds() {
        let mut r = rig(1);
        let state = SmallClockState { hours: 9, minutes: 5, flags: ClockFlags::TWENTY_FOUR_HOUR.with_blank(), position: 88 };
        r.clock.draw_small(&mut r.fb, &r.store, &state).unwrap();
        assert_eq!(r.fb.count_on_pixels(), 0);

        let state = SmallClockState { flags: ClockFlags::TWELVE_HOUR, position: 4, ..state };
        assert!(matches!(
            r.clock.draw_small(&mut r.fb, &r.store, &state),
            Err(DisplayError::InvalidArgument(_))
        ));
    }
}
