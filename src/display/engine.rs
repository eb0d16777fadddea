/*
 *  display/engine.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Engine context: the one owner of framebuffer, mode and drawing state
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

use log::{debug, info, warn};

use crate::constants::{DEFAULT_ICON_SPACING, DEFAULT_MAX_ICONS, MAX_GREYSCALE_LEVEL};
use crate::display::barcode::draw_barcode;
use crate::display::clock::{AmPmLabels, ClockRenderer, ClockState, SmallClockState};
use crate::display::error::DisplayError;
use crate::display::fonts::{DoubleWidthFont, FontId, GlyphStore, Language};
use crate::display::framebuffer::{Bitmap, FrameBuffer};
use crate::display::hardware::HardwareProfile;
use crate::display::icons::{draw_signal_strength, IconStrip};
use crate::display::mode::{ArrowKind, ClockLayout, DisplayModeProfile, IconKind, ModeOverride, ModeTable};
use crate::display::text::{draw_line, ArrowFlags, CursorSpan, TextLine};
use crate::display::traits::DisplayCapabilities;

/// Highest contrast register value.
pub const MAX_CONTRAST_REGISTER: u8 = 0x3f;

/// What a screen line holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineKind {
    #[default]
    Text,
    Barcode,
    InvertedText,
}

impl LineKind {
    /// Wire codes: text 0, barcode 1, inverted text 2.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(LineKind::Text),
            1 => Some(LineKind::Barcode),
            2 => Some(LineKind::InvertedText),
            _ => None,
        }
    }
}

/// One row of a `draw_screen` request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenLine<'a> {
    pub text: &'a [u8],
    pub kind: LineKind,
    pub arrows: ArrowFlags,
}

impl<'a> ScreenLine<'a> {
    pub fn text(text: &'a str) -> Self {
        Self { text: text.as_bytes(), ..Default::default() }
    }

    pub fn with_kind(mut self, kind: LineKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_arrows(mut self, arrows: ArrowFlags) -> Self {
        self.arrows = arrows;
        self
    }
}

/// Text cursor of a screen update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCursor {
    pub x: usize,
    pub y: usize,
    pub width: usize,
}

/// Startup choices that are not part of the hardware profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub mode: usize,
    pub mode_override: ModeOverride,
    /// Replaces the clock layout of modes that have one
    pub clock_style: Option<ClockLayout>,
    pub clock_disable_date: bool,
    pub icon_spacing: usize,
    pub max_icons: usize,
    /// 0 keeps any non-zero backlight visibly lit on greyscale panels
    pub greyscale_config: u8,
    pub rewrite_contrast: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mode: 0,
            mode_override: ModeOverride::default(),
            clock_style: None,
            clock_disable_date: false,
            icon_spacing: DEFAULT_ICON_SPACING,
            max_icons: DEFAULT_MAX_ICONS,
            greyscale_config: 0,
            rewrite_contrast: false,
        }
    }
}

/// Everything the drawing calls share. Callers serialise access.
#[derive(Debug)]
pub struct EngineContext {
    hardware: HardwareProfile,
    modes: ModeTable,
    mode: DisplayModeProfile,
    zoomed: bool,
    fb: FrameBuffer,
    store: GlyphStore,
    icons: IconStrip,
    clock: ClockRenderer,
    clock_style: Option<ClockLayout>,
    greyscale_config: u8,
    greyscale_level: u8,
    contrast_level: Option<u8>,
    contrast_pending: bool,
    rewrite_contrast: bool,
}

impl EngineContext {
    pub fn init(hardware: HardwareProfile, settings: &EngineSettings) -> Result<Self, DisplayError> {
        hardware.validate()?;

        let mut modes = ModeTable::standard();
        let mode = modes.selectable(settings.mode)?.clone().with_overrides(&settings.mode_override);
        mode.validate_for(&hardware)?;
        modes.set(mode.clone())?;

        let mut icons = IconStrip { spacing: settings.icon_spacing, ..Default::default() };
        icons.set_slots(settings.max_icons)?;

        let store = GlyphStore::new();
        let mut clock = ClockRenderer::new();
        clock.disable_date = settings.clock_disable_date;
        clock.set_labels(AmPmLabels::new(&store, b"AM", b"PM"));

        info!(
            "monolcd init: {} {}x{} offset ({},{}), mode {}",
            hardware.name, hardware.width_px, hardware.height_px,
            hardware.x_offset, hardware.y_offset, settings.mode
        );

        Ok(Self {
            fb: FrameBuffer::new(&hardware),
            hardware,
            modes,
            mode,
            zoomed: false,
            store,
            icons,
            clock,
            clock_style: settings.clock_style,
            greyscale_config: settings.greyscale_config,
            greyscale_level: MAX_GREYSCALE_LEVEL,
            contrast_level: None,
            contrast_pending: false,
            rewrite_contrast: settings.rewrite_contrast,
        })
    }

    pub fn hardware(&self) -> &HardwareProfile {
        &self.hardware
    }

    pub fn mode(&self) -> &DisplayModeProfile {
        &self.mode
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn glyphs(&self) -> &GlyphStore {
        &self.store
    }

    /// Switches mode and clears the screen. Zoom is dropped.
    ///
    /// Zoomed forms are only reachable through `set_zoom`.
    pub fn select_mode(&mut self, id: usize) -> Result<(), DisplayError> {
        let mode = self.modes.selectable(id)?;
        mode.validate_for(&self.hardware)?;
        info!("display mode {} -> {}", self.mode.id, id);
        self.mode = mode.clone();
        self.zoomed = false;
        self.fb.clear();
        Ok(())
    }

    /// Swaps to or from the zoomed form, returning the new (rows, cols).
    pub fn set_zoom(&mut self, on: bool) -> Result<(usize, usize), DisplayError> {
        if on != self.zoomed {
            if let Some(target) = self.mode.zoom_target {
                info!("zoom {}: mode {} -> {}", if on { "on" } else { "off" }, self.mode.id, target);
                self.mode = self.modes.get(target)?.clone();
                self.zoomed = self.modes.is_zoom_form(target);
                self.fb.clear();
            } else {
                debug!("mode {} has no zoom", self.mode.id);
            }
        }
        Ok((self.mode.char_rows, self.mode.char_cols))
    }

    pub fn clear_screen(&mut self) {
        self.fb.clear();
    }

    /// Draws every text row of the mode; the first failure is returned.
    ///
    /// Rows beyond `lines` are blanked, lines beyond the mode are ignored.
    pub fn draw_screen(&mut self, lines: &[ScreenLine<'_>], cursor: Option<ScreenCursor>) -> Result<(), DisplayError> {
        self.icons.separator_armed = true;
        let mode = &self.mode;
        if lines.len() > mode.char_rows {
            debug!("{} lines for a {} row mode", lines.len(), mode.char_rows);
        }

        let mut first_error = None;
        for row in 0..mode.char_rows {
            let line = lines.get(row).copied().unwrap_or_default();
            let result = match line.kind {
                LineKind::Barcode => draw_barcode(&mut self.fb, mode, row, line.text),
                LineKind::Text | LineKind::InvertedText => {
                    let span = cursor
                        .filter(|c| c.y == row)
                        .map(|c| CursorSpan { column: c.x, width: c.width });
                    let text = TextLine {
                        text: line.text,
                        cursor: span,
                        inverted: line.kind == LineKind::InvertedText,
                        arrows: line.arrows,
                    };
                    draw_line(&mut self.fb, &self.store, mode, row, &text)
                }
            };
            if let Err(e) = result {
                warn!("line {} not drawn: {}", row, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn draw_clock(&mut self, state: &ClockState<'_>) -> Result<(), DisplayError> {
        let layout = self
            .mode
            .clock
            .map(|own| self.clock_style.unwrap_or(own))
            .ok_or(DisplayError::UnsupportedClockLayout)?;
        self.clock.draw(&mut self.fb, &self.store, &self.mode, layout, &self.icons, state)
    }

    pub fn draw_small_clock(&mut self, state: &SmallClockState) -> Result<(), DisplayError> {
        if !self.mode.small_clock {
            return Err(DisplayError::NotSupported("small clock"));
        }
        self.clock.draw_small(&mut self.fb, &self.store, state)
    }

    pub fn draw_icons(&mut self, bitmask: u32) -> Result<(), DisplayError> {
        self.icons.draw(&mut self.fb, &self.mode, bitmask)
    }

    pub fn draw_signal_strength(&mut self, level: i32) -> Result<(), DisplayError> {
        draw_signal_strength(&mut self.fb, &self.mode, level)
    }

    pub fn set_icon_slots(&mut self, slots: usize) -> Result<(), DisplayError> {
        self.icons.set_slots(slots)
    }

    /// Labels keep at most two glyphs each.
    pub fn set_ampm_labels(&mut self, am: &[u8], pm: &[u8]) {
        let labels = AmPmLabels::new(&self.store, am, pm);
        debug!("am/pm labels {:?} / {:?}", labels.am, labels.pm);
        self.clock.set_labels(labels);
    }

    /// Queues a contrast change for the next flush. Levels run 0..=100.
    pub fn set_contrast(&mut self, level: i32) -> Result<(), DisplayError> {
        if !self.hardware.has_contrast {
            return Err(DisplayError::NotSupported("contrast"));
        }
        if level < 0 {
            return Err(DisplayError::InvalidArgument(format!("contrast {}", level)));
        }
        if level > 100 {
            warn!("contrast {} clamped to 100", level);
        }
        let level = level.min(100) as u8;
        if self.contrast_level != Some(level) {
            debug!("contrast level {} register {:#04x}", level, contrast_register(level));
        }
        self.contrast_level = Some(level);
        self.contrast_pending = true;
        Ok(())
    }

    pub fn contrast_level(&self) -> Option<u8> {
        self.contrast_level
    }

    /// Register value to send, if one is due.
    pub fn take_contrast(&mut self) -> Option<u8> {
        let due = self.contrast_pending || self.rewrite_contrast;
        self.contrast_pending = false;
        self.contrast_level.filter(|_| due).map(contrast_register)
    }

    /// Greyscale brightness of lit pixels, from a 0..=100 backlight level.
    pub fn set_greyscale_backlight(&mut self, level: i32) {
        let level = level.clamp(0, 100) as u32;
        let mut grey = (level * u32::from(MAX_GREYSCALE_LEVEL) / 100) as u8;
        if self.greyscale_config == 0 && level > 0 && grey == 0 {
            grey = 1;
        }
        debug!("greyscale backlight {} -> {}", level, grey);
        self.greyscale_level = grey;
    }

    pub fn greyscale_level(&self) -> u8 {
        self.greyscale_level
    }

    pub fn grab_screen_region(&self, left: usize, top: usize, width: usize, height: usize) -> Result<Bitmap, DisplayError> {
        self.fb.grab_region(left, top, width, height)
    }

    /// Replays a grabbed bitmap. Icon draws stop adding the separator.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap) -> Result<(), DisplayError> {
        self.icons.separator_armed = false;
        self.fb.draw_bitmap(bitmap)
    }

    pub fn load_font(&mut self, font: DoubleWidthFont) {
        info!("loaded {:?} double-width font", font.id());
        self.store.install(font);
    }

    pub fn unload_font(&mut self, id: FontId) {
        self.store.unload(id);
    }

    pub fn set_language(&mut self, language: Language) {
        self.store.set_language(language);
    }

    pub fn capabilities(&self) -> DisplayCapabilities {
        let mode = &self.mode;
        DisplayCapabilities {
            width: self.hardware.width_px - self.hardware.x_offset,
            height: self.hardware.height_px,
            char_rows: mode.char_rows,
            char_cols: mode.char_cols,
            inverted_text: true,
            arrows: mode.arrow_kind != ArrowKind::None,
            graphics: true,
            zoom: mode.zoom_target.is_some(),
            clock: mode.clock.is_some(),
            small_clock: mode.small_clock,
            icons: mode.icon_kind != IconKind::None,
            greyscale: self.hardware.greyscale,
            contrast: self.hardware.has_contrast,
        }
    }
}

/// 0..=100 onto the 6 bit register.
pub fn contrast_register(level: u8) -> u8 {
    (u32::from(level.min(100)) * u32::from(MAX_CONTRAST_REGISTER) / 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::clock::ClockFlags;
    use crate::display::fonts::Glyph;
    use crate::glyphs::BITMASK_MUTE;

    fn engine(name: &str, mode: usize) -> EngineContext {
        let hw = HardwareProfile::by_name(name).unwrap();
        EngineContext::init(hw, &EngineSettings { mode, ..Default::default() }).unwrap()
    }

    #[test]
    fn test_engine_init_rejects_bad_mode() {
        let hw = HardwareProfile::by_name("tm13264cbcg").unwrap();
        let err = EngineContext::init(hw.clone(), &EngineSettings { mode: 42, ..Default::default() });
        assert!(matches!(err, Err(DisplayError::UnknownDisplayMode(42))));
        // mode 0 wants a 64 row panel
        let amax = HardwareProfile::by_name("amax_kdc162a28").unwrap();
        assert!(matches!(
            EngineContext::init(amax, &EngineSettings::default()),
            Err(DisplayError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_engine_mode_override_applies() {
        let hw = HardwareProfile::by_name("tm13264cbcg").unwrap();
        let settings = EngineSettings {
            mode: 1,
            mode_override: ModeOverride { char_cols: Some(12), ..Default::default() },
            ..Default::default()
        };
        let e = EngineContext::init(hw, &settings).unwrap();
        assert_eq!(e.capabilities().char_cols, 12);
    }

    #[test]
    fn test_engine_select_mode_clears() {
        let mut e = engine("tm13264cbcg", 1);
        e.draw_screen(&[ScreenLine::text("hello")], None).unwrap();
        assert!(e.framebuffer().count_on_pixels() > 0);
        e.select_mode(2).unwrap();
        assert_eq!(e.framebuffer().count_on_pixels(), 0);
        assert_eq!(e.capabilities().char_rows, 4);
        assert!(matches!(e.select_mode(99), Err(DisplayError::UnknownDisplayMode(99))));
        assert_eq!(e.mode().id, 2);
    }

    #[test]
    fn test_engine_zoom_swaps_only_on_change() {
        let mut e = engine("tm13264cbcg", 0);
        assert_eq!(e.set_zoom(true).unwrap(), (2, 8));
        assert!(e.is_zoomed());
        // asking again keeps the zoomed mode
        assert_eq!(e.set_zoom(true).unwrap(), (2, 8));
        assert_eq!(e.set_zoom(false).unwrap(), (2, 15));
        assert_eq!(e.mode().id, 0);

        let mut plain = engine("tm13264cbcg", 1);
        assert_eq!(plain.set_zoom(true).unwrap(), (3, 15));
        assert!(!plain.is_zoomed());
    }

    #[test]
    fn test_engine_zoom_forms_only_through_zoom() {
        let mut e = engine("tm13264cbcg", 0);
        assert!(matches!(e.select_mode(9), Err(DisplayError::UnknownDisplayMode(9))));
        assert_eq!(e.mode().id, 0);
        assert!(!e.is_zoomed());

        // the flag follows the geometry
        assert_eq!(e.set_zoom(true).unwrap(), (2, 8));
        assert_eq!((e.mode().id, e.is_zoomed()), (9, true));
        assert_eq!(e.set_zoom(false).unwrap(), (2, 15));
        assert_eq!((e.mode().id, e.is_zoomed()), (0, false));

        let hw = HardwareProfile::by_name("ssd0323").unwrap();
        let err = EngineContext::init(hw, &EngineSettings { mode: 10, ..Default::default() });
        assert!(matches!(err, Err(DisplayError::UnknownDisplayMode(10))));
    }

    #[test]
    fn test_engine_draw_screen_blanks_missing_rows() {
        let mut e = engine("tm13264cbcg", 2);
        e.draw_screen(&[ScreenLine::text("x").with_kind(LineKind::InvertedText)], None).unwrap();
        // inverted first row is solid at its edges, rows below are empty
        assert!(e.framebuffer().get_pixel(0, 5));
        assert!((16..64).all(|y| (0..132).all(|x| !e.framebuffer().get_pixel(x, y))));
    }

    #[test]
    fn test_engine_draw_screen_returns_first_error_and_draws_the_rest() {
        let mut e = engine("tm13264cbcg", 1);
        let lines = [
            ScreenLine::text("12G").with_kind(LineKind::Barcode),
            ScreenLine::text("1234567").with_kind(LineKind::Barcode),
            ScreenLine::text("still drawn"),
        ];
        let err = e.draw_screen(&lines, None);
        assert!(matches!(err, Err(DisplayError::BarcodeInvalidDigit('G'))));
        assert!((0..32).all(|y| (0..132).all(|x| !e.framebuffer().get_pixel(x, y))));
        assert!((32..48).any(|y| (0..132).any(|x| e.framebuffer().get_pixel(x, y))));
    }

    #[test]
    fn test_engine_cursor_inverts_its_row_only() {
        let mut e = engine("tm13264cbcg", 1);
        let lines = [ScreenLine::text("abc"), ScreenLine::text("abc")];
        e.draw_screen(&lines, None).unwrap();
        let plain = e.framebuffer().count_on_pixels();
        e.draw_screen(&lines, Some(ScreenCursor { x: 0, y: 1, width: 1 })).unwrap();
        assert!(e.framebuffer().count_on_pixels() > plain);
        let top = e.grab_screen_region(0, 0, 132, 16).unwrap();
        e.draw_screen(&lines, None).unwrap();
        assert_eq!(top, e.grab_screen_region(0, 0, 132, 16).unwrap());
    }

    #[test]
    fn test_engine_separator_armed_by_screen_disarmed_by_bitmap() {
        let mut e = engine("tm13264cbcg", 1);
        e.draw_icons(BITMASK_MUTE).unwrap();
        assert!(!e.framebuffer().get_pixel(0, 51));

        e.draw_screen(&[], None).unwrap();
        e.draw_icons(BITMASK_MUTE).unwrap();
        assert!(e.framebuffer().get_pixel(0, 51));

        let grab = e.grab_screen_region(0, 0, 16, 8).unwrap();
        e.clear_screen();
        e.draw_bitmap(&grab).unwrap();
        e.draw_icons(BITMASK_MUTE).unwrap();
        assert!(!e.framebuffer().get_pixel(0, 51));
    }

    #[test]
    fn test_engine_clock_support_by_mode() {
        let mut e = engine("amax_kdc162a28", 4);
        let state = ClockState { hours: 10, minutes: 30, ..Default::default() };
        assert!(matches!(e.draw_clock(&state), Err(DisplayError::UnsupportedClockLayout)));
        let small = SmallClockState { hours: 10, minutes: 30, flags: ClockFlags::TWENTY_FOUR_HOUR, position: 40 };
        assert!(matches!(e.draw_small_clock(&small), Err(DisplayError::NotSupported(_))));

        let mut e = engine("tm13264cbcg", 1);
        e.draw_clock(&state).unwrap();
        assert!(e.framebuffer().count_on_pixels() > 0);
    }

    #[test]
    fn test_engine_clock_style_override() {
        let hw = HardwareProfile::by_name("tm13264cbcg").unwrap();
        let settings = EngineSettings { mode: 1, clock_style: Some(ClockLayout::NarrowIcons), ..Default::default() };
        let mut e = EngineContext::init(hw, &settings).unwrap();
        let state = ClockState { hours: 23, minutes: 59, flags: ClockFlags::TWENTY_FOUR_HOUR, ..Default::default() };
        e.draw_clock(&state).unwrap();
        // narrow layout leaves the lower half alone
        assert!((32..64).all(|y| (0..132).all(|x| !e.framebuffer().get_pixel(x, y))));
    }

    #[test]
    fn test_engine_contrast() {
        let mut e = engine("tm13264cbcg", 1);
        assert_eq!(e.take_contrast(), None);
        e.set_contrast(150).unwrap();
        assert_eq!(e.contrast_level(), Some(100));
        assert_eq!(e.take_contrast(), Some(0x3f));
        assert_eq!(e.take_contrast(), None);
        e.set_contrast(50).unwrap();
        assert_eq!(e.take_contrast(), Some(31));
        assert!(matches!(e.set_contrast(-1), Err(DisplayError::InvalidArgument(_))));

        let mut oled = engine("ssd0323", 5);
        assert!(matches!(oled.set_contrast(50), Err(DisplayError::NotSupported(_))));
    }

    #[test]
    fn test_engine_rewrite_contrast_resends() {
        let hw = HardwareProfile::by_name("tm13264cbcg").unwrap();
        let settings = EngineSettings { mode: 1, rewrite_contrast: true, ..Default::default() };
        let mut e = EngineContext::init(hw, &settings).unwrap();
        e.set_contrast(100).unwrap();
        assert_eq!(e.take_contrast(), Some(0x3f));
        assert_eq!(e.take_contrast(), Some(0x3f));
    }

    #[test]
    fn test_engine_greyscale_backlight() {
        let mut e = engine("ssd0323", 5);
        assert_eq!(e.greyscale_level(), 15);
        e.set_greyscale_backlight(3);
        assert_eq!(e.greyscale_level(), 1);
        e.set_greyscale_backlight(0);
        assert_eq!(e.greyscale_level(), 0);
        e.set_greyscale_backlight(500);
        assert_eq!(e.greyscale_level(), 15);

        let hw = HardwareProfile::by_name("ssd0323").unwrap();
        let settings = EngineSettings { mode: 5, greyscale_config: 1, ..Default::default() };
        let mut e = EngineContext::init(hw, &settings).unwrap();
        e.set_greyscale_backlight(3);
        assert_eq!(e.greyscale_level(), 0);
    }

    #[test]
    fn test_engine_capabilities() {
        let e = engine("tm13264cbcg", 0);
        let caps = e.capabilities();
        assert!(caps.zoom && caps.clock && caps.small_clock && caps.icons && caps.arrows);
        assert!(!caps.greyscale);

        let e = engine("config983", 8);
        let caps = e.capabilities();
        assert!(!caps.arrows && !caps.clock && !caps.icons);
        assert_eq!((caps.width, caps.height), (132, 32));
    }

    #[test]
    fn test_engine_fonts_slots_and_labels() {
        let mut e = engine("tm13264cbcg", 0);
        e.load_font(DoubleWidthFont::chinese(vec![0xff; 32]).unwrap());
        assert!(matches!(e.store.lookup('一'), Glyph::Wide('一')));
        e.unload_font(FontId::Chinese);
        assert!(matches!(e.store.lookup('一'), Glyph::Narrow(_)));

        assert!(e.set_icon_slots(7).is_ok());
        assert!(matches!(e.set_icon_slots(8), Err(DisplayError::InvalidArgument(_))));

        e.set_ampm_labels(b"AM", b"PMX");
        let labels = e.clock.labels();
        assert!(labels.is_complete());
        assert_eq!((labels.am.len(), labels.pm.len()), (2, 2));
    }

    #[test]
    fn test_line_kind_codes() {
        assert_eq!(LineKind::from_code(2), Some(LineKind::InvertedText));
        assert_eq!(LineKind::from_code(3), None);
    }
}
