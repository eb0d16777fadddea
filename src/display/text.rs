/*
 *  display/text.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text layout: UTF-8 decoding, centring, cursor inversion and arrows
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

use crate::constants::MAX_SCREEN_WIDTH;
use crate::display::error::DisplayError;
use crate::display::fonts::{small_arrow, zoom_column, Glyph, GlyphStore, WIDE_GLYPH_WIDTH};
use crate::display::framebuffer::FrameBuffer;
use crate::display::mode::{ArrowKind, DisplayModeProfile, FontKind};
use crate::glyphs::{ARROW_WIDTH, LEFT_ARROW, RIGHT_ARROW};

/// Width of the arrows cut from the 8x6 font.
pub const SMALL_ARROW_WIDTH: usize = 5;

/// Which edge arrows a line asks for, by wire code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrowFlags {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl ArrowFlags {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            10 => Some(ArrowFlags::None),
            11 => Some(ArrowFlags::Left),
            12 => Some(ArrowFlags::Right),
            13 => Some(ArrowFlags::Both),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ArrowFlags::None => 10,
            ArrowFlags::Left => 11,
            ArrowFlags::Right => 12,
            ArrowFlags::Both => 13,
        }
    }

    fn left(self) -> bool {
        matches!(self, ArrowFlags::Left | ArrowFlags::Both)
    }

    fn right(self) -> bool {
        matches!(self, ArrowFlags::Right | ArrowFlags::Both)
    }
}

/// Characters from `column` to `column + width` are shown inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSpan {
    pub column: usize,
    pub width: usize,
}

impl CursorSpan {
    fn covers(self, i: usize) -> bool {
        i >= self.column && i < self.column + self.width
    }
}

/// One line of a screen update.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLine<'a> {
    pub text: &'a [u8],
    pub cursor: Option<CursorSpan>,
    pub inverted: bool,
    pub arrows: ArrowFlags,
}

impl<'a> TextLine<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self { text: text.as_bytes(), ..Default::default() }
    }
}

/// Glyphs of one line and the character cells they cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedLine {
    pub glyphs: ArrayVec<Glyph, MAX_SCREEN_WIDTH>,
    pub cells: usize,
}

/// Horizontal split of a line, in pixel columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    pub arrow: usize,
    pub left_pad: usize,
    pub right_pad: usize,
}

/// The valid UTF-8 prefix of `text`.
pub fn valid_prefix(text: &[u8]) -> &str {
    match std::str::from_utf8(text) {
        Ok(s) => s,
        Err(e) => {
            warn!("malformed UTF-8 after byte {}, truncating", e.valid_up_to());
            std::str::from_utf8(&text[..e.valid_up_to()]).unwrap_or_default()
        }
    }
}

/// Strict form for callers that want malformed input reported.
pub fn decode_strict(text: &[u8]) -> Result<&str, DisplayError> {
    std::str::from_utf8(text).map_err(|e| DisplayError::InvalidUtf8 { valid_up_to: e.valid_up_to() })
}

/// Decode until `max_cells` character cells are used.
///
/// A double-width glyph that would straddle the last cell ends the line.
pub fn decode_line(store: &GlyphStore, text: &[u8], max_cells: usize) -> DecodedLine {
    let mut line = DecodedLine::default();
    for c in valid_prefix(text).chars() {
        let glyph = store.lookup(c);
        if line.cells + glyph.cells() > max_cells || line.glyphs.is_full() {
            break;
        }
        line.cells += glyph.cells();
        line.glyphs.push(glyph);
    }
    line
}

/// Columns reserved for each edge arrow in `mode`.
pub fn arrow_width(mode: &DisplayModeProfile, visible_width: usize) -> usize {
    match mode.arrow_kind {
        ArrowKind::None => 0,
        ArrowKind::Small => SMALL_ARROW_WIDTH,
        ArrowKind::Tall => {
            let spare = visible_width.saturating_sub(mode.char_cols * mode.font.width());
            (spare / 2).min(ARROW_WIDTH)
        }
    }
}

/// Padding either side of `cells` characters, the odd column going right.
pub fn line_layout(mode: &DisplayModeProfile, visible_width: usize, cells: usize) -> LineLayout {
    let arrow = arrow_width(mode, visible_width);
    let blank = visible_width.saturating_sub(cells * mode.font.width() + 2 * arrow);
    LineLayout { arrow, left_pad: blank / 2, right_pad: blank - blank / 2 }
}

/// Draws one glyph at the cursor in `font`.
///
/// The 8 and 11 pixel fonts cannot show double-width glyphs; those become
/// two blank cells rather than being dropped, so later glyphs keep their column.
pub fn draw_glyph(
    fb: &mut FrameBuffer,
    store: &GlyphStore,
    font: FontKind,
    glyph: Glyph,
    invert: bool,
) -> Result<(), DisplayError> {
    match (font, glyph) {
        (FontKind::Font16x8, Glyph::Narrow(code)) => fb.draw_16bit(store.glyph_16x8(code), invert),
        (FontKind::Font16x8, Glyph::Wide(c)) => fb.draw_16bit(&store.wide_glyph(c), invert),
        (FontKind::Font32x16, Glyph::Narrow(code)) => draw_zoomed(fb, store.glyph_16x8(code), invert),
        (FontKind::Font32x16, Glyph::Wide(c)) => draw_zoomed(fb, &store.wide_glyph(c), invert),
        (FontKind::Font8x6, Glyph::Narrow(code)) => fb.draw_8bit(store.glyph_8x6(code), invert),
        (FontKind::Font11x8, Glyph::Narrow(code)) => fb.draw_16bit(store.glyph_11x8(code), invert),
        (FontKind::Font8x6 | FontKind::Font11x8, Glyph::Wide(c)) => {
            // keep the cell so the rest of the line stays put
            warn!("{:?} cannot show double-width {:?}, left blank", font, c);
            fb.draw_blank_columns(2 * font.width(), invert)
        }
    }
}

fn draw_zoomed(fb: &mut FrameBuffer, columns: &[u16], invert: bool) -> Result<(), DisplayError> {
    for &col in columns {
        let wide = zoom_column(col);
        fb.draw_32bit(&[wide, wide], invert)?;
    }
    Ok(())
}

fn draw_arrow(
    fb: &mut FrameBuffer,
    store: &GlyphStore,
    mode: &DisplayModeProfile,
    width: usize,
    right: bool,
) -> Result<(), DisplayError> {
    match mode.arrow_kind {
        ArrowKind::None => Ok(()),
        ArrowKind::Small => fb.draw_8bit(small_arrow(store, right), false),
        ArrowKind::Tall if right => fb.draw_16bit(&RIGHT_ARROW[ARROW_WIDTH - width..], false),
        ArrowKind::Tall => fb.draw_16bit(&LEFT_ARROW[..width], false),
    }
}

/// Draws text row `row` of `mode`, centred, padded to the full width.
pub fn draw_line(
    fb: &mut FrameBuffer,
    store: &GlyphStore,
    mode: &DisplayModeProfile,
    row: usize,
    line: &TextLine<'_>,
) -> Result<(), DisplayError> {
    let decoded = decode_line(store, line.text, mode.char_cols);
    let layout = line_layout(mode, fb.visible_width(), decoded.cells);

    let mut height = mode.font.height();
    let mut y = row * height + mode.top_row_offset;
    if y != 0 && mode.inverse_bleed {
        y -= 1;
        height += 1;
    }
    debug!(
        "line {} at y {}: {} glyphs, pad {}+{}, arrows {}",
        row, y, decoded.glyphs.len(), layout.left_pad, layout.right_pad, layout.arrow
    );
    fb.set_position(height, 0, y)?;

    if line.arrows.left() && !line.inverted {
        draw_arrow(fb, store, mode, layout.arrow, false)?;
    } else {
        fb.draw_blank_columns(layout.arrow, line.inverted)?;
    }
    fb.draw_blank_columns(layout.left_pad, line.inverted)?;

    for (i, &glyph) in decoded.glyphs.iter().enumerate() {
        let in_cursor = line.cursor.is_some_and(|c| c.covers(i));
        draw_glyph(fb, store, mode.font, glyph, line.inverted ^ in_cursor)?;
    }

    fb.draw_blank_columns(layout.right_pad, line.inverted)?;
    if line.arrows.right() && !line.inverted {
        draw_arrow(fb, store, mode, layout.arrow, true)
    } else {
        fb.draw_blank_columns(layout.arrow, line.inverted)
    }
}

/// Columns a decoded glyph takes in `font`.
pub fn glyph_columns(font: FontKind, glyph: Glyph) -> usize {
    match glyph {
        Glyph::Narrow(_) => font.width(),
        Glyph::Wide(_) if font == FontKind::Font32x16 => 2 * WIDE_GLYPH_WIDTH,
        Glyph::Wide(_) if font == FontKind::Font16x8 => WIDE_GLYPH_WIDTH,
        Glyph::Wide(_) => 2 * font.width(),
    }
}
