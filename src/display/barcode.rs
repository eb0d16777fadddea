/*
 *  display/barcode.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Code-39 barcode lines for hexadecimal ids
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

use crate::constants::MAX_BARCODE_LENGTH;
use crate::display::error::DisplayError;
use crate::display::framebuffer::FrameBuffer;
use crate::display::mode::DisplayModeProfile;
use crate::display::text::valid_prefix;
use crate::glyphs::{CODE39, CODE39_START_STOP};

/// Columns per encoded digit, gap included.
pub const BARCODE_CHAR_COLUMNS: usize = 16;
/// Start code, its gap and the stop code.
pub const BARCODE_FRAME_COLUMNS: usize = 31;

const NARROW_BAR: usize = 1;
const WIDE_BAR: usize = 3;

/// Code-39 patterns for the displayable digits of a hex string.
///
/// Only the last six characters are shown; anything before them must be '0'.
pub fn encode_barcode(text: &str) -> Result<ArrayVec<u16, MAX_BARCODE_LENGTH>, DisplayError> {
    let len = text.chars().count();
    let hidden = len.saturating_sub(MAX_BARCODE_LENGTH);
    let mut codes = ArrayVec::new();
    for (i, c) in text.chars().enumerate() {
        if i < hidden {
            if c != '0' {
                return Err(DisplayError::BarcodeTooLong { len: len - i, max: MAX_BARCODE_LENGTH });
            }
            continue;
        }
        let digit = c.to_digit(16).ok_or(DisplayError::BarcodeInvalidDigit(c))?;
        codes.push(CODE39[digit as usize]);
    }
    Ok(codes)
}

/// Bar widths of a 9 bit pattern, black first.
pub fn bar_widths(pattern: u16) -> impl Iterator<Item = usize> {
    (0..9).rev().map(move |bit| if pattern & (1 << bit) != 0 { WIDE_BAR } else { NARROW_BAR })
}

fn draw_pattern(fb: &mut FrameBuffer, pattern: u16) -> Result<(), DisplayError> {
    let mut black = true;
    for width in bar_widths(pattern) {
        fb.draw_blank_columns(width, black)?;
        black = !black;
    }
    Ok(())
}

/// Draws text row `row` as a centred barcode. Nothing is drawn on error.
pub fn draw_barcode(
    fb: &mut FrameBuffer,
    mode: &DisplayModeProfile,
    row: usize,
    text: &[u8],
) -> Result<(), DisplayError> {
    let codes = encode_barcode(valid_prefix(text))?;
    let needed = codes.len() * BARCODE_CHAR_COLUMNS + BARCODE_FRAME_COLUMNS;
    let width = fb.visible_width();
    let Some(blank) = width.checked_sub(needed) else {
        return Err(DisplayError::BarcodeTooLong {
            len: codes.len(),
            max: width.saturating_sub(BARCODE_FRAME_COLUMNS) / BARCODE_CHAR_COLUMNS,
        });
    };

    let height = mode.font.height();
    let y = row * height + mode.top_row_offset;
    debug!("barcode row {} at y {}: {} digits, {} blank columns", row, y, codes.len(), blank);
    fb.set_position(height, 0, y)?;

    fb.draw_blank_columns(blank / 2, false)?;
    draw_pattern(fb, CODE39_START_STOP)?;
    fb.draw_blank_columns(1, false)?;
    for &code in &codes {
        draw_pattern(fb, code)?;
        fb.draw_blank_columns(1, false)?;
    }
    draw_pattern(fb, CODE39_START_STOP)?;
    fb.draw_blank_columns(blank - blank / 2, false)
}
