/*
 *  clock_font.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Big seven segment clock digits and the 16x15 clock icons
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

use embedded_graphics::mono_font::{iso_8859_1::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::constants::{
    CLOCK_COLON_WIDTH, CLOCK_COLON_WIDTH_NARROW, CLOCK_DIGIT_WIDTH,
    CLOCK_DIGIT_WIDTH_NARROW, CLOCK_ICON_WIDTH,
};
use crate::glyphs::{icon_16x16, ICON_ALARM};
use crate::vframebuf::VarFrameBuf;

/// Height of every big clock glyph.
pub const CLOCK_FONT_HEIGHT: u32 = 32;

// segment bits: a b c d e f g
const SEGMENTS: [u8; 10] = [
    0b111_1110, // 0
    0b011_0000, // 1
    0b110_1101, // 2
    0b111_1001, // 3
    0b011_0011, // 4
    0b101_1011, // 5
    0b101_1111, // 6
    0b111_0000, // 7
    0b111_1111, // 8
    0b111_1011, // 9
];
const SEGMENT_THICKNESS: i32 = 4;

/// Where the lit part of a digit cell sits.
#[derive(Debug, Clone, Copy)]
struct DigitBox {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

/// A fixed-width 32 pixel tall digit font stored as packed columns.
///
/// Digits 0-9 come first, each `digit_width` columns, followed by the colon.
#[derive(Debug, Clone)]
pub struct ClockFontData {
    digit_width: usize,
    colon_width: usize,
    columns: Vec<u32>,
}

impl ClockFontData {
    /// Wide font used by the big clock layouts: 26 columns per digit, last 6 blank.
    pub fn wide() -> Self {
        Self::build(
            CLOCK_DIGIT_WIDTH,
            CLOCK_COLON_WIDTH,
            DigitBox { x: 2, y: 2, w: 18, h: 28 },
        )
    }

    /// Narrow font used when icons share the right-hand edge.
    pub fn narrow() -> Self {
        Self::build(
            CLOCK_DIGIT_WIDTH_NARROW,
            CLOCK_COLON_WIDTH_NARROW,
            DigitBox { x: 1, y: 2, w: 20, h: 28 },
        )
    }

    fn build(digit_width: usize, colon_width: usize, cell: DigitBox) -> Self {
        let mut canvas = VarFrameBuf::new(digit_width as u32, CLOCK_FONT_HEIGHT);
        let mut columns = Vec::with_capacity(digit_width * 10 + colon_width);

        for segments in SEGMENTS {
            canvas.clear_all();
            draw_segments(&mut canvas, cell, segments);
            columns.extend(canvas.columns(0, digit_width));
        }

        let mut colon = VarFrameBuf::new(colon_width as u32, CLOCK_FONT_HEIGHT);
        let x = (colon_width as i32 - SEGMENT_THICKNESS) / 2;
        for y in [cell.y + cell.h / 3 - 2, cell.y + 2 * cell.h / 3 - 2] {
            fill(&mut colon, x, y, SEGMENT_THICKNESS, SEGMENT_THICKNESS);
        }
        columns.extend(colon.columns(0, colon_width));

        Self { digit_width, colon_width, columns }
    }

    pub fn digit_width(&self) -> usize { self.digit_width }
    pub fn colon_width(&self) -> usize { self.colon_width }

    /// Columns for a digit, or None when `digit` is outside 0..=9.
    pub fn digit(&self, digit: i32) -> Option<&[u32]> {
        let d = usize::try_from(digit).ok().filter(|d| *d <= 9)?;
        self.columns.get(d * self.digit_width..(d + 1) * self.digit_width)
    }

    pub fn colon(&self) -> &[u32] {
        let start = self.digit_width * 10;
        &self.columns[start..start + self.colon_width]
    }
}

fn fill(canvas: &mut VarFrameBuf, x: i32, y: i32, w: i32, h: i32) {
    let _ = Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(canvas);
}

fn draw_segments(canvas: &mut VarFrameBuf, b: DigitBox, segments: u8) {
    let t = SEGMENT_THICKNESS;
    let half = b.h / 2;
    let lit = |bit: u8| segments & (1 << (6 - bit)) != 0;

    if lit(0) { fill(canvas, b.x, b.y, b.w, t); }                         // a
    if lit(1) { fill(canvas, b.x + b.w - t, b.y, t, half); }              // b
    if lit(2) { fill(canvas, b.x + b.w - t, b.y + half, t, b.h - half); } // c
    if lit(3) { fill(canvas, b.x, b.y + b.h - t, b.w, t); }               // d
    if lit(4) { fill(canvas, b.x, b.y + half, t, b.h - half); }           // e
    if lit(5) { fill(canvas, b.x, b.y, t, half); }                        // f
    if lit(6) { fill(canvas, b.x, b.y + half - t / 2, b.w, t); }          // g
}

/// 16x15 icons drawn beside the narrow clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockIcon {
    Am,
    Pm,
    Alarm,
}

impl ClockIcon {
    /// 15 columns, 16 pixels tall.
    pub fn columns(self) -> [u16; CLOCK_ICON_WIDTH] {
        let mut out = [0u16; CLOCK_ICON_WIDTH];
        match self {
            ClockIcon::Alarm => {
                let alarm = icon_16x16(ICON_ALARM);
                out[..12].copy_from_slice(&alarm[..12]);
            }
            ClockIcon::Am | ClockIcon::Pm => {
                let label = if self == ClockIcon::Am { "AM" } else { "PM" };
                let mut canvas = VarFrameBuf::new(CLOCK_ICON_WIDTH as u32, 16);
                let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
                let _ = Text::with_baseline(label, Point::new(1, 3), style, Baseline::Top)
                    .draw(&mut canvas);
                for (x, col) in out.iter_mut().enumerate() {
                    *col = canvas.column_bits(x) as u16;
                }
            }
        }
        out
    }
}
