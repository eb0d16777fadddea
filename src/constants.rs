/*
 *  constants.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Controller command bytes and layout constants shared by the engine
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

//! This module contains global constants used across the display modules.

// controller commands (monochrome page-addressed LCD controllers)
pub const CTL_DISPLAY_OFF: u8 = 0xae;
pub const CTL_DISPLAY_ON: u8 = 0xaf;
pub const CTL_ADC_SEG_NORMAL: u8 = 0xa0;
pub const CTL_ADC_SEG_REVERSE: u8 = 0xa1;
pub const CTL_SHL_SEG_NORMAL: u8 = 0xc0;
pub const CTL_SHL_SEG_REVERSE: u8 = 0xc8;
pub const CTL_LCD_BIAS_0: u8 = 0xa2;
pub const CTL_LCD_BIAS_1: u8 = 0xa3;
pub const CTL_PIX_REVERSED_OFF: u8 = 0xa6;
pub const CTL_PIX_REVERSED_ON: u8 = 0xa7;
pub const CTL_POWER: u8 = 0x28;
pub const CTL_POWER_VC: u8 = 1 << 2;
pub const CTL_POWER_VR: u8 = 1 << 1;
pub const CTL_POWER_VF: u8 = 1 << 0;
pub const CTL_REGRES: u8 = 0x20;
pub const CTL_SET_REF_V: u8 = 0x81;
pub const CTL_SET_INIT_LINE: u8 = 0x40;
pub const CTL_SET_PAGE: u8 = 0xb0;
pub const CTL_SET_COL_MSB: u8 = 0x10;
pub const CTL_SET_COL_LSB: u8 = 0x00;

// greyscale OLED (SSD0323) addressing
pub const GREY_SET_COLUMN: u8 = 0x15;
pub const GREY_SET_ROW: u8 = 0x75;
pub const GREY_ADDRESS_END: u8 = 0x3f;
/// Highest greyscale level a lit pixel can be driven at.
pub const MAX_GREYSCALE_LEVEL: u8 = 15;

/// Upper bound on decoded glyphs per line.
pub const MAX_SCREEN_WIDTH: usize = 256;

/// Maximum number of glyphs kept for each of the AM/PM labels.
pub const AMPM_LENGTH: usize = 2;

/// Icon slots available on the icon row (signal strength starts at column 102).
pub const DEFAULT_MAX_ICONS: usize = 7;
pub const DEFAULT_ICON_SPACING: usize = 2;

/// Barcode: 15 pixels per character plus a 1 pixel gap; 132 / 16 leaves
/// room for 6 characters once START and STOP are drawn.
pub const MAX_BARCODE_LENGTH: usize = 6;

// big clock geometry
pub const CLOCK_DIGIT_WIDTH: usize = 26;
pub const CLOCK_COLON_WIDTH: usize = 10;
pub const CLOCK_DIGIT_WIDTH_NARROW: usize = 22;
pub const CLOCK_COLON_WIDTH_NARROW: usize = 15;
pub const CLOCK_ICON_WIDTH: usize = 15;

/// Clock columns: 24 hour block is 4*26 + 10 - 6 = 108 wide, centred on 132.
pub const COL_OFFSET_24HR: usize = 12;
pub const COL_OFFSET_12HR: usize = 0;
pub const COL_OFFSET_ALARM: usize = 26;
pub const COL_OFFSET_AMPM: usize = 112;

// small clock placement on the status line
pub const SMALL_CLOCK_ROW: usize = 52;
pub const SMALL_CLOCK_HEIGHT: usize = 12;
pub const SMALL_CLOCK_SHIFT: u32 = 3;

// signal strength meter
pub const SIG_STRENGTH_BARS: usize = 4;
pub const SIG_STRENGTH_WIDTH: usize = 6;
pub const SIG_STRENGTH_COLUMN_FROM_RIGHT: usize = 30;
