/*
 *  glyphs.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed column bitmaps: status icons, arrows, signal bars and Code-39
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

//! Every table here is column-major: one entry per display column, the most
//! significant used bit is the top pixel.

/// Helper function to get a slice for a specific glyph from a column set
pub fn get_glyph_slice<T>(raw_glyph: &'static [T], index: usize, columns: usize) -> &'static [T] {
    let start_idx = index * columns;
    let end_idx = (start_idx + columns).min(raw_glyph.len());
    &raw_glyph[start_idx.min(end_idx)..end_idx]
}

// icon ids (position in the icon tables)
pub const ICON_BLANK: usize = 0x00;
pub const ICON_ALARM: usize = 0x08;
pub const ICON_COUNT: usize = 0x12;

/// Application bitmask flags understood by the icon strip.
pub const BITMASK_SHIFT: u32 = 0x0000_0001;
pub const BITMASK_IRADIO: u32 = 0x0000_0002;
pub const BITMASK_MEDIA: u32 = 0x0000_0004;
pub const BITMASK_SHUFFLE: u32 = 0x0000_0008;
pub const BITMASK_REPEAT: u32 = 0x0000_0010;
pub const BITMASK_SLEEP_TIMER: u32 = 0x0000_0020;
pub const BITMASK_MUTE: u32 = 0x0000_0040;
pub const BITMASK_ALARM: u32 = 0x0000_0080;
pub const BITMASK_SNOOZE: u32 = 0x0000_0100;
pub const BITMASK_MONO: u32 = 0x0000_0200;
pub const BITMASK_STEREO: u32 = 0x0000_0400;
pub const BITMASK_ALARM1: u32 = 0x0000_0800;
pub const BITMASK_ALARM2: u32 = 0x0000_1000;
pub const BITMASK_THUMBS_UP: u32 = 0x0080_0000;
pub const BITMASK_NPR: u32 = 0x0100_0000;
pub const BITMASK_PANDORA: u32 = 0x0200_0000;
pub const BITMASK_FAVOURITE: u32 = 0x0400_0000;

/// Bit position -> icon id. Zero entries are flags this display has no
/// artwork for (nap alarm, RF remote, source indicators) and are skipped.
pub const ICON_MAP: [usize; 27] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x0e, 0x0f, 0x10, 0x11,
];

pub const ICON_8X8: [u8; ICON_COUNT * 8] = [
    /* blank */       0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    /* shift */       0x10, 0x30, 0x5f, 0x81, 0x5f, 0x30, 0x10, 0x00,
    /* iradio */      0xea, 0xea, 0xca, 0x12, 0xe4, 0x08, 0xf0, 0x00,
    /* media */       0x03, 0x03, 0x03, 0xff, 0xc0, 0x60, 0x38, 0x00,
    /* shuffle */     0xc3, 0xc3, 0xdb, 0xdb, 0xdb, 0x18, 0x18, 0x00,
    /* repeat */      0x08, 0x18, 0xff, 0x99, 0x89, 0x81, 0xff, 0x00,
    /* sleep timer */ 0x3c, 0x42, 0x81, 0xf1, 0x91, 0x52, 0x3c, 0x00,
    /* mute */        0x98, 0x58, 0x3c, 0x7e, 0xff, 0x04, 0x02, 0x00,
    /* alarm */       0x04, 0x0c, 0x7c, 0xfe, 0x7c, 0x0c, 0x04, 0x00,
    /* snooze */      0x98, 0xa8, 0xc8, 0x88, 0x00, 0x16, 0x1a, 0x12,
    /* mono */        0xfe, 0xc0, 0x60, 0x30, 0x60, 0xc0, 0xfe, 0x00,
    /* stereo */      0x64, 0x92, 0x92, 0x0c, 0x80, 0xfe, 0x80, 0x00,
    /* alarm 1 */     0x04, 0x7c, 0xfe, 0x7c, 0x04, 0x40, 0xf0, 0x00,
    /* alarm 2 */     0x04, 0x7c, 0xfe, 0x7c, 0x04, 0xb0, 0xd0, 0x00,
    /* thumbs up */   0x0e, 0x0e, 0x3f, 0xff, 0x1f, 0x1f, 0x1c, 0x00,
    /* npr */         0x00, 0x7e, 0x20, 0x40, 0x40, 0x20, 0x1e, 0x00,
    /* pandora */     0x81, 0xff, 0x89, 0x88, 0x88, 0x70, 0x00, 0x00,
    /* favourite */   0x49, 0x2a, 0x1c, 0x7f, 0x1c, 0x2a, 0x49, 0x00,
];

/// 16x16 artwork exists for the first ten icons only; the rest are drawn
/// from their 8x8 versions centred vertically (see `icon_16x16`).
pub const ICON_16X16_DRAWN: usize = 0x0a;
pub const ICON_16X16: [u16; ICON_16X16_DRAWN * 16] = [
    /* blank */       0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    /* shift */       0x0040, 0x00c0, 0x0140, 0x0240, 0x047f, 0x0801, 0x0801, 0x047f, 0x0240, 0x0140, 0x00c0, 0x0040, 0x0000, 0x0000, 0x0000, 0x0000,
    /* iradio */      0x0600, 0x0f49, 0x0f49, 0x0649, 0x0089, 0x0711, 0x0022, 0x0044, 0x0788, 0x0010, 0x0020, 0x07c0, 0x0000, 0x0000, 0x0000, 0x0000,
    /* media */       0x0000, 0x0000, 0x0000, 0x0007, 0x0007, 0x0007, 0x03ff, 0x0300, 0x0180, 0x00e0, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    /* shuffle */     0x06c3, 0x06c3, 0x06c3, 0x06c3, 0x06db, 0x06db, 0x06db, 0x06db, 0x0018, 0x0018, 0x0018, 0x0018, 0x0000, 0x0000, 0x0000, 0x0000,
    /* repeat */      0x0000, 0x0000, 0x0020, 0x0060, 0x00e0, 0x07ff, 0x04e1, 0x0461, 0x0421, 0x0401, 0x0401, 0x07ff, 0x0000, 0x0000, 0x0000, 0x0000,
    /* sleep timer */ 0x0000, 0x01fc, 0x0202, 0x0401, 0x0401, 0x07e1, 0x0421, 0x0421, 0x0222, 0x01fc, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    /* mute */        0x00f0, 0x08f0, 0x04f0, 0x02f0, 0x01f8, 0x03fc, 0x07fe, 0x0fff, 0x0010, 0x0008, 0x0004, 0x0002, 0x0000, 0x0000, 0x0000, 0x0000,
    /* alarm */       0x0000, 0x0004, 0x000c, 0x03f4, 0x0404, 0x0806, 0x0807, 0x0806, 0x0404, 0x03f4, 0x000c, 0x0004, 0x0000, 0x0000, 0x0000, 0x0000,
    /* snooze */      0x0430, 0x0450, 0x0490, 0x0510, 0x0610, 0x0410, 0x0046, 0x004a, 0x0052, 0x0062, 0x0042, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
];

/// Columns of a 16x16 icon.
///
/// Only ids below `ICON_16X16_DRAWN` have their own 16x16 art. The rest reuse
/// the 8x8 icon, centred vertically in its first 8 columns, instead of being
/// left blank.
pub fn icon_16x16(id: usize) -> [u16; 16] {
    let mut columns = [0u16; 16];
    if id < ICON_16X16_DRAWN {
        columns.copy_from_slice(get_glyph_slice(&ICON_16X16, id, 16));
    } else if id < ICON_COUNT {
        for (dst, &src) in columns.iter_mut().zip(get_glyph_slice(&ICON_8X8, id, 8)) {
            *dst = u16::from(src) << 4;
        }
    }
    columns
}

/// Arrows are 6 columns wide and 16 pixels tall.
pub const ARROW_WIDTH: usize = 6;
pub const LEFT_ARROW: [u16; ARROW_WIDTH] = [0x0100, 0x0380, 0x06c0, 0x0c60, 0x1830, 0x0000];
pub const RIGHT_ARROW: [u16; ARROW_WIDTH] = [0x0000, 0x1830, 0x0c60, 0x06c0, 0x0380, 0x0100];

/// Signal strength: antenna then bars of 2, 4, 6 and 8 pixels; 8 rows, 6 columns each.
pub const SIGNAL_STRENGTH_8X6: [[u8; 6]; 5] = [
    [0xc0, 0xa0, 0xff, 0xa0, 0xc0, 0x00],
    [0x03, 0x03, 0x03, 0x03, 0x03, 0x00],
    [0x0f, 0x0f, 0x0f, 0x0f, 0x0f, 0x00],
    [0x3f, 0x3f, 0x3f, 0x3f, 0x3f, 0x00],
    [0xff, 0xff, 0xff, 0xff, 0xff, 0x00],
];

/// Code-39 patterns for 0-F. Bars alternate black/white starting black,
/// a set bit is a wide (3 pixel) bar, MSB first.
pub const CODE39: [u16; 16] = [
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025,
    0x124, 0x064, 0x109, 0x049, 0x148, 0x019, 0x118, 0x058,
];
pub const CODE39_START_STOP: u16 = 0x094;

/// Expands 4 bits into 8 by doubling each bit.
pub const STRETCH_4_TO_8: [u8; 16] = [
    0x00, 0x03, 0x0c, 0x0f, 0x30, 0x33, 0x3c, 0x3f,
    0xc0, 0xc3, 0xcc, 0xcf, 0xf0, 0xf3, 0xfc, 0xff,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_16x16_falls_back_to_8x8_artwork() {
        let favourite = icon_16x16(0x11);
        assert_eq!(favourite[0], 0x49 << 4);
        assert_eq!(favourite[8..], [0u16; 8]);
        assert_eq!(icon_16x16(ICON_ALARM)[3], 0x03f4);
        assert_eq!(icon_16x16(99), [0u16; 16]);
    }

    #[test]
    fn test_icon_map_skips_unknown_flags() {
        assert_eq!(ICON_MAP[BITMASK_ALARM.trailing_zeros() as usize], ICON_ALARM);
        assert_eq!(ICON_MAP[13], 0);
        assert_eq!(ICON_MAP[BITMASK_FAVOURITE.trailing_zeros() as usize], 0x11);
    }

    #[test]
    fn test_stretch_doubles_bits() {
        for (nibble, &wide) in STRETCH_4_TO_8.iter().enumerate() {
            for bit in 0..4 {
                let set = nibble & (1 << bit) != 0;
                assert_eq!(wide & (0b11 << (bit * 2)) == (0b11 << (bit * 2)), set);
            }
        }
    }
}
