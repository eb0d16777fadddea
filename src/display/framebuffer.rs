/*
 *  display/framebuffer.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Packed column-major 1bpp framebuffer and the column blitter
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

use std::fmt::Write as _;

use crate::display::error::DisplayError;
use crate::display::hardware::HardwareProfile;

/// Tallest column a single blit can carry.
pub const MAX_BLIT_HEIGHT: usize = 32;

/// Where the next column lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    /// byte offset of the column's first touched page
    offset: usize,
    /// left shift applied to data and mask
    shift: u32,
    /// `height` low bits set
    mask: u64,
    /// bits touched per column, a multiple of 8
    height_p: u32,
}

/// A rectangle of pixels packed the same way as the framebuffer.
///
/// `top` is always a multiple of 8; `data[row_byte + col * height_bytes]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Bitmap {
    pub fn height_bytes(&self) -> usize {
        self.height.div_ceil(8)
    }
}

/// The one drawing surface.
///
/// Column `c` occupies bytes `c * height_bytes .. (c + 1) * height_bytes`,
/// page 0 first. Inside a byte the MSB is the topmost pixel. Columns and
/// rows below the hardware offsets exist in the buffer but never show.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    width_px: usize,
    height_px: usize,
    x_offset: usize,
    y_offset: usize,
    height_bytes: usize,
    cursor: Cursor,
}

impl FrameBuffer {
    pub fn new(hw: &HardwareProfile) -> Self {
        let height_bytes = hw.height_bytes();
        Self {
            buf: vec![0; hw.width_px * height_bytes],
            width_px: hw.width_px,
            height_px: hw.height_px,
            x_offset: hw.x_offset,
            y_offset: hw.y_offset,
            height_bytes,
            cursor: Cursor::default(),
        }
    }

    pub fn width_px(&self) -> usize { self.width_px }
    pub fn height_px(&self) -> usize { self.height_px }
    pub fn x_offset(&self) -> usize { self.x_offset }
    pub fn y_offset(&self) -> usize { self.y_offset }
    pub fn height_bytes(&self) -> usize { self.height_bytes }

    /// Columns a caller can actually see.
    pub fn visible_width(&self) -> usize {
        self.width_px - self.x_offset
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    /// Point the blitter at logical `(col, row)` for columns `height` pixels tall.
    pub fn set_position(&mut self, height: usize, col: usize, row: usize) -> Result<(), DisplayError> {
        if height == 0 || height > MAX_BLIT_HEIGHT {
            return Err(DisplayError::InvalidArgument(format!(
                "blit height {} outside 1..={}", height, MAX_BLIT_HEIGHT
            )));
        }
        let y = row + self.y_offset;
        let rounded = height.div_ceil(8) * 8;
        let mut shift = (rounded - height) as i32 - (y % 8) as i32;
        let mut height_p = rounded as u32;
        if shift < 0 {
            height_p += 8;
            shift += 8;
        }
        self.cursor = Cursor {
            offset: (col + self.x_offset) * self.height_bytes + y / 8,
            shift: shift as u32,
            mask: (1u64 << height) - 1,
            height_p,
        };
        Ok(())
    }

    /// Write one column at the cursor and step right.
    ///
    /// Bit `height - 1` of `data` is the top pixel. Bytes are only touched
    /// under the mask, so pixels above and below the column survive. A column
    /// that would spill past its own bytes or the buffer writes nothing.
    pub fn blit_column(&mut self, data: u32) -> Result<(), DisplayError> {
        let Cursor { offset, shift, mask, height_p } = self.cursor;
        let nbytes = (height_p / 8) as usize;
        let page = offset % self.height_bytes;
        let end = offset + nbytes;
        if page + nbytes > self.height_bytes || end > self.buf.len() {
            return Err(DisplayError::BufferOverrun { offset: end - 1, len: self.buf.len() });
        }

        let data = u64::from(data) << shift;
        let mask = mask << shift;
        let mut bits = height_p;
        for byte in &mut self.buf[offset..end] {
            bits -= 8;
            let bytemask = ((mask >> bits) & 0xff) as u8;
            *byte = (*byte & !bytemask) | (((data >> bits) & 0xff) as u8 & bytemask);
        }
        self.cursor.offset += self.height_bytes;
        Ok(())
    }

    pub fn draw_columns<I>(&mut self, columns: I, invert: bool) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = u32>,
    {
        for col in columns {
            self.blit_column(if invert { !col } else { col })?;
        }
        Ok(())
    }

    pub fn draw_8bit(&mut self, columns: &[u8], invert: bool) -> Result<(), DisplayError> {
        self.draw_columns(columns.iter().map(|&c| u32::from(c)), invert)
    }

    pub fn draw_16bit(&mut self, columns: &[u16], invert: bool) -> Result<(), DisplayError> {
        self.draw_columns(columns.iter().map(|&c| u32::from(c)), invert)
    }

    pub fn draw_32bit(&mut self, columns: &[u32], invert: bool) -> Result<(), DisplayError> {
        self.draw_columns(columns.iter().copied(), invert)
    }

    pub fn draw_blank_columns(&mut self, count: usize, invert: bool) -> Result<(), DisplayError> {
        self.draw_columns(std::iter::repeat_n(0, count), invert)
    }

    /// Pixel at logical `(x, y)`; false off the visible area.
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        if x >= self.visible_width() || y >= self.height_px {
            return false;
        }
        let y = y + self.y_offset;
        let byte = self.buf[(x + self.x_offset) * self.height_bytes + y / 8];
        byte & (0x80 >> (y % 8)) != 0
    }

    pub fn count_on_pixels(&self) -> usize {
        (0..self.height_px)
            .flat_map(|y| (0..self.visible_width()).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get_pixel(x, y))
            .count()
    }

    /// Copy a logical rectangle out, with its top rounded down to a page.
    pub fn grab_region(&self, left: usize, top: usize, width: usize, height: usize) -> Result<Bitmap, DisplayError> {
        if left + width > self.visible_width() || top + height > self.height_px {
            return Err(DisplayError::InvalidArgument(format!(
                "region {}x{} at ({}, {}) is off the {}x{} screen",
                width, height, left, top, self.visible_width(), self.height_px
            )));
        }
        let aligned_top = top / 8 * 8;
        let mut bitmap = Bitmap {
            left,
            top: aligned_top,
            width,
            height: height + (top - aligned_top),
            data: Vec::new(),
        };
        let hb = bitmap.height_bytes();
        bitmap.data = vec![0; hb * width];
        for x in 0..width {
            for y in 0..bitmap.height {
                if self.get_pixel(left + x, aligned_top + y) {
                    bitmap.data[x * hb + y / 8] |= 0x80 >> (y % 8);
                }
            }
        }
        Ok(bitmap)
    }

    /// Replay a bitmap strip by strip.
    ///
    /// A bitmap that does not fit the visible area is refused whole.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap) -> Result<(), DisplayError> {
        let hb = bitmap.height_bytes();
        if bitmap.data.len() < hb * bitmap.width {
            return Err(DisplayError::InvalidArgument(format!(
                "bitmap holds {} bytes, {}x{} needs {}",
                bitmap.data.len(), bitmap.width, bitmap.height, hb * bitmap.width
            )));
        }
        let mut top = bitmap.top / 8 * 8;
        if bitmap.left + bitmap.width > self.visible_width() || top + bitmap.height > self.height_px {
            let last_col = (bitmap.left + bitmap.width + self.x_offset).saturating_sub(1);
            return Err(DisplayError::BufferOverrun {
                offset: last_col * self.height_bytes + (top + bitmap.height + self.y_offset) / 8,
                len: self.buf.len(),
            });
        }
        for strip in 0..hb {
            let h = (bitmap.height - strip * 8).min(8);
            self.set_position(h, bitmap.left, top)?;
            for col in 0..bitmap.width {
                let byte = bitmap.data[strip + col * hb];
                self.blit_column(u32::from(byte >> (8 - h)))?;
            }
            top += 8;
        }
        Ok(())
    }

    /// Plain PBM (P1) of the visible area.
    pub fn to_pbm(&self) -> String {
        let mut out = format!("P1\n{} {}\n", self.visible_width(), self.height_px);
        for y in 0..self.height_px {
            let row: Vec<&str> = (0..self.visible_width())
                .map(|x| if self.get_pixel(x, y) { "1" } else { "0" })
                .collect();
            let _ = writeln!(out, "{}", row.join(" "));
        }
        out
    }

    /// Terminal preview, one character per pixel.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.visible_width() + 1) * self.height_px);
        for y in 0..self.height_px {
            out.extend((0..self.visible_width()).map(|x| if self.get_pixel(x, y) { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> FrameBuffer {
        FrameBuffer::new(&HardwareProfile::by_name("tm13264cbcg").unwrap())
    }

    #[test]
    fn test_framebuffer_geometry() {
        let fb = panel();
        assert_eq!(fb.height_bytes(), 8);
        assert_eq!(fb.as_bytes().len(), 132 * 8);
        assert_eq!(fb.count_on_pixels(), 0);
    }

    #[test]
    fn test_blit_aligned_column_msb_is_top() {
        let mut fb = panel();
        fb.set_position(16, 3, 0).unwrap();
        fb.blit_column(0x8001).unwrap();
        assert!(fb.get_pixel(3, 0));
        assert!(fb.get_pixel(3, 15));
        assert_eq!(fb.count_on_pixels(), 2);
        assert_eq!(fb.as_bytes()[3 * 8], 0x80);
        assert_eq!(fb.as_bytes()[3 * 8 + 1], 0x01);
    }

    #[test]
    fn test_blit_preserves_pixels_outside_mask() {
        let mut fb = panel();
        fb.buf.fill(0xff);
        // 12 rows at 52 clear exactly rows 52..64
        fb.set_position(12, 0, 52).unwrap();
        fb.blit_column(0).unwrap();
        assert!(fb.get_pixel(0, 51));
        assert!((52..64).all(|y| !fb.get_pixel(0, y)));
        assert!(fb.get_pixel(1, 52));
    }

    #[test]
    fn test_blit_unaligned_row_spans_extra_page() {
        let mut fb = panel();
        fb.buf.fill(0xff);
        fb.set_position(16, 0, 4).unwrap();
        fb.blit_column(0x0000).unwrap();
        assert!((0..4).all(|y| fb.get_pixel(0, y)));
        assert!((4..20).all(|y| !fb.get_pixel(0, y)));
        assert!((20..24).all(|y| fb.get_pixel(0, y)));

        fb.clear();
        fb.set_position(11, 0, 5).unwrap();
        fb.blit_column(0x7ff).unwrap();
        assert!((5..16).all(|y| fb.get_pixel(0, y)));
        assert_eq!(fb.count_on_pixels(), 11);
    }

    #[test]
    fn test_blit_respects_y_offset() {
        let hw = HardwareProfile::by_name("amax_kdc162a28").unwrap();
        let mut fb = FrameBuffer::new(&hw);
        fb.set_position(8, 0, 0).unwrap();
        fb.blit_column(0x80).unwrap();
        assert!(fb.get_pixel(0, 0));
        // row 0 sits at physical row 15, the last bit of page 1
        assert_eq!(fb.as_bytes()[1], 0x01);
    }

    #[test]
    fn test_blit_advances_one_column() {
        let mut fb = panel();
        fb.set_position(8, 10, 8).unwrap();
        fb.draw_8bit(&[0x80, 0x40], false).unwrap();
        assert!(fb.get_pixel(10, 8));
        assert!(fb.get_pixel(11, 9));
    }

    #[test]
    fn test_draw_inverted_and_blank() {
        let mut fb = panel();
        fb.set_position(8, 0, 0).unwrap();
        fb.draw_blank_columns(3, true).unwrap();
        assert_eq!(fb.count_on_pixels(), 24);
        fb.set_position(8, 0, 0).unwrap();
        fb.draw_8bit(&[0x0f], true).unwrap();
        assert!(fb.get_pixel(0, 0));
        assert!(!fb.get_pixel(0, 7));
    }

    #[test]
    fn test_overrun_past_last_column_is_rejected() {
        let mut fb = panel();
        fb.set_position(8, 131, 0).unwrap();
        fb.blit_column(0xff).unwrap();
        let before = fb.as_bytes().to_vec();
        assert!(matches!(fb.blit_column(0xff), Err(DisplayError::BufferOverrun { .. })));
        assert_eq!(fb.as_bytes(), &before[..]);
    }

    #[test]
    fn test_overrun_into_next_column_is_rejected() {
        let mut fb = panel();
        fb.set_position(16, 0, 56).unwrap();
        assert!(matches!(fb.blit_column(0xffff), Err(DisplayError::BufferOverrun { .. })));
        assert_eq!(fb.count_on_pixels(), 0);
    }

    #[test]
    fn test_set_position_rejects_bad_height() {
        let mut fb = panel();
        assert!(fb.set_position(0, 0, 0).is_err());
        assert!(fb.set_position(33, 0, 0).is_err());
    }

    #[test]
    fn test_grab_and_draw_bitmap_unaligned() {
        let mut fb = panel();
        fb.set_position(5, 20, 13).unwrap();
        fb.draw_8bit(&[0x1f, 0x11, 0x1f], false).unwrap();
        let shot = fb.grab_region(18, 13, 8, 7).unwrap();
        assert_eq!(shot.top, 8);
        assert_eq!(shot.height, 12);
        assert_eq!(shot.data.len(), 2 * 8);

        let mut other = panel();
        other.draw_bitmap(&shot).unwrap();
        for x in 18..26 {
            for y in 8..20 {
                assert_eq!(other.get_pixel(x, y), fb.get_pixel(x, y), "({x}, {y})");
            }
        }
        assert_eq!(other.count_on_pixels(), fb.count_on_pixels());
    }

    #[test]
    fn test_grab_region_out_of_bounds() {
        let fb = panel();
        assert!(fb.grab_region(130, 0, 4, 8).is_err());
        assert!(fb.grab_region(0, 60, 4, 8).is_err());
    }

    #[test]
    fn test_draw_bitmap_off_screen_writes_nothing() {
        let mut fb = panel();
        let right = Bitmap { left: 128, top: 0, width: 8, height: 8, data: vec![0xff; 8] };
        assert!(matches!(fb.draw_bitmap(&right), Err(DisplayError::BufferOverrun { .. })));
        assert_eq!(fb.count_on_pixels(), 0);

        let bottom = Bitmap { left: 0, top: 56, width: 4, height: 16, data: vec![0xff; 8] };
        assert!(matches!(fb.draw_bitmap(&bottom), Err(DisplayError::BufferOverrun { .. })));
        assert_eq!(fb.count_on_pixels(), 0);

        let fits = Bitmap { left: 124, top: 56, width: 8, height: 8, data: vec![0xff; 8] };
        fb.draw_bitmap(&fits).unwrap();
        assert_eq!(fb.count_on_pixels(), 64);
    }

    #[test]
    fn test_pbm_and_ascii_output() {
        let mut fb = panel();
        fb.set_position(8, 0, 0).unwrap();
        fb.blit_column(0x80).unwrap();
        let pbm = fb.to_pbm();
        assert!(pbm.starts_with("P1\n132 64\n1 0 0"));
        let ascii = fb.to_ascii();
        assert!(ascii.starts_with("#."));
        assert_eq!(ascii.lines().count(), 64);
    }
}
