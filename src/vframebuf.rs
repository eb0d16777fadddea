/*
 *  vframebuf.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runtime-sized raster canvas used to build column glyph tables
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A runtime-sized monochrome canvas for embedded-graphics.
///
/// Fonts and shapes are rendered here row-major, then read back one column
/// at a time in the packed form the blitter expects.
#[derive(Debug, Clone)]
pub struct VarFrameBuf {
    buf: Vec<BinaryColor>,
    w: usize,
    h: usize,
}

impl VarFrameBuf {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![BinaryColor::Off; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Clear to off
    pub fn clear_all(&mut self) {
        self.buf.fill(BinaryColor::Off);
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h && self.buf[y * self.w + x] == BinaryColor::On
    }

    /// Column `x` packed top pixel first: row 0 lands in bit `height - 1`.
    pub fn column_bits(&self, x: usize) -> u32 {
        (0..self.h.min(32)).fold(0u32, |acc, y| {
            (acc << 1) | u32::from(self.is_on(x, y))
        })
    }

    /// Packs `count` columns starting at `x`.
    pub fn columns(&self, x: usize, count: usize) -> Vec<u32> {
        (x..x + count).map(|c| self.column_bits(c)).collect()
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for VarFrameBuf {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for VarFrameBuf {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // segments and glyph cells are clipped rectangles, skip the iterator
        let area = area.intersection(&self.bounding_box());
        let Size { width, height } = area.size;
        if width == 0 || height == 0 { return Ok(()); }
        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        for row in y0..y0 + height as usize {
            let base = row * self.w;
            self.buf[base + x0..base + x0 + width as usize].fill(color);
        }
        Ok(())
    }
}
