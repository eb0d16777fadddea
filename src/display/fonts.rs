/*
 *  display/fonts.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Glyph store: Latin-1 column fonts and loadable double-width fonts
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

use embedded_graphics::mono_font::{
    iso_8859_1::{FONT_5X8, FONT_6X10, FONT_8X13},
    MonoFont, MonoTextStyle,
};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::display::error::DisplayError;
use crate::glyphs::STRETCH_4_TO_8;
use crate::vframebuf::VarFrameBuf;

/// Codes in each fixed font; the local index is the Latin-1 code point.
pub const FONT_GLYPHS: usize = 256;
/// Stand-in for code points the fixed fonts cannot show.
pub const MISSING_GLYPH: u8 = b'?';

pub const FONT_8X6_WIDTH: usize = 6;
pub const FONT_16X8_WIDTH: usize = 8;
pub const FONT_11X8_WIDTH: usize = 8;
pub const WIDE_GLYPH_WIDTH: usize = 16;
const WIDE_GLYPH_BYTES: usize = WIDE_GLYPH_WIDTH * 2;

/// First and last code points of the Chinese font blob.
pub const CHINESE_FIRST: u32 = 0x4e00;
pub const CHINESE_LAST: u32 = 0x9fa5;
const JAPANESE_INDEX_ENTRIES: usize = 0x10000;
const JAPANESE_ABSENT: u16 = 0xffff;

/// One decoded character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Index into the fixed fonts
    Narrow(u8),
    /// Double-width glyph, two cells wide
    Wide(char),
}

impl Glyph {
    /// Character cells taken.
    pub fn cells(self) -> usize {
        match self {
            Glyph::Narrow(_) => 1,
            Glyph::Wide(_) => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontId {
    Chinese,
    Japanese,
}

/// Which double-width font is consulted first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Default,
    Chinese,
    Japanese,
}

/// A 16x16 font blob. Each glyph is 16 little-endian u16 columns, top pixel in bit 15.
#[derive(Debug, Clone)]
pub enum DoubleWidthFont {
    /// Dense table covering U+4E00..=U+9FA5
    Chinese { data: Vec<u8> },
    /// Sparse table; `index[code point]` is a glyph number or 0xFFFF
    Japanese { index: Vec<u16>, data: Vec<u8> },
}

impl DoubleWidthFont {
    pub fn chinese(data: Vec<u8>) -> Result<Self, DisplayError> {
        if data.is_empty() || data.len() % WIDE_GLYPH_BYTES != 0 {
            return Err(DisplayError::FontLoad(format!(
                "chinese font is {} bytes, not a whole number of {} byte glyphs",
                data.len(), WIDE_GLYPH_BYTES
            )));
        }
        Ok(DoubleWidthFont::Chinese { data })
    }

    pub fn japanese(index: &[u8], data: Vec<u8>) -> Result<Self, DisplayError> {
        if index.len() != JAPANESE_INDEX_ENTRIES * 2 {
            return Err(DisplayError::FontLoad(format!(
                "japanese index is {} bytes, expected {}",
                index.len(), JAPANESE_INDEX_ENTRIES * 2
            )));
        }
        if data.len() % WIDE_GLYPH_BYTES != 0 {
            return Err(DisplayError::FontLoad(format!(
                "japanese font is {} bytes, not a whole number of {} byte glyphs",
                data.len(), WIDE_GLYPH_BYTES
            )));
        }
        let index = index
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect();
        Ok(DoubleWidthFont::Japanese { index, data })
    }

    pub fn id(&self) -> FontId {
        match self {
            DoubleWidthFont::Chinese { .. } => FontId::Chinese,
            DoubleWidthFont::Japanese { .. } => FontId::Japanese,
        }
    }

    fn glyph_bytes(&self, c: char) -> Option<&[u8]> {
        let (glyph, data) = match self {
            DoubleWidthFont::Chinese { data } => {
                let cp = u32::from(c);
                if !(CHINESE_FIRST..=CHINESE_LAST).contains(&cp) {
                    return None;
                }
                ((cp - CHINESE_FIRST) as usize, data)
            }
            DoubleWidthFont::Japanese { index, data } => {
                let slot = *index.get(u32::from(c) as usize)?;
                if slot == JAPANESE_ABSENT {
                    return None;
                }
                (usize::from(slot), data)
            }
        };
        data.get(glyph * WIDE_GLYPH_BYTES..(glyph + 1) * WIDE_GLYPH_BYTES)
    }

    pub fn covers(&self, c: char) -> bool {
        self.glyph_bytes(c).is_some()
    }

    pub fn glyph(&self, c: char) -> Option<[u16; WIDE_GLYPH_WIDTH]> {
        let bytes = self.glyph_bytes(c)?;
        let mut columns = [0u16; WIDE_GLYPH_WIDTH];
        for (col, pair) in columns.iter_mut().zip(bytes.chunks_exact(2)) {
            *col = u16::from_le_bytes([pair[0], pair[1]]);
        }
        Some(columns)
    }
}

/// Every font the engine draws text with.
#[derive(Debug, Clone)]
pub struct GlyphStore {
    font_8x6: Vec<u8>,
    font_16x8: Vec<u16>,
    font_11x8: Vec<u16>,
    chinese: Option<DoubleWidthFont>,
    japanese: Option<DoubleWidthFont>,
    language: Language,
}

impl Default for GlyphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphStore {
    /// Rasterises the fixed fonts into column tables.
    pub fn new() -> Self {
        let font_8x6 = rasterize(&FONT_5X8, FONT_8X6_WIDTH, 8, Point::new(1, 0))
            .into_iter()
            .map(|c| c as u8)
            .collect();
        let font_16x8 = rasterize(&FONT_8X13, FONT_16X8_WIDTH, 16, Point::new(0, 1))
            .into_iter()
            .map(|c| c as u16)
            .collect();
        let font_11x8 = rasterize(&FONT_6X10, FONT_11X8_WIDTH, 11, Point::new(1, 0))
            .into_iter()
            .map(|c| c as u16)
            .collect();
        debug!("glyph store: {} fixed glyphs per font", FONT_GLYPHS);
        Self {
            font_8x6,
            font_16x8,
            font_11x8,
            chinese: None,
            japanese: None,
            language: Language::Default,
        }
    }

    pub fn glyph_8x6(&self, code: u8) -> &[u8] {
        &self.font_8x6[usize::from(code) * FONT_8X6_WIDTH..][..FONT_8X6_WIDTH]
    }

    pub fn glyph_16x8(&self, code: u8) -> &[u16] {
        &self.font_16x8[usize::from(code) * FONT_16X8_WIDTH..][..FONT_16X8_WIDTH]
    }

    pub fn glyph_11x8(&self, code: u8) -> &[u16] {
        &self.font_11x8[usize::from(code) * FONT_11X8_WIDTH..][..FONT_11X8_WIDTH]
    }

    /// Local index for a character in the fixed fonts.
    pub fn narrow_index(c: char) -> u8 {
        u8::try_from(u32::from(c)).unwrap_or(MISSING_GLYPH)
    }

    pub fn install(&mut self, font: DoubleWidthFont) {
        info!("double-width font loaded: {:?}", font.id());
        match font.id() {
            FontId::Chinese => self.chinese = Some(font),
            FontId::Japanese => self.japanese = Some(font),
        }
    }

    pub fn unload(&mut self, id: FontId) {
        match id {
            FontId::Chinese => self.chinese = None,
            FontId::Japanese => self.japanese = None,
        }
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn wide_fonts(&self) -> impl Iterator<Item = &DoubleWidthFont> {
        let (first, second) = match self.language {
            Language::Japanese => (&self.japanese, &self.chinese),
            Language::Default | Language::Chinese => (&self.chinese, &self.japanese),
        };
        first.iter().chain(second.iter())
    }

    /// A character is double-width when any loaded font has it.
    pub fn is_double_width(&self, c: char) -> bool {
        self.wide_fonts().any(|f| f.covers(c))
    }

    /// Columns of a double-width glyph; blank when no font has it.
    pub fn wide_glyph(&self, c: char) -> [u16; WIDE_GLYPH_WIDTH] {
        self.wide_fonts()
            .find_map(|f| f.glyph(c))
            .unwrap_or([0; WIDE_GLYPH_WIDTH])
    }

    /// Decode one character to a glyph.
    pub fn lookup(&self, c: char) -> Glyph {
        if self.is_double_width(c) {
            Glyph::Wide(c)
        } else {
            Glyph::Narrow(Self::narrow_index(c))
        }
    }
}

/// Doubles a 16 pixel column to 32 pixels.
pub fn zoom_column(column: u16) -> u32 {
    [0u32, 4, 8, 12].iter().fold(0, |acc, &j| {
        let nibble = usize::from((column >> j) & 0xf);
        acc | (u32::from(STRETCH_4_TO_8[nibble]) << (j * 2))
    })
}

/// Column tables for all 256 Latin-1 codes; control codes stay blank.
fn rasterize(font: &MonoFont<'_>, width: usize, height: u32, origin: Point) -> Vec<u32> {
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let mut canvas = VarFrameBuf::new(width as u32, height);
    let mut table = Vec::with_capacity(FONT_GLYPHS * width);
    for code in 0..=255u8 {
        canvas.clear_all();
        let c = char::from(code);
        if !c.is_control() {
            let mut utf8 = [0u8; 4];
            let _ = Text::with_baseline(c.encode_utf8(&mut utf8), origin, style, Baseline::Top)
                .draw(&mut canvas);
        }
        table.extend(canvas.columns(0, width));
    }
    table
}

/// The 8x6 '<' or '>' glyph minus its blank lead column.
pub fn small_arrow(store: &GlyphStore, right: bool) -> &[u8] {
    let code = if right { b'>' } else { b'<' };
    &store.glyph_8x6(code)[1..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chinese_blob() -> Vec<u8> {
        let count = (CHINESE_LAST - CHINESE_FIRST + 1) as usize;
        let mut data = vec![0u8; count * WIDE_GLYPH_BYTES];
        // glyph for U+4E2D: a full first column
        let g = (0x4e2d - CHINESE_FIRST) as usize * WIDE_GLYPH_BYTES;
        data[g] = 0xff;
        data[g + 1] = 0xff;
        data
    }

    fn japanese_blobs() -> (Vec<u8>, Vec<u8>) {
        let mut index = vec![0xffu8; JAPANESE_INDEX_ENTRIES * 2];
        // U+3042 -> glyph 0
        index[0x3042 * 2] = 0;
        index[0x3042 * 2 + 1] = 0;
        let mut data = vec![0u8; WIDE_GLYPH_BYTES];
        data[30] = 0x01;
        (index, data)
    }

    #[test]
    fn test_fixed_fonts_have_ink_where_expected() {
        let store = GlyphStore::new();
        assert!(store.glyph_16x8(b'A').iter().any(|&c| c != 0));
        assert!(store.glyph_8x6(b'A').iter().any(|&c| c != 0));
        assert!(store.glyph_11x8(b'A').iter().any(|&c| c != 0));
        assert!(store.glyph_16x8(b' ').iter().all(|&c| c == 0));
        assert!(store.glyph_16x8(0x07).iter().all(|&c| c == 0));
        assert!(store.glyph_16x8(0xe9).iter().any(|&c| c != 0));
    }

    #[test]
    fn test_fixed_fonts_fit_their_cells() {
        let store = GlyphStore::new();
        for code in 0..=255u8 {
            assert_eq!(store.glyph_8x6(code)[0], 0, "8x6 lead column for {code}");
            assert!(store.glyph_11x8(code).iter().all(|&c| c < (1 << 11)));
        }
    }

    #[test]
    fn test_narrow_index_falls_back() {
        assert_eq!(GlyphStore::narrow_index('A'), b'A');
        assert_eq!(GlyphStore::narrow_index('é'), 0xe9);
        assert_eq!(GlyphStore::narrow_index('€'), MISSING_GLYPH);
    }

    #[test]
    fn test_zoom_column_doubles_bits() {
        assert_eq!(zoom_column(0x0001), 0x0000_0003);
        assert_eq!(zoom_column(0x8000), 0xc000_0000);
        assert_eq!(zoom_column(0xffff), 0xffff_ffff);
        assert_eq!(zoom_column(0x00f0), 0x0000_ff00);
    }

    #[test]
    fn test_small_arrow_is_five_columns() {
        let store = GlyphStore::new();
        assert_eq!(small_arrow(&store, false).len(), 5);
        assert_ne!(small_arrow(&store, false), small_arrow(&store, true));
    }

    #[test]
    fn test_double_width_requires_loaded_font() {
        let mut store = GlyphStore::new();
        assert!(!store.is_double_width('中'));
        assert_eq!(store.lookup('中'), Glyph::Narrow(MISSING_GLYPH));

        store.install(DoubleWidthFont::chinese(chinese_blob()).unwrap());
        assert!(store.is_double_width('中'));
        assert_eq!(store.lookup('中'), Glyph::Wide('中'));
        assert_eq!(store.wide_glyph('中')[0], 0xffff);
        assert!(!store.is_double_width('A'));

        store.unload(FontId::Chinese);
        assert!(!store.is_double_width('中'));
    }

    #[test]
    fn test_japanese_index_lookup_and_language_order() {
        let mut store = GlyphStore::new();
        let (index, data) = japanese_blobs();
        store.install(DoubleWidthFont::japanese(&index, data).unwrap());
        store.install(DoubleWidthFont::chinese(chinese_blob()).unwrap());

        assert!(store.is_double_width('あ'));
        assert_eq!(store.wide_glyph('あ')[15], 0x0001);
        assert!(!store.is_double_width('い'));

        store.set_language(Language::Japanese);
        assert_eq!(store.language(), Language::Japanese);
        // falls through to the chinese table
        assert_eq!(store.wide_glyph('中')[0], 0xffff);
    }

    #[test]
    fn test_font_blobs_are_validated() {
        assert!(matches!(DoubleWidthFont::chinese(vec![0; 33]), Err(DisplayError::FontLoad(_))));
        assert!(DoubleWidthFont::chinese(Vec::new()).is_err());
        assert!(DoubleWidthFont::japanese(&[0; 10], Vec::new()).is_err());
    }

    #[test]
    fn test_short_chinese_blob_covers_prefix_only() {
        let font = DoubleWidthFont::chinese(vec![0; 2 * WIDE_GLYPH_BYTES]).unwrap();
        assert!(font.covers('\u{4e00}'));
        assert!(font.covers('\u{4e01}'));
        assert!(!font.covers('\u{4e02}'));
    }
}
