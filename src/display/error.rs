/*
 *  display/error.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the rendering engine
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

use std::fmt;
use std::error::Error;

/// Unified error type for all display operations
#[derive(Debug)]
pub enum DisplayError {
    /// Text was not valid UTF-8 (drawing paths truncate instead)
    InvalidUtf8 { valid_up_to: usize },

    /// Double-width glyph requested in a font that cannot draw it
    UnsupportedGlyphForFont,

    /// Barcode has significant digits beyond the displayable length
    BarcodeTooLong { len: usize, max: usize },

    /// Barcode character is not a hex digit
    BarcodeInvalidDigit(char),

    /// Active mode has no clock layout
    UnsupportedClockLayout,

    /// Operation not available in the active mode
    NotSupported(&'static str),

    /// A blit would have touched bytes outside the framebuffer
    BufferOverrun { offset: usize, len: usize },

    /// Mode id not present in the mode table
    UnknownDisplayMode(usize),

    /// Hardware profile name not present in the profile table
    UnknownHardware(String),

    /// Argument outside its accepted range
    InvalidArgument(String),

    /// Invalid configuration
    InvalidConfiguration(String),

    /// Double-width font blob could not be used
    FontLoad(String),

    /// Display interface error
    InterfaceError(display_interface::DisplayError),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InvalidUtf8 { valid_up_to } =>
                write!(f, "Invalid UTF-8 after byte {}", valid_up_to),
            DisplayError::UnsupportedGlyphForFont =>
                write!(f, "Double-width glyph not supported by this font"),
            DisplayError::BarcodeTooLong { len, max } =>
                write!(f, "Barcode too long: {} significant digits, at most {}", len, max),
            DisplayError::BarcodeInvalidDigit(c) =>
                write!(f, "Barcode digit {:?} is not hexadecimal", c),
            DisplayError::UnsupportedClockLayout =>
                write!(f, "Clock not supported in this display mode"),
            DisplayError::NotSupported(what) =>
                write!(f, "{} not supported in this display mode", what),
            DisplayError::BufferOverrun { offset, len } =>
                write!(f, "Framebuffer overrun: byte {} of {}", offset, len),
            DisplayError::UnknownDisplayMode(mode) =>
                write!(f, "Unknown display mode {}", mode),
            DisplayError::UnknownHardware(name) =>
                write!(f, "Unknown hardware profile '{}'", name),
            DisplayError::InvalidArgument(msg) =>
                write!(f, "Invalid argument: {}", msg),
            DisplayError::InvalidConfiguration(msg) =>
                write!(f, "Invalid configuration: {}", msg),
            DisplayError::FontLoad(msg) =>
                write!(f, "Font load failed: {}", msg),
            DisplayError::InterfaceError(err) =>
                write!(f, "Display interface error: {:?}", err),
        }
    }
}

impl Error for DisplayError {
    // display_interface::DisplayError doesn't implement std::error::Error
    // so we can't provide it as a source
}

// Conversion from display_interface::DisplayError
impl From<display_interface::DisplayError> for DisplayError {
    fn from(err: display_interface::DisplayError) -> Self {
        DisplayError::InterfaceError(err)
    }
}
