/*
 *  display/traits.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Hardware sink seam and capability reporting
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

use display_interface::{DataFormat, WriteOnlyDataCommand};
use crate::display::error::DisplayError;

/// Capabilities of the active hardware + mode combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCapabilities {
    /// Panel width in pixels
    pub width: usize,

    /// Panel height in pixels
    pub height: usize,

    /// Text rows in the active mode
    pub char_rows: usize,

    /// Text columns in the active mode
    pub char_cols: usize,

    /// Lines may be drawn inverted
    pub inverted_text: bool,

    /// Mode reserves arrow columns
    pub arrows: bool,

    /// Bitmaps can be grabbed and replayed
    pub graphics: bool,

    /// Mode has a zoom target
    pub zoom: bool,

    /// Mode has a big clock layout
    pub clock: bool,

    /// Mode has a status line clock
    pub small_clock: bool,

    /// Mode draws an icon row
    pub icons: bool,

    /// Panel is a 4 bit greyscale OLED
    pub greyscale: bool,

    /// Panel has a contrast register
    pub contrast: bool,
}

/// Where the transmit path puts bytes.
///
/// Commands go out with register-select low, data with it high. Timing is the
/// implementor's business; calls must reach the wire in the order made.
pub trait HardwareSink {
    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError>;
    fn data(&mut self, bytes: &[u8]) -> Result<(), DisplayError>;
}

// Any display-interface bus (SPI, I2C, parallel GPIO) can act as a sink
impl<T: WriteOnlyDataCommand> HardwareSink for T {
    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.send_commands(DataFormat::U8(bytes))?;
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.send_data(DataFormat::U8(bytes))?;
        Ok(())
    }
}
