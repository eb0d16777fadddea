/*
 *  display/transmit.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Streams the framebuffer to page addressed LCD and greyscale OLED controllers
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

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::constants::*;
use crate::display::engine::EngineContext;
use crate::display::error::DisplayError;
use crate::display::framebuffer::FrameBuffer;
use crate::display::hardware::HardwareProfile;
use crate::display::traits::HardwareSink;

const POWER_STEP_MS: u32 = 2;
const POWER_SETTLE_MS: u32 = 100;
const DISPLAY_ON_MS: u32 = 10;

/// Controller wiring choices made at init.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// bit 0 reverses segments, bit 1 restores normal common scan
    pub segment_remap: u8,
    pub alternate_bias: bool,
    pub reversed_pixels: bool,
}

/// Owns the bus and turns framebuffer state into controller traffic.
#[derive(Debug)]
pub struct Transmitter<S> {
    sink: S,
}

impl<S: HardwareSink> Transmitter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Releases the bus.
    pub fn release(self) -> S {
        self.sink
    }

    /// Register setup, blank screen, display on.
    ///
    /// Greyscale panels skip the LCD bias and power sequence.
    pub fn init<D: DelayNs>(
        &mut self,
        hw: &HardwareProfile,
        options: &InitOptions,
        delay: &mut D,
    ) -> Result<(), DisplayError> {
        info!("init {} controller", hw.name);
        let adc = if options.segment_remap & 1 != 0 { CTL_ADC_SEG_REVERSE } else { CTL_ADC_SEG_NORMAL };
        let shl = if options.segment_remap & 2 != 0 { CTL_SHL_SEG_NORMAL } else { CTL_SHL_SEG_REVERSE };
        self.sink.command(&[adc])?;
        self.sink.command(&[shl])?;

        if !hw.greyscale {
            let bias = if options.alternate_bias { CTL_LCD_BIAS_0 } else { CTL_LCD_BIAS_1 };
            let pixels = if options.reversed_pixels { CTL_PIX_REVERSED_ON } else { CTL_PIX_REVERSED_OFF };
            self.sink.command(&[bias])?;
            self.sink.command(&[pixels])?;

            // converter, regulator, follower, each given time to come up
            self.sink.command(&[CTL_POWER | CTL_POWER_VC])?;
            delay.delay_ms(POWER_STEP_MS);
            self.sink.command(&[CTL_POWER | CTL_POWER_VC | CTL_POWER_VR])?;
            delay.delay_ms(POWER_STEP_MS);
            self.sink.command(&[CTL_POWER | CTL_POWER_VC | CTL_POWER_VR | CTL_POWER_VF])?;

            self.sink.command(&[hw.regulator_resistor])?;
            self.sink.command(&[CTL_SET_REF_V, hw.reference_v])?;
            delay.delay_ms(POWER_SETTLE_MS);
        }

        self.sink.command(&[CTL_SET_INIT_LINE])?;
        self.sink.command(&[CTL_SET_PAGE])?;
        self.sink.command(&[CTL_SET_COL_MSB, CTL_SET_COL_LSB])?;

        self.write_frame(&FrameBuffer::new(hw), hw, MAX_GREYSCALE_LEVEL)?;

        self.sink.command(&[CTL_DISPLAY_ON])?;
        delay.delay_ms(DISPLAY_ON_MS);
        Ok(())
    }

    /// Sends any due contrast change, then the whole framebuffer.
    pub fn flush(&mut self, engine: &mut EngineContext) -> Result<(), DisplayError> {
        if let Some(value) = engine.take_contrast() {
            self.send_contrast(value)?;
        }
        self.write_frame(engine.framebuffer(), engine.hardware(), engine.greyscale_level())
    }

    pub fn write_frame(&mut self, fb: &FrameBuffer, hw: &HardwareProfile, grey: u8) -> Result<(), DisplayError> {
        if hw.greyscale {
            self.write_greyscale(fb, grey)
        } else {
            self.write_pages(fb, hw)
        }
    }

    /// One page at a time through the row lookup. Columns from the x offset on.
    pub fn write_pages(&mut self, fb: &FrameBuffer, hw: &HardwareProfile) -> Result<(), DisplayError> {
        let hb = fb.height_bytes();
        let bytes = fb.as_bytes();
        let x = fb.x_offset();
        let mut line = Vec::with_capacity(fb.visible_width());

        for page in fb.y_offset() / 8..hb {
            let hw_page = hw.row_lookup.hardware_page(page);
            self.sink.command(&[CTL_SET_PAGE | (hw_page & 0x0f)])?;
            self.sink.command(&[
                CTL_SET_COL_MSB | ((x >> 4) & 0x0f) as u8,
                CTL_SET_COL_LSB | (x & 0x0f) as u8,
            ])?;

            line.clear();
            line.extend(
                bytes[x * hb..]
                    .iter()
                    .skip(page)
                    .step_by(hb)
                    .map(|&b| if hw.flip_bits { b.reverse_bits() } else { b }),
            );
            self.sink.data(&line)?;
        }
        Ok(())
    }

    /// Row by row, two pixels per byte at level `grey` (0..=15).
    pub fn write_greyscale(&mut self, fb: &FrameBuffer, grey: u8) -> Result<(), DisplayError> {
        let grey = grey.min(MAX_GREYSCALE_LEVEL);
        let hb = fb.height_bytes();
        let bytes = fb.as_bytes();
        let x = fb.x_offset();
        let mut line = Vec::with_capacity(fb.visible_width().div_ceil(2));
        debug!("greyscale flush at level {}", grey);

        for row in fb.y_offset()..hb * 8 {
            self.sink.command(&[GREY_SET_COLUMN, (x / 2) as u8, GREY_ADDRESS_END])?;
            self.sink.command(&[GREY_SET_ROW, row as u8, GREY_ADDRESS_END])?;

            let bit = 0x80 >> (row % 8);
            let lit = |col: usize| bytes.get(col * hb + row / 8).is_some_and(|b| b & bit != 0);
            line.clear();
            line.extend((x..fb.width_px()).step_by(2).map(|col| {
                let left = if lit(col) { grey << 4 } else { 0 };
                let right = if col + 1 < fb.width_px() && lit(col + 1) { grey } else { 0 };
                left | right
            }));
            self.sink.data(&line)?;
        }
        Ok(())
    }

    pub fn send_contrast(&mut self, value: u8) -> Result<(), DisplayError> {
        debug!("contrast register {:#04x}", value);
        self.sink.command(&[CTL_SET_REF_V, value])
    }

    pub fn power_off(&mut self) -> Result<(), DisplayError> {
        info!("display off");
        self.sink.command(&[CTL_DISPLAY_OFF])
    }
}
