/*
 *  display/drivers/mock.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Recording display interface and delay for tests and previews
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

use display_interface::{DataFormat, DisplayError as InterfaceError, WriteOnlyDataCommand};
use embedded_hal::delay::DelayNs;

use crate::constants::{
    CTL_SET_COL_LSB, CTL_SET_COL_MSB, CTL_SET_PAGE, CTL_SET_REF_V, GREY_SET_COLUMN, GREY_SET_ROW,
};
use crate::display::hardware::HardwareProfile;

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

/// Page and column address space of the emulated controller RAM.
const RAM_PAGES: usize = 16;
const RAM_COLUMNS: usize = 256;

/// One call on the bus, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Command(Vec<u8>),
    Data(Vec<u8>),
}

/// What the mock has seen (shared for inspection in tests)
#[derive(Debug)]
pub struct MockSinkState {
    pub events: Vec<SinkEvent>,

    /// Number of command calls
    pub command_count: usize,

    /// Total data bytes written
    pub data_bytes: usize,

    /// Simulate bus failures (for error testing)
    pub simulate_failure: bool,

    /// Page addressed controller RAM, `page * 256 + column`, bit 0 on top
    ram: Vec<u8>,
    page: usize,
    column: usize,
}

impl Default for MockSinkState {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            command_count: 0,
            data_bytes: 0,
            simulate_failure: false,
            ram: vec![0; RAM_PAGES * RAM_COLUMNS],
            page: 0,
            column: 0,
        }
    }
}

impl MockSinkState {
    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|ev| match ev {
                SinkEvent::Command(c) => Some(c.clone()),
                SinkEvent::Data(_) => None,
            })
            .collect()
    }

    /// Tracks page/column addressing the way a page mode controller does.
    fn apply_command(&mut self, bytes: &[u8]) {
        // operand carrying commands arrive whole
        if let [CTL_SET_REF_V, _] | [GREY_SET_COLUMN, _, _] | [GREY_SET_ROW, _, _] = bytes {
            return;
        }
        for &b in bytes {
            match b {
                _ if b & 0xf0 == CTL_SET_PAGE => self.page = usize::from(b & 0x0f),
                _ if b & 0xf0 == CTL_SET_COL_MSB => {
                    self.column = (self.column & 0x0f) | (usize::from(b & 0x0f) << 4);
                }
                _ if b & 0xf0 == CTL_SET_COL_LSB => {
                    self.column = (self.column & 0xf0) | usize::from(b & 0x0f);
                }
                _ => {}
            }
        }
    }

    fn apply_data(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.column < RAM_COLUMNS {
                self.ram[self.page * RAM_COLUMNS + self.column] = b;
            }
            self.column += 1;
        }
    }

    /// Pixel (x, y) as the panel shows it after page mode writes.
    pub fn panel_pixel(&self, hw: &HardwareProfile, x: usize, y: usize) -> bool {
        let row = y + hw.y_offset;
        let page = usize::from(hw.row_lookup.hardware_page(row / 8));
        let bit = if hw.flip_bits { row % 8 } else { 7 - row % 8 };
        self.ram
            .get(page * RAM_COLUMNS + x + hw.x_offset)
            .is_some_and(|b| b & (1 << bit) != 0)
    }

    /// Hex dump of the bus traffic, one call per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for ev in &self.events {
            let (tag, bytes) = match ev {
                SinkEvent::Command(b) => ("C", b),
                SinkEvent::Data(b) => ("D", b),
            };
            let _ = write!(out, "{}", tag);
            for b in bytes {
                let _ = write!(out, " {:02x}", b);
            }
            out.push('\n');
        }
        out
    }
}

/// Display interface that records instead of driving pins.
#[derive(Debug, Clone, Default)]
pub struct MockInterface {
    state: Arc<Mutex<MockSinkState>>,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockSinkState>> {
        Arc::clone(&self.state)
    }

    /// Reset recorded traffic (useful between tests)
    pub fn reset_state(&self) -> Result<(), InterfaceError> {
        let mut state = self.state.lock().map_err(|_| InterfaceError::BusWriteError)?;
        *state = MockSinkState::default();
        Ok(())
    }

    fn record(&mut self, command: bool, format: DataFormat<'_>) -> Result<(), InterfaceError> {
        let bytes = match format {
            DataFormat::U8(b) => b.to_vec(),
            DataFormat::U8Iter(iter) => iter.collect(),
            _ => return Err(InterfaceError::DataFormatNotImplemented),
        };
        let mut state = self.state.lock().map_err(|_| InterfaceError::BusWriteError)?;
        if state.simulate_failure {
            return Err(InterfaceError::BusWriteError);
        }
        if command {
            state.command_count += 1;
            state.apply_command(&bytes);
            state.events.push(SinkEvent::Command(bytes));
        } else {
            state.data_bytes += bytes.len();
            state.apply_data(&bytes);
            state.events.push(SinkEvent::Data(bytes));
        }
        Ok(())
    }
}

impl WriteOnlyDataCommand for MockInterface {
    fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), InterfaceError> {
        self.record(true, cmd)
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), InterfaceError> {
        self.record(false, buf)
    }
}

/// Delay that only adds up what it was asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDelay {
    total_ns: u64,
}

impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::traits::HardwareSink;

    #[test]
    fn test_mock_records_in_order() {
        let mut mock = MockInterface::new();
        mock.command(&[0xb0]).unwrap();
        mock.data(&[1, 2, 3]).unwrap();
        let state = mock.state();
        let state = state.lock().unwrap();
        assert_eq!(state.events, vec![SinkEvent::Command(vec![0xb0]), SinkEvent::Data(vec![1, 2, 3])]);
        assert_eq!(state.command_count, 1);
        assert_eq!(state.data_bytes, 3);
        assert_eq!(state.dump(), "C b0\nD 01 02 03\n");
    }

    #[test]
    fn test_mock_addressing() {
        let mut mock = MockInterface::new();
        mock.command(&[CTL_SET_PAGE | 3]).unwrap();
        mock.command(&[CTL_SET_COL_MSB | 1, CTL_SET_COL_LSB | 2]).unwrap();
        mock.data(&[0x01]).unwrap();
        // contrast value must not move the column
        mock.command(&[CTL_SET_REF_V, 0x05]).unwrap();
        mock.data(&[0x80]).unwrap();

        let hw = HardwareProfile::by_name("tm13264cbcg").unwrap();
        let state = mock.state();
        let state = state.lock().unwrap();
        assert!(state.panel_pixel(&hw, 18, 24));
        assert!(state.panel_pixel(&hw, 19, 31));
        assert!(!state.panel_pixel(&hw, 19, 24));
    }

    #[test]
    fn test_mock_simulated_failure_and_reset() {
        let mut mock = MockInterface::new();
        mock.state().lock().unwrap().simulate_failure = true;
        assert!(mock.data(&[0]).is_err());
        mock.reset_state().unwrap();
        assert!(mock.data(&[0]).is_ok());
    }

    #[test]
    fn test_mock_delay_totals() {
        let mut delay = MockDelay::default();
        delay.delay_ms(2);
        delay.delay_us(500);
        delay.delay_ms(100);
        assert_eq!(delay.total_ms(), 102);
    }
}
