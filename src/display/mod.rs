/*
 *  display/mod.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - framebuffer, renderers and controller transmit
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

// Core trait definitions
pub mod traits;
pub mod error;

// Panels and their text grids
pub mod hardware;
pub mod mode;

// Drawing
pub mod framebuffer;
pub mod fonts;
pub mod text;
pub mod barcode;
pub mod icons;
pub mod clock;

// Shared state and the drawing entry points
pub mod engine;

// Controller byte stream
pub mod transmit;
pub mod drivers;

// Re-export commonly used types
pub use traits::{DisplayCapabilities, HardwareSink};
pub use error::DisplayError;
pub use hardware::{HardwareOverride, HardwareProfile, RowLookup};
pub use mode::{ClockLayout, DisplayModeProfile, FontKind, IconKind, ModeOverride, ModeTable};
pub use framebuffer::{Bitmap, FrameBuffer};
pub use fonts::{DoubleWidthFont, GlyphStore, Language};
pub use text::ArrowFlags;
pub use clock::{ClockFlags, ClockState, SmallClockState};
pub use engine::{EngineContext, EngineSettings, LineKind, ScreenCursor, ScreenLine};
pub use transmit::{InitOptions, Transmitter};
