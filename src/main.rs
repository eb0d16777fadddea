/*
 *  main.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Render a screen to ASCII, PBM or a controller byte stream
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

use anyhow::{Context, Result, bail};
use chrono::{Local, Timelike};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use std::fs;

use monolcd::config::{self, Cli, PreviewArgs};
use monolcd::display::clock::{CLOCK_12HR, CLOCK_24HR};
use monolcd::display::drivers::{MockDelay, MockInterface};
use monolcd::glyphs::BITMASK_ALARM;
use monolcd::display::{
    ClockFlags, ClockState, EngineContext, InitOptions, LineKind, ScreenCursor, ScreenLine,
    SmallClockState, Transmitter,
};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `HH:MM` as (hours, minutes).
fn parse_hhmm(s: &str) -> Result<(i32, i32)> {
    let (h, m) = s
        .split_once(':')
        .with_context(|| format!("expected HH:MM, got '{}'", s))?;
    let hours: i32 = h.trim().parse().with_context(|| format!("bad hours in '{}'", s))?;
    let minutes: i32 = m.trim().parse().with_context(|| format!("bad minutes in '{}'", s))?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        bail!("time out of range: '{}'", s);
    }
    Ok((hours, minutes))
}

fn draw_text_screen(engine: &mut EngineContext, preview: &PreviewArgs) {
    let mut lines: Vec<ScreenLine<'_>> = preview
        .lines
        .iter()
        .enumerate()
        .map(|(row, text)| {
            let kind = if preview.inverted.contains(&row) { LineKind::InvertedText } else { LineKind::Text };
            ScreenLine::text(text).with_kind(kind)
        })
        .collect();
    if let Some(id) = preview.barcode.as_deref() {
        lines.push(ScreenLine::text(id).with_kind(LineKind::Barcode));
    }
    let cursor = match preview.cursor.as_slice() {
        [x, y, width] => Some(ScreenCursor { x: *x, y: *y, width: *width }),
        _ => None,
    };
    // rows that fail are logged and left blank, the rest still draw
    if let Err(e) = engine.draw_screen(&lines, cursor) {
        error!("draw screen: {}", e);
    }
}

fn draw_clock_screen(engine: &mut EngineContext, preview: &PreviewArgs) -> Result<()> {
    let now = Local::now();
    let (hours, minutes) = match preview.time.as_deref() {
        Some(t) => parse_hhmm(t)?,
        None => (now.hour() as i32, now.minute() as i32),
    };
    let (alarm, alarm_hours, alarm_minutes) = match preview.alarm.as_deref() {
        Some(a) => {
            let (h, m) = parse_hhmm(a)?;
            (BITMASK_ALARM, h, m)
        }
        None => (0, 0, 0),
    };
    let date = preview
        .date
        .clone()
        .unwrap_or_else(|| now.format("%a %e %b").to_string());
    let flags = ClockFlags(if preview.twelve_hour { CLOCK_12HR } else { CLOCK_24HR });

    let state = ClockState {
        hours,
        minutes,
        seconds: now.second() as i32,
        flags,
        alarm,
        alarm_hours,
        alarm_minutes,
        date: Some(date.as_str()),
    };
    engine.draw_clock(&state).context("draw clock")?;
    Ok(())
}

fn render(engine: &mut EngineContext, preview: &PreviewArgs) -> Result<()> {
    if preview.zoom {
        let (rows, cols) = engine.set_zoom(true).context("zoom")?;
        info!("zoomed to {}x{}", rows, cols);
    }

    if preview.clock {
        draw_clock_screen(engine, preview)?;
    } else {
        draw_text_screen(engine, preview);
    }

    if let Some(position) = preview.small_clock {
        let now = Local::now();
        let (hours, minutes) = match preview.time.as_deref() {
            Some(t) => parse_hhmm(t)?,
            None => (now.hour() as i32, now.minute() as i32),
        };
        let flags = ClockFlags(if preview.twelve_hour { CLOCK_12HR } else { CLOCK_24HR });
        let state = SmallClockState { hours, minutes, flags, position };
        if let Err(e) = engine.draw_small_clock(&state) {
            warn!("small clock: {}", e);
        }
    }
    if let Some(mask) = preview.icons {
        if let Err(e) = engine.draw_icons(mask) {
            warn!("icons: {}", e);
        }
    }
    if let Some(level) = preview.signal {
        if let Err(e) = engine.draw_signal_strength(level) {
            warn!("signal strength: {}", e);
        }
    }
    Ok(())
}

/// Init plus one flush through the recording interface.
fn dump_stream(engine: &mut EngineContext) -> Result<String> {
    let mock = MockInterface::new();
    let state = mock.state();
    let mut tx = Transmitter::new(mock);
    let mut delay = MockDelay::default();
    let hw = engine.hardware().clone();
    tx.init(&hw, &InitOptions::default(), &mut delay).context("controller init")?;
    tx.flush(engine).context("flush")?;
    info!("init waited {}ms", delay.total_ms());
    let dump = state
        .lock()
        .map_err(|_| anyhow::anyhow!("mock interface lock poisoned"))?
        .dump();
    Ok(dump)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli).context("loading configuration")?;

    let log_level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    if cli.dump_config {
        println!("{}", serde_yaml::to_string(&cfg).context("serialising config")?);
        return Ok(());
    }

    info!("This {} worth the squeeze", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let display = cfg.display.clone().unwrap_or_default();
    let hw = display.hardware_profile()?;
    let mut engine = EngineContext::init(hw, &display.engine_settings()).context("display init")?;

    if let Some(fonts) = cfg.fonts.as_ref() {
        if let Err(e) = fonts.load_into(&mut engine) {
            error!("font load: {}", e);
        }
    }
    if let Some(level) = display.contrast {
        if let Err(e) = engine.set_contrast(i32::from(level)) {
            warn!("contrast: {}", e);
        }
    }

    render(&mut engine, &cli.preview)?;

    if cli.preview.dump_stream {
        print!("{}", dump_stream(&mut engine)?);
    } else if let Some(path) = cli.preview.pbm.as_ref() {
        fs::write(path, engine.framebuffer().to_pbm())
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    } else {
        print!("{}", engine.framebuffer().to_ascii());
    }
    Ok(())
}
