/*
 *  tests/transmit_integration.rs
 *
 *  Framebuffer to controller RAM through the recording interface
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 */

use monolcd::config::parse_yaml;
use monolcd::display::drivers::{MockDelay, MockInterface, SinkEvent};
use monolcd::display::{
    EngineContext, EngineSettings, HardwareProfile, InitOptions, LineKind, ModeTable, ScreenLine,
    Transmitter,
};

/// First mode the panel accepts, drawn with a few busy lines.
fn busy_engine(hw: &HardwareProfile) -> Option<EngineContext> {
    let mut engine = (0..ModeTable::standard().len())
        .find_map(|mode| EngineContext::init(hw.clone(), &EngineSettings { mode, ..Default::default() }).ok())?;
    let lines = [
        ScreenLine::text("monolcd 0123"),
        ScreenLine::text("SQUEEZE").with_kind(LineKind::InvertedText),
        ScreenLine::text("worth it"),
    ];
    let _ = engine.draw_screen(&lines, None);
    Some(engine)
}

#[test]
fn test_panel_matches_framebuffer_on_every_mono_profile() {
    for name in HardwareProfile::names() {
        let hw = HardwareProfile::by_name(name).unwrap();
        if hw.greyscale {
            continue;
        }
        let mut engine = busy_engine(&hw).unwrap_or_else(|| panic!("{} accepts no mode", name));
        let mock = MockInterface::new();
        let state = mock.state();
        let mut tx = Transmitter::new(mock);
        tx.flush(&mut engine).unwrap();

        let state = state.lock().unwrap();
        let fb = engine.framebuffer();
        assert!(fb.count_on_pixels() > 0, "{}", name);
        for y in 0..fb.height_px() {
            for x in 0..fb.visible_width() {
                assert_eq!(state.panel_pixel(&hw, x, y), fb.get_pixel(x, y), "{} at ({}, {})", name, x, y);
            }
        }
    }
}

#[test]
fn test_init_then_flush_stream_shape() {
    let hw = HardwareProfile::by_name("tm13264cbcg").unwrap();
    let mut engine = busy_engine(&hw).unwrap();
    engine.set_contrast(50).unwrap();

    let mock = MockInterface::new();
    let state = mock.state();
    let mut tx = Transmitter::new(mock);
    let mut delay = MockDelay::default();
    tx.init(&hw, &InitOptions::default(), &mut delay).unwrap();
    state.lock().unwrap().events.clear();

    tx.flush(&mut engine).unwrap();
    let state = state.lock().unwrap();
    // contrast leads, then one address and data run per page
    assert_eq!(state.events[0], SinkEvent::Command(vec![0x81, 50 * 0x3f / 100]));
    let data: Vec<usize> = state
        .events
        .iter()
        .filter_map(|ev| match ev {
            SinkEvent::Data(d) => Some(d.len()),
            SinkEvent::Command(_) => None,
        })
        .collect();
    assert_eq!(data, vec![hw.width_px; hw.height_bytes()]);

    // nothing pending, nothing resent
    drop(state);
    assert_eq!(engine.take_contrast(), None);
}

#[test]
fn test_yaml_profile_end_to_end() {
    let cfg = parse_yaml("display:\n  hardware: amax_kdc162a28\n  mode: 4\n").unwrap();
    monolcd::config::validate(&cfg).unwrap();
    let display = cfg.display.unwrap();
    let hw = display.hardware_profile().unwrap();
    let mut engine = EngineContext::init(hw.clone(), &display.engine_settings()).unwrap();
    engine.draw_screen(&[ScreenLine::text("AMAX"), ScreenLine::text("KDC162")], None).unwrap();

    let mock = MockInterface::new();
    let state = mock.state();
    Transmitter::new(mock).flush(&mut engine).unwrap();
    let state = state.lock().unwrap();
    // rows above the offset are never sent
    let pages = hw.height_bytes() - hw.y_offset / 8;
    assert_eq!(state.data_bytes, pages * hw.width_px);
}
