//! Input node to display node over the recorded wire

use morselink_core::test_utils::screen_capture::ScreenOp;
use morselink_core::{AlertDriver, ButtonRole, DisplayEvent, SosState};

use crate::scenarios::{bench_config, Rig};

#[test]
fn test_phrase_is_rendered_held_and_cleared() {
    let rig = Rig::default();
    let mut input = rig.input_node();
    let mut display = rig.display_node();
    input.start().unwrap();
    display.start().unwrap();
    rig.screen.clear_log();

    rig.key_in(&mut input, ".-");
    assert_eq!(rig.sent(), ["Yes"]);

    let before = rig.clock.peek();
    assert_eq!(rig.drain(&mut display), [DisplayEvent::Shown]);
    assert!(rig.clock.peek().since(before) >= rig.config.display_hold);
    assert_eq!(
        rig.screen.ops(),
        [ScreenOp::Render("Yes".into()), ScreenOp::Clear]
    );
}

#[test]
fn test_unknown_gesture_and_timeout_messages_are_shown() {
    let rig = Rig::default();
    let mut input = rig.input_node();
    let mut display = rig.display_node();

    rig.key_in(&mut input, "-.-.-");
    rig.press(&mut input, ButtonRole::Dot);
    rig.idle_input(&mut input, rig.config.sequence_timeout + 50, 25);

    assert_eq!(rig.sent(), ["No match found", "Cleared Sequence"]);
    assert_eq!(
        rig.drain(&mut display),
        [DisplayEvent::Shown, DisplayEvent::Shown]
    );
    assert_eq!(
        rig.screen.rendered(),
        ["No match found", "Cleared Sequence"]
    );
}

#[test]
fn test_sos_press_press_never_sends() {
    let rig = Rig::default();
    let mut input = rig.input_node();
    let mut display = rig.display_node();

    rig.press(&mut input, ButtonRole::Sos);
    assert!(matches!(input.sos_state(), SosState::Pending(_)));
    rig.press(&mut input, ButtonRole::Sos);
    assert!(input.sos_state().is_idle());
    rig.idle_input(&mut input, rig.config.sos_delay * 3, 50);

    assert!(rig.sent().is_empty());
    assert!(rig.drain(&mut display).is_empty());
    assert!(display.sos_state().is_idle());
}

#[test]
fn test_sos_press_wait_sends_once_and_sounds_siren() {
    let rig = Rig::default();
    let mut input = rig.input_node();
    let mut display = rig.display_node();
    let mut alerts = AlertDriver::from_config(&rig.config);

    rig.press(&mut input, ButtonRole::Sos);
    rig.idle_input(&mut input, rig.config.sos_delay * 3, 50);
    assert_eq!(rig.sent(), ["SOS!!!"]);

    assert_eq!(rig.drain(&mut display), [DisplayEvent::SosRaised]);
    assert!(matches!(display.sos_state(), SosState::Active(_)));
    assert_eq!(rig.screen.ops().last(), Some(&ScreenOp::Clear));

    let levels = rig.run_alerts(&mut alerts, rig.config.siren.start_delay + 100);
    assert!(levels.iter().any(|level| level.sos_led));
    assert!(levels.iter().any(|level| level.buzzer));
    assert!(!levels[0].buzzer, "siren waits for its start delay");
}

#[test]
fn test_reset_clears_sos_and_undo_indicator() {
    let mut config = bench_config();
    config.undo.led_on = 50_000;
    let rig = Rig::new(config);
    let mut input = rig.input_node();
    let mut display = rig.display_node();
    let mut alerts = AlertDriver::from_config(&rig.config);

    for _ in 0..4 {
        rig.press(&mut input, ButtonRole::Undo);
    }
    assert_eq!(rig.drain(&mut display), [DisplayEvent::Undo; 4]);
    assert!(display.undo_lit());
    assert!(rig.undo_led.level());

    rig.press(&mut input, ButtonRole::Sos);
    rig.idle_input(&mut input, rig.config.sos_delay + 50, 50);
    rig.press(&mut input, ButtonRole::Reset);
    assert_eq!(rig.sent().last().map(String::as_str), Some("RST"));

    let events = rig.drain(&mut display);
    assert_eq!(events, [DisplayEvent::SosRaised, DisplayEvent::Reset]);
    assert!(display.sos_state().is_idle());
    assert!(!display.undo_lit());
    assert!(!rig.undo_led.level());
    assert_eq!(rig.screen.ops().last(), Some(&ScreenOp::Clear));

    let levels = rig.run_alerts(&mut alerts, 50);
    assert!(levels.iter().all(|level| !level.buzzer && !level.sos_led));
}

#[test]
fn test_messages_while_sos_active_are_ignored() {
    let rig = Rig::default();
    let mut input = rig.input_node();
    let mut display = rig.display_node();

    rig.press(&mut input, ButtonRole::Sos);
    rig.idle_input(&mut input, rig.config.sos_delay + 50, 50);
    rig.key_in(&mut input, "...");
    rig.press(&mut input, ButtonRole::Undo);

    assert_eq!(
        rig.drain(&mut display),
        [
            DisplayEvent::SosRaised,
            DisplayEvent::Ignored,
            DisplayEvent::Ignored
        ]
    );
    assert!(rig.screen.rendered().is_empty());
    assert!(!display.undo_lit());
}

#[test]
fn test_undo_burst_lights_indicator_once() {
    // Longer than five UNDO frames take to decode on the bench wire
    let mut config = bench_config();
    config.undo.led_on = 5_000;
    let rig = Rig::new(config);
    let mut input = rig.input_node();
    let mut display = rig.display_node();

    for _ in 0..5 {
        rig.press(&mut input, ButtonRole::Undo);
    }
    assert_eq!(rig.drain(&mut display), [DisplayEvent::Undo; 5]);
    assert!(display.undo_lit());

    while display.undo_lit() {
        assert_eq!(display.poll(), Ok(DisplayEvent::Idle));
    }
    for _ in 0..20 {
        assert_eq!(display.poll(), Ok(DisplayEvent::Idle));
    }

    // One undo arrived after the log was cleared, below the threshold
    assert!(!display.undo_lit());
    assert_eq!(rig.undo_led.writes(), 2);
}

#[test]
fn test_bouncing_button_collapses_to_one_symbol() {
    let rig = Rig::default();
    let mut input = rig.input_node();

    rig.buttons.set(0, true);
    for _ in 0..5 {
        rig.latch.signal();
        input.poll().unwrap();
        rig.clock.advance(1);
    }
    rig.clock.advance(rig.config.debounce);
    input.poll().unwrap();
    rig.latch.signal();
    rig.buttons.release_all();
    rig.clock.advance(rig.config.debounce);
    input.poll().unwrap();
    input.poll().unwrap();

    assert_eq!(input.sequence(), ".");
    assert!(rig.sent().is_empty());
}

#[test]
fn test_undo_below_threshold_stays_dark() {
    let rig = Rig::default();
    let mut input = rig.input_node();
    let mut display = rig.display_node();

    for _ in 0..3 {
        rig.press(&mut input, ButtonRole::Undo);
    }
    assert_eq!(rig.drain(&mut display), [DisplayEvent::Undo; 3]);
    assert!(!display.undo_lit());
    assert_eq!(rig.screen.current().as_deref(), Some("UNDO"));
}

#[test]
fn test_releasing_a_button_does_not_repeat_a_held_one() {
    let rig = Rig::default();
    let mut input = rig.input_node();

    // Hold Dot
    rig.buttons.set(0, true);
    rig.latch.signal();
    input.poll().unwrap();
    rig.clock.advance(rig.config.debounce);
    input.poll().unwrap();
    assert_eq!(input.sequence(), ".");

    // Release Dot: only press edges reach the latch, so nothing is scanned
    rig.buttons.set(0, false);
    rig.clock.advance(rig.config.debounce);
    input.poll().unwrap();
    input.poll().unwrap();

    assert_eq!(input.sequence(), ".");
    assert!(rig.sent().is_empty());
}
