// Scripted bench session: both nodes on one virtual wire

use morselink_core::{ButtonRole, DisplayEvent, VERSION};
use morselink_tests::scenarios::Rig;

fn main() {
    println!("🧪 Morselink bench session (core {VERSION})");

    let rig = Rig::default();
    let mut input = rig.input_node();
    let mut display = rig.display_node();
    if let Err(error) = input.start() {
        eprintln!("input node failed to start: {error}");
        return;
    }
    if let Err(error) = display.start() {
        eprintln!("display node failed to start: {error}");
        return;
    }

    // Gesture phrases
    for gesture in [".-", "-.", "...", "-.-.-"] {
        rig.key_in(&mut input, gesture);
        report(&rig, &mut display, &format!("gesture {gesture}"));
    }

    // Undo burst
    for _ in 0..4 {
        rig.press(&mut input, ButtonRole::Undo);
    }
    report(&rig, &mut display, "undo burst");
    println!("    undo LED lit: {}", display.undo_lit());

    // Delayed SOS, then reset
    rig.press(&mut input, ButtonRole::Sos);
    rig.idle_input(&mut input, rig.config.sos_delay + 50, 50);
    report(&rig, &mut display, "SOS");
    println!("    SOS state: {:?}", display.sos_state());

    rig.press(&mut input, ButtonRole::Reset);
    report(&rig, &mut display, "reset");
    println!("    SOS state: {:?}", display.sos_state());

    println!();
    println!("📡 Frames on the wire: {}", rig.sent().len());
    println!("📝 Run the assertions with: cargo test -p morselink-tests");
}

fn report(rig: &Rig, display: &mut morselink_tests::scenarios::BenchDisplay<'_>, label: &str) {
    let events: Vec<DisplayEvent> = rig.drain(display);
    println!("  ✅ {label}: {events:?}");
    if let Some(text) = rig.screen.rendered().last() {
        println!("    last rendered: {text:?}");
    }
}
