//! Behavior of the parsed command model as seen by library users
use std::time::Duration;

use gcode_model::command::variant::ProgressMode;
use gcode_model::parser::{classify, Classified};
use gcode_model::{
    create_command, parse_line, render, CommandKind, DiagnosticCode, FieldValue, Firmware,
    ParsedLine, Severity, ToolId, TypedCommand, Variant,
};

#[test]
fn test_whitespace_and_comment_classification() {
    assert_eq!(classify(""), Classified::Whitespace);
    assert_eq!(classify("   "), Classified::Whitespace);
    assert_eq!(classify("; hello"), Classified::Comment("; hello"));
    assert_eq!(
        parse_line("; hello"),
        ParsedLine::Comment {
            text: "; hello".to_string()
        }
    );
}

#[test]
fn test_linear_move() {
    let command = create_command("G1 X10 Y-5.5 F1200").unwrap();
    assert!(command.diagnostics().is_empty());

    let TypedCommand::LinearMove(view) = command.typed() else {
        panic!("expected a linear move");
    };
    assert!(view.is_linear_move());
    assert_eq!(view.x(), Some(10.0));
    assert_eq!(view.y(), Some(-5.5));
    assert_eq!(view.f(), Some(1200.0));
    assert_eq!(view.z(), None);
}

#[test]
fn test_negative_temperature_is_kept_with_one_diagnostic() {
    let command = create_command("M104 S-10").unwrap();
    let TypedCommand::SetExtruderTemperature(view) = command.typed() else {
        panic!("expected a temperature command");
    };
    assert_eq!(view.temperature(), Some(-10));

    let diagnostics: Vec<_> = command.diagnostics().iter().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::OutOfRange);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].context, "M104 S-10");
}

#[test]
fn test_prusa_build_percentage_pairs() {
    let command = create_command("M73 P50 R12").unwrap();
    let Some(Variant::PrusaBuildPercentage(view)) = command.variant() else {
        panic!("expected the Prusa variant");
    };
    assert!(view.is_regular_percentage());
    assert_eq!(view.percentage_complete(), Some(50));
    assert_eq!(view.minutes_remaining(), Some(12));
    assert_eq!(command.variant().unwrap().firmware(), Firmware::Prusa);

    let command = create_command("M73 Q30 S8").unwrap();
    let view = command.prusa_build_percentage().unwrap();
    assert!(!view.is_regular_percentage());
    assert_eq!(view.mode(), ProgressMode::Silent);
    assert_eq!(view.percentage_complete(), Some(30));
    assert_eq!(view.minutes_remaining(), Some(8));
}

#[test]
fn test_variant_resolution_leaves_command_untouched() {
    let command = create_command("M73 P50 R12").unwrap();
    let before = command.clone();
    let _ = command.variant();
    assert_eq!(command, before);

    let TypedCommand::SetBuildPercentage(view) = command.typed() else {
        panic!("expected build percentage");
    };
    assert_eq!(view.percentage_complete(), Some(50));
}

#[test]
fn test_tool_changes() {
    let command = create_command("T?").unwrap();
    let TypedCommand::ToolChange(view) = command.typed() else {
        panic!("expected a tool change");
    };
    assert!(view.user_request_mmu_selection());
    assert_eq!(view.tool(), ToolId::Ask);

    let command = create_command("T2").unwrap();
    assert_eq!(command.tool(), Some(ToolId::Index(2)));
    assert_eq!(command.tool().and_then(|tool| tool.index()), Some(2));
    assert_eq!(command.kind(), CommandKind::ToolChange);

    let command = create_command("tx").unwrap();
    assert_eq!(command.tool(), Some(ToolId::LoadToGears));
    assert_eq!(command.code(), "Tx");

    let command = create_command("T3 P4").unwrap();
    let TypedCommand::ToolChange(view) = command.typed() else {
        panic!("expected a tool change");
    };
    assert_eq!(view.macros(), Some(4));
}

#[test]
fn test_unknown_field_dropped_with_one_diagnostic() {
    let command = create_command("G1 Q5").unwrap();
    assert!(command.fields().is_empty());
    assert_eq!(command.diagnostics().len(), 1);
    assert!(command.diagnostics().contains(DiagnosticCode::UnknownField));
    assert_eq!(render(&command), "G1");
}

#[test]
fn test_unregistered_code_is_not_a_known_command() {
    assert!(create_command("M999 X1").is_none());

    let ParsedLine::Command(command) = parse_line("M999 X1") else {
        panic!("expected a command line");
    };
    assert!(!command.is_recognized());
    assert_eq!(command.kind(), CommandKind::Unrecognized);
}

#[test]
fn test_structural_errors_never_abort() {
    let ParsedLine::Command(command) = parse_line("123 X1") else {
        panic!("expected a command line");
    };
    assert_eq!(command.kind(), CommandKind::Malformed);
    assert_eq!(command.code(), "<err>");
    assert!(command.diagnostics().has_errors());
    assert_eq!(render(&command), "123 X1");
}

#[test]
fn test_extruder_choice() {
    let command = create_command("M109 S215 T1").unwrap();
    assert_eq!(command.extruder_index(), Some(1));
    let TypedCommand::WaitExtruderTemperature(view) = command.typed() else {
        panic!("expected wait temperature");
    };
    assert_eq!(view.temperature(), Some(215));
    assert!(!view.waits_for_cooling());

    let command = create_command("M104 S215 T-1").unwrap();
    assert_eq!(command.extruder_index(), Some(-1));
    assert!(command.diagnostics().contains(DiagnosticCode::OutOfRange));

    let command = create_command("M140 S60").unwrap();
    assert_eq!(command.extruder_index(), None);
}

#[test]
fn test_dwell_units() {
    let command = create_command("G4 P250").unwrap();
    let TypedCommand::Dwell(view) = command.typed() else {
        panic!("expected dwell");
    };
    assert_eq!(view.duration(), Some(Duration::from_millis(250)));

    let command = create_command("G4 S1.5").unwrap();
    let TypedCommand::Dwell(view) = command.typed() else {
        panic!("expected dwell");
    };
    assert_eq!(view.duration(), Some(Duration::from_millis(1500)));

    // Parses cleanly but does not fit a Duration
    let command = create_command("G4 S1e20").unwrap();
    assert!(command.diagnostics().is_empty());
    let TypedCommand::Dwell(view) = command.typed() else {
        panic!("expected dwell");
    };
    assert_eq!(view.duration(), None);
}

#[test]
fn test_default_acceleration_legacy_and_current_forms() {
    let command = create_command("M204 S1500 T800").unwrap();
    let TypedCommand::DefaultAcceleration(view) = command.typed() else {
        panic!("expected default acceleration");
    };
    assert!(view.is_legacy());
    assert_eq!(view.print(), Some(1500));
    assert_eq!(view.travel(), Some(1500));
    assert_eq!(view.filament(), Some(800));

    let command = create_command("M204 P1250 R1000 T900").unwrap();
    let TypedCommand::DefaultAcceleration(view) = command.typed() else {
        panic!("expected default acceleration");
    };
    assert!(!view.is_legacy());
    assert_eq!(view.print(), Some(1250));
    assert_eq!(view.filament(), Some(1000));
    assert_eq!(view.travel(), Some(900));
}

#[test]
fn test_home_flags() {
    let command = create_command("G28 W").unwrap();
    let TypedCommand::Home(view) = command.typed() else {
        panic!("expected home");
    };
    assert!(view.homes_all());
    assert!(view.skip_mesh_leveling());

    let command = create_command("G28 X").unwrap();
    let TypedCommand::Home(view) = command.typed() else {
        panic!("expected home");
    };
    assert!(view.x());
    assert!(!view.homes_all());
}

#[test]
fn test_firmware_capabilities() {
    let command = create_command("M115 U3.8.1").unwrap();
    assert_eq!(command.get('U'), Some(&FieldValue::Text("3.8.1".into())));
    let TypedCommand::FirmwareCapabilities(view) = command.typed() else {
        panic!("expected M115");
    };
    assert_eq!(view.test_version(), Some("3.8.1"));
    assert!(!view.get_version());
}

#[test]
fn test_lines_parse_independently() {
    let lines = ["G91", "G1 X1", "M83", "G1 E1"];
    let first: Vec<_> = lines.iter().map(|line| parse_line(line)).collect();
    let reversed: Vec<_> = lines.iter().rev().map(|line| parse_line(line)).collect();
    assert!(first.iter().eq(reversed.iter().rev()));
}

#[test]
fn test_lines_parse_in_parallel() {
    let handles: Vec<_> = (0..4)
        .map(|i| std::thread::spawn(move || parse_line(&format!("G1 X{i} ; thread {i}"))))
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let line = handle.join().unwrap();
        assert_eq!(line.as_command().unwrap().fields().float('X'), Some(i as f64));
    }
}
