use gcode_model::command::TypedCommand;
use gcode_model::{parse_line, render_line, ParsedLine};

fn main() {
    println!("=== GCode Command Model Demo ===");

    let test_lines = [
        "G1 F1200 Y20.5 X10 ; linear move",
        "m104 s215 t1 ; set temperature",
        "M73 Q40 S9",
        "G28 W",
        "Tx",
        "; another comment",
        "",
        "M999 custom",
        "*23 X1",
    ];

    for line in test_lines {
        println!("\nInput:    '{}'", line);
        let parsed = parse_line(line);
        println!("Rendered: '{}'", render_line(&parsed));

        let ParsedLine::Command(command) = &parsed else {
            continue;
        };

        println!("Kind:     {:?}", command.kind());
        match command.typed() {
            TypedCommand::LinearMove(view) => {
                println!("Move to:  x={:?} y={:?} feed={:?}", view.x(), view.y(), view.f())
            }
            TypedCommand::SetExtruderTemperature(view) => println!(
                "Heat:     {:?}C on extruder {:?}",
                view.temperature(),
                command.extruder_index()
            ),
            TypedCommand::ToolChange(view) => println!("Tool:     {:?}", view.tool()),
            _ => {}
        }
        if let Some(progress) = command.prusa_build_percentage() {
            println!(
                "Progress: {:?}% with {:?} min left ({:?})",
                progress.percentage_complete(),
                progress.minutes_remaining(),
                progress.mode()
            );
        }
        for diagnostic in command.diagnostics() {
            println!("  {}", diagnostic);
        }
    }
}
