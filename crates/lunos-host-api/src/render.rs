//! Terminal rendering of script values.
//!
//! `console.log` accepts arbitrary values, not just strings; rendering
//! joins them with single spaces and, when colors are on, tints each
//! argument by its type so structure stands out in a terminal.

use crate::value::Value;

const RESET: &str = "\x1b[0m";

/// Per-type ANSI color, mirroring the host terminal palette: gray for
/// null/undefined, magenta for booleans, yellow for numbers, cyan for
/// arrays, blue for objects. Strings stay uncolored.
fn type_color(value: &Value) -> &'static str {
    match value {
        Value::Null | Value::Undefined => "\x1b[90m",
        Value::Bool(_) => "\x1b[35m",
        Value::Number(_) => "\x1b[33m",
        Value::String(_) => "",
        Value::Array(_) => "\x1b[36m",
        Value::Object(_) => "\x1b[34m",
    }
}

/// Render one value, optionally colorized.
pub fn render_value(value: &Value, colors: bool) -> String {
    if !colors {
        return value.to_string();
    }
    let color = type_color(value);
    if color.is_empty() {
        value.to_string()
    } else {
        format!("{color}{value}{RESET}")
    }
}

/// Render an argument list the way `console.log` prints it: values joined
/// by single spaces.
pub fn render_args(args: &[Value], colors: bool) -> String {
    let mut text = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(&render_value(arg, colors));
    }
    text
}
