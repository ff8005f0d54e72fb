//! Minimal JSON writer for response serialization. Writing into one
//! buffer keeps the output deterministic: object keys come out exactly
//! in the order the executor inserted them.

use std::fmt::Write;

use serde_json::Value;

pub(crate) fn write_json_value(buffer: &mut String, value: &Value) {
    match value {
        Value::Null => buffer.push_str("null"),
        Value::Bool(true) => buffer.push_str("true"),
        Value::Bool(false) => buffer.push_str("false"),
        Value::Number(number) => {
            let _ = write!(buffer, "{}", number);
        }
        Value::String(string) => write_and_escape_string(buffer, string),
        Value::Array(items) => {
            buffer.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    buffer.push(',');
                }
                write_json_value(buffer, item);
            }
            buffer.push(']');
        }
        Value::Object(map) => {
            buffer.push('{');
            for (index, (key, item)) in map.iter().enumerate() {
                if index > 0 {
                    buffer.push(',');
                }
                write_and_escape_string(buffer, key);
                buffer.push(':');
                write_json_value(buffer, item);
            }
            buffer.push('}');
        }
    }
}

pub(crate) fn write_and_escape_string(buffer: &mut String, input: &str) {
    buffer.push('"');
    for ch in input.chars() {
        match ch {
            '"' => buffer.push_str("\\\""),
            '\\' => buffer.push_str("\\\\"),
            '\n' => buffer.push_str("\\n"),
            '\r' => buffer.push_str("\\r"),
            '\t' => buffer.push_str("\\t"),
            '\u{0008}' => buffer.push_str("\\b"),
            '\u{000C}' => buffer.push_str("\\f"),
            ch if (ch as u32) < 0x20 => {
                let _ = write!(buffer, "\\u{:04x}", ch as u32);
            }
            ch => buffer.push(ch),
        }
    }
    buffer.push('"');
}
