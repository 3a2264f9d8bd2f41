//! JSON output for command results.

use serde::Serialize;

/// Print a single item as pretty JSON.
pub fn print_item<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}
