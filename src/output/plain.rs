//! Console output.
//!
//! Human-facing messages go through here, styled with `console`. Errors and
//! warnings go to stderr; results go to stdout.

use crate::types::HostRange;
use console::style;

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print what a sweep of `range` would cover.
pub fn print_range_summary(range: &HostRange) {
    println!();
    println!("  {} {}", style("Range:").bold(), style(range).cyan().bold());
    println!("  {} {}", style("Network:").bold(), range.network_address());
    println!("  {} {}", style("Broadcast:").bold(), range.broadcast_address());
    println!(
        "  {} {}",
        style("Usable hosts:").bold(),
        style(range.host_count()).white().bold()
    );

    let hosts = range.hosts();
    if let (Some(first), Some(last)) = (hosts.first(), hosts.last()) {
        println!("  {} {} - {}", style("Host span:").bold(), first, last);
    }
    println!();
}

/// The line reported after the inventory file is written.
pub fn written_message(count: usize, path: &std::path::Path) -> String {
    format!("Wrote {} record(s) to {}", count, path.display())
}
