//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::application::Outcome;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for data such as JSON or rendered trees)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print prompt without newline (cyan)
pub fn prompt(msg: &(impl std::fmt::Display + ?Sized)) {
    use std::io::Write;
    print!("{} ", msg.to_string().cyan());
    std::io::stdout().flush().ok();
}

/// Print the result of one executed command.
pub fn outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Inserted(true) => success("node added"),
        Outcome::Inserted(false) => warning("parent not found, tree unchanged"),
        Outcome::Deleted(0) => warning("no node matched, tree unchanged"),
        Outcome::Deleted(1) => success("removed 1 node"),
        Outcome::Deleted(n) => success(&format!("removed {n} nodes")),
        Outcome::Traversal(kind, names) => {
            header(&format!("{kind}:"));
            info(&format!("[{}]", names.join(", ")));
        }
        Outcome::Rendered(tree) => info(tree.trim_end()),
        Outcome::Json(json) => info(json),
    }
}
