//! List commands implementation

use crate::programmers::available_programmers;

/// List all available programmers
pub fn list_programmers() {
    println!("Available programmers:");
    println!();

    for p in available_programmers() {
        println!("  {:12} - {}", p.name, p.description);
        if !p.aliases.is_empty() {
            println!("  {:12}   aliases: {}", "", p.aliases.join(", "));
        }
    }
}
