//! List rules command implementation.

use styleguard_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<24} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<8} {:<24} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - everything except the doc-comment contract rules (default)");
    println!("  strict       - all rules, silenced errors upgraded to errors");
    println!("  minimal      - SG003, SG004, SG005 (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  styleguard check --rules array-declaration,nesting-depth");
    println!("  styleguard check --rules SG001,SG002,SG006");
}
