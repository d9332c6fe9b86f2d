//! Terminal output of a space's state.
//!
//! Not a stable format, meant for people reading logs.

use crate::space::Space;
use colored::Colorize;

/// Right-align a value in a field of at least `width` characters.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    if value_str.len() >= width {
        value_str
    } else {
        format!("{value_str:>width$}")
    }
}

/// One line per owned range with its block count and allocation counts,
/// followed by the compact dump of the space.
pub fn space_report(space: &Space) -> String {
    let mut lines = vec![format!(
        "{}{}{}{}",
        format_field("range", 33),
        format_field("cidrs", 7),
        format_field("owned", 10),
        format_field("free", 10)
    )];

    for r in space.owned_ranges() {
        let free = space.num_free_addresses_in_range(r);
        let owned = r.size() - free;
        lines.push(format!(
            "{}{}{}{}",
            format_field(r.as_cidr_string(), 33),
            format_field(r.cidrs().len(), 7),
            format_field(owned, 10).red(),
            format_field(free, 10).green()
        ));
    }

    lines.push(format!("{} {space}", "#".on_blue()));
    lines.join("\n")
}

pub fn print_space(space: &Space) {
    log::debug!("print_space() {space}");
    println!("{}", space_report(space));
}
