//! Terminal output formatting.

use colored::Colorize;
use polidoc_graph::queries::{
    coverages::{CoverageSummary, CoverageTerm},
    forms::Form,
    paragraphs::CcqList,
};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Print forms as a table.
pub fn print_forms_table(forms: &[Form]) {
    if forms.is_empty() {
        println!("{}", "No forms found.".dimmed());
        return;
    }

    println!("{:<14} {:<6} {:<16} {}", "Form Number", "State", "Type", "Name");
    println!("{}", "─".repeat(70));

    for form in forms {
        println!(
            "{} {} {} {}",
            pad(&value_cell(&form.form_number), 14).cyan(),
            pad(&value_cell(&form.state), 6),
            pad(&value_cell(&form.form_type), 16),
            truncate_visual(&value_cell(&form.form_name), 40)
        );
    }
}

/// Print the coverages of one form.
pub fn print_coverages_table(form_number: &str, coverages: &[CoverageSummary]) {
    if coverages.is_empty() {
        println!("{}", format!("No coverages found for {}.", form_number).dimmed());
        return;
    }

    println!("{}", form_number.cyan().bold());
    for coverage in coverages {
        println!(
            "  {} {}",
            pad(&cell(&coverage.coverage_code), 10).bold(),
            cell(&coverage.coverage_name)
        );
    }
}

/// Print coverage terms, grouped visually by map type.
pub fn print_terms_table(terms: &[CoverageTerm]) {
    if terms.is_empty() {
        println!("{}", "No terms found.".dimmed());
        return;
    }

    let mut current: Option<&str> = None;
    for term in terms {
        if current != Some(term.map_type.as_str()) {
            println!("{} {}", term.coverage_code.cyan(), term.map_type.bold());
            current = Some(term.map_type.as_str());
        }
        println!("  - {}", cell(&term.term));
    }
}

/// Print the CCQ term list of a form.
pub fn print_ccq(policy_form: &str, ccq: &CcqList) {
    if ccq.is_empty() {
        println!("{}", format!("No CCQ terms found for {}.", policy_form).dimmed());
        return;
    }

    println!("{}", format!("CCQ terms for {}", policy_form).bold());
    for (map_type, terms) in ccq {
        println!();
        println!("{} ({})", map_type.yellow().bold(), terms.len());
        for term in terms {
            println!("  - {}", term);
        }
    }
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn value_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Left-align to a visual width, truncating when too long.
fn pad(s: &str, width: usize) -> String {
    let s = truncate_visual(s, width);
    let fill = width.saturating_sub(UnicodeWidthStr::width(s.as_str()));
    format!("{}{}", s, " ".repeat(fill))
}

fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 3 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("...");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual_short() {
        assert_eq!(truncate_visual("Dwelling", 20), "Dwelling");
    }

    #[test]
    fn test_truncate_visual_long() {
        let out = truncate_visual("Homeowners 3 - Special Form", 10);
        assert_eq!(out, "Homeown...");
        assert_eq!(UnicodeWidthStr::width(out.as_str()), 10);
    }

    #[test]
    fn test_value_cell_renders_stored_attributes() {
        assert_eq!(value_cell(&Value::Null), "-");
        assert_eq!(value_cell(&Value::from("TX")), "TX");
        assert_eq!(value_cell(&Value::from(30511)), "30511");
    }

    #[test]
    fn test_pad_fills_width() {
        assert_eq!(pad("TX", 6), "TX    ");
    }
}
