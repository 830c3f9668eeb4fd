//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use examupdt_core::ListResult;
use serde::Serialize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn notice(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// "Showing 11 to 20 of 42 results", or a note that nothing matched.
pub fn pager_line<T>(page: &ListResult<T>) -> String {
    match page.showing() {
        Some((first, last, total)) => {
            format!(
                "Showing {first} to {last} of {total} results (page {} of {})",
                page.page, page.total_pages
            )
        }
        None => "No results found".to_string(),
    }
}

/// One row per item as compact JSON, then the pager line.
pub fn page<T: Serialize>(page: &ListResult<T>, pretty: bool) -> Result<()> {
    for item in &page.items {
        if pretty {
            json_pretty(item)?;
        } else {
            println!("{}", serde_json::to_string(item)?);
        }
    }
    notice(&pager_line(page));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use examupdt_core::listing::paginate;

    #[test]
    fn test_pager_line() {
        let page = paginate((1..=42).collect::<Vec<_>>(), 2, 10);
        assert_eq!(
            pager_line(&page),
            "Showing 11 to 20 of 42 results (page 2 of 5)"
        );

        let empty = paginate(Vec::<u8>::new(), 1, 10);
        assert_eq!(pager_line(&empty), "No results found");
    }
}
