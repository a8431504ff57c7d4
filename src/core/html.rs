// src/core/html.rs

// DOM helpers over `scraper`, tailored to chart pages:
// locate a marked table, walk its data rows, and read cell text.

use scraper::{ElementRef, Html, Node, Selector};

use super::sanitize::normalize_ws;

fn sel(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// First element carrying `marker` in its class list. If that element is not a
/// `<table>` itself, its first descendant `<table>` is returned instead.
pub fn find_marked_table<'a>(doc: &'a Html, marker: &str) -> Option<ElementRef<'a>> {
    let marked = doc.select(&sel(&format!(".{marker}"))?).next()?;
    if marked.value().name().eq_ignore_ascii_case("table") {
        return Some(marked);
    }
    marked.select(&sel("table")?).next()
}

/// `<td>` cells of every `<tr>` in document order. Rows made only of `<th>`
/// come back empty and are left for the caller to skip.
pub fn table_cells<'a>(table: ElementRef<'a>) -> Vec<Vec<ElementRef<'a>>> {
    let (Some(tr), Some(td)) = (sel("tr"), sel("td")) else {
        return Vec::new();
    };
    table
        .select(&tr)
        .map(|row| row.select(&td).collect())
        .collect()
}

/// All text under `el`, whitespace collapsed. Entities are already decoded by the parser.
pub fn cell_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Split the cell's text at the first `<br>`. The second half is `None` when
/// the cell has no line break at all; any later `<br>` becomes a space.
pub fn split_on_first_break(el: ElementRef<'_>) -> (String, Option<String>) {
    let mut head = String::new();
    let mut tail: Option<String> = None;

    for node in el.descendants() {
        match node.value() {
            Node::Text(t) => match tail.as_mut() {
                Some(rest) => rest.push_str(t),
                None => head.push_str(t),
            },
            Node::Element(e) if e.name().eq_ignore_ascii_case("br") => match tail.as_mut() {
                Some(rest) => rest.push(' '), // later breaks only separate words
                None => tail = Some(String::new()),
            },
            _ => {}
        }
    }
    (normalize_ws(&head), tail.map(|t| normalize_ws(&t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_td(doc: &Html) -> ElementRef<'_> {
        doc.select(&sel("td").unwrap()).next().unwrap()
    }

    #[test]
    fn marker_on_wrapper_div_finds_inner_table() {
        let doc = Html::parse_document(
            r#"<div class="wrap chart-table"><table id="t"><tr><td>1</td></tr></table></div>"#,
        );
        let t = find_marked_table(&doc, "chart-table").unwrap();
        assert_eq!(t.value().id(), Some("t"));
    }

    #[test]
    fn no_marker_means_no_table() {
        let doc = Html::parse_document("<table><tr><td>1</td></tr></table>");
        assert!(find_marked_table(&doc, "chart-table").is_none());
    }

    #[test]
    fn splits_on_first_break_only() {
        let doc = Html::parse_document(
            "<table><tr><td><strong>Song</strong><br>by Someone<br/>extra</td></tr></table>",
        );
        let (head, tail) = split_on_first_break(first_td(&doc));
        assert_eq!(head, "Song");
        assert_eq!(tail.as_deref(), Some("by Someone extra"));
    }

    #[test]
    fn cell_without_break() {
        let doc = Html::parse_document("<table><tr><td>  Just &amp; a   title </td></tr></table>");
        let (head, tail) = split_on_first_break(first_td(&doc));
        assert_eq!(head, "Just & a title");
        assert!(tail.is_none());
    }
}
