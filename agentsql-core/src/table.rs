//! HTML table rendering for SQL result sets.

use crate::fulfillment::ResultSet;

/// Inline style applied to every header cell so narrow columns stay legible
/// in the platform's accordion widget.
const HEADER_STYLE: &str = "min-width:100px;";

/// Render a result set as an HTML table.
///
/// Returns `None` when the result has no rows; callers surface the literal
/// "No results" reply in that case.
pub fn render(result: &ResultSet) -> Option<String> {
    if result.rows.is_empty() {
        return None;
    }

    let mut html = String::from("<table>\n<thead>\n<tr>");
    for column in &result.columns {
        html.push_str(&format!(
            "<th style=\"{HEADER_STYLE}\">{}</th>",
            escape(column)
        ));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &result.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    Some(html)
}

/// Escape the characters that would break out of a cell.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(columns: &[&str], rows: &[&[&str]]) -> ResultSet {
        ResultSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn empty_result_renders_nothing() {
        assert_eq!(render(&result(&["ticker"], &[])), None);
    }

    #[test]
    fn renders_headers_and_rows() {
        let html = render(&result(
            &["ticker", "rating"],
            &[&["GRN", "5"], &["SOL", "4"]],
        ))
        .unwrap();
        assert!(html.starts_with("<table>"));
        assert!(html.ends_with("</table>"));
        assert!(html.contains("<th style=\"min-width:100px;\">ticker</th>"));
        assert!(html.contains("<th style=\"min-width:100px;\">rating</th>"));
        assert!(html.contains("<td>GRN</td>"));
        assert!(html.contains("<td>SOL</td>"));
        // One header row, two body rows
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn escapes_cell_text() {
        let html = render(&result(&["overview"], &[&["<b>50% & rising</b>"]])).unwrap();
        assert!(html.contains("<td>&lt;b&gt;50% &amp; rising&lt;/b&gt;</td>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn null_cells_render_empty() {
        let html = render(&result(&["etf"], &[&[""]])).unwrap();
        assert!(html.contains("<td></td>"));
    }
}
