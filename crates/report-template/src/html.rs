use crate::document::{Block, Document};

/// Render a filled document as a standalone HTML page suitable for mailing
/// as an attachment. Consecutive table rows become one table; a `---`
/// separator row promotes the row above it to a header row.
pub fn render_html(doc: &Document, title: &str) -> String {
    let mut body = String::new();
    let mut table: Vec<Vec<String>> = Vec::new();

    for block in doc.blocks() {
        match block {
            Block::TableRow(segments) => table.push(content_cells(segments)),
            Block::Paragraph(line) => {
                flush_table(&mut body, &mut table);
                render_paragraph(&mut body, line);
            }
        }
    }
    flush_table(&mut body, &mut table);

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1"><title>{title}</title></head>
<body style="margin:0;padding:0;background:#f1f5f9;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;">
<table width="100%" cellpadding="0" cellspacing="0" style="background:#f1f5f9;padding:32px 0;">
  <tr><td align="center">
    <table width="640" cellpadding="0" cellspacing="0" style="background:#ffffff;border-radius:8px;overflow:hidden;box-shadow:0 1px 3px rgba(0,0,0,0.1);">
      <tr><td style="padding:24px 28px;">
{body}      </td></tr>
    </table>
  </td></tr>
</table>
</body>
</html>"#,
        title = esc(title),
        body = body,
    )
}

/// Drop the empty edge segments produced by leading/trailing pipes.
fn content_cells(segments: &[String]) -> Vec<String> {
    let mut cells: &[String] = segments;
    if let Some(first) = cells.first() {
        if first.trim().is_empty() {
            cells = &cells[1..];
        }
    }
    if let Some(last) = cells.last() {
        if last.trim().is_empty() {
            cells = &cells[..cells.len() - 1];
        }
    }
    cells.iter().map(|c| c.trim().to_string()).collect()
}

fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|c| {
            let c = c.trim_matches(':');
            c.len() >= 3 && c.chars().all(|ch| ch == '-')
        })
}

fn render_paragraph(out: &mut String, line: &str) {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return;
    }
    if let Some(heading) = trimmed.strip_prefix("## ") {
        out.push_str(&format!(
            "        <h2 style=\"color:#1e293b;font-size:18px;margin:20px 0 8px;\">{}</h2>\n",
            esc(heading)
        ));
    } else if let Some(heading) = trimmed.strip_prefix("# ") {
        out.push_str(&format!(
            "        <h1 style=\"color:#1e293b;font-size:24px;margin:0 0 12px;\">{}</h1>\n",
            esc(heading)
        ));
    } else {
        out.push_str(&format!(
            "        <p style=\"color:#334155;margin:8px 0;\">{}</p>\n",
            esc(trimmed)
        ));
    }
}

fn flush_table(out: &mut String, table: &mut Vec<Vec<String>>) {
    if table.is_empty() {
        return;
    }

    let has_header = table.len() >= 2 && is_separator_row(&table[1]);
    out.push_str(
        "        <table style=\"width:100%;border-collapse:collapse;margin:12px 0;\">\n",
    );

    let mut body_index = 0usize;
    for (i, row) in table.iter().enumerate() {
        if is_separator_row(row) {
            continue;
        }
        if has_header && i == 0 {
            out.push_str("          <tr>");
            for cell in row {
                out.push_str(&format!(
                    "<th style=\"padding:8px 12px;text-align:left;color:#94a3b8;border-bottom:1px solid #e2e8f0;\">{}</th>",
                    esc(cell)
                ));
            }
            out.push_str("</tr>\n");
            continue;
        }
        let style = if body_index % 2 == 1 {
            "background:#f8fafc;"
        } else {
            ""
        };
        out.push_str(&format!("          <tr style=\"{style}\">"));
        for cell in row {
            out.push_str(&format!(
                "<td style=\"padding:8px 12px;font-weight:600;\">{}</td>",
                esc(cell)
            ));
        }
        out.push_str("</tr>\n");
        body_index += 1;
    }

    out.push_str("        </table>\n");
    table.clear();
}

fn esc(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_headings_render() {
        let doc = Document::parse("# Market Wrap\nNifty closed higher.\n\n## Sectors");
        let html = render_html(&doc, "Wrap");
        assert!(html.contains("<h1 style=\"color:#1e293b;font-size:24px;margin:0 0 12px;\">Market Wrap</h1>"));
        assert!(html.contains("<p style=\"color:#334155;margin:8px 0;\">Nifty closed higher.</p>"));
        assert!(html.contains("<h2"));
        assert!(html.contains("<title>Wrap</title>"));
    }

    #[test]
    fn consecutive_rows_form_one_table_with_header() {
        let doc = Document::parse("| Sector | Change |\n|---|---|\n| NIFTY BANK | +1.32% |\n| NIFTY IT | -0.54% |");
        let html = render_html(&doc, "Wrap");
        assert_eq!(html.matches("<table style=\"width:100%").count(), 1);
        assert!(html.contains("<th style=\"padding:8px 12px;text-align:left;color:#94a3b8;border-bottom:1px solid #e2e8f0;\">Sector</th>"));
        assert!(html.contains("NIFTY BANK"));
        // separator row never renders
        assert!(!html.contains("---"));
    }

    #[test]
    fn paragraph_splits_tables() {
        let doc = Document::parse("| a |\nbetween\n| b |");
        let html = render_html(&doc, "Wrap");
        assert_eq!(html.matches("<table style=\"width:100%").count(), 2);
    }

    #[test]
    fn text_is_escaped() {
        let doc = Document::parse("a < b & c");
        let html = render_html(&doc, "R&D");
        assert!(html.contains("a &lt; b &amp; c"));
        assert!(html.contains("<title>R&amp;D</title>"));
    }

    #[test]
    fn blank_lines_emit_nothing() {
        let doc = Document::parse("\n\n");
        let html = render_html(&doc, "Wrap");
        assert!(!html.contains("<p"));
    }
}
