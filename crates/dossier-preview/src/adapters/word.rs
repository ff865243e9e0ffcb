use docx_rs::{
    DocumentChild, ParagraphChild, Run, RunChild, TableCellContent, TableChild, TableRowChild,
};

use crate::PreviewError;

/// Convert `.docx` bytes into HTML markup.
///
/// Paragraphs become `<p>`, tables become `<table>`, bold and italic runs
/// are wrapped in `<strong>`/`<em>` and hyperlinks keep their text. All text
/// is HTML-escaped. Legacy `.doc` files fail to parse.
pub fn docx_to_html(bytes: &[u8]) -> Result<String, PreviewError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| PreviewError::Convert(format!("Failed to parse DOCX: {}", e)))?;

    let mut html = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => {
                html.push_str("<p>");
                push_paragraph_children(&para.children, &mut html);
                html.push_str("</p>\n");
            }
            DocumentChild::Table(table) => {
                html.push_str("<table>\n");
                for row in &table.rows {
                    let TableChild::TableRow(tr) = row;
                    html.push_str("<tr>");
                    for cell in &tr.cells {
                        let TableRowChild::TableCell(tc) = cell;
                        html.push_str("<td>");
                        for content in &tc.children {
                            if let TableCellContent::Paragraph(para) = content {
                                push_paragraph_children(&para.children, &mut html);
                            }
                        }
                        html.push_str("</td>");
                    }
                    html.push_str("</tr>\n");
                }
                html.push_str("</table>\n");
            }
            _ => {}
        }
    }
    Ok(html)
}

fn push_paragraph_children(children: &[ParagraphChild], html: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, html),
            ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let ParagraphChild::Run(run) = inner {
                        push_run(run, html);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(run: &Run, html: &mut String) {
    let bold = run.run_property.bold.is_some();
    let italic = run.run_property.italic.is_some();
    if bold {
        html.push_str("<strong>");
    }
    if italic {
        html.push_str("<em>");
    }
    for child in &run.children {
        match child {
            RunChild::Text(text) => push_escaped(&text.text, html),
            RunChild::Tab(_) => html.push_str("&emsp;"),
            RunChild::Break(_) => html.push_str("<br/>"),
            _ => {}
        }
    }
    if italic {
        html.push_str("</em>");
    }
    if bold {
        html.push_str("</strong>");
    }
}

fn push_escaped(text: &str, html: &mut String) {
    for c in text.chars() {
        match c {
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '&' => html.push_str("&amp;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            other => html.push(other),
        }
    }
}
