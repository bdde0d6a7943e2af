//! HTML report renderer

use anyhow::Result;
use std::fmt::Write;

use super::utils::{html_cell, html_escape};
use super::{ReportMetadata, ReportRenderer, ReportTable};

/// Single-table HTML document, rows numbered from 1
pub struct HtmlReportRenderer;

impl ReportRenderer for HtmlReportRenderer {
    fn render(&self, table: &ReportTable, metadata: &ReportMetadata) -> Result<String> {
        let mut header = String::from("<th></th>");
        for label in &table.labels {
            write!(header, "<th>{}</th>", html_escape(label))?;
        }

        let mut body = String::new();
        for (index, row) in table.rows.iter().enumerate() {
            write!(body, "      <tr>\n        <th>{}</th>\n", index + 1)?;
            for cell in row {
                writeln!(body, "        <td>{}</td>", html_cell(cell))?;
            }
            body.push_str("      </tr>\n");
        }

        let title = format!("Plugin {} output", html_escape(&metadata.plugin_id));

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 1.5em; }}
    table.dataframe {{ border-collapse: collapse; }}
    table.dataframe th, table.dataframe td {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; vertical-align: top; }}
    table.dataframe thead th {{ background: #f0f0f0; }}
    .meta {{ color: #666; font-size: 0.9em; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p class="meta">{hosts} hosts &middot; generated {generated}</p>
  <table class="dataframe">
    <thead>
      <tr>{header}</tr>
    </thead>
    <tbody>
{body}    </tbody>
  </table>
</body>
</html>
"#,
            title = title,
            hosts = metadata.hosts,
            generated = metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            header = header,
            body = body,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let table = ReportTable {
            labels: vec!["Host Info:".to_string(), "Plugin Output:".to_string()],
            rows: vec![
                vec!["h1<br>10.0.0.1<br>RepoA".to_string(), "a < b<br>".to_string()],
                vec!["h2<br>10.0.0.2<br>RepoA".to_string(), String::new()],
            ],
        };
        let html = HtmlReportRenderer
            .render(&table, &ReportMetadata::new("19506", 2))
            .unwrap();

        assert!(html.contains("<title>Plugin 19506 output</title>"));
        assert!(html.contains("<th>Host Info:</th><th>Plugin Output:</th>"));
        assert!(html.contains("<td>h1<br>10.0.0.1<br>RepoA</td>"));
        assert!(html.contains("<td>a &lt; b<br></td>"));
        assert!(html.contains("<th>2</th>"));
        assert!(html.contains("<td></td>"));
    }
}
