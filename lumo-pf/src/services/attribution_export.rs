//! Attribution export
//!
//! Renders the attribution set to side artifacts: a static HTML report
//! and a self-contained React component. Both are derived
//! deterministically from their input and written best-effort (write
//! failures are logged, never raised — these files are conveniences,
//! not the ledger of record).

use crate::models::{Attribution, AttributionDatabase};
use lumo_common::{Error, Result};
use std::path::Path;

/// Render a static HTML document listing each attribution.
///
/// Pure function of its input: identical attributions produce identical
/// output.
pub fn generate_attribution_html(attributions: &[Attribution]) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Photo Attributions</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        .attribution {
            border: 1px solid #ddd;
            border-radius: 4px;
            padding: 12px 16px;
            margin: 12px 0;
        }
        .attribution .meta {
            color: #666;
            font-size: 0.9em;
        }
        .empty {
            color: #666;
            font-style: italic;
        }
    </style>
</head>
<body>
    <h1>Photo Attributions</h1>
"#,
    );

    if attributions.is_empty() {
        html.push_str("    <p class=\"empty\">No attributions recorded.</p>\n");
    } else {
        for attribution in attributions {
            let location = Path::new(&attribution.project_path).join(&attribution.project_file);
            html.push_str(&format!(
                r#"    <div class="attribution">
        Photo by <a href="{photographer_url}">{photographer}</a>
        on <a href="{source_url}">{source}</a> ({license})
        <div class="meta">
            Downloaded {date} &mdash; saved as {location}
        </div>
    </div>
"#,
                photographer_url = escape_html(&attribution.photographer_url),
                photographer = escape_html(&attribution.photographer),
                source_url = escape_html(&attribution.source_url),
                source = escape_html(&attribution.source),
                license = escape_html(&attribution.license),
                date = escape_html(&attribution.download_date),
                location = escape_html(&location.to_string_lossy()),
            ));
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Write the HTML report, creating parent directories as needed.
///
/// Best-effort: the error channel of the inner write is discarded here
/// and logged. Returns whether the file was written.
pub fn save_attribution_html(output_path: &Path, attributions: &[Attribution]) -> bool {
    match write_text_file(output_path, &generate_attribution_html(attributions)) {
        Ok(()) => {
            tracing::info!(
                path = %output_path.display(),
                count = attributions.len(),
                "Attribution HTML written"
            );
            true
        }
        Err(err) => {
            tracing::warn!(
                path = %output_path.display(),
                error = %err,
                "Failed to write attribution HTML"
            );
            false
        }
    }
}

/// Render a self-contained React component embedding the full
/// attribution mapping as a literal lookup table keyed by photo id.
pub fn generate_react_component(database: &AttributionDatabase) -> String {
    let table = serde_json::to_string_pretty(&database.attributions)
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"import React from 'react';

// Generated file. Attribution lookup table keyed by photo id.
const ATTRIBUTIONS = {table};

export function PhotoAttribution({{ photoId }}) {{
  const attribution = ATTRIBUTIONS[photoId];
  if (!attribution) {{
    return null;
  }}
  return (
    <span className="photo-attribution">
      Photo by{{' '}}
      <a href={{attribution.photographerUrl}} target="_blank" rel="noopener noreferrer">
        {{attribution.photographer}}
      </a>{{' '}}
      on{{' '}}
      <a href={{attribution.sourceUrl}} target="_blank" rel="noopener noreferrer">
        {{attribution.source}}
      </a>{{' '}}
      ({{attribution.license}})
    </span>
  );
}}

export default PhotoAttribution;
"#,
        table = table
    )
}

/// Write the React component, creating parent directories as needed.
///
/// Best-effort, like [`save_attribution_html`].
pub fn save_react_component(output_path: &Path, database: &AttributionDatabase) -> bool {
    match write_text_file(output_path, &generate_react_component(database)) {
        Ok(()) => {
            tracing::info!(
                path = %output_path.display(),
                count = database.attributions.len(),
                "Attribution React component written"
            );
            true
        }
        Err(err) => {
            tracing::warn!(
                path = %output_path.display(),
                error = %err,
                "Failed to write attribution React component"
            );
            false
        }
    }
}

fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content).map_err(Error::Io)
}

/// Minimal HTML entity escaping for text and attribute values
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
