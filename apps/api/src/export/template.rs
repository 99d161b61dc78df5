//! Fixed single-page case-study layout rendered to a static HTML string.

use std::fmt::Write;

use crate::draft::model::DraftPayload;

const STYLE: &str = r#"
  body { margin: 0; font-family: ui-serif, Georgia, Cambria, "Times New Roman", Times, serif; }
  .page { background: #ffffff; color: #1e293b; padding: 48px; }
  .customer { color: #4f46e5; font-weight: 700; text-transform: uppercase; letter-spacing: 0.05em; font-size: 14px; margin: 0 0 16px; }
  .headline { font-size: 36px; font-weight: 700; color: #0f172a; line-height: 1.25; margin: 0 0 24px; }
  .description { font-size: 18px; color: #475569; margin: 0 0 32px; }
  .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 48px; }
  h3 { font-weight: 700; color: #0f172a; margin: 0 0 8px; }
  .solution-title { margin-top: 32px; }
  .body-text { color: #475569; margin: 0; }
  .results { background: #f8fafc; padding: 32px; border-radius: 8px; }
  .results h3 { margin-bottom: 16px; }
  .result { margin-bottom: 16px; }
  .metric { font-size: 30px; font-weight: 700; color: #4f46e5; margin: 0; }
  .quote { margin-top: 48px; border-left: 4px solid #6366f1; padding-left: 24px; }
  .quote p { font-size: 24px; font-style: italic; color: #334155; line-height: 1.6; margin: 0; }
"#;

/// Renders the draft into the export layout. The only branching is the loop over
/// `results`; every interpolated value is HTML-escaped.
pub fn render_case_study(draft: &DraftPayload) -> String {
    let mut results = String::new();
    for result in &draft.results {
        // Writing to a String cannot fail.
        let _ = write!(
            results,
            r#"<div class="result"><p class="metric">{}</p><p class="body-text">{}</p></div>"#,
            escape_html(&result.metric),
            escape_html(&result.description),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8" />
<style>{STYLE}</style>
</head>
<body>
<div class="page">
  <p class="customer">{customer}</p>
  <h2 class="headline">{headline}</h2>
  <p class="description">{description}</p>
  <div class="columns">
    <div>
      <h3>Challenge</h3>
      <p class="body-text">{challenge}</p>
      <h3 class="solution-title">Solution</h3>
      <p class="body-text">{solution}</p>
    </div>
    <div class="results">
      <h3>Results</h3>
      {results}
    </div>
  </div>
  <div class="quote"><p>&ldquo;{quote}&rdquo;</p></div>
</div>
</body>
</html>"#,
        customer = escape_html(&draft.customer.name),
        headline = escape_html(&draft.headline),
        description = escape_html(&draft.customer.description),
        challenge = escape_html(&draft.challenge),
        solution = escape_html(&draft.solution),
        quote = escape_html(&draft.quote),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
