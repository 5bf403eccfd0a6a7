//! Server-rendered HTML pages.

pub mod detail;
pub mod logbook;
pub mod upload;

use axum::http::StatusCode;
use serde::Deserialize;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f3f4f6; margin: 0; padding: 1rem; color: #1f2937; }
.container { max-width: 960px; margin: 2rem auto; background: #fff; border-radius: 12px; padding: 2rem; box-shadow: 0 4px 12px rgba(0,0,0,.08); }
h1 { margin-top: 0; }
a.button, button { display: inline-block; padding: .5rem 1rem; border-radius: 6px; border: 0; background: #4f46e5; color: #fff; text-decoration: none; cursor: pointer; font-size: .9rem; }
a.button.secondary, button.secondary { background: #6b7280; }
button.danger { background: #dc2626; }
.panel { background: #f9fafb; border-radius: 8px; padding: 1.25rem; margin-bottom: 1.5rem; }
.actions { display: flex; flex-wrap: wrap; gap: .75rem; justify-content: flex-end; margin-bottom: 1.5rem; }
.flash { border-radius: 8px; padding: 1rem; margin-bottom: 1.5rem; }
.flash.success { background: #d1fae5; color: #065f46; }
.flash.error { background: #fee2e2; color: #991b1b; }
table { width: 100%; border-collapse: collapse; font-size: .9rem; }
th, td { text-align: left; padding: .5rem .75rem; border-bottom: 1px solid #e5e7eb; }
th { background: #f3f4f6; text-transform: uppercase; font-size: .75rem; }
form.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; align-items: end; }
label { display: block; font-size: .85rem; margin-bottom: .25rem; }
input, select { width: 100%; padding: .4rem; border: 1px solid #d1d5db; border-radius: 6px; box-sizing: border-box; }
.muted { color: #6b7280; }
"#;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds `path?query` from key/value pairs, leaving off the `?` when empty.
pub fn href(path: &str, pairs: &[(&str, &str)]) -> String {
    match serde_urlencoded::to_string(pairs) {
        Ok(query) if !query.is_empty() => format!("{}?{}", path, query),
        _ => path.to_string(),
    }
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>
"#,
        title = escape(title),
        style = STYLE,
        body = body,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// One-line status message shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }

    fn render(&self) -> String {
        let class = match self.kind {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        };
        format!(
            r#"<div class="flash {}" role="status">{}</div>"#,
            class,
            escape(&self.text)
        )
    }
}

/// `message` / `type` query parameters set by a redirect after a submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlashQuery {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl FlashQuery {
    pub fn flash(&self) -> Option<Flash> {
        let text = self.message.as_deref().filter(|m| !m.trim().is_empty())?;
        Some(match self.kind.as_deref() {
            Some("success") => Flash::success(text),
            _ => Flash::error(text),
        })
    }
}

/// Location for a post/redirect/get round trip that shows `message`.
pub fn redirect_target(path: &str, extra: &[(&str, &str)], flash: &Flash) -> String {
    let kind = match flash.kind {
        FlashKind::Success => "success",
        FlashKind::Error => "error",
    };
    let mut pairs = extra.to_vec();
    pairs.push(("message", flash.text.as_str()));
    pairs.push(("type", kind));
    href(path, &pairs)
}

pub(crate) fn render_flash(flash: Option<&Flash>) -> String {
    flash.map(Flash::render).unwrap_or_default()
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1>{}</h1>
{}
<p><a class="button secondary" href="/">&larr; Back to Logbook</a></p>"#,
        escape(status.canonical_reason().unwrap_or("Error")),
        Flash::error(message).render()
    );
    layout("Error - Drone Flight Logbook", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_href_encodes_pairs() {
        assert_eq!(href("/", &[]), "/");
        assert_eq!(
            href("/", &[("filter_pilot", "J. Doe"), ("action", "export_csv")]),
            "/?filter_pilot=J.+Doe&action=export_csv"
        );
    }

    #[test]
    fn test_flash_query() {
        let q = FlashQuery {
            message: Some("Saved".into()),
            kind: Some("success".into()),
        };
        assert_eq!(q.flash(), Some(Flash::success("Saved")));

        let q = FlashQuery {
            message: Some("Broken".into()),
            kind: None,
        };
        assert_eq!(q.flash(), Some(Flash::error("Broken")));
        assert_eq!(FlashQuery::default().flash(), None);
    }

    #[test]
    fn test_redirect_target_carries_message() {
        let target = redirect_target(
            "/detail",
            &[("id", "4")],
            &Flash::success("Flight entry updated successfully."),
        );
        assert_eq!(
            target,
            "/detail?id=4&message=Flight+entry+updated+successfully.&type=success"
        );
    }

    #[test]
    fn test_error_page_escapes_message() {
        let page = error_page(StatusCode::NOT_FOUND, "<script>");
        assert!(page.contains("Not Found"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }
}
