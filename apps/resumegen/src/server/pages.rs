//! HTML post-processing for the dev server: the injected live-reload
//! client and the diagnostic page served when rendering fails.

use std::path::Path;

use crate::theme::escape_html;

/// Browser-side reload client. Reloads on the literal "reload" token and,
/// once the socket closes (server gone), schedules one reload a second
/// later so the tab reconnects when the server comes back.
const RELOAD_SCRIPT: &str = r#"
<script>
  (function () {
    const socket = new WebSocket('ws://localhost:{port}');
    socket.onopen = function () {
      console.log('live reload connected');
    };
    socket.onmessage = function (event) {
      if (event.data === 'reload') {
        window.location.reload();
      }
    };
    socket.onclose = function () {
      console.log('live reload disconnected');
      setTimeout(function () {
        window.location.reload();
      }, 1000);
    };
    socket.onerror = function (err) {
      console.error('live reload socket error', err);
    };
  })();
</script>
"#;

/// Splices the reload client into a rendered page, immediately before the
/// first `</body>`; pages without one get it appended.
pub(crate) fn inject_reload_script(html: &str, ws_port: u16) -> String {
    let script = RELOAD_SCRIPT.replace("{port}", &ws_port.to_string());
    match html.find("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + script.len());
            out.push_str(&html[..idx]);
            out.push_str(&script);
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{html}{script}"),
    }
}

/// A styled diagnostic page shown instead of the résumé when the source
/// fails to parse or render. Carries everything needed to fix the problem
/// without looking at the server logs.
pub(crate) fn error_page(
    message: &str,
    source: &Path,
    role_name: &str,
    role_code: &str,
    theme_id: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<title>Resume Dev Server - Error</title>
<style>
  body {{ font-family: Arial, sans-serif; margin: 40px; background: #f5f5f5; }}
  .error {{ background: #fff; border-left: 4px solid #e74c3c; padding: 20px;
            border-radius: 4px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
  .error h1 {{ color: #e74c3c; margin-top: 0; }}
  .error pre {{ background: #f8f8f8; padding: 10px; border-radius: 4px;
                overflow-x: auto; }}
</style>
</head>
<body>
<div class="error">
  <h1>Resume Generation Error</h1>
  <p>There was an error generating your resume. Please check your JSON format and try again.</p>
  <pre>{message}</pre>
  <p><strong>File being watched:</strong> {source}</p>
  <p><strong>Role:</strong> {role_name} ({role_code})</p>
  <p><strong>Theme:</strong> {theme_id}</p>
</div>
</body>
</html>
"#,
        message = escape_html(message),
        source = escape_html(&source.display().to_string()),
        role_name = escape_html(role_name),
        role_code = escape_html(role_code),
        theme_id = escape_html(theme_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_places_script_before_closing_body() {
        let html = "<html><body><p>hi</p></body></html>";
        let out = inject_reload_script(html, 3001);
        assert!(out.contains("ws://localhost:3001"));
        let script_at = out.find("<script>").unwrap();
        let body_close_at = out.find("</body>").unwrap();
        assert!(script_at < body_close_at);
        assert!(out.ends_with("</body></html>"));
    }

    #[test]
    fn test_inject_appends_when_no_body_tag() {
        let out = inject_reload_script("<p>fragment</p>", 3001);
        assert!(out.starts_with("<p>fragment</p>"));
        assert!(out.contains("new WebSocket"));
    }

    #[test]
    fn test_inject_targets_first_closing_body() {
        let html = "<body>a</body><body>b</body>";
        let out = inject_reload_script(html, 3001);
        let script_at = out.find("<script>").unwrap();
        let first_close = out.find("</body>").unwrap();
        assert!(script_at < first_close);
        assert_eq!(out.matches("<script>").count(), 1);
    }

    #[test]
    fn test_error_page_includes_diagnostics() {
        let page = error_page(
            "expected `,` at line 3",
            Path::new("data/resume/ada_pm_resume.json"),
            "Product Manager",
            "PM",
            "classic",
        );
        assert!(page.contains("expected `,` at line 3"));
        assert!(page.contains("data/resume/ada_pm_resume.json"));
        assert!(page.contains("Product Manager (PM)"));
        assert!(page.contains("classic"));
        // The error page never carries the reload client.
        assert!(!page.contains("new WebSocket"));
    }

    #[test]
    fn test_error_page_escapes_message_markup() {
        let page = error_page("<script>x</script>", Path::new("a.json"), "R", "R", "classic");
        assert!(!page.contains("<script>x</script>"));
        assert!(page.contains("&lt;script&gt;x&lt;/script&gt;"));
    }
}
