//! Theme registry: pluggable résumé-to-HTML rendering strategies.
//!
//! A theme is a narrow capability (`render(document, options) -> html`)
//! resolved by id through a fixed registry, so the rendering strategy can be
//! swapped per invocation without the caller knowing any concrete type.
//! Options carry role and version context for themes that want to stamp
//! their output with them; both are optional because the dev server renders
//! without a version counter.

use std::sync::Arc;

use crate::errors::AppError;
use crate::models::resume::Resume;

mod classic;
mod compact;

pub use classic::ClassicTheme;
pub use compact::CompactTheme;

// ────────────────────────────────────────────────────────────────────────────
// Rendering contract
// ────────────────────────────────────────────────────────────────────────────

/// Context about the role a document is being rendered for.
#[derive(Debug, Clone)]
pub struct RoleContext {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Context about the version counter, present only on versioned generations.
#[derive(Debug, Clone)]
pub struct VersionContext {
    pub current: u32,
    pub last_generated: Option<String>,
}

/// Everything a theme may know beyond the document itself.
#[derive(Debug, Clone, Default)]
pub struct ThemeOptions {
    pub role: Option<RoleContext>,
    pub version: Option<VersionContext>,
}

/// A rendering strategy. Implementations are stateless and cheap to build.
pub trait Theme: Send + Sync {
    /// Stable identifier used in config and on the command line.
    fn id(&self) -> &'static str;

    /// Renders a résumé document to a complete HTML page.
    fn render(&self, resume: &Resume, options: &ThemeOptions) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// Every theme compiled into the binary.
pub fn builtins() -> Vec<Arc<dyn Theme>> {
    vec![Arc::new(ClassicTheme), Arc::new(CompactTheme)]
}

/// Resolves a theme id to its implementation. The error enumerates every
/// registered id, mirroring the unknown-role message shape.
pub fn resolve(id: &str) -> Result<Arc<dyn Theme>, AppError> {
    builtins()
        .into_iter()
        .find(|theme| theme.id() == id)
        .ok_or_else(|| AppError::UnknownTheme {
            id: id.to_string(),
            available: available_themes().join(", "),
        })
}

/// Registered theme ids, in registry order.
pub fn available_themes() -> Vec<&'static str> {
    builtins().iter().map(|theme| theme.id()).collect()
}

/// Minimal HTML escaping for text interpolated into markup.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
