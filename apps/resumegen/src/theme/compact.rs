//! A denser sans-serif theme that keeps everything on one screen: inline
//! headings, keyword chips, no long-form descriptions.

use super::{escape_html, Theme, ThemeOptions};
use crate::errors::AppError;
use crate::models::resume::Resume;

const STYLE: &str = r#"
    body { font-family: 'Helvetica Neue', Arial, sans-serif; max-width: 720px;
           margin: 0 auto; padding: 32px 24px; color: #1a1a1a; line-height: 1.4;
           font-size: 14px; }
    header { display: flex; justify-content: space-between; align-items: baseline;
             border-bottom: 3px solid #1a1a1a; padding-bottom: 8px; }
    h1 { margin: 0; font-size: 1.5rem; }
    .label { color: #666; }
    .contact { color: #666; font-size: 12px; margin: 6px 0 18px; }
    h2 { font-size: 13px; text-transform: uppercase; letter-spacing: 0.1em;
         color: #444; margin: 18px 0 6px; }
    .entry { margin-bottom: 10px; }
    .entry-line { display: flex; justify-content: space-between; }
    .entry-line strong { font-size: 14px; }
    .dates { color: #888; font-size: 12px; }
    ul { margin: 4px 0 0; padding-left: 18px; }
    li { margin-bottom: 2px; }
    .chips span { display: inline-block; background: #efefef; border-radius: 3px;
                  padding: 1px 8px; margin: 0 4px 4px 0; font-size: 12px; }
    footer { margin-top: 24px; color: #aaa; font-size: 11px; }
"#;

pub struct CompactTheme;

impl Theme for CompactTheme {
    fn id(&self) -> &'static str {
        "compact"
    }

    fn render(&self, resume: &Resume, options: &ThemeOptions) -> Result<String, AppError> {
        let basics = &resume.basics;
        if basics.name.trim().is_empty() {
            return Err(AppError::Render(
                "resume document has no basics.name".to_string(),
            ));
        }
        let name = escape_html(basics.name.trim());

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{name}</title>\n"));
        html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

        html.push_str("<header>\n");
        html.push_str(&format!("<h1>{name}</h1>\n"));
        if let Some(label) = &basics.label {
            html.push_str(&format!(
                "<span class=\"label\">{}</span>\n",
                escape_html(label)
            ));
        }
        html.push_str("</header>\n");
        let contact: Vec<String> = [&basics.email, &basics.phone, &basics.url]
            .into_iter()
            .flatten()
            .map(|item| escape_html(item))
            .collect();
        if !contact.is_empty() {
            html.push_str(&format!(
                "<p class=\"contact\">{}</p>\n",
                contact.join(" | ")
            ));
        }

        if let Some(summary) = &basics.summary {
            html.push_str(&format!("<p>{}</p>\n", escape_html(summary)));
        }

        if !resume.work.is_empty() {
            html.push_str("<h2>Experience</h2>\n");
            for entry in &resume.work {
                html.push_str("<div class=\"entry\">\n<div class=\"entry-line\">");
                let heading: Vec<String> = [&entry.position, &entry.name]
                    .into_iter()
                    .flatten()
                    .map(|item| escape_html(item))
                    .collect();
                html.push_str(&format!("<strong>{}</strong>", heading.join(", ")));
                if let Some(start) = &entry.start_date {
                    let end = entry.end_date.as_deref().unwrap_or("Present");
                    html.push_str(&format!(
                        "<span class=\"dates\">{} &ndash; {}</span>",
                        escape_html(start),
                        escape_html(end)
                    ));
                }
                html.push_str("</div>\n");
                if !entry.highlights.is_empty() {
                    html.push_str("<ul>\n");
                    for highlight in &entry.highlights {
                        html.push_str(&format!("<li>{}</li>\n", escape_html(highlight)));
                    }
                    html.push_str("</ul>\n");
                }
                html.push_str("</div>\n");
            }
        }

        if !resume.skills.is_empty() {
            html.push_str("<h2>Skills</h2>\n<div class=\"chips\">\n");
            for skill in &resume.skills {
                for keyword in &skill.keywords {
                    html.push_str(&format!("<span>{}</span>", escape_html(keyword)));
                }
            }
            html.push_str("\n</div>\n");
        }

        if let Some(role) = &options.role {
            html.push_str(&format!("<footer>{}", escape_html(&role.code)));
            if let Some(version) = &options.version {
                html.push_str(&format!(" v{:03}", version.current));
            }
            html.push_str("</footer>\n");
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}
