//! The default theme: a single-column, print-friendly serif page.

use super::{escape_html, Theme, ThemeOptions};
use crate::errors::AppError;
use crate::models::resume::Resume;

const STYLE: &str = r#"
    body { font-family: Georgia, 'Times New Roman', serif; max-width: 820px;
           margin: 0 auto; padding: 48px 32px; color: #222; line-height: 1.5; }
    header { border-bottom: 2px solid #222; padding-bottom: 16px; margin-bottom: 24px; }
    h1 { margin: 0; font-size: 2rem; }
    .label { font-size: 1.1rem; color: #555; margin: 4px 0 0; }
    .contact { color: #555; margin: 8px 0 0; font-size: 0.9rem; }
    section { margin-bottom: 24px; }
    h2 { font-size: 1.05rem; text-transform: uppercase; letter-spacing: 0.08em;
         border-bottom: 1px solid #ccc; padding-bottom: 4px; }
    .entry { margin-bottom: 16px; }
    .entry h3 { margin: 0; font-size: 1rem; }
    .dates { color: #777; font-size: 0.85rem; }
    .entry p { margin: 6px 0 0; }
    ul { margin: 8px 0 0; padding-left: 20px; }
    .skill { margin-bottom: 8px; }
    .skill strong { margin-right: 6px; }
    footer { margin-top: 32px; color: #999; font-size: 0.75rem;
             border-top: 1px solid #ccc; padding-top: 8px; }
"#;

pub struct ClassicTheme;

impl Theme for ClassicTheme {
    fn id(&self) -> &'static str {
        "classic"
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
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        match &basics.label {
            Some(label) => html.push_str(&format!(
                "<title>{name} - {}</title>\n",
                escape_html(label)
            )),
            None => html.push_str(&format!("<title>{name}</title>\n")),
        }
        html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

        html.push_str("<header>\n");
        html.push_str(&format!("<h1>{name}</h1>\n"));
        if let Some(label) = &basics.label {
            html.push_str(&format!("<p class=\"label\">{}</p>\n", escape_html(label)));
        }
        let contact: Vec<String> = [&basics.email, &basics.phone, &basics.url]
            .into_iter()
            .flatten()
            .map(|item| escape_html(item))
            .collect();
        if !contact.is_empty() {
            html.push_str(&format!(
                "<p class=\"contact\">{}</p>\n",
                contact.join(" · ")
            ));
        }
        html.push_str("</header>\n");

        if let Some(summary) = &basics.summary {
            html.push_str("<section>\n<h2>Summary</h2>\n");
            html.push_str(&format!("<p>{}</p>\n", escape_html(summary)));
            html.push_str("</section>\n");
        }

        if !resume.work.is_empty() {
            html.push_str("<section>\n<h2>Experience</h2>\n");
            for entry in &resume.work {
                html.push_str("<div class=\"entry\">\n");
                let heading: Vec<String> = [&entry.position, &entry.name]
                    .into_iter()
                    .flatten()
                    .map(|item| escape_html(item))
                    .collect();
                if !heading.is_empty() {
                    html.push_str(&format!("<h3>{}</h3>\n", heading.join(" · ")));
                }
                if let Some(start) = &entry.start_date {
                    let end = entry.end_date.as_deref().unwrap_or("Present");
                    html.push_str(&format!(
                        "<p class=\"dates\">{} &ndash; {}</p>\n",
                        escape_html(start),
                        escape_html(end)
                    ));
                }
                if let Some(description) = &entry.description {
                    html.push_str(&format!("<p>{}</p>\n", escape_html(description)));
                }
                if !entry.highlights.is_empty() {
                    html.push_str("<ul>\n");
                    for highlight in &entry.highlights {
                        html.push_str(&format!("<li>{}</li>\n", escape_html(highlight)));
                    }
                    html.push_str("</ul>\n");
                }
                html.push_str("</div>\n");
            }
            html.push_str("</section>\n");
        }

        if !resume.skills.is_empty() {
            html.push_str("<section>\n<h2>Skills</h2>\n");
            for skill in &resume.skills {
                html.push_str(&format!(
                    "<div class=\"skill\"><strong>{}</strong>{}</div>\n",
                    escape_html(&skill.name),
                    escape_html(&skill.keywords.join(", "))
                ));
            }
            html.push_str("</section>\n");
        }

        if let Some(role) = &options.role {
            html.push_str("<footer>");
            html.push_str(&format!(
                "{} ({})",
                escape_html(&role.name),
                escape_html(&role.code)
            ));
            if let Some(description) = &role.description {
                html.push_str(&format!(" · {}", escape_html(description)));
            }
            if let Some(version) = &options.version {
                html.push_str(&format!(" · v{:03}", version.current));
                if let Some(generated) = &version.last_generated {
                    html.push_str(&format!(" · generated {}", escape_html(generated)));
                }
            }
            html.push_str("</footer>\n");
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}
