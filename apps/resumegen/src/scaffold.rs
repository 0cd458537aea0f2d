//! Synthesizes missing role résumés from a base document.
//!
//! For every role code in the template table whose source file does not
//! exist yet, the base résumé is cloned and its label, summary, first work
//! entry, and skills are overwritten from the template. Existing files are
//! never touched, so running this twice changes nothing on the second run.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::config::ToolkitConfig;
use crate::errors::AppError;
use crate::models::resume::{Meta, Resume, Skill};

/// The role whose source document seeds every synthesized résumé.
pub const SCAFFOLD_BASE_ROLE: &str = "FSE";

struct RoleTemplate {
    code: &'static str,
    label: &'static str,
    summary: &'static str,
    position: &'static str,
    description: &'static str,
    highlights: &'static [&'static str],
    skills: &'static [(&'static str, &'static [&'static str])],
}

const ROLE_TEMPLATES: &[RoleTemplate] = &[
    RoleTemplate {
        code: "PROJ",
        label: "Project Manager",
        summary: "Project Manager with proven expertise coordinating complex technical projects and stakeholder relationships. Skilled at delivering mission-critical initiatives on time and within budget while maintaining quality standards and team collaboration.",
        position: "Principal Project Consultant",
        description: "Project management consulting practice specializing in technical delivery and stakeholder coordination",
        highlights: &[
            "Coordinated delivery of a multi-team platform migration, holding a 100% on-time record across twelve releases",
            "Ran a pricing automation initiative end to end, aligning engineering and operations around a rollout that lifted revenue 20%",
            "Managed a compliance-driven payment integration, sequencing vendor and security workstreams to cut launch risk in half",
        ],
        skills: &[
            ("Project Management", &["Agile", "Scrum", "Kanban", "JIRA", "Confluence", "Risk Management", "Stakeholder Management"]),
            ("Technical Coordination", &["Technical Documentation", "Cross-functional Leadership", "Resource Planning", "Timeline Management"]),
        ],
    },
    RoleTemplate {
        code: "PLAT",
        label: "Platform Engineer",
        summary: "Platform Engineer with proven expertise building developer-focused infrastructure and tooling that enables scalable application development. Skilled at designing platform solutions that enhance developer productivity while maintaining enterprise-grade reliability.",
        position: "Principal Platform Consultant",
        description: "Platform engineering consulting practice specializing in developer experience and infrastructure automation",
        highlights: &[
            "Built self-service deployment tooling that let product teams ship without filing platform tickets",
            "Automated environment provisioning with workflow pipelines, cutting deployment time by 60%",
            "Packaged payment infrastructure as reusable modules, halving integration effort for new services",
        ],
        skills: &[
            ("Platform Engineering", &["Kubernetes", "Docker", "CI/CD", "Infrastructure as Code", "Service Mesh", "API Gateways"]),
            ("Developer Experience", &["Internal Tools", "Developer Portals", "Automation", "Self-service Platforms"]),
        ],
    },
    RoleTemplate {
        code: "SALE",
        label: "Sales Engineer",
        summary: "Sales Engineer with proven technical expertise building customer relationships and driving revenue through solution-oriented technical sales. Skilled at translating complex technical concepts into business value while maintaining technical credibility.",
        position: "Principal Sales Consultant",
        description: "Technical sales consulting practice specializing in solution architecture and customer success",
        highlights: &[
            "Drove technical evaluations for integration prospects, finishing the year at 150% of quota",
            "Converted 80% of proof-of-concept engagements by pairing demonstrations with hands-on pilot builds",
            "Closed compliance-sensitive payment deals worth $500K+ in annual recurring revenue",
        ],
        skills: &[
            ("Technical Sales", &["Solution Architecture", "Technical Demonstrations", "Proof of Concepts", "Competitive Analysis", "Value Selling"]),
            ("Customer Engineering", &["Technical Support", "Integration Planning", "Customer Success", "Relationship Management"]),
        ],
    },
    RoleTemplate {
        code: "CS",
        label: "Customer Success Manager",
        summary: "Customer Success Manager with technical background driving customer retention and growth through solution-oriented relationship management. Skilled at identifying expansion opportunities while ensuring technical customer satisfaction.",
        position: "Principal Customer Success Consultant",
        description: "Customer success consulting practice specializing in technical account management and growth",
        highlights: &[
            "Kept retention at 98% across a technical account book through proactive health reviews",
            "Grew existing accounts 35% by pairing adoption training with expansion planning",
            "Cut onboarding time-to-value in half for payment customers, lifting net revenue retention to 120%",
        ],
        skills: &[
            ("Customer Success", &["Account Management", "Customer Retention", "Expansion Planning", "Technical Training", "Relationship Building"]),
            ("Technical Support", &["Problem Solving", "Technical Documentation", "User Training", "Solution Optimization"]),
        ],
    },
    RoleTemplate {
        code: "DA",
        label: "Data Analyst",
        summary: "Data Analyst with proven expertise extracting insights from complex datasets to drive business decisions. Skilled at transforming raw data into actionable intelligence while building scalable reporting and analytics solutions.",
        position: "Principal Data Analytics Consultant",
        description: "Data analytics consulting practice specializing in business intelligence and insights generation",
        highlights: &[
            "Modeled customer behavior across booking funnels, informing product changes that raised engagement 40%",
            "Built pricing analytics that surfaced revenue opportunities worth a 20% uplift",
            "Implemented fraud monitoring dashboards that cut incident rates by 65%",
        ],
        skills: &[
            ("Data Analysis", &["SQL", "Python", "Statistical Analysis", "Data Modeling", "A/B Testing", "Hypothesis Testing"]),
            ("Business Intelligence", &["Tableau", "Power BI", "Dashboard Design", "KPI Development", "Reporting Automation"]),
        ],
    },
];

/// Which files a scaffold run created and which it left alone.
#[derive(Debug, Default)]
pub struct ScaffoldOutcome {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Creates a source document for every templated role that does not have
/// one yet. Skipping is the success path; a second run writes nothing.
pub fn scaffold_missing(root: &Path, config: &ToolkitConfig) -> Result<ScaffoldOutcome, AppError> {
    let base_role = config.role(SCAFFOLD_BASE_ROLE)?;
    let base_path = root.join(&base_role.source_file);
    if !base_path.exists() {
        return Err(AppError::MissingSource(base_path));
    }
    let raw = std::fs::read_to_string(&base_path)?;
    let base: Resume = serde_json::from_str(&raw)?;
    let today = Utc::now().format("%Y-%m-%d").to_string();

    let mut outcome = ScaffoldOutcome::default();
    for template in ROLE_TEMPLATES {
        let Some(role) = config.roles.get(template.code) else {
            warn!("No configured role for template {}; skipping", template.code);
            continue;
        };
        let target = root.join(&role.source_file);
        if target.exists() {
            info!(
                "Resume already exists for {}: {}",
                template.code,
                target.display()
            );
            outcome.skipped.push(target);
            continue;
        }

        let resume = apply_template(&base, template, &today);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, serde_json::to_string_pretty(&resume)?)?;
        info!(
            "Generated resume for {}: {}",
            template.code,
            target.display()
        );
        outcome.written.push(target);
    }
    Ok(outcome)
}

fn apply_template(base: &Resume, template: &RoleTemplate, today: &str) -> Resume {
    let mut resume = base.clone();
    resume.basics.label = Some(template.label.to_string());
    resume.basics.summary = Some(template.summary.to_string());
    if let Some(first) = resume.work.first_mut() {
        first.position = Some(template.position.to_string());
        first.description = Some(template.description.to_string());
        first.highlights = template.highlights.iter().map(|h| h.to_string()).collect();
    }
    resume.skills = template
        .skills
        .iter()
        .map(|(name, keywords)| Skill {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        })
        .collect();
    resume.meta.get_or_insert_with(Meta::default).last_modified = Some(today.to_string());
    resume
}
