//! Generation pipelines: versioned role artifacts and ad-hoc one-offs.
//!
//! The versioned path validates the role, parses the source document,
//! persists the bumped counter, then renders and writes. The ad-hoc path
//! renders an arbitrary résumé JSON with no counter at all; its outputs are
//! untracked scratch files.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::artifact;
use crate::config::{ToolkitConfig, VERSIONS_STORE_PATH};
use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::theme::{self, RoleContext, ThemeOptions, VersionContext};
use crate::versions::VersionStore;

/// What a successful versioned generation produced.
#[derive(Debug)]
pub struct GenerationReceipt {
    pub filename: String,
    pub file_path: PathBuf,
    pub role_code: String,
    pub role_name: String,
    pub version: u32,
    pub theme: String,
}

/// What a successful ad-hoc generation produced.
#[derive(Debug)]
pub struct AdhocReceipt {
    pub filename: String,
    pub file_path: PathBuf,
    pub timestamp: String,
    pub hash: String,
}

/// Runs the versioned pipeline for a role code. `root` anchors every
/// relative path from the config.
///
/// The version store is rewritten before the artifact goes to disk, so a
/// failed write can leave a consumed version number behind. The counter is
/// advisory; callers must not treat it as proof an artifact exists.
pub fn generate_versioned(
    root: &Path,
    config: &ToolkitConfig,
    role_code: &str,
    theme_override: Option<&str>,
    output_override: Option<&str>,
) -> Result<GenerationReceipt, AppError> {
    let role = config.role(role_code)?;
    let theme_id = theme_override.unwrap_or(&config.default_theme);
    let output_dir = output_override.unwrap_or(&config.output_dir);

    let source = root.join(&role.source_file);
    if !source.exists() {
        return Err(AppError::MissingSource(source));
    }

    debug!("Reading resume source: {}", source.display());
    let raw = std::fs::read_to_string(&source)?;
    let resume: Resume = serde_json::from_str(&raw)?;
    let theme = theme::resolve(theme_id)?;

    let store_path = root.join(VERSIONS_STORE_PATH);
    let mut store = VersionStore::load(&store_path)?;
    let record = store.increment(role_code);
    store.save(&store_path)?;

    let options = ThemeOptions {
        role: Some(RoleContext {
            code: role_code.to_string(),
            name: role.name.clone(),
            description: role.description.clone(),
        }),
        version: Some(VersionContext {
            current: record.current,
            last_generated: record.last_generated.clone(),
        }),
    };
    let html = theme.render(&resume, &options)?;

    let filename = artifact::versioned_filename(&config.name_prefix, role_code, record.current);
    let file_path = artifact::write_artifact(&root.join(output_dir), &filename, &html)?;

    info!("Resume generated successfully: {}", filename);

    Ok(GenerationReceipt {
        filename,
        file_path,
        role_code: role_code.to_string(),
        role_name: role.name.clone(),
        version: record.current,
        theme: theme_id.to_string(),
    })
}

/// Renders an arbitrary résumé JSON with no role context and no version
/// counter. Re-running produces a different filename every time.
pub fn generate_adhoc(
    root: &Path,
    resume_path: &Path,
    theme_id: &str,
    output_dir: &str,
) -> Result<AdhocReceipt, AppError> {
    let raw = std::fs::read_to_string(resume_path)?;
    let resume: Resume = serde_json::from_str(&raw)?;
    let theme = theme::resolve(theme_id)?;

    let html = theme.render(&resume, &ThemeOptions::default())?;

    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
    let hash = artifact::short_hash();
    let filename = artifact::adhoc_filename(&resume, &timestamp, &hash);
    let file_path = artifact::write_artifact(&root.join(output_dir), &filename, &html)?;

    info!("Resume generated successfully: {}", file_path.display());

    Ok(AdhocReceipt {
        filename,
        file_path,
        timestamp,
        hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Role;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn test_config() -> ToolkitConfig {
        let mut roles = BTreeMap::new();
        roles.insert(
            "PM".to_string(),
            Role {
                name: "Product Manager".to_string(),
                source_file: "data/pm.json".to_string(),
                description: Some("Roadmaps and delivery".to_string()),
            },
        );
        ToolkitConfig {
            name_prefix: "AdaLovelace".to_string(),
            default_theme: "classic".to_string(),
            output_dir: "outputs".to_string(),
            roles,
        }
    }

    fn write_source(root: &Path) {
        let resume = json!({
            "basics": {"name": "Ada Lovelace", "label": "Product Manager"},
            "work": [{"position": "PM", "highlights": ["Shipped v1"]}],
            "skills": [{"name": "Core", "keywords": ["Roadmaps"]}]
        });
        std::fs::create_dir_all(root.join("data")).unwrap();
        std::fs::write(root.join("data/pm.json"), resume.to_string()).unwrap();
    }

    #[test]
    fn test_generate_versioned_first_run_yields_version_one() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());

        let receipt =
            generate_versioned(dir.path(), &test_config(), "PM", None, None).unwrap();

        assert_eq!(receipt.version, 1);
        assert_eq!(receipt.filename, "AdaLovelace_PM_v001.html");
        assert_eq!(receipt.role_name, "Product Manager");
        assert_eq!(receipt.theme, "classic");

        let html = std::fs::read_to_string(&receipt.file_path).unwrap();
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("v001"));

        let store = VersionStore::load(&dir.path().join(VERSIONS_STORE_PATH)).unwrap();
        assert_eq!(store.record("PM").unwrap().current, 1);
    }

    #[test]
    fn test_generate_versioned_increments_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());
        let config = test_config();

        let first = generate_versioned(dir.path(), &config, "PM", None, None).unwrap();
        let second = generate_versioned(dir.path(), &config, "PM", None, None).unwrap();

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(second.filename, "AdaLovelace_PM_v002.html");
        assert!(first.file_path.exists());
        assert!(second.file_path.exists());
    }

    #[test]
    fn test_generate_versioned_unknown_role_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());

        let err = generate_versioned(dir.path(), &test_config(), "NOPE", None, None).unwrap_err();
        assert!(err.to_string().contains("Invalid role code: NOPE"));
        assert!(!dir.path().join("outputs").exists());
        assert!(!dir.path().join(VERSIONS_STORE_PATH).exists());
    }

    #[test]
    fn test_generate_versioned_missing_source_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // No source file written.
        let err = generate_versioned(dir.path(), &test_config(), "PM", None, None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Resume source file not found:"), "{msg}");
        assert!(msg.contains("pm.json"));
        assert!(!dir.path().join(VERSIONS_STORE_PATH).exists());
    }

    #[test]
    fn test_generate_versioned_bad_json_fails_before_any_increment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/pm.json"), "{not json").unwrap();

        let err = generate_versioned(dir.path(), &test_config(), "PM", None, None).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        assert!(!dir.path().join(VERSIONS_STORE_PATH).exists());
        assert!(!dir.path().join("outputs").exists());
    }

    #[test]
    fn test_generate_versioned_unknown_theme_prevents_increment() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());

        let err =
            generate_versioned(dir.path(), &test_config(), "PM", Some("neon"), None).unwrap_err();
        assert!(matches!(err, AppError::UnknownTheme { .. }));
        assert!(!dir.path().join(VERSIONS_STORE_PATH).exists());
    }

    #[test]
    fn test_generate_versioned_honors_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());

        let receipt = generate_versioned(
            dir.path(),
            &test_config(),
            "PM",
            Some("compact"),
            Some("drafts"),
        )
        .unwrap();
        assert_eq!(receipt.theme, "compact");
        assert!(receipt.file_path.starts_with(dir.path().join("drafts")));
    }

    #[test]
    fn test_generate_adhoc_writes_untracked_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());

        let receipt =
            generate_adhoc(dir.path(), &dir.path().join("data/pm.json"), "classic", "outputs")
                .unwrap();

        assert!(receipt.filename.starts_with("ada_lovelace_v"));
        assert!(receipt.filename.ends_with(&format!("{}.html", receipt.hash)));
        assert!(receipt.file_path.exists());
        // Ad-hoc generations never touch the version store.
        assert!(!dir.path().join(VERSIONS_STORE_PATH).exists());
    }

    #[test]
    fn test_generate_adhoc_unknown_theme_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());

        let err = generate_adhoc(dir.path(), &dir.path().join("data/pm.json"), "neon", "outputs")
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownTheme { .. }));
    }
}
