use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Role registry, relative to the project root.
pub const ROLES_CONFIG_PATH: &str = "config/roles.json";
/// Per-role generation counters, relative to the project root.
pub const VERSIONS_STORE_PATH: &str = "config/versions.json";

/// The role registry plus output conventions, loaded once at startup and
/// passed by reference into every component that needs it.
///
/// The raw file may reference environment variables as `${VAR}`; those are
/// substituted before parsing so per-machine identity stays out of the
/// checked-in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolkitConfig {
    /// Filename prefix for versioned artifacts, e.g. "AdaLovelace".
    pub name_prefix: String,
    pub default_theme: String,
    pub output_dir: String,
    pub roles: BTreeMap<String, Role>,
}

/// One tailored-résumé target: a display name plus the JSON document
/// the role renders from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    pub source_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolkitConfig {
    /// Loads the registry from its default location. Reads `.env` first if
    /// one is present so placeholder variables can live there.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new(ROLES_CONFIG_PATH))
    }

    /// Reads, substitutes `${VAR}` placeholders, and parses a registry file.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("cannot read {}: {err}", path.display())))?;
        let substituted = substitute_env(&raw)?;
        let config: ToolkitConfig = serde_json::from_str(&substituted)?;
        Ok(config)
    }

    /// Looks up a role by code. The error enumerates every valid code so a
    /// typo is a one-round-trip fix.
    pub fn role(&self, code: &str) -> Result<&Role, AppError> {
        self.roles.get(code).ok_or_else(|| AppError::UnknownRole {
            code: code.to_string(),
            available: self.available_roles().join(", "),
        })
    }

    /// Role codes in sorted order, for listings and error messages.
    pub fn available_roles(&self) -> Vec<String> {
        self.roles.keys().cloned().collect()
    }
}

/// Replaces every `${VAR}` placeholder with the value of the environment
/// variable `VAR`. All missing variables are collected before failing so a
/// single run reports the complete set rather than the first one.
pub fn substitute_env(raw: &str) -> Result<String, AppError> {
    let placeholder =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid");
    let mut missing: Vec<String> = Vec::new();
    let substituted = placeholder.replace_all(raw, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });
    if missing.is_empty() {
        Ok(substituted.into_owned())
    } else {
        missing.sort();
        missing.dedup();
        Err(AppError::MissingEnv(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_registry() -> ToolkitConfig {
        let raw = r#"{
            "namePrefix": "AdaLovelace",
            "defaultTheme": "classic",
            "outputDir": "outputs",
            "roles": {
                "FSE": {
                    "name": "Full Stack Engineer",
                    "description": "End-to-end product work",
                    "sourceFile": "data/resume/ada_fse_resume.json"
                },
                "PM": {
                    "name": "Product Manager",
                    "sourceFile": "data/resume/ada_pm_resume.json"
                }
            }
        }"#;
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_substitute_env_replaces_placeholders() {
        std::env::set_var("RESUMEGEN_TEST_SUBST_NAME", "Ada");
        let out = substitute_env("hello ${RESUMEGEN_TEST_SUBST_NAME}!").unwrap();
        assert_eq!(out, "hello Ada!");
    }

    #[test]
    fn test_substitute_env_enumerates_all_missing_variables() {
        let err = substitute_env(
            "${RESUMEGEN_TEST_NOPE_B} and ${RESUMEGEN_TEST_NOPE_A} and ${RESUMEGEN_TEST_NOPE_B}",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Missing required environment variables"));
        // Sorted and deduplicated.
        assert!(msg.contains("RESUMEGEN_TEST_NOPE_A, RESUMEGEN_TEST_NOPE_B"), "{msg}");
    }

    #[test]
    fn test_substitute_env_leaves_plain_text_alone() {
        let raw = r#"{"outputDir": "outputs", "cost": "$100"}"#;
        assert_eq!(substitute_env(raw).unwrap(), raw);
    }

    #[test]
    fn test_load_from_substitutes_and_parses() {
        std::env::set_var("RESUMEGEN_TEST_HANDLE", "ada");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "namePrefix": "AdaLovelace",
                "defaultTheme": "classic",
                "outputDir": "outputs",
                "roles": {{
                    "SWE": {{
                        "name": "Software Engineer",
                        "sourceFile": "data/resume/${{RESUMEGEN_TEST_HANDLE}}_swe_resume.json"
                    }}
                }}
            }}"#
        )
        .unwrap();

        let config = ToolkitConfig::load_from(&path).unwrap();
        assert_eq!(config.name_prefix, "AdaLovelace");
        let role = config.role("SWE").unwrap();
        assert_eq!(role.source_file, "data/resume/ada_swe_resume.json");
    }

    #[test]
    fn test_role_lookup_unknown_code_lists_available() {
        let config = sample_registry();
        let err = config.role("NOPE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid role code: NOPE. Available roles: FSE, PM"
        );
    }

    #[test]
    fn test_available_roles_sorted() {
        let config = sample_registry();
        assert_eq!(config.available_roles(), vec!["FSE", "PM"]);
    }
}
