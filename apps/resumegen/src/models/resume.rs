//! The résumé document model.
//!
//! The on-disk format is JSON conforming loosely to the JSON Resume schema.
//! Only the fields the toolkit actually touches are typed (basics, work,
//! skills, meta); everything else is preserved verbatim through flattened
//! passthrough maps so a document round-trips without data loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A full résumé document. All sections are optional on input; unknown
/// top-level fields (education, projects, ...) survive in `rest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default)]
    pub basics: Basics,
    #[serde(default)]
    pub work: Vec<WorkEntry>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The `basics` section: identity and headline fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Basics {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One work-history entry. `name` is the employer; dates stay strings
/// because résumé dates are partial ("2020-03").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One skill group: a heading plus its keyword list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The `meta` section; only `lastModified` is written by the toolkit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}
