//! Onboarding profile produced by the decision-tree walk.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sector and activity picked while walking the company taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetail {
    /// First taxonomy answer below the company type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Second taxonomy answer below the company type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actividad: Option<String>,
}

/// Company profile saved at the end of onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingProfile {
    /// Company type (root taxonomy answer).
    #[serde(default)]
    pub tipo_empresa: Option<String>,
    /// Main motivations.
    #[serde(default)]
    pub interes: Vec<String>,
    /// Headcount bracket.
    #[serde(default, rename = "tamaño_empresa")]
    pub tamano_empresa: Option<String>,
    /// Company website, normalized to an absolute URL.
    #[serde(default)]
    pub web: Option<String>,
    /// Taxonomy detail.
    #[serde(default)]
    pub detalle_empresa: CompanyDetail,
    /// Every answer given, keyed by question.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub answers: BTreeMap<String, serde_json::Value>,
}

/// Prefix `https://` unless the URL already has an http(s) scheme.
pub fn normalize_web(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}
