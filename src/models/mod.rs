//! Core value types shared across providers, orchestrator, and routes.

mod analysis;

pub use analysis::{
    AnalysisJobSnapshot, AnalysisState, OutputContent, OutputMessage, OutputRole, RemoteTask,
    RemoteTaskStatus,
};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum length for free-text project fields.
const MIN_FIELD_LEN: usize = 2;

/// Whether the project belongs to a business or an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Business,
    Personal,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Business => "Business",
            UserType::Personal => "Personal",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "business" => Ok(UserType::Business),
            "personal" => Ok(UserType::Personal),
            _ => Err(format!(
                "Invalid user type: '{}'. Expected 'business' or 'personal'",
                s
            )),
        }
    }
}

/// Project details submitted through the search form.
///
/// Validated once at the HTTP boundary and read-only afterward; one value is
/// scoped to one search session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub user_type: UserType,
    pub project_name: String,
    pub business_niche: String,
    pub target_audience: String,
    /// Free-form comma-separated keyword ideas.
    pub keywords: String,
    /// Preferred TLDs, e.g. ".com, .io".
    #[serde(rename = "preferredTLDs")]
    pub preferred_tlds: String,
}

impl ProjectDetails {
    /// Validate field length constraints from the search form contract.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_min_len("projectName", &self.project_name, MIN_FIELD_LEN)?;
        check_min_len("businessNiche", &self.business_niche, MIN_FIELD_LEN)?;
        check_min_len("targetAudience", &self.target_audience, MIN_FIELD_LEN)?;
        check_min_len("keywords", &self.keywords, MIN_FIELD_LEN)?;
        check_min_len("preferredTLDs", &self.preferred_tlds, 1)?;
        Ok(())
    }
}

fn check_min_len(field: &'static str, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {} characters", min),
        ));
    }
    Ok(())
}

/// A single AI-generated domain suggestion.
///
/// Identity within one response is `domain_name`; duplicates are an upstream
/// contract violation and are not defended against further.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub domain_name: String,
    /// Confidence in [0, 1]; clamped when parsing untrusted upstream output.
    pub confidence_score: f64,
    pub explanation: String,
}

/// Wire shape of the suggestion-generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionList {
    pub suggestions: Vec<Suggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_details() -> ProjectDetails {
        ProjectDetails {
            user_type: UserType::Business,
            project_name: "Fernweh Travel".to_string(),
            business_niche: "boutique travel planning".to_string(),
            target_audience: "young professionals in Europe".to_string(),
            keywords: "wander, journey, escape".to_string(),
            preferred_tlds: ".com, .travel".to_string(),
        }
    }

    #[test]
    fn test_valid_details_pass() {
        assert!(valid_details().validate().is_ok());
    }

    #[test]
    fn test_short_project_name_rejected() {
        let mut details = valid_details();
        details.project_name = "x".to_string();
        let err = details.validate().unwrap_err();
        assert_eq!(err.field, "projectName");
    }

    #[test]
    fn test_whitespace_only_keywords_rejected() {
        let mut details = valid_details();
        details.keywords = "   ".to_string();
        assert!(details.validate().is_err());
    }

    #[test]
    fn test_single_char_tld_allowed() {
        let mut details = valid_details();
        details.preferred_tlds = ".".to_string();
        assert!(details.validate().is_ok());
    }

    #[test]
    fn test_user_type_round_trip() {
        assert_eq!("business".parse::<UserType>().unwrap(), UserType::Business);
        assert_eq!("Personal".parse::<UserType>().unwrap(), UserType::Personal);
        assert!("company".parse::<UserType>().is_err());
    }
}
