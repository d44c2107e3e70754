//! Contact enrichment flow.
//!
//! Builds a prompt from what the team already knows about a contact, asks
//! the model for the enrichment-eligible fields as strict JSON, and merges
//! the answer with [`merge_enrichment`]. The flow never fails: a model
//! error or an unparseable answer degrades to a "not enriched" outcome so
//! the API can still respond with the unchanged contact.

use hiperflow_core::enrichment::{merge_enrichment, EnrichableFields};

use crate::client::{ModelClient, ModelError};

/// What the prompt may reveal about the contact.
#[derive(Debug, Clone)]
pub struct ContactProfile {
    pub name: String,
    pub email: Option<String>,
    pub company_name: Option<String>,
    /// Current values of the enrichment-eligible fields.
    pub current: EnrichableFields,
}

/// Result of an enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichmentOutcome {
    /// The contact's enrichment-eligible fields after the merge.
    pub fields: EnrichableFields,
    /// True iff at least one previously-empty field was filled.
    pub enriched: bool,
}

impl EnrichmentOutcome {
    fn unchanged(profile: &ContactProfile) -> Self {
        Self {
            fields: profile.current.clone(),
            enriched: false,
        }
    }
}

/// Run the enrichment flow for one contact.
///
/// Only empty fields can gain values; populated ones are never overwritten.
/// Failures are logged and reported as not-enriched rather than returned.
pub async fn enrich_contact(client: &ModelClient, profile: &ContactProfile) -> EnrichmentOutcome {
    let prompt = build_prompt(profile);
    let raw = match client.generate_text(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, contact = %profile.name, "Enrichment model call failed");
            return EnrichmentOutcome::unchanged(profile);
        }
    };

    let Some(suggested) = parse_fields(&raw) else {
        tracing::warn!(contact = %profile.name, "Enrichment response was not parseable JSON");
        return EnrichmentOutcome::unchanged(profile);
    };
    if suggested.is_empty() {
        tracing::debug!(contact = %profile.name, "Model had no suggestions for this contact");
        return EnrichmentOutcome::unchanged(profile);
    }

    let (fields, enriched) = merge_enrichment(&profile.current, &suggested);
    EnrichmentOutcome { fields, enriched }
}

/// Prompt asking for the five enrichment fields as strict JSON.
fn build_prompt(profile: &ContactProfile) -> String {
    let mut known = format!("- name: {}", profile.name);
    if let Some(email) = &profile.email {
        known.push_str(&format!("\n- email: {email}"));
    }
    if let Some(company) = &profile.company_name {
        known.push_str(&format!("\n- company: {company}"));
    }

    format!(
        "You are a CRM data assistant. Based on the contact details below, \
         suggest publicly known professional information about this person.\n\
         \n\
         Contact:\n{known}\n\
         \n\
         Answer with a single JSON object and nothing else, using exactly \
         these keys: \"job_title\", \"city\", \"country\", \"linkedin_url\", \
         \"twitter_url\". Use null for anything you do not know. Do not \
         guess; only include information you are confident about."
    )
}

/// Extract an [`EnrichableFields`] object from the model's answer.
///
/// Models wrap JSON in prose or markdown fences more often than not, so this
/// parses the slice between the first `{` and the last `}`.
fn parse_fields(raw: &str) -> Option<EnrichableFields> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_known_details_and_keys() {
        let profile = ContactProfile {
            name: "Ana Ruiz".to_string(),
            email: Some("ana@initech.example".to_string()),
            company_name: Some("Initech".to_string()),
            current: EnrichableFields::default(),
        };
        let prompt = build_prompt(&profile);

        assert!(prompt.contains("Ana Ruiz"));
        assert!(prompt.contains("ana@initech.example"));
        assert!(prompt.contains("Initech"));
        assert!(prompt.contains("\"linkedin_url\""));
    }

    #[test]
    fn prompt_omits_absent_details() {
        let profile = ContactProfile {
            name: "Ana Ruiz".to_string(),
            email: None,
            company_name: None,
            current: EnrichableFields::default(),
        };
        let prompt = build_prompt(&profile);

        assert!(!prompt.contains("email:"));
        assert!(!prompt.contains("company:"));
    }

    #[test]
    fn parses_bare_json() {
        let fields = parse_fields(r#"{"job_title": "CTO", "city": "Madrid"}"#).unwrap();
        assert_eq!(fields.job_title.as_deref(), Some("CTO"));
        assert_eq!(fields.city.as_deref(), Some("Madrid"));
        assert!(fields.country.is_none());
    }

    #[test]
    fn parses_json_inside_markdown_fences() {
        let raw = "```json\n{\"job_title\": \"CTO\", \"country\": null}\n```";
        let fields = parse_fields(raw).unwrap();
        assert_eq!(fields.job_title.as_deref(), Some("CTO"));
        assert!(fields.country.is_none());
    }

    #[test]
    fn parses_json_surrounded_by_prose() {
        let raw = "Sure! Here is what I found: {\"city\": \"Valencia\"} Hope it helps.";
        let fields = parse_fields(raw).unwrap();
        assert_eq!(fields.city.as_deref(), Some("Valencia"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_fields("I could not find anything.").is_none());
        assert!(parse_fields("} backwards {").is_none());
        assert!(parse_fields("{not json}").is_none());
    }
}
