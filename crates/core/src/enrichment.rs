//! Contact enrichment merge heuristic.
//!
//! The AI crate asks a language model to suggest values for a contact's
//! optional profile fields. The merge here is conservative: suggestions only
//! fill fields that are currently empty, never overwrite user-entered data.
//! A contact counts as enriched only when at least one empty field was filled.

use serde::{Deserialize, Serialize};

/// The contact profile fields that enrichment may fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichableFields {
    pub job_title: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
}

impl EnrichableFields {
    pub fn is_empty(&self) -> bool {
        field_is_empty(&self.job_title)
            && field_is_empty(&self.city)
            && field_is_empty(&self.country)
            && field_is_empty(&self.linkedin_url)
            && field_is_empty(&self.twitter_url)
    }
}

/// Merge `suggested` into `current`, filling only empty fields.
///
/// Returns the merged fields and whether anything was actually filled. A
/// suggestion that merely repeats or contradicts an already-populated field
/// does not count as enrichment.
pub fn merge_enrichment(
    current: &EnrichableFields,
    suggested: &EnrichableFields,
) -> (EnrichableFields, bool) {
    let mut merged = current.clone();
    let mut filled = false;

    for (slot, suggestion) in [
        (&mut merged.job_title, &suggested.job_title),
        (&mut merged.city, &suggested.city),
        (&mut merged.country, &suggested.country),
        (&mut merged.linkedin_url, &suggested.linkedin_url),
        (&mut merged.twitter_url, &suggested.twitter_url),
    ] {
        if field_is_empty(slot) {
            if let Some(value) = clean(suggestion) {
                *slot = Some(value);
                filled = true;
            }
        }
    }

    (merged, filled)
}

fn field_is_empty(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn clean(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
