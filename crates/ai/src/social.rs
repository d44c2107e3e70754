//! Social post generation flow.
//!
//! The thin flow of the two: one prompt, one text answer. Unlike
//! enrichment, a model failure here is the caller's problem (the API maps
//! it to 502), since there is no sensible degraded result for "write me a
//! post".

use serde::Serialize;

use crate::client::{ModelClient, ModelError};

/// A generated post, echoing the topic it was generated for.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPost {
    pub topic: String,
    pub content: String,
}

/// Generate a short social media post about `topic`.
pub async fn generate_social_post(
    client: &ModelClient,
    topic: &str,
) -> Result<GeneratedPost, ModelError> {
    let prompt = build_prompt(topic);
    let content = client.generate_text(&prompt).await?;
    Ok(GeneratedPost {
        topic: topic.to_string(),
        content: content.trim().to_string(),
    })
}

fn build_prompt(topic: &str) -> String {
    format!(
        "Write a short, engaging social media post in Spanish about the \
         following topic. Keep it under 280 characters, use a professional \
         but approachable tone, and do not include hashtags unless they add \
         value. Answer with the post text only.\n\nTopic: {topic}"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_topic() {
        let prompt = build_prompt("lanzamiento de la nueva versión");
        assert!(prompt.contains("lanzamiento de la nueva versión"));
        assert!(prompt.contains("280"));
    }

    #[test]
    fn generated_post_serializes_with_topic_and_content() {
        let post = GeneratedPost {
            topic: "demo".to_string(),
            content: "¡Hola!".to_string(),
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["topic"], "demo");
        assert_eq!(value["content"], "¡Hola!");
    }
}
