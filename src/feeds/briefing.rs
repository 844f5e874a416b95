//! AI morning briefing over the fetched headlines.
//!
//! One Gemini `generateContent` call. This feed never fails outward:
//! every degraded state collapses to a displayable sentence, because the
//! briefing slot always renders something.

use daydeck_core::deck_config::BriefingConfig;
use serde::Deserialize;
use tracing::warn;

use super::news::NewsItem;

const GENERATE_API: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const NO_NEWS: &str = "No significant updates found for your companies this morning.";
const NO_KEY: &str = "AI Summary unavailable: API Key not configured.";
const EMPTY_REPLY: &str = "Summary unavailable.";
const FAILED: &str = "Error generating AI summary.";

/// Summarize the morning's headlines into a short executive briefing.
pub async fn summarize(
    client: &reqwest::Client,
    config: &BriefingConfig,
    news: &[NewsItem],
) -> String {
    if news.is_empty() {
        return NO_NEWS.to_string();
    }

    let Some(api_key) = &config.api_key else {
        return NO_KEY.to_string();
    };

    match try_summarize(client, api_key, &config.model, news).await {
        Ok(Some(text)) => text,
        Ok(None) => EMPTY_REPLY.to_string(),
        Err(err) => {
            warn!(%err, "briefing generation failed");
            FAILED.to_string()
        }
    }
}

fn build_prompt(news: &[NewsItem]) -> String {
    let context = news
        .iter()
        .map(|item| format!("[{}] {}", item.source, item.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an elite executive assistant. Summarize the following company news \
        into a concise, sophisticated 3-sentence morning briefing for the CEO. Focus \
        on market sentiment and key strategic movements. Keep it professional and \
        insightful.\n\nNews Data:\n{context}"
    )
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

fn first_text(response: GenerateResponse) -> Option<String> {
    let text = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text;

    if text.is_empty() { None } else { Some(text) }
}

async fn try_summarize(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    news: &[NewsItem],
) -> anyhow::Result<Option<String>> {
    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": build_prompt(news) }] }],
        "generationConfig": { "temperature": 0.7, "topP": 0.95 },
    });

    let response: GenerateResponse = client
        .post(format!("{GENERATE_API}/{model}:generateContent"))
        .query(&[("key", api_key)])
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(first_text(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(source: &str, title: &str) -> NewsItem {
        NewsItem {
            title: title.into(),
            link: "https://news.example/1".into(),
            pub_date: "2026-08-25".into(),
            source: source.into(),
        }
    }

    // --- degraded states ---

    #[tokio::test]
    async fn no_headlines_short_circuits_before_any_call() {
        let client = reqwest::Client::new();
        let config = BriefingConfig::default();

        let text = summarize(&client, &config, &[]).await;
        assert_eq!(
            text,
            "No significant updates found for your companies this morning."
        );
    }

    #[tokio::test]
    async fn missing_key_reports_itself() {
        let client = reqwest::Client::new();
        let config = BriefingConfig::default();
        let news = [item("FUP Global Partners", "신규 계약 체결")];

        let text = summarize(&client, &config, &news).await;
        assert_eq!(text, "AI Summary unavailable: API Key not configured.");
    }

    // --- prompt assembly ---

    #[test]
    fn prompt_lists_headlines_with_their_sources() {
        let news = [
            item("FUP Global Partners", "신규 계약 체결"),
            item("Hana Logistics", "물류센터 확장"),
        ];

        let prompt = build_prompt(&news);
        assert!(prompt.contains("[FUP Global Partners] 신규 계약 체결"));
        assert!(prompt.contains("[Hana Logistics] 물류센터 확장"));
        assert!(prompt.contains("3-sentence morning briefing"));
    }

    // --- response extraction ---

    #[test]
    fn first_candidate_text_wins() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    { "content": { "parts": [{ "text": "Markets are steady." }] } },
                    { "content": { "parts": [{ "text": "ignored" }] } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(first_text(response).as_deref(), Some("Markets are steady."));
    }

    #[test]
    fn empty_candidates_yield_none() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(first_text(response).is_none());

        let response: GenerateResponse =
            serde_json::from_str(r#"{ "candidates": [{}] }"#).unwrap();
        assert!(first_text(response).is_none());
    }
}
