//! Mail summaries from the two forwarding endpoints.
//!
//! Each endpoint is a webhook returning a JSON array of
//! `{from, subject, link}`. The raw `from` header is cleaned to a display
//! name, and mails routed through Naver are flagged so the comms section
//! can group them separately from Gmail.

use daydeck_core::deck_config::MailConfig;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Mail {
    pub from: String,
    pub subject: String,
    pub link: String,
    pub is_naver: bool,
}

#[derive(Deserialize)]
struct WireMail {
    #[serde(default)]
    from: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    link: String,
}

impl Mail {
    fn from_wire(wire: WireMail) -> Self {
        Mail {
            is_naver: wire.from.contains("@naver"),
            from: clean_sender(&wire.from),
            subject: wire.subject,
            link: wire.link,
        }
    }
}

/// `"Kim Minji" <minji@example.com>` becomes `Kim Minji`.
fn clean_sender(raw: &str) -> String {
    raw.split('<')
        .next()
        .unwrap_or(raw)
        .replace('"', "")
        .trim()
        .to_string()
}

/// The personal and company inboxes, fetched independently.
#[derive(Default)]
pub struct MailBundle {
    pub personal: Vec<Mail>,
    pub company: Vec<Mail>,
}

pub async fn fetch(client: &reqwest::Client, config: &MailConfig) -> MailBundle {
    let (personal, company) = tokio::join!(
        fetch_inbox(client, config.personal_url.as_deref(), "personal"),
        fetch_inbox(client, config.company_url.as_deref(), "company"),
    );

    MailBundle { personal, company }
}

async fn fetch_inbox(client: &reqwest::Client, url: Option<&str>, inbox: &str) -> Vec<Mail> {
    let Some(url) = url else {
        return Vec::new();
    };

    match try_fetch(client, url).await {
        Ok(mails) => mails,
        Err(err) => {
            warn!(inbox, %err, "mail fetch failed");
            Vec::new()
        }
    }
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<Mail>> {
    let wire: Vec<WireMail> = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(wire.into_iter().map(Mail::from_wire).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- sender cleanup ---

    #[test]
    fn quoted_display_names_are_unwrapped() {
        assert_eq!(
            clean_sender("\"Kim Minji\" <minji@example.com>"),
            "Kim Minji"
        );
        assert_eq!(clean_sender("Park Jun <jun@fup.co.kr>"), "Park Jun");
    }

    #[test]
    fn bare_addresses_pass_through() {
        assert_eq!(clean_sender("board@fup.co.kr"), "board@fup.co.kr");
        assert_eq!(clean_sender(""), "");
    }

    // --- wire mapping ---

    #[test]
    fn naver_routing_is_detected_before_cleanup() {
        let wire: Vec<WireMail> = serde_json::from_str(
            r#"[
                { "from": "\"Lee Soojin\" <soojin@naver.com>", "subject": "계약서 검토", "link": "https://mail.naver.com/1" },
                { "from": "\"Kim Minji\" <minji@gmail.com>", "subject": "Q3 budget", "link": "https://mail.google.com/2" }
            ]"#,
        )
        .unwrap();

        let mails: Vec<Mail> = wire.into_iter().map(Mail::from_wire).collect();

        assert!(mails[0].is_naver);
        assert_eq!(mails[0].from, "Lee Soojin");
        assert!(!mails[1].is_naver);
        assert_eq!(mails[1].subject, "Q3 budget");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let wire: Vec<WireMail> = serde_json::from_str(r#"[{ "subject": "No sender" }]"#).unwrap();
        let mail = Mail::from_wire(wire.into_iter().next().unwrap());

        assert_eq!(mail.from, "");
        assert!(!mail.is_naver);
        assert_eq!(mail.subject, "No sender");
        assert_eq!(mail.link, "");
    }
}
