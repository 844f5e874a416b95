//! Headlines for the configured news searches.
//!
//! Each search goes through Google News RSS, converted to JSON by the
//! public rss2json service. Only the top few headlines per search are
//! kept; the briefing feed summarizes the same items.

use daydeck_core::deck_config::NewsSource;
use serde::Deserialize;
use tracing::warn;

const RSS2JSON_API: &str = "https://api.rss2json.com/v1/api.json";
const HEADLINES_PER_SOURCE: usize = 3;

#[derive(Debug, Clone)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// Date half of the rss2json timestamp ("2026-08-25").
    pub pub_date: String,
    /// Name of the search that produced this headline.
    pub source: String,
}

#[derive(Deserialize)]
struct WireFeed {
    #[serde(default)]
    items: Vec<WireItem>,
}

#[derive(Deserialize)]
struct WireItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default, rename = "pubDate")]
    pub_date: String,
}

fn rss_search_url(query: &str) -> String {
    format!("https://news.google.com/rss/search?q={query}&hl=ko&gl=KR&ceid=KR:ko")
}

fn items_from_feed(feed: WireFeed, source: &NewsSource) -> Vec<NewsItem> {
    feed.items
        .into_iter()
        .take(HEADLINES_PER_SOURCE)
        .map(|item| NewsItem {
            title: item.title,
            link: item.link,
            pub_date: item
                .pub_date
                .split(' ')
                .next()
                .unwrap_or_default()
                .to_string(),
            source: source.name.clone(),
        })
        .collect()
}

/// Fetch headlines for every search, in config order. A failed search is
/// logged and skipped; the others still land.
pub async fn fetch(client: &reqwest::Client, sources: &[NewsSource]) -> Vec<NewsItem> {
    let mut headlines = Vec::new();

    for source in sources {
        match try_fetch(client, source).await {
            Ok(mut items) => headlines.append(&mut items),
            Err(err) => warn!(source = %source.name, %err, "news fetch failed"),
        }
    }

    headlines
}

async fn try_fetch(client: &reqwest::Client, source: &NewsSource) -> anyhow::Result<Vec<NewsItem>> {
    let feed: WireFeed = client
        .get(RSS2JSON_API)
        .query(&[("rss_url", rss_search_url(&source.query))])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(items_from_feed(feed, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> NewsSource {
        NewsSource {
            name: "FUP Global Partners".into(),
            query: "에프유피글로벌파트너스".into(),
        }
    }

    #[test]
    fn search_url_targets_korean_google_news() {
        let url = rss_search_url("에프유피글로벌파트너스");
        assert!(url.starts_with("https://news.google.com/rss/search?q="));
        assert!(url.ends_with("&hl=ko&gl=KR&ceid=KR:ko"));
    }

    #[test]
    fn keeps_top_three_and_trims_timestamps() {
        let feed: WireFeed = serde_json::from_str(
            r#"{
                "status": "ok",
                "items": [
                    { "title": "일번", "link": "https://news.example/1", "pubDate": "2026-08-25 06:10:00" },
                    { "title": "이번", "link": "https://news.example/2", "pubDate": "2026-08-24 22:40:00" },
                    { "title": "삼번", "link": "https://news.example/3", "pubDate": "2026-08-24 18:00:00" },
                    { "title": "사번", "link": "https://news.example/4", "pubDate": "2026-08-24 09:00:00" }
                ]
            }"#,
        )
        .unwrap();

        let items = items_from_feed(feed, &source());

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "일번");
        assert_eq!(items[0].pub_date, "2026-08-25");
        assert_eq!(items[2].pub_date, "2026-08-24");
        assert!(items.iter().all(|i| i.source == "FUP Global Partners"));
    }

    #[test]
    fn empty_and_dateless_feeds_are_harmless() {
        let feed: WireFeed = serde_json::from_str(r#"{ "status": "ok" }"#).unwrap();
        assert!(items_from_feed(feed, &source()).is_empty());

        let feed: WireFeed =
            serde_json::from_str(r#"{ "items": [{ "title": "무일자" }] }"#).unwrap();
        let items = items_from_feed(feed, &source());
        assert_eq!(items[0].pub_date, "");
    }
}
