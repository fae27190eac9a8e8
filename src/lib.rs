pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod error;

use std::sync::Arc;

use serde::Serialize;

use analysis::{Analysis, DeepSeekClient};
use config::Config;
use crawler::fetch_page;
use error::Result;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Final response object for one URL: the page content plus its analysis.
/// Lives only for the duration of one request.
#[derive(Debug, Serialize)]
pub struct CombinedResult {
    pub url: String,
    pub raw_content: String,
    pub analysis: Analysis,
}

/// Crawl a page, then run the extracted text through the analysis client.
/// Fetch failures propagate; analysis failures are captured inside the
/// `analysis` field instead of failing the whole operation.
pub async fn crawl_and_analyze(client: &DeepSeekClient, url: &str) -> Result<CombinedResult> {
    let page = fetch_page(url).await?;
    let analysis = client.analyze_content(&page.markdown).await;

    Ok(CombinedResult {
        url: page.url,
        raw_content: page.markdown,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_result_wire_shape() {
        let result = CombinedResult {
            url: "https://example.com".to_string(),
            raw_content: "# Heading".to_string(),
            analysis: Analysis::Raw {
                raw_analysis: "summary".to_string(),
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["raw_content"], "# Heading");
        assert_eq!(json["analysis"]["raw_analysis"], "summary");
    }
}
