use headless_chrome::{Browser, LaunchOptions};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, Result};

pub const INSTALL_HINT: &str =
    "No Chrome or Chromium executable found. Install Chrome or Chromium and make sure it is on PATH.";

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Failed to parse body selector"));

/// Extracted content of one page, produced once per request.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub url: String,
    pub markdown: String,
}

/// Dependency pre-check: can a browser executable be located at all?
pub fn browser_available() -> bool {
    headless_chrome::browser::default_executable().is_ok()
}

/// Render the page in a headless browser and return its readable text.
/// The browser driver is synchronous, so the whole crawl runs on a
/// blocking thread.
pub async fn fetch_page(url: &str) -> Result<CrawlResult> {
    let url = url.to_string();
    tokio::task::spawn_blocking(move || crawl_blocking(&url))
        .await
        .map_err(|e| AppError::Fetch(format!("Crawl task failed: {}", e)))?
}

fn crawl_blocking(url: &str) -> Result<CrawlResult> {
    if !browser_available() {
        return Err(AppError::MissingDependency(INSTALL_HINT.to_string()));
    }

    let options = LaunchOptions::default_builder()
        .headless(true)
        .build()
        .map_err(|e| AppError::Fetch(format!("Failed to configure browser: {}", e)))?;
    let browser = Browser::new(options)
        .map_err(|e| AppError::Fetch(format!("Failed to launch browser: {}", e)))?;
    let tab = browser
        .new_tab()
        .map_err(|e| AppError::Fetch(format!("Failed to open tab: {}", e)))?;

    tab.navigate_to(url)
        .map_err(|e| AppError::Fetch(format!("Navigation failed: {}", e)))?;
    tab.wait_until_navigated()
        .map_err(|e| AppError::Fetch(format!("Navigation timed out: {}", e)))?;

    let html = tab
        .get_content()
        .map_err(|e| AppError::Fetch(format!("Failed to read page content: {}", e)))?;

    let markdown = html_to_markdown(&html)?;
    info!(url, chars = markdown.len(), "extracted page content");

    Ok(CrawlResult {
        url: url.to_string(),
        markdown,
    })
}

/// Convert rendered HTML into readable markdown text.
pub fn html_to_markdown(html: &str) -> Result<String> {
    let body = extract_body(html)
        .ok_or_else(|| AppError::Fetch("No <body> element in the page".to_string()))?;

    let text = html2text::from_read(body.as_bytes(), 80)
        .map_err(|e| AppError::Fetch(format!("Failed to convert page to text: {}", e)))?;
    let text = text.trim().to_string();

    if text.is_empty() {
        return Err(AppError::Fetch("Page contained no readable content".to_string()));
    }
    Ok(text)
}

fn extract_body(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&BODY_SELECTOR)
        .next()
        .map(|element| element.inner_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_body_to_text() {
        let html = "<html><body><h1>Title</h1><p>Hello world</p></body></html>";
        let markdown = html_to_markdown(html).unwrap();
        assert!(markdown.contains("Title"));
        assert!(markdown.contains("Hello world"));
    }

    #[test]
    fn drops_markup_outside_body() {
        let html = "<html><head><title>ignored</title></head><body><p>kept</p></body></html>";
        let markdown = html_to_markdown(html).unwrap();
        assert!(markdown.contains("kept"));
        assert!(!markdown.contains("ignored"));
    }

    #[test]
    fn empty_body_is_an_error() {
        let html = "<html><body>   </body></html>";
        let err = html_to_markdown(html).unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }
}
