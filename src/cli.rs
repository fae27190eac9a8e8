use std::io::{self, BufRead, Write};

use serde_json::Value;

use crate::analysis::{Analysis, DeepSeekClient};
use crate::config::Config;
use crate::crawler;
use crate::error::{AppError, Result};
use crate::{crawl_and_analyze, CombinedResult};

const QUIT_SENTINEL: &str = "q";
const NOT_EXTRACTED: &str = "not extracted";

/// Interactive loop: prompt for URLs until the quit sentinel. Per-URL
/// failures are printed and the loop keeps going.
pub async fn run_interactive(config: &Config) -> Result<()> {
    println!("Web page crawl & analysis tool");
    println!("{}", "-".repeat(30));

    if !crawler::browser_available() {
        println!("\n{}", crawler::INSTALL_HINT);
        println!("Install the browser and run the program again.");
        return Ok(());
    }

    let client = match &config.api_key {
        Some(key) => DeepSeekClient::new(key, &config.base_url, &config.model)?,
        None => client_with_retry(config, || prompt("Enter your DeepSeek API key: "))?,
    };

    loop {
        let url = prompt("\nEnter a URL to analyze ('q' to quit): ")?;
        if url.eq_ignore_ascii_case(QUIT_SENTINEL) {
            break;
        }
        if url.is_empty() {
            continue;
        }

        println!("\nCrawling and analyzing: {}", url);
        match crawl_and_analyze(&client, &url).await {
            Ok(result) => print_result(&result),
            Err(e) => {
                println!("\nError while processing: {}", e);
                if matches!(e, AppError::MissingDependency(_)) {
                    println!("{}", crawler::INSTALL_HINT);
                }
            }
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

// Keep asking for a credential until one is accepted, so a bad entry does
// not end the session.
fn client_with_retry(
    config: &Config,
    mut read_key: impl FnMut() -> Result<String>,
) -> Result<DeepSeekClient> {
    loop {
        let key = read_key()?;
        match DeepSeekClient::new(&key, &config.base_url, &config.model) {
            Ok(client) => return Ok(client),
            Err(e) => println!("{}", e),
        }
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_result(result: &CombinedResult) {
    let sep = "=".repeat(80);
    println!("\n{}", sep);
    println!("Page analysis result");
    println!("{}", sep);
    println!("URL: {}", result.url);

    match &result.analysis {
        Analysis::Failed { error } => {
            println!("\nAnalysis failed: {}", error);
            return;
        }
        Analysis::Raw { raw_analysis } => {
            println!("\nAnalysis:");
            println!("{}", raw_analysis);
        }
        Analysis::Structured(fields) => {
            println!("\nTitle: {}", field(fields, "title"));
            println!("Author: {}", field(fields, "author"));
            println!("Date: {}", field(fields, "date"));
            println!("Source: {}", field(fields, "source"));

            if let Some(keywords) = fields.get("keywords") {
                println!("Keywords: {}", render(keywords));
            }
            if let Some(summary) = fields.get("abstract") {
                println!("\nAbstract:");
                println!("{}", render(summary));
            }
        }
    }

    println!("\n{}", sep);
    println!("Raw crawled content");
    println!("{}", sep);
    println!("{}", result.raw_content);
    println!("{}", sep);
}

fn field(fields: &Value, key: &str) -> String {
    fields
        .get(key)
        .map(render)
        .unwrap_or_else(|| NOT_EXTRACTED.to_string())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
