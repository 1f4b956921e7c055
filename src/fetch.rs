// src/fetch.rs

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use scraper::Html;
use tracing::debug;

use crate::config::USER_AGENT;
use crate::error::CrawlError;

/// How a fetched body is handed to the HTML parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ParseMode {
    /// Full page, with implied `<html>`/`<body>` added where missing.
    #[default]
    Document,
    /// Markup snippet without document structure.
    Fragment,
}

impl ParseMode {
    pub fn parse(self, body: &str) -> Html {
        match self {
            ParseMode::Document => Html::parse_document(body),
            ParseMode::Fragment => Html::parse_fragment(body),
        }
    }
}

/// Blocking client shared by every vendor fetch.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("building HTTP client")
}

/// GET `url` and return its body. Any non-2xx status is an error; there are no retries.
pub fn get_text(client: &Client, url: &str) -> Result<String, CrawlError> {
    debug!("Fetching text from {}", url);
    let resp = client.get(url).send().map_err(|source| CrawlError::Request {
        url: url.to_string(),
        source,
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status,
        });
    }

    resp.text().map_err(|source| CrawlError::Request {
        url: url.to_string(),
        source,
    })
}

pub fn fetch_document(client: &Client, url: &str, mode: ParseMode) -> Result<Html, CrawlError> {
    let body = get_text(client, url)?;
    debug!(url, bytes = body.len(), "parsing page");
    Ok(mode.parse(&body))
}
