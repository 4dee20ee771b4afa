//! Live funding-rounds listing source (blocking HTTP + HTML extraction).

use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::data::source::{RawRecord, RecordSource, SourceError};

const DEFAULT_BASE_URL: &str = "https://www.crunchbase.com/funding_rounds";

const CARD: &str = "div.company-card";
const NAME: &str = "h3.company-name";
const INDUSTRY: &str = "div.industry";
const LOCATION: &str = "div.location";
const FUNDING: &str = "div.funding-amount";
const EMPLOYEES: &str = "div.employees";
const FOUNDING_YEAR: &str = "div.founding-year";

/// Connection settings for the live listing.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub user_agent: Option<String>,
    /// Bounded wait for each page.
    pub timeout: Duration,
}

impl SourceConfig {
    /// Read `LEADS_SOURCE_URL` / `LEADS_USER_AGENT` (a `.env` file is honored).
    pub fn from_env(timeout: Duration) -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("LEADS_SOURCE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let user_agent = std::env::var("LEADS_USER_AGENT")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self {
            base_url,
            user_agent,
            timeout,
        }
    }
}

pub struct CrunchbaseSource {
    config: SourceConfig,
    client: Option<Client>,
}

impl CrunchbaseSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config, client: None }
    }
}

impl RecordSource for CrunchbaseSource {
    fn name(&self) -> &str {
        "crunchbase"
    }

    fn open(&mut self) -> Result<(), SourceError> {
        let mut builder = Client::builder().timeout(self.config.timeout);
        if let Some(agent) = &self.config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| SourceError::Setup(format!("HTTP client: {e}")))?;
        self.client = Some(client);
        Ok(())
    }

    fn fetch_page(&mut self, page: usize) -> Result<Vec<RawRecord>, SourceError> {
        let client = self.client.as_ref().ok_or(SourceError::NotOpen)?;

        let resp = client
            .get(&self.config.base_url)
            .query(&[("page", page.to_string())])
            .send()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .map_err(|e| SourceError::Request(format!("reading body: {e}")))?;
        debug!(page, bytes = body.len(), "fetched listing page");

        parse_listing(&body, page)
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("closed HTTP session");
        }
    }
}

/// Extract every company card from one listing page.
///
/// A page without any card is an error: the listing layout changed or we were
/// served a block page.
pub fn parse_listing(html: &str, page: usize) -> Result<Vec<RawRecord>, SourceError> {
    let doc = Html::parse_document(html);
    let card_sel = selector(CARD)?;
    let name_sel = selector(NAME)?;
    let industry_sel = selector(INDUSTRY)?;
    let location_sel = selector(LOCATION)?;
    let funding_sel = selector(FUNDING)?;
    let employees_sel = selector(EMPLOYEES)?;
    let year_sel = selector(FOUNDING_YEAR)?;

    let records: Vec<RawRecord> = doc
        .select(&card_sel)
        .map(|card| RawRecord {
            name: field_text(card, &name_sel),
            funding: field_text(card, &funding_sel),
            industry: field_text(card, &industry_sel),
            location: field_text(card, &location_sel),
            employees: field_text(card, &employees_sel),
            founding_year: field_text(card, &year_sel),
        })
        .collect();

    if records.is_empty() {
        return Err(SourceError::MissingElements { page });
    }
    Ok(records)
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("selector '{css}': {e:?}")))
}

fn field_text(card: ElementRef<'_>, sel: &Selector) -> Option<String> {
    let el = card.select(sel).next()?;
    let text = el.text().collect::<String>();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="company-card">
            <h3 class="company-name"> Acme Robotics </h3>
            <div class="industry">Robotics</div>
            <div class="location">Austin</div>
            <div class="funding-amount">$12M</div>
            <div class="employees">51-100</div>
            <div class="founding-year">2016</div>
          </div>
          <div class="company-card">
            <h3 class="company-name">Quiet Co</h3>
            <div class="industry">  </div>
            <div class="location">Lisbon</div>
          </div>
        </body></html>
    "#;

    #[test]
    fn parse_listing_extracts_cards() {
        let records = parse_listing(PAGE, 1).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.name.as_deref(), Some("Acme Robotics"));
        assert_eq!(first.industry.as_deref(), Some("Robotics"));
        assert_eq!(first.location.as_deref(), Some("Austin"));
        assert_eq!(first.funding.as_deref(), Some("$12M"));
        assert_eq!(first.employees.as_deref(), Some("51-100"));
        assert_eq!(first.founding_year.as_deref(), Some("2016"));

        let second = &records[1];
        assert_eq!(second.name.as_deref(), Some("Quiet Co"));
        assert_eq!(second.industry, None, "blank text counts as missing");
        assert_eq!(second.funding, None);
        assert_eq!(second.founding_year, None);
    }

    #[test]
    fn page_without_cards_is_an_error() {
        let err = parse_listing("<html><body><p>blocked</p></body></html>", 3).unwrap_err();
        assert_eq!(err, SourceError::MissingElements { page: 3 });
    }

    #[test]
    fn fetch_before_open_fails() {
        let mut source = CrunchbaseSource::new(SourceConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            user_agent: None,
            timeout: Duration::from_millis(10),
        });
        assert_eq!(source.fetch_page(1).unwrap_err(), SourceError::NotOpen);
        // Closing an unopened source is a no-op.
        source.close();
    }
}
