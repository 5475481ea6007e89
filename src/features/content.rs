//! Live page-content probe
//!
//! Experimental extractor variant: fetches the page behind the URL and
//! fills the content-derived columns (`iframe`, `login_form`,
//! `nb_hyperlinks`) that are otherwise constant placeholders.
//!
//! The probe is strictly best-effort. Timeouts, connection errors,
//! non-success statuses and unreadable bodies all leave the static values
//! untouched; nothing here ever surfaces an error to the request path, and
//! nothing is retried.

use scraper::{Html, Selector};

use super::vector::FeatureVector;

/// Element counts pulled out of a fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageCounts {
    pub iframes: usize,
    pub forms: usize,
    pub links: usize,
}

impl PageCounts {
    /// Overwrite the content-derived columns of a feature vector.
    ///
    /// `login_form` is only promoted to 1; a page without forms does not
    /// erase the URL-derived value.
    pub fn apply(&self, vector: &mut FeatureVector) {
        vector.set_by_name("iframe", self.iframes as f64);
        vector.set_by_name("nb_hyperlinks", self.links as f64);
        if self.forms > 0 {
            vector.set_by_name("login_form", 1.0);
        }
    }
}

/// Fetch the page and enrich the vector in place. Degrades silently.
pub async fn enrich(vector: &mut FeatureVector, url: &str, client: &reqwest::Client) {
    match fetch_counts(url, client).await {
        Some(counts) => {
            tracing::debug!(
                url,
                iframes = counts.iframes,
                forms = counts.forms,
                links = counts.links,
                "content probe succeeded"
            );
            counts.apply(vector);
        }
        None => {
            tracing::debug!(url, "content probe failed, keeping static features");
        }
    }
}

async fn fetch_counts(url: &str, client: &reqwest::Client) -> Option<PageCounts> {
    let response = client.get(url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let body = response.text().await.ok()?;
    count_elements(&body)
}

/// Count the elements of interest in an HTML document.
pub fn count_elements(html: &str) -> Option<PageCounts> {
    let document = Html::parse_document(html);
    let iframe = Selector::parse("iframe").ok()?;
    let form = Selector::parse("form").ok()?;
    let anchor = Selector::parse("a").ok()?;

    Some(PageCounts {
        iframes: document.select(&iframe).count(),
        forms: document.select(&form).count(),
        links: document.select(&anchor).count(),
    })
}
