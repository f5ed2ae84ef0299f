use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;
use thiserror::Error;
use tracing::debug;

use super::pretty;

/// Where the puzzle text lives on a day page
pub const CONTENT_SELECTOR: &str = "article.day-desc";

const ANCHOR_SELECTOR: &str = "a[href]";

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("No element matching '{0}' in page")]
    MissingContent(String),
}

/// A parsed page, owned by one rewrite
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// First element matching `selector`
    pub fn content_region(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }
}

/// An anchor inside the content region and the href it carries
#[derive(Debug, Clone, Copy)]
pub struct AnchorRef<'a> {
    pub element: ElementRef<'a>,
    pub href: &'a str,
}

/// Turns relative links in the content region into absolute ones
pub struct LinkRewriter {
    content_selector: String,
    content: Selector,
    anchors: Selector,
}

impl LinkRewriter {
    pub fn new(content_selector: &str) -> Result<Self, RewriteError> {
        Ok(Self {
            content_selector: content_selector.to_string(),
            content: parse_selector(content_selector)?,
            anchors: parse_selector(ANCHOR_SELECTOR)?,
        })
    }

    /// Parse `html`, rewrite the anchors of its content region against
    /// `base_url`, and return the region pretty-printed.
    ///
    /// The parsed tree is left as it is; rewritten hrefs are substituted
    /// while serializing.
    pub fn rewrite(&self, html: &str, base_url: &str) -> Result<String, RewriteError> {
        let document = Document::parse(html);
        let region = document
            .content_region(&self.content)
            .ok_or_else(|| RewriteError::MissingContent(self.content_selector.clone()))?;

        let rewrites: Vec<_> = self
            .anchors(region)
            .into_iter()
            .filter_map(|anchor| match absolutize_href(anchor.href, base_url) {
                Cow::Owned(href) => Some((anchor.element.id(), href)),
                Cow::Borrowed(_) => None,
            })
            .collect();
        debug!("Rewriting {} relative link(s) against {}", rewrites.len(), base_url);

        Ok(pretty::prettify_with(region, &|element, name| {
            if name != "href" {
                return None;
            }
            rewrites
                .iter()
                .find(|(id, _)| *id == element.id())
                .map(|(_, href)| href.clone())
        }))
    }

    /// Every anchor with an href inside `region`
    pub fn anchors<'a>(&self, region: ElementRef<'a>) -> Vec<AnchorRef<'a>> {
        region
            .select(&self.anchors)
            .filter_map(|element| {
                element
                    .value()
                    .attr("href")
                    .map(|href| AnchorRef { element, href })
            })
            .collect()
    }
}

/// Prefix `base_url` onto `href` unless it already starts with `http`.
///
/// Plain concatenation: slashes are neither added nor collapsed.
pub fn absolutize_href<'h>(href: &'h str, base_url: &str) -> Cow<'h, str> {
    if href.starts_with("http") {
        Cow::Borrowed(href)
    } else {
        Cow::Owned(format!("{}{}", base_url, href))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, RewriteError> {
    Selector::parse(selector).map_err(|e| RewriteError::InvalidSelector(format!("{}: {:?}", selector, e)))
}
