//! Page loading and DOM queries.
//!
//! A [`LoadedPage`] owns the raw HTML and its parsed [`Html`] document.
//! Queries hand out [`ElementRef`]s borrowed from the page, in document order.
//!
//! Two query shapes are supported:
//!
//! - [`LoadedPage::locator`]: any CSS selector (`link[rel="stylesheet"]`,
//!   `script[defer]`, `nav a`, `.image-details`).
//! - [`LoadedPage::get_by_role`]: a selector plus an optional accessible-name
//!   filter matched against the element's text, or its `alt` when the text is
//!   empty.
//!
//! Reading text or attributes from an element never fails: a missing
//! attribute reads as `""`.

use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
}

/// An HTML file read from disk and parsed.
#[derive(Debug)]
pub struct LoadedPage {
    /// Full file contents.
    pub html: String,
    /// Parsed document.
    pub document: Html,
    /// Path the page was loaded from, relative to the site root.
    pub url: String,
}

/// Read and parse `relative_path` under `root`.
///
/// Fails with [`PageError::NotFound`] when the file does not exist.
pub fn load_page(root: &Path, relative_path: &str) -> Result<LoadedPage, PageError> {
    let full_path = root.join(relative_path);
    if !full_path.exists() {
        return Err(PageError::NotFound(full_path));
    }
    let html = fs::read_to_string(&full_path)?;
    let document = Html::parse_document(&html);
    debug!(page = relative_path, bytes = html.len(), "loaded page");
    Ok(LoadedPage {
        html,
        document,
        url: relative_path.to_string(),
    })
}

/// Parse a CSS selector, turning the borrowed parse error into a [`PageError`].
pub fn parse_selector(selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|e| PageError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

impl LoadedPage {
    /// Parse an in-memory document. Used for pages that never touched disk.
    pub fn from_html(url: &str, html: &str) -> Self {
        LoadedPage {
            html: html.to_string(),
            document: Html::parse_document(html),
            url: url.to_string(),
        }
    }

    /// All elements matching `selector`, in document order.
    pub fn locator(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, PageError> {
        let parsed = parse_selector(selector)?;
        Ok(self.document.select(&parsed).collect())
    }

    /// Elements matching `role`, optionally filtered by accessible name.
    ///
    /// The name matches when it is a substring of the element's trimmed text,
    /// or of its `alt` attribute when the text is empty.
    pub fn get_by_role(
        &self,
        role: &str,
        name: Option<&str>,
    ) -> Result<Vec<ElementRef<'_>>, PageError> {
        let elements = self.locator(role)?;
        let Some(name) = name else {
            return Ok(elements);
        };
        Ok(elements
            .into_iter()
            .filter(|el| accessible_name(*el).contains(name))
            .collect())
    }

    /// First `a` whose trimmed text contains `needle`.
    pub fn find_link_by_text(&self, needle: &str) -> Result<Option<ElementRef<'_>>, PageError> {
        Ok(self
            .locator("a")?
            .into_iter()
            .find(|a| element_text(*a).contains(needle)))
    }

    /// First `nav a` whose trimmed text equals `name`.
    pub fn find_nav_link(&self, name: &str) -> Result<Option<ElementRef<'_>>, PageError> {
        Ok(self
            .locator("nav a")?
            .into_iter()
            .find(|a| element_text(*a) == name))
    }
}

/// Trimmed text content of an element and its descendants.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Value of attribute `name`, or `""` when absent.
pub fn element_attr<'a>(el: ElementRef<'a>, name: &str) -> &'a str {
    el.value().attr(name).unwrap_or_default()
}

fn accessible_name(el: ElementRef<'_>) -> String {
    let text = element_text(el);
    if text.is_empty() {
        element_attr(el, "alt").to_string()
    } else {
        text
    }
}

/// Non-empty values of `attribute` across `elements`.
pub fn attributes_from_elements<'a>(elements: &[ElementRef<'a>], attribute: &str) -> Vec<&'a str> {
    elements
        .iter()
        .map(|el| element_attr(*el, attribute))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Non-empty trimmed texts of `elements`.
pub fn text_from_elements(elements: &[ElementRef<'_>]) -> Vec<String> {
    elements
        .iter()
        .map(|el| element_text(*el))
        .filter(|t| !t.is_empty())
        .collect()
}
