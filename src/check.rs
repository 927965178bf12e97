//! Site contract checks.
//!
//! Each expectation about the gallery's markup is a named check evaluated
//! against a [`LoadedPage`]. Checks never abort each other: a failing check
//! records a [`Failure`] naming the selector and the offending value, and the
//! next check runs. Only a page that cannot be loaded skips its checks, and
//! that affects no other page.
//!
//! ## Main page (`index.html`)
//!
//! - `h1` reads the configured title
//! - first stylesheet is `layout.css`, second is `image-lists.css`, both on disk
//! - first `script[defer]` is `scripts.js`, on disk
//! - at least four `img` cards with a `src`
//! - `nav a` lists exactly the four categories, each linking `pages/<slug>.html`
//! - a "<Category> Details" link per card
//! - a `.gallery-items` container and a `header`
//!
//! ## Detail pages (`pages/<slug>.html`)
//!
//! - `h1` reads the category name
//! - stylesheets `layout.css` then `/secondary/image-details.css`, both on disk
//! - `scripts.js` deferred, on disk
//! - first `img` shows the category image
//! - an `.image-details` region
//! - "Back to Home Page" links `index.html`
//! - navigation as on the main page, either path spelling accepted
//! - "Prev:" / "Next:" links follow the category cycle
//! - "More <Category> Images" links the external photo search

use crate::config::CheckConfig;
use crate::page::{self, LoadedPage, PageError, element_attr, element_text};
use crate::paths::{check_file_exists, matches_any, prepare_path};
use crate::types::{Category, MAIN_PAGE_URL, PageKind};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const STYLESHEETS: &str = r#"link[rel="stylesheet"]"#;
const DEFERRED_SCRIPTS: &str = "script[defer]";
const NAV_LINKS: &str = "nav a";

/// Why a single check did not pass.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    #[error("page is empty")]
    EmptyPage,
    #[error("no element matches `{selector}`")]
    Missing { selector: String },
    #[error("`{selector}` matched {found} element(s), expected at least {min}")]
    TooFew {
        selector: String,
        found: usize,
        min: usize,
    },
    #[error("`{selector}` texts {found:?} do not include \"{expected}\"")]
    TextMissing {
        selector: String,
        expected: String,
        found: Vec<String>,
    },
    #[error("`{selector}` {attribute}=\"{actual}\" does not contain \"{expected}\"")]
    NotContaining {
        selector: String,
        attribute: String,
        expected: String,
        actual: String,
    },
    #[error("`{selector}` {attribute} is empty")]
    EmptyAttribute { selector: String, attribute: String },
    #[error("`{selector}` references \"{path}\", which does not exist")]
    MissingAsset { selector: String, path: String },
    #[error("`{selector}` links \"{actual}\", expected one of {expected:?}")]
    WrongTarget {
        selector: String,
        actual: String,
        expected: Vec<String>,
    },
    #[error("`{selector}` lists {found:?}, expected exactly {expected:?}")]
    WrongSet {
        selector: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("{message}")]
    Query { message: String },
}

impl From<PageError> for Failure {
    fn from(err: PageError) -> Self {
        Failure::Query {
            message: err.to_string(),
        }
    }
}

/// Result of one named check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// All check outcomes for one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub page: PageKind,
    /// Path of the HTML file, relative to the site root.
    pub path: String,
    /// Heading the page is expected to carry.
    pub title: String,
    /// Set when the page could not be loaded; `checks` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub checks: Vec<CheckOutcome>,
}

impl PageReport {
    fn new(page: PageKind, title: &str) -> Self {
        PageReport {
            page,
            path: page.path(),
            title: title.to_string(),
            load_error: None,
            checks: Vec::new(),
        }
    }

    fn record(&mut self, name: impl Into<String>, result: Result<(), Failure>) {
        let name = name.into();
        let failure = result.err();
        match &failure {
            Some(f) => debug!(page = %self.path, check = %name, failure = %f, "check failed"),
            None => debug!(page = %self.path, check = %name, "check passed"),
        }
        self.checks.push(CheckOutcome { name, failure });
    }

    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.checks.len() - self.passed()
    }

    /// True when the page loaded and every check passed.
    pub fn is_ok(&self) -> bool {
        self.load_error.is_none() && self.failed() == 0
    }

    /// Look up an outcome by check name.
    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Reports for every page of the site.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub pages: Vec<PageReport>,
}

impl SiteReport {
    pub fn passed(&self) -> usize {
        self.pages.iter().map(PageReport::passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.pages.iter().map(PageReport::failed).sum()
    }

    pub fn unloaded(&self) -> usize {
        self.pages.iter().filter(|p| p.load_error.is_some()).count()
    }

    pub fn is_ok(&self) -> bool {
        self.pages.iter().all(PageReport::is_ok)
    }

    pub fn page(&self, page: PageKind) -> Option<&PageReport> {
        self.pages.iter().find(|p| p.page == page)
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Check every page: the main page, then detail pages along the cycle.
pub fn check_site(root: &Path, config: &CheckConfig) -> SiteReport {
    let pages = PageKind::all()
        .into_iter()
        .map(|kind| match kind {
            PageKind::Main => check_main_page(root, config),
            PageKind::Detail(category) => check_detail_page(root, category, config),
        })
        .collect();
    SiteReport { pages }
}

/// Check `index.html` against the main page contract.
pub fn check_main_page(root: &Path, config: &CheckConfig) -> PageReport {
    let mut report = PageReport::new(PageKind::Main, &config.main_title);
    let Some(page) = load_for_report(root, &mut report) else {
        return report;
    };

    report.record("page loads", page_not_empty(&page));
    report.record("page heading", heading_is(&page, &config.main_title));
    report.record("at least 2 stylesheets", at_least(&page, STYLESHEETS, 2));
    report.record(
        format!("{} is the first stylesheet", config.stylesheets.layout),
        linked_asset(root, &page, STYLESHEETS, 0, "href", &config.stylesheets.layout),
    );
    report.record(
        format!("{} is connected", config.stylesheets.main),
        linked_asset(root, &page, STYLESHEETS, 1, "href", &config.stylesheets.main),
    );
    report.record("deferred script exists", at_least(&page, DEFERRED_SCRIPTS, 1));
    report.record(
        format!("script points to {}", config.scripts.entry),
        linked_asset(root, &page, DEFERRED_SCRIPTS, 0, "src", &config.scripts.entry),
    );
    for i in 0..config.main_page.min_images {
        let label = match Category::CARD_ORDER.get(i) {
            Some(category) => format!("{category} card image"),
            None => format!("card image {}", i + 1),
        };
        report.record(label, image_has_src(&page, i));
    }
    report.record("navigation lists every category", nav_lists_categories(&page));
    for category in Category::ALL {
        report.record(
            format!("{category} navigation link"),
            nav_link_targets(&page, category, &[category.page_url()]),
        );
    }
    for category in Category::ALL {
        report.record(
            format!("{category} Details link"),
            details_link_targets(&page, category),
        );
    }
    report.record("gallery-items container", at_least(&page, ".gallery-items", 1));
    report.record("header element", at_least(&page, "header", 1));
    report
}

/// Check `pages/<slug>.html` against the detail page contract.
pub fn check_detail_page(root: &Path, category: Category, config: &CheckConfig) -> PageReport {
    let mut report = PageReport::new(PageKind::Detail(category), category.name());
    let Some(page) = load_for_report(root, &mut report) else {
        return report;
    };

    report.record("page loads", page_not_empty(&page));
    report.record("page heading", heading_is(&page, category.name()));
    report.record("at least 2 stylesheets", at_least(&page, STYLESHEETS, 2));
    report.record(
        format!("{} is the first stylesheet", config.stylesheets.layout),
        linked_asset(root, &page, STYLESHEETS, 0, "href", &config.stylesheets.layout),
    );
    report.record(
        format!("{} is connected", config.stylesheets.detail),
        linked_asset(root, &page, STYLESHEETS, 1, "href", &config.stylesheets.detail),
    );
    report.record("deferred script exists", at_least(&page, DEFERRED_SCRIPTS, 1));
    report.record(
        format!("script points to {}", config.scripts.entry),
        linked_asset(root, &page, DEFERRED_SCRIPTS, 0, "src", &config.scripts.entry),
    );
    report.record("main image", main_image_is(&page, category.image_file()));
    report.record("image-details container", at_least(&page, ".image-details", 1));
    report.record("Back to Home Page link", back_home_link(&page));
    report.record("navigation lists every category", nav_lists_categories(&page));
    for linked in Category::ALL {
        report.record(
            format!("{linked} navigation link"),
            nav_link_targets(&page, linked, &linked.page_url_forms()),
        );
    }
    let prev = category.prev();
    report.record(
        format!("Prev: {prev} link"),
        text_link_targets(&page, &format!("Prev: {prev}"), &prev.page_url_forms()),
    );
    let next = category.next();
    report.record(
        format!("Next: {next} link"),
        text_link_targets(&page, &format!("Next: {next}"), &next.page_url_forms()),
    );
    report.record(
        format!("{} link", category.more_images_text()),
        text_link_targets(
            &page,
            &category.more_images_text(),
            &[category.more_images_url(&config.external_base)],
        ),
    );
    report
}

fn load_for_report(root: &Path, report: &mut PageReport) -> Option<LoadedPage> {
    match page::load_page(root, &report.path) {
        Ok(page) => Some(page),
        Err(err) => {
            warn!(page = %report.path, error = %err, "page could not be loaded");
            report.load_error = Some(err.to_string());
            None
        }
    }
}

// ============================================================================
// Individual checks
// ============================================================================

fn page_not_empty(page: &LoadedPage) -> Result<(), Failure> {
    if page.html.is_empty() {
        return Err(Failure::EmptyPage);
    }
    Ok(())
}

fn at_least(page: &LoadedPage, selector: &str, min: usize) -> Result<(), Failure> {
    let found = page.locator(selector)?.len();
    if found == 0 && min == 1 {
        return Err(Failure::Missing {
            selector: selector.to_string(),
        });
    }
    if found < min {
        return Err(Failure::TooFew {
            selector: selector.to_string(),
            found,
            min,
        });
    }
    Ok(())
}

fn heading_is(page: &LoadedPage, expected: &str) -> Result<(), Failure> {
    let headings = page.locator("h1")?;
    let texts: Vec<String> = headings.iter().map(|h| element_text(*h)).collect();
    if texts.iter().any(|t| t == expected) {
        return Ok(());
    }
    Err(Failure::TextMissing {
        selector: "h1".to_string(),
        expected: expected.to_string(),
        found: texts,
    })
}

/// The `index`-th match of `selector` has `attribute` containing `pattern`,
/// and the referenced file exists.
fn linked_asset(
    root: &Path,
    page: &LoadedPage,
    selector: &str,
    index: usize,
    attribute: &str,
    pattern: &str,
) -> Result<(), Failure> {
    let elements = page.locator(selector)?;
    let actual = elements
        .get(index)
        .map(|el| element_attr(*el, attribute))
        .unwrap_or_default();
    if !actual.contains(pattern) {
        return Err(Failure::NotContaining {
            selector: nth(selector, index),
            attribute: attribute.to_string(),
            expected: pattern.to_string(),
            actual: actual.to_string(),
        });
    }
    if !check_file_exists(root, actual) {
        return Err(Failure::MissingAsset {
            selector: nth(selector, index),
            path: prepare_path(actual).to_string(),
        });
    }
    Ok(())
}

fn image_has_src(page: &LoadedPage, index: usize) -> Result<(), Failure> {
    let images = page.locator("img")?;
    let Some(img) = images.get(index) else {
        return Err(Failure::TooFew {
            selector: "img".to_string(),
            found: images.len(),
            min: index + 1,
        });
    };
    if element_attr(*img, "src").is_empty() {
        return Err(Failure::EmptyAttribute {
            selector: nth("img", index),
            attribute: "src".to_string(),
        });
    }
    Ok(())
}

fn main_image_is(page: &LoadedPage, file: &str) -> Result<(), Failure> {
    let images = page.locator("img")?;
    let Some(img) = images.first() else {
        return Err(Failure::Missing {
            selector: "img".to_string(),
        });
    };
    let src = element_attr(*img, "src");
    if !src.contains(file) {
        return Err(Failure::NotContaining {
            selector: nth("img", 0),
            attribute: "src".to_string(),
            expected: file.to_string(),
            actual: src.to_string(),
        });
    }
    Ok(())
}

/// `nav a` holds one link per category and nothing else.
///
/// Every anchor counts, including repeats and ones without text.
fn nav_lists_categories(page: &LoadedPage) -> Result<(), Failure> {
    let links = page.locator(NAV_LINKS)?;
    let mut found: Vec<String> = links.iter().map(|a| element_text(*a)).collect();
    found.sort();
    let mut expected: Vec<String> = Category::ALL.iter().map(|c| c.name().to_string()).collect();
    expected.sort();
    if found == expected {
        return Ok(());
    }
    Err(Failure::WrongSet {
        selector: NAV_LINKS.to_string(),
        expected,
        found,
    })
}

fn nav_link_targets<S: AsRef<str>>(
    page: &LoadedPage,
    category: Category,
    expected: &[S],
) -> Result<(), Failure> {
    let link = page.find_nav_link(category.name())?;
    let selector = format!("{NAV_LINKS}:text(\"{}\")", category.name());
    match link {
        Some(a) => link_points_to(&selector, element_attr(a, "href"), expected),
        None => Err(Failure::Missing { selector }),
    }
}

/// The main page card link for `category`: text contains "<Category> Details",
/// or "Details" with an href mentioning the slug.
fn details_link_targets(page: &LoadedPage, category: Category) -> Result<(), Failure> {
    let wanted = format!("{category} Details");
    let link = page.locator("a")?.into_iter().find(|a| {
        let text = element_text(*a);
        text.contains(&wanted)
            || (text.contains("Details") && element_attr(*a, "href").contains(category.slug()))
    });
    let selector = format!("a:text(\"{wanted}\")");
    match link {
        Some(a) => link_points_to(&selector, element_attr(a, "href"), &[category.page_url()]),
        None => Err(Failure::Missing { selector }),
    }
}

fn back_home_link(page: &LoadedPage) -> Result<(), Failure> {
    text_link_targets(page, "Back to Home Page", &[MAIN_PAGE_URL])
}

/// The first `a` whose text contains `needle` links one of `expected`.
fn text_link_targets<S: AsRef<str>>(
    page: &LoadedPage,
    needle: &str,
    expected: &[S],
) -> Result<(), Failure> {
    let selector = format!("a:text(\"{needle}\")");
    match page.find_link_by_text(needle)? {
        Some(a) => link_points_to(&selector, element_attr(a, "href"), expected),
        None => Err(Failure::Missing { selector }),
    }
}

fn link_points_to<S: AsRef<str>>(selector: &str, href: &str, expected: &[S]) -> Result<(), Failure> {
    if matches_any(href, expected) {
        return Ok(());
    }
    Err(Failure::WrongTarget {
        selector: selector.to_string(),
        actual: href.to_string(),
        expected: expected.iter().map(|e| e.as_ref().to_string()).collect(),
    })
}

fn nth(selector: &str, index: usize) -> String {
    format!("{selector}[{index}]")
}
