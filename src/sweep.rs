//! Site-wide broken link sweep.
//!
//! The contract checks only look at the five known pages and the first
//! stylesheet/script on each. The sweep walks every `*.html` file under the
//! site root and verifies every local stylesheet, script and anchor target
//! resolves to an existing file.
//!
//! Links are classified the same way for every page:
//!
//! | href | kind |
//! |------|------|
//! | any `scheme://host…` (`https:`, `HTTP:`, `ftp:`), `//…` | external, not fetched |
//! | other `scheme:` (`mailto:`, `tel:`, `sms:`, `data:`), `#…` | special, skipped |
//! | anything else | local, resolved and checked on disk |
//!
//! Schemes are matched case-insensitively. Local targets are percent-decoded,
//! then resolved against the linking page's directory, or against the site
//! root when they start with `/`. A target that climbs above the root is
//! broken even if a file exists there.
//!
//! A page that cannot be read as UTF-8 is recorded as unreadable and the
//! sweep moves on. Images are not swept.

use crate::page::{LoadedPage, element_attr, parse_selector};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Page(#[from] crate::page::PageError),
}

/// Elements whose targets are swept, with the attribute holding the target.
const SWEPT: [(&str, &str); 3] = [
    (r#"link[rel="stylesheet"][href]"#, "href"),
    ("script[src]", "src"),
    ("a[href]", "href"),
];

/// How a link target is treated by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    External,
    Special,
    Local,
}

/// Classify an href or src value.
///
/// Anything that parses as an absolute URL is non-local: with a host it is
/// external, without one (`mailto:`, `data:`) it is special.
pub fn classify(href: &str) -> LinkKind {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return LinkKind::Special;
    }
    if href.starts_with("//") {
        return LinkKind::External;
    }
    match Url::parse(href) {
        Ok(url) if url.has_host() => LinkKind::External,
        Ok(_) => LinkKind::Special,
        Err(_) => LinkKind::Local,
    }
}

/// A local link whose target is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    /// Page containing the link, relative to the site root.
    pub page: String,
    /// Tag name of the linking element (`a`, `link`, `script`).
    pub element: String,
    /// The href/src as written.
    pub href: String,
    /// Why it's broken.
    pub reason: String,
}

/// An HTML file the sweep could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadablePage {
    /// Page path, relative to the site root.
    pub page: String,
    pub reason: String,
}

/// Results of sweeping a site.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SweepReport {
    /// Pages read and swept; unreadable pages are not counted.
    pub pages: usize,
    pub total_links: usize,
    pub local_links: usize,
    pub external_links: usize,
    pub broken: Vec<BrokenLink>,
    pub unreadable: Vec<UnreadablePage>,
}

impl SweepReport {
    pub fn is_ok(&self) -> bool {
        self.broken.is_empty() && self.unreadable.is_empty()
    }
}

/// Sweep every HTML page under `root`. Pages are visited in path order.
pub fn sweep(root: &Path) -> Result<SweepReport, SweepError> {
    let mut report = SweepReport::default();
    for page_path in html_files(root)? {
        let relative = page_path
            .strip_prefix(root)
            .unwrap_or(&page_path)
            .to_string_lossy()
            .replace('\\', "/");
        let html = match fs::read_to_string(&page_path) {
            Ok(html) => html,
            Err(err) => {
                warn!(page = %relative, error = %err, "page could not be read");
                report.unreadable.push(UnreadablePage {
                    page: relative,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        let page = LoadedPage::from_html(&relative, &html);
        sweep_page(root, &page, &mut report)?;
        report.pages += 1;
    }
    debug!(
        pages = report.pages,
        links = report.total_links,
        broken = report.broken.len(),
        "sweep finished"
    );
    Ok(report)
}

fn html_files(root: &Path) -> Result<Vec<PathBuf>, SweepError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry?;
        let is_html = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
        if entry.file_type().is_file() && is_html {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn sweep_page(root: &Path, page: &LoadedPage, report: &mut SweepReport) -> Result<(), SweepError> {
    let page_dir = Path::new(&page.url).parent().unwrap_or(Path::new(""));
    for (selector, attribute) in SWEPT {
        let parsed = parse_selector(selector)?;
        for el in page.document.select(&parsed) {
            let href = element_attr(el, attribute);
            report.total_links += 1;
            match classify(href) {
                LinkKind::External => report.external_links += 1,
                LinkKind::Special => {}
                LinkKind::Local => {
                    report.local_links += 1;
                    if let Err(reason) = resolve_local(root, page_dir, href) {
                        report.broken.push(BrokenLink {
                            page: page.url.clone(),
                            element: el.value().name().to_string(),
                            href: href.to_string(),
                            reason,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Resolve a local target to an existing file under `root`.
///
/// Directory targets resolve to their `index.html`.
fn resolve_local(root: &Path, page_dir: &Path, href: &str) -> Result<PathBuf, String> {
    let decoded = percent_decode_str(strip_query_and_fragment(href.trim()))
        .decode_utf8()
        .map_err(|_| "not valid UTF-8 after percent-decoding".to_string())?;
    let target: &str = &decoded;
    let joined = match target.strip_prefix('/') {
        Some(absolute) => PathBuf::from(absolute),
        None => page_dir.join(target),
    };
    let relative = normalize_lexically(&joined).ok_or_else(|| "escapes the site root".to_string())?;
    let full = root.join(&relative);
    if full.is_file() {
        return Ok(relative);
    }
    if full.is_dir() && full.join("index.html").is_file() {
        return Ok(relative.join("index.html"));
    }
    Err("target does not exist".to_string())
}

fn strip_query_and_fragment(href: &str) -> &str {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    &href[..end]
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// Returns `None` when the path climbs above its starting point.
fn normalize_lexically(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(out)
}
