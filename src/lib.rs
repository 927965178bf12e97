//! # Gallery Check
//!
//! Structure and link checker for a static multi-page HTML image gallery: a
//! main page (`index.html`) and four detail pages under `pages/` (Nature,
//! Space, Plants, Modern Design).
//!
//! # What Gets Checked
//!
//! ```text
//! index.html              h1, stylesheets, deferred script, cards, nav, Details links
//! pages/<slug>.html       h1, stylesheets, deferred script, image, nav,
//!                         Prev/Next along the cycle, Back to Home, More Images
//! every *.html            local stylesheet/script/anchor targets exist (sweep)
//! ```
//!
//! Pages are read from disk and parsed with `scraper`; nothing is rendered or
//! fetched. External links are compared as strings, never requested.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Categories, the Prev/Next cycle, canonical page URLs |
//! | [`paths`] | Href normalization and asset existence checks |
//! | [`page`] | Page loading and selector / role queries |
//! | [`check`] | The site contract as named checks, producing reports |
//! | [`sweep`] | Site-wide broken link detection |
//! | [`scaffold`] | Renders a skeleton site that passes every check |
//! | [`config`] | Optional `gallery-check.toml` loading and validation |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Two Spellings, One Target
//!
//! The main page links `pages/plants.html`, a detail page links
//! `plants.html` or `../pages/plants.html`. Rather than resolving every href
//! against its page, [`paths::prepare_path`] strips leading `../`, `./`, `.`
//! and `/` and the checks accept both the root-relative and the page-relative
//! form. The sweep, which must catch links that merely look right, resolves
//! properly against the page's directory.
//!
//! ## Checks Are Values
//!
//! A failed expectation is a [`check::Failure`] stored in the report, not a
//! panic or an early return. One bad link never hides the next, a missing page
//! only skips its own checks, and the same contract serves the CLI and the
//! test suite.
//!
//! ## Fixed Cycle
//!
//! Detail pages are chained Space → Modern Design → Plants → Nature → Space.
//! The cycle lives in [`types::Category::CYCLE`]; reordering it changes the
//! expected Prev/Next links of all four pages together.

pub mod check;
pub mod config;
pub mod output;
pub mod page;
pub mod paths;
pub mod scaffold;
pub mod sweep;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
