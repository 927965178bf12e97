//! Shared test utilities for the gallery-check test suite.
//!
//! Provides an isolated copy of the fixture site, an in-place rewrite helper
//! for breaking one expectation at a time, and report lookups that panic with
//! the available names on a miss.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! rewrite_fixture(&tmp, "pages/nature.html", "Prev: Plants", "Prev: Space");
//! let report = check_detail_page(tmp.path(), Category::Nature, &CheckConfig::default());
//! assert!(!find_outcome(&report, "Prev: Plants link").passed());
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::check::{CheckOutcome, PageReport, SiteReport};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Replace `from` with `to` in a fixture file. Panics if `from` is absent,
/// so a stale snippet cannot silently turn a negative test into a no-op.
pub fn rewrite_fixture(tmp: &TempDir, file: &str, from: &str, to: &str) {
    let path = tmp.path().join(file);
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(
        content.contains(from),
        "snippet not found in {file}: {from:?}"
    );
    std::fs::write(&path, content.replace(from, to)).unwrap();
}

// =========================================================================
// Report lookups
// =========================================================================

/// Find a check outcome by name. Panics if not found.
pub fn find_outcome<'a>(report: &'a PageReport, name: &str) -> &'a CheckOutcome {
    report.outcome(name).unwrap_or_else(|| {
        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
        panic!("check '{name}' not found on {}. Available: {names:?}", report.path)
    })
}

/// Assert every page loaded and every check passed, listing failures otherwise.
pub fn assert_site_ok(report: &SiteReport) {
    let problems: Vec<String> = report
        .pages
        .iter()
        .flat_map(|page| {
            let load = page
                .load_error
                .iter()
                .map(move |e| format!("{}: {e}", page.path));
            let checks = page.checks.iter().filter_map(move |c| {
                c.failure
                    .as_ref()
                    .map(|f| format!("{}: {}: {f}", page.path, c.name))
            });
            load.chain(checks)
        })
        .collect();
    assert!(problems.is_empty(), "site check failed:\n{}", problems.join("\n"));
}
