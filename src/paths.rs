//! Href normalization and asset existence checks.
//!
//! Pages link to each other from two directory depths: the main page writes
//! `pages/plants.html`, a detail page writes `plants.html` or
//! `../pages/plants.html`. Links are compared after stripping every leading
//! `../`, `./`, `.` and `/`, so both spellings land on a canonical form.
//!
//! The bare `.` rule strips one character, so `..hidden.html` becomes
//! `hidden.html`. Expectations elsewhere rely on this exact behavior.

use std::path::Path;

/// Strip leading `../`, `./`, `.` and `/` segments until none remain.
///
/// - `"../index.html"` → `"index.html"`
/// - `"./plants.html"` → `"plants.html"`
/// - `"/pages/space.html"` → `"pages/space.html"`
/// - `"https://unsplash.com/s/photos/space"` → unchanged
pub fn prepare_path(path: &str) -> &str {
    let mut rest = path;
    loop {
        if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix(['.', '/']) {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// Whether `href` normalizes to one of the `expected` canonical forms.
pub fn matches_any<S: AsRef<str>>(href: &str, expected: &[S]) -> bool {
    let prepared = prepare_path(href);
    expected.iter().any(|e| e.as_ref() == prepared)
}

/// Whether the normalized `path` names an existing file under `root`.
pub fn check_file_exists(root: &Path, path: &str) -> bool {
    let prepared = prepare_path(path);
    if prepared.is_empty() {
        return false;
    }
    root.join(prepared).is_file()
}
