//! Gallery site model shared by the checker, the link sweep and the scaffold.
//!
//! The site is a main page (`index.html`) and one detail page per
//! [`Category`] under `pages/`. Detail pages are chained in a fixed cycle:
//!
//! ```text
//! Space → Modern Design → Plants → Nature → Space
//! ```
//!
//! Each page's "Prev" and "Next" links follow that cycle. Changing the order
//! means rewriting the prev/next links on all four pages at once.

use serde::Serialize;
use std::fmt;

/// The main page, relative to the site root.
pub const MAIN_PAGE_URL: &str = "index.html";

/// Directory holding the detail pages, relative to the site root.
pub const PAGES_DIR: &str = "pages";

/// Default base for the "More <Category> Images" links.
pub const DEFAULT_EXTERNAL_BASE: &str = "https://unsplash.com/s/photos/";

/// One of the four gallery categories, each backed by a detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Nature,
    Space,
    Plants,
    ModernDesign,
}

impl Category {
    /// Every category, in the order detail pages are reported.
    pub const ALL: [Category; 4] = [
        Category::Nature,
        Category::Space,
        Category::Plants,
        Category::ModernDesign,
    ];

    /// The prev/next cycle, starting from Space.
    pub const CYCLE: [Category; 4] = [
        Category::Space,
        Category::ModernDesign,
        Category::Plants,
        Category::Nature,
    ];

    /// Order of the cards on the main page.
    pub const CARD_ORDER: [Category; 4] = [
        Category::Plants,
        Category::ModernDesign,
        Category::Space,
        Category::Nature,
    ];

    /// Display name, as used in headings and link text.
    pub fn name(self) -> &'static str {
        match self {
            Category::Nature => "Nature",
            Category::Space => "Space",
            Category::Plants => "Plants",
            Category::ModernDesign => "Modern Design",
        }
    }

    /// URL slug: the detail page file stem and the external search term.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Nature => "nature",
            Category::Space => "space",
            Category::Plants => "plants",
            Category::ModernDesign => "modern-design",
        }
    }

    /// File name of the category's primary image.
    pub fn image_file(self) -> &'static str {
        match self {
            Category::Nature => "nature-image.jpg",
            Category::Space => "space-image.jpg",
            Category::Plants => "plant-image.jpg",
            Category::ModernDesign => "design-image.jpg",
        }
    }

    /// Root-relative path of the detail page, e.g. `pages/plants.html`.
    pub fn page_url(self) -> String {
        format!("{}/{}", PAGES_DIR, self.page_url_pages_rel())
    }

    /// Path of the detail page as written from inside `pages/`, e.g. `plants.html`.
    pub fn page_url_pages_rel(self) -> String {
        format!("{}.html", self.slug())
    }

    /// Both accepted spellings of a link to this page.
    pub fn page_url_forms(self) -> [String; 2] {
        [self.page_url(), self.page_url_pages_rel()]
    }

    /// External "more images" URL under `base`.
    pub fn more_images_url(self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.slug())
    }

    /// Text of the "more images" link, e.g. `More Plants Images`.
    pub fn more_images_text(self) -> String {
        format!("More {} Images", self.name())
    }

    pub fn prev(self) -> Category {
        let i = self.cycle_position();
        Self::CYCLE[(i + Self::CYCLE.len() - 1) % Self::CYCLE.len()]
    }

    pub fn next(self) -> Category {
        let i = self.cycle_position();
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }

    fn cycle_position(self) -> usize {
        Self::CYCLE
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }

    /// Look up a category by display name.
    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which kind of page a report or check is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum PageKind {
    Main,
    Detail(Category),
}

impl PageKind {
    /// Every page of the site: main first, then detail pages along the cycle.
    pub fn all() -> Vec<PageKind> {
        std::iter::once(PageKind::Main)
            .chain(Category::CYCLE.into_iter().map(PageKind::Detail))
            .collect()
    }

    /// Root-relative path of the page's HTML file.
    pub fn path(self) -> String {
        match self {
            PageKind::Main => MAIN_PAGE_URL.to_string(),
            PageKind::Detail(category) => category.page_url(),
        }
    }
}
