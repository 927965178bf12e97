//! Skeleton gallery generation.
//!
//! Writes a minimal site that satisfies every contract check and has no
//! broken links, as a starting point for a new gallery or a known-good
//! reference when a check fails.
//!
//! ## Output Structure
//!
//! With the stock configuration:
//!
//! ```text
//! site/
//! ├── gallery-check.toml            # The config the site was scaffolded for
//! ├── index.html                    # Main page: header, nav, four cards
//! ├── pages/
//! │   ├── nature.html               # Detail pages, chained Prev/Next
//! │   ├── space.html
//! │   ├── plants.html
//! │   └── modern-design.html
//! ├── css/
//! │   ├── layout.css
//! │   ├── image-lists.css
//! │   └── secondary/
//! │       └── image-details.css
//! └── js/
//!     └── scripts.js
//! ```
//!
//! Stylesheets land at `css/<pattern>` and the script at `js/<pattern>`,
//! where each pattern is the configured substring the checks look for, so a
//! custom `stylesheets.main = "cards.css"` produces `css/cards.css`.
//!
//! Image files are referenced (`images/<category>-image.jpg`) but not written.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Main-page links are root-relative (`pages/space.html`); detail pages link
//! page-relative (`space.html`, `../index.html`).

use crate::config::{CONFIG_FILE, CheckConfig};
use crate::types::{Category, MAIN_PAGE_URL};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("{key} = \"{value}\" cannot be used as an asset path")]
    AssetName { key: &'static str, value: String },
}

const LAYOUT_CSS: &str = include_str!("../static/layout.css");
const IMAGE_LISTS_CSS: &str = include_str!("../static/image-lists.css");
const IMAGE_DETAILS_CSS: &str = include_str!("../static/image-details.css");
const SCRIPTS_JS: &str = include_str!("../static/scripts.js");

/// Asset locations relative to the output root, derived from the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub layout_css: String,
    pub main_css: String,
    pub detail_css: String,
    pub script: String,
}

impl AssetPaths {
    /// Place each configured pattern under `css/` or `js/`.
    ///
    /// Fails when a pattern can't be a plain relative file path: empty
    /// segments, `.`/`..`, backslashes, `?`, `#`, `%`, or surrounding
    /// whitespace.
    pub fn from_config(config: &CheckConfig) -> Result<Self, ScaffoldError> {
        Ok(Self {
            layout_css: asset_path("css", "stylesheets.layout", &config.stylesheets.layout)?,
            main_css: asset_path("css", "stylesheets.main", &config.stylesheets.main)?,
            detail_css: asset_path("css", "stylesheets.detail", &config.stylesheets.detail)?,
            script: asset_path("js", "scripts.entry", &config.scripts.entry)?,
        })
    }

    /// Files written verbatim, in write order.
    fn files(&self) -> [(&str, &'static str); 4] {
        [
            (self.layout_css.as_str(), LAYOUT_CSS),
            (self.main_css.as_str(), IMAGE_LISTS_CSS),
            (self.detail_css.as_str(), IMAGE_DETAILS_CSS),
            (self.script.as_str(), SCRIPTS_JS),
        ]
    }
}

fn asset_path(dir: &str, key: &'static str, pattern: &str) -> Result<String, ScaffoldError> {
    let trimmed = pattern.trim_start_matches('/');
    let usable = pattern.trim() == pattern
        && !trimmed.is_empty()
        && !trimmed.contains(['\\', '?', '#', '%'])
        && trimmed
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if !usable {
        return Err(ScaffoldError::AssetName {
            key,
            value: pattern.to_string(),
        });
    }
    Ok(format!("{dir}/{trimmed}"))
}

/// Files written by [`scaffold`], relative to the output root, in write order.
#[derive(Debug, Default)]
pub struct ScaffoldSummary {
    pub files: Vec<PathBuf>,
}

/// Write the skeleton site into `output`, creating directories as needed.
///
/// The config is written alongside as `gallery-check.toml`, so checking the
/// output directory applies the same expectations. Existing files with the
/// same names are overwritten.
pub fn scaffold(output: &Path, config: &CheckConfig) -> Result<ScaffoldSummary, ScaffoldError> {
    let assets = AssetPaths::from_config(config)?;
    let config_toml = format!(
        "# Written by gallery-check scaffold\n{}",
        toml::to_string(config)?
    );

    let mut summary = ScaffoldSummary::default();
    let mut write = |relative: &str, content: &str| -> Result<(), ScaffoldError> {
        let path = output.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        summary.files.push(PathBuf::from(relative));
        Ok(())
    };

    write(MAIN_PAGE_URL, &render_main_page(config, &assets).into_string())?;
    for category in Category::ALL {
        write(
            &category.page_url(),
            &render_detail_page(category, config, &assets).into_string(),
        )?;
    }
    for (relative, content) in assets.files() {
        write(relative, content)?;
    }
    write(CONFIG_FILE, &config_toml)?;

    info!(output = %output.display(), files = summary.files.len(), "scaffold written");
    Ok(summary)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the document shell shared by every page.
///
/// `prefix` is the path from the page back to the site root (`""` or `"../"`).
fn base_document(
    title: &str,
    prefix: &str,
    assets: &AssetPaths,
    page_css: &str,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href={ (prefix) (assets.layout_css) };
                link rel="stylesheet" href={ (prefix) (page_css) };
                script src={ (prefix) (assets.script) } defer {}
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the header with the category navigation.
///
/// `link` maps a category to the href used from the current page.
fn site_header(home: &str, link: impl Fn(Category) -> String) -> Markup {
    html! {
        header {
            a.brand href=(home) { "DAG" }
            nav {
                ul {
                    @for category in Category::ALL {
                        li { a href=(link(category)) { (category.name()) } }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders `index.html`: header, title and one card per category.
pub fn render_main_page(config: &CheckConfig, assets: &AssetPaths) -> Markup {
    let content = html! {
        (site_header(MAIN_PAGE_URL, |c| c.page_url()))
        main {
            h1 { (config.main_title) }
            section.gallery-items {
                @for category in Category::CARD_ORDER {
                    article.gallery-item {
                        img src={ "images/" (category.image_file()) } alt={ (category.name()) " artwork" };
                        h2 { (category.name()) }
                        a.details-link href=(category.page_url()) { (category.name()) " Details" }
                    }
                }
            }
        }
    };
    base_document(&config.main_title, "", assets, &assets.main_css, content)
}

/// Renders `pages/<slug>.html` with its image, details and cycle links.
pub fn render_detail_page(category: Category, config: &CheckConfig, assets: &AssetPaths) -> Markup {
    let home = format!("../{MAIN_PAGE_URL}");
    let prev = category.prev();
    let next = category.next();
    let content = html! {
        (site_header(&home, |c| c.page_url_pages_rel()))
        main {
            h1 { (category.name()) }
            img src={ "../images/" (category.image_file()) } alt={ (category.name()) " artwork" };
            div.image-details {
                a href=(category.more_images_url(&config.external_base)) target="_blank" rel="noopener" {
                    (category.more_images_text())
                }
            }
            div.page-links {
                a href=(prev.page_url_pages_rel()) { "Prev: " (prev.name()) }
                a href=(home) { "Back to Home Page" }
                a href=(next.page_url_pages_rel()) { "Next: " (next.name()) }
            }
        }
    };
    let title = format!("{} | {}", category.name(), config.main_title);
    base_document(&title, "../", assets, &assets.detail_css, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::check_site;
    use crate::config::load_config;
    use crate::sweep::sweep;
    use crate::test_helpers::assert_site_ok;
    use tempfile::TempDir;

    fn stock_assets() -> AssetPaths {
        AssetPaths::from_config(&CheckConfig::default()).unwrap()
    }

    #[test]
    fn scaffold_writes_every_file() {
        let tmp = TempDir::new().unwrap();
        let summary = scaffold(tmp.path(), &CheckConfig::default()).unwrap();
        assert_eq!(summary.files.len(), 10);
        assert_eq!(summary.files[0], PathBuf::from("index.html"));
        assert_eq!(summary.files[9], PathBuf::from("gallery-check.toml"));
        for file in &summary.files {
            assert!(tmp.path().join(file).is_file(), "missing {}", file.display());
        }
        assert!(tmp.path().join("pages/modern-design.html").is_file());
        assert!(tmp.path().join("css/secondary/image-details.css").is_file());
    }

    #[test]
    fn stock_asset_paths() {
        assert_eq!(
            stock_assets(),
            AssetPaths {
                layout_css: "css/layout.css".to_string(),
                main_css: "css/image-lists.css".to_string(),
                detail_css: "css/secondary/image-details.css".to_string(),
                script: "js/scripts.js".to_string(),
            }
        );
    }

    #[test]
    fn scaffolded_site_passes_checks_and_sweep() {
        let tmp = TempDir::new().unwrap();
        let config = CheckConfig::default();
        scaffold(tmp.path(), &config).unwrap();

        assert_site_ok(&check_site(tmp.path(), &config));
        let swept = sweep(tmp.path()).unwrap();
        assert!(swept.is_ok(), "broken: {:?}", swept.broken);
    }

    #[test]
    fn scaffold_uses_configured_names() {
        let tmp = TempDir::new().unwrap();
        let mut config = CheckConfig {
            main_title: "Photo Wall".to_string(),
            external_base: "https://example.com/search".to_string(),
            ..CheckConfig::default()
        };
        config.stylesheets.layout = "base.css".to_string();
        config.stylesheets.main = "cards.css".to_string();
        config.stylesheets.detail = "/detail/photo.css".to_string();
        config.scripts.entry = "app.js".to_string();
        scaffold(tmp.path(), &config).unwrap();

        assert_site_ok(&check_site(tmp.path(), &config));
        assert!(sweep(tmp.path()).unwrap().is_ok());
        assert!(tmp.path().join("css/cards.css").is_file());
        assert!(tmp.path().join("css/detail/photo.css").is_file());
        assert!(tmp.path().join("js/app.js").is_file());
        let space = fs::read_to_string(tmp.path().join("pages/space.html")).unwrap();
        assert!(space.contains("https://example.com/search/space"));
        assert!(space.contains(r#"href="../css/detail/photo.css""#));
    }

    #[test]
    fn scaffold_writes_config_that_checks_the_output() {
        let tmp = TempDir::new().unwrap();
        let mut config = CheckConfig {
            main_title: "Photo Wall".to_string(),
            ..CheckConfig::default()
        };
        config.scripts.entry = "app.js".to_string();
        scaffold(tmp.path(), &config).unwrap();

        let reloaded = load_config(tmp.path()).unwrap();
        assert_eq!(reloaded.main_title, "Photo Wall");
        assert_eq!(reloaded.scripts.entry, "app.js");
        assert_site_ok(&check_site(tmp.path(), &reloaded));
    }

    #[test]
    fn unusable_patterns_are_rejected() {
        for (pattern, ok) in [
            ("cards.css", true),
            ("/secondary/cards.css", true),
            ("../cards.css", false),
            ("a//b.css", false),
            ("cards.css?v=2", false),
            ("my%20cards.css", false),
            (" cards.css", false),
            ("/", false),
        ] {
            let mut config = CheckConfig::default();
            config.stylesheets.main = pattern.to_string();
            assert_eq!(AssetPaths::from_config(&config).is_ok(), ok, "{pattern:?}");
        }

        let tmp = TempDir::new().unwrap();
        let mut config = CheckConfig::default();
        config.scripts.entry = "../app.js".to_string();
        let err = scaffold(tmp.path(), &config).unwrap_err();
        assert!(matches!(err, ScaffoldError::AssetName { key: "scripts.entry", .. }));
        assert!(!tmp.path().join("index.html").exists());
    }

    #[test]
    fn main_page_cards_follow_card_order() {
        let html = render_main_page(&CheckConfig::default(), &stock_assets()).into_string();
        let positions: Vec<usize> = Category::CARD_ORDER
            .iter()
            .map(|c| html.find(c.image_file()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn detail_page_script_is_deferred() {
        let html = render_detail_page(Category::Nature, &CheckConfig::default(), &stock_assets())
            .into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<script src="../js/scripts.js" defer>"#));
        assert!(html.contains(r#"href="plants.html">Prev: Plants"#));
        assert!(html.contains(r#"href="space.html">Next: Space"#));
    }

    #[test]
    fn titles_are_escaped() {
        let config = CheckConfig {
            main_title: "Art & <Code>".to_string(),
            ..CheckConfig::default()
        };
        let html = render_main_page(&config, &stock_assets()).into_string();
        assert!(html.contains("Art &amp; &lt;Code&gt;"));
    }
}
