//! Detail page contract for all four categories, against `fixtures/site/`.
//!
//! Each page is checked both through the raw query API and through
//! `check_detail_page`, so the two can't drift apart.

use gallery_check::check::check_detail_page;
use gallery_check::config::CheckConfig;
use gallery_check::page::{LoadedPage, element_attr, load_page, text_from_elements};
use gallery_check::paths::{check_file_exists, matches_any, prepare_path};
use gallery_check::types::{Category, DEFAULT_EXTERNAL_BASE, MAIN_PAGE_URL};
use std::path::PathBuf;

fn site_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/site")
}

fn detail_page(category: Category) -> LoadedPage {
    load_page(&site_root(), &category.page_url())
        .unwrap_or_else(|e| panic!("fixture {} failed to load: {e}", category.page_url()))
}

fn link_href<'a>(page: &'a LoadedPage, needle: &str) -> &'a str {
    let link = page
        .find_link_by_text(needle)
        .unwrap()
        .unwrap_or_else(|| panic!("no link containing {needle:?} on {}", page.url));
    element_attr(link, "href")
}

#[test]
fn every_detail_page_loads() {
    for category in Category::ALL {
        assert!(!detail_page(category).html.is_empty());
    }
}

#[test]
fn headings_match_category() {
    for category in Category::ALL {
        let page = detail_page(category);
        let headings = text_from_elements(&page.locator("h1").unwrap());
        assert!(headings.contains(&category.name().to_string()), "{category}: {headings:?}");
    }
}

#[test]
fn stylesheets_layout_then_image_details() {
    let root = site_root();
    for category in Category::ALL {
        let page = detail_page(category);
        let css = page.locator(r#"link[rel="stylesheet"]"#).unwrap();
        assert!(css.len() >= 2, "{category}");

        let layout = element_attr(css[0], "href");
        assert!(layout.contains("layout.css"));
        assert!(check_file_exists(&root, layout), "{category}: {layout}");

        let details = element_attr(css[1], "href");
        assert!(details.contains("/secondary/image-details.css"));
        assert!(check_file_exists(&root, details), "{category}: {details}");
    }
}

#[test]
fn deferred_script_exists() {
    for category in Category::ALL {
        let page = detail_page(category);
        let scripts = page.locator("script[defer]").unwrap();
        let src = element_attr(scripts[0], "src");
        assert!(src.contains("scripts.js"));
        assert!(check_file_exists(&site_root(), src));
    }
}

#[test]
fn main_image_is_category_image() {
    for category in Category::ALL {
        let page = detail_page(category);
        let images = page.locator("img").unwrap();
        assert!(element_attr(images[0], "src").contains(category.image_file()));
    }
}

#[test]
fn image_details_and_home_link() {
    for category in Category::ALL {
        let page = detail_page(category);
        assert!(!page.locator(".image-details").unwrap().is_empty());
        assert_eq!(prepare_path(link_href(&page, "Back to Home Page")), MAIN_PAGE_URL);
    }
}

#[test]
fn navigation_accepts_either_spelling() {
    for category in Category::ALL {
        let page = detail_page(category);
        for linked in Category::ALL {
            let link = page.find_nav_link(linked.name()).unwrap().unwrap();
            let href = element_attr(link, "href");
            assert!(
                matches_any(href, &linked.page_url_forms()),
                "{category} nav link to {linked}: {href}"
            );
        }
    }
}

#[test]
fn prev_next_follow_cycle() {
    let expected = [
        (Category::Space, Category::Nature, Category::ModernDesign),
        (Category::ModernDesign, Category::Space, Category::Plants),
        (Category::Plants, Category::ModernDesign, Category::Nature),
        (Category::Nature, Category::Plants, Category::Space),
    ];
    for (category, prev, next) in expected {
        let page = detail_page(category);
        let prev_href = link_href(&page, &format!("Prev: {prev}"));
        assert!(matches_any(prev_href, &prev.page_url_forms()), "{category} prev: {prev_href}");
        let next_href = link_href(&page, &format!("Next: {next}"));
        assert!(matches_any(next_href, &next.page_url_forms()), "{category} next: {next_href}");
    }
}

#[test]
fn more_images_links_are_external() {
    for category in Category::ALL {
        let page = detail_page(category);
        let href = link_href(&page, &category.more_images_text());
        assert_eq!(
            prepare_path(href),
            format!("https://unsplash.com/s/photos/{}", category.slug())
        );
    }
}

#[test]
fn nature_page_end_to_end() {
    let page = detail_page(Category::Nature);
    assert!(text_from_elements(&page.locator("h1").unwrap()).contains(&"Nature".to_string()));
    assert_eq!(page.locator(".image-details").unwrap().len(), 1);
    assert_eq!(
        link_href(&page, "More Nature Images"),
        "https://unsplash.com/s/photos/nature"
    );
    assert_eq!(prepare_path(link_href(&page, "Back to Home Page")), "index.html");
}

#[test]
fn contract_checks_agree() {
    let config = CheckConfig::default();
    assert_eq!(config.external_base, DEFAULT_EXTERNAL_BASE);
    for category in Category::ALL {
        let report = check_detail_page(&site_root(), category, &config);
        let failures: Vec<_> = report.checks.iter().filter(|c| !c.passed()).collect();
        assert!(failures.is_empty(), "{category}: {failures:?}");
        assert!(report.load_error.is_none());
    }
}
