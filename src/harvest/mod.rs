//! DOM image harvesting
//!
//! Walks a parsed document and emits every raw image reference it can find,
//! in a fixed source order:
//!
//! 1. `<img>` inside slider image-wrap containers (`src`, `data-src`, `srcset`, `data-srcset`)
//! 2. every `<img>` (`src`, `data-src`)
//! 3. every `<img>` srcset list (`srcset`, `data-srcset`)
//! 4. `<picture><source>` srcset lists
//! 5. inline `background-image` styles
//! 6. `application/ld+json` structured data (`image`, `offers[].image`)
//!
//! No source short-circuits another and nothing is deduplicated here; the
//! same image routinely shows up several times and is collapsed downstream.

pub mod json_ld;
pub mod srcset;

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::utils::{is_candidate, resolve_url};

lazy_static! {
    // These selectors are hardcoded and syntactically valid CSS selectors.
    // If they fail to parse, it indicates a compile-time bug in the selector strings.
    static ref SLIDER_IMG_SELECTOR: Selector =
        Selector::parse(".slider-image-wrap img, [class*=\"slider\"] [class*=\"image-wrap\"] img")
            .expect("BUG: hardcoded slider image selector is invalid");

    static ref IMG_SELECTOR: Selector =
        Selector::parse("img")
            .expect("BUG: hardcoded CSS selector 'img' is invalid");

    static ref IMG_SRCSET_SELECTOR: Selector =
        Selector::parse("img[srcset], img[data-srcset]")
            .expect("BUG: hardcoded CSS selector 'img[srcset], img[data-srcset]' is invalid");

    static ref PICTURE_SOURCE_SELECTOR: Selector =
        Selector::parse("picture source")
            .expect("BUG: hardcoded CSS selector 'picture source' is invalid");

    static ref STYLED_SELECTOR: Selector =
        Selector::parse("[style]")
            .expect("BUG: hardcoded CSS selector '[style]' is invalid");

    static ref JSON_LD_SELECTOR: Selector =
        Selector::parse("script[type=\"application/ld+json\"]")
            .expect("BUG: hardcoded JSON-LD script selector is invalid");

    static ref BASE_SELECTOR: Selector =
        Selector::parse("base[href]")
            .expect("BUG: hardcoded CSS selector 'base[href]' is invalid");

    // First url(...) in a style attribute, quotes optional.
    static ref CSS_URL: Regex =
        Regex::new(r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#)
            .expect("BUG: hardcoded css url() regex is invalid");
}

/// Where in the document a candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    Slider,
    Img,
    Srcset,
    PictureSource,
    BackgroundImage,
    JsonLd,
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateSource::Slider => write!(f, "slider"),
            CandidateSource::Img => write!(f, "img"),
            CandidateSource::Srcset => write!(f, "srcset"),
            CandidateSource::PictureSource => write!(f, "picture-source"),
            CandidateSource::BackgroundImage => write!(f, "background-image"),
            CandidateSource::JsonLd => write!(f, "json-ld"),
        }
    }
}

/// A raw image reference exactly as it appeared in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub raw: String,
    pub source: CandidateSource,
}

impl Candidate {
    fn new(raw: &str, source: CandidateSource) -> Self {
        Self {
            raw: raw.trim().to_string(),
            source,
        }
    }
}

/// Collect every raw image reference in the document, in source order
#[must_use]
pub fn harvest(document: &Html) -> Vec<Candidate> {
    let mut out = Vec::new();

    for img in document.select(&SLIDER_IMG_SELECTOR) {
        push_attr(&mut out, img, "src", CandidateSource::Slider);
        push_attr(&mut out, img, "data-src", CandidateSource::Slider);
        push_srcset(&mut out, img, "srcset", CandidateSource::Slider);
        push_srcset(&mut out, img, "data-srcset", CandidateSource::Slider);
    }

    for img in document.select(&IMG_SELECTOR) {
        push_attr(&mut out, img, "src", CandidateSource::Img);
        push_attr(&mut out, img, "data-src", CandidateSource::Img);
    }

    for img in document.select(&IMG_SRCSET_SELECTOR) {
        push_srcset(&mut out, img, "srcset", CandidateSource::Srcset);
        push_srcset(&mut out, img, "data-srcset", CandidateSource::Srcset);
    }

    for source in document.select(&PICTURE_SOURCE_SELECTOR) {
        push_srcset(&mut out, source, "srcset", CandidateSource::PictureSource);
        push_srcset(&mut out, source, "data-srcset", CandidateSource::PictureSource);
    }

    for element in document.select(&STYLED_SELECTOR) {
        if let Some(url) = element.value().attr("style").and_then(background_image_url) {
            out.push(Candidate::new(url, CandidateSource::BackgroundImage));
        }
    }

    for script in document.select(&JSON_LD_SELECTOR) {
        let raw: String = script.text().collect();
        for url in json_ld::image_urls(&raw) {
            out.push(Candidate::new(&url, CandidateSource::JsonLd));
        }
    }

    out
}

/// Base URL for resolving references: `<base href>` if present, else the page URL
#[must_use]
pub fn document_base(document: &Html, page_url: &Url) -> Url {
    document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .filter(|base| matches!(base.scheme(), "http" | "https"))
        .unwrap_or_else(|| page_url.clone())
}

/// Filter and resolve candidates against `base`, dropping unusable ones
///
/// Empty, too-short and `data:` candidates are discarded; a candidate that
/// fails to resolve is dropped on its own without affecting the rest.
pub fn resolve_candidates<'a>(
    candidates: &'a [Candidate],
    base: &'a Url,
) -> impl Iterator<Item = (&'a Candidate, Url)> + 'a {
    candidates
        .iter()
        .filter(|candidate| is_candidate(&candidate.raw))
        .filter_map(move |candidate| match resolve_url(base, &candidate.raw) {
            Ok(url) => Some((candidate, url)),
            Err(e) => {
                log::debug!("Dropping {} candidate '{}': {e:#}", candidate.source, candidate.raw);
                None
            }
        })
}

/// Extract the first `url(...)` from a style attribute mentioning `background-image`
#[must_use]
pub fn background_image_url(style: &str) -> Option<&str> {
    if !style.to_ascii_lowercase().contains("background-image") {
        return None;
    }
    CSS_URL
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|url| !url.is_empty())
}

fn push_attr(out: &mut Vec<Candidate>, element: ElementRef<'_>, attr: &str, source: CandidateSource) {
    if let Some(value) = element.value().attr(attr) {
        out.push(Candidate::new(value, source));
    }
}

fn push_srcset(
    out: &mut Vec<Candidate>,
    element: ElementRef<'_>,
    attr: &str,
    source: CandidateSource,
) {
    if let Some(value) = element.value().attr(attr) {
        out.extend(srcset::urls(value).map(|url| Candidate::new(url, source)));
    }
}
