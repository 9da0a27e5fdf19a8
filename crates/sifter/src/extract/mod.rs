//! Email and link extraction from provider result pages.
//!
//! Extraction is two-tiered. Result containers are scanned first so an email
//! can be paired with the link of the result it came from. When no container
//! yields an email, the whole document's visible text is scanned and the
//! link is left empty.

mod text;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SifterError};
use crate::provider::{ProviderRegistry, ResultRule};

pub use text::visible_text;

/// Containers examined per page, in document order.
pub const MAX_RESULT_CONTAINERS: usize = 5;

/// Default location of the debug dump.
pub const DEFAULT_DEBUG_DUMP: &str = "search_result_debug.html";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

/// First email-looking substring of `text`.
pub fn find_email(text: &str) -> Option<&str> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str())
}

/// Email and source link found on one result page. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub email: String,
    pub source_link: String,
}

impl ExtractionResult {
    pub fn new(email: impl Into<String>, source_link: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            source_link: source_link.into(),
        }
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }
}

struct CompiledRule {
    container: Selector,
    link: Selector,
}

impl CompiledRule {
    fn compile(rule: &ResultRule) -> Result<Self> {
        let parse = |css: &str| {
            Selector::parse(css)
                .map_err(|e| SifterError::Config(format!("Invalid selector '{}': {}", css, e)))
        };
        Ok(Self {
            container: parse(rule.container)?,
            link: parse(rule.link)?,
        })
    }
}

/// Pulls an (email, link) pair out of a provider's result page.
pub struct Extractor {
    rules: HashMap<String, CompiledRule>,
    debug_dump: Option<PathBuf>,
}

impl Extractor {
    /// Compile the result rules of every provider in the registry.
    pub fn new(registry: &ProviderRegistry) -> Result<Self> {
        let rules = registry
            .iter()
            .map(|spec| Ok((spec.id.to_string(), CompiledRule::compile(&spec.rule)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            rules,
            debug_dump: None,
        })
    }

    /// Overwrite `path` with every body passed to [`Extractor::extract`].
    pub fn with_debug_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_dump = Some(path.into());
        self
    }

    pub fn debug_dump(&self) -> Option<&Path> {
        self.debug_dump.as_deref()
    }

    /// Extract the best (email, link) pair from `body`.
    ///
    /// Unknown provider ids have no containers and go straight to the
    /// whole-document scan.
    pub fn extract(&self, body: &str, provider_id: &str) -> ExtractionResult {
        if body.is_empty() {
            return ExtractionResult::default();
        }
        self.dump(body);

        let document = Html::parse_document(body);

        if let Some(rule) = self.rules.get(provider_id) {
            let containers = document.select(&rule.container).take(MAX_RESULT_CONTAINERS);
            for (position, container) in containers.enumerate() {
                if let Some(email) = find_email(&visible_text(container)) {
                    let link = primary_link(container, &rule.link);
                    debug!(
                        "{}: email in result container {} (link: {})",
                        provider_id,
                        position + 1,
                        if link.is_empty() { "none" } else { &link }
                    );
                    return ExtractionResult::new(email, link);
                }
            }
        } else {
            debug!("{}: no result rule, scanning whole page", provider_id);
        }

        let page_text = visible_text(document.root_element());
        match find_email(&page_text) {
            Some(email) => {
                debug!("{}: email found outside result containers", provider_id);
                ExtractionResult::new(email, "")
            }
            None => ExtractionResult::default(),
        }
    }

    fn dump(&self, body: &str) {
        if let Some(path) = &self.debug_dump {
            if let Err(e) = fs::write(path, body) {
                debug!("Could not write debug dump {}: {}", path.display(), e);
            }
        }
    }
}

fn primary_link(container: ElementRef<'_>, link: &Selector) -> String {
    container
        .select(link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(ProviderRegistry::builtin()).unwrap()
    }

    fn ddg_result(text: &str, href: &str) -> String {
        format!(
            r#"<div class="result results_links"><h2><a class="result__a" href="{href}">Title</a></h2>
               <a class="result__snippet" href="/other">{text}</a></div>"#
        )
    }

    #[test]
    fn test_find_email_pattern() {
        assert_eq!(
            find_email("mail jane.doe+re@homes.example.com now"),
            Some("jane.doe+re@homes.example.com")
        );
        assert_eq!(find_email("jane@example"), None);
        assert_eq!(find_email("jane.example.com"), None);
        assert_eq!(find_email("@example.com"), None);
        assert_eq!(find_email("jane@example.c"), None);
    }

    #[test]
    fn test_container_match_pairs_link() {
        let body = format!(
            "<html><body>{}{}</body></html>",
            ddg_result("Nothing here", "https://a.example"),
            ddg_result("Contact jane@realty.com today", "https://b.example"),
        );
        let result = extractor().extract(&body, "duckduckgo");
        assert_eq!(result, ExtractionResult::new("jane@realty.com", "https://b.example"));
    }

    #[test]
    fn test_bold_query_terms_inside_email() {
        let bing = r#"<ol><li class="b_algo"><h2><a href="https://bing.example/jane">Jane</a></h2>
                      <p>Contact <strong>jane</strong>@realty.com</p></li></ol>"#;
        assert_eq!(
            extractor().extract(bing, "bing"),
            ExtractionResult::new("jane@realty.com", "https://bing.example/jane")
        );

        let ddg = ddg_result("Write jdoe@<b>kw</b>.com", "https://kw.example");
        assert_eq!(
            extractor().extract(&ddg, "duckduckgo"),
            ExtractionResult::new("jdoe@kw.com", "https://kw.example")
        );
    }

    #[test]
    fn test_page_fallback_joins_inline_markup() {
        let body = r#"<html><body><p>Reach <em>sales</em>@broker.net</p></body></html>"#;
        assert_eq!(
            extractor().extract(body, "yahoo"),
            ExtractionResult::new("sales@broker.net", "")
        );
    }

    #[test]
    fn test_only_first_five_containers_are_scanned() {
        let mut results = String::new();
        for i in 0..5 {
            results.push_str(&ddg_result("no email", &format!("https://{}.example", i)));
        }
        results.push_str(&ddg_result("late@realty.com", "https://late.example"));
        let body = format!("<html><body>{}</body></html>", results);

        // Found by the page-wide scan, so no link.
        let result = extractor().extract(&body, "duckduckgo");
        assert_eq!(result, ExtractionResult::new("late@realty.com", ""));
    }

    #[test]
    fn test_page_fallback_has_empty_link() {
        let body = r#"<html><body><div class="ad">Call or write ads@broker.net</div></body></html>"#;
        let result = extractor().extract(body, "bing");
        assert_eq!(result, ExtractionResult::new("ads@broker.net", ""));
    }

    #[test]
    fn test_bing_link_rule() {
        let body = r#"<ol><li class="b_algo"><h2><a href="https://bing.example/r">Jane</a></h2>
                      <p>jane@doe.org</p></li></ol>"#;
        let result = extractor().extract(body, "bing");
        assert_eq!(result, ExtractionResult::new("jane@doe.org", "https://bing.example/r"));
    }

    #[test]
    fn test_container_without_link() {
        let body = r#"<div class="Sr"><span>jane@doe.org</span></div>"#;
        let result = extractor().extract(body, "yahoo");
        assert_eq!(result, ExtractionResult::new("jane@doe.org", ""));
    }

    #[test]
    fn test_no_email_anywhere() {
        let body = "<html><body><div class=\"result\">No contact info</div></body></html>";
        assert_eq!(extractor().extract(body, "searx"), ExtractionResult::default());
        assert_eq!(extractor().extract("", "searx"), ExtractionResult::default());
    }

    #[test]
    fn test_script_text_is_ignored() {
        let body = r#"<html><head><script>var x = "tracker@ads.com";</script></head>
                      <body><p>nothing</p></body></html>"#;
        assert_eq!(extractor().extract(body, "bing"), ExtractionResult::default());
    }

    #[test]
    fn test_unknown_provider_scans_page() {
        let body = r#"<div class="result">jane@doe.org <a href="/x">x</a></div>"#;
        let result = extractor().extract(body, "altavista");
        assert_eq!(result, ExtractionResult::new("jane@doe.org", ""));
    }

    #[test]
    fn test_debug_dump_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.html");
        let extractor = extractor().with_debug_dump(&path);

        extractor.extract("<p>first</p>", "bing");
        extractor.extract("<p>second</p>", "bing");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>second</p>");
    }
}
