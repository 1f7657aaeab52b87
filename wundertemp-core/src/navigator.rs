//! Walks nested markup along a chain of attribute filters.
//!
//! A chain like `[id=curTemp, class=wx-value]` means: find the first element
//! with `id="curTemp"`, then, inside it, the first element whose class list
//! contains `wx-value`, and return that element's own text.

use std::fmt;

use scraper::{ElementRef, Html, node::Element};

use crate::error::ScrapeError;

/// One step of a [`SelectorChain`]: an attribute that must carry a given value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrFilter {
    tag: Option<String>,
    attr: String,
    value: String,
}

impl AttrFilter {
    pub fn new(attr: impl Into<String>, value: impl Into<String>) -> Self {
        Self { tag: None, attr: attr.into(), value: value.into() }
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::new("id", value)
    }

    pub fn class(value: impl Into<String>) -> Self {
        Self::new("class", value)
    }

    /// Restrict the filter to elements with the given tag name.
    #[must_use]
    pub fn on_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn matches(&self, element: &Element) -> bool {
        if self.tag.as_deref().is_some_and(|tag| !element.name().eq_ignore_ascii_case(tag)) {
            return false;
        }

        match element.attr(&self.attr) {
            None => false,
            Some(actual) if actual == self.value => true,
            // class is multi-valued: any single token may match
            Some(_) if self.attr == "class" => element.classes().any(|c| c == self.value),
            Some(_) => false,
        }
    }
}

impl fmt::Display for AttrFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        write!(f, "[{}=\"{}\"]", self.attr, self.value)
    }
}

/// Ordered filters used to drill into nested markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorChain(Vec<AttrFilter>);

impl SelectorChain {
    pub fn new(filters: impl IntoIterator<Item = AttrFilter>) -> Self {
        Self(filters.into_iter().collect())
    }

    pub fn filters(&self) -> &[AttrFilter] {
        &self.0
    }
}

impl fmt::Display for SelectorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, filter) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

/// First element in `scope`'s subtree (itself included) matching `filter`.
pub fn find_first<'a>(scope: ElementRef<'a>, filter: &AttrFilter) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| filter.matches(el.value()))
}

/// Follow `chain` through `document` and return the direct text of the last match.
pub fn navigate(document: &Html, chain: &SelectorChain) -> Result<String, ScrapeError> {
    if chain.filters().is_empty() {
        return Err(ScrapeError::markup("<empty selector chain>"));
    }

    let mut scope = document.root_element();
    for filter in chain.filters() {
        scope = find_first(scope, filter).ok_or_else(|| ScrapeError::markup(chain.to_string()))?;
    }

    let text: String = scope
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|t| &**t)
        .collect();
    let text = text.trim();

    if text.is_empty() {
        return Err(ScrapeError::markup(format!("{chain} (no text)")));
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div id="curCond"><span class="wx-value">Cloudy</span></div>
          <div id="curTemp">
            <span class="wx-data">
              <span class="wx-value">59.0</span><span class="wx-unit">&deg;F</span>
            </span>
          </div>
          <span class="wx-value">decoy</span>
        </body></html>
    "#;

    fn chain(filters: &[AttrFilter]) -> SelectorChain {
        SelectorChain::new(filters.iter().cloned())
    }

    #[test]
    fn single_filter_returns_direct_text() {
        let doc = Html::parse_document(r#"<p id="x"> hello </p>"#);
        let text = navigate(&doc, &chain(&[AttrFilter::id("x")])).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn nested_chain_is_scoped_to_previous_match() {
        let doc = Html::parse_document(PAGE);

        let cond = navigate(&doc, &chain(&[AttrFilter::id("curCond"), AttrFilter::class("wx-value")]));
        assert_eq!(cond.unwrap(), "Cloudy");

        let temp = navigate(&doc, &chain(&[AttrFilter::id("curTemp"), AttrFilter::class("wx-value")]));
        assert_eq!(temp.unwrap(), "59.0");

        let unit = navigate(&doc, &chain(&[AttrFilter::id("curTemp"), AttrFilter::class("wx-unit")]));
        assert_eq!(unit.unwrap(), "°F");
    }

    #[test]
    fn missing_step_is_markup_error() {
        let doc = Html::parse_document(PAGE);
        let err = navigate(&doc, &chain(&[AttrFilter::id("curHum"), AttrFilter::class("wx-value")]))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Markup { .. }));
        assert!(err.to_string().contains("curHum"));
    }

    #[test]
    fn empty_chain_is_markup_error() {
        let doc = Html::parse_document(PAGE);
        assert!(matches!(navigate(&doc, &chain(&[])), Err(ScrapeError::Markup { .. })));
    }

    #[test]
    fn element_without_own_text_is_markup_error() {
        let doc = Html::parse_document(PAGE);
        let err = navigate(&doc, &chain(&[AttrFilter::class("wx-data")])).unwrap_err();
        assert!(matches!(err, ScrapeError::Markup { .. }));
    }

    #[test]
    fn class_matches_whole_value_or_single_token() {
        let doc = Html::parse_document(r#"<div class="row city-list">a</div>"#);
        let whole = AttrFilter::class("row city-list").on_tag("div");
        let token = AttrFilter::class("city-list");
        let wrong_tag = AttrFilter::class("row city-list").on_tag("span");

        assert!(find_first(doc.root_element(), &whole).is_some());
        assert!(find_first(doc.root_element(), &token).is_some());
        assert!(find_first(doc.root_element(), &wrong_tag).is_none());
    }

    #[test]
    fn chain_displays_as_selector_path() {
        let c = chain(&[AttrFilter::id("curTemp"), AttrFilter::class("wx-unit")]);
        assert_eq!(c.to_string(), r#"[id="curTemp"] > [class="wx-unit"]"#);
    }
}
