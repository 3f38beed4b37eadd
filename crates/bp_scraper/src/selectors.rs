//! Field selectors for the listing and detail pages.
//!
//! The source site's markup changes independently of this code, so the
//! selectors are data: a [`SelectorConfig`] can be loaded from a JSON file
//! and falls back to the built-in set for the BeyondChats blog.
//!
//! ```json
//! {
//!   "entry": "article.entry-card",
//!   "entry_fields": {
//!     "title": { "selector": "h2.entry-title", "mode": "text" },
//!     "url": { "selector": "a.ct-media-container", "mode": "attr", "name": "href" }
//!   },
//!   "detail_fields": {
//!     "content": { "selector": ".entry-content", "mode": "inner_html" }
//!   }
//! }
//! ```

use bp_core::{Error, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::extract::FieldSet;

pub const FIELD_TITLE: &str = "title";
pub const FIELD_URL: &str = "url";
pub const FIELD_IMAGE_URL: &str = "image_url";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_AUTHOR: &str = "author";
pub const FIELD_CONTENT: &str = "content";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExtractMode {
    /// Whitespace-normalized text content
    Text,
    /// Value of the named attribute
    Attr { name: String },
    /// Inner HTML, untouched
    InnerHtml,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub selector: String,
    #[serde(flatten)]
    pub mode: ExtractMode,
}

impl FieldSpec {
    pub fn text(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            mode: ExtractMode::Text,
        }
    }

    pub fn attr(selector: &str, name: &str) -> Self {
        Self {
            selector: selector.to_string(),
            mode: ExtractMode::Attr {
                name: name.to_string(),
            },
        }
    }

    pub fn inner_html(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            mode: ExtractMode::InnerHtml,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Matches one listing entry; entry fields are resolved inside it.
    pub entry: String,
    pub entry_fields: BTreeMap<String, FieldSpec>,
    pub detail_fields: BTreeMap<String, FieldSpec>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let entry_fields = BTreeMap::from([
            (FIELD_TITLE.to_string(), FieldSpec::text("h2.entry-title")),
            (FIELD_URL.to_string(), FieldSpec::attr("a.ct-media-container", "href")),
            (FIELD_IMAGE_URL.to_string(), FieldSpec::attr(".ct-media-container img", "src")),
            (FIELD_DESCRIPTION.to_string(), FieldSpec::text(".entry-excerpt")),
            (FIELD_AUTHOR.to_string(), FieldSpec::text(".meta-author span")),
        ]);
        let detail_fields = BTreeMap::from([(
            FIELD_CONTENT.to_string(),
            FieldSpec::inner_html(".entry-content"),
        )]);

        Self {
            entry: "article.entry-card".to_string(),
            entry_fields,
            detail_fields,
        }
    }
}

/// Selectors parsed once, ready for repeated extraction.
#[derive(Debug)]
pub struct CompiledSelectors {
    pub entry: Selector,
    pub entry_fields: FieldSet,
    pub detail_fields: FieldSet,
}

impl SelectorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn compile(&self) -> Result<CompiledSelectors> {
        for field in [FIELD_TITLE, FIELD_URL] {
            if !self.entry_fields.contains_key(field) {
                return Err(Error::Config(format!("Entry selectors must define '{}'", field)));
            }
        }
        if !self.detail_fields.contains_key(FIELD_CONTENT) {
            return Err(Error::Config(format!(
                "Detail selectors must define '{}'",
                FIELD_CONTENT
            )));
        }

        Ok(CompiledSelectors {
            entry: parse_selector(&self.entry)?,
            entry_fields: FieldSet::compile(&self.entry_fields)?,
            detail_fields: FieldSet::compile(&self.detail_fields)?,
        })
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Selector(format!("'{}': {:?}", selector, e)))
}
