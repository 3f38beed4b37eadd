use bp_core::Result;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

use crate::selectors::{parse_selector, ExtractMode, FieldSpec};

#[derive(Debug)]
struct CompiledField {
    name: String,
    selector: Selector,
    mode: ExtractMode,
}

impl CompiledField {
    /// First match wins; no match, or text that is only whitespace, is absent.
    fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        let element = scope.select(&self.selector).next()?;
        match &self.mode {
            ExtractMode::Text => {
                let text = normalize_whitespace(&element.text().collect::<String>());
                (!text.is_empty()).then_some(text)
            }
            ExtractMode::Attr { name } => element.value().attr(name).map(str::to_string),
            ExtractMode::InnerHtml => Some(element.inner_html()),
        }
    }
}

#[derive(Debug)]
pub struct FieldSet {
    fields: Vec<CompiledField>,
}

impl FieldSet {
    pub fn compile(specs: &BTreeMap<String, FieldSpec>) -> Result<Self> {
        let fields = specs
            .iter()
            .map(|(name, spec)| -> Result<CompiledField> {
                Ok(CompiledField {
                    name: name.clone(),
                    selector: parse_selector(&spec.selector)?,
                    mode: spec.mode.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Extracts every field from within `scope` (selectors match descendants only).
    pub fn extract_from(&self, scope: ElementRef<'_>) -> ExtractedFields {
        let values = self
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.extract(scope)))
            .collect();
        ExtractedFields { values }
    }

    pub fn extract_document(&self, document: &Html) -> ExtractedFields {
        self.extract_from(document.root_element())
    }
}

/// Field name to extracted value. A configured field that matched nothing
/// is present with `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    values: BTreeMap<String, Option<String>>,
}

impl ExtractedFields {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(|v| v.as_deref())
    }

    pub fn take(&mut self, field: &str) -> Option<String> {
        self.values.get_mut(field).and_then(Option::take)
    }

    pub fn is_absent(&self, field: &str) -> bool {
        self.get(field).is_none()
    }

    pub fn into_map(self) -> BTreeMap<String, Option<String>> {
        self.values
    }
}

/// Parses `html` and extracts `specs` from the whole document.
pub fn extract(html: &str, specs: &BTreeMap<String, FieldSpec>) -> Result<ExtractedFields> {
    let fields = FieldSet::compile(specs)?;
    let document = Html::parse_document(html);
    Ok(fields.extract_document(&document))
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"
        <article class="entry-card">
            <a class="ct-media-container" href="https://example.com/blogs/one/">
                <img src="https://example.com/one.png">
            </a>
            <h2 class="entry-title">
                First   <em>post</em>
            </h2>
            <div class="entry-excerpt"><p>Short summary</p></div>
        </article>
        <article class="entry-card">
            <h2 class="entry-title">Second post</h2>
        </article>
    "#;

    fn specs() -> BTreeMap<String, FieldSpec> {
        BTreeMap::from([
            ("title".to_string(), FieldSpec::text("h2.entry-title")),
            ("url".to_string(), FieldSpec::attr("a.ct-media-container", "href")),
            ("image_url".to_string(), FieldSpec::attr(".ct-media-container img", "src")),
            ("author".to_string(), FieldSpec::text(".meta-author span")),
            ("excerpt".to_string(), FieldSpec::inner_html(".entry-excerpt")),
        ])
    }

    #[test]
    fn test_extract_modes() {
        let fields = extract(ENTRY, &specs()).unwrap();
        assert_eq!(fields.get("title"), Some("First post"));
        assert_eq!(fields.get("url"), Some("https://example.com/blogs/one/"));
        assert_eq!(fields.get("image_url"), Some("https://example.com/one.png"));
        assert_eq!(fields.get("excerpt"), Some("<p>Short summary</p>"));
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let fields = extract(ENTRY, &specs()).unwrap();
        assert!(fields.is_absent("author"));

        let map = fields.into_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map["author"], None);
    }

    #[test]
    fn test_extract_within_entry_scope() {
        let set = FieldSet::compile(&specs()).unwrap();
        let document = Html::parse_document(ENTRY);
        let entry = Selector::parse("article.entry-card").unwrap();

        let entries: Vec<ExtractedFields> =
            document.select(&entry).map(|node| set.extract_from(node)).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].get("title"), Some("Second post"));
        assert!(entries[1].is_absent("url"));
        assert!(entries[1].is_absent("image_url"));
    }

    #[test]
    fn test_whitespace_only_text_is_absent() {
        let html = r#"<h2 class="entry-title">   </h2>"#;
        let fields = extract(html, &specs()).unwrap();
        assert!(fields.is_absent("title"));
    }

    #[test]
    fn test_take_moves_value_out() {
        let mut fields = extract(ENTRY, &specs()).unwrap();
        assert_eq!(fields.take("title").as_deref(), Some("First post"));
        assert_eq!(fields.take("title"), None);
    }

    #[test]
    fn test_invalid_selector() {
        let specs = BTreeMap::from([("title".to_string(), FieldSpec::text("h2[["))]);
        assert!(extract("<h2>x</h2>", &specs).is_err());
    }
}
