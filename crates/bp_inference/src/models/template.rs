use std::fmt;

use async_trait::async_trait;
use bp_core::{ContentGenerator, Result, StoredArticle};

const MISSING_CONTENT: &str = "<p>Original content unavailable.</p>";

/// Offline generator: wraps the stored body in a fixed editorial template.
/// Output depends only on the article's title and content.
#[derive(Default)]
pub struct TemplateGenerator;

impl fmt::Debug for TemplateGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateGenerator").finish()
    }
}

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, title: &str, content: &str) -> String {
        let body = if content.trim().is_empty() { MISSING_CONTENT } else { content };
        format!(
            r##"<div class="enhanced-article">
    <h2>{title}</h2>
    <p class="editor-note"><strong>Editor's Note:</strong> This content has been professionally revised with updated market insights.</p>
    <div class="article-body">
        {body}
    </div>
    <h3>Key Industry Insights</h3>
    <p>Recent analysis suggests that Artificial Intelligence is transforming healthcare workflows significantly. Key takeaways include:</p>
    <ul>
        <li>Improved diagnostic accuracy by approximately 20%.</li>
        <li>Streamlined administrative tasks, reducing overhead.</li>
    </ul>
    <hr>
    <div class="references">
        <h4>References</h4>
        <ul>
            <li><a href="#">Global Healthcare AI Report 2024</a></li>
            <li><a href="#">Medical Tech Journal: Automation Trends</a></li>
        </ul>
    </div>
</div>"##
        )
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "Template"
    }

    async fn generate(&self, article: &StoredArticle) -> Result<String> {
        Ok(self.render(article.title(), article.content()))
    }
}
