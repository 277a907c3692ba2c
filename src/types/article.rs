use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

use super::category::Category;

/// Maximum characters of content shown in a table cell.
const SUMMARY_WIDTH: usize = 48;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: u64,
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
}

/// One page of `GET /articles` or `GET /articles/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticlePage {
    #[serde(default)]
    pub articles: Vec<Article>,

    #[serde(default)]
    pub total: u64,

    #[serde(default = "ArticlePage::first_page")]
    pub page: u64,

    #[serde(default)]
    pub pages: u64,
}

impl ArticlePage {
    fn first_page() -> u64 {
        1
    }
}

impl Default for ArticlePage {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            total: 0,
            page: Self::first_page(),
            pages: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleList {
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteArticleResponse {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub deleted_article_id: Option<u64>,
}

impl TerminalDisplay for Article {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Title", "Author", "Content"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title,
            self.author.unwrap_or_default(),
            summarize(&self.content),
        ]
    }
}

fn summarize(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() <= SUMMARY_WIDTH && !content.contains('\n') {
        return line.to_string();
    }
    let mut summary: String = line.chars().take(SUMMARY_WIDTH).collect();
    summary.push_str("...");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page: ArticlePage = serde_json::from_str(r#"{"articles": []}"#).unwrap();
        assert_eq!(page, ArticlePage::default());
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize("short"), "short");
        assert_eq!(summarize("first\nsecond"), "first...");

        let long = "x".repeat(SUMMARY_WIDTH + 10);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), SUMMARY_WIDTH + 3);
    }
}
