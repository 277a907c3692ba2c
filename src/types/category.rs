use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryList {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Response of `POST /categories`. Depending on the backend version the created
/// category is returned inline, nested under `category`, or not at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCategoryResponse {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default, alias = "title")]
    pub name: Option<String>,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default)]
    pub message: Option<String>,
}

impl CreateCategoryResponse {
    /// Extract the created category. `requested` is the name that was submitted,
    /// used when the backend echoes only the id.
    pub fn into_category(self, requested: &str) -> Option<Category> {
        if let Some(category) = self.category {
            return Some(category);
        }
        let id = self.id?;
        let name = self.name.unwrap_or_else(|| requested.to_string());
        Some(Category { id, name })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignCategoriesRequest {
    pub categories: Vec<u64>,
}

impl TerminalDisplay for Category {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Name"]
    }

    fn table_row(self) -> Vec<String> {
        vec![self.id.to_string(), self.name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_category_shapes() {
        let inline: CreateCategoryResponse =
            serde_json::from_str(r#"{"id": 5, "title": "T"}"#).unwrap();
        assert_eq!(
            inline.into_category("ignored"),
            Some(Category {
                id: 5,
                name: "T".to_string()
            })
        );

        let nested: CreateCategoryResponse =
            serde_json::from_str(r#"{"message": "ok", "category": {"id": 2, "name": "Rust"}}"#)
                .unwrap();
        assert_eq!(nested.into_category("Rust").unwrap().id, 2);

        let bare: CreateCategoryResponse =
            serde_json::from_str(r#"{"message": "created"}"#).unwrap();
        assert!(bare.into_category("Go").is_none());

        let id_only: CreateCategoryResponse = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert_eq!(id_only.into_category("Go").unwrap().name, "Go");
    }
}
