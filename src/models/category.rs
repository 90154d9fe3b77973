use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    pub category: String,
    #[serde(rename = "subCategories", default)]
    pub sub_categories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(rename = "subCategoryId")]
    pub sub_category_id: i64,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    pub name: String,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_with_subcategories() {
        let json = r#"[{
            "categoryId": 3,
            "category": "Food & Drink",
            "subCategories": [
                {"subCategoryId": 31, "categoryId": 3, "name": "Dining out",
                 "imageUrl": "https://cdn.example.com/icons/dining.png"},
                {"subCategoryId": 32, "categoryId": 3, "name": "Groceries", "imageUrl": null}
            ]
        }]"#;
        let categories: Vec<Category> = serde_json::from_str(json).expect("parse categories");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].sub_categories.len(), 2);
        assert_eq!(categories[0].sub_categories[1].name, "Groceries");
    }
}
