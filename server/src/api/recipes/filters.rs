use url::form_urlencoded;

/// Filters accepted by the recipe list.
///
/// Parsed from the raw query string because `tags` may repeat
/// (`?tags=breakfast&tags=lunch`), which the plain `Query` extractor
/// cannot collect.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilters {
    pub author: Option<i32>,
    /// Tag slugs; a recipe matches when it has any of them
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl RecipeFilters {
    pub fn parse(raw_query: Option<&str>) -> Self {
        let mut filters = RecipeFilters::default();

        let query = raw_query.unwrap_or_default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            match &*key {
                "author" => filters.author = value.parse().ok(),
                "tags" => {
                    if !value.is_empty() && !filters.tags.iter().any(|tag| tag == value) {
                        filters.tags.push(value.to_string());
                    }
                }
                "is_favorited" => filters.is_favorited = parse_flag(value),
                "is_in_shopping_cart" => filters.is_in_shopping_cart = parse_flag(value),
                "page" => filters.page = value.parse().ok(),
                "limit" => filters.limit = value.parse().ok(),
                _ => {}
            }
        }

        filters
    }

    /// Anonymous viewers have no favorites or cart, so asking for either matches nothing.
    pub fn excludes_anonymous(&self) -> bool {
        self.is_favorited == Some(true) || self.is_in_shopping_cart == Some(true)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_query() {
        assert_eq!(RecipeFilters::parse(None), RecipeFilters::default());
        assert_eq!(RecipeFilters::parse(Some("")), RecipeFilters::default());
    }

    #[test]
    fn test_parse_repeated_tags() {
        let filters = RecipeFilters::parse(Some("tags=breakfast&tags=lunch&tags=breakfast"));
        assert_eq!(filters.tags, vec!["breakfast", "lunch"]);
    }

    #[test]
    fn test_parse_flags() {
        let filters = RecipeFilters::parse(Some("is_favorited=1&is_in_shopping_cart=0"));
        assert_eq!(filters.is_favorited, Some(true));
        assert_eq!(filters.is_in_shopping_cart, Some(false));
        assert!(filters.excludes_anonymous());

        let filters = RecipeFilters::parse(Some("is_favorited=maybe"));
        assert_eq!(filters.is_favorited, None);
        assert!(!filters.excludes_anonymous());
    }

    #[test]
    fn test_parse_author_and_paging() {
        let filters = RecipeFilters::parse(Some("author=4&page=2&limit=3&sort=new"));
        assert_eq!(filters.author, Some(4));
        assert_eq!(filters.page, Some(2));
        assert_eq!(filters.limit, Some(3));
    }

    #[test]
    fn test_parse_ignores_bad_numbers() {
        let filters = RecipeFilters::parse(Some("author=me&page=last"));
        assert_eq!(filters.author, None);
        assert_eq!(filters.page, None);
    }

    #[test]
    fn test_parse_encoded_slug() {
        let filters = RecipeFilters::parse(Some("tags=%D0%B7%D0%B0%D0%B2%D1%82%D1%80%D0%B0%D0%BA"));
        assert_eq!(filters.tags, vec!["завтрак"]);
    }
}
