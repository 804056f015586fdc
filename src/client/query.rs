use axum::http::Method;
use serde_json::Value;
use url::form_urlencoded;

use crate::store::{SortField, SortOrder};

/// The list request a client issues for its current filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    /// Only one tag reaches the server even when several are selected.
    pub tag: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl ListQuery {
    /// Path and query string, e.g. `/links?sortBy=title&sortOrder=asc&search=rust+book`.
    pub fn to_path(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("sortBy", self.sort_by.column())
            .append_pair("sortOrder", &self.sort_order.to_string());
        if !self.search.is_empty() {
            query.append_pair("search", &self.search);
        }
        if let Some(tag) = &self.tag {
            query.append_pair("tag", tag);
        }
        format!("/links?{}", query.finish())
    }
}

/// An HTTP call the host UI should perform against the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: String) -> Self {
        Self {
            method: Method::GET,
            path,
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: &str, tag: Option<&str>) -> ListQuery {
        ListQuery {
            search: search.to_string(),
            tag: tag.map(str::to_string),
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }

    #[test]
    fn default_query_only_carries_sorting() {
        assert_eq!(query("", None).to_path(), "/links?sortBy=createdAt&sortOrder=desc");
    }

    #[test]
    fn search_and_tag_are_encoded() {
        assert_eq!(
            query("rust & go", Some("c++")).to_path(),
            "/links?sortBy=createdAt&sortOrder=desc&search=rust+%26+go&tag=c%2B%2B"
        );
    }
}
