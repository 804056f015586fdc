use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tag together with the number of links carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TagCount {
    pub name: String,
    pub count: i64,
}

/// Removes exact-string repeats while keeping first-seen order.
///
/// Case and surrounding whitespace are left alone: `"A"` and `"a"` are distinct names here.
pub fn dedup_names(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
