use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;

use super::Result;
use crate::models::tag::dedup_names;
use crate::models::TagCount;

// Keeps IN (...) lists well under SQLite's bound-parameter limit.
const LOOKUP_CHUNK: usize = 500;

/// Returns the id of the tag called `name`, creating the row if needed.
///
/// The insert is a no-op when another writer created the same name first, so two
/// requests introducing one brand-new tag both end up with the same row.
pub(crate) async fn resolve_tag_id(conn: &mut SqliteConnection, name: &str) -> Result<i64> {
    sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut *conn)
        .await?;

    let (id,): (i64,) = sqlx::query_as("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(id)
}

/// Associates every name in `names` with the link. Exact repeats are skipped.
pub(crate) async fn attach_tags(
    conn: &mut SqliteConnection,
    link_id: &str,
    names: &[String],
) -> Result<()> {
    for name in dedup_names(names) {
        let tag_id = resolve_tag_id(conn, &name).await?;

        sqlx::query("INSERT OR IGNORE INTO link_tags (link_id, tag_id) VALUES (?, ?)")
            .bind(link_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

pub(crate) async fn detach_all(conn: &mut SqliteConnection, link_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM link_tags WHERE link_id = ?")
        .bind(link_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Tag names of one link, in the order they were attached.
pub(crate) async fn tags_for_link(conn: &mut SqliteConnection, link_id: &str) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT t.name FROM tags t
        JOIN link_tags lt ON lt.tag_id = t.id
        WHERE lt.link_id = ?
        ORDER BY lt.rowid
        "#,
    )
    .bind(link_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Tag names for many links at once, keyed by link id.
pub(crate) async fn tags_for_links(
    conn: &mut SqliteConnection,
    link_ids: &[String],
) -> Result<HashMap<String, Vec<String>>> {
    let mut by_link: HashMap<String, Vec<String>> = HashMap::new();

    for chunk in link_ids.chunks(LOOKUP_CHUNK) {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT lt.link_id, t.name FROM link_tags lt JOIN tags t ON t.id = lt.tag_id WHERE lt.link_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in chunk {
            ids.push_bind(id.as_str());
        }
        ids.push_unseparated(") ORDER BY lt.rowid");

        let rows: Vec<(String, String)> = query.build_query_as().fetch_all(&mut *conn).await?;
        for (link_id, name) in rows {
            by_link.entry(link_id).or_default().push(name);
        }
    }

    Ok(by_link)
}

/// Every tag that is attached to at least one link, with its link count.
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<TagCount>> {
    let tags = sqlx::query_as::<_, TagCount>(
        r#"
        SELECT t.name, COUNT(lt.link_id) AS count
        FROM tags t
        JOIN link_tags lt ON lt.tag_id = t.id
        GROUP BY t.id
        ORDER BY t.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}
