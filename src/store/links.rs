use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{tags, Result, StoreError};
use crate::models::link::{next_timestamp, normalize_timestamp, timestamp_now};
use crate::models::{Link, LinkUpdate, NewLink};

const LINK_COLUMNS: &str = "l.id, l.url, l.title, l.notes, l.createdAt, l.updatedAt";

pub const DEFAULT_LIMIT: i64 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Url,
    Notes,
    Id,
}

impl SortField {
    /// Column name in `links`. Only these fixed names ever reach the SQL text.
    pub fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Title => "title",
            SortField::Url => "url",
            SortField::Notes => "notes",
            SortField::Id => "id",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            "url" => Ok(SortField::Url),
            "notes" => Ok(SortField::Notes),
            "id" => Ok(SortField::Id),
            other => Err(format!("unsupported sortBy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unsupported sortOrder: {other}")),
        }
    }
}

/// Criteria for [`list_links`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFilter {
    /// Exact tag name; a single tag only.
    pub tag: Option<String>,
    /// Case-insensitive substring of title, notes or url.
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            tag: None,
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Escapes LIKE wildcards so the search text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn list_links(pool: &SqlitePool, filter: &LinkFilter) -> Result<Vec<Link>> {
    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {LINK_COLUMNS} FROM links l WHERE 1 = 1"));

    if let Some(tag) = &filter.tag {
        query
            .push(
                " AND l.id IN (SELECT lt.link_id FROM link_tags lt JOIN tags t ON t.id = lt.tag_id WHERE t.name = ",
            )
            .push_bind(tag.as_str())
            .push(")");
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        query
            .push(" AND (l.title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR l.notes LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR l.url LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    // rowid breaks ties between links created in the same millisecond
    let order = filter.sort_order.keyword();
    query.push(format!(
        " ORDER BY l.{} {order}, l.rowid {order}",
        filter.sort_by.column()
    ));
    query
        .push(" LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    let mut conn = pool.acquire().await?;
    let mut links: Vec<Link> = query.build_query_as().fetch_all(&mut *conn).await?;

    let ids: Vec<String> = links.iter().map(|link| link.id.clone()).collect();
    let mut tags_by_link = tags::tags_for_links(&mut conn, &ids).await?;
    for link in &mut links {
        link.tags = tags_by_link.remove(&link.id).unwrap_or_default();
    }

    Ok(links)
}

/// Loads a link row and its tags.
async fn fetch_link(conn: &mut SqliteConnection, id: &str) -> Result<Link> {
    let link: Option<Link> = sqlx::query_as(
        "SELECT l.id, l.url, l.title, l.notes, l.createdAt, l.updatedAt FROM links l WHERE l.id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(mut link) = link else {
        return Err(StoreError::NotFound);
    };

    link.tags = tags::tags_for_link(conn, id).await?;
    Ok(link)
}

pub async fn get_link(pool: &SqlitePool, id: &str) -> Result<Link> {
    let mut conn = pool.acquire().await?;
    fetch_link(&mut conn, id).await
}

async fn insert_link(conn: &mut SqliteConnection, new: NewLink) -> Result<Link> {
    let id = Uuid::new_v4().to_string();
    let now = timestamp_now();
    let created_at = match new.created_at.as_deref() {
        Some(raw) => {
            normalize_timestamp(raw).ok_or_else(|| StoreError::InvalidTimestamp(raw.to_string()))?
        }
        None => now.clone(),
    };

    sqlx::query(
        "INSERT INTO links (id, url, title, notes, createdAt, updatedAt) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&new.url)
    .bind(&new.title)
    .bind(new.notes.as_deref().unwrap_or_default())
    .bind(&created_at)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    tags::attach_tags(conn, &id, &new.tags).await?;

    fetch_link(conn, &id).await
}

pub async fn create_link(pool: &SqlitePool, new: NewLink) -> Result<Link> {
    let mut tx = pool.begin().await?;
    let link = insert_link(&mut tx, new).await?;
    tx.commit().await?;

    tracing::debug!(id = %link.id, tags = link.tags.len(), "created link");
    Ok(link)
}

/// Creates every link in one transaction; either all are stored or none.
pub async fn import_links(pool: &SqlitePool, links: Vec<NewLink>) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut imported = 0;

    for new in links {
        insert_link(&mut tx, new).await?;
        imported += 1;
    }

    tx.commit().await?;
    Ok(imported)
}

pub async fn update_link(pool: &SqlitePool, id: &str, update: LinkUpdate) -> Result<Link> {
    let mut tx = pool.begin().await?;

    let previous: Option<String> = sqlx::query_scalar("SELECT updatedAt FROM links WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(previous) = previous else {
        return Err(StoreError::NotFound);
    };

    let mut query = QueryBuilder::<Sqlite>::new("UPDATE links SET updatedAt = ");
    query.push_bind(next_timestamp(&previous));
    if let Some(title) = update.title {
        query.push(", title = ").push_bind(title);
    }
    if let Some(notes) = update.notes {
        query.push(", notes = ").push_bind(notes);
    }
    query.push(" WHERE id = ").push_bind(id);

    let result = query.build().execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }

    if let Some(tag_names) = update.tags {
        tags::detach_all(&mut tx, id).await?;
        tags::attach_tags(&mut tx, id, &tag_names).await?;
    }

    let link = fetch_link(&mut tx, id).await?;
    tx.commit().await?;

    tracing::debug!(%id, "updated link");
    Ok(link)
}

pub async fn delete_link(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM links WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }

    tracing::debug!(%id, "deleted link");
    Ok(())
}
