mod common;

use common::{body_json, titles, TestApp};
use linkvault::cli::import_file;
use std::path::PathBuf;

fn write_fixture(content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("linkvault-import-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn import_stores_every_link_with_tags() {
    let app = TestApp::new().await;
    let path = write_fixture(
        r#"[
            {"url": "https://a.dev", "title": "First", "tags": ["rust"], "createdAt": "2023-01-01T00:00:00Z"},
            {"url": "https://b.dev", "title": "Second", "notes": "n", "tags": ["rust", "web"]}
        ]"#,
    );

    let imported = import_file(&app.db, &path).await.unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(imported, 2);

    let links = body_json(app.get("/links?sortBy=title&sortOrder=asc").await).await;
    assert_eq!(titles(&links), ["First", "Second"]);
    assert_eq!(links[0]["createdAt"], "2023-01-01T00:00:00.000Z");
    assert_eq!(app.count("SELECT COUNT(*) FROM tags").await, 2);
}

#[tokio::test]
async fn import_is_all_or_nothing() {
    let app = TestApp::new().await;
    let path = write_fixture(
        r#"[
            {"url": "https://a.dev", "title": "Fine"},
            {"url": "https://b.dev", "title": "Broken date", "createdAt": "soon"}
        ]"#,
    );

    let result = import_file(&app.db, &path).await;
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
    assert_eq!(app.count("SELECT COUNT(*) FROM links").await, 0);
}

#[tokio::test]
async fn import_rejects_records_without_title() {
    let app = TestApp::new().await;
    let path = write_fixture(r#"[{"url": "https://a.dev", "title": ""}]"#);

    let result = import_file(&app.db, &path).await;
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
    assert_eq!(app.count("SELECT COUNT(*) FROM links").await, 0);
}
