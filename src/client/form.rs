use serde::Serialize;

use super::tag_input::TagInput;
use crate::models::Link;

/// Body of `POST /links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDraft {
    pub url: String,
    pub title: String,
    pub notes: String,
    pub tags: Vec<String>,
}

/// Body of `PATCH /links/{id}`. Always sends the full tag list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkChanges {
    pub title: String,
    pub notes: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub url: String,
    pub title: String,
    pub notes: String,
    pub tags: TagInput,
}

impl AddForm {
    /// Checks required fields in the order the form shows them. Text left in
    /// the tag field is committed first, as leaving the field would.
    pub fn submit(mut self) -> Result<LinkDraft, String> {
        if self.url.is_empty() {
            return Err("URL is required".to_string());
        }
        if self.title.is_empty() {
            return Err("Title is required".to_string());
        }
        self.tags.commit();

        Ok(LinkDraft {
            url: self.url,
            title: self.title,
            notes: self.notes,
            tags: self.tags.into_tags(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub id: String,
    pub title: String,
    pub notes: String,
    pub tags: TagInput,
}

impl EditForm {
    pub fn for_link(link: &Link) -> Self {
        Self {
            id: link.id.clone(),
            title: link.title.clone(),
            notes: link.notes.clone().unwrap_or_default(),
            tags: TagInput::with_tags(link.tags.clone()),
        }
    }

    pub fn submit(mut self) -> Result<(String, LinkChanges), String> {
        if self.title.is_empty() {
            return Err("Title is required".to_string());
        }
        self.tags.commit();

        Ok((
            self.id,
            LinkChanges {
                title: self.title,
                notes: self.notes,
                tags: self.tags.into_tags(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_requires_url_before_title() {
        let form = AddForm::default();
        assert_eq!(form.submit().unwrap_err(), "URL is required");

        let form = AddForm {
            url: "https://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(form.submit().unwrap_err(), "Title is required");
    }

    #[test]
    fn add_form_commits_pending_tag_text() {
        let mut form = AddForm {
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            ..Default::default()
        };
        form.tags.set_buffer("Rust, Web");

        let draft = form.submit().unwrap();
        assert_eq!(draft.tags, ["rust", "web"]);
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({
                "url": "https://example.com",
                "title": "Example",
                "notes": "",
                "tags": ["rust", "web"],
            })
        );
    }

    #[test]
    fn edit_form_starts_from_link_and_requires_title() {
        let link = Link {
            id: "abc".to_string(),
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            notes: None,
            tags: vec!["web".to_string()],
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        };

        let mut form = EditForm::for_link(&link);
        assert_eq!(form.notes, "");
        assert_eq!(form.tags.tags(), ["web"]);

        form.title.clear();
        assert_eq!(form.clone().submit().unwrap_err(), "Title is required");

        form.title = "Renamed".to_string();
        let (id, changes) = form.submit().unwrap();
        assert_eq!(id, "abc");
        assert_eq!(changes.title, "Renamed");
        assert_eq!(changes.tags, ["web"]);
    }
}
