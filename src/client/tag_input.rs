/// Keys the tag field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Backspace,
    Other,
}

/// The chosen tags of a link form plus the text currently being typed.
///
/// Committed text is split on commas; each token is trimmed and lowercased,
/// and empty or already chosen tokens are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInput {
    tags: Vec<String>,
    buffer: String,
}

impl TagInput {
    pub fn with_tags(tags: Vec<String>) -> Self {
        Self {
            tags,
            buffer: String::new(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Moves the buffer's tokens into the tag list and clears the buffer.
    /// Returns the tags that were actually added.
    pub fn commit(&mut self) -> Vec<String> {
        let input = std::mem::take(&mut self.buffer);
        let mut added = Vec::new();

        for token in input.split(',') {
            let tag = token.trim().to_lowercase();
            if tag.is_empty() || self.tags.contains(&tag) {
                continue;
            }
            self.tags.push(tag.clone());
            added.push(tag);
        }

        added
    }

    /// Handles a key press. Returns `true` when the key was consumed and the
    /// default action (focus change, character deletion) should be suppressed.
    pub fn key_down(&mut self, key: Key) -> bool {
        match key {
            Key::Enter | Key::Tab => {
                self.commit();
                true
            }
            Key::Backspace if self.buffer.is_empty() && !self.tags.is_empty() => {
                self.tags.pop();
                true
            }
            _ => false,
        }
    }

    pub fn blur(&mut self) {
        self.commit();
    }

    pub fn remove(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Adds an existing tag picked from the suggestion list.
    pub fn pick(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Known tags not chosen yet that contain the typed text, ignoring case.
    /// Nothing is suggested while the buffer is empty.
    pub fn suggestions<'a>(&self, known: &'a [String]) -> Vec<&'a str> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let needle = self.buffer.to_lowercase();
        known
            .iter()
            .filter(|tag| !self.tags.contains(*tag) && tag.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn into_tags(self) -> Vec<String> {
        self.tags
    }
}
