use axum::http::Method;

use super::form::{LinkChanges, LinkDraft};
use super::query::{ApiRequest, ListQuery};
use super::view::LinkView;
use crate::models::Link;
use crate::store::{SortField, SortOrder};

/// Identifies one list fetch. Tokens only ever grow, so a response can be
/// matched against the most recent request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Add,
    Edit(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub links: Vec<Link>,
    /// Every tag seen in `links`, in first-seen order.
    pub all_tags: Vec<String>,
    pub search: String,
    pub selected_tags: Vec<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub loading: bool,
    pub error: Option<String>,
    pub modal: Modal,
    latest_request: RequestToken,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            all_tags: Vec::new(),
            search: String::new(),
            selected_tags: Vec::new(),
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            loading: true,
            error: None,
            modal: Modal::Closed,
            latest_request: RequestToken::default(),
        }
    }
}

impl ClientState {
    /// False exactly when search, tag selection and sorting are all at their defaults.
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || !self.selected_tags.is_empty()
            || self.sort_by != SortField::CreatedAt
            || self.sort_order != SortOrder::Desc
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            search: self.search.clone(),
            tag: self.selected_tags.first().cloned(),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }

    pub fn latest_request(&self) -> RequestToken {
        self.latest_request
    }

    pub fn views(&self) -> Vec<LinkView> {
        self.links.iter().map(LinkView::from).collect()
    }

    /// Starts a new list fetch, superseding any in flight.
    fn refetch(mut self) -> (Self, Vec<Effect>) {
        self.latest_request = self.latest_request.next();
        self.loading = true;
        self.error = None;
        let effect = Effect::FetchLinks {
            token: self.latest_request,
            query: self.query(),
        };
        (self, vec![effect])
    }

    /// Refetches only when the filters differ from `before`.
    fn refetch_if_changed(self, before: &ClientState) -> (Self, Vec<Effect>) {
        if self.query() == before.query() && self.selected_tags == before.selected_tags {
            (self, Vec::new())
        } else {
            self.refetch()
        }
    }
}

fn collect_tags(links: &[Link]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in links.iter().flat_map(|link| &link.tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The list view appeared.
    Mount,
    SetSearch(String),
    ToggleTag(String),
    ClearTags,
    SetSort(SortField, SortOrder),
    ClearFilters,
    LinksLoaded {
        token: RequestToken,
        result: Result<Vec<Link>, String>,
    },
    OpenAdd,
    OpenEdit(String),
    /// Cancel button or a click outside the modal.
    CloseModal,
    SubmitAdd(LinkDraft),
    SubmitEdit { id: String, changes: LinkChanges },
    Delete(String),
    MutationFinished(Result<(), String>),
}

/// Work the host must carry out after a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchLinks { token: RequestToken, query: ListQuery },
    CreateLink(LinkDraft),
    UpdateLink { id: String, changes: LinkChanges },
    DeleteLink(String),
}

impl Effect {
    pub fn request(&self) -> ApiRequest {
        match self {
            Effect::FetchLinks { query, .. } => ApiRequest::get(query.to_path()),
            Effect::CreateLink(draft) => ApiRequest {
                method: Method::POST,
                path: "/links".to_string(),
                body: serde_json::to_value(draft).ok(),
            },
            Effect::UpdateLink { id, changes } => ApiRequest {
                method: Method::PATCH,
                path: format!("/links/{id}"),
                body: serde_json::to_value(changes).ok(),
            },
            Effect::DeleteLink(id) => ApiRequest {
                method: Method::DELETE,
                path: format!("/links/{id}"),
                body: None,
            },
        }
    }
}

/// Computes the next state and the effects it requires.
pub fn reduce(state: ClientState, action: Action) -> (ClientState, Vec<Effect>) {
    let before = state.clone();

    match action {
        Action::Mount => state.refetch(),
        Action::SetSearch(search) => ClientState { search, ..state }.refetch_if_changed(&before),
        Action::ToggleTag(tag) => {
            let mut selected_tags = state.selected_tags.clone();
            if let Some(pos) = selected_tags.iter().position(|t| *t == tag) {
                selected_tags.remove(pos);
            } else {
                selected_tags.push(tag);
            }
            ClientState {
                selected_tags,
                ..state
            }
            .refetch_if_changed(&before)
        }
        Action::ClearTags => ClientState {
            selected_tags: Vec::new(),
            ..state
        }
        .refetch_if_changed(&before),
        Action::SetSort(sort_by, sort_order) => ClientState {
            sort_by,
            sort_order,
            ..state
        }
        .refetch_if_changed(&before),
        Action::ClearFilters => ClientState {
            search: String::new(),
            selected_tags: Vec::new(),
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            ..state
        }
        .refetch_if_changed(&before),
        Action::LinksLoaded { token, result } => {
            if token != state.latest_request {
                tracing::debug!(?token, latest = ?state.latest_request, "dropping stale list response");
                return (state, Vec::new());
            }
            let next = match result {
                Ok(links) => ClientState {
                    all_tags: collect_tags(&links),
                    links,
                    loading: false,
                    ..state
                },
                Err(message) => ClientState {
                    error: Some(message),
                    loading: false,
                    ..state
                },
            };
            (next, Vec::new())
        }
        Action::OpenAdd if state.modal == Modal::Closed => (
            ClientState {
                modal: Modal::Add,
                ..state
            },
            Vec::new(),
        ),
        Action::OpenEdit(id) if state.modal == Modal::Closed => (
            ClientState {
                modal: Modal::Edit(id),
                ..state
            },
            Vec::new(),
        ),
        Action::OpenAdd | Action::OpenEdit(_) => (state, Vec::new()),
        Action::CloseModal => (
            ClientState {
                modal: Modal::Closed,
                ..state
            },
            Vec::new(),
        ),
        Action::SubmitAdd(draft) => (state, vec![Effect::CreateLink(draft)]),
        Action::SubmitEdit { id, changes } => (state, vec![Effect::UpdateLink { id, changes }]),
        Action::Delete(id) => (state, vec![Effect::DeleteLink(id)]),
        Action::MutationFinished(Ok(())) => ClientState {
            modal: Modal::Closed,
            ..state
        }
        .refetch(),
        Action::MutationFinished(Err(message)) => (
            ClientState {
                error: Some(message),
                ..state
            },
            Vec::new(),
        ),
    }
}
