//! Client-side state for the bookmark list, independent of any UI toolkit.
//!
//! A UI holds one [`ClientState`], feeds user input and HTTP completions to
//! [`reduce`] as [`Action`]s, and performs the returned [`Effect`]s. The state
//! itself is never mutated in place.

pub mod form;
pub mod query;
pub mod state;
pub mod tag_input;
pub mod view;

pub use form::{AddForm, EditForm, LinkChanges, LinkDraft};
pub use query::{ApiRequest, ListQuery};
pub use state::{reduce, Action, ClientState, Effect, Modal, RequestToken};
pub use tag_input::{Key, TagInput};
pub use view::LinkView;
