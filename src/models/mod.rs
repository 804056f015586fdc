pub mod link;
pub mod tag;

pub use link::{Link, LinkUpdate, NewLink};
pub use tag::TagCount;
