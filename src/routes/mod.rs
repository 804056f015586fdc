pub mod links;
pub mod tags;
