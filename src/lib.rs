//! Property listing browser core: filtering, sorting, comparison, and a
//! natural-language search assistant over an in-memory listing set.

pub mod assistant;
pub mod catalog;
pub mod chat;
pub mod compare;
pub mod error;
pub mod filter;
pub mod listing;
pub mod llm;
pub mod mortgage;
pub mod session;
pub mod sort;
pub mod state;
