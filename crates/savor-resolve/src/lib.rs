//! Resolvers: turn a free-text query into metadata filters and match
//! indexed reviews against them.
//!
//! `FilterPlanner` reads shop, rating, focus and sentiment constraints out
//! of the query. `RetrievalIndex` combines those predicates with a
//! substring relevance test over review content.

pub mod index;
pub mod planner;
pub mod shop;
pub mod types;

pub use index::RetrievalIndex;
pub use planner::{FilterPlanner, ShopAlias};
pub use shop::shop_matches;
pub use types::*;
