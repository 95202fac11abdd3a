//! Record filters run after canonicalization
//!
//! - [`AllowList`] / [`resolve_conflicts`] - drop block rules that clash
//!   with allow-listed domains, in both directions of the hierarchy
//! - [`collapse_covered`] - drop records already matched by a wildcard
//!   ancestor
//!
//! Both operate purely on in-memory record collections.

mod allow_list;
mod conflict;
mod hierarchy;

pub use allow_list::AllowList;
pub use conflict::resolve_conflicts;
pub use hierarchy::collapse_covered;
