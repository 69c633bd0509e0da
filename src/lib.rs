// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Ordex - descending-order skip sets whose links live inside the items.
//!
//! Built for keeping a live collection sorted by a derived key while items
//! come and go, without allocating a node per item and without tying an item
//! to a single index.
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//!
//! use ordex::Linked;
//! use ordex::Links;
//! use ordex::OrderedIndex;
//!
//! struct Task {
//!     priority: u32,
//!     links: Links<Task>,
//! }
//!
//! impl Linked for Task {
//!     fn links(&self) -> &Links<Task> {
//!         return &self.links;
//!     }
//! }
//!
//! fn priority(task: &Task) -> &u32 {
//!     return &task.priority;
//! }
//!
//! // The index only links items weakly; the caller keeps them alive.
//! let tasks: Vec<_> = [5, 1, 5, 3]
//!     .into_iter()
//!     .map(|p| Rc::new(Task { priority: p, links: Links::new() }))
//!     .collect();
//!
//! let mut queue = OrderedIndex::new(priority);
//! for task in &tasks {
//!     queue.insert(task);
//! }
//!
//! let order: Vec<u32> = queue.iter().map(|t| t.priority).collect();
//! assert_eq!(order, vec![5, 5, 3, 1]);
//! assert_eq!(queue.fetch_last().unwrap().priority, 5);
//! ```

pub mod ordered;

pub use ordered::ConfigError;
pub use ordered::HeightSampler;
pub use ordered::Iter;
pub use ordered::KeyFn;
pub use ordered::LevelTag;
pub use ordered::Linked;
pub use ordered::Links;
pub use ordered::Options;
pub use ordered::OrderedIndex;
