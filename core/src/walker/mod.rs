//! walker: recursive directory encryption without recursion.

pub mod tree;
pub mod walk;

pub use tree::TreeWalker;
pub use walk::{TreeWalk, WalkEntry};
