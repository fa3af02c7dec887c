//! # Policy Module
//!
//! Tabular softmax policies. Each state owns one row of preference scores; the
//! action distribution for a state is the safe softmax of its row.
//!
//! Training uses two distinct [`TabularPolicy`] instances: a fixed reference policy
//! that anchors the KL penalty, and the trained policy whose weights the update rule
//! mutates in place.

pub mod tabular;

pub use tabular::{TabularPolicy, INIT_SCALE};
