//! Classifier implementation: CART trees and the bagged forest built on them.

pub mod forest;
pub mod tree;

pub use forest::{RandomForest, train};
