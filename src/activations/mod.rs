//! # Activation Functions Module
//! 
//! Converts per-state preference scores into action distributions.
//! 
//! ## Available Activations
//! 
//! - **Safe softmax**: max-shifted softmax that falls back to the uniform distribution
//!   whenever the result would contain NaN or infinite entries
//! 
//! ## Usage Example
//! 
//! ```rust
//! use tabular_ppo::activations::safe_softmax;
//! use ndarray::array;
//! 
//! let probs = safe_softmax(array![1.0, 2.0, 3.0].view());
//! assert!((probs.sum() - 1.0).abs() < 1e-6);
//! 
//! // Degenerate scores never propagate a failure
//! let fallback = safe_softmax(array![f32::NAN, 0.0].view());
//! assert_eq!(fallback, array![0.5f32, 0.5]);
//! ```

pub mod softmax;

pub use softmax::{safe_softmax, uniform};
