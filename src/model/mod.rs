//! Online model used by [`LearnedLruCache`](crate::policy::learned_lru::LearnedLruCache).
//!
//! - [`features`]: byte n-gram windows hashed to signed 32-bit codes.
//! - [`perceptron`]: linear scorer over those codes, trained one sign step at a
//!   time with AdaGrad learning rates.

pub mod features;
pub mod perceptron;

pub use features::{DEFAULT_WINDOWS, extract, extract_into, feature_count, hash_window};
pub use perceptron::{ADAGRAD_FLOOR, Perceptron};
