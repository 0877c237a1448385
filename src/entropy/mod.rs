//! Shannon entropy of decoded URL strings.
//!
//! # Example
//!
//! ```
//! use phishguard::entropy::shannon_entropy;
//!
//! assert_eq!(shannon_entropy("aaaa"), 0.0);
//! assert!((shannon_entropy("ab") - 1.0).abs() < 1e-9);
//! ```

pub mod core;

pub use self::core::{shannon_entropy, CharHistogram};
