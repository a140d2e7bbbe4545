//! Methods to calculate the similarity between two terms
//!
//! The ranking scores a query against a disease by finding, for every
//! query term, the best matching disease term. The term-to-term
//! similarity is pluggable through the [`Similarity`] trait, the default
//! is [`Resnik`], the information content of the most informative
//! common ancestor.

use crate::Term;

mod defaults;
pub use defaults::Resnik;

/// Trait for similarity score calculation between 2 [`Term`]s
///
/// Implementations must be symmetric, `calculate(a, b) == calculate(b, a)`,
/// because the ranking caches scores per unordered pair of terms.
pub trait Similarity {
    /// calculates the actual similarity between term a and term b
    fn calculate(&self, a: &Term, b: &Term) -> f64;
}
