use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt::{Debug, Display};
use std::sync::Arc;

/// The stable identifier of a term, e.g. `HP:0001250`
///
/// Two `TermId`s are equal if and only if their string representations
/// are byte-wise equal. No normalization of case or whitespace is applied.
/// Cloning is cheap because the inner string is reference counted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId {
    inner: Arc<str>,
}

impl TermId {
    /// Returns the identifier as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        Self { inner: s.into() }
    }
}

impl From<String> for TermId {
    fn from(s: String) -> Self {
        Self { inner: s.into() }
    }
}

impl From<&TermId> for TermId {
    fn from(id: &TermId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({self})")
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// An ordered set of unique [`TermId`]s
///
/// This is the output type of term extraction. Equality of members
/// follows [`TermId`] equality.
pub type TermIds = BTreeSet<TermId>;

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn equality_is_exact() {
        let a = TermId::from("HP:0000001");
        assert_eq!(a, "HP:0000001");
        assert_ne!(a, TermId::from("hp:0000001"));
        assert_ne!(a, TermId::from(" HP:0000001"));
    }

    #[test]
    fn lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(TermId::from("HP:0000118"), 1);
        assert_eq!(map.get("HP:0000118"), Some(&1));
        assert!(map.get("HP:0000119").is_none());
    }

    #[test]
    fn set_deduplicates() {
        let ids: TermIds = ["B", "A", "B"].into_iter().map(TermId::from).collect();
        let ids: Vec<&str> = ids.iter().map(TermId::as_str).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
