#![forbid(unsafe_code)]

//! Named page regions.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ReelError;
use crate::geometry::Rect;

/// Stable identifier of a [`Section`]. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(Arc<str>);

impl SectionId {
    /// Create an id. Emptiness is checked where ids are registered, not here.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Borrow the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// A region of the page associated with one navigation entry.
///
/// `bounds` is the layout rectangle in page coordinates at the time the
/// section was handed to an observer. Observers that track layout changes
/// keep their own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub bounds: Rect,
}

impl Section {
    pub fn new(id: impl Into<SectionId>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            bounds,
        }
    }
}

/// Check that every id is non-empty and appears once.
///
/// Returns the first offending id.
pub fn ensure_unique_ids<'a>(ids: impl IntoIterator<Item = &'a SectionId>) -> Result<(), ReelError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.as_str().is_empty() {
            return Err(ReelError::EmptySectionId);
        }
        if !seen.insert(id.as_str()) {
            return Err(ReelError::DuplicateSection(id.to_string()));
        }
    }
    Ok(())
}

/// Check that `nav` and `sections` name the same ids, in any order.
///
/// Both lists are expected to be free of duplicates already.
pub fn ensure_one_to_one<'a>(
    nav: impl IntoIterator<Item = &'a SectionId>,
    sections: impl IntoIterator<Item = &'a SectionId>,
) -> Result<(), ReelError> {
    let nav: Vec<&SectionId> = nav.into_iter().collect();
    let sections: Vec<&SectionId> = sections.into_iter().collect();
    if let Some(id) = nav.iter().find(|id| !sections.contains(*id)) {
        return Err(ReelError::NavWithoutSection(id.to_string()));
    }
    if let Some(id) = sections.iter().find(|id| !nav.contains(*id)) {
        return Err(ReelError::SectionWithoutNav(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_against_plain_strings() {
        let id = SectionId::new("overview");
        assert_eq!(id, "overview");
        assert_eq!(id.as_str(), "overview");
        assert_eq!(id.to_string(), "overview");
    }

    #[test]
    fn unique_ids_pass() {
        let ids = [SectionId::new("a"), SectionId::new("b"), SectionId::new("c")];
        assert_eq!(ensure_unique_ids(&ids), Ok(()));
    }

    #[test]
    fn duplicate_reports_second_occurrence() {
        let ids = [SectionId::new("a"), SectionId::new("b"), SectionId::new("a")];
        assert_eq!(
            ensure_unique_ids(&ids),
            Err(ReelError::DuplicateSection("a".into()))
        );
    }

    #[test]
    fn nav_and_sections_must_match() {
        let ids = |names: &[&str]| names.iter().map(|n| SectionId::new(*n)).collect::<Vec<_>>();
        let sections = ids(&["a", "b"]);
        assert_eq!(ensure_one_to_one(&ids(&["b", "a"]), &sections), Ok(()));
        assert_eq!(
            ensure_one_to_one(&ids(&["a", "b", "ghost"]), &sections),
            Err(ReelError::NavWithoutSection("ghost".into()))
        );
        assert_eq!(
            ensure_one_to_one(&ids(&["a"]), &sections),
            Err(ReelError::SectionWithoutNav("b".into()))
        );
    }

    #[test]
    fn empty_id_is_rejected() {
        let ids = [SectionId::new("")];
        assert_eq!(ensure_unique_ids(&ids), Err(ReelError::EmptySectionId));
    }
}
