use serde::{Deserialize, Serialize};

use crate::core::types::Symptom;

/// Symptoms selected by the caller during one diagnostic session.
///
/// Behaves as a set: a symptom is present at most once. Toggle order is kept so a
/// persisted selection reads in the order it was entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    symptoms: Vec<Symptom>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the symptom if absent, remove it if present.
    /// Returns `true` when the symptom is selected afterwards.
    pub fn toggle(&mut self, symptom: Symptom) -> bool {
        if let Some(pos) = self.symptoms.iter().position(|s| *s == symptom) {
            self.symptoms.remove(pos);
            false
        } else {
            self.symptoms.push(symptom);
            true
        }
    }

    /// Add the symptom; returns `false` if it was already selected
    pub fn insert(&mut self, symptom: Symptom) -> bool {
        if self.contains(&symptom) {
            return false;
        }
        self.symptoms.push(symptom);
        true
    }

    pub fn clear(&mut self) {
        self.symptoms.clear();
    }

    #[must_use]
    pub fn contains(&self, symptom: &Symptom) -> bool {
        self.symptoms.contains(symptom)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symptom> {
        self.symptoms.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Symptom] {
        &self.symptoms
    }
}

impl<S: Into<Symptom>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for symptom in iter {
            selection.insert(symptom.into());
        }
        selection
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Symptom;
    type IntoIter = std::slice::Iter<'a, Symptom>;

    fn into_iter(self) -> Self::IntoIter {
        self.symptoms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();

        assert!(selection.toggle(Symptom::from("fever")));
        assert!(selection.contains(&Symptom::from("fever")));

        assert!(!selection.toggle(Symptom::from("fever")));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_keeps_entry_order() {
        let mut selection = SelectionSet::new();
        selection.toggle(Symptom::from("cough"));
        selection.toggle(Symptom::from("fever"));
        selection.toggle(Symptom::from("fatigue"));
        selection.toggle(Symptom::from("fever"));

        let names: Vec<&str> = selection.iter().map(Symptom::as_str).collect();
        assert_eq!(names, vec!["cough", "fatigue"]);
    }

    #[test]
    fn test_from_iter_collapses_duplicates() {
        let selection: SelectionSet = ["fever", "fever", "cough"].into_iter().collect();
        assert_eq!(selection.len(), 2);
    }
}
