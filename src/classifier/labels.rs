use serde::{Deserialize, Serialize};

/// Maps label strings to class indices.
///
/// Classes are the sorted distinct labels seen at fit time, so index 0 is
/// the lexicographically smallest label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        classes.sort_unstable();
        classes.dedup();
        Self { classes }
    }

    #[inline]
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    /// Encode labels that are known to be in the fitted set; unknown ones are skipped
    pub fn encode_all<S: AsRef<str>>(&self, labels: &[S]) -> Vec<usize> {
        labels.iter().filter_map(|l| self.encode(l.as_ref())).collect()
    }

    #[inline]
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(|c| c.as_str())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
