use std::collections::HashSet;

/// Titles already collected during a run. The first occurrence of a title wins.
#[derive(Debug, Default)]
pub struct SeenTitles(HashSet<String>);

impl SeenTitles {
    /// Returns `false` if the title was seen before.
    pub fn insert(&mut self, title: &str) -> bool {
        if self.0.contains(title) {
            return false;
        }
        self.0.insert(title.to_string())
    }
}
