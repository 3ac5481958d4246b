use crate::models::analysis::NameCount;

/// Case-insensitive tally that remembers first-seen order.
///
/// Keys are lower-cased and trimmed; blank keys are ignored.
#[derive(Debug, Default)]
pub(crate) struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, raw: &str) {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key, 1)),
        }
    }

    /// Keys seen at least `min` times, in first-seen order.
    pub fn at_least(&self, min: usize) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .filter(move |(_, count)| *count >= min)
            .map(|(k, c)| (k.as_str(), *c))
    }

    /// Rows sorted by count descending; ties keep first-seen order.
    pub fn ranked(&self, limit: Option<usize>) -> Vec<NameCount> {
        let mut rows: Vec<&(String, usize)> = self.entries.iter().collect();
        // Stable sort preserves insertion order among equal counts.
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows.into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(key, count)| NameCount::new(capitalize_first(key), *count))
            .collect()
    }
}

/// Upper-case the first character only; the rest is left as given.
pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
