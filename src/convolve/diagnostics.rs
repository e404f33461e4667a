use std::collections::BTreeSet;
use std::fmt;

use log::warn;

/// Deduplicated, human-readable notes about bands that could not be
/// convolved. Collected per observation, merged after the parallel barrier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: BTreeSet<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a band's window held no input samples.
    pub fn missing_input(&mut self, centre: impl fmt::Display) {
        self.messages.insert(format!(
            "Band {centre} nm was not convolved due to missing input data"
        ));
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.contains(message)
    }

    /// Emit every message once through the logger.
    pub fn log(&self) {
        for message in &self.messages {
            warn!("{message}");
        }
    }
}

impl FromIterator<Diagnostics> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostics>>(iter: I) -> Self {
        let mut all = Diagnostics::new();
        for d in iter {
            all.merge(d);
        }
        all
    }
}
