use std::fmt;
use std::sync::Arc;

/// Immutable, ordered header sequence of a framework message.
///
/// Names keep the spelling they were given and compare case-insensitively; duplicates
/// stay in order. Cloning is cheap, the entries are shared.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Arc<[(String, String)]>,
}

impl Headers {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> HeadersBuilder {
        HeadersBuilder { entries: Vec::new() }
    }

    /// Returns the first value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.iter().filter(move |(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Returns true if any value of `name`, split on commas, equals `token` ignoring case.
    pub fn contains_token(&self, name: &str, token: &str) -> bool {
        self.get_all(name).flat_map(|value| value.split(',')).any(|t| t.trim().eq_ignore_ascii_case(token))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let entries: Vec<(String, String)> = iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect();
        Self { entries: entries.into() }
    }
}

#[derive(Debug, Default)]
pub struct HeadersBuilder {
    entries: Vec<(String, String)>,
}

impl HeadersBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Headers {
        Headers { entries: self.entries.into() }
    }
}
