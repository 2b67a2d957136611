use indexmap::IndexMap;
use url::Url;

use crate::error::{Error, Result};

/// Display names of portal entries (events, sheets, assignments, lessons) mapped to the pages they
/// link to, in the order they appear on the page. A repeated name keeps its first position and
/// takes the URL of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    links: IndexMap<String, Url>,
}

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: String, url: Url) {
        self.links.insert(label, url);
    }

    pub fn get(&self, label: &str) -> Option<&Url> {
        self.links.get(label)
    }

    /// Like [`LinkMap::get`], but reports which kind of entry was missing.
    pub fn find(&self, kind: &'static str, label: &str) -> Result<&Url> {
        self.get(label).ok_or_else(|| Error::NotFound {
            kind,
            name: label.to_owned(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Url)> {
        self.links.iter().map(|(label, url)| (label.as_str(), url))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl FromIterator<(String, Url)> for LinkMap {
    fn from_iter<I: IntoIterator<Item = (String, Url)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (label, url) in iter {
            map.insert(label, url);
        }
        map
    }
}
