use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ForwardError;

/// The tab pair-shaped parameters land in when no override is configured.
pub const DEFAULT_TAB_NAME: &str = "Extra Information";

/// Key/value data attached to a report, grouped into named tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, BTreeMap<String, String>>);

impl Metadata {
    /// Adds `key = value` to `tab`, creating the tab if needed.
    pub fn add_to_tab(
        &mut self,
        tab: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.0
            .entry(tab.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Returns the entries of a tab.
    pub fn tab(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(name)
    }

    /// Iterates over tab names in order.
    pub fn tab_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns `true` if no tab holds any entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parameters attached to a log event.
///
/// Pairs are filed under a single tab chosen by configuration. Triples name
/// their own tab in the first element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameters {
    /// `(key, value)` entries.
    Pairs(Vec<(String, String)>),
    /// `(tab, key, value)` entries.
    Triples(Vec<(String, String, String)>),
}

impl Parameters {
    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        match self {
            Parameters::Pairs(pairs) => pairs.is_empty(),
            Parameters::Triples(triples) => triples.is_empty(),
        }
    }
}

/// Builds metadata from parameters.
///
/// Returns `None` when there are no entries.
pub fn metadata_from_parameters(parameters: &Parameters, tab_name: &str) -> Option<Metadata> {
    match parameters {
        Parameters::Pairs(pairs) => file_pairs(pairs, tab_name),
        Parameters::Triples(triples) => file_triples(triples),
    }
}

/// Files every pair under `tab_name`.
///
/// A missing collection is a caller error and yields
/// [`ForwardError::MissingParameters`]; an empty one yields `Ok(None)`.
pub fn metadata_from_pairs(
    pairs: Option<&[(String, String)]>,
    tab_name: &str,
) -> Result<Option<Metadata>, ForwardError> {
    let pairs = pairs.ok_or(ForwardError::MissingParameters)?;
    Ok(file_pairs(pairs, tab_name))
}

/// Files every triple under the tab it names.
///
/// A missing collection is a caller error and yields
/// [`ForwardError::MissingParameters`]; an empty one yields `Ok(None)`.
pub fn metadata_from_triples(
    triples: Option<&[(String, String, String)]>,
) -> Result<Option<Metadata>, ForwardError> {
    let triples = triples.ok_or(ForwardError::MissingParameters)?;
    Ok(file_triples(triples))
}

fn file_pairs(pairs: &[(String, String)], tab_name: &str) -> Option<Metadata> {
    let mut metadata: Option<Metadata> = None;
    for (key, value) in pairs {
        metadata
            .get_or_insert_with(Metadata::default)
            .add_to_tab(tab_name, key.as_str(), value.as_str());
    }
    metadata
}

fn file_triples(triples: &[(String, String, String)]) -> Option<Metadata> {
    let mut metadata: Option<Metadata> = None;
    for (tab, key, value) in triples {
        metadata
            .get_or_insert_with(Metadata::default)
            .add_to_tab(tab.as_str(), key.as_str(), value.as_str());
    }
    metadata
}
