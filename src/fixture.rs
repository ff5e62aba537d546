//! Graph fixtures
//!
//! A fixture names its nodes and lists its relationships by endpoint names,
//! e.g. `"AB"` for an edge from `A` to `B` (or `"left-right"` when names are
//! longer than one character). The built-in fixture is the "house of
//! Nikolaus": a square with a roof and both diagonals, which can be drawn
//! in one stroke.
//!
//! ```text
//!        A
//!   B         C
//!
//!   D         E
//! ```

use crate::config::{read_document, ConfigError};
use crate::graph::{properties, GraphError, GraphStore, LookupError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Malformed relationship name {0:?}: expected two endpoint names like \"AB\" or \"A-B\"")]
    MalformedRelationship(String),

    #[error(transparent)]
    Load(#[from] ConfigError),
}

fn default_name_key() -> String {
    "Name".to_string()
}

fn default_relationship_type() -> String {
    "RELATION".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFixture {
    /// Property holding each node's (and relationship's) name
    #[serde(default = "default_name_key")]
    pub name_key: String,
    /// Type given to every relationship
    #[serde(default = "default_relationship_type")]
    pub relationship_type: String,
    pub nodes: Vec<String>,
    pub relationships: Vec<String>,
}

impl GraphFixture {
    /// The house: nodes `A..E`, relationships `AB AC BC BD BE CE CD DE`.
    pub fn house() -> Self {
        GraphFixture {
            name_key: default_name_key(),
            relationship_type: default_relationship_type(),
            nodes: ["A", "B", "C", "D", "E"].iter().map(|s| s.to_string()).collect(),
            relationships: ["AB", "AC", "BC", "BD", "BE", "CE", "CD", "DE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Load from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let fixture: Self = read_document(path.as_ref())?;
        info!(
            "Loaded fixture from {} ({} nodes, {} relationships)",
            path.as_ref().display(),
            fixture.nodes.len(),
            fixture.relationships.len()
        );
        Ok(fixture)
    }

    /// Create the fixture's nodes and relationships in a fresh store.
    ///
    /// Endpoints are resolved through the name property, so a name used by
    /// two nodes fails with [`LookupError::Ambiguous`].
    pub fn build(&self) -> Result<GraphStore, FixtureError> {
        let mut store = GraphStore::with_capacity(self.nodes.len(), self.relationships.len());
        let key = self.name_key.as_str();

        for name in &self.nodes {
            store.create_node(properties([(key, name.as_str())]));
        }

        for name in &self.relationships {
            let (from, to) = endpoints(name)
                .ok_or_else(|| FixtureError::MalformedRelationship(name.clone()))?;
            let source = store.find_node_by_property(key, from)?;
            let target = store.find_node_by_property(key, to)?;
            store.create_edge(
                source,
                target,
                self.relationship_type.as_str(),
                properties([(key, name.as_str())]),
            )?;
        }

        info!(
            "Built fixture graph: {} nodes, {} relationships",
            store.node_count(),
            store.edge_count()
        );
        Ok(store)
    }
}

/// Split `"A-B"` at the dash, or a two-character `"AB"` between characters.
fn endpoints(name: &str) -> Option<(&str, &str)> {
    if let Some((from, to)) = name.split_once('-') {
        return (!from.is_empty() && !to.is_empty()).then_some((from, to));
    }
    let mut chars = name.char_indices();
    chars.next()?;
    let (split, _) = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(name.split_at(split))
}
