//! Tree session: the tree plus the state a front end keeps around it.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::application::script::ScriptCommand;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{NamedTree, NewNode, Node, TraversalKind, TreeNodeConvert};

/// Result of executing one command against a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Whether the insertion changed the tree
    Inserted(bool),
    /// Number of nodes removed
    Deleted(usize),
    Traversal(TraversalKind, Vec<String>),
    Rendered(String),
    Json(String),
}

#[derive(Debug, Clone)]
pub struct TreeSession {
    tree: NamedTree,
    validate_input: bool,
    json_pretty: bool,
    last_traversal: Vec<String>,
}

impl TreeSession {
    /// Fresh session, seeded with the configured root if enabled.
    pub fn new(settings: &Settings) -> Self {
        let tree = settings
            .seed
            .node()
            .map(NamedTree::with_root)
            .unwrap_or_default();
        Self::from_tree(tree, settings)
    }

    pub fn from_tree(tree: NamedTree, settings: &Settings) -> Self {
        Self {
            tree,
            validate_input: settings.validate_input,
            json_pretty: settings.json_pretty,
            last_traversal: Vec::new(),
        }
    }

    /// Session over a JSON snapshot: a single node object or an array of at
    /// most one. Nesting depth is not limited.
    #[instrument(level = "debug", skip(json, settings))]
    pub fn from_json(json: &str, settings: &Settings) -> ApplicationResult<Self> {
        let forest = if json.trim_start().starts_with('[') {
            parse_unbounded::<Vec<Node>>(json)
        } else {
            parse_unbounded::<Node>(json).map(|node| vec![node])
        }
        .map_err(|e| ApplicationError::Snapshot {
            message: e.to_string(),
        })?;

        let tree = NamedTree::from_forest(forest)?;
        debug!("Loaded snapshot with {} nodes", tree.len());
        Ok(Self::from_tree(tree, settings))
    }

    pub fn tree(&self) -> &NamedTree {
        &self.tree
    }

    /// Adds `name`/`value` under `parent` (empty parent = root insertion).
    ///
    /// With input validation on, empty names and values are rejected before
    /// the tree is touched.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent: &str, name: &str, value: &str) -> ApplicationResult<bool> {
        if self.validate_input {
            if name.is_empty() {
                return Err(ApplicationError::InvalidInput { field: "name" });
            }
            if value.is_empty() {
                return Err(ApplicationError::InvalidInput { field: "value" });
            }
        }
        Ok(self.tree.insert(parent, NewNode::new(name, value)))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, name: &str) -> ApplicationResult<usize> {
        if self.validate_input && name.is_empty() {
            return Err(ApplicationError::InvalidInput { field: "name" });
        }
        Ok(self.tree.delete(name))
    }

    /// Runs a traversal and keeps it as the last result.
    #[instrument(level = "debug", skip(self))]
    pub fn traverse(&mut self, kind: TraversalKind) -> &[String] {
        self.last_traversal = self.tree.traverse(kind);
        &self.last_traversal
    }

    pub fn last_traversal(&self) -> &[String] {
        &self.last_traversal
    }

    pub fn snapshot(&self) -> Vec<Node> {
        self.tree.snapshot()
    }

    pub fn render(&self) -> String {
        self.tree.to_tree_string().to_string()
    }

    pub fn to_json(&self) -> ApplicationResult<String> {
        let snapshot = self.snapshot();
        let json = if self.json_pretty {
            serde_json::to_string_pretty(&snapshot)
        } else {
            serde_json::to_string(&snapshot)
        };
        json.map_err(|e| ApplicationError::OperationFailed {
            context: "serialize snapshot".to_string(),
            source: Box::new(e),
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, command: &ScriptCommand) -> ApplicationResult<Outcome> {
        match command {
            ScriptCommand::Add {
                parent,
                name,
                value,
            } => self.add(parent, name, value).map(Outcome::Inserted),
            ScriptCommand::Delete { name } => self.delete(name).map(Outcome::Deleted),
            ScriptCommand::Traverse(kind) => {
                let names = self.traverse(*kind).to_vec();
                Ok(Outcome::Traversal(*kind, names))
            }
            ScriptCommand::Show => Ok(Outcome::Rendered(self.render())),
            ScriptCommand::Json => self.to_json().map(Outcome::Json),
        }
    }
}

/// serde_json without its nesting limit; the stack grows on demand instead.
fn parse_unbounded<T: DeserializeOwned>(json: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}
