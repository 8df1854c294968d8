use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const START_NODE: &str = "start";

const DEFAULT_FLOW_JSON: &str = include_str!("../../data/mashti_flow.json");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowOption {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<String>>,
}

impl FlowOption {
    pub fn is_terminal(&self) -> bool {
        self.result.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    pub question: String,
    pub options: Vec<FlowOption>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlowDocument {
    #[serde(default = "default_start")]
    start: String,
    nodes: BTreeMap<String, FlowNode>,
}

fn default_start() -> String {
    START_NODE.to_owned()
}

/// Validated decision tree. Every `next` edge resolves and the start node exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    start: String,
    nodes: BTreeMap<String, FlowNode>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("flow definition could not be parsed: {0}")]
    Parse(String),
    #[error("flow definition could not be read from `{path}`: {message}")]
    Read { path: String, message: String },
    #[error("flow start node `{0}` does not exist")]
    MissingStart(String),
    #[error("flow node `{node}` has no options")]
    EmptyNode { node: String },
    #[error("option {option_index} of flow node `{node}` has neither `next` nor `result`")]
    OptionWithoutTarget { node: String, option_index: usize },
    #[error("option {option_index} of flow node `{node}` points at unknown node `{target}`")]
    DanglingReference { node: String, option_index: usize, target: String },
}

impl FlowGraph {
    pub fn new(
        start: impl Into<String>,
        nodes: BTreeMap<String, FlowNode>,
    ) -> Result<Self, GraphError> {
        let graph = Self { start: start.into(), nodes };
        graph.validate()?;
        Ok(graph)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, GraphError> {
        let document: FlowDocument =
            serde_json::from_str(raw).map_err(|error| GraphError::Parse(error.to_string()))?;
        Self::new(document.start, document.nodes)
    }

    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let raw = fs::read_to_string(path).map_err(|error| GraphError::Read {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// The decision tree shipped with the crate.
    pub fn mashti_default() -> Result<Self, GraphError> {
        Self::from_json_str(DEFAULT_FLOW_JSON)
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn node(&self, key: &str) -> Option<&FlowNode> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node_keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn validate(&self) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&self.start) {
            return Err(GraphError::MissingStart(self.start.clone()));
        }

        for (key, node) in &self.nodes {
            if node.options.is_empty() {
                return Err(GraphError::EmptyNode { node: key.clone() });
            }

            for (option_index, option) in node.options.iter().enumerate() {
                if option.next.is_none() && option.result.is_none() {
                    return Err(GraphError::OptionWithoutTarget { node: key.clone(), option_index });
                }
                if let Some(target) = &option.next {
                    if !self.nodes.contains_key(target) {
                        return Err(GraphError::DanglingReference {
                            node: key.clone(),
                            option_index,
                            target: target.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Load outcome the surrounding system can render: a usable graph, or the
/// authoring defect that prevented loading it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphStatus {
    Ready(FlowGraph),
    Invalid(GraphError),
}

impl GraphStatus {
    pub fn load(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => FlowGraph::from_path(path),
            None => FlowGraph::mashti_default(),
        };
        match loaded {
            Ok(graph) => Self::Ready(graph),
            Err(error) => {
                tracing::error!(
                    event_name = "flow.graph_invalid",
                    error = %error,
                    "decision tree failed validation"
                );
                Self::Invalid(error)
            }
        }
    }

    pub fn graph(&self) -> Option<&FlowGraph> {
        match self {
            Self::Ready(graph) => Some(graph),
            Self::Invalid(_) => None,
        }
    }

    pub fn into_result(self) -> Result<FlowGraph, GraphError> {
        match self {
            Self::Ready(graph) => Ok(graph),
            Self::Invalid(error) => Err(error),
        }
    }
}
