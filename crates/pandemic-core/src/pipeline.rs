//! Declarative node pipeline.
//!
//! Each [`Node`] names the datasets it reads and writes. A [`Pipeline`] resolves
//! its execution order from those declarations, so nodes may be declared in any
//! order and pipelines can be combined freely.
//!
//! # Example
//!
//! ```ignore
//! use pandemic_core::pipeline::{DatasetStore, Node, Pipeline};
//!
//! let pipeline = Pipeline::new(vec![node_a, node_b]);
//! let mut store = DatasetStore::new();
//! store.insert("covid_compact_raw", raw);
//! let report = pipeline.run(&mut store)?;
//! ```

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use crate::error::{PipelineError, Result};

/// Stage body: input frames in declaration order in, output frames in declaration order out.
pub type NodeFn = Arc<dyn Fn(&[DataFrame]) -> Result<Vec<DataFrame>> + Send + Sync>;

/// A stage bound to named datasets.
#[derive(Clone)]
pub struct Node {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    tags: BTreeSet<String>,
    func: NodeFn,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl Node {
    pub fn new<F>(name: impl Into<String>, inputs: &[&str], outputs: &[&str], func: F) -> Self
    where
        F: Fn(&[DataFrame]) -> Result<Vec<DataFrame>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
            outputs: outputs.iter().map(|s| (*s).to_string()).collect(),
            tags: BTreeSet::new(),
            func: Arc::new(func),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| (*t).to_string()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    fn call(&self, inputs: &[DataFrame]) -> Result<Vec<DataFrame>> {
        let outputs = (self.func)(inputs)?;
        if outputs.len() != self.outputs.len() {
            return Err(PipelineError::Node {
                node: self.name.clone(),
                message: format!(
                    "declared {} outputs but produced {}",
                    self.outputs.len(),
                    outputs.len()
                ),
            });
        }
        Ok(outputs)
    }
}

/// Named frames shared between nodes.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    frames: BTreeMap<String, DataFrame>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, frame: DataFrame) {
        self.frames.insert(name.into(), frame);
    }

    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.frames.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&DataFrame> {
        self.get(name)
            .ok_or_else(|| PipelineError::MissingDataset(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.frames.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetShape {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone)]
pub struct NodeRun {
    pub node: String,
    pub outputs: Vec<DatasetShape>,
    pub duration_ms: u128,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub nodes: Vec<NodeRun>,
}

impl RunReport {
    /// Shapes of every produced dataset, in production order.
    pub fn outputs(&self) -> impl Iterator<Item = &DatasetShape> {
        self.nodes.iter().flat_map(|run| run.outputs.iter())
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|run| run.node.as_str()).collect()
    }
}

/// An unordered set of nodes executed in dependency order.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    nodes: Vec<Node>,
}

impl Pipeline {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn add_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Union of two pipelines; nodes already present by name are not repeated.
    pub fn combine(mut self, other: Pipeline) -> Self {
        for node in other.nodes {
            if !self.nodes.iter().any(|n| n.name == node.name) {
                self.nodes.push(node);
            }
        }
        self
    }

    /// Sub-pipeline of nodes carrying at least one of `tags`.
    pub fn only_tags(&self, tags: &[&str]) -> Self {
        Self {
            nodes: self
                .nodes
                .iter()
                .filter(|node| tags.iter().any(|tag| node.has_tag(tag)))
                .cloned()
                .collect(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(Node::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Datasets no node produces; they must be supplied before running.
    pub fn free_inputs(&self) -> Vec<&str> {
        let produced = self.produced();
        let mut free: Vec<&str> = Vec::new();
        for node in &self.nodes {
            for input in &node.inputs {
                if !produced.contains(input.as_str()) && !free.contains(&input.as_str()) {
                    free.push(input);
                }
            }
        }
        free
    }

    /// Datasets produced by the pipeline, in declaration order.
    pub fn outputs(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flat_map(|node| node.outputs.iter().map(String::as_str))
            .collect()
    }

    fn produced(&self) -> BTreeSet<&str> {
        self.outputs().into_iter().collect()
    }

    /// Topological order of the nodes; ties keep declaration order.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Graph`] when two nodes produce the same dataset or the
    /// declarations contain a cycle.
    pub fn execution_order(&self) -> Result<Vec<&Node>> {
        let mut producer: BTreeMap<&str, usize> = BTreeMap::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            for output in &node.outputs {
                if let Some(previous) = producer.insert(output, idx) {
                    return Err(PipelineError::Graph(format!(
                        "{output} is produced by both {} and {}",
                        self.nodes[previous].name, node.name
                    )));
                }
            }
        }

        let mut pending = vec![0usize; self.nodes.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (idx, node) in self.nodes.iter().enumerate() {
            let upstream: BTreeSet<usize> = node
                .inputs
                .iter()
                .filter_map(|input| producer.get(input.as_str()).copied())
                .collect();
            pending[idx] = upstream.len();
            for parent in upstream {
                dependents[parent].push(idx);
            }
        }

        let mut ready: VecDeque<usize> = (0..self.nodes.len())
            .filter(|idx| pending[*idx] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(idx) = ready.pop_front() {
            order.push(idx);
            let mut unlocked = Vec::new();
            for &child in &dependents[idx] {
                pending[child] -= 1;
                if pending[child] == 0 {
                    unlocked.push(child);
                }
            }
            unlocked.sort_unstable();
            ready.extend(unlocked);
        }
        if order.len() != self.nodes.len() {
            let stuck: Vec<&str> = (0..self.nodes.len())
                .filter(|idx| !order.contains(idx))
                .map(|idx| self.nodes[idx].name.as_str())
                .collect();
            return Err(PipelineError::Graph(format!(
                "cycle between nodes: {}",
                stuck.join(", ")
            )));
        }
        Ok(order.into_iter().map(|idx| &self.nodes[idx]).collect())
    }

    /// Run every node, storing outputs in `store`.
    ///
    /// Free inputs must already be in `store`. Execution stops at the first
    /// failing node.
    pub fn run(&self, store: &mut DatasetStore) -> Result<RunReport> {
        let order = self.execution_order()?;
        if let Some(missing) = self.free_inputs().into_iter().find(|name| !store.contains(name)) {
            return Err(PipelineError::MissingDataset(missing.to_string()));
        }
        let mut report = RunReport::default();
        for node in order {
            let span = info_span!("node", name = %node.name);
            let run = span.in_scope(|| run_node(node, store))?;
            report.nodes.push(run);
        }
        info!(nodes = report.nodes.len(), "pipeline complete");
        Ok(report)
    }
}

fn run_node(node: &Node, store: &mut DatasetStore) -> Result<NodeRun> {
    let start = Instant::now();
    let inputs = node
        .inputs
        .iter()
        .map(|name| store.require(name).cloned())
        .collect::<Result<Vec<_>>>()?;
    debug!(inputs = ?node.inputs, "running node");
    let frames = node.call(&inputs)?;
    let mut outputs = Vec::with_capacity(frames.len());
    for (name, frame) in node.outputs.iter().zip(frames) {
        outputs.push(DatasetShape {
            name: name.clone(),
            rows: frame.height(),
            columns: frame.width(),
        });
        store.insert(name.clone(), frame);
    }
    let duration_ms = start.elapsed().as_millis();
    info!(outputs = ?node.outputs, duration_ms, "node complete");
    Ok(NodeRun {
        node: node.name.clone(),
        outputs,
        duration_ms,
    })
}
