//! # Transactions
//!
//! An ordered, replayable edit script over a base document. The only step
//! kind is [`ReplaceStep`]: replace the range `from..to` with a list of nodes
//! sharing one parent.
//!
//! ## Design
//!
//! - Steps are applied eagerly; a failing step leaves the transaction as it was
//! - `doc_before` plus `steps` always reproduces `doc`
//! - The selection is mapped through every step
//! - `time` is a logical timestamp advanced whenever a transaction is
//!   cloned to be returned as a changed copy

use crate::error::TransformError;
use crate::node::Node;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// Replace `from..to` with `content`
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceStep {
    pub from: usize,
    pub to: usize,
    pub content: Vec<Node>,
}

impl ReplaceStep {
    pub fn apply(&self, doc: &Node) -> Result<Node, TransformError> {
        doc.replace(self.from, self.to, self.content.clone())
    }

    pub fn map(&self) -> StepMap {
        StepMap {
            start: self.from,
            old_size: self.to - self.from,
            new_size: self.content.iter().map(Node::node_size).sum(),
        }
    }
}

/// Position mapping of a single replace step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMap {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl StepMap {
    /// Map a position from before the step to after it.
    ///
    /// Positions strictly inside the replaced range stay where they are
    /// when the replacement has the same size, otherwise they move past the
    /// inserted content.
    pub fn map(&self, pos: usize) -> usize {
        if self.old_size == 0 {
            return if pos < self.start { pos } else { pos + self.new_size };
        }
        let end = self.start + self.old_size;
        if pos <= self.start {
            pos
        } else if pos >= end {
            pos + self.new_size - self.old_size
        } else if self.new_size == self.old_size {
            pos
        } else {
            self.start + self.new_size
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    doc_before: Node,
    doc: Node,
    steps: Vec<ReplaceStep>,
    selection: Selection,
    time: u64,
}

impl Transaction {
    /// Start a transaction with the cursor at the start of the document
    pub fn new(doc: Node) -> Self {
        let selection = Selection::at_start(&doc);
        Self {
            doc_before: doc.clone(),
            doc,
            steps: Vec::new(),
            selection,
            time: 0,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn doc_before(&self) -> &Node {
        &self.doc_before
    }

    pub fn steps(&self) -> &[ReplaceStep] {
        &self.steps
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn set_time(&mut self, time: u64) -> &mut Self {
        self.time = time;
        self
    }

    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = selection;
        self
    }

    /// Replace `from..to` with `content` as one step
    pub fn replace_with(
        &mut self,
        from: usize,
        to: usize,
        content: Vec<Node>,
    ) -> Result<&mut Self, TransformError> {
        let step = ReplaceStep { from, to, content };
        let doc = step.apply(&self.doc)?;
        self.selection = self.selection.map(&step.map(), &doc);
        self.doc = doc;
        self.steps.push(step);
        Ok(self)
    }

    pub fn insert(&mut self, pos: usize, content: Vec<Node>) -> Result<&mut Self, TransformError> {
        self.replace_with(pos, pos, content)
    }

    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, TransformError> {
        self.replace_with(from, to, Vec::new())
    }

    /// Replay all steps against `doc_before`
    pub fn replay(&self) -> Result<Node, TransformError> {
        self.steps
            .iter()
            .try_fold(self.doc_before.clone(), |doc, step| step.apply(&doc))
    }
}
