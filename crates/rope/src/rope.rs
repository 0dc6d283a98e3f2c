mod node;

pub use node::MAX_CHUNK_SIZE;

use node::{Leaf, Node};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// A binary rope over `char`-indexed text.
///
/// Every edit is a split followed by concatenations of owned subtrees.
/// Arguments are validated before the root is taken, so a failed call leaves
/// the rope untouched.
#[derive(Debug, Clone, Default)]
pub struct Rope {
    root: Option<Box<Node>>,
}

impl Rope {
    pub fn new() -> Self {
        Rope { root: None }
    }

    /// Build a balanced rope from consecutive pieces of text.
    pub fn from_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let leaves = chunks
            .into_iter()
            .flat_map(|chunk| Leaf::split_text_to_leaves(chunk.as_ref()))
            .collect();
        Rope {
            root: Node::build(leaves),
        }
    }

    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.len())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height())
    }

    pub fn newline_count(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.newlines())
    }

    /// Number of lines; an empty rope has one empty line.
    pub fn line_count(&self) -> usize {
        self.newline_count() + 1
    }

    pub fn index(&self, index: usize) -> Result<char, RopeError> {
        let len = self.len();
        if index >= len {
            return Err(RopeError::OutOfRange { index, len });
        }
        self.root
            .as_ref()
            .and_then(|root| root.char_at(index))
            .ok_or(RopeError::OutOfRange { index, len })
    }

    pub fn insert(&mut self, index: usize, text: &str) -> Result<(), RopeError> {
        let len = self.len();
        if index > len {
            return Err(RopeError::OutOfRange { index, len });
        }
        if text.is_empty() {
            return Ok(());
        }
        let (left, right) = self.split_root(index);
        self.root = Node::concat(Node::concat(left, Node::from_text(text)), right);
        Ok(())
    }

    /// Remove the characters in `range`. A reversed range or one reaching past
    /// the end fails with [`RopeError::InvalidRange`].
    pub fn remove(&mut self, range: Range<usize>) -> Result<(), RopeError> {
        self.check_range(&range)?;
        if range.start == range.end {
            return Ok(());
        }
        let (left, rest) = self.split_root(range.start);
        let right = rest.and_then(|rest| Node::split(rest, range.end - range.start).1);
        self.root = Node::concat(left, right);
        Ok(())
    }

    /// Copy of the characters in `range`; bad ranges fail with
    /// [`RopeError::InvalidRange`] as in [`Rope::remove`].
    pub fn substring(&self, range: Range<usize>) -> Result<String, RopeError> {
        self.check_range(&range)?;
        let mut buf = String::with_capacity(range.end - range.start);
        if let Some(root) = &self.root {
            root.write_range(range, &mut buf);
        }
        Ok(buf)
    }

    /// Offset of the first character of line `line`.
    pub fn line_start(&self, line: usize) -> Result<usize, RopeError> {
        if line == 0 {
            return Ok(0);
        }
        self.root
            .as_ref()
            .and_then(|root| root.find_newline(line - 1))
            .map(|newline| newline + 1)
            .ok_or(RopeError::LineOutOfRange {
                line,
                lines: self.line_count(),
            })
    }

    /// Number of `'\n'` strictly before `offset`, which is also the line
    /// `offset` sits on.
    pub fn newlines_before(&self, offset: usize) -> Result<usize, RopeError> {
        let len = self.len();
        if offset > len {
            return Err(RopeError::OutOfRange { index: offset, len });
        }
        Ok(self
            .root
            .as_ref()
            .map_or(0, |root| root.newlines_before(offset)))
    }

    /// Rebuild the tree with minimal depth. Text is unchanged.
    pub fn rebalance(&mut self) {
        let before = self.height();
        let text = self.to_string();
        self.root = Node::from_text(&text);
        tracing::trace!(before, after = self.height(), len = text.len(), "rebalanced rope");
    }

    /// In-order iterator over the leaf fragments.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    fn split_root(&mut self, index: usize) -> (Option<Box<Node>>, Option<Box<Node>>) {
        match self.root.take() {
            Some(root) => Node::split(root, index),
            None => (None, None),
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), RopeError> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(RopeError::InvalidRange {
                range: range.clone(),
                len,
            });
        }
        Ok(())
    }
}

// tear the tree down with an explicit stack instead of recursing per level
impl Drop for Rope {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(node) = stack.pop() {
            if let Ok((left, right)) = node.into_children() {
                stack.push(left);
                stack.push(right);
            }
        }
    }
}

impl From<&str> for Rope {
    fn from(text: &str) -> Self {
        Rope {
            root: Node::from_text(text),
        }
    }
}

impl From<String> for Rope {
    fn from(text: String) -> Self {
        Rope::from(text.as_str())
    }
}

impl fmt::Display for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl PartialEq for Rope {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .chunks()
                .flat_map(str::chars)
                .eq(other.chunks().flat_map(str::chars))
    }
}

impl Eq for Rope {}

pub struct Chunks<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Branch(branch) => {
                    self.stack.push(branch.right());
                    self.stack.push(branch.left());
                }
                Node::Leaf(leaf) => return Some(leaf.as_str()),
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RopeError {
    #[error("index {index} is out of bounds for a rope of length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("line {line} is out of bounds for a rope of {lines} lines")]
    LineOutOfRange { line: usize, lines: usize },
    #[error("range {range:?} is invalid for a rope of length {len}")]
    InvalidRange { range: Range<usize>, len: usize },
}
