use std::{cmp, ops::Range};
use unicode_segmentation::GraphemeCursor;

pub const MAX_CHUNK_SIZE: usize = if cfg!(test) { 8 } else { 64 };

/// A rope node. Children are owned through `Box`, so a subtree always has
/// exactly one parent; `split` and `concat` consume their inputs.
#[derive(Debug, Clone)]
pub enum Node {
    Branch(Branch),
    Leaf(Leaf),
}

impl Node {
    pub fn from_text(text: &str) -> Option<Box<Self>> {
        Self::build(Leaf::split_text_to_leaves(text))
    }

    // median-split the leaves so both halves differ by at most one level
    pub fn build(mut leaves: Vec<Leaf>) -> Option<Box<Self>> {
        match leaves.len() {
            0 => None,
            1 => leaves.pop().map(|leaf| Box::new(Self::Leaf(leaf))),
            len => {
                let right = leaves.split_off(len / 2);
                Self::concat(Self::build(leaves), Self::build(right))
            }
        }
    }

    /// Character count of the subtree, accumulated along the right spine.
    pub fn len(&self) -> usize {
        let mut node = self;
        let mut len = 0;
        loop {
            match node {
                Self::Branch(branch) => {
                    len += branch.weight;
                    node = &branch.right;
                }
                Self::Leaf(leaf) => return len + leaf.len(),
            }
        }
    }

    /// Number of `'\n'` in the subtree, accumulated along the right spine.
    pub fn newlines(&self) -> usize {
        let mut node = self;
        let mut count = 0;
        loop {
            match node {
                Self::Branch(branch) => {
                    count += branch.newline_weight;
                    node = &branch.right;
                }
                Self::Leaf(leaf) => return count + leaf.newlines(),
            }
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Branch(branch) => branch.height,
            Self::Leaf(_) => 1,
        }
    }

    pub fn char_at(&self, mut index: usize) -> Option<char> {
        let mut node = self;
        loop {
            match node {
                Self::Branch(branch) => {
                    if index < branch.weight {
                        node = &branch.left;
                    } else {
                        index -= branch.weight;
                        node = &branch.right;
                    }
                }
                Self::Leaf(leaf) => return leaf.char_at(index),
            }
        }
    }

    /// Count of `'\n'` among the first `index` characters.
    pub fn newlines_before(&self, mut index: usize) -> usize {
        let mut node = self;
        let mut count = 0;
        loop {
            match node {
                Self::Branch(branch) => {
                    if index <= branch.weight {
                        node = &branch.left;
                    } else {
                        count += branch.newline_weight;
                        index -= branch.weight;
                        node = &branch.right;
                    }
                }
                Self::Leaf(leaf) => return count + leaf.newlines_before(index),
            }
        }
    }

    /// Offset of the `n`th (0-based) `'\n'` in the subtree.
    pub fn find_newline(&self, mut n: usize) -> Option<usize> {
        let mut node = self;
        let mut offset = 0;
        loop {
            match node {
                Self::Branch(branch) => {
                    if n < branch.newline_weight {
                        node = &branch.left;
                    } else {
                        n -= branch.newline_weight;
                        offset += branch.weight;
                        node = &branch.right;
                    }
                }
                Self::Leaf(leaf) => return leaf.find_newline(n).map(|found| offset + found),
            }
        }
    }

    // only descends into the children the range actually touches
    pub fn write_range(&self, range: Range<usize>, buf: &mut String) {
        let mut stack = vec![(self, range)];
        while let Some((node, range)) = stack.pop() {
            if range.start >= range.end {
                continue;
            }
            match node {
                Self::Branch(branch) => {
                    let weight = branch.weight;
                    if range.end <= weight {
                        stack.push((&*branch.left, range));
                    } else if range.start >= weight {
                        stack.push((&*branch.right, range.start - weight..range.end - weight));
                    } else {
                        // right first so the left half is written first
                        stack.push((&*branch.right, 0..range.end - weight));
                        stack.push((&*branch.left, range.start..weight));
                    }
                }
                Self::Leaf(leaf) => buf.push_str(leaf.slice(range)),
            }
        }
    }

    pub fn concat(left: Option<Box<Self>>, right: Option<Box<Self>>) -> Option<Box<Self>> {
        match (left, right) {
            (None, right) => right,
            (left, None) => left,
            (Some(left), Some(right)) => Some(Self::join(left, right)),
        }
    }

    /// Join two trees whose heights may differ arbitrarily.
    ///
    /// The shorter tree is joined into the facing spine of the taller one and
    /// every branch on the way back up is rebalanced, so sibling heights never
    /// differ by more than one. A small leaf is carried down to the edge leaf
    /// and merged into it when the bytes fit in one chunk.
    fn join(mut left: Box<Self>, mut right: Box<Self>) -> Box<Self> {
        if let (Self::Leaf(a), Self::Leaf(b)) = (left.as_ref(), right.as_ref()) {
            if a.as_str().len() + b.as_str().len() <= MAX_CHUNK_SIZE {
                return Box::new(Self::Leaf(a.merge(b)));
            }
        }

        let (left_height, right_height) = (left.height(), right.height());
        if left_height > right_height + 1 || (left_height > 1 && right.is_small_leaf()) {
            match left.into_children() {
                Ok((left_left, left_right)) => {
                    return Self::balance(left_left, Self::join(left_right, right));
                }
                Err(node) => left = node,
            }
        } else if right_height > left_height + 1 || (right_height > 1 && left.is_small_leaf()) {
            match right.into_children() {
                Ok((right_left, right_right)) => {
                    return Self::balance(Self::join(left, right_left), right_right);
                }
                Err(node) => right = node,
            }
        }
        Self::branch(left, right)
    }

    // children are balanced and their heights differ by at most two
    fn balance(left: Box<Self>, right: Box<Self>) -> Box<Self> {
        let (left_height, right_height) = (left.height(), right.height());
        if right_height > left_height + 1 {
            match right.into_children() {
                Ok((inner, outer)) if inner.height() > outer.height() => {
                    match inner.into_children() {
                        Ok((inner_left, inner_right)) => Self::branch(
                            Self::branch(left, inner_left),
                            Self::branch(inner_right, outer),
                        ),
                        Err(inner) => Self::branch(Self::branch(left, inner), outer),
                    }
                }
                Ok((inner, outer)) => Self::branch(Self::branch(left, inner), outer),
                Err(right) => Self::branch(left, right),
            }
        } else if left_height > right_height + 1 {
            match left.into_children() {
                Ok((outer, inner)) if inner.height() > outer.height() => {
                    match inner.into_children() {
                        Ok((inner_left, inner_right)) => Self::branch(
                            Self::branch(outer, inner_left),
                            Self::branch(inner_right, right),
                        ),
                        Err(inner) => Self::branch(outer, Self::branch(inner, right)),
                    }
                }
                Ok((outer, inner)) => Self::branch(outer, Self::branch(inner, right)),
                Err(left) => Self::branch(left, right),
            }
        } else {
            Self::branch(left, right)
        }
    }

    // weight is the length of the *whole* new left subtree, not of one of its children
    fn branch(left: Box<Self>, right: Box<Self>) -> Box<Self> {
        let weight = left.len();
        let newline_weight = left.newlines();
        let height = cmp::max(left.height(), right.height()) + 1;
        Box::new(Self::Branch(Branch {
            left,
            right,
            weight,
            newline_weight,
            height,
        }))
    }

    pub(crate) fn into_children(self: Box<Self>) -> Result<(Box<Self>, Box<Self>), Box<Self>> {
        match *self {
            Self::Branch(Branch { left, right, .. }) => Ok((left, right)),
            leaf => Err(Box::new(leaf)),
        }
    }

    fn is_small_leaf(&self) -> bool {
        matches!(self, Self::Leaf(leaf) if leaf.as_str().len() < MAX_CHUNK_SIZE)
    }

    /// Partition `node` into `[0, index)` and `[index, len)`.
    ///
    /// A cut that lands exactly on a branch's weight hands back the two
    /// children untouched: the whole left child goes left, the right child
    /// goes right.
    pub fn split(node: Box<Self>, index: usize) -> (Option<Box<Self>>, Option<Box<Self>>) {
        if index == 0 {
            return (None, Some(node));
        }
        match *node {
            Self::Leaf(leaf) => {
                if index >= leaf.len() {
                    return (Some(Box::new(Self::Leaf(leaf))), None);
                }
                let (left, right) = leaf.split(index);
                (
                    Some(Box::new(Self::Leaf(left))),
                    Some(Box::new(Self::Leaf(right))),
                )
            }
            Self::Branch(Branch {
                left,
                right,
                weight,
                ..
            }) => {
                if index == weight {
                    (Some(left), Some(right))
                } else if index < weight {
                    let (left_left, left_right) = Self::split(left, index);
                    (left_left, Self::concat(left_right, Some(right)))
                } else {
                    let (right_left, right_right) = Self::split(right, index - weight);
                    (Self::concat(Some(left), right_left), right_right)
                }
            }
        }
    }

    // Just a helper to verify the cached weights and heights against the real subtrees
    #[cfg(test)]
    pub fn check_weights(&self) -> Result<(), String> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let Self::Branch(branch) = node else {
                continue;
            };
            if branch.weight != branch.left.len() {
                return Err(format!(
                    "weight {} does not match left length {}",
                    branch.weight,
                    branch.left.len()
                ));
            }
            if branch.newline_weight != branch.left.newlines() {
                return Err(format!(
                    "newline weight {} does not match left newlines {}",
                    branch.newline_weight,
                    branch.left.newlines()
                ));
            }
            let (left, right) = (branch.left.height(), branch.right.height());
            if branch.height != cmp::max(left, right) + 1 || left.abs_diff(right) > 1 {
                return Err(format!(
                    "branch of height {} has children of heights {left} and {right}",
                    branch.height
                ));
            }
            stack.push(&*branch.right);
            stack.push(&*branch.left);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Branch {
    left: Box<Node>,
    right: Box<Node>,
    weight: usize,
    newline_weight: usize,
    height: usize,
}

impl Branch {
    pub fn left(&self) -> &Node {
        &self.left
    }

    pub fn right(&self) -> &Node {
        &self.right
    }
}

#[derive(Debug, Clone)]
pub struct Leaf {
    chunk: String,
    len: usize,
    newlines: usize,
}

impl From<&str> for Leaf {
    fn from(value: &str) -> Self {
        Leaf::from(value.to_owned())
    }
}

impl From<String> for Leaf {
    fn from(chunk: String) -> Self {
        let len = chunk.chars().count();
        let newlines = chunk.bytes().filter(|&byte| byte == b'\n').count();
        Leaf {
            chunk,
            len,
            newlines,
        }
    }
}

impl Leaf {
    pub fn as_str(&self) -> &str {
        &self.chunk
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn newlines(&self) -> usize {
        self.newlines
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.chunk
            .char_indices()
            .nth(index)
            .map_or(self.chunk.len(), |(offset, _)| offset)
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chunk.chars().nth(index)
    }

    pub fn newlines_before(&self, index: usize) -> usize {
        self.chunk
            .chars()
            .take(index)
            .filter(|&c| c == '\n')
            .count()
    }

    pub fn find_newline(&self, n: usize) -> Option<usize> {
        self.chunk
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == '\n')
            .nth(n)
            .map(|(index, _)| index)
    }

    pub fn slice(&self, range: Range<usize>) -> &str {
        &self.chunk[self.byte_offset(range.start)..self.byte_offset(range.end)]
    }

    pub fn split(self, index: usize) -> (Leaf, Leaf) {
        let at = self.byte_offset(index);
        let mut left = self.chunk;
        let right = left.split_off(at);
        (Leaf::from(left), Leaf::from(right))
    }

    fn merge(&self, other: &Leaf) -> Leaf {
        let mut chunk = String::with_capacity(self.chunk.len() + other.chunk.len());
        chunk.push_str(&self.chunk);
        chunk.push_str(&other.chunk);
        Leaf {
            chunk,
            len: self.len + other.len,
            newlines: self.newlines + other.newlines,
        }
    }

    // cut on grapheme boundaries so a leaf never starts mid-cluster
    pub fn split_text_to_leaves(text: &str) -> Vec<Leaf> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut leaves = Vec::new();
        let mut cursor = GraphemeCursor::new(0, text.len(), true);

        let num_split = text.len().div_ceil(MAX_CHUNK_SIZE);
        let chunk_size = text.len().div_ceil(num_split);

        while cursor.cur_cursor() < text.len() {
            let start = cursor.cur_cursor();
            cursor.set_cursor(cmp::min(start + chunk_size, text.len()));

            while !text.is_char_boundary(cursor.cur_cursor())
                || !cursor.is_boundary(text, 0).unwrap_or(false)
            {
                cursor.set_cursor(cursor.cur_cursor() + 1);
            }

            leaves.push(Leaf::from(&text[start..cursor.cur_cursor()]));
        }
        leaves
    }
}
