//! Newick species tree: parse, write, unroot, prune.

use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use crate::error::Error;

/// One node of the species tree. Leaves carry species identifiers; internal
/// nodes may be unnamed.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub dist: Option<f64>,
    pub children: Vec<Node>,
}

impl Node {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An immutable species tree loaded from a Newick file.
///
/// Pruning always operates on a fresh copy; the source tree is never mutated
/// after the one-time unroot.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTree {
    root: Node,
}

impl SpeciesTree {
    /// Parses a Newick string.
    pub fn from_newick(text: &str) -> Result<Self, Error> {
        let mut chars = text.chars().peekable();
        let root = parse_node(&mut chars)?;
        skip_whitespace(&mut chars);
        match chars.next() {
            Some(';') | None => {}
            Some(c) => {
                return Err(Error::Parse(format!(
                    "unexpected character '{c}' after Newick tree"
                )));
            }
        }
        Ok(Self { root })
    }

    /// Loads a Newick file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::from_newick(text.trim())
    }

    /// Serializes back to Newick notation, terminated by `;`.
    #[must_use]
    pub fn to_newick(&self) -> String {
        let mut out = String::new();
        write_node(&self.root, &mut out);
        out.push(';');
        out
    }

    /// Writes the Newick serialization to a file, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, format!("{}\n", self.to_newick()))?;
        Ok(())
    }

    /// Leaf names in tree order.
    #[must_use]
    pub fn leaf_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_leaves(&self.root, &mut names);
        names
    }

    /// Converts a rooted (bifurcating at the root) tree into its unrooted
    /// form: one internal child of the root is collapsed into the root, its
    /// branch length added onto its children. Codon-model tools expect
    /// unrooted trees. A no-op when the root already has more than two
    /// children.
    pub fn unroot(&mut self) -> Result<(), Error> {
        if self.root.children.len() != 2 {
            return Ok(());
        }
        let internal_idx = self
            .root
            .children
            .iter()
            .position(|c| !c.is_leaf())
            .ok_or_else(|| {
                Error::Validation("cannot unroot a tree with only two leaves".to_string())
            })?;
        let collapsed = self.root.children.remove(internal_idx);
        let extra = collapsed.dist.unwrap_or(0.0);
        for mut child in collapsed.children {
            if extra != 0.0 {
                child.dist = Some(child.dist.unwrap_or(0.0) + extra);
            }
            self.root.children.push(child);
        }
        Ok(())
    }

    /// Produces a copy of the tree restricted to exactly the given leaves.
    ///
    /// Internal nodes left with a single child are collapsed, summing branch
    /// lengths. A requested species that is not a leaf of this tree yields
    /// [`Error::MissingTreeLeaf`].
    pub fn prune(&self, keep: &[String]) -> Result<Self, Error> {
        let leaves = self.leaf_names();
        for species in keep {
            if !leaves.contains(species) {
                return Err(Error::MissingTreeLeaf(species.clone()));
            }
        }
        let kept: std::collections::HashSet<&str> = keep.iter().map(String::as_str).collect();
        let root = retain(&self.root, &kept).ok_or_else(|| {
            Error::Validation("pruning removed every leaf from the tree".to_string())
        })?;
        Ok(Self { root })
    }
}

fn collect_leaves(node: &Node, names: &mut Vec<String>) {
    if node.is_leaf() {
        names.push(node.name.clone());
        return;
    }
    for child in &node.children {
        collect_leaves(child, names);
    }
}

fn retain(node: &Node, kept: &std::collections::HashSet<&str>) -> Option<Node> {
    if node.is_leaf() {
        return kept.contains(node.name.as_str()).then(|| node.clone());
    }
    let children: Vec<Node> = node
        .children
        .iter()
        .filter_map(|c| retain(c, kept))
        .collect();
    match children.len() {
        0 => None,
        1 => {
            // Collapse the unary node, summing branch lengths
            let mut child = children.into_iter().next().unwrap();
            child.dist = match (node.dist, child.dist) {
                (Some(a), Some(b)) => Some(a + b),
                (a, b) => a.or(b),
            };
            Some(child)
        }
        _ => Some(Node {
            name: node.name.clone(),
            dist: node.dist,
            children,
        }),
    }
}

fn write_node(node: &Node, out: &mut String) {
    if !node.is_leaf() {
        out.push('(');
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_node(child, out);
        }
        out.push(')');
    }
    out.push_str(&node.name);
    if let Some(dist) = node.dist {
        out.push(':');
        out.push_str(&format_dist(dist));
    }
}

fn format_dist(dist: f64) -> String {
    // Shortest round-trip representation keeps output deterministic
    format!("{dist}")
}

fn skip_whitespace(chars: &mut Peekable<Chars>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn parse_node(chars: &mut Peekable<Chars>) -> Result<Node, Error> {
    skip_whitespace(chars);
    let mut children = Vec::new();

    if chars.peek() == Some(&'(') {
        chars.next();
        loop {
            children.push(parse_node(chars)?);
            skip_whitespace(chars);
            match chars.next() {
                Some(',') => {}
                Some(')') => break,
                other => {
                    return Err(Error::Parse(format!(
                        "expected ',' or ')' in Newick tree, found {other:?}"
                    )));
                }
            }
        }
        if children.len() < 2 {
            return Err(Error::Parse(
                "Newick internal node has fewer than two children".to_string(),
            ));
        }
    }

    skip_whitespace(chars);
    let name = parse_label(chars);
    if children.is_empty() && name.is_empty() {
        return Err(Error::Parse("unnamed leaf in Newick tree".to_string()));
    }

    let dist = if chars.peek() == Some(&':') {
        chars.next();
        Some(parse_dist(chars)?)
    } else {
        None
    };

    Ok(Node {
        name,
        dist,
        children,
    })
}

fn parse_label(chars: &mut Peekable<Chars>) -> String {
    let mut label = String::new();
    while let Some(&c) = chars.peek() {
        if matches!(c, '(' | ')' | ',' | ':' | ';') || c.is_whitespace() {
            break;
        }
        label.push(c);
        chars.next();
    }
    label
}

fn parse_dist(chars: &mut Peekable<Chars>) -> Result<f64, Error> {
    let mut text = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }
    text.parse()
        .map_err(|e| Error::Parse(format!("invalid branch length '{text}': {e}")))
}
