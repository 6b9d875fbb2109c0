//! Scope paths: the addressing chain locating a collection of documents.
//!
//! Both trees share the same three-level shape:
//!
//! ```text
//! users/{user}/catalogs/{catalog}/items/{item}/attributes/{attribute}
//! public/catalogs/{catalog}/items/{item}/attributes/{attribute}
//! ```
//!
//! A `ScopePath` names one of the collections above (the part before the
//! final `/{id}`), so a document is addressed by `(scope, id)`.

use crate::{DocumentId, Error, Result, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tree a document lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "tree", content = "owner")]
pub enum Tree {
    /// The private tree owned by a single user.
    Private(UserId),
    /// The shared public mirror tree.
    Public,
}

impl Tree {
    /// Returns true for the public mirror tree.
    pub fn is_public(&self) -> bool {
        matches!(self, Tree::Public)
    }
}

/// Depth of a collection within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Catalog,
    Item,
    Attribute,
}

impl Level {
    /// Collection segment used when rendering paths.
    pub fn collection_name(&self) -> &'static str {
        match self {
            Level::Catalog => "catalogs",
            Level::Item => "items",
            Level::Attribute => "attributes",
        }
    }

    /// The level below this one, if any.
    pub fn child(&self) -> Option<Level> {
        match self {
            Level::Catalog => Some(Level::Item),
            Level::Item => Some(Level::Attribute),
            Level::Attribute => None,
        }
    }

    fn from_depth(depth: usize) -> Option<Level> {
        match depth {
            0 => Some(Level::Catalog),
            1 => Some(Level::Item),
            2 => Some(Level::Attribute),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Catalog => "catalog",
            Level::Item => "item",
            Level::Attribute => "attribute",
        };
        f.write_str(name)
    }
}

/// Tree plus the chain of ancestor document ids naming one collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopePath {
    tree: Tree,
    ancestors: Vec<DocumentId>,
}

impl ScopePath {
    /// The catalog collection of a tree.
    pub fn catalogs(tree: Tree) -> Self {
        Self {
            tree,
            ancestors: Vec::new(),
        }
    }

    /// The items collection under a catalog.
    pub fn items(tree: Tree, catalog: DocumentId) -> Self {
        Self {
            tree,
            ancestors: vec![catalog],
        }
    }

    /// The attributes collection under an item.
    pub fn attributes(tree: Tree, catalog: DocumentId, item: DocumentId) -> Self {
        Self {
            tree,
            ancestors: vec![catalog, item],
        }
    }

    /// Builds a scope from a raw ancestor chain, rejecting chains deeper
    /// than the attribute level.
    pub fn from_parts(tree: Tree, ancestors: Vec<DocumentId>) -> Result<Self> {
        if Level::from_depth(ancestors.len()).is_none() {
            return Err(Error::InvalidScope(format!(
                "{} ancestors is deeper than the attribute level",
                ancestors.len()
            )));
        }
        Ok(Self { tree, ancestors })
    }

    /// The tree this scope belongs to.
    pub fn tree(&self) -> Tree {
        self.tree
    }

    /// Shorthand for `self.tree().is_public()`.
    pub fn is_public(&self) -> bool {
        self.tree.is_public()
    }

    /// Ancestor ids, outermost first.
    pub fn ancestors(&self) -> &[DocumentId] {
        &self.ancestors
    }

    /// Level of the documents held by this collection.
    pub fn level(&self) -> Level {
        // Constructors never produce more than two ancestors.
        Level::from_depth(self.ancestors.len()).unwrap_or(Level::Attribute)
    }

    /// The collection nested under document `id` of this collection.
    pub fn child(&self, id: DocumentId) -> Result<Self> {
        if self.level().child().is_none() {
            return Err(Error::InvalidScope(format!(
                "attributes have no child collection ({self})"
            )));
        }
        let mut ancestors = self.ancestors.clone();
        ancestors.push(id);
        Ok(Self {
            tree: self.tree,
            ancestors,
        })
    }

    /// The collection holding this collection's parent document, together
    /// with that document's id. `None` for catalog collections.
    pub fn parent(&self) -> Option<(ScopePath, DocumentId)> {
        let (last, rest) = self.ancestors.split_last()?;
        Some((
            Self {
                tree: self.tree,
                ancestors: rest.to_vec(),
            },
            *last,
        ))
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tree {
            Tree::Private(user) => write!(f, "users/{user}")?,
            Tree::Public => f.write_str("public")?,
        }
        let mut level = Level::Catalog;
        for id in &self.ancestors {
            write!(f, "/{}/{id}", level.collection_name())?;
            level = level.child().unwrap_or(Level::Attribute);
        }
        write!(f, "/{}", level.collection_name())
    }
}
