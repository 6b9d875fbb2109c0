//! Cascading deletes across both trees.
//!
//! A delete first builds a [`DeletePlan`]: an arena holding the target node
//! and every private descendant, each with its link and the public scope its
//! mirror lives in. The plan is then walked depth-first, children before
//! parents. At each node the private document goes first; the linked public
//! subtree follows on a best-effort basis.
//!
//! Private failures abort the walk. Everything already deleted stays
//! deleted, and re-running the same request finishes the job.

use crate::error::MirrorResult;
use crate::linker::IdentifierLinker;
use crate::policy::{classify, ConsistencyPolicy, ErrorClass};
use curio_model::Document;
use curio_storage::{EntityStore, StoreError};
use curio_types::{DocumentId, ScopePath, Tree, UserId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A public delete that failed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicFailure {
    pub scope: String,
    pub id: DocumentId,
    pub class: ErrorClass,
    pub message: String,
}

/// What a cascade did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// Private documents removed by this call.
    pub private_deleted: usize,
    /// Public documents removed by this call.
    pub public_deleted: usize,
    /// Documents that were already gone.
    pub already_absent: usize,
    /// Links cleared (unpublish only).
    pub links_cleared: usize,
    /// Public deletes that failed and were skipped.
    pub public_failures: Vec<PublicFailure>,
}

impl CascadeReport {
    /// True if every linked mirror was removed.
    pub fn is_clean(&self) -> bool {
        self.public_failures.is_empty()
    }

    fn record_public_failure(&mut self, scope: &ScopePath, id: DocumentId, err: &StoreError) {
        let scope = scope.to_string();
        // A sweep may retry a mirror its own node already failed on.
        if self.public_failures.iter().any(|f| f.id == id && f.scope == scope) {
            return;
        }
        warn!("Public delete of {}/{} failed, continuing: {}", scope, id, err);
        self.public_failures.push(PublicFailure {
            scope,
            id,
            class: classify(err),
            message: err.to_string(),
        });
    }
}

#[derive(Debug)]
struct PlanNode {
    scope: ScopePath,
    id: DocumentId,
    link: Option<DocumentId>,
    /// Public collection the node's mirror lives in, when its parent is linked.
    public_scope: Option<ScopePath>,
    children: Vec<usize>,
}

impl PlanNode {
    fn new(scope: ScopePath, doc: &Document, public_scope: Option<ScopePath>) -> Self {
        Self {
            scope,
            id: doc.id,
            link: IdentifierLinker::link_of(doc),
            public_scope,
            children: Vec::new(),
        }
    }

    /// Where the mirror of this node's children lives.
    fn child_public_scope(&self) -> Option<ScopePath> {
        let link = self.link?;
        self.public_scope.as_ref()?.child(link).ok()
    }
}

/// Arena of the private subtree below (and including) a delete target.
#[derive(Debug)]
struct DeletePlan {
    nodes: Vec<PlanNode>,
}

impl DeletePlan {
    /// Lists the private tree level by level starting at `root`.
    async fn build(store: &dyn EntityStore, root: PlanNode) -> MirrorResult<Self> {
        let mut plan = Self { nodes: vec![root] };
        let mut next = 0;
        while next < plan.nodes.len() {
            let node = &plan.nodes[next];
            if node.scope.level().child().is_some() {
                let child_scope = node.scope.child(node.id)?;
                let child_public = node.child_public_scope();
                let docs = store.list(&child_scope).await?;
                for doc in &docs {
                    let index = plan.nodes.len();
                    plan.nodes
                        .push(PlanNode::new(child_scope.clone(), doc, child_public.clone()));
                    plan.nodes[next].children.push(index);
                }
            }
            next += 1;
        }
        Ok(plan)
    }

    /// Node indices, every child before its parent, siblings in list order.
    fn post_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0, false)];
        while let Some((index, expanded)) = stack.pop() {
            if expanded {
                order.push(index);
                continue;
            }
            stack.push((index, true));
            for &child in self.nodes[index].children.iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }
}

/// What happens to each node of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CascadeMode {
    /// Remove private documents and their mirrors.
    Delete,
    /// Remove mirrors only and clear the links (unpublish).
    Retract,
}

/// One public document visited by a subtree delete.
#[derive(Debug)]
struct SweepFrame {
    scope: ScopePath,
    id: DocumentId,
    parent: Option<usize>,
    /// Children have been listed and pushed.
    expanded: bool,
    /// A child could not be removed.
    blocked: bool,
}

impl SweepFrame {
    fn new(scope: ScopePath, id: DocumentId, parent: Option<usize>) -> Self {
        Self {
            scope,
            id,
            parent,
            expanded: false,
            blocked: false,
        }
    }
}

fn block(frames: &mut [SweepFrame], parent: Option<usize>) {
    if let Some(parent) = parent {
        frames[parent].blocked = true;
    }
}

/// Deletes catalogs, items and attributes together with their mirrors.
#[derive(Clone)]
pub struct CascadeDeleter {
    store: Arc<dyn EntityStore>,
    linker: IdentifierLinker,
    policy: ConsistencyPolicy,
}

impl CascadeDeleter {
    pub fn new(store: Arc<dyn EntityStore>, policy: ConsistencyPolicy) -> Self {
        Self {
            linker: IdentifierLinker::new(store.clone()),
            store,
            policy,
        }
    }

    // ── Private entry points ─────────────────────────────────────

    /// Deletes a catalog, all its items and attributes, and their mirrors.
    pub async fn delete_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<CascadeReport> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        self.run(scope, catalog_id, CascadeMode::Delete).await
    }

    /// Deletes an item, its attributes, and their mirrors.
    pub async fn delete_item(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
    ) -> MirrorResult<CascadeReport> {
        let scope = ScopePath::items(Tree::Private(owner), catalog_id);
        self.run(scope, item_id, CascadeMode::Delete).await
    }

    /// Deletes one attribute and its mirror.
    pub async fn delete_attribute(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        attribute_id: DocumentId,
    ) -> MirrorResult<CascadeReport> {
        let scope = ScopePath::attributes(Tree::Private(owner), catalog_id, item_id);
        self.run(scope, attribute_id, CascadeMode::Delete).await
    }

    /// Removes every mirror below and including a catalog and clears the
    /// links whose mirror is confirmed gone. Private content is kept.
    pub async fn retract_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<CascadeReport> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        self.run(scope, catalog_id, CascadeMode::Retract).await
    }

    // ── Public entry points ──────────────────────────────────────

    /// Deletes a public catalog and its public descendants.
    pub async fn delete_public_catalog(&self, public_catalog_id: DocumentId) -> CascadeReport {
        let mut report = CascadeReport::default();
        self.delete_public_subtree(
            &ScopePath::catalogs(Tree::Public),
            public_catalog_id,
            &mut report,
        )
        .await;
        report
    }

    /// Deletes public items (and their public attributes) of a public catalog.
    pub async fn delete_public_items(
        &self,
        public_catalog_id: DocumentId,
        public_item_ids: &[DocumentId],
    ) -> CascadeReport {
        let scope = ScopePath::items(Tree::Public, public_catalog_id);
        let mut report = CascadeReport::default();
        for &id in public_item_ids {
            self.delete_public_subtree(&scope, id, &mut report).await;
        }
        report
    }

    /// Deletes public attributes of a public item.
    pub async fn delete_public_attributes(
        &self,
        public_catalog_id: DocumentId,
        public_item_id: DocumentId,
        public_attribute_ids: &[DocumentId],
    ) -> CascadeReport {
        let scope = ScopePath::attributes(Tree::Public, public_catalog_id, public_item_id);
        let mut report = CascadeReport::default();
        for &id in public_attribute_ids {
            self.delete_public_subtree(&scope, id, &mut report).await;
        }
        report
    }

    // ── Walk ─────────────────────────────────────────────────────

    async fn run(&self, scope: ScopePath, id: DocumentId, mode: CascadeMode) -> MirrorResult<CascadeReport> {
        let mut report = CascadeReport::default();

        let root = match self.store.get(&scope, id).await {
            Ok(doc) => doc,
            Err(err) if self.policy.counts_as_deleted(&err) => {
                debug!("Cascade root {}/{} already gone", scope, id);
                report.already_absent += 1;
                return Ok(report);
            }
            Err(err) => return Err(err.into()),
        };

        // A private ancestor vanishing mid-way only costs us the mirror cleanup.
        let public_scope = match self.linker.resolve_public_scope(&scope).await {
            Ok(resolved) => resolved.linked(),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err),
        };

        let plan = DeletePlan::build(self.store.as_ref(), PlanNode::new(scope, &root, public_scope)).await?;
        for index in plan.post_order() {
            let node = &plan.nodes[index];
            match mode {
                CascadeMode::Delete => self.delete_node(node, &mut report).await?,
                CascadeMode::Retract => self.retract_node(node, &mut report).await,
            }
        }

        info!(
            "Cascade {:?} at {}/{}: {} private, {} public deleted, {} public failures",
            mode,
            plan.nodes[0].scope,
            id,
            report.private_deleted,
            report.public_deleted,
            report.public_failures.len()
        );
        Ok(report)
    }

    async fn delete_node(&self, node: &PlanNode, report: &mut CascadeReport) -> MirrorResult<()> {
        match self.store.delete(&node.scope, node.id).await {
            Ok(()) => report.private_deleted += 1,
            Err(err) if self.policy.counts_as_deleted(&err) => report.already_absent += 1,
            Err(err) => return Err(err.into()),
        }
        self.delete_mirror_of(node, report).await;
        Ok(())
    }

    async fn retract_node(&self, node: &PlanNode, report: &mut CascadeReport) {
        if node.link.is_none() {
            return;
        }
        let failures_before = report.public_failures.len();
        self.delete_mirror_of(node, report).await;
        if report.public_failures.len() != failures_before {
            // Keep the link so a later retry still knows where the mirror is.
            return;
        }
        match self.linker.clear_link(&node.scope, node.id).await {
            Ok(()) => report.links_cleared += 1,
            Err(err) => warn!("Could not clear link of {}/{}: {}", node.scope, node.id, err),
        }
    }

    async fn delete_mirror_of(&self, node: &PlanNode, report: &mut CascadeReport) {
        let Some(link) = node.link else {
            return;
        };
        match &node.public_scope {
            Some(public_scope) => self.delete_public_subtree(public_scope, link, report).await,
            None => warn!(
                "{}/{} links to {} but its parent has no mirror; leaving it",
                node.scope, node.id, link
            ),
        }
    }

    /// Best-effort removal of a public document and, when sweeping, any
    /// public children still under it. Never fails; problems are recorded.
    ///
    /// A document whose children could not all be removed is kept, so no
    /// public child outlives its public parent.
    async fn delete_public_subtree(&self, scope: &ScopePath, id: DocumentId, report: &mut CascadeReport) {
        let mut frames = vec![SweepFrame::new(scope.clone(), id, None)];
        let mut stack = vec![0];
        while let Some(index) = stack.pop() {
            let frame = &frames[index];
            let parent = frame.parent;

            if !frame.expanded && frame.scope.level().child().is_some() && self.policy.sweep_public_orphans {
                let Ok(child_scope) = frame.scope.child(frame.id) else {
                    continue;
                };
                match self.store.list(&child_scope).await {
                    Ok(children) => {
                        frames[index].expanded = true;
                        stack.push(index);
                        for child in children {
                            stack.push(frames.len());
                            frames.push(SweepFrame::new(child_scope.clone(), child.id, Some(index)));
                        }
                    }
                    Err(err) => {
                        let frame = &frames[index];
                        report.record_public_failure(&frame.scope, frame.id, &err);
                        block(&mut frames, parent);
                    }
                }
                continue;
            }

            if frame.blocked {
                debug!("Keeping mirror {}/{}: children remain", frame.scope, frame.id);
                block(&mut frames, parent);
                continue;
            }

            match self.store.delete(&frame.scope, frame.id).await {
                Ok(()) => {
                    debug!("Deleted mirror {}/{}", frame.scope, frame.id);
                    report.public_deleted += 1;
                }
                Err(err) if self.policy.counts_as_deleted(&err) => {}
                Err(err) => {
                    report.record_public_failure(&frame.scope, frame.id, &err);
                    block(&mut frames, parent);
                }
            }
        }
    }
}
