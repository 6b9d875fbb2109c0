//! Shared test helpers for mirroring tests.

#![allow(dead_code)]

use async_trait::async_trait;
use curio_mirror::Curator;
use curio_model::{Document, NewAttribute, NewCatalog, NewItem, Patch};
use curio_storage::{EntityStore, MemoryStore, StoreError, StoreResult};
use curio_types::{DocumentId, Level, ScopePath, UserId};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ── Fault injection ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    Update,
    Delete,
    Get,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Private,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Unavailable,
    PermissionDenied,
}

#[derive(Debug, Clone)]
struct Fault {
    op: Op,
    side: Side,
    level: Option<Level>,
    kind: FaultKind,
    /// `None` fails forever.
    remaining: Option<usize>,
}

/// `MemoryStore` wrapper that fails selected calls.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    faults: Mutex<Vec<Fault>>,
    calls: Mutex<Vec<(Op, String)>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Fails every matching call until [`FaultyStore::heal`].
    pub fn fail(&self, op: Op, side: Side, kind: FaultKind) {
        self.push(op, side, None, kind, None);
    }

    /// Fails every matching call at one level until healed.
    pub fn fail_at(&self, op: Op, side: Side, level: Level, kind: FaultKind) {
        self.push(op, side, Some(level), kind, None);
    }

    /// Fails the next `times` matching calls.
    pub fn fail_times(&self, op: Op, side: Side, kind: FaultKind, times: usize) {
        self.push(op, side, None, kind, Some(times));
    }

    pub fn heal(&self) {
        self.faults.lock().unwrap().clear();
    }

    /// Number of recorded calls of `op` against the public tree.
    pub fn public_calls(&self, op: Op) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, scope)| *o == op && scope.starts_with("public"))
            .count()
    }

    fn push(&self, op: Op, side: Side, level: Option<Level>, kind: FaultKind, remaining: Option<usize>) {
        self.faults.lock().unwrap().push(Fault {
            op,
            side,
            level,
            kind,
            remaining,
        });
    }

    fn check(&self, op: Op, scope: &ScopePath) -> StoreResult<()> {
        self.calls.lock().unwrap().push((op, scope.to_string()));

        let side = if scope.is_public() { Side::Public } else { Side::Private };
        let mut faults = self.faults.lock().unwrap();
        let Some(pos) = faults.iter().position(|f| {
            f.op == op && f.side == side && f.level.is_none_or(|level| level == scope.level())
        }) else {
            return Ok(());
        };

        let kind = faults[pos].kind;
        if let Some(remaining) = faults[pos].remaining.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                faults.remove(pos);
            }
        }
        Err(match kind {
            FaultKind::Unavailable => StoreError::Unavailable(format!("injected {op:?} on {scope}")),
            FaultKind::PermissionDenied => {
                StoreError::PermissionDenied(format!("injected {op:?} on {scope}"))
            }
        })
    }
}

#[async_trait]
impl EntityStore for FaultyStore {
    fn backend_name(&self) -> &'static str {
        "faulty-memory"
    }

    async fn create(&self, scope: &ScopePath, data: serde_json::Value) -> StoreResult<DocumentId> {
        self.check(Op::Create, scope)?;
        self.inner.create(scope, data).await
    }

    async fn update(&self, scope: &ScopePath, id: DocumentId, patch: &Patch) -> StoreResult<()> {
        self.check(Op::Update, scope)?;
        self.inner.update(scope, id, patch).await
    }

    async fn delete(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<()> {
        self.check(Op::Delete, scope)?;
        self.inner.delete(scope, id).await
    }

    async fn get(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<Document> {
        self.check(Op::Get, scope)?;
        self.inner.get(scope, id).await
    }

    async fn list(&self, scope: &ScopePath) -> StoreResult<Vec<Document>> {
        self.check(Op::List, scope)?;
        self.inner.list(scope).await
    }
}

// ── Fixtures ─────────────────────────────────────────────────────

pub struct Fixture {
    pub store: Arc<FaultyStore>,
    pub curator: Curator,
    pub owner: UserId,
}

pub fn setup() -> Fixture {
    init_tracing();
    let store = Arc::new(FaultyStore::new());
    let curator = Curator::new(store.clone());
    Fixture {
        store,
        curator,
        owner: UserId::new(),
    }
}

pub fn new_catalog(name: &str, is_public: bool) -> NewCatalog {
    NewCatalog {
        name: name.into(),
        category: "Collectibles".into(),
        description: format!("{name} description"),
        images: vec![format!("{name}.jpg")],
        is_public,
    }
}

pub fn new_item(name: &str) -> NewItem {
    NewItem {
        name: name.into(),
        value: "100".into(),
        description: format!("{name} description"),
    }
}

pub fn new_attribute(name: &str, value: &str) -> NewAttribute {
    NewAttribute {
        name: name.into(),
        value: value.into(),
    }
}
