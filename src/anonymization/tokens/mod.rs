//! Token manager
//!
//! Owns the bidirectional literal↔token mapping and the per-label counters
//! used to mint sequential tokens. The two maps are kept mutually inverse at
//! all times: rebinding a literal deletes its old token's reverse entry, and
//! rebinding a token unbinds the literal it previously resolved to.
//!
//! All state sits behind one mutex, so every operation is atomic with
//! respect to concurrent readers. After each mutation the full state is
//! handed to the [`MappingStore`]; a failing store is logged and otherwise
//! ignored.

pub mod naming;
pub mod store;

pub use naming::{format_token, TokenKind};
pub use store::{JsonFileStore, MappingStore, MemoryStore, TokenState};

use crate::domain::Result;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Mappings {
    scope: Option<String>,
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
    counters: HashMap<String, u64>,
}

impl Mappings {
    fn from_state(state: TokenState) -> Self {
        let mut mappings = Self {
            scope: state.scope,
            counters: state.counters.into_iter().collect(),
            ..Self::default()
        };

        for (literal, token) in state.mappings {
            if mappings.reverse.contains_key(&token) {
                tracing::warn!(
                    token = %token,
                    "Persisted state binds a token twice, keeping the first binding"
                );
                continue;
            }
            mappings.reverse.insert(token.clone(), literal.clone());
            mappings.forward.insert(literal, token);
        }

        mappings
    }

    fn to_state(&self) -> TokenState {
        TokenState {
            scope: self.scope.clone(),
            mappings: self
                .forward
                .iter()
                .map(|(l, t)| (l.clone(), t.clone()))
                .collect(),
            counters: self
                .counters
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }

    fn bind(&mut self, literal: &str, token: &str) {
        if let Some(old_token) = self.forward.get(literal).cloned() {
            if old_token == token {
                return;
            }
            self.reverse.remove(&old_token);
        }

        if let Some(old_literal) = self.reverse.get(token).cloned() {
            if old_literal != literal {
                self.forward.remove(&old_literal);
            }
        }

        self.forward.insert(literal.to_string(), token.to_string());
        self.reverse.insert(token.to_string(), literal.to_string());
    }

    fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
        self.counters.clear();
    }
}

/// Session-scoped literal↔token mapping
///
/// # Examples
///
/// ```
/// use shroud::anonymization::tokens::TokenManager;
///
/// let tokens = TokenManager::in_memory();
/// let first = tokens.issue_token("ip", "10.0.0.5");
/// let again = tokens.issue_token("ip", "10.0.0.5");
///
/// assert_eq!(first, "IP_1");
/// assert_eq!(first, again);
/// assert_eq!(tokens.resolve("IP_1").as_deref(), Some("10.0.0.5"));
/// ```
pub struct TokenManager {
    state: Mutex<Mappings>,
    store: Arc<dyn MappingStore>,
}

impl TokenManager {
    /// Create a manager, resuming whatever state `store` holds
    ///
    /// # Errors
    ///
    /// Returns an error if the store holds state that cannot be read.
    pub fn new(store: Arc<dyn MappingStore>) -> Result<Self> {
        let mappings = match store.load()? {
            Some(state) => Mappings::from_state(state),
            None => Mappings::default(),
        };

        tracing::debug!(
            store = %store.describe(),
            mappings = mappings.forward.len(),
            "Token state loaded"
        );

        Ok(Self {
            state: Mutex::new(mappings),
            store,
        })
    }

    /// Create a manager backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(Mappings::default()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Mappings> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, mappings: &Mappings) {
        if let Err(e) = self.store.save(&mappings.to_state()) {
            tracing::warn!(
                store = %self.store.describe(),
                error = %e,
                "Failed to persist token state, continuing in memory"
            );
        }
    }

    /// Return the token for `literal`, minting one for `label` if needed
    ///
    /// Idempotent: a known literal keeps its token and no counter moves.
    pub fn issue_token(&self, label: &str, literal: &str) -> String {
        let mut mappings = self.lock();

        if let Some(existing) = mappings.forward.get(literal) {
            return existing.clone();
        }

        let key = naming::counter_key(label);
        let token = loop {
            let counter = mappings.counters.entry(key.clone()).or_insert(0);
            *counter += 1;
            let candidate = naming::format_token(label, *counter);
            if !mappings.reverse.contains_key(&candidate) {
                break candidate;
            }
            tracing::debug!(token = %candidate, "Token already bound, advancing counter");
        };

        mappings.bind(literal, &token);
        self.persist(&mappings);
        token
    }

    /// Bind `literal` to `token`, replacing any previous binding of either
    pub fn store_mapping(&self, literal: &str, token: &str) {
        let mut mappings = self.lock();
        mappings.bind(literal, token);
        self.persist(&mappings);
    }

    /// Literal currently bound to `token`
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.lock().reverse.get(token).cloned()
    }

    /// Token currently bound to `literal`
    pub fn token_for(&self, literal: &str) -> Option<String> {
        self.lock().forward.get(literal).cloned()
    }

    /// True when `text` is an issued token
    pub fn is_token(&self, text: &str) -> bool {
        self.lock().reverse.contains_key(text)
    }

    /// Snapshot of literal → token
    pub fn all_mappings(&self) -> BTreeMap<String, String> {
        self.lock()
            .forward
            .iter()
            .map(|(l, t)| (l.clone(), t.clone()))
            .collect()
    }

    /// Snapshot of token → literal
    pub fn reverse_mappings(&self) -> BTreeMap<String, String> {
        self.lock()
            .reverse
            .iter()
            .map(|(t, l)| (t.clone(), l.clone()))
            .collect()
    }

    /// Last index issued for a label's counter
    pub fn counter(&self, label: &str) -> u64 {
        self.lock()
            .counters
            .get(&naming::counter_key(label))
            .copied()
            .unwrap_or(0)
    }

    /// Number of live mappings
    pub fn len(&self) -> usize {
        self.lock().forward.len()
    }

    /// True when no mapping exists
    pub fn is_empty(&self) -> bool {
        self.lock().forward.is_empty()
    }

    /// Scope the current state belongs to
    pub fn scope(&self) -> Option<String> {
        self.lock().scope.clone()
    }

    /// Drop all mappings and counters
    pub fn clear(&self) {
        let mut mappings = self.lock();
        mappings.clear();
        self.persist(&mappings);
        tracing::info!("Token mappings cleared");
    }

    /// Attach the state to `scope`, clearing it when it belongs to another one
    ///
    /// Returns `true` when existing mappings were discarded.
    pub fn bind_scope(&self, scope: &str) -> bool {
        let mut mappings = self.lock();
        if mappings.scope.as_deref() == Some(scope) {
            return false;
        }

        let discarded = !mappings.forward.is_empty() || !mappings.counters.is_empty();
        if discarded {
            tracing::info!(
                previous = mappings.scope.as_deref().unwrap_or("<none>"),
                scope = %scope,
                "Rule scope changed, resetting token mappings"
            );
            mappings.clear();
        }
        mappings.scope = Some(scope.to_string());
        self.persist(&mappings);
        discarded
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Literals stay out of debug output
        f.debug_struct("TokenManager")
            .field("mappings", &self.len())
            .field("store", &self.store.describe())
            .finish()
    }
}
