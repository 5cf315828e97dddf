//! # Listener registry: scope → event type → ordered listener entries.
//!
//! ## Architecture
//! ```text
//! Registry
//!   └─ RwLock<HashMap<Scope, Arc<ScopeRegistry>>>        (scope map lock)
//!          └─ ScopeRegistry
//!               └─ RwLock<HashMap<K, Vec<ListenerEntry>>>  (per-scope lock)
//! ```
//!
//! ## Rules
//! - Registration order is preserved inside each `Vec` (delivery order)
//! - A listener instance appears at most once per event type
//! - Dispatch works on [`ScopeRegistry::snapshot`] copies; no lock is held
//!   while listeners run
//! - Lock order is scope map, then scope; never the reverse

use std::any::TypeId;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::events::{DispatchMode, Scope};
use crate::listeners::{ListenerRef, same_instance};

/// One registration: listener plus the mode it was registered with.
pub(crate) struct ListenerEntry<K, D> {
    pub(crate) listener: ListenerRef<K, D>,
    pub(crate) mode: DispatchMode,
}

impl<K, D> Clone for ListenerEntry<K, D> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
            mode: self.mode,
        }
    }
}

/// Why a listener could not be added.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum AddError {
    /// Event type not declared in this scope.
    UnknownEventType,
    /// Same instance already registered for the type.
    Duplicate,
}

/// Event types and listeners of one scope.
pub(crate) struct ScopeRegistry<K, D> {
    events: RwLock<HashMap<K, Vec<ListenerEntry<K, D>>>>,
}

impl<K, D> ScopeRegistry<K, D>
where
    K: Eq + Hash + Clone + 'static,
    D: 'static,
{
    fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }

    /// Declares `event_type`; returns `false` if it was already known.
    pub(crate) async fn register_event(&self, event_type: K) -> bool {
        let mut events = self.events.write().await;
        if events.contains_key(&event_type) {
            return false;
        }
        events.insert(event_type, Vec::new());
        true
    }

    /// Removes `event_type` with all its listeners.
    pub(crate) async fn unregister_event(&self, event_type: &K) -> bool {
        self.events.write().await.remove(event_type).is_some()
    }

    /// Appends a listener entry at the end of the type's sequence.
    pub(crate) async fn add_listener(
        &self,
        event_type: &K,
        listener: ListenerRef<K, D>,
        mode: DispatchMode,
    ) -> Result<(), AddError> {
        let mut events = self.events.write().await;
        let entries = events
            .get_mut(event_type)
            .ok_or(AddError::UnknownEventType)?;

        if entries
            .iter()
            .any(|e| same_instance(&e.listener, &listener))
        {
            return Err(AddError::Duplicate);
        }
        entries.push(ListenerEntry { listener, mode });
        Ok(())
    }

    /// Removes every entry whose concrete listener type is `ty`.
    pub(crate) async fn remove_by_type(&self, event_type: &K, ty: TypeId) -> bool {
        self.remove_where(event_type, |e| e.listener.listener_type() == ty)
            .await
    }

    /// Removes the entry holding exactly `listener`.
    pub(crate) async fn remove_instance(&self, event_type: &K, listener: &ListenerRef<K, D>) -> bool {
        self.remove_where(event_type, |e| same_instance(&e.listener, listener))
            .await
    }

    async fn remove_where(
        &self,
        event_type: &K,
        pred: impl Fn(&ListenerEntry<K, D>) -> bool,
    ) -> bool {
        let mut events = self.events.write().await;
        let Some(entries) = events.get_mut(event_type) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| !pred(e));
        entries.len() != before
    }

    /// Copy of the type's entries in registration order; `None` if unknown.
    pub(crate) async fn snapshot(&self, event_type: &K) -> Option<Vec<ListenerEntry<K, D>>> {
        self.events.read().await.get(event_type).cloned()
    }

    /// Number of entries for the type; `None` if unknown.
    pub(crate) async fn listener_count(&self, event_type: &K) -> Option<usize> {
        self.events.read().await.get(event_type).map(Vec::len)
    }

    /// All declared event types (unordered).
    pub(crate) async fn event_types(&self) -> Vec<K> {
        self.events.read().await.keys().cloned().collect()
    }
}

/// Map of all scopes owned by one provider.
pub(crate) struct Registry<K, D> {
    scopes: RwLock<HashMap<Scope, Arc<ScopeRegistry<K, D>>>>,
}

impl<K, D> Registry<K, D>
where
    K: Eq + Hash + Clone + 'static,
    D: 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            scopes: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the scope's registry if it exists.
    pub(crate) async fn get(&self, scope: &Scope) -> Option<Arc<ScopeRegistry<K, D>>> {
        self.scopes.read().await.get(scope).cloned()
    }

    /// Declares `event_type` in `scope`, creating the scope on first use.
    ///
    /// The scope map stays write-locked across the insert, so a concurrent
    /// [`Registry::remove`] either drops the new type with the scope or runs
    /// after it; the type never lands in a detached registry.
    pub(crate) async fn register_event(&self, scope: &Scope, event_type: K) -> bool {
        let mut scopes = self.scopes.write().await;
        let reg = scopes
            .entry(scope.clone())
            .or_insert_with(|| Arc::new(ScopeRegistry::new()));
        reg.register_event(event_type).await
    }

    /// Adds a listener to `scope` while the scope map is read-locked.
    pub(crate) async fn add_listener(
        &self,
        scope: &Scope,
        event_type: &K,
        listener: ListenerRef<K, D>,
        mode: DispatchMode,
    ) -> Result<(), AddError> {
        let scopes = self.scopes.read().await;
        let reg = scopes.get(scope).ok_or(AddError::UnknownEventType)?;
        reg.add_listener(event_type, listener, mode).await
    }

    /// Drops a scope with everything registered in it.
    pub(crate) async fn remove(&self, scope: &Scope) -> bool {
        self.scopes.write().await.remove(scope).is_some()
    }

    /// Sorted list of scope names.
    pub(crate) async fn scopes(&self) -> Vec<Scope> {
        let mut names: Vec<Scope> = self.scopes.read().await.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Drops every scope.
    pub(crate) async fn clear(&self) {
        self.scopes.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenerError;
    use crate::events::EventContext;
    use crate::listeners::{Listener, ListenerFn};
    use async_trait::async_trait;

    struct Named;

    #[async_trait]
    impl Listener<u8, ()> for Named {
        async fn on_event(&self, _ctx: &EventContext<u8, ()>) -> Result<(), ListenerError> {
            Ok(())
        }
    }

    fn noop() -> ListenerRef<u8, ()> {
        ListenerFn::arc("noop", |_: &EventContext<u8, ()>| Ok(()))
    }

    #[tokio::test]
    async fn test_add_requires_declared_type() {
        let reg = ScopeRegistry::<u8, ()>::new();
        assert_eq!(
            reg.add_listener(&1, noop(), DispatchMode::Sync).await,
            Err(AddError::UnknownEventType)
        );
        assert!(reg.register_event(1).await);
        assert!(!reg.register_event(1).await);
        assert_eq!(reg.add_listener(&1, noop(), DispatchMode::Sync).await, Ok(()));
        assert_eq!(reg.listener_count(&1).await, Some(1));
    }

    #[tokio::test]
    async fn test_duplicate_instance_rejected_but_equal_type_allowed() {
        let reg = ScopeRegistry::<u8, ()>::new();
        reg.register_event(1).await;

        let a: ListenerRef<u8, ()> = Arc::new(Named);
        let b: ListenerRef<u8, ()> = Arc::new(Named);
        reg.add_listener(&1, Arc::clone(&a), DispatchMode::Sync).await.unwrap();
        assert_eq!(
            reg.add_listener(&1, Arc::clone(&a), DispatchMode::Async).await,
            Err(AddError::Duplicate)
        );
        reg.add_listener(&1, b, DispatchMode::Async).await.unwrap();
        assert_eq!(reg.listener_count(&1).await, Some(2));

        // type-based removal drops both instances
        assert!(reg.remove_by_type(&1, TypeId::of::<Named>()).await);
        assert_eq!(reg.listener_count(&1).await, Some(0));
        assert!(!reg.remove_by_type(&1, TypeId::of::<Named>()).await);
    }

    #[tokio::test]
    async fn test_snapshot_keeps_registration_order() {
        let reg = ScopeRegistry::<u8, ()>::new();
        reg.register_event(7).await;
        let first = noop();
        let second = noop();
        reg.add_listener(&7, Arc::clone(&first), DispatchMode::Sync).await.unwrap();
        reg.add_listener(&7, Arc::clone(&second), DispatchMode::Async).await.unwrap();

        let snap = reg.snapshot(&7).await.unwrap();
        assert!(same_instance(&snap[0].listener, &first));
        assert!(same_instance(&snap[1].listener, &second));
        assert_eq!(snap[1].mode, DispatchMode::Async);

        assert!(reg.remove_instance(&7, &first).await);
        assert_eq!(reg.listener_count(&7).await, Some(1));
        assert!(reg.snapshot(&8).await.is_none());
    }

    #[tokio::test]
    async fn test_scopes_are_created_once_and_sorted() {
        let reg = Registry::<u8, ()>::new();
        assert!(reg.register_event(&Scope::from("users"), 1).await);
        let a1 = reg.get(&Scope::from("users")).await.unwrap();
        assert!(!reg.register_event(&Scope::from("users"), 1).await);
        assert!(reg.register_event(&Scope::from("users"), 2).await);
        let a2 = reg.get(&Scope::from("users")).await.unwrap();
        assert!(Arc::ptr_eq(&a1, &a2));
        reg.register_event(&Scope::from("billing"), 1).await;

        assert_eq!(
            reg.scopes().await,
            vec![Scope::from("billing"), Scope::from("users")]
        );
        assert!(reg.remove(&Scope::from("users")).await);
        assert!(!reg.remove(&Scope::from("users")).await);
        reg.clear().await;
        assert!(reg.scopes().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_listener_to_missing_scope() {
        let reg = Registry::<u8, ()>::new();
        let scope = Scope::from("users");
        assert_eq!(
            reg.add_listener(&scope, &1, noop(), DispatchMode::Sync).await,
            Err(AddError::UnknownEventType)
        );
        reg.register_event(&scope, 1).await;
        assert_eq!(reg.add_listener(&scope, &1, noop(), DispatchMode::Sync).await, Ok(()));
        assert_eq!(reg.get(&scope).await.unwrap().listener_count(&1).await, Some(1));
    }

    /// Registry over arbitrary key and payload types, as the provider uses it.
    async fn declare_and_count<K, D>(key: K, listener: ListenerRef<K, D>) -> Option<usize>
    where
        K: Eq + Hash + Clone + Send + Sync + 'static,
        D: Send + Sync + 'static,
    {
        let reg = Registry::<K, D>::new();
        let scope = Scope::from("generic");
        reg.register_event(&scope, key.clone()).await;
        reg.add_listener(&scope, &key, listener, DispatchMode::Async)
            .await
            .ok()?;
        let scoped = reg.get(&scope).await?;
        scoped.remove_by_type(&key, TypeId::of::<()>()).await;
        scoped.listener_count(&key).await
    }

    #[tokio::test]
    async fn test_generic_key_and_payload() {
        let listener: ListenerRef<String, Vec<u8>> =
            ListenerFn::arc("bytes", |_: &EventContext<String, Vec<u8>>| Ok(()));
        assert_eq!(declare_and_count("uploaded".to_string(), listener).await, Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_register_event_never_lands_in_removed_scope() {
        let reg = Arc::new(Registry::<u32, ()>::new());
        let scope = Scope::from("churn");

        for round in 0..200_u32 {
            let remover = {
                let reg = Arc::clone(&reg);
                let scope = scope.clone();
                tokio::spawn(async move { reg.remove(&scope).await })
            };
            reg.register_event(&scope, round).await;
            remover.await.unwrap();

            // whichever ran first, the scope that is reachable now is the one
            // holding this round's type, or there is no scope at all
            if let Some(current) = reg.get(&scope).await {
                assert!(current.event_types().await.contains(&round));
            }
        }
    }
}
