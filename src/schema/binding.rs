//! Validação memoizada.
//!
//! Associa um [`OutcomeStore`] a um nó de schema e passa as validações por
//! ele. Uma chamada ignora o store (não lê nem escreve) quando:
//!
//! - o cache nunca foi habilitado no nó;
//! - o nó ou algum descendente declara uma referência dinâmica;
//! - [`Preferences::cache`] da chamada é `false`.
//!
//! Caso contrário, a entrada bruta é a chave. Um hit devolve o resultado
//! armazenado e um miss roda o pipeline uma vez e guarda o resultado. Em
//! ambos os casos, um sucesso composto é devolvido como cópia nova.
//!
//! Builders como [`Schema::key`] e [`Schema::reference`] produzem nós sem
//! cache: habilite o cache por último.

use std::sync::{Arc, OnceLock};

use super::{Context, Preferences, Schema};
use crate::cache::{OutcomeStore, SharedCache};
use crate::types::outcome::Outcome;
use crate::types::value::Value;

/// Store associado a um nó, possivelmente ainda não criado.
///
/// Clones de um nó compartilham o slot, então o store preguiçoso é criado
/// uma única vez para todos.
#[derive(Clone)]
pub(super) struct CacheSlot {
    store: Arc<OnceLock<Arc<dyn OutcomeStore>>>,
}

impl CacheSlot {
    fn lazy() -> Self {
        Self {
            store: Arc::new(OnceLock::new()),
        }
    }

    fn attached(store: Arc<dyn OutcomeStore>) -> Self {
        Self {
            store: Arc::new(OnceLock::from(store)),
        }
    }

    fn store(&self) -> &Arc<dyn OutcomeStore> {
        self.store.get_or_init(|| {
            tracing::debug!("Provisioning default outcome store");
            Arc::new(SharedCache::default())
        })
    }

    fn is_provisioned(&self) -> bool {
        self.store.get().is_some()
    }
}

impl Schema {
    /// Retorna uma cópia deste nó com cache habilitado.
    ///
    /// Um store padrão é criado no primeiro uso. Se o nó já tem cache, o
    /// store existente é mantido e um aviso é registrado.
    pub fn enable_cache(&self) -> Schema {
        self.with_cache_slot(CacheSlot::lazy())
    }

    /// Retorna uma cópia deste nó usando `store` como cache.
    ///
    /// Clones de um mesmo [`SharedCache`] passados a vários nós compartilham
    /// entradas e capacidade. Não substitui um cache já habilitado.
    pub fn enable_cache_with(&self, store: impl OutcomeStore + 'static) -> Schema {
        self.with_cache_slot(CacheSlot::attached(Arc::new(store)))
    }

    fn with_cache_slot(&self, slot: CacheSlot) -> Schema {
        if self.is_cache_enabled() {
            tracing::warn!("Cannot override schema cache; keeping the existing store");
            return self.clone();
        }

        if self.has_dynamic_refs() {
            tracing::debug!(
                references = self.references().len(),
                "Cache enabled on a schema with dynamic references; it will be bypassed"
            );
        }

        let mut node = (*self.inner).clone();
        node.cache = Some(slot);
        Schema {
            inner: Arc::new(node),
        }
    }

    /// Indica se o cache foi habilitado neste nó.
    pub fn is_cache_enabled(&self) -> bool {
        self.inner.cache.is_some()
    }

    /// Indica se o store do nó já existe.
    pub fn is_cache_provisioned(&self) -> bool {
        self.inner
            .cache
            .as_ref()
            .is_some_and(CacheSlot::is_provisioned)
    }

    /// Valida `input` com as preferências padrão.
    pub fn validate(&self, input: &Value) -> Outcome {
        self.validate_with(input, &Preferences::default())
    }

    /// Valida `input`.
    pub fn validate_with(&self, input: &Value, prefs: &Preferences) -> Outcome {
        self.validate_in(input, &Context::root(prefs))
    }

    pub(super) fn validate_in(&self, input: &Value, ctx: &Context<'_>) -> Outcome {
        let Some(store) = self.applicable_store(ctx.prefs()) else {
            return self.run(input, ctx);
        };

        if let Some(hit) = store.get(input) {
            tracing::trace!(input_type = input.type_name(), "Cache hit");
            return hit.detached();
        }

        tracing::trace!(input_type = input.type_name(), "Cache miss");
        let outcome = self.run(input, ctx);
        store.set(input, outcome.clone());
        outcome.detached()
    }

    fn applicable_store(&self, prefs: &Preferences) -> Option<&Arc<dyn OutcomeStore>> {
        let slot = self.inner.cache.as_ref()?;

        if self.inner.has_dynamic_refs {
            tracing::trace!("Cache bypassed: dynamic references");
            return None;
        }
        if !prefs.cache {
            tracing::trace!("Cache bypassed: disabled by preferences");
            return None;
        }

        Some(slot.store())
    }
}
