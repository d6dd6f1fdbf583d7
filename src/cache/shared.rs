//! Store de resultados thread-safe compartilhado entre nós de schema.

use std::sync::{Arc, Mutex, MutexGuard};

use super::lru::{CacheStats, CacheStore};
use crate::types::config::CacheConfig;
use crate::types::outcome::Outcome;
use crate::types::value::Value;
use crate::ValcacheResult;

/// Interface de store consumida pela validação memoizada.
///
/// Implementações serializam o próprio acesso: um `get` ou `set` nunca vê o
/// despejo de outra chamada pela metade.
pub trait OutcomeStore: Send + Sync {
    /// Busca o resultado guardado em `key`, renovando a recência.
    fn get(&self, key: &Value) -> Option<Outcome>;

    /// Guarda `outcome` em `key`.
    fn set(&self, key: &Value, outcome: Outcome);

    /// Número atual de entradas.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle clonável para um [`CacheStore`] protegido por mutex.
///
/// Todos os clones apontam para as mesmas entradas, então nós que recebem
/// clones disputam a mesma capacidade.
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    inner: Arc<Mutex<CacheStore<Outcome>>>,
}

impl SharedCache {
    /// Provisiona um novo store compartilhado. Veja [`CacheStore::provision`].
    pub fn provision(config: Option<&CacheConfig>) -> ValcacheResult<Self> {
        CacheStore::provision(config).map(Self::from)
    }

    /// Número máximo de entradas.
    pub fn capacity(&self) -> usize {
        self.lock("capacity").capacity()
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        self.lock("stats").stats()
    }

    /// Indica se os dois handles usam o mesmo store.
    pub fn same_store(&self, other: &SharedCache) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, CacheStore<Outcome>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!(
                    op,
                    lock_kind = "mutex",
                    result = "poisoned_recovered",
                    "Recovered from poisoned cache lock"
                );
                poisoned.into_inner()
            }
        }
    }
}

impl From<CacheStore<Outcome>> for SharedCache {
    fn from(store: CacheStore<Outcome>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }
}

impl OutcomeStore for SharedCache {
    fn get(&self, key: &Value) -> Option<Outcome> {
        self.lock("get").get(key).cloned()
    }

    fn set(&self, key: &Value, outcome: Outcome) {
        self.lock("set").set(key, outcome);
    }

    fn len(&self) -> usize {
        self.lock("len").len()
    }
}
