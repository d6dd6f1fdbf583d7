//! Store LRU limitado, indexado pelos valores candidatos.

use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;

use super::key::CacheKey;
use crate::types::config::{CacheConfig, DEFAULT_MAX_ENTRIES};
use crate::types::value::Value;
use crate::ValcacheResult;

/// Estatísticas do cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Número atual de entradas.
    pub size: usize,

    /// Número máximo de entradas.
    pub capacity: usize,

    /// Buscas que encontraram entrada.
    pub hits: u64,

    /// Buscas que não encontraram nada.
    pub misses: u64,

    /// Entradas descartadas por falta de capacidade.
    pub evictions: u64,
}

impl CacheStats {
    /// Calcula a taxa de acerto.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Store de capacidade limitada com despejo LRU.
///
/// As chaves seguem a identidade de [`CacheKey`]: primitivos por valor,
/// arrays e objetos por instância. [`get`](Self::get) e [`set`](Self::set)
/// são O(1) amortizado e renovam a entrada tocada.
pub struct CacheStore<V> {
    entries: LruCache<CacheKey, V>,
    max: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V> CacheStore<V> {
    /// Cria um store a partir de configurações opcionais.
    ///
    /// Sem configuração, ou sem `max`, o store guarda
    /// [`DEFAULT_MAX_ENTRIES`] entradas. Falha com
    /// [`InvalidMaxSize`](crate::ValcacheError::InvalidMaxSize) se `max` for inválido.
    pub fn provision(config: Option<&CacheConfig>) -> ValcacheResult<Self> {
        let max = match config {
            Some(config) => config.max_entries()?,
            None => DEFAULT_MAX_ENTRIES,
        };
        // max_entries() nunca retorna zero
        Ok(Self::with_capacity(
            NonZeroUsize::new(max).unwrap_or(NonZeroUsize::MIN),
        ))
    }

    /// Cria um store com no máximo `max` entradas.
    pub fn with_capacity(max: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            max: max.get(),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Busca uma chave; num hit a entrada passa a ser a mais recente.
    pub fn get(&mut self, key: &Value) -> Option<&V> {
        match self.entries.get(&CacheKey::of(key)) {
            Some(value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insere ou sobrescreve uma chave, marcando-a como a mais recente.
    ///
    /// Uma chave nova que excede a capacidade despeja exatamente a entrada
    /// menos recente.
    pub fn set(&mut self, key: &Value, value: V) {
        self.entries.put(CacheKey::of(key), value);

        if self.entries.len() > self.max && self.entries.pop_lru().is_some() {
            self.evictions += 1;
            tracing::trace!(
                size = self.entries.len(),
                max = self.max,
                "Evicted least recently used entry"
            );
        }
    }

    /// Indica se a chave existe, sem alterar a recência.
    pub fn contains(&self, key: &Value) -> bool {
        self.entries.contains(&CacheKey::of(key))
    }

    /// Número atual de entradas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Número máximo de entradas.
    pub fn capacity(&self) -> usize {
        self.max
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.max,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::with_capacity(NonZeroUsize::new(DEFAULT_MAX_ENTRIES).unwrap_or(NonZeroUsize::MIN))
    }
}

impl<V> fmt::Debug for CacheStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("len", &self.entries.len())
            .field("max", &self.max)
            .finish()
    }
}
