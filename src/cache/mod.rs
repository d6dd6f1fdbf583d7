//! Cache LRU para resultados de validação.
//!
//! Este módulo implementa um cache Least Recently Used (LRU) limitado.
//! [`CacheStore`] é a estrutura de dados pura, indexada pela identidade de
//! [`CacheKey`]. [`SharedCache`] protege um store com mutex para que vários
//! nós de schema (ou threads) o usem pelo trait [`OutcomeStore`].

mod key;
mod lru;
mod shared;

pub use key::CacheKey;
pub use lru::{CacheStats, CacheStore};
pub use shared::{OutcomeStore, SharedCache};
