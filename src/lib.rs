//! # valcache
//!
//! Validação memoizada: um cache LRU limitado na frente do pipeline de
//! regras/coerção de um schema.
//!
//! ## Módulos
//!
//! - [`cache`] - Store LRU limitado e o handle compartilhado thread-safe
//! - [`schema`] - Nós de schema imutáveis e a validação memoizada
//! - [`rules`] - Regras embutidas (string/regex, coerção de objeto JSON)
//! - [`types`] - Tipos compartilhados (valores, resultados, configuração, erros)
//! - `cli` - Interface de linha de comando (feature `cli`)
//!
//! ## Exemplo
//!
//! ```rust
//! use valcache::cache::{OutcomeStore, SharedCache};
//! use valcache::rules::StringRule;
//! use valcache::schema::Schema;
//! use valcache::types::config::CacheConfig;
//! use valcache::types::value::Value;
//!
//! let cache = SharedCache::provision(Some(&CacheConfig::with_max(100.0))).unwrap();
//! let schema = Schema::new(StringRule::with_pattern("^[a-z]+$").unwrap())
//!     .enable_cache_with(cache.clone());
//!
//! assert!(schema.validate(&Value::from("hello")).is_success());
//! assert!(schema.validate(&Value::from("hello")).is_success());
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.len(), 1);
//! ```

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod rules;
pub mod schema;
pub mod types;

pub use types::config::Config;
pub use types::errors::{ValcacheError, ValcacheResult};
