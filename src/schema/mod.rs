//! Nós de schema.
//!
//! Um [`Schema`] é um valor imutável: os builders e
//! [`Schema::enable_cache`] retornam nós novos e nunca alteram o nó de
//! origem nem seus clones. Cada nó envolve um [`Pipeline`] opaco, chaves
//! filhas opcionais e as [`Reference`]s declaradas.
//!
//! Se uma subárvore contém referências é calculado uma vez, na construção
//! do nó, e guardado nele.
//!
//! ## Exemplo
//!
//! ```rust
//! use valcache::rules::StringRule;
//! use valcache::schema::Schema;
//! use valcache::types::value::Value;
//!
//! let schema = Schema::new(StringRule::with_pattern("abc").unwrap()).enable_cache();
//!
//! assert!(schema.validate(&Value::from("xabcd")).is_success());
//! assert!(!schema.validate(&Value::from("xbcd")).is_success());
//! ```

mod binding;
mod reference;

pub use reference::Reference;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::outcome::{Outcome, ValidationError};
use crate::types::value::Value;
use binding::CacheSlot;

// ═══════════════════════════════════════════════════════════════════════════
// Pipeline
// ═══════════════════════════════════════════════════════════════════════════

/// Computação de regras/coerção que um nó de schema memoiza.
pub trait Pipeline: Send + Sync {
    /// Calcula o resultado para uma entrada.
    fn run(&self, input: &Value, ctx: &Context<'_>) -> Outcome;

    /// Referências que o pipeline resolve durante a execução.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

impl<F> Pipeline for F
where
    F: Fn(&Value, &Context<'_>) -> Outcome + Send + Sync,
{
    fn run(&self, input: &Value, ctx: &Context<'_>) -> Outcome {
        self(input, ctx)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Preferências e contexto
// ═══════════════════════════════════════════════════════════════════════════

/// Preferências de validação por chamada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Usa o cache do nó nesta chamada. `false` ignora o cache por completo.
    #[serde(default = "default_true")]
    pub cache: bool,

    /// Dados externos usados por [`Reference::Context`].
    #[serde(default)]
    pub context: Value,
}

impl Preferences {
    /// Preferências que ignoram todo cache na chamada.
    pub fn no_cache() -> Self {
        Self {
            cache: false,
            ..Self::default()
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            cache: true,
            context: Value::Null,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Estado visível ao pipeline durante a execução.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    prefs: &'a Preferences,
    parent: Option<&'a Value>,
}

impl<'a> Context<'a> {
    pub fn root(prefs: &'a Preferences) -> Self {
        Self {
            prefs,
            parent: None,
        }
    }

    /// Contexto para os filhos de `parent`.
    pub fn nested<'b>(&self, parent: &'b Value) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            prefs: self.prefs,
            parent: Some(parent),
        }
    }

    pub fn prefs(&self) -> &'a Preferences {
        self.prefs
    }

    /// Objeto que contém o valor em validação, se houver.
    pub fn parent(&self) -> Option<&'a Value> {
        self.parent
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Schema
// ═══════════════════════════════════════════════════════════════════════════

/// Nó de schema imutável.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<Node>,
}

#[derive(Clone)]
struct Node {
    pipeline: Option<Arc<dyn Pipeline>>,
    keys: Vec<(String, Schema)>,
    references: Vec<Reference>,
    has_dynamic_refs: bool,
    cache: Option<CacheSlot>,
}

impl Schema {
    /// Nó que aceita qualquer valor sem alteração.
    pub fn any() -> Self {
        Self {
            inner: Arc::new(Node {
                pipeline: None,
                keys: Vec::new(),
                references: Vec::new(),
                has_dynamic_refs: false,
                cache: None,
            }),
        }
    }

    /// Nó que roda `pipeline`. As referências reportadas pelo pipeline são
    /// declaradas no nó.
    pub fn new(pipeline: impl Pipeline + 'static) -> Self {
        let references = pipeline.references();
        let pipeline: Arc<dyn Pipeline> = Arc::new(pipeline);
        let schema = Self {
            inner: Arc::new(Node {
                pipeline: Some(pipeline),
                keys: Vec::new(),
                references,
                has_dynamic_refs: false,
                cache: None,
            }),
        };
        schema.finalized()
    }

    /// Nó que roda uma closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value, &Context<'_>) -> Outcome + Send + Sync + 'static,
    {
        Self::new(f)
    }

    /// Adiciona (ou substitui) uma chave filha. O nó retornado não tem cache.
    pub fn key(mut self, name: impl Into<String>, child: Schema) -> Self {
        let name = name.into();
        let node = Arc::make_mut(&mut self.inner);
        match node.keys.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = child,
            None => node.keys.push((name, child)),
        }
        self.finalized()
    }

    /// Declara uma referência dinâmica neste nó. O nó retornado não tem cache.
    pub fn reference(mut self, reference: Reference) -> Self {
        Arc::make_mut(&mut self.inner).references.push(reference);
        self.finalized()
    }

    fn finalized(mut self) -> Self {
        let node = Arc::make_mut(&mut self.inner);
        // Um nó derivado nunca herda o cache do ancestral
        node.cache = None;
        node.has_dynamic_refs = !node.references.is_empty()
            || node.keys.iter().any(|(_, child)| child.has_dynamic_refs());
        self
    }

    /// Indica se este nó ou algum descendente declara referência.
    pub fn has_dynamic_refs(&self) -> bool {
        self.inner.has_dynamic_refs
    }

    /// Referências declaradas diretamente neste nó.
    pub fn references(&self) -> &[Reference] {
        &self.inner.references
    }

    /// Schema filho de `name`.
    pub fn child(&self, name: &str) -> Option<&Schema> {
        self.inner
            .keys
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, child)| child)
    }

    /// Roda o pipeline e depois as chaves filhas sobre o objeto resultante.
    fn run(&self, input: &Value, ctx: &Context<'_>) -> Outcome {
        let outcome = match &self.inner.pipeline {
            Some(pipeline) => pipeline.run(input, ctx),
            None => Outcome::Success(input.clone()),
        };

        match outcome {
            Outcome::Success(value) if !self.inner.keys.is_empty() => self.run_keys(value, ctx),
            other => other,
        }
    }

    fn run_keys(&self, value: Value, ctx: &Context<'_>) -> Outcome {
        let Some(map) = value.as_object() else {
            return Outcome::Success(value);
        };

        let nested = ctx.nested(&value);
        let mut validated = map.clone();
        for (name, child) in &self.inner.keys {
            let Some(item) = map.get(name) else {
                continue;
            };
            match child.validate_in(item, &nested) {
                Outcome::Success(item) => {
                    validated.insert(name.clone(), item);
                }
                Outcome::Failure(err) => {
                    let err: ValidationError = (*err).clone().nested_under(name);
                    return err.into();
                }
            }
        }

        Outcome::Success(Value::from(validated))
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("keys", &self.inner.keys.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .field("references", &self.inner.references)
            .field("has_dynamic_refs", &self.inner.has_dynamic_refs)
            .field("cache", &self.is_cache_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_passes_through() {
        let value = Value::object([("a", Value::from(1))]);
        assert_eq!(Schema::any().validate(&value), Outcome::Success(value));
    }

    #[test]
    fn test_dynamic_refs_propagate_upwards() {
        let leaf = Schema::any().reference(Reference::sibling("b"));
        let middle = Schema::any().key("leaf", leaf);
        let root = Schema::any().key("middle", middle).key("plain", Schema::any());

        assert!(root.has_dynamic_refs());
        assert!(!root.child("plain").unwrap().has_dynamic_refs());
        assert!(root.references().is_empty());
    }

    #[test]
    fn test_replacing_key_recomputes_refs() {
        let with_ref = Schema::any().key("a", Schema::any().reference(Reference::context("x")));
        let without = with_ref.clone().key("a", Schema::any());

        assert!(with_ref.has_dynamic_refs());
        assert!(!without.has_dynamic_refs());
    }

    #[test]
    fn test_builders_do_not_touch_clones() {
        let base = Schema::any();
        let extended = base.clone().key("a", Schema::any());

        assert!(base.child("a").is_none());
        assert!(extended.child("a").is_some());
    }

    #[test]
    fn test_child_failure_carries_path() {
        let schema = Schema::any().key(
            "a",
            Schema::from_fn(|_, _| Outcome::failure("any.invalid", "rejected")),
        );

        let outcome = schema.validate(&Value::object([("a", Value::from(1))]));
        let err = outcome.error().unwrap();
        assert_eq!(err.code, "any.invalid");
        assert_eq!(err.path, vec!["a"]);
    }

    #[test]
    fn test_children_see_parent_and_context() {
        let schema = Schema::any().key(
            "a",
            Schema::from_fn(|input, ctx| {
                let sibling = Reference::sibling("b").resolve(ctx);
                let tenant = Reference::context("tenant").resolve(ctx);
                match (sibling, tenant) {
                    (Some(b), Some(t)) if b == input && t == &Value::from("acme") => {
                        Outcome::Success(input.clone())
                    }
                    _ => Outcome::failure("any.ref", "mismatch"),
                }
            })
            .reference(Reference::sibling("b"))
            .reference(Reference::context("tenant")),
        );

        let prefs = Preferences {
            context: Value::object([("tenant", Value::from("acme"))]),
            ..Preferences::default()
        };
        let same = Value::object([("a", Value::from("x")), ("b", Value::from("x"))]);
        let different = Value::object([("a", Value::from("x")), ("b", Value::from("y"))]);

        assert!(schema.validate_with(&same, &prefs).is_success());
        assert!(!schema.validate_with(&different, &prefs).is_success());
        assert!(!schema.validate(&same).is_success());
    }

    #[test]
    fn test_preferences_from_json() {
        let prefs: Preferences = serde_json::from_str(r#"{"cache": false}"#).unwrap();
        assert!(!prefs.cache);
        assert!(prefs.context.is_null());
        assert_eq!(Preferences::no_cache(), prefs);
    }
}
