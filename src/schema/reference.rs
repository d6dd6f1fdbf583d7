//! Referências dinâmicas resolvidas durante a validação.

use std::fmt;

use super::Context;
use crate::types::value::Value;

/// Ponteiro de um nó de schema para dados fora da própria entrada.
///
/// Um nó que declara referência, ou que tem descendente que declara, pode
/// produzir resultados diferentes para a mesma entrada. Esses nós nunca
/// usam o cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Chave do objeto que contém o valor validado.
    Sibling(String),

    /// Chave de [`Preferences::context`](super::Preferences::context).
    Context(String),
}

impl Reference {
    pub fn sibling(key: impl Into<String>) -> Self {
        Reference::Sibling(key.into())
    }

    pub fn context(key: impl Into<String>) -> Self {
        Reference::Context(key.into())
    }

    /// Resolve a referência no contexto de validação atual.
    pub fn resolve<'a>(&self, ctx: &Context<'a>) -> Option<&'a Value> {
        match self {
            Reference::Sibling(key) => ctx.parent().and_then(|parent| parent.get(key)),
            Reference::Context(key) => ctx.prefs().context.get(key),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Sibling(key) => write!(f, "ref:{}", key),
            Reference::Context(key) => write!(f, "ref:${}", key),
        }
    }
}
