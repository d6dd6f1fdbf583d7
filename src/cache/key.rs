//! Chaves de cache derivadas dos valores candidatos.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::types::value::{Map, Value};

/// Chave de busca para um [`Value`].
///
/// Primitivos são iguais por valor. `-0` e `+0` são a mesma chave, assim
/// como todos os NaN. Arrays e objetos só são iguais quando são a mesma
/// instância. A chave mantém o composto vivo, então o endereço não pode ser
/// reutilizado enquanto a entrada existir.
#[derive(Debug, Clone)]
pub enum CacheKey {
    Null,
    Bool(bool),
    Number(u64),
    String(String),
    Array(Arc<Vec<Value>>),
    Object(Arc<Map>),
}

impl CacheKey {
    /// Deriva a chave de um valor. O(1) para compostos.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => CacheKey::Null,
            Value::Bool(b) => CacheKey::Bool(*b),
            Value::Number(n) => CacheKey::Number(canonical_bits(*n)),
            Value::String(s) => CacheKey::String(s.clone()),
            Value::Array(items) => CacheKey::Array(Arc::clone(items)),
            Value::Object(map) => CacheKey::Object(Arc::clone(map)),
        }
    }
}

fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0_f64.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CacheKey::Null, CacheKey::Null) => true,
            (CacheKey::Bool(a), CacheKey::Bool(b)) => a == b,
            (CacheKey::Number(a), CacheKey::Number(b)) => a == b,
            (CacheKey::String(a), CacheKey::String(b)) => a == b,
            (CacheKey::Array(a), CacheKey::Array(b)) => Arc::ptr_eq(a, b),
            (CacheKey::Object(a), CacheKey::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CacheKey::Null => {}
            CacheKey::Bool(b) => b.hash(state),
            CacheKey::Number(bits) => bits.hash(state),
            CacheKey::String(s) => s.hash(state),
            CacheKey::Array(items) => Arc::as_ptr(items).hash(state),
            CacheKey::Object(map) => Arc::as_ptr(map).hash(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_primitives_by_value() {
        assert_eq!(CacheKey::of(&Value::from(1)), CacheKey::of(&Value::from(1.0)));
        assert_eq!(CacheKey::of(&Value::from("a")), CacheKey::of(&Value::from("a")));
        assert_eq!(CacheKey::of(&Value::Null), CacheKey::of(&Value::Null));
        assert_ne!(CacheKey::of(&Value::from(1)), CacheKey::of(&Value::from("1")));
        assert_ne!(CacheKey::of(&Value::from(true)), CacheKey::of(&Value::from(1)));
    }

    #[test]
    fn test_zero_and_nan() {
        assert_eq!(CacheKey::of(&Value::from(0.0)), CacheKey::of(&Value::from(-0.0)));
        assert_eq!(
            CacheKey::of(&Value::from(f64::NAN)),
            CacheKey::of(&Value::from(-f64::NAN))
        );
    }

    #[test]
    fn test_composites_by_identity() {
        let a = Value::object([("k", Value::from(1))]);
        let twin = Value::object([("k", Value::from(1))]);

        assert_eq!(CacheKey::of(&a), CacheKey::of(&a.clone()));
        assert_ne!(CacheKey::of(&a), CacheKey::of(&twin));
        assert_ne!(
            CacheKey::of(&Value::array([])),
            CacheKey::of(&Value::array([]))
        );
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let a = Value::array([Value::from("x")]);
        let mut set = HashSet::new();
        set.insert(CacheKey::of(&a));
        set.insert(CacheKey::of(&a.clone()));
        set.insert(CacheKey::of(&Value::from(-0.0)));
        set.insert(CacheKey::of(&Value::from(0)));

        assert_eq!(set.len(), 2);
    }
}
