//! Regras embutidas.
//!
//! Substitutos pequenos de um pipeline de regras completo: o suficiente para
//! a CLI e para exercitar o cache com coerções realistas.

use regex::Regex;

use crate::schema::{Context, Pipeline, Reference};
use crate::types::outcome::Outcome;
use crate::types::value::Value;
use crate::ValcacheResult;

/// Aceita strings, opcionalmente exigindo match de regex.
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    pattern: Option<Regex>,
}

impl StringRule {
    /// Aceita qualquer string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aceita strings que casam com `pattern`.
    pub fn with_pattern(pattern: &str) -> ValcacheResult<Self> {
        Ok(Self {
            pattern: Some(Regex::new(pattern)?),
        })
    }
}

impl Pipeline for StringRule {
    fn run(&self, input: &Value, _ctx: &Context<'_>) -> Outcome {
        let Some(text) = input.as_str() else {
            return Outcome::failure(
                "string.base",
                format!("value must be a string, got {}", input.type_name()),
            );
        };

        match &self.pattern {
            Some(pattern) if !pattern.is_match(text) => Outcome::failure(
                "string.pattern",
                format!("\"{}\" does not match /{}/", text, pattern.as_str()),
            ),
            _ => Outcome::Success(input.clone()),
        }
    }
}

/// Aceita objetos, convertendo strings que contêm um objeto JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectRule;

impl Pipeline for ObjectRule {
    fn run(&self, input: &Value, _ctx: &Context<'_>) -> Outcome {
        match input {
            Value::Object(_) => Outcome::Success(input.clone()),
            Value::String(text) => match Value::from_json_str(text) {
                Ok(value @ Value::Object(_)) => Outcome::Success(value),
                _ => Outcome::failure("object.base", "value must be an object"),
            },
            other => Outcome::failure(
                "object.base",
                format!("value must be an object, got {}", other.type_name()),
            ),
        }
    }
}

/// Aceita o valor apontado pela referência; o resto vai para `otherwise`.
pub struct AllowReference<P> {
    reference: Reference,
    otherwise: P,
}

impl<P: Pipeline> AllowReference<P> {
    pub fn new(reference: Reference, otherwise: P) -> Self {
        Self {
            reference,
            otherwise,
        }
    }
}

impl<P: Pipeline> Pipeline for AllowReference<P> {
    fn run(&self, input: &Value, ctx: &Context<'_>) -> Outcome {
        match self.reference.resolve(ctx) {
            Some(allowed) if allowed == input => Outcome::Success(input.clone()),
            _ => self.otherwise.run(input, ctx),
        }
    }

    fn references(&self) -> Vec<Reference> {
        let mut references = self.otherwise.references();
        references.push(self.reference.clone());
        references
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Preferences, Schema};

    fn run(rule: &impl Pipeline, input: Value) -> Outcome {
        let prefs = Preferences::default();
        rule.run(&input, &Context::root(&prefs))
    }

    #[test]
    fn test_string_rule() {
        let rule = StringRule::with_pattern("abc").unwrap();

        assert!(run(&rule, Value::from("xabcd")).is_success());

        let miss = run(&rule, Value::from("xbcd"));
        assert_eq!(miss.error().unwrap().code, "string.pattern");

        let wrong_type = run(&rule, Value::from(1));
        assert_eq!(wrong_type.error().unwrap().code, "string.base");

        assert!(run(&StringRule::new(), Value::from("")).is_success());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            StringRule::with_pattern("("),
            Err(crate::ValcacheError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_object_rule_coerces_json() {
        let outcome = run(&ObjectRule, Value::from(r#"{"a":"x"}"#));
        assert_eq!(
            outcome,
            Outcome::Success(Value::object([("a", Value::from("x"))]))
        );

        assert!(!run(&ObjectRule, Value::from("[1]")).is_success());
        assert!(!run(&ObjectRule, Value::from("nope")).is_success());
        assert!(!run(&ObjectRule, Value::Null).is_success());
    }

    #[test]
    fn test_allow_reference_declares_itself() {
        let rule = AllowReference::new(
            Reference::sibling("b"),
            StringRule::with_pattern("abc").unwrap(),
        );
        let a = Schema::new(rule);
        assert_eq!(a.references(), &[Reference::sibling("b")]);

        let schema = Schema::any().key("a", a).key("b", Schema::any());
        assert!(schema.has_dynamic_refs());

        let matches_b = Value::object([("a", Value::from("zzz")), ("b", Value::from("zzz"))]);
        let neither = Value::object([("a", Value::from("zzz")), ("b", Value::from("q"))]);
        let pattern = Value::object([("a", Value::from("xabcd"))]);

        assert!(schema.validate(&matches_b).is_success());
        assert!(!schema.validate(&neither).is_success());
        assert!(schema.validate(&pattern).is_success());
    }
}
