//! Resultados de validação.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::value::Value;

/// Erro produzido por uma regra do pipeline de validação.
///
/// É dado, não um [`ValcacheError`](crate::ValcacheError): viaja dentro de
/// [`Outcome::Failure`] e é cacheado como um sucesso.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Código legível por máquina (ex.: `string.pattern`).
    pub code: String,

    /// Mensagem legível.
    pub message: String,

    /// Caminho do valor com falha a partir da raiz validada.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

impl ValidationError {
    /// Cria um erro na raiz.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: Vec::new(),
        }
    }

    /// Prefixa o caminho com a chave do pai.
    pub fn nested_under(mut self, key: &str) -> Self {
        self.path.insert(0, key.to_string());
        self
    }
}

/// Resultado de rodar o pipeline sobre uma entrada.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Entrada aceita, possivelmente convertida em outro valor.
    Success(Value),

    /// Entrada rejeitada. Compartilhado: replays devolvem a mesma instância.
    Failure(Arc<ValidationError>),
}

impl Outcome {
    /// Cria um resultado de falha.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Outcome::Failure(Arc::new(ValidationError::new(code, message)))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Arc<ValidationError>> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(err) => Some(err),
        }
    }

    /// Cópia segura para entregar ao chamador.
    ///
    /// Sucessos compostos são copiados em profundidade; falhas mantêm o
    /// mesmo erro compartilhado.
    pub fn detached(&self) -> Outcome {
        match self {
            Outcome::Success(value) if value.is_composite() => Outcome::Success(value.detached()),
            other => other.clone(),
        }
    }

    /// Converte em um `Result` padrão.
    pub fn into_result(self) -> Result<Value, Arc<ValidationError>> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(err) => Err(err),
        }
    }
}

impl From<ValidationError> for Outcome {
    fn from(err: ValidationError) -> Self {
        Outcome::Failure(Arc::new(err))
    }
}
