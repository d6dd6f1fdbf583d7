//! Tipos de erro do valcache.

use thiserror::Error;

/// Tipo de resultado padrão do valcache.
pub type ValcacheResult<T> = Result<T, ValcacheError>;

/// Erros do valcache.
///
/// Falhas de validação não são erros: viajam como valores
/// [`Outcome::Failure`](crate::types::outcome::Outcome::Failure) e são
/// cacheadas como qualquer outro resultado.
#[derive(Error, Debug)]
pub enum ValcacheError {
    #[error("Invalid max cache size")]
    InvalidMaxSize,

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Padrão inválido: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl ValcacheError {
    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
