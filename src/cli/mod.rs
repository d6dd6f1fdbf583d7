//! Interface de linha de comando do valcache.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// valcache - validação memoizada com cache LRU limitado.
#[derive(Parser, Debug)]
#[command(name = "valcache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = "valcache.toml")]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cria um arquivo de configuração padrão.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Valida valores JSON, um por linha, com um schema em cache.
    Check {
        /// Regex que as strings devem casar.
        #[arg(short, long, conflicts_with = "object")]
        pattern: Option<String>,

        /// Espera objetos; strings com um objeto JSON são convertidas.
        #[arg(long)]
        object: bool,

        /// Arquivo de entrada com um valor JSON por linha ("-" para stdin).
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Ignora o cache em todas as chamadas.
        #[arg(long)]
        no_cache: bool,

        /// Sobrescreve o tamanho de cache configurado.
        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,
    },

    /// Mostra a configuração efetiva.
    Config,

    /// Mostra a versão.
    Version,
}
