//! CLI command implementations for valcache.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::SharedCache;
use crate::rules::{ObjectRule, StringRule};
use crate::schema::{Context, Pipeline, Preferences, Reference, Schema};
use crate::types::config::{Config, DEFAULT_MAX_ENTRIES};
use crate::types::outcome::Outcome;
use crate::types::value::Value;
use crate::ValcacheResult;

/// Initializes configuration in the specified directory.
pub fn init(path: Option<PathBuf>) -> ValcacheResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    // Create directory if it doesn't exist
    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join("valcache.toml");

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::default_config();
    config.cache.max = Some(Some(DEFAULT_MAX_ENTRIES as f64));
    config.save(&config_path)?;

    println!("valcache initialized successfully!");
    println!("Configuration created at: {}", config_path.display());

    Ok(())
}

/// Options for [`check`].
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Regex string values must match.
    pub pattern: Option<String>,
    /// Validate objects instead of strings.
    pub object: bool,
    /// Input file, `-` for stdin.
    pub input: PathBuf,
    /// Bypass the cache on every call.
    pub no_cache: bool,
    /// Overrides `cache.max`.
    pub max: Option<f64>,
}

/// Totals reported by [`check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// How many times the rule pipeline actually ran.
    pub pipeline_runs: usize,
}

/// Rule wrapper counting pipeline runs.
struct Counted<P> {
    inner: P,
    runs: Arc<AtomicUsize>,
}

impl<P: Pipeline> Pipeline for Counted<P> {
    fn run(&self, input: &Value, ctx: &Context<'_>) -> Outcome {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.inner.run(input, ctx)
    }

    fn references(&self) -> Vec<Reference> {
        self.inner.references()
    }
}

/// Validates one JSON value per input line and prints the results.
pub fn check(options: &CheckOptions, config: &Config) -> ValcacheResult<CheckSummary> {
    let mut cache_config = config.cache.clone();
    if let Some(max) = options.max {
        cache_config.max = Some(Some(max));
    }
    let store = SharedCache::provision(Some(&cache_config))?;

    let runs = Arc::new(AtomicUsize::new(0));
    let schema = if options.object {
        Schema::new(Counted {
            inner: ObjectRule,
            runs: Arc::clone(&runs),
        })
    } else {
        let rule = match &options.pattern {
            Some(pattern) => StringRule::with_pattern(pattern)?,
            None => StringRule::new(),
        };
        Schema::new(Counted {
            inner: rule,
            runs: Arc::clone(&runs),
        })
    };
    let schema = if cache_config.enabled {
        schema.enable_cache_with(store.clone())
    } else {
        schema
    };
    let prefs = Preferences {
        cache: !options.no_cache,
        ..Preferences::default()
    };

    let reader: Box<dyn BufRead> = if options.input == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(&options.input)?))
    };

    let mut summary = CheckSummary::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let number = index + 1;
        summary.total += 1;

        let input = match Value::from_json_str(line) {
            Ok(input) => input,
            Err(err) => {
                summary.failed += 1;
                println!("line {}: invalid JSON: {}", number, err);
                continue;
            }
        };

        match schema.validate_with(&input, &prefs) {
            Outcome::Success(value) => {
                summary.passed += 1;
                println!("line {}: ok {}", number, value);
            }
            Outcome::Failure(err) => {
                summary.failed += 1;
                println!("line {}: error [{}] {}", number, err.code, err);
            }
        }
    }
    summary.pipeline_runs = runs.load(Ordering::Relaxed);

    println!();
    println!(
        "{} inputs: {} passed, {} failed",
        summary.total, summary.passed, summary.failed
    );
    println!("pipeline runs: {}", summary.pipeline_runs);

    if cache_config.enabled {
        let stats = store.stats();
        println!(
            "cache: {}/{} entries, {} hits, {} misses, {} evictions ({:.1}% hit rate)",
            stats.size,
            stats.capacity,
            stats.hits,
            stats.misses,
            stats.evictions,
            stats.hit_rate() * 100.0
        );
        tracing::debug!(
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            "Check finished"
        );
    } else {
        println!("cache: disabled");
    }

    Ok(summary)
}

/// Prints the effective configuration.
pub fn config_cmd(config: &Config) -> ValcacheResult<()> {
    let mut effective = config.clone();
    if effective.cache.max.is_none() {
        effective.cache.max = Some(Some(config.cache.max_entries()? as f64));
    }

    print!("{}", toml::to_string_pretty(&effective)?);
    Ok(())
}

/// Shows version.
pub fn version() {
    println!("valcache {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Memoized validation with a bounded LRU cache");
    println!("https://github.com/SamoraDC/valcache");
}
