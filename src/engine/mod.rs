//! The expansion engine: per-file pipeline and compilation entry points.
//!
//! A file runs through lexing, include resolution, definition registration and
//! a bounded fixed-point loop of macro-call and generator passes. Included
//! files stop after include resolution; their definitions are registered by
//! the file that pulled them in.
//!
//! All state shared between files of one compilation lives in a
//! [`CompileContext`] that is threaded through every call.

pub mod loader;
pub mod log;
pub mod passes;
pub mod stdlib;

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{CompilerConfig, OutputFormat};
use crate::errors::{ErrorKind, MacroHexError, SourceContext};
use crate::lattice::NumberSolver;
use crate::macros::MacroRegistry;
use crate::syntax::{count_by_kind, Lexer, Token};

pub use loader::{base_name, FsLoader, MemoryLoader, SourceLoader};
pub use log::{CompileLog, NullLog, SharedLog};

// ============================================================================
// SOURCE MAP
// ============================================================================

/// Source text of every file read so far, keyed by token origin.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: HashMap<Arc<str>, Arc<SourceContext>>,
}

impl SourceMap {
    pub fn insert(&mut self, origin: Arc<str>, context: SourceContext) -> Arc<SourceContext> {
        let context = Arc::new(context);
        self.files.insert(origin, context.clone());
        context
    }

    /// The context for `origin`, or a text-less one named after the file.
    pub fn reporter_for(&self, origin: &str) -> Arc<SourceContext> {
        self.files.get(origin).cloned().unwrap_or_else(|| {
            Arc::new(SourceContext::fallback(base_name(Path::new(origin))))
        })
    }
}

// ============================================================================
// COMPILE CONTEXT
// ============================================================================

/// Which part of the pipeline [`parse_file`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Everything, up to the fixed point.
    Full,
    /// Lexing and include resolution only.
    IncludeOnly,
}

/// State shared by every file of one compilation.
pub struct CompileContext {
    pub config: CompilerConfig,
    pub registry: MacroRegistry,
    pub solver: NumberSolver,
    pub(crate) sources: SourceMap,
    pub(crate) log: SharedLog,
    pub(crate) loader: Box<dyn SourceLoader>,
    included: HashSet<String>,
    std_files: OnceCell<Vec<PathBuf>>,
}

impl CompileContext {
    pub fn new(config: CompilerConfig, loader: impl SourceLoader + 'static, log: SharedLog) -> Self {
        Self {
            solver: NumberSolver::new(config.solver.clone()),
            config,
            registry: MacroRegistry::new(),
            sources: SourceMap::default(),
            log,
            loader: Box::new(loader),
            included: HashSet::new(),
            std_files: OnceCell::new(),
        }
    }

    /// A context reading from the real file system.
    pub fn with_fs(config: CompilerConfig, log: SharedLog) -> Self {
        Self::new(config, FsLoader, log)
    }

    pub fn is_included(&self, name: &str) -> bool {
        self.included.contains(name)
    }

    /// Std files, discovered on first use.
    fn std_files(&self) -> &[PathBuf] {
        self.std_files.get_or_init(|| {
            let dir = self.config.resolved_std_path();
            match self.loader.find_sources(&dir) {
                Some(files) => files,
                None => {
                    self.log.warn(format!("couldn't find std path {}", dir.display()));
                    Vec::new()
                }
            }
        })
    }
}

impl std::fmt::Debug for CompileContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileContext")
            .field("config", &self.config)
            .field("macros", &self.registry.len())
            .field("included", &self.included)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Lap timer for verbose step timings.
struct StepTimer {
    started: Instant,
    last: Instant,
}

impl StepTimer {
    fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last: now,
        }
    }

    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        elapsed
    }

    fn total(&self) -> Duration {
        self.started.elapsed()
    }
}

fn has_expandable(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.kind.is_expandable())
}

fn token_stats(name: &str, tokens: &[Token]) -> String {
    let counts: Vec<String> = count_by_kind(tokens)
        .iter()
        .map(|(kind, count)| format!("{}: {}", kind, count))
        .collect();
    format!(
        "{} token stats: total {}, {}",
        name,
        tokens.len(),
        counts.join(", ")
    )
}

fn log_step(log: &SharedLog, timer: &mut StepTimer, step: &str, name: &str, tokens: &[Token]) {
    let elapsed = timer.lap();
    if !log.is_verbose() {
        return;
    }
    log.verbose(format!("{} for {} completed in {:?}", step, name, elapsed));
    log.verbose(token_stats(name, tokens));
}

/// Runs the pipeline over one file.
///
/// Returns no tokens for a file whose base name was already included.
pub fn parse_file(
    ctx: &mut CompileContext,
    path: &Path,
    mode: ParseMode,
) -> Result<Vec<Token>, MacroHexError> {
    if !ctx.loader.exists(path) {
        return Err(MacroHexError::new(ErrorKind::FileNotFound {
            path: path.display().to_string(),
        }));
    }
    let name = base_name(path);
    if !ctx.included.insert(name.clone()) {
        ctx.log.verbose(format!("{} already included", name));
        return Ok(Vec::new());
    }

    let text = ctx
        .loader
        .read(path)
        .map_err(|err| MacroHexError::io("read", path.display(), &err))?;
    let origin: Arc<str> = Arc::from(path.display().to_string());
    let source = ctx
        .sources
        .insert(origin.clone(), SourceContext::from_file(name.clone(), text));
    let mut timer = StepTimer::start();

    let mut tokens = if ctx.config.include_std {
        stdlib::include_tokens(&origin, ctx.std_files())
    } else {
        Vec::new()
    };
    tokens.extend(Lexer::new(origin).tokenize(source.content(), &*source)?);
    log_step(&ctx.log, &mut timer, "tokenization", &name, &tokens);

    let tokens = passes::resolve_includes(ctx, tokens)?;
    log_step(&ctx.log, &mut timer, "include pass", &name, &tokens);
    if mode == ParseMode::IncludeOnly {
        ctx.log
            .verbose(format!("parsing {} took {:?} total", name, timer.total()));
        return Ok(tokens);
    }

    let mut tokens = passes::register_definitions(tokens, &mut ctx.registry, &ctx.sources)?;
    log_step(&ctx.log, &mut timer, "definition pass", &name, &tokens);

    let max_iterations = ctx.config.max_iterations;
    let mut iteration = 0;
    while has_expandable(&tokens) && iteration < max_iterations {
        iteration += 1;
        ctx.log
            .verbose(format!("call/generator pass {} for {}", iteration, name));
        tokens = passes::expand_calls(tokens, &ctx.registry, &ctx.sources)?;
        tokens = passes::run_generators(ctx, tokens)?;
        if ctx.log.is_verbose() {
            ctx.log.verbose(token_stats(&name, &tokens));
        }
    }
    ctx.log.verbose(format!(
        "call/generator passes for {} completed in {:?}",
        name,
        timer.lap()
    ));

    if has_expandable(&tokens) {
        let unresolved = tokens.iter().filter(|t| t.kind.is_expandable()).count();
        ctx.log.warn(format!(
            "{}: stopped expanding after {} iterations with {} unresolved token(s)",
            name, max_iterations, unresolved
        ));
    }

    let stats = ctx.solver.stats();
    ctx.log.verbose(format!(
        "number synthesis: {} searches, {} cache hits, {} states expanded",
        stats.searches, stats.cache_hits, stats.expansions
    ));
    ctx.log
        .verbose(format!("parsing {} took {:?} total", name, timer.total()));
    Ok(tokens)
}

/// Compiles `path` and renders the surviving tokens in the configured format.
pub fn compile(ctx: &mut CompileContext, path: &Path) -> Result<String, MacroHexError> {
    let tokens = parse_file(ctx, path, ParseMode::Full)?;
    Ok(render(&tokens, ctx.config.output_format))
}

/// Trimmed token contents, one per line.
///
/// [`OutputFormat::Macrohex`] prefixes each line with `!`, which recompiles to
/// the same rawhex.
pub fn render(tokens: &[Token], format: OutputFormat) -> String {
    let lines: Vec<String> = tokens
        .iter()
        .map(|token| match format {
            OutputFormat::Rawhex => token.trimmed().to_string(),
            OutputFormat::Macrohex => format!("!{}", token.trimmed()),
        })
        .collect();
    lines.join("\n")
}
