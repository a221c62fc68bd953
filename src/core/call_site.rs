//! Call-site resolution
//!
//! Attributes a log line to the code that actually issued it. The stack is
//! captured through a [`StackCapture`] implementation and scanned for the first
//! frame that has a source file and does not belong to the logging engine's own
//! [`SourceUnit`] (nor to the stack-capture runtime).
//!
//! When nothing qualifies (release builds without debug info, disabled
//! capture, ...) the `#[track_caller]` location of the public logging call is
//! used instead, so resolution never comes back empty.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub(crate) const SOURCE_FILE: &str = file!();
pub(crate) const MODULE_PATH: &str = module_path!();

const UNDEFINED_TYPE: &str = "<undefined-type>";
const UNDEFINED_FUNCTION: &str = "<undefined-function-or-method>";

/// Symbol prefixes of the frames that capture the stack itself
const RUNTIME_PREFIXES: &[&str] = &["std::backtrace", "std::backtrace_rs", "backtrace::"];

/// One entry of a captured call stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallFrame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub function_name: Option<String>,
    pub type_name: Option<String>,
    /// Demangled symbol the names were derived from
    pub symbol: Option<String>,
}

impl CallFrame {
    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            file: Some(location.file().to_string()),
            line: Some(location.line()),
            column: Some(location.column()),
            ..Self::default()
        }
    }

    /// Build a frame from a demangled symbol such as
    /// `my_app::orders::OrderService::submit`.
    pub fn from_symbol(symbol: &str) -> Self {
        let symbol = strip_hash(symbol.trim());
        let (type_name, function_name) = split_symbol(symbol);
        Self {
            function_name,
            type_name,
            symbol: Some(symbol.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for CallFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} ({}:",
            self.type_name.as_deref().unwrap_or(UNDEFINED_TYPE),
            self.function_name.as_deref().unwrap_or(UNDEFINED_FUNCTION),
            self.file.as_deref().unwrap_or("<unknown>"),
        )?;
        match self.line {
            Some(line) => write!(f, "{}:", line)?,
            None => write!(f, "?:")?,
        }
        match self.column {
            Some(column) => write!(f, "{})", column),
            None => write!(f, "?)"),
        }
    }
}

/// Remove the legacy-mangling hash suffix (`::h0123456789abcdef`)
fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::") {
        Some((head, tail))
            if tail.len() == 17
                && tail.starts_with('h')
                && tail[1..].chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            head
        }
        _ => symbol,
    }
}

fn last_path_segment(path: &str) -> &str {
    let path = path.split('<').next().unwrap_or(path);
    path.rsplit("::").next().unwrap_or(path).trim()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Split a demangled symbol into `(type name, function name)`.
fn split_symbol(symbol: &str) -> (Option<String>, Option<String>) {
    // `<app::Foo as app::Bar>::baz` and `<app::Foo>::baz`
    if let Some(rest) = symbol.strip_prefix('<') {
        let mut depth = 1usize;
        for (idx, ch) in rest.char_indices() {
            match ch {
                '<' => depth += 1,
                '>' => {
                    depth -= 1;
                    if depth == 0 {
                        let self_ty = &rest[..idx];
                        let self_ty = self_ty.split(" as ").next().unwrap_or(self_ty);
                        let method = rest[idx + 1..].trim_start_matches("::");
                        return (
                            non_empty(last_path_segment(self_ty)),
                            non_empty(method),
                        );
                    }
                }
                _ => {}
            }
        }
    }

    let segments: Vec<&str> = symbol.split("::").collect();
    // closures belong to their enclosing function
    let mut fn_idx = segments.len().saturating_sub(1);
    while fn_idx > 0 && segments[fn_idx].starts_with("{{") {
        fn_idx -= 1;
    }

    let function = segments[fn_idx..].join("::");
    let type_name = fn_idx
        .checked_sub(1)
        .map(|idx| segments[idx])
        .filter(|seg| seg.chars().next().is_some_and(char::is_uppercase))
        .map(str::to_string);

    (type_name, non_empty(&function))
}

/// Parse the rendered form of [`std::backtrace::Backtrace`]:
///
/// ```text
///    3: my_app::orders::OrderService::submit
///              at ./src/orders.rs:42:9
/// ```
pub fn parse_backtrace(rendered: &str) -> Vec<CallFrame> {
    let mut frames: Vec<CallFrame> = Vec::new();

    for line in rendered.lines() {
        let trimmed = line.trim();

        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                apply_location(frame, location);
            }
            continue;
        }

        if let Some((index, symbol)) = trimmed.split_once(": ") {
            if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
                frames.push(CallFrame::from_symbol(symbol));
            }
        }
    }

    frames
}

fn apply_location(frame: &mut CallFrame, location: &str) {
    let mut parts = location.rsplitn(3, ':');
    let column = parts.next().and_then(|s| s.parse().ok());
    let line = parts.next().and_then(|s| s.parse().ok());

    match (parts.next(), line, column) {
        (Some(file), Some(line), Some(column)) => {
            frame.file = Some(file.to_string());
            frame.line = Some(line);
            frame.column = Some(column);
        }
        _ => frame.file = Some(location.to_string()),
    }
}

/// Source of call stacks
pub trait StackCapture: Send + Sync {
    /// Capture the current stack, innermost frame first
    fn capture(&self) -> Vec<CallFrame>;
}

/// Captures the stack with `std::backtrace`, regardless of `RUST_BACKTRACE`
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceCapture;

impl StackCapture for BacktraceCapture {
    fn capture(&self) -> Vec<CallFrame> {
        parse_backtrace(&Backtrace::force_capture().to_string())
    }
}

/// Files and module paths that make up one logical source unit
///
/// Files are compared whole path component by whole path component: a unit
/// file `src/core/logger.rs` matches `./src/core/logger.rs` and
/// `/work/app/src/core/logger.rs`, never `/work/app/metasrc/core/logger.rs`. Absolute unit
/// files only match that exact file, with relative frame paths resolved
/// against the working directory the unit was created in.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    files: Vec<PathBuf>,
    modules: Vec<String>,
    cwd: Option<PathBuf>,
}

impl SourceUnit {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            modules: Vec::new(),
            cwd: std::env::current_dir().ok(),
        }
    }

    #[must_use]
    pub fn file(mut self, file: &str) -> Self {
        self.files.push(normalize_path(file));
        self
    }

    /// A file of the crate rooted at `root`, as reported by `file!()`
    #[must_use]
    pub fn crate_file(self, root: &str, file: &str) -> Self {
        let path = Path::new(file);
        if path.is_absolute() {
            self.file(file)
        } else {
            let joined = Path::new(root).join(path);
            self.file(&joined.to_string_lossy())
        }
    }

    #[must_use]
    pub fn module(mut self, module: &str) -> Self {
        self.modules.push(module.to_string());
        self
    }

    /// Whether `frame` belongs to this unit or to the stack-capture runtime
    pub fn contains(&self, frame: &CallFrame) -> bool {
        if let Some(symbol) = frame.symbol.as_deref() {
            let symbol = symbol.trim_start_matches('<');
            if RUNTIME_PREFIXES.iter().any(|p| symbol.starts_with(p)) {
                return true;
            }
            if self.modules.iter().any(|m| in_module(symbol, m)) {
                return true;
            }
        }

        match frame.file.as_deref() {
            Some(file) => {
                let file = normalize_path(file);
                self.files.iter().any(|own| self.same_file(&file, own))
            }
            None => false,
        }
    }

    fn same_file(&self, frame_file: &Path, own: &Path) -> bool {
        match (own.is_absolute(), frame_file.is_absolute()) {
            (true, true) => frame_file == own,
            (true, false) => self
                .cwd
                .as_ref()
                .is_some_and(|cwd| cwd.join(frame_file) == own),
            // Path::ends_with compares whole components
            (false, _) => frame_file.ends_with(own),
        }
    }
}

impl Default for SourceUnit {
    fn default() -> Self {
        Self::new()
    }
}

/// `module` itself or one of its submodules and items
fn in_module(symbol: &str, module: &str) -> bool {
    symbol
        .strip_prefix(module)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

fn normalize_path(path: &str) -> PathBuf {
    let path = path.replace('\\', "/");
    Path::new(&path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Index of the first frame that has a file and lies outside `unit`
pub fn first_external(frames: &[CallFrame], unit: &SourceUnit) -> Option<usize> {
    frames
        .iter()
        .position(|frame| frame.file.is_some() && !unit.contains(frame))
}

/// Resolves the frame a log call should be attributed to
#[derive(Clone)]
pub struct CallSiteResolver {
    capture: Option<Arc<dyn StackCapture>>,
    unit: SourceUnit,
}

impl CallSiteResolver {
    pub fn new(capture: Arc<dyn StackCapture>, unit: SourceUnit) -> Self {
        Self {
            capture: Some(capture),
            unit,
        }
    }

    /// Resolver that never captures and always reports the tracked caller location
    pub fn location_only(unit: SourceUnit) -> Self {
        Self {
            capture: None,
            unit,
        }
    }

    pub fn unit(&self) -> &SourceUnit {
        &self.unit
    }

    fn frames(&self) -> Vec<CallFrame> {
        // no combinators here: their frames would sit between us and the caller
        match &self.capture {
            Some(capture) => capture.capture(),
            None => Vec::new(),
        }
    }

    /// First frame outside the engine, or `fallback` when none qualifies
    pub fn resolve(&self, fallback: &Location<'_>) -> CallFrame {
        let mut frames = self.frames();
        match first_external(&frames, &self.unit) {
            Some(idx) => frames.swap_remove(idx),
            None => CallFrame::from_location(fallback),
        }
    }

    /// Frames from the first external frame through the stack top
    pub fn resolve_full_trace(&self, fallback: &Location<'_>) -> Vec<CallFrame> {
        let mut frames = self.frames();
        match first_external(&frames, &self.unit) {
            Some(idx) => frames.split_off(idx),
            None => vec![CallFrame::from_location(fallback)],
        }
    }
}

impl fmt::Debug for CallSiteResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSiteResolver")
            .field("capture", &self.capture.is_some())
            .field("unit", &self.unit)
            .finish()
    }
}
