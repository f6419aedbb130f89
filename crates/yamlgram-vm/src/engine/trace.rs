//! Tracing hooks for the interpreter.
//!
//! [`NoopTracer`] has `#[inline(always)]` empty hooks, so the untraced entry
//! points compile to the same code as an interpreter without tracing.
//! [`PrintTracer`] collects one indented line per event for `yamlgram trace`.

use std::ops::Range;

use yamlgram_core::{Colors, Parameters};

use super::tree::escape_string;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Enter, success and failure lines.
    #[default]
    Default,
    /// Also matched text and cache hits.
    Verbose,
    /// Also the parameters on success and failure lines.
    VeryVerbose,
}

/// Interpreter instrumentation, called around every production invocation.
pub trait Tracer {
    /// A production is about to be evaluated.
    fn trace_enter(&mut self, name: &str, params: &Parameters, offset: usize);

    /// The production matched `range`.
    fn trace_success(&mut self, name: &str, params: &Parameters, range: Range<usize>);

    /// The production did not match at `offset`.
    fn trace_failure(&mut self, name: &str, params: &Parameters, offset: usize);

    /// The call failed before at this offset and was skipped.
    fn trace_cache_hit(&mut self, name: &str, params: &Parameters, offset: usize);

    /// An unbounded repetition inside `production` matched zero width and stopped.
    fn trace_zero_width_repeat(&mut self, production: &str, offset: usize);
}

pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _name: &str, _params: &Parameters, _offset: usize) {}

    #[inline(always)]
    fn trace_success(&mut self, _name: &str, _params: &Parameters, _range: Range<usize>) {}

    #[inline(always)]
    fn trace_failure(&mut self, _name: &str, _params: &Parameters, _offset: usize) {}

    #[inline(always)]
    fn trace_cache_hit(&mut self, _name: &str, _params: &Parameters, _offset: usize) {}

    #[inline(always)]
    fn trace_zero_width_repeat(&mut self, _production: &str, _offset: usize) {}
}

/// Matched text longer than this is cut with an ellipsis.
const TEXT_BUDGET: usize = 32;

/// Tracer that collects a readable call trace.
pub struct PrintTracer<'s> {
    source: &'s str,
    verbosity: Verbosity,
    lines: Vec<String>,
    depth: usize,
    colors: Colors,
}

pub struct PrintTracerBuilder<'s> {
    source: &'s str,
    verbosity: Verbosity,
    colored: bool,
}

impl<'s> PrintTracerBuilder<'s> {
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn build(self) -> PrintTracer<'s> {
        PrintTracer {
            source: self.source,
            verbosity: self.verbosity,
            lines: Vec::new(),
            depth: 0,
            colors: Colors::new(self.colored),
        }
    }
}

impl<'s> PrintTracer<'s> {
    pub fn builder(source: &'s str) -> PrintTracerBuilder<'s> {
        PrintTracerBuilder {
            source,
            verbosity: Verbosity::Default,
            colored: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn push(&mut self, line: String) {
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{indent}{line}"));
    }

    fn format_params(&self, params: &Parameters) -> String {
        let c = self.colors;
        if params.is_empty() {
            String::new()
        } else {
            format!("{}{params}{}", c.muted, c.reset)
        }
    }

    fn format_text(&self, range: Range<usize>) -> String {
        let c = self.colors;
        let text = self.source.get(range).unwrap_or_default();
        let truncated = if text.chars().count() <= TEXT_BUDGET {
            escape_string(text)
        } else {
            let head: String = text.chars().take(TEXT_BUDGET - 1).collect();
            format!("{}…", escape_string(&head))
        };
        format!(" {}\"{truncated}\"{}", c.matched, c.reset)
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_enter(&mut self, name: &str, params: &Parameters, offset: usize) {
        let c = self.colors;
        let params = self.format_params(params);
        self.push(format!("{}{name}{}{params} @{offset}", c.production, c.reset));
        self.depth += 1;
    }

    fn trace_success(&mut self, name: &str, params: &Parameters, range: Range<usize>) {
        self.depth = self.depth.saturating_sub(1);
        let c = self.colors;
        let params = if self.verbosity == Verbosity::VeryVerbose {
            self.format_params(params)
        } else {
            String::new()
        };
        let text = if self.verbosity == Verbosity::Default {
            String::new()
        } else {
            self.format_text(range.clone())
        };
        self.push(format!(
            "{}✓{} {name}{params} {}..{}{text}",
            c.matched, c.reset, range.start, range.end
        ));
    }

    fn trace_failure(&mut self, name: &str, params: &Parameters, offset: usize) {
        self.depth = self.depth.saturating_sub(1);
        let c = self.colors;
        let params = if self.verbosity == Verbosity::VeryVerbose {
            self.format_params(params)
        } else {
            String::new()
        };
        self.push(format!("{}✗{} {name}{params} @{offset}", c.failed, c.reset));
    }

    fn trace_cache_hit(&mut self, name: &str, params: &Parameters, offset: usize) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let c = self.colors;
        let params = self.format_params(params);
        self.push(format!(
            "{}~ {name}{params} @{offset} (known failure){}",
            c.muted, c.reset
        ));
    }

    fn trace_zero_width_repeat(&mut self, production: &str, offset: usize) {
        let c = self.colors;
        self.push(format!(
            "{}!{} zero-width repetition in {production} @{offset}",
            c.failed, c.reset
        ));
    }
}
