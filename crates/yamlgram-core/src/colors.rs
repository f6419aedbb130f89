//! Terminal palette shared by parse trees, traces and the CLI.

/// Escape sequences keyed by what they mark rather than by hue.
///
/// A disabled palette holds empty strings, so output code can interpolate
/// the fields without checking.
#[derive(Clone, Copy, Debug, Default)]
pub struct Colors {
    /// Production names (blue).
    pub production: &'static str,
    /// Matched input text (green).
    pub matched: &'static str,
    /// Failed calls and errors (red).
    pub failed: &'static str,
    /// Spans, parameters and bookkeeping (dim).
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::default();
        }
        Self {
            production: "\x1b[34m",
            matched: "\x1b[32m",
            failed: "\x1b[31m",
            muted: "\x1b[2m",
            reset: "\x1b[0m",
        }
    }
}
