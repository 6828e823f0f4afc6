//! Requested and resolved (palette, scheme) pairs.
use std::fmt;

/// Wildcard label matching any palette or scheme.
pub const ANY: &str = "any";

/// Label asking for the value to be detected.
pub const AUTO: &str = "auto";

/// One side of a theme request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Let a [`SchemeDetector`] decide.
    Auto,
    /// A concrete label, including the wildcard [`ANY`].
    Label(String),
}

impl Selector {
    /// Parse a CLI value. Empty input and `auto` (any case) become [`Selector::Auto`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(AUTO) {
            Self::Auto
        } else {
            Self::Label(raw.to_string())
        }
    }

    /// The wildcard selector.
    #[must_use]
    pub fn any() -> Self {
        Self::Label(ANY.to_string())
    }

    fn resolve_with(&self, detect: impl FnOnce() -> String) -> String {
        match self {
            Self::Auto => detect(),
            Self::Label(label) => label.clone(),
        }
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str(AUTO),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Decides what `auto` means for palette and scheme.
pub trait SchemeDetector {
    /// Palette to use when the request says `auto`.
    fn palette(&self) -> String;
    /// Scheme to use when the request says `auto`.
    fn scheme(&self) -> String;
}

/// Detector that resolves `auto` to [`ANY`] on both sides.
#[derive(Debug, Default, Clone, Copy)]
pub struct WildcardDetector;

impl SchemeDetector for WildcardDetector {
    fn palette(&self) -> String {
        ANY.to_string()
    }

    fn scheme(&self) -> String {
        ANY.to_string()
    }
}

/// The (palette, scheme) pair asked for on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRequest {
    /// Requested palette.
    pub palette: Selector,
    /// Requested colour scheme.
    pub scheme: Selector,
}

impl ThemeRequest {
    /// Request built from raw CLI values.
    #[must_use]
    pub fn new(palette: impl Into<Selector>, scheme: impl Into<Selector>) -> Self {
        Self {
            palette: palette.into(),
            scheme: scheme.into(),
        }
    }

    /// Replace `auto` sides with what `detector` reports.
    #[must_use]
    pub fn resolve(&self, detector: &dyn SchemeDetector) -> ResolvedTheme {
        ResolvedTheme {
            palette: self.palette.resolve_with(|| detector.palette()),
            scheme: self.scheme.resolve_with(|| detector.scheme()),
        }
    }
}

/// A request with every `auto` replaced by a concrete label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    /// Palette label, or `any`.
    pub palette: String,
    /// Scheme label, or `any`.
    pub scheme: String,
}

impl ResolvedTheme {
    /// Theme with concrete labels.
    #[must_use]
    pub fn new(palette: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            palette: palette.into(),
            scheme: scheme.into(),
        }
    }

    /// Theme prefixes from least to most specific.
    ///
    /// `any-any < any-<scheme> < <palette>-any < <palette>-<scheme>`
    #[must_use]
    pub fn ladder(&self) -> [String; 4] {
        let Self { palette, scheme } = self;
        [
            format!("{ANY}-{ANY}"),
            format!("{ANY}-{scheme}"),
            format!("{palette}-{ANY}"),
            format!("{palette}-{scheme}"),
        ]
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.palette, self.scheme)
    }
}
