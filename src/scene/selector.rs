use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{LanderError, LanderResult};

/// One element test: optional tag plus required classes (`img.hero-img`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) classes: Vec<String>,
}

/// Descendant chain, outermost first (`.title h1` is `[.title, h1]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Chain {
    pub(crate) parts: Vec<Compound>,
}

/// Parsed CSS selector subset: tags, classes, compounds, descendant combinators and
/// comma-separated lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    pub(crate) chains: Vec<Chain>,
}

impl Selector {
    pub fn parse(s: &str) -> LanderResult<Self> {
        let source = s.trim().to_owned();
        if source.is_empty() {
            return Err(LanderError::selector("selector must be non-empty"));
        }
        let chains = source
            .split(',')
            .map(|alt| parse_chain(alt, &source))
            .collect::<LanderResult<Vec<_>>>()?;
        Ok(Self { source, chains })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = LanderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_chain(alt: &str, full: &str) -> LanderResult<Chain> {
    let parts = alt
        .split_whitespace()
        .map(|tok| parse_compound(tok, full))
        .collect::<LanderResult<Vec<_>>>()?;
    if parts.is_empty() {
        return Err(LanderError::selector(format!(
            "empty alternative in selector '{full}'"
        )));
    }
    Ok(Chain { parts })
}

fn parse_compound(tok: &str, full: &str) -> LanderResult<Compound> {
    let mut pieces = tok.split('.');
    let tag = match pieces.next() {
        Some("") => None,
        Some(t) if t == "*" => None,
        Some(t) => {
            check_ident(t, full)?;
            Some(t.to_owned())
        }
        None => None,
    };
    let classes = pieces
        .map(|c| {
            check_ident(c, full)?;
            Ok(c.to_owned())
        })
        .collect::<LanderResult<Vec<_>>>()?;
    Ok(Compound { tag, classes })
}

fn check_ident(s: &str, full: &str) -> LanderResult<()> {
    let ok = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(LanderError::selector(format!(
            "unsupported selector syntax '{s}' in '{full}'"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/selector.rs"]
mod tests;
