//! Root margin parsing
//!
//! `rootMargin` uses the CSS box shorthand: one to four whitespace separated
//! lengths, each in `px` or `%`. Percentages are kept raw and resolved against
//! the root rect when geometry is computed.

use std::fmt;
use std::str::FromStr;

use lookout_dom::DOMRect;

use crate::ObserverError;

/// One side of a root margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    Px(f64),
    Percent(f64),
}

impl MarginValue {
    /// Parse a single `<number>px` or `<number>%` token
    pub fn parse(token: &str) -> Result<Self, ObserverError> {
        let invalid = || ObserverError::InvalidMargin(token.to_string());

        let (number, unit): (&str, fn(f64) -> MarginValue) =
            if let Some(number) = token.strip_suffix("px") {
                (number, MarginValue::Px)
            } else if let Some(number) = token.strip_suffix('%') {
                (number, MarginValue::Percent)
            } else {
                return Err(invalid());
            };

        if !is_plain_number(number) {
            return Err(invalid());
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;
        // -0 prints as 0
        Ok(unit(if value == 0.0 { 0.0 } else { value }))
    }

    /// Resolve to pixels; percentages are taken of `reference`
    pub fn to_pixels(&self, reference: f64) -> f64 {
        match *self {
            MarginValue::Px(px) => px,
            MarginValue::Percent(pct) => reference * pct / 100.0,
        }
    }
}

/// `-?\d*\.?\d+`
fn is_plain_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => ("", digits),
    };
    !frac.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

impl Default for MarginValue {
    fn default() -> Self {
        MarginValue::Px(0.0)
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginValue::Px(px) => write!(f, "{}px", px),
            MarginValue::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

/// Four-sided root margin, always fully expanded
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    /// Parse a CSS-shorthand margin string. An empty string means `0px`.
    pub fn parse(margin: &str) -> Result<Self, ObserverError> {
        let values = margin
            .split_whitespace()
            .map(MarginValue::parse)
            .collect::<Result<Vec<_>, _>>()?;

        match values[..] {
            [] => Ok(Self::default()),
            [all] => Ok(Self { top: all, right: all, bottom: all, left: all }),
            [vertical, horizontal] => Ok(Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            }),
            [top, right, bottom, left] => Ok(Self { top, right, bottom, left }),
            _ => Err(ObserverError::InvalidMargin(margin.to_string())),
        }
    }

    /// Expand `rect` by this margin. Vertical sides resolve percentages
    /// against the rect's height, horizontal sides against its width.
    pub fn apply(&self, rect: &DOMRect) -> DOMRect {
        rect.outset(
            self.top.to_pixels(rect.height),
            self.right.to_pixels(rect.width),
            self.bottom.to_pixels(rect.height),
            self.left.to_pixels(rect.width),
        )
    }
}

impl FromStr for RootMargin {
    type Err = ObserverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}
