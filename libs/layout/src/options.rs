//! Options controlling pins and connections.

use geometry::span::Span;
use serde::{Deserialize, Serialize};

/// The portion of a wire that is labeled when it is exported as a pin.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PinMode {
    /// The entire wire.
    #[default]
    All,
    /// The lower half of the wire.
    Lower,
    /// The upper half of the wire.
    Upper,
    /// The middle half of the wire.
    Middle,
}

impl PinMode {
    /// The labeled portion of a wire spanning `span`.
    pub fn label_span(&self, span: Span) -> Span {
        let (lo, hi) = (span.start(), span.stop());
        let mid = span.center();
        match self {
            PinMode::All => span,
            PinMode::Lower => Span::new(lo, mid),
            PinMode::Upper => Span::new(mid, hi),
            PinMode::Middle => {
                let quarter = span.length() / 4;
                Span::new(lo + quarter, hi - quarter)
            }
        }
    }
}

/// How a wire shorter than its layer's minimum length is extended.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MinLenMode {
    /// Leave the wire as is.
    #[default]
    None,
    /// Keep the upper end fixed and extend toward lower coordinates.
    Lower,
    /// Keep the lower end fixed and extend toward upper coordinates.
    Upper,
    /// Extend both ends equally, keeping the center fixed.
    Middle,
}

impl MinLenMode {
    /// Extends `span` to at least `min_len`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::span::Span;
    /// # use layout::MinLenMode;
    /// let span = Span::new(100, 140);
    /// assert_eq!(MinLenMode::Lower.extend(span, 100), Span::new(40, 140));
    /// assert_eq!(MinLenMode::Middle.extend(span, 100), Span::new(70, 170));
    /// assert_eq!(MinLenMode::None.extend(span, 100), span);
    /// ```
    pub fn extend(&self, span: Span, min_len: i64) -> Span {
        if span.length() >= min_len {
            return span;
        }
        match self {
            MinLenMode::None => span,
            MinLenMode::Lower => Span::new(span.stop() - min_len, span.stop()),
            MinLenMode::Upper => Span::new(span.start(), span.start() + min_len),
            MinLenMode::Middle => {
                let lo = span.center() - min_len / 2;
                Span::new(lo, lo + min_len)
            }
        }
    }
}

/// A vertical direction in the layer stack.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward lower layers.
    Lower,
    /// Toward upper layers.
    Upper,
}

impl Direction {
    /// The layer offset for a step in this direction.
    #[inline]
    pub fn step(&self) -> i32 {
        match self {
            Direction::Lower => -1,
            Direction::Upper => 1,
        }
    }
}
