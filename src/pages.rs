//! Page-range specifications: `"2,5-10,15-"` → zero-based page indices.
//!
//! Operators write page numbers the way a PDF viewer shows them (1-based).
//! Everything past [`parse_page_ranges`] works with 0-based indices; the
//! conversion happens exactly once, on the parser's return value.

use crate::error::RenderError;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

/// One comma-separated token of a range string, still 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    /// A single page, e.g. `7`.
    Single(usize),
    /// An inclusive span, e.g. `5-10`. An elided endpoint has already been
    /// resolved to the document's page count.
    Span(usize, usize),
}

impl RangeToken {
    /// Parse one token against a document of `total_pages` pages.
    ///
    /// `spec` is the whole range string, used only for error messages.
    pub fn parse(token: &str, spec: &str, total_pages: usize) -> Result<Self, RenderError> {
        let token = token.trim();

        if !token.contains('-') {
            let page = parse_point(token, spec, token)?;
            return Ok(RangeToken::Single(page));
        }

        let points: Vec<&str> = token.split('-').collect();
        let [start, end] = points.as_slice() else {
            return Err(RenderError::malformed(
                token,
                spec,
                format!("expected 'start-end', found {} points", points.len()),
            ));
        };

        let resolve = |point: &str| -> Result<usize, RenderError> {
            let point = point.trim();
            if point.is_empty() {
                // Elided endpoint means "last page".
                Ok(total_pages)
            } else {
                parse_point(point, spec, token)
            }
        };

        let (start, end) = (resolve(*start)?, resolve(*end)?);
        if start == 0 {
            // Only reachable through an elided endpoint on an empty document.
            return Err(RenderError::malformed(token, spec, "document has no pages"));
        }
        if start > end {
            return Err(RenderError::malformed(
                token,
                spec,
                format!("start page {start} is after end page {end}"),
            ));
        }

        Ok(RangeToken::Span(start, end))
    }

    /// The 1-based page numbers this token selects.
    pub fn pages(&self) -> RangeInclusive<usize> {
        match *self {
            RangeToken::Single(p) => p..=p,
            RangeToken::Span(start, end) => start..=end,
        }
    }

    /// Split into the part a document of `total_pages` pages has and the
    /// part past its end.
    fn clamp(self, total_pages: usize) -> (Option<RangeInclusive<usize>>, Option<RangeToken>) {
        let (start, end) = self.pages().into_inner();
        let inside = (start <= total_pages).then(|| start..=end.min(total_pages));
        let beyond = (end > total_pages).then(|| {
            let from = start.max(total_pages + 1);
            if from == end {
                RangeToken::Single(end)
            } else {
                RangeToken::Span(from, end)
            }
        });
        (inside, beyond)
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeToken::Single(p) => write!(f, "{p}"),
            RangeToken::Span(start, end) => write!(f, "{start}-{end}"),
        }
    }
}

fn parse_point(point: &str, spec: &str, token: &str) -> Result<usize, RenderError> {
    let page: usize = point
        .parse()
        .map_err(|_| RenderError::malformed(token, spec, format!("'{point}' is not a page number")))?;

    if page == 0 {
        return Err(RenderError::malformed(
            token,
            spec,
            "pages are 1-indexed, minimum is 1",
        ));
    }

    Ok(page)
}

/// The pages an operator asked for, as ascending, deduplicated 0-based indices.
///
/// Requests past the end of the document are kept aside as 1-based tokens so
/// they can be reported without ever being enumerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilter {
    /// `None` selects every page.
    indices: Option<Vec<usize>>,
    beyond: Vec<RangeToken>,
}

impl PageFilter {
    /// A filter that selects every page.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from already zero-based indices.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let set: BTreeSet<usize> = indices.into_iter().collect();
        Self {
            indices: Some(set.into_iter().collect()),
            beyond: Vec::new(),
        }
    }

    /// Whether the zero-based page `index` should be processed.
    pub fn contains(&self, index: usize) -> bool {
        match &self.indices {
            None => true,
            Some(indices) => indices.binary_search(&index).is_ok(),
        }
    }

    /// The selected zero-based indices; empty for "all pages".
    pub fn indices(&self) -> &[usize] {
        self.indices.as_deref().unwrap_or(&[])
    }

    /// Requested pages the document does not have, 1-based, in request order.
    pub fn out_of_range(&self) -> &[RangeToken] {
        &self.beyond
    }
}

impl fmt::Display for PageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.indices {
            None => f.write_str("all"),
            Some(indices) if indices.is_empty() => f.write_str("none"),
            Some(indices) => {
                let shown: Vec<String> = indices.iter().map(|i| (i + 1).to_string()).collect();
                f.write_str(&shown.join(","))
            }
        }
    }
}

/// Compile a 1-based range string into a [`PageFilter`].
///
/// Tokens are comma separated. A token without `-` is one page; `a-b` is the
/// inclusive span; an empty endpoint means the last page, so `15-` is "page 15
/// to the end". Overlapping tokens are merged. Pages past `total_pages` are
/// not selected; they are listed by [`PageFilter::out_of_range`].
///
/// # Errors
/// [`RenderError::MalformedRangeSpec`] for a token with other than two points,
/// a non-integer point, page `0`, or a span whose start is after its end.
pub fn parse_page_ranges(spec: &str, total_pages: usize) -> Result<PageFilter, RenderError> {
    let mut pages = BTreeSet::new();
    let mut beyond = Vec::new();

    for token in spec.split(',') {
        let (inside, past_end) = RangeToken::parse(token, spec, total_pages)?.clamp(total_pages);
        if let Some(inside) = inside {
            pages.extend(inside);
        }
        beyond.extend(past_end);
    }

    Ok(PageFilter {
        indices: Some(pages.into_iter().map(|p| p - 1).collect()),
        beyond,
    })
}
