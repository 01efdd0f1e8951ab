use crate::error::SplitError;
use std::collections::BTreeSet;
use std::fmt;

/// Which pages of a document should be split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSpec {
    /// Every page from `start` to `end` (or the last page), inclusive.
    Range { start: u32, end: Option<u32> },
    /// Inclusive `(first, last)` runs, usually parsed from a string like
    /// "1,3-5,7". Sorted, with overlapping and adjacent runs merged.
    ExplicitSet { ranges: Vec<(u32, u32)> },
}

impl PageSpec {
    /// Build a spec from the CLI/MCP inputs. An explicit page list wins over start/end.
    pub fn from_options(
        pages: Option<&str>,
        start: u32,
        end: Option<u32>,
    ) -> Result<Self, SplitError> {
        match pages {
            Some(list) => parse_page_set(list),
            None => Ok(PageSpec::Range { start, end }),
        }
    }
}

impl fmt::Display for PageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSpec::Range { start, end: Some(end) } => write!(f, "{}-{}", start, end),
            PageSpec::Range { start, end: None } => write!(f, "{}-end", start),
            PageSpec::ExplicitSet { ranges } => write!(f, "{}", format_runs(ranges)),
        }
    }
}

/// Non-fatal problems found while resolving a spec against a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionWarning {
    /// Requested pages `first..=last` are all past the end of the document.
    PageOutOfRange { first: u32, last: u32, total: u32 },
    EndBeforeStart { start: u32, end: u32 },
}

impl SelectionWarning {
    /// Number of requested pages this warning drops.
    pub fn dropped(&self) -> u64 {
        match self {
            SelectionWarning::PageOutOfRange { first, last, .. } => {
                u64::from(*last) - u64::from(*first) + 1
            }
            SelectionWarning::EndBeforeStart { .. } => 0,
        }
    }
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::PageOutOfRange { first, last, total } if first == last => write!(
                f,
                "Page {} exceeds total pages {}, ignoring it",
                first, total
            ),
            SelectionWarning::PageOutOfRange { first, last, total } => write!(
                f,
                "Pages {}-{} exceed total pages {}, ignoring them",
                first, last, total
            ),
            SelectionWarning::EndBeforeStart { start, end } => write!(
                f,
                "End page {} is before start page {}, no pages will be split",
                end, start
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub pages: BTreeSet<u32>,
    pub warnings: Vec<SelectionWarning>,
}

/// Parse a comma-separated page list like "1,3-5,7" into an explicit set.
///
/// Bounds against the document are not checked here; see [`resolve`].
/// Ranges are kept as bounds, so "1-4000000000" costs no more than "1-4".
pub fn parse_page_set(s: &str) -> Result<PageSpec, SplitError> {
    let mut ranges = Vec::new();

    for token in s.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }

        if let Some((start_str, end_str)) = token.split_once('-') {
            let start = parse_range_bound(token, start_str)?;
            let end = parse_range_bound(token, end_str)?;

            if start > end {
                return Err(SplitError::InvalidRange {
                    token: token.to_string(),
                    reason: format!("start {} is after end {}", start, end),
                });
            }

            ranges.push((start, end));
        } else {
            let page = token.parse::<u32>().map_err(|_| SplitError::InvalidPage {
                token: token.to_string(),
                reason: "not a number".to_string(),
            })?;

            if page == 0 {
                return Err(SplitError::InvalidPage {
                    token: token.to_string(),
                    reason: "page numbers must be >= 1".to_string(),
                });
            }

            ranges.push((page, page));
        }
    }

    Ok(PageSpec::ExplicitSet {
        ranges: merge_runs(ranges),
    })
}

fn parse_range_bound(token: &str, bound: &str) -> Result<u32, SplitError> {
    let value = bound.trim().parse::<u32>().map_err(|_| SplitError::InvalidRange {
        token: token.to_string(),
        reason: format!("'{}' is not a page number", bound.trim()),
    })?;

    if value == 0 {
        return Err(SplitError::InvalidRange {
            token: token.to_string(),
            reason: "page numbers must be >= 1".to_string(),
        });
    }

    Ok(value)
}

fn merge_runs(mut ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    ranges.sort_unstable();

    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn format_runs(ranges: &[(u32, u32)]) -> String {
    ranges
        .iter()
        .map(|&(first, last)| {
            if first == last {
                first.to_string()
            } else {
                format!("{}-{}", first, last)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Compact sorted page numbers into runs: `[1, 3, 4, 5]` -> "1,3-5".
pub fn format_pages<I: IntoIterator<Item = u32>>(pages: I) -> String {
    let runs = pages.into_iter().map(|p| (p, p)).collect();
    format_runs(&merge_runs(runs))
}

/// Resolve a spec against a document with `total_pages` pages.
///
/// Never fails: out-of-range explicit pages and inverted ranges become warnings.
/// Whether an empty result is acceptable is up to the caller.
pub fn resolve(total_pages: u32, spec: &PageSpec) -> Resolution {
    match spec {
        PageSpec::ExplicitSet { ranges } => {
            let mut resolution = Resolution::default();
            for &(first, last) in ranges {
                if first <= total_pages {
                    resolution.pages.extend(first..=last.min(total_pages));
                }
                if last > total_pages {
                    resolution.warnings.push(SelectionWarning::PageOutOfRange {
                        first: first.max(total_pages + 1),
                        last,
                        total: total_pages,
                    });
                }
            }
            resolution
        }
        PageSpec::Range { start, end } => {
            if let Some(end) = *end {
                if end < *start {
                    return Resolution {
                        pages: BTreeSet::new(),
                        warnings: vec![SelectionWarning::EndBeforeStart { start: *start, end }],
                    };
                }
            }

            let effective_end = end.map_or(total_pages, |e| e.min(total_pages));
            let start = (*start).max(1);

            Resolution {
                pages: (start..=effective_end).collect(),
                warnings: Vec::new(),
            }
        }
    }
}
