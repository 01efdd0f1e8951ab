use crate::geometry::{split_box, BoundingBox, CropRectangle, SplitDirection};
use serde::Serialize;
use std::collections::BTreeSet;

/// What the assembler needs to know about a source page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourcePage {
    /// 1-based page number
    pub number: u32,
    /// Only measured for pages that will be split.
    pub bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    First,
    Second,
}

/// One page of the output document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputPage {
    pub source: u32,
    pub half: Option<Half>,
    /// `None` means the source page is copied as-is.
    pub crop: Option<CropRectangle>,
}

impl OutputPage {
    pub fn unchanged(source: u32) -> Self {
        OutputPage {
            source,
            half: None,
            crop: None,
        }
    }

    pub fn is_split(&self) -> bool {
        self.half.is_some()
    }
}

/// Walk the source pages in order, replacing every page in `split_set` by its
/// two halves and passing everything else through.
///
/// A selected page without a measured box cannot be cut and is passed through.
pub fn assemble(
    source_pages: &[SourcePage],
    split_set: &BTreeSet<u32>,
    direction: SplitDirection,
) -> Vec<OutputPage> {
    let mut output = Vec::with_capacity(source_pages.len() + split_set.len());

    for page in source_pages {
        let bbox = page.bbox.filter(|_| split_set.contains(&page.number));
        if let Some(bbox) = bbox {
            let (first, second) = split_box(bbox, direction);
            output.push(OutputPage {
                source: page.number,
                half: Some(Half::First),
                crop: Some(first),
            });
            output.push(OutputPage {
                source: page.number,
                half: Some(Half::Second),
                crop: Some(second),
            });
        } else {
            output.push(OutputPage::unchanged(page.number));
        }
    }

    output
}

/// Number of pages the output will have: every page once, split pages twice.
pub fn output_page_count(total_pages: u32, split_set: &BTreeSet<u32>) -> u32 {
    total_pages + split_set.len() as u32
}
