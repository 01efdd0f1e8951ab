use crate::error::SplitError;
use crate::geometry::BoundingBox;
use crate::layout::SourcePage;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

// Guards against cyclic /Parent chains in broken files.
const MAX_TREE_DEPTH: usize = 64;

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    /// Read the whole file into memory and parse it. The file handle is closed
    /// before parsing starts.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SplitError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SplitError::FileNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|e| SplitError::read(path, e))?;
        Self::from_bytes(&bytes, path)
    }

    pub fn from_bytes<P: Into<PathBuf>>(bytes: &[u8], path: P) -> Result<Self, SplitError> {
        let path = path.into();
        let doc = Document::load_mem(bytes).map_err(|e| SplitError::read(&path, e))?;
        Ok(PdfDocument { doc, path })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Look up a page attribute, walking up the page tree if the page itself
    /// doesn't carry it. References are left unresolved.
    pub fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = self.doc.get_dictionary(page_id).ok()?;

        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = current.get(key) {
                return Some(value);
            }
            let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
            current = self.doc.get_dictionary(parent).ok()?;
        }

        None
    }

    /// The page dictionary with every inheritable attribute copied in.
    pub fn flattened_page(&self, page_id: ObjectId) -> Result<Dictionary, SplitError> {
        let mut dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| SplitError::read(&self.path, e))?
            .clone();

        for key in INHERITABLE_KEYS {
            if !dict.has(key) {
                if let Some(value) = self.inherited_attribute(page_id, key) {
                    dict.set(key, value.clone());
                }
            }
        }

        Ok(dict)
    }

    pub fn media_box(&self, page_num: u32, page_id: ObjectId) -> Result<MediaBox, SplitError> {
        let bad = |reason: String| {
            SplitError::read(&self.path, format!("page {} {}", page_num, reason))
        };

        let value = self
            .inherited_attribute(page_id, b"MediaBox")
            .ok_or_else(|| bad("has no MediaBox".to_string()))?;

        let coords: Vec<f64> = self
            .resolve_ref(value)
            .as_array()
            .map_err(|e| bad(format!("MediaBox: {}", e)))?
            .iter()
            .map(|obj| self.resolve_ref(obj).as_float().map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(|e| bad(format!("MediaBox: {}", e)))?;

        match coords.as_slice() {
            [x0, y0, x1, y1] => MediaBox::from_corners(*x0, *y0, *x1, *y1)
                .ok_or_else(|| bad(format!("has an empty MediaBox {:?}", coords))),
            _ => Err(bad(format!("MediaBox has {} entries, expected 4", coords.len()))),
        }
    }

    /// Pages in document order. Only pages in `measure` have their MediaBox
    /// read; the rest are copied untouched, so their boxes may be anything.
    pub fn source_pages(&self, measure: &BTreeSet<u32>) -> Result<Vec<SourcePage>, SplitError> {
        self.page_ids()
            .into_iter()
            .map(|(number, id)| {
                let bbox = if measure.contains(&number) {
                    Some(self.media_box(number, id)?.bbox)
                } else {
                    None
                };
                Ok(SourcePage { number, bbox })
            })
            .collect()
    }

    /// Every page's size, in document order. Fails on the first unusable box.
    pub fn page_sizes(&self) -> Result<Vec<(u32, BoundingBox)>, SplitError> {
        self.page_ids()
            .into_iter()
            .map(|(number, id)| Ok((number, self.media_box(number, id)?.bbox)))
            .collect()
    }

    fn resolve_ref<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// Serialize a document into memory.
    pub fn to_bytes<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<Vec<u8>, SplitError> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| SplitError::write(path.as_ref(), e))?;
        Ok(buffer)
    }

    /// Serialize fully, then write the file in one go, so an existing file at
    /// `path` is only replaced once serialization has succeeded.
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<u64, SplitError> {
        let path = path.as_ref();
        let bytes = Self::to_bytes(doc, path)?;
        std::fs::write(path, &bytes).map_err(|e| SplitError::write(path, e))?;
        Ok(bytes.len() as u64)
    }
}

/// A page's MediaBox, normalized so the first corner is the lower-left one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub llx: f64,
    pub lly: f64,
    pub bbox: BoundingBox,
}

impl MediaBox {
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Option<Self> {
        let bbox = BoundingBox::new((x1 - x0).abs(), (y1 - y0).abs())?;
        Some(MediaBox {
            llx: x0.min(x1),
            lly: y0.min(y1),
            bbox,
        })
    }
}
