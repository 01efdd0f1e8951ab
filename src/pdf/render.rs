use crate::error::SplitError;
use crate::geometry::CropRectangle;
use crate::layout::{Half, OutputPage};
use crate::pdf::PdfDocument;
use lopdf::{Document, Object, ObjectId};
use std::collections::HashMap;
use tracing::debug;

fn crop_box_object(rect: &CropRectangle) -> Object {
    Object::Array(vec![
        Object::Real(rect.x0 as f32),
        Object::Real(rect.y0 as f32),
        Object::Real(rect.x1 as f32),
        Object::Real(rect.y1 as f32),
    ])
}

/// Build the output document described by `layout`.
///
/// The page tree is flattened into the root `Pages` node, so inheritable
/// attributes are copied into every emitted page first. The first half of a
/// split page keeps the source page's object id (outline entries and links
/// still land on it); the second half is a new object sharing the same
/// content streams and resources.
pub fn render(source: &PdfDocument, layout: &[OutputPage]) -> Result<Document, SplitError> {
    let mut doc = source.doc.clone();

    let pages_root = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| SplitError::read(&source.path, format!("no page tree: {}", e)))?;

    let page_ids: HashMap<u32, ObjectId> = source.page_ids().into_iter().collect();
    let mut kids = Vec::with_capacity(layout.len());

    for out in layout {
        let page_id = *page_ids.get(&out.source).ok_or_else(|| {
            SplitError::read(&source.path, format!("page {} does not exist", out.source))
        })?;

        let mut page = source.flattened_page(page_id)?;
        page.set("Parent", Object::Reference(pages_root));

        let target_id = match (out.half, out.crop) {
            (Some(half), Some(crop)) => {
                let media_box = source.media_box(out.source, page_id)?;
                let crop = crop.translated(media_box.llx, media_box.lly);
                debug!(
                    "Page {} {:?} half: CropBox [{} {} {} {}] ({} x {})",
                    out.source,
                    half,
                    crop.x0,
                    crop.y0,
                    crop.x1,
                    crop.y1,
                    crop.width(),
                    crop.height()
                );
                page.set("CropBox", crop_box_object(&crop));

                match half {
                    Half::First => {
                        doc.objects.insert(page_id, Object::Dictionary(page));
                        page_id
                    }
                    Half::Second => doc.add_object(page),
                }
            }
            _ => {
                doc.objects.insert(page_id, Object::Dictionary(page));
                page_id
            }
        };

        kids.push(Object::Reference(target_id));
    }

    let count = kids.len() as i64;
    let root = doc
        .get_dictionary_mut(pages_root)
        .map_err(|e| SplitError::read(&source.path, format!("page tree root: {}", e)))?;
    root.set("Kids", Object::Array(kids));
    root.set("Count", Object::Integer(count));

    // Intermediate page-tree nodes are no longer referenced.
    let pruned = doc.prune_objects();
    debug!("Pruned {} unreachable objects", pruned.len());

    Ok(doc)
}
