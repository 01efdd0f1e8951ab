//! In-memory PDFs for tests.

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, ObjectId, Stream};

fn media_box(width: i64, height: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(height),
    ])
}

fn font_resources(doc: &mut Document) -> ObjectId {
    let font = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]);
    let font_id = doc.add_object(font);
    doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]))
}

fn page_content(doc: &mut Document, number: u32) -> ObjectId {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    format!("Page {}", number).into_bytes(),
                    lopdf::StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()))
}

fn finish(mut doc: Document, pages_id: ObjectId) -> Vec<u8> {
    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A flat document of `num_pages` pages, each showing "Page N" and carrying
/// its own MediaBox and Resources.
pub fn build_test_pdf(num_pages: u32, width: i64, height: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let resources_id = font_resources(&mut doc);

    let mut page_ids = Vec::new();
    for i in 1..=num_pages {
        let content_id = page_content(&mut doc, i);
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", media_box(width, height)),
            ("Resources", Object::Reference(resources_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    finish(doc, pages_id)
}

/// Pages sit under an intermediate `Pages` node and inherit MediaBox and
/// Resources from the root.
pub fn build_test_pdf_with_inherited_box(num_pages: u32, width: i64, height: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let root_id = doc.new_object_id();
    let branch_id = doc.new_object_id();
    let resources_id = font_resources(&mut doc);

    let mut page_ids = Vec::new();
    for i in 1..=num_pages {
        let content_id = page_content(&mut doc, i);
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(branch_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let branch = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Parent", Object::Reference(root_id)),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(branch_id, Object::Dictionary(branch));

    let root = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        ("Kids", Object::Array(vec![Object::Reference(branch_id)])),
        ("MediaBox", media_box(width, height)),
        ("Resources", Object::Reference(resources_id)),
    ]);
    doc.objects.insert(root_id, Object::Dictionary(root));

    finish(doc, root_id)
}

/// Re-save `bytes` with page `page`'s own MediaBox replaced by `value`.
pub fn with_media_box(bytes: &[u8], page: u32, value: Object) -> Vec<u8> {
    let mut doc = Document::load_mem(bytes).unwrap();
    let id = doc.get_pages()[&page];
    doc.get_dictionary_mut(id).unwrap().set("MediaBox", value);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// The text drawn on a page, e.g. "Page 3".
pub fn page_label(doc: &Document, page_id: ObjectId) -> String {
    let content = doc.get_page_content(page_id).unwrap();
    let text = String::from_utf8_lossy(&content);
    let start = text.find("(Page ").unwrap() + 1;
    let end = start + text[start..].find(')').unwrap();
    text[start..end].to_string()
}

/// The page's own /CropBox, if any.
pub fn crop_box(doc: &Document, page_id: ObjectId) -> Option<Vec<f32>> {
    let page = doc.get_dictionary(page_id).unwrap();
    let arr = page.get(b"CropBox").ok()?.as_array().unwrap();
    Some(arr.iter().map(|o| o.as_float().unwrap()).collect())
}
