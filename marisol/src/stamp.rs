//! Merging rendered surfaces onto existing pages.
//!
//! The page's existing content streams are kept untouched and wrapped in a
//! `q`/`Q` pair, so whatever graphics state they leave behind cannot move or
//! recolor the overlay drawn after them.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::canvas::{FONT_NAME, Surface};
use crate::error::{MarisolError, Result};

/// Parent chain depth after which inherited attributes are no longer searched.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Find `key` on a page, following the page tree's `Parent` links.
///
/// References are resolved, so the returned object is never an
/// [`Object::Reference`] unless it points at another reference.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(resolve(doc, value).clone());
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Merges surfaces onto pages of one document.
#[derive(Debug, Clone, Copy)]
pub struct Stamper {
    font_id: ObjectId,
}

impl Stamper {
    /// Register the overlay font in `doc`.
    pub fn new(doc: &mut Document) -> Self {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        Self { font_id }
    }

    /// Object id of the registered font.
    pub fn font_id(&self) -> ObjectId {
        self.font_id
    }

    /// Draw `surface` over the page `page_id`.
    ///
    /// `label` identifies the page in errors.
    pub fn merge(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        surface: Surface,
        label: &str,
    ) -> Result<()> {
        if surface.is_empty() {
            return Ok(());
        }

        let page = doc
            .get_dictionary(page_id)
            .map_err(|e| MarisolError::render_failed(label, e.to_string()))?;

        let mut contents = match page.get(b"Contents") {
            Ok(Object::Reference(id)) => match doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(items)) => items.clone(),
            Ok(other) => {
                return Err(MarisolError::render_failed(
                    label,
                    format!("unsupported /Contents entry: {}", other.enum_variant()),
                ));
            }
            Err(_) => Vec::new(),
        };

        let resources = self.resources_with_font(doc, page_id);

        // Streams are concatenated as-is; the leading newline keeps `Q` a
        // separate token when the last stream ends without whitespace.
        let mut overlay = b"\nQ\n".to_vec();
        overlay.extend_from_slice(&surface.content);

        let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let close = doc.add_object(Stream::new(Dictionary::new(), overlay));
        contents.insert(0, Object::Reference(open));
        contents.push(Object::Reference(close));

        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| MarisolError::render_failed(label, e.to_string()))?;
        page.set("Contents", Object::Array(contents));
        page.set("Resources", Object::Dictionary(resources));

        Ok(())
    }

    /// The page's effective resources with the overlay font added.
    fn resources_with_font(&self, doc: &Document, page_id: ObjectId) -> Dictionary {
        let mut resources = inherited_attribute(doc, page_id, b"Resources")
            .and_then(|object| object.as_dict().ok().cloned())
            .unwrap_or_default();

        let mut fonts = resources
            .get(b"Font")
            .map(|object| resolve(doc, object))
            .and_then(Object::as_dict)
            .cloned()
            .unwrap_or_default();
        fonts.set(FONT_NAME, Object::Reference(self.font_id));
        resources.set("Font", Object::Dictionary(fonts));
        resources
    }
}
