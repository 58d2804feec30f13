//! lopdf backed document access.

use std::io::Read;
use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use solde_core::{ExtractError, Result};

use crate::graph::{GraphNode, NodeKind, PageSource};

/// Indirect references are followed at most this deep.
const MAX_REFERENCE_CHAIN: usize = 32;

/// A loaded PDF document
pub struct PdfDocument {
    doc: Document,
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)
            .map_err(|e| ExtractError::Document(format!("opening {}: {e}", path.display())))?;
        Ok(Self::from_document(doc))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Document(e.to_string()))?;
        Ok(Self::from_document(doc))
    }

    pub fn from_document(doc: Document) -> Self {
        let pages = doc.get_pages().into_values().collect();
        Self { doc, pages }
    }
}

impl PageSource for PdfDocument {
    type Node<'a>
        = PdfNode<'a>
    where
        Self: 'a;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PdfNode<'_>> {
        let id = self
            .pages
            .get(index)
            .ok_or_else(|| ExtractError::Document(format!("no page {index}")))?;
        let object = self
            .doc
            .get_object(*id)
            .map_err(|e| ExtractError::Document(format!("page {index} object {id:?}: {e}")))?;
        Ok(PdfNode::resolve(&self.doc, object))
    }
}

/// A resolved object of a [`PdfDocument`].
#[derive(Clone, Copy)]
pub struct PdfNode<'a> {
    doc: &'a Document,
    object: &'a Object,
}

impl<'a> PdfNode<'a> {
    /// Follow indirect references. Dangling ones are kept as scalars.
    fn resolve(doc: &'a Document, mut object: &'a Object) -> Self {
        for _ in 0..MAX_REFERENCE_CHAIN {
            let Object::Reference(id) = object else {
                break;
            };
            match doc.get_object(*id) {
                Ok(target) => object = target,
                Err(_) => break,
            }
        }
        Self { doc, object }
    }

    /// Objects live in the document for the lifetime of the node, so their
    /// address identifies them.
    fn identity(&self) -> usize {
        std::ptr::from_ref(self.object) as usize
    }

    fn child(&self, object: &'a Object) -> (usize, Self) {
        let node = Self::resolve(self.doc, object);
        (node.identity(), node)
    }

    fn dictionary(&self) -> Option<&'a lopdf::Dictionary> {
        match self.object {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }
}

impl<'a> GraphNode for PdfNode<'a> {
    type Id = usize;

    fn kind(&self) -> NodeKind {
        match self.object {
            Object::Dictionary(_) => NodeKind::Dictionary,
            Object::Array(_) => NodeKind::Array,
            Object::Stream(_) => NodeKind::Stream,
            _ => NodeKind::Scalar,
        }
    }

    /// Keys are visited in sorted order. The page tree `Parent` link is left
    /// out so that walking a page never reaches its siblings.
    fn entries(&self) -> Vec<(usize, Self)> {
        match self.object {
            Object::Dictionary(d) => {
                let mut items: Vec<(&Vec<u8>, &Object)> =
                    d.iter().filter(|(k, _)| k.as_slice() != b"Parent").collect();
                items.sort_by(|a, b| a.0.cmp(b.0));
                items.into_iter().map(|(_, v)| self.child(v)).collect()
            }
            Object::Array(items) => items.iter().map(|v| self.child(v)).collect(),
            _ => Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<Self> {
        let value = self.dictionary()?.get(key.as_bytes()).ok()?;
        Some(Self::resolve(self.doc, value))
    }

    fn name(&self) -> Option<String> {
        match self.object {
            Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
            _ => None,
        }
    }

    fn filters(&self) -> Vec<String> {
        let Some(filter) = self.get("Filter") else {
            return Vec::new();
        };
        match filter.object {
            Object::Array(items) => items
                .iter()
                .filter_map(|item| Self::resolve(self.doc, item).name())
                .collect(),
            _ => filter.name().into_iter().collect(),
        }
    }

    fn raw_bytes(&self) -> Option<Box<dyn Read + '_>> {
        match self.object {
            Object::Stream(s) => Some(Box::new(s.content.as_slice())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Dictionary, Stream, dictionary};

    fn two_page_document() -> PdfDocument {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_a = doc.add_object(Stream::new(dictionary! {}, b"BT ET".to_vec()));
        let content_b = doc.add_object(Stream::new(
            dictionary! { "Filter" => vec![Object::Name(b"FlateDecode".to_vec())] },
            Vec::new(),
        ));
        let page_a = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_a,
        });
        let page_b = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_b,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_a), Object::Reference(page_b)],
                "Count" => Object::Integer(2),
            }),
        );
        let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog);
        PdfDocument::from_document(doc)
    }

    #[test]
    fn test_pages() {
        let doc = two_page_document();
        assert_eq!(doc.page_count(), 2);
        let page = doc.page(0).unwrap();
        assert_eq!(page.kind(), NodeKind::Dictionary);
        assert_eq!(page.get("Type").and_then(|t| t.name()).as_deref(), Some("Page"));
        assert!(doc.page(2).is_err());
    }

    #[test]
    fn test_entries_skip_parent_and_resolve_references() {
        let doc = two_page_document();
        let page = doc.page(0).unwrap();
        let kinds: Vec<NodeKind> = page.entries().iter().map(|(_, n)| n.kind()).collect();
        // Contents, Type
        assert_eq!(kinds, vec![NodeKind::Stream, NodeKind::Scalar]);
    }

    #[test]
    fn test_stream_access() {
        let doc = two_page_document();
        let first = doc.page(0).unwrap().get("Contents").unwrap();
        assert!(first.filters().is_empty());
        let mut raw = Vec::new();
        first.raw_bytes().unwrap().read_to_end(&mut raw).unwrap();
        assert_eq!(raw, b"BT ET");

        let second = doc.page(1).unwrap().get("Contents").unwrap();
        assert_eq!(second.filters(), vec!["FlateDecode".to_string()]);
    }

    #[test]
    fn test_identity_is_stable() {
        let doc = two_page_document();
        let a = doc.page(0).unwrap().entries();
        let b = doc.page(0).unwrap().entries();
        assert_eq!(a[0].0, b[0].0);
        assert_ne!(a[0].0, a[1].0);
    }

    #[test]
    fn test_single_filter_name() {
        let mut doc = Document::with_version("1.5");
        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        let id = doc.add_object(Stream::new(dict, Vec::new()));
        let object = doc.get_object(id).unwrap();
        let node = PdfNode::resolve(&doc, object);
        assert_eq!(node.filters(), vec!["FlateDecode".to_string()]);
    }

    #[test]
    fn test_open_missing_file() {
        let err = PdfDocument::open("/nonexistent/statement.pdf").err().unwrap();
        assert!(matches!(err, ExtractError::Document(_)));
    }
}
