// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load a PDF with `lopdf` and report what is on each page:
// embedded images, their placement, any text layer, and the info dictionary.

use docuscan_core::error::DocuscanError;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

/// An image XObject referenced from a page's resources.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Resource name, e.g. `Im0`.
    pub name: String,
    pub width: i64,
    pub height: i64,
    pub filter: Option<String>,
    pub color_space: Option<String>,
    pub has_smask: bool,
    /// Raw (still encoded) stream bytes.
    pub data: Vec<u8>,
}

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

/// Read-only view over a PDF held in memory.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, DocuscanError> {
        let document = Document::load_mem(data).map_err(|err| {
            DocuscanError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object IDs in page order.
    fn page_ids(&self) -> Vec<ObjectId> {
        self.document.get_pages().into_values().collect()
    }

    /// Images referenced by each page, in page order.
    pub fn page_images(&self) -> Result<Vec<Vec<PageImage>>, DocuscanError> {
        self.page_ids()
            .into_iter()
            .map(|page_id| self.images_on_page(page_id))
            .collect()
    }

    fn images_on_page(&self, page_id: ObjectId) -> Result<Vec<PageImage>, DocuscanError> {
        let Some(resources) = self.page_resources(page_id)? else {
            return Ok(Vec::new());
        };
        let Ok(xobjects) = resources.get(b"XObject") else {
            return Ok(Vec::new());
        };
        let xobjects = self.resolve(xobjects)?.as_dict().map_err(pdf_err)?;

        let mut images = Vec::new();
        for (name, obj) in xobjects.iter() {
            let stream = self.resolve(obj)?.as_stream().map_err(pdf_err)?;
            let dict = &stream.dict;
            if name_of(dict, b"Subtype").as_deref() != Some("Image") {
                continue;
            }
            images.push(PageImage {
                name: String::from_utf8_lossy(name).into_owned(),
                width: dict.get(b"Width").and_then(Object::as_i64).unwrap_or(0),
                height: dict.get(b"Height").and_then(Object::as_i64).unwrap_or(0),
                filter: name_of(dict, b"Filter"),
                color_space: name_of(dict, b"ColorSpace"),
                has_smask: dict.has(b"SMask"),
                data: stream.content.clone(),
            });
        }
        Ok(images)
    }

    /// The `[width, height, x, y]` of every `cm` transform on each page, in
    /// page order. For pure-image pages this is where the image is drawn.
    pub fn page_placements(&self) -> Result<Vec<Vec<[f32; 4]>>, DocuscanError> {
        let mut out = Vec::new();
        for page_id in self.page_ids() {
            let content = self.page_content(page_id)?;
            let placements = content
                .operations
                .iter()
                .filter(|op| op.operator == "cm" && op.operands.len() == 6)
                .filter_map(|op| {
                    let n: Vec<f32> = op
                        .operands
                        .iter()
                        .filter_map(|o| o.as_float().ok())
                        .collect();
                    (n.len() == 6).then(|| [n[0], n[3], n[4], n[5]])
                })
                .collect();
            out.push(placements);
        }
        Ok(out)
    }

    /// Whether any page draws text or declares font resources.
    pub fn has_text_layer(&self) -> Result<bool, DocuscanError> {
        for page_id in self.page_ids() {
            let declares_fonts = self
                .page_resources(page_id)?
                .is_some_and(|resources| resources.has(b"Font"));
            if declares_fonts {
                return Ok(true);
            }
            let content = self.page_content(page_id)?;
            if content.operations.iter().any(|op| op.operator == "BT") {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Entries of the trailer's `/Info` dictionary.
    pub fn info(&self) -> Result<DocumentInfo, DocuscanError> {
        let Ok(info) = self.document.trailer.get(b"Info") else {
            return Ok(DocumentInfo::default());
        };
        let info = self.resolve(info)?.as_dict().map_err(pdf_err)?;
        Ok(DocumentInfo {
            title: text_of(info, b"Title"),
            author: text_of(info, b"Author"),
            subject: text_of(info, b"Subject"),
            creator: text_of(info, b"Creator"),
        })
    }

    // -- Helpers --------------------------------------------------------------

    fn page_resources(&self, page_id: ObjectId) -> Result<Option<&Dictionary>, DocuscanError> {
        let page = self.document.get_dictionary(page_id).map_err(pdf_err)?;
        match page.get(b"Resources") {
            Ok(obj) => Ok(Some(self.resolve(obj)?.as_dict().map_err(pdf_err)?)),
            Err(_) => Ok(None),
        }
    }

    fn page_content(&self, page_id: ObjectId) -> Result<Content, DocuscanError> {
        let bytes = self.document.get_page_content(page_id).map_err(pdf_err)?;
        Content::decode(&bytes).map_err(pdf_err)
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object, DocuscanError> {
        match obj {
            Object::Reference(id) => self.document.get_object(*id).map_err(pdf_err),
            other => Ok(other),
        }
    }
}

fn pdf_err(err: lopdf::Error) -> DocuscanError {
    DocuscanError::PdfError(err.to_string())
}

fn name_of(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise treated as UTF-8).
fn text_of(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let Object::String(bytes, _) = dict.get(key).ok()? else {
        return None;
    };
    match bytes.strip_prefix(&[0xFE_u8, 0xFF][..]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            Some(String::from_utf16_lossy(&units))
        }
        None => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}
