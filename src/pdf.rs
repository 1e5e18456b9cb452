//! Page concatenation for PDF documents.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::errors::{CutoutError, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `Parent` links in malformed files.
const MAX_TREE_DEPTH: usize = 64;

const DEFAULT_VERSION: &str = "1.5";

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub documents: usize,
    pub pages: usize,
    pub output: PathBuf,
}

#[derive(Debug, Default, Clone)]
pub struct PdfMerger {
    show_progress: bool,
}

impl PdfMerger {
    pub const fn new() -> Self {
        Self {
            show_progress: false,
        }
    }

    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Loads every input in order, merges them and writes `output`.
    ///
    /// Nothing is written unless all inputs load.
    pub fn merge_files<P: AsRef<Path>>(&self, inputs: &[P], output: &Path) -> Result<MergeSummary> {
        if inputs.is_empty() {
            return Err(CutoutError::validation("inputs", "must name at least one PDF"));
        }

        let pb = if self.show_progress {
            let pb = ProgressBar::new(inputs.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let documents = load_all(inputs, &pb)?;

        let document_count = documents.len();
        let mut merged = merge_documents(documents)?;
        let pages = merged.get_pages().len();

        let mut buffer = Vec::new();
        merged.save_to(&mut buffer).map_err(CutoutError::from)?;
        fs::write(output, buffer).map_err(|e| CutoutError::FileSystem {
            path: output.to_path_buf(),
            operation: "write merged pdf".to_string(),
            source: e,
        })?;

        tracing::info!(documents = document_count, pages, output = %output.display(), "pdf merged");

        Ok(MergeSummary {
            documents: document_count,
            pages,
            output: output.to_path_buf(),
        })
    }
}

pub fn load_document(path: &Path) -> Result<Document> {
    let document = Document::load(path).map_err(|e| CutoutError::Pdf {
        path: path.to_path_buf(),
        operation: "load".to_string(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), pages = document.get_pages().len(), "pdf loaded");
    Ok(document)
}

/// Loads `inputs` in order, ticking `pb` once per file. The bar is cleared
/// whether or not every load succeeds.
fn load_all<P: AsRef<Path>>(inputs: &[P], pb: &ProgressBar) -> Result<Vec<Document>> {
    let documents = inputs
        .iter()
        .map(|input| {
            let path = input.as_ref();
            pb.set_message(path.display().to_string());
            let document = load_document(path);
            pb.inc(1);
            document
        })
        .collect::<Result<Vec<_>>>();
    pb.finish_and_clear();
    documents
}

/// Concatenates the pages of `documents` in order into a new document.
///
/// Objects of each document are renumbered into a shared id space. Every page
/// receives the inheritable attributes of its former ancestors and is attached
/// to a single new page tree; objects no longer reachable from the new
/// catalog are dropped.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    if documents.is_empty() {
        return Err(CutoutError::validation("inputs", "must contain at least one document"));
    }

    let version = documents
        .iter()
        .map(|doc| doc.version.as_str())
        .max()
        .unwrap_or(DEFAULT_VERSION)
        .to_string();
    let mut merged = Document::with_version(version);

    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for page_id in doc.get_pages().into_values() {
            let mut page = doc.get_object(page_id).and_then(Object::as_dict)?.clone();
            inherit_attributes(&doc, &mut page);
            pages.push((page_id, page));
        }

        for (id, object) in doc.objects {
            if matches!(type_name(&object), Some(b"Catalog" | b"Pages" | b"Page")) {
                continue;
            }
            merged.objects.insert(id, object);
        }
    }

    if pages.is_empty() {
        return Err(CutoutError::validation("inputs", "contain no pages"));
    }

    let pages_id: ObjectId = (max_id, 0);
    let catalog_id: ObjectId = (max_id + 1, 0);
    merged.max_id = max_id + 1;

    let kids = pages
        .iter()
        .map(|(id, _)| Object::Reference(*id))
        .collect::<Vec<_>>();
    let count = kids.len() as i64;

    for (id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        merged.objects.insert(id, Object::Dictionary(page));
    }

    let mut page_tree = Dictionary::new();
    page_tree.set("Type", Object::Name(b"Pages".to_vec()));
    page_tree.set("Kids", Object::Array(kids));
    page_tree.set("Count", Object::Integer(count));
    merged.objects.insert(pages_id, Object::Dictionary(page_tree));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    let pruned = merged.prune_objects();
    tracing::debug!(pages = count, pruned = pruned.len(), "page tree rebuilt");

    Ok(merged)
}

fn type_name(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// Copies inheritable attributes from the page's ancestors onto the page
/// itself, nearest ancestor first.
fn inherit_attributes(doc: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(node) = parent.and_then(|id| doc.get_object(id).and_then(Object::as_dict).ok())
        else {
            break;
        };
        for key in INHERITABLE_ATTRIBUTES {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
}
