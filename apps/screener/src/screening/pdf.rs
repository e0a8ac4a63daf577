//! Resume text extraction. Page text comes from `pdf-extract`; hyperlink
//! targets (LinkedIn, GitHub, portfolio) are read from the link annotations
//! with `lopdf` and appended, since they never appear in the text layer.

use bytes::Bytes;
use lopdf::{Document, Object};
use tracing::{debug, warn};

/// Extracts resume text on the blocking pool. Any failure, including a panic
/// inside the PDF parser, yields an empty string.
pub async fn extract_resume_text(filename: &str, bytes: Bytes) -> String {
    match tokio::task::spawn_blocking(move || extract_text_blocking(&bytes)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("Error loading PDF {filename}: {e}");
            String::new()
        }
        Err(e) => {
            warn!("PDF extraction task for {filename} aborted: {e}");
            String::new()
        }
    }
}

fn extract_text_blocking(bytes: &[u8]) -> Result<String, pdf_extract::OutputError> {
    let mut text = pdf_extract::extract_text_from_mem(bytes)?;

    match Document::load_mem(bytes) {
        Ok(doc) => {
            for uri in link_uris(&doc) {
                text.push_str(&format!("\n(Link: {uri})"));
            }
        }
        Err(e) => debug!("Skipping link extraction: {e}"),
    }

    Ok(text)
}

/// URI targets of every link annotation, in page order.
fn link_uris(doc: &Document) -> Vec<String> {
    let mut uris = Vec::new();

    for page_id in doc.get_pages().into_values() {
        let Some(page) = doc.get_object(page_id).ok().and_then(|o| o.as_dict().ok()) else {
            continue;
        };
        let Some(annots) = page
            .get(b"Annots")
            .ok()
            .and_then(|a| resolve(doc, a))
            .and_then(|a| a.as_array().ok())
        else {
            continue;
        };

        for annot in annots {
            let uri = resolve(doc, annot)
                .and_then(|a| a.as_dict().ok())
                .and_then(|a| a.get(b"A").ok())
                .and_then(|action| resolve(doc, action))
                .and_then(|action| action.as_dict().ok())
                .and_then(|action| action.get(b"URI").ok())
                .and_then(|uri| resolve(doc, uri));
            if let Some(Object::String(raw, _)) = uri {
                uris.push(String::from_utf8_lossy(raw).into_owned());
            }
        }
    }

    uris
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn document_with_link(uri: &str) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let action = dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(uri),
        };
        let annot_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "A" => action,
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Annots" => vec![annot_id.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_link_uris_reads_link_annotations() {
        let doc = document_with_link("https://github.com/ada");
        assert_eq!(link_uris(&doc), vec!["https://github.com/ada".to_string()]);
    }

    #[test]
    fn test_link_uris_empty_document() {
        let doc = Document::with_version("1.5");
        assert!(link_uris(&doc).is_empty());
    }

    #[tokio::test]
    async fn test_extract_resume_text_non_pdf_is_empty() {
        let text = extract_resume_text("notes.pdf", Bytes::from_static(b"plain text")).await;
        assert!(text.is_empty());
    }
}
