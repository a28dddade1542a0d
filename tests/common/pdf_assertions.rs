use lopdf::{Document as LopdfDocument, Object};

/// Concatenates every string shown with `Tj`, page by page.
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    for page_id in doc.get_pages().values() {
        let Ok(content) = doc.get_and_decode_page_content(*page_id) else {
            continue;
        };
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Some(Object::String(bytes, _)) = op.operands.first() {
                text.extend(bytes.iter().map(|b| *b as char));
                text.push('\n');
            }
        }
    }
    text
}

/// Number of image XObjects in the file, soft masks included.
pub fn image_count(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter(|object| match object {
            Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|subtype| subtype.as_name())
                .is_ok_and(|name| name == b"Image"),
            _ => false,
        })
        .count()
}

/// Operators drawn on the page at `index` (zero-based).
pub fn page_operators(doc: &LopdfDocument, index: usize) -> Vec<String> {
    let Some(page_id) = doc.get_pages().values().nth(index).copied() else {
        return Vec::new();
    };
    doc.get_and_decode_page_content(page_id)
        .map(|content| content.operations.into_iter().map(|op| op.operator).collect())
        .unwrap_or_default()
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}
