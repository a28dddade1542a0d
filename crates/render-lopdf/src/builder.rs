use crate::text::{BOLD_FONT, PdfRect, REGULAR_FONT, text_operations};
use crate::xobject::{EmbeddedImage, embed_image};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use peel_traits::{BuildError, DocumentBuilder, PageHandle, TextStyle};
use peel_types::{PageSize, PixelRect};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Physical page width: 10 inches.
pub const PAGE_WIDTH_PT: f32 = 720.0;

struct PageState {
    /// Points per output pixel.
    scale: f32,
    width_pt: f32,
    height_pt: f32,
    content: Content,
}

impl PageState {
    fn new(size: PageSize) -> Self {
        let scale = PAGE_WIDTH_PT / size.width as f32;
        Self {
            scale,
            width_pt: PAGE_WIDTH_PT,
            height_pt: size.height as f32 * scale,
            content: Content { operations: vec![] },
        }
    }

    /// Maps a top-left-origin pixel rect into PDF user space.
    fn to_pdf(&self, rect: PixelRect) -> PdfRect {
        let width = rect.width() as f32 * self.scale;
        let height = rect.height() as f32 * self.scale;
        PdfRect {
            x: rect.x0 as f32 * self.scale,
            y: self.height_pt - rect.y1 as f32 * self.scale,
            width,
            height,
        }
    }

    fn push(&mut self, op: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(op, operands));
    }
}

/// An in-memory PDF document builder using the `lopdf` library.
///
/// Pages keep their operations in memory; the object graph for pages and
/// shared resources is written out in [`DocumentBuilder::serialize`].
pub struct LopdfBuilder {
    document: Document,
    pages: Vec<PageState>,
    /// Embedded images by source path, shared by every page that draws them.
    images: HashMap<PathBuf, (String, EmbeddedImage)>,
}

impl Default for LopdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfBuilder {
    pub fn new() -> Self {
        Self {
            document: Document::with_version("1.7"),
            pages: Vec::new(),
            images: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_mut(&mut self, page: PageHandle) -> Result<&mut PageState, BuildError> {
        self.pages
            .get_mut(page.index())
            .ok_or(BuildError::UnknownPage(page.index()))
    }

    /// XObject resource name for `path`, embedding the image on first use.
    fn image_resource(&mut self, path: &Path) -> Result<String, BuildError> {
        if let Some((name, _)) = self.images.get(path) {
            return Ok(name.clone());
        }
        let embedded = embed_image(&mut self.document, path)?;
        let name = format!("Im{}", self.images.len() + 1);
        log::debug!(
            "Embedded {} as /{} ({}x{})",
            path.display(),
            name,
            embedded.width,
            embedded.height
        );
        self.images.insert(path.to_path_buf(), (name.clone(), embedded));
        Ok(name)
    }

    fn resources(&mut self) -> ObjectId {
        let regular = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut xobjects = Dictionary::new();
        for (name, image) in self.images.values() {
            xobjects.set(name.as_bytes(), Object::Reference(image.id));
        }

        self.document.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular,
                BOLD_FONT => bold,
            },
            "XObject" => xobjects,
        })
    }
}

impl DocumentBuilder for LopdfBuilder {
    fn new_page(&mut self, size: PageSize) -> Result<PageHandle, BuildError> {
        if size.width == 0 || size.height == 0 {
            return Err(BuildError::InvalidPageSize {
                width: size.width,
                height: size.height,
            });
        }
        self.pages.push(PageState::new(size));
        Ok(PageHandle(self.pages.len() - 1))
    }

    fn add_text(
        &mut self,
        page: PageHandle,
        text: &str,
        rect: PixelRect,
        style: TextStyle,
    ) -> Result<(), BuildError> {
        let state = self.page_mut(page)?;
        let pdf_rect = state.to_pdf(rect);
        state.content.operations.extend(text_operations(text, pdf_rect, style));
        Ok(())
    }

    fn add_image(
        &mut self,
        page: PageHandle,
        path: &Path,
        rect: PixelRect,
    ) -> Result<(), BuildError> {
        // Validate the handle before embedding anything.
        self.page_mut(page)?;
        let name = self.image_resource(path)?;
        let state = self.page_mut(page)?;
        let r = state.to_pdf(rect);
        state.push("q", vec![]);
        state.push(
            "cm",
            vec![r.width.into(), 0.into(), 0.into(), r.height.into(), r.x.into(), r.y.into()],
        );
        state.push("Do", vec![Object::Name(name.into_bytes())]);
        state.push("Q", vec![]);
        Ok(())
    }

    fn add_placeholder(&mut self, page: PageHandle, rect: PixelRect) {
        let Ok(state) = self.page_mut(page) else {
            log::warn!("Placeholder for unknown page {} dropped", page.index());
            return;
        };
        let r = state.to_pdf(rect);
        state.push("q", vec![]);
        state.push("rg", vec![0.9.into(), 0.9.into(), 0.9.into()]);
        state.push("RG", vec![0.6.into(), 0.6.into(), 0.6.into()]);
        state.push("w", vec![1.into()]);
        state.push("re", vec![r.x.into(), r.y.into(), r.width.into(), r.height.into()]);
        state.push("B", vec![]);
        state.push("Q", vec![]);
    }

    fn serialize(mut self) -> Result<Vec<u8>, BuildError> {
        let pages_id = self.document.new_object_id();
        let resources_id = self.resources();

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for state in std::mem::take(&mut self.pages) {
            let encoded = state
                .content
                .encode()
                .map_err(|e| BuildError::Serialize(e.to_string()))?;
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&encoded)?;
            let compressed = encoder.finish()?;
            let content_id = self
                .document
                .add_object(Stream::new(dictionary! {"Filter" => "FlateDecode"}, compressed));

            let media_box: Vec<Object> =
                vec![0.into(), 0.into(), state.width_pt.into(), state.height_pt.into()];
            let page_id = self.document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
        self.document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_ids.len() as i64,
            }),
        );
        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        self.document
            .save_to(&mut out)
            .map_err(|e| BuildError::Serialize(e.to_string()))?;
        Ok(out)
    }
}
