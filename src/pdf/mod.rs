//! # PDF Surface
//!
//! A [`RenderSurface`] that accumulates draw calls into page content streams
//! and writes a PDF 1.7 file on [`RenderSurface::finalize`].
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, images, pages, streams
//! ...
//! xref                <- byte offset of each object
//! trailer             <- points to the catalog and info dictionary
//! %%EOF
//! ```
//!
//! Only the standard Type1 fonts are used, so nothing is embedded except
//! images. Coordinates passed in are already PDF user space (origin at the
//! bottom-left, y up), so draw calls map one-to-one onto operators.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8> and the sink

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::barcode::{BarcodeOptions, Code39};
use crate::error::LabelError;
use crate::font::StandardFont;
use crate::image_loader::{load_image, ImagePixelData, JpegColorSpace, LoadedImage};
use crate::surface::RenderSurface;

/// Document information written to the Info dictionary.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// One finished page: its content stream and the images it references.
struct Page {
    content: String,
    images: Vec<usize>,
}

/// Tracks allocated PDF objects during serialization. Index = object id.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }
}

pub struct PdfSurface<W: IoWrite> {
    sink: Option<W>,
    page_width: f64,
    page_height: f64,
    metadata: Metadata,
    compress: bool,
    pages: Vec<Page>,
    current: Page,
    /// Fonts in order of first use; `/F{i}` is `fonts[i]`.
    fonts: Vec<StandardFont>,
    images: Vec<LoadedImage>,
    finalized: bool,
}

impl<W: IoWrite> PdfSurface<W> {
    pub fn new(sink: W, page_width: f64, page_height: f64) -> Self {
        Self {
            sink: Some(sink),
            page_width,
            page_height,
            metadata: Metadata::default(),
            compress: true,
            pages: Vec::new(),
            current: Page {
                content: String::new(),
                images: Vec::new(),
            },
            fonts: Vec::new(),
            images: Vec::new(),
            finalized: false,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Write content streams uncompressed, which keeps them readable.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Give back the sink once the document has been written.
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }

    fn ensure_open(&self) -> Result<(), LabelError> {
        if self.finalized {
            Err(LabelError::RenderSurfaceError(
                "draw call after the document was finalized".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn font_index(&mut self, font: StandardFont) -> usize {
        match self.fonts.iter().position(|f| *f == font) {
            Some(idx) => idx,
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        }
    }

    fn close_page(&mut self) {
        let page = std::mem::replace(
            &mut self.current,
            Page {
                content: String::new(),
                images: Vec::new(),
            },
        );
        self.pages.push(page);
    }

    /// Serialize all pages into PDF bytes.
    fn build(&self) -> Vec<u8> {
        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        let mut builder = PdfBuilder {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
        };

        let font_ids: Vec<usize> = self
            .fonts
            .iter()
            .map(|font| {
                builder.push(
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        font.pdf_name()
                    )
                    .into_bytes(),
                )
            })
            .collect();
        let font_resources = font_ids
            .iter()
            .enumerate()
            .map(|(i, id)| format!("/F{} {} 0 R", i, id))
            .collect::<Vec<_>>()
            .join(" ");

        let image_ids: Vec<usize> = self
            .images
            .iter()
            .map(|image| Self::write_image_xobject(&mut builder, image))
            .collect();

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content_id = builder.push(self.stream_object(page.content.as_bytes()));

            let mut resources = format!("/Font << {} >>", font_resources);
            if !page.images.is_empty() {
                let xobjects = page
                    .images
                    .iter()
                    .map(|&idx| format!("/Im{} {} 0 R", idx, image_ids[idx]))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(resources, " /XObject << {} >>", xobjects);
            }

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                self.page_width, self.page_height, content_id, resources
            );
            page_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2] =
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_ids.len()).into_bytes();

        let mut info = String::from("<< ");
        if let Some(ref title) = self.metadata.title {
            let _ = write!(info, "/Title ({}) ", escape_pdf_string(title));
        }
        if let Some(ref author) = self.metadata.author {
            let _ = write!(info, "/Author ({}) ", escape_pdf_string(author));
        }
        if let Some(ref subject) = self.metadata.subject {
            let _ = write!(info, "/Subject ({}) ", escape_pdf_string(subject));
        }
        info.push_str("/Producer (labelsheet) >>");
        let info_id = builder.push(info.into_bytes());

        serialize(&builder, info_id)
    }

    fn stream_object(&self, content: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        if self.compress {
            let compressed = compress_to_vec_zlib(content, 6);
            let _ = write!(
                data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            data.extend_from_slice(&compressed);
        } else {
            let _ = write!(data, "<< /Length {} >>\nstream\n", content.len());
            data.extend_from_slice(content);
        }
        data.extend_from_slice(b"\nendstream");
        data
    }

    /// Write an image as one XObject, or two when it carries an alpha mask.
    /// Returns the main XObject id.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };
                let mut obj = Vec::new();
                let _ = write!(
                    obj,
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space,
                    data.len()
                );
                obj.extend_from_slice(data);
                obj.extend_from_slice(b"\nendstream");
                builder.push(obj)
            }
            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_ref = alpha
                    .as_ref()
                    .map(|alpha| {
                        let id = builder.push(Self::flate_image(image, alpha, "/DeviceGray", ""));
                        format!(" /SMask {} 0 R", id)
                    })
                    .unwrap_or_default();
                builder.push(Self::flate_image(image, rgb, "/DeviceRGB", &smask_ref))
            }
        }
    }

    fn flate_image(image: &LoadedImage, pixels: &[u8], color_space: &str, extra: &str) -> Vec<u8> {
        let compressed = compress_to_vec_zlib(pixels, 6);
        let mut obj = Vec::new();
        let _ = write!(
            obj,
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace {} /BitsPerComponent 8 /Filter /FlateDecode \
             /Length {}{} >>\nstream\n",
            image.width_px,
            image.height_px,
            color_space,
            compressed.len(),
            extra
        );
        obj.extend_from_slice(&compressed);
        obj.extend_from_slice(b"\nendstream");
        obj
    }
}

impl<W: IoWrite> RenderSurface for PdfSurface<W> {
    fn draw_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        font: StandardFont,
        font_size: f64,
    ) -> Result<(), LabelError> {
        self.ensure_open()?;
        let idx = self.font_index(font);
        let _ = write!(
            self.current.content,
            "BT\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            idx,
            font_size,
            x,
            y,
            encode_winansi(text)
        );
        Ok(())
    }

    fn draw_barcode(
        &mut self,
        payload: &str,
        x: f64,
        y: f64,
        height: f64,
        options: &BarcodeOptions,
    ) -> Result<(), LabelError> {
        self.ensure_open()?;
        let Some(symbol) = Code39::encode(payload, options) else {
            log::warn!("nothing to encode in barcode payload {:?}, skipping", payload);
            return Ok(());
        };
        let stream = &mut self.current.content;
        stream.push_str("q\n0 0 0 rg\n");
        for bar in &symbol.bars {
            let _ = writeln!(stream, "{:.3} {:.2} {:.3} {:.2} re", x + bar.x, y, bar.width, height);
        }
        stream.push_str("f\nQ\n");
        Ok(())
    }

    fn draw_image(
        &mut self,
        source: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), LabelError> {
        self.ensure_open()?;
        let image = load_image(source)?;
        let (ix, iy, iw, ih) = image.fit_into(x, y, width, height);
        let idx = self.images.len();
        self.images.push(image);
        self.current.images.push(idx);
        let _ = write!(
            self.current.content,
            "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
            iw, ih, ix, iy, idx
        );
        Ok(())
    }

    fn new_page(&mut self) -> Result<(), LabelError> {
        self.ensure_open()?;
        self.close_page();
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), LabelError> {
        self.ensure_open()?;
        if !self.current.content.is_empty() || self.pages.is_empty() {
            self.close_page();
        }
        self.finalized = true;

        let bytes = self.build();
        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| LabelError::RenderSurfaceError("output already taken".to_string()))?;
        let write_error =
            |e: std::io::Error| LabelError::RenderSurfaceError(format!("failed to write PDF: {}", e));
        sink.write_all(&bytes).map_err(write_error)?;
        sink.flush().map_err(write_error)?;
        log::debug!("wrote {} page(s), {} bytes", self.pages.len(), bytes.len());
        Ok(())
    }
}

/// Serialize all objects into the final PDF byte stream.
fn serialize(builder: &PdfBuilder, info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets = vec![0usize; builder.objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, data) in builder.objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{} 0 obj\n", i);
        output.extend_from_slice(data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
    output.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{:010} 00000 n \n", offset);
    }

    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        builder.objects.len(),
        info_id,
        xref_offset
    );
    output
}

/// Escape special characters in a PDF string.
fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Encode text as an escaped WinAnsi PDF string body. Characters outside
/// the encoding become `?`.
fn encode_winansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match unicode_to_winansi(ch).unwrap_or(b'?') {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b @ 0x20..=0x7E => out.push(b as char),
            b => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

/// Map a Unicode codepoint to its WinAnsiEncoding (Windows-1252) byte.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // €
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85), // …
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91), // ‘
        0x2019 => Some(0x92), // ’
        0x201C => Some(0x93), // “
        0x201D => Some(0x94), // ”
        0x2022 => Some(0x95),
        0x2013 => Some(0x96), // –
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}
