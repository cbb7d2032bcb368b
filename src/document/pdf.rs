//! Streaming single-page PDF serializer.
//!
//! Objects are written to the sink as soon as they are produced: the
//! header first, then every embedded image, then the page content, fonts,
//! page tree, and cross-reference table when the page is finished. The
//! sink is flushed after each object so a channel-backed sink forwards
//! bytes incrementally.

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GrayImage;

use super::canvas::{fmt_num, LinkAnnotation};
use super::metrics::Font;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_REGULAR_ID: usize = 3;
const FONT_BOLD_ID: usize = 4;
const FIRST_FREE_ID: usize = 5;

/// Image data ready to be written as an image `XObject`.
#[derive(Debug, Clone)]
pub struct PdfImage {
    width: u32,
    height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl PdfImage {
    /// Decode PNG or JPEG bytes.
    ///
    /// Grayscale and RGB JPEG data is embedded as-is after reading only the
    /// frame header. Everything else, four-component (CMYK/YCCK) JPEGs
    /// included, is decoded and re-encoded as Flate-compressed RGB with an
    /// optional soft mask. Returns `None` for bytes that are not a
    /// decodable image.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let format = image::guess_format(bytes).ok()?;
        if format == image::ImageFormat::Jpeg {
            if let Some(passthrough) = Self::jpeg_passthrough(bytes) {
                return Some(passthrough);
            }
        }

        let decoded = image::load_from_memory_with_format(bytes, format).ok()?;
        let (width, height) = (decoded.width(), decoded.height());

        let rgba = decoded.to_rgba8();
        let mut rgb = Vec::with_capacity(rgba.as_raw().len() / 4 * 3);
        let mut alpha = Vec::with_capacity(rgba.as_raw().len() / 4);
        let mut translucent = false;
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            translucent |= a != u8::MAX;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }

        Some(Self {
            width,
            height,
            color_space: "/DeviceRGB",
            filter: "/FlateDecode",
            data: deflate(&rgb).ok()?,
            alpha: if translucent { Some(deflate(&alpha).ok()?) } else { None },
        })
    }

    /// DCT passthrough for JPEGs a viewer can paint without a color
    /// transform. `None` when the header is unreadable or the frame has
    /// four components.
    fn jpeg_passthrough(bytes: &[u8]) -> Option<Self> {
        let mut decoder = zune_jpeg::JpegDecoder::new(io::Cursor::new(bytes));
        decoder.decode_headers().ok()?;
        let info = decoder.info()?;
        let color_space = match info.components {
            1 => "/DeviceGray",
            3 => "/DeviceRGB",
            _ => return None,
        };
        Some(Self {
            width: u32::from(info.width),
            height: u32::from(info.height),
            color_space,
            filter: "/DCTDecode",
            data: bytes.to_vec(),
            alpha: None,
        })
    }

    /// Wrap an 8-bit grayscale raster.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if compression fails.
    pub fn from_gray(img: &GrayImage) -> io::Result<Self> {
        Ok(Self {
            width: img.width(),
            height: img.height(),
            color_space: "/DeviceGray",
            filter: "/FlateDecode",
            data: deflate(img.as_raw())?,
            alpha: None,
        })
    }

    /// Pixel dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Writes one page of PDF objects to `W`, tracking byte offsets for the
/// cross-reference table.
pub struct PdfStreamWriter<W: Write> {
    writer: W,
    offset: usize,
    offsets: Vec<usize>,
    next_id: usize,
    images: Vec<(String, usize)>,
}

impl<W: Write> PdfStreamWriter<W> {
    /// Write the file header and flush it to the sink.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the sink.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut s = Self {
            writer,
            offset: 0,
            offsets: vec![0; FIRST_FREE_ID],
            next_id: FIRST_FREE_ID,
            images: Vec::new(),
        };
        s.write_bytes(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;
        s.writer.flush()?;
        Ok(s)
    }

    /// Write an image `XObject` and return the resource name to draw it by.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the sink.
    pub fn add_image(&mut self, image: &PdfImage) -> io::Result<String> {
        let smask_id = match &image.alpha {
            Some(alpha) => {
                let id = self.alloc_id();
                let dict = format!(
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceGray /BitsPerComponent 8 /Filter /FlateDecode /Length {} >>",
                    image.width,
                    image.height,
                    alpha.len()
                );
                self.write_stream_object(id, &dict, alpha)?;
                Some(id)
            }
            None => None,
        };

        let id = self.alloc_id();
        let mut dict = format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} \
             /BitsPerComponent 8 /Filter {} /Length {}",
            image.width,
            image.height,
            image.color_space,
            image.filter,
            image.data.len()
        );
        if let Some(smask) = smask_id {
            dict.push_str(&format!(" /SMask {smask} 0 R"));
        }
        dict.push_str(" >>");
        self.write_stream_object(id, &dict, &image.data)?;
        self.writer.flush()?;

        let name = format!("Im{}", self.images.len() + 1);
        self.images.push((name.clone(), id));
        Ok(name)
    }

    /// Write the page, its content stream, and the document trailer.
    /// Returns the total document size in bytes.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the sink.
    pub fn finish(
        &mut self,
        page_size: (f64, f64),
        content: &[u8],
        links: &[LinkAnnotation],
        title: &str,
    ) -> io::Result<usize> {
        let content_id = self.alloc_id();
        self.write_stream_object(
            content_id,
            &format!("<< /Length {} >>", content.len()),
            content,
        )?;

        for (id, font) in [(FONT_REGULAR_ID, Font::Regular), (FONT_BOLD_ID, Font::Bold)] {
            self.write_object(
                id,
                &format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_font()
                ),
            )?;
        }

        let mut annot_ids = Vec::with_capacity(links.len());
        for link in links {
            let id = self.alloc_id();
            let [x1, y1, x2, y2] = link.rect;
            let body = format!(
                "<< /Type /Annot /Subtype /Link /Rect [{} {} {} {}] /Border [0 0 0] \
                 /A << /Type /Action /S /URI /URI ({}) >> >>",
                fmt_num(x1),
                fmt_num(y1),
                fmt_num(x2),
                fmt_num(y2),
                escape_literal(link.uri.as_bytes()),
            );
            self.write_object(id, &body)?;
            annot_ids.push(id);
        }

        let page_id = self.alloc_id();
        let mut page = format!(
            "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /{} {FONT_REGULAR_ID} 0 R /{} {FONT_BOLD_ID} 0 R >>",
            fmt_num(page_size.0),
            fmt_num(page_size.1),
            Font::Regular.resource_name(),
            Font::Bold.resource_name(),
        );
        if !self.images.is_empty() {
            page.push_str(" /XObject <<");
            for (name, id) in &self.images {
                page.push_str(&format!(" /{name} {id} 0 R"));
            }
            page.push_str(" >>");
        }
        page.push_str(&format!(" >> /Contents {content_id} 0 R"));
        if !annot_ids.is_empty() {
            let refs: Vec<String> = annot_ids.iter().map(|id| format!("{id} 0 R")).collect();
            page.push_str(&format!(" /Annots [{}]", refs.join(" ")));
        }
        page.push_str(" >>");
        self.write_object(page_id, &page)?;

        self.write_object(
            PAGES_ID,
            &format!("<< /Type /Pages /Kids [{page_id} 0 R] /Count 1 >>"),
        )?;
        self.write_object(CATALOG_ID, &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"))?;

        let info_id = self.alloc_id();
        let mut info = b"<< /Title (".to_vec();
        info.extend_from_slice(&escape_literal_bytes(&super::metrics::encode_win_ansi(title)));
        info.extend_from_slice(b") /Producer (sgwc-registry) >>");
        self.write_object_bytes(info_id, &info)?;

        let total = self.next_id;
        let xref_start = self.offset;
        self.write_str(&format!("xref\n0 {total}\n"))?;
        self.write_bytes(b"0000000000 65535 f \n")?;
        for id in 1..total {
            let offset = self.offsets[id];
            self.write_str(&format!("{offset:010} 00000 n \n"))?;
        }
        self.write_str(&format!(
            "trailer\n<< /Size {total} /Root {CATALOG_ID} 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_start}\n%%EOF\n"
        ))?;
        self.writer.flush()?;
        Ok(self.offset)
    }

    /// Hand the sink back.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn alloc_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.offsets.resize(self.next_id, 0);
        id
    }

    fn write_object(&mut self, id: usize, body: &str) -> io::Result<()> {
        self.write_object_bytes(id, body.as_bytes())
    }

    fn write_object_bytes(&mut self, id: usize, body: &[u8]) -> io::Result<()> {
        self.offsets[id] = self.offset;
        self.write_str(&format!("{id} 0 obj\n"))?;
        self.write_bytes(body)?;
        self.write_bytes(b"\nendobj\n")
    }

    fn write_stream_object(&mut self, id: usize, dict: &str, data: &[u8]) -> io::Result<()> {
        self.offsets[id] = self.offset;
        self.write_str(&format!("{id} 0 obj\n"))?;
        self.write_str(dict)?;
        self.write_bytes(b"\nstream\n")?;
        self.write_bytes(data)?;
        self.write_bytes(b"\nendstream\nendobj\n")
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.offset += data.len();
        Ok(())
    }

    fn write_str(&mut self, data: &str) -> io::Result<()> {
        self.write_bytes(data.as_bytes())
    }
}

/// Escape an ASCII string body, such as a URI, for a PDF literal string.
///
/// Non-ASCII WinAnsi text goes through [`escape_literal_bytes`] instead.
#[must_use]
pub fn escape_literal(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&escape_literal_bytes(bytes)).into_owned()
}

/// Escape bytes for a PDF literal string body, preserving non-ASCII bytes.
#[must_use]
pub fn escape_literal_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if matches!(b, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}
