use crate::error::{ReportError, ReportResult};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// A4 in PDF points.
pub const A4_WIDTH_PT: f64 = 595.28;
pub const A4_HEIGHT_PT: f64 = 841.89;

/// Opaque RGB raster, row-major, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> ReportResult<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(ReportError::Render(format!(
                "RGB buffer is {} bytes, expected {} for {}x{}",
                pixels.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self { width, height, pixels })
    }

    fn rows(&self, start: u32, count: u32) -> &[u8] {
        let stride = self.width as usize * 3;
        let from = start as usize * stride;
        &self.pixels[from..from + count as usize * stride]
    }
}

/// Pixel height of one A4 page when the image is scaled to page width.
pub fn page_slice_height(width: u32) -> u32 {
    ((width as f64 * A4_HEIGHT_PT / A4_WIDTH_PT).round() as u32).max(1)
}

fn deflate(data: &[u8]) -> ReportResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &str) {
        self.begin(id);
        self.buf.extend_from_slice(body.as_bytes());
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, dict: &str, data: &[u8]) {
        self.begin(id);
        self.buf
            .extend_from_slice(format!("<< {} /Length {} >>\nstream\n", dict, data.len()).as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn begin(&mut self, id: usize) {
        // Object ids are assigned densely from 1.
        if self.offsets.len() < id {
            self.offsets.resize(id, 0);
        }
        self.offsets[id - 1] = self.buf.len();
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_at = self.buf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.offsets.len() + 1,
            xref_at
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// Lays a tall raster out over as many A4 pages as it needs, each page showing
/// the next slice scaled to the page width.
pub fn paginate(image: &RgbImage) -> ReportResult<Vec<u8>> {
    if image.width == 0 || image.height == 0 {
        return Err(ReportError::Render("Cannot paginate an empty image".to_string()));
    }

    let slice = page_slice_height(image.width);
    let page_count = image.height.div_ceil(slice) as usize;
    let scale = A4_WIDTH_PT / image.width as f64;

    // 1 catalog, 2 page tree, then (page, content, image) per page
    let page_id = |i: usize| 3 + i * 3;
    let mut pdf = PdfWriter::new();

    pdf.object(1, "<< /Type /Catalog /Pages 2 0 R >>");
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", page_id(i))).collect();
    pdf.object(
        2,
        &format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), page_count),
    );

    for i in 0..page_count {
        let top = i as u32 * slice;
        let rows = slice.min(image.height - top);
        let drawn_height = rows as f64 * scale;
        let (page, content, xobject) = (page_id(i), page_id(i) + 1, page_id(i) + 2);

        pdf.object(
            page,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {A4_WIDTH_PT} {A4_HEIGHT_PT}] /Resources << /XObject << /Im0 {xobject} 0 R >> >> /Contents {content} 0 R >>"
            ),
        );

        let ops = format!(
            "q {:.2} 0 0 {:.2} 0 {:.2} cm /Im0 Do Q",
            A4_WIDTH_PT,
            drawn_height,
            A4_HEIGHT_PT - drawn_height
        );
        pdf.stream(content, "", ops.as_bytes());

        let data = deflate(image.rows(top, rows))?;
        pdf.stream(
            xobject,
            &format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode",
                image.width, rows
            ),
            &data,
        );
    }

    Ok(pdf.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::new(width, height, vec![255; (width * height * 3) as usize]).unwrap()
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(RgbImage::new(2, 2, vec![0; 5]).is_err());
    }

    #[test]
    fn test_single_page() {
        let pdf = paginate(&blank(100, 50)).unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(text.contains("/Count 1"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn test_tall_image_spans_pages() {
        let slice = page_slice_height(100);
        let pdf = paginate(&blank(100, slice * 2 + 1)).unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("/Count 3"));
        assert!(text.contains("/Height 1 "));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = paginate(&blank(10, 10)).unwrap();
        let text = String::from_utf8_lossy(&pdf).to_string();
        let xref = text.rfind("\nxref\n").unwrap();
        let first_entry = text[xref + 1..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(pdf[offset..].starts_with(b"1 0 obj"));
    }
}
