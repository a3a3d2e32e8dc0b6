use super::pdf::{paginate, RgbImage};
use crate::config::RenderParams;
use crate::error::{ReportError, ReportResult};
use crate::export::{ExportFormat, RenderCapture, SnapshotSource};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use resvg::tiny_skia;
use resvg::usvg::{fontdb, Options, Tree};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

const JPEG_QUALITY: u8 = 92;

/// Default capture: markup as-is, raster and document via resvg.
#[derive(Clone)]
pub struct SnapshotRenderer {
    fontdb: Arc<fontdb::Database>,
    sans_family: String,
    pixel_ratio: f32,
}

impl SnapshotRenderer {
    pub fn new(params: &RenderParams) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = &params.font_dir {
            db.load_fonts_dir(dir);
        }
        debug!("Loaded {} font faces", db.len());

        Self {
            fontdb: Arc::new(db),
            sans_family: params.sans_family.clone(),
            pixel_ratio: params.pixel_ratio.max(0.1),
        }
    }

    fn rasterize(&self, svg: &str) -> ReportResult<tiny_skia::Pixmap> {
        let mut options = Options::default();
        options.font_family = self.sans_family.clone();
        options.fontdb = self.fontdb.clone();

        let tree = Tree::from_str(svg, &options)
            .map_err(|e| ReportError::Render(format!("Failed to parse page SVG: {}", e)))?;

        let size = tree.size();
        let width = (size.width() * self.pixel_ratio).ceil() as u32;
        let height = (size.height() * self.pixel_ratio).ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            ReportError::Render(format!("Cannot allocate {}x{} pixmap", width, height))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.pixel_ratio, self.pixel_ratio),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap)
    }

    /// Encodes the page SVG in a raster or document format. Blocking.
    pub fn render_blocking(&self, page_svg: &str, format: ExportFormat) -> ReportResult<Vec<u8>> {
        match format {
            ExportFormat::Html => Err(ReportError::Render(
                "Markup snapshots are not rasterized".to_string(),
            )),
            ExportFormat::Png => self
                .rasterize(page_svg)?
                .encode_png()
                .map_err(|e| ReportError::Render(e.to_string())),
            ExportFormat::Jpeg => {
                let page = self.rasterize_rgb(page_svg)?;
                let mut out = Vec::new();
                JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
                    .encode(&page.pixels, page.width, page.height, ExtendedColorType::Rgb8)
                    .map_err(|e| ReportError::Render(e.to_string()))?;
                Ok(out)
            }
            ExportFormat::Pdf => paginate(&self.rasterize_rgb(page_svg)?),
        }
    }

    fn rasterize_rgb(&self, svg: &str) -> ReportResult<RgbImage> {
        let pixmap = self.rasterize(svg)?;
        // The pixmap is opaque after the white fill, so dropping
        // alpha needs no demultiply.
        let rgb: Vec<u8> = pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        RgbImage::new(pixmap.width(), pixmap.height(), rgb)
    }
}

impl RenderCapture for SnapshotRenderer {
    fn capture(
        &self,
        source: &SnapshotSource,
        format: ExportFormat,
    ) -> impl Future<Output = ReportResult<Vec<u8>>> + Send {
        let renderer = self.clone();
        let name = source.name.clone();
        let markup = source.markup.clone();
        let page_svg = source.page_svg.clone();

        async move {
            if format == ExportFormat::Html {
                return Ok(markup.into_bytes());
            }

            tokio::task::spawn_blocking(move || renderer.render_blocking(&page_svg, format))
                .await
                .map_err(|e| ReportError::capture(&name, e))?
                .map_err(|e| ReportError::capture(&name, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="30"><rect width="20" height="30" fill="#007AFF"/></svg>"##;

    fn renderer() -> SnapshotRenderer {
        SnapshotRenderer::new(&RenderParams {
            pixel_ratio: 1.0,
            ..RenderParams::default()
        })
    }

    #[test]
    fn test_png_signature() {
        let png = renderer().render_blocking(SQUARE, ExportFormat::Png).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_jpeg_from_svg() {
        let jpeg = renderer().render_blocking(SQUARE, ExportFormat::Jpeg).unwrap();
        assert_eq!(&jpeg[..3], b"\xFF\xD8\xFF");
        assert_eq!(&jpeg[jpeg.len() - 2..], b"\xFF\xD9");
    }

    #[test]
    fn test_pdf_from_svg() {
        let pdf = renderer().render_blocking(SQUARE, ExportFormat::Pdf).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn test_invalid_svg_is_render_error() {
        let err = renderer()
            .render_blocking("not svg", ExportFormat::Png)
            .unwrap_err();
        assert!(matches!(err, ReportError::Render(_)));
    }

    #[tokio::test]
    async fn test_html_capture_returns_markup() {
        let source = SnapshotSource {
            name: "张三".to_string(),
            markup: "<html></html>".to_string(),
            page_svg: String::new(),
        };
        let bytes = renderer().capture(&source, ExportFormat::Html).await.unwrap();
        assert_eq!(bytes, b"<html></html>");
    }

    #[tokio::test]
    async fn test_capture_failure_names_record() {
        let source = SnapshotSource {
            name: "李四".to_string(),
            markup: String::new(),
            page_svg: "<oops".to_string(),
        };
        let err = renderer().capture(&source, ExportFormat::Png).await.unwrap_err();
        assert!(err.to_string().contains("李四"));
    }
}
