//! Export adapters.
//!
//! The rendered SVG is already a standalone document (explicit `xmlns`,
//! `width`, `height` and `viewBox`), so SVG export is a plain write. PDF
//! export converts the vector scene to a single page through `svg2pdf` at
//! 96 dpi, which maps CSS pixels to document points at the conventional
//! 96 px = 72 pt ratio. The white page background comes from the rendered
//! background rect, beneath all content.
//!
//! Export is a deliberate user action: precondition failures surface as
//! errors instead of being swallowed. The one exception is font
//! substitution — a missing face falls back to the default family inside
//! the conversion pipeline and never aborts the export.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("figure SVG failed to parse for PDF conversion")]
    SvgParse,
    #[error("PDF conversion failed")]
    PdfConvert,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Write the SVG document to `output`, or stream it to stdout when no path
/// is given.
pub fn write_svg(svg: &str, output: Option<&Path>) -> Result<(), ExportError> {
    match output {
        Some(path) => std::fs::write(path, svg)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(svg.as_bytes())?;
        }
    }
    Ok(())
}

/// Convert a rendered SVG document to single-page PDF bytes.
///
/// `font_family` substitutes for faces the document names but the system
/// lacks; when even that family is unavailable the converter falls back to
/// its default face rather than failing.
#[cfg(feature = "pdf")]
pub fn svg_to_pdf(svg: &str, font_family: &str) -> Result<Vec<u8>, ExportError> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = font_family.to_string();

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt).map_err(|_| ExportError::SvgParse)?;

    let mut page = svg2pdf::PageOptions::default();
    // 96 px per inch against PDF's 72 pt per inch: points = px * 72 / 96.
    page.dpi = 96.0;

    svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), page)
        .map_err(|_| ExportError::PdfConvert)
}

#[cfg(feature = "pdf")]
pub fn write_pdf(svg: &str, output: &Path, font_family: &str) -> Result<(), ExportError> {
    let pdf = svg_to_pdf(svg, font_family)?;
    std::fs::write(output, pdf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_svg() -> String {
        let theme = crate::theme::Theme::modern();
        let config = crate::config::LayoutConfig::default();
        let spec = crate::figure::FigureSpec::Process(crate::figure::ProcessSpec {
            title: Some("Export sample".to_string()),
            columns: vec![
                vec![crate::figure::Card::new("a", "Source")],
                vec![crate::figure::Card::new("b", "Sink")],
            ],
            flows: vec![crate::figure::Flow::new("a", "b")],
            merges: Vec::new(),
        });
        let layout = crate::layout::compute_layout(&spec, &theme, &config);
        crate::render::render_svg(&layout, &theme, &config)
    }

    #[test]
    fn svg_export_writes_the_document_verbatim() {
        let svg = sample_svg();
        let dir = std::env::temp_dir().join("cardflow-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("figure.svg");
        write_svg(&svg, Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), svg);
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn pdf_export_produces_a_pdf_header() {
        let pdf = svg_to_pdf(&sample_svg(), "Arial").unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn malformed_svg_is_a_reported_failure() {
        let result = svg_to_pdf("<svg", "Arial");
        assert!(matches!(result, Err(ExportError::SvgParse)));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn unknown_substitute_font_does_not_abort_export() {
        let pdf = svg_to_pdf(&sample_svg(), "No Such Face 9000").unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
