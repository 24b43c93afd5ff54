//! Page input: anything that can replay its drawing and describe its text.

use tablegrid_core::{BBox, DrawingHandler, PathEvent, Result, TableError, TextPage};

/// A rendered page that tables can be detected on.
///
/// Implementors wrap a real renderer: `render` replays every painted path
/// through the handler, and `text_page` returns the page's structured text
/// with coordinates in the same space (top-left origin).
pub trait PageSource {
    /// Page bounds in page units.
    fn bounds(&self) -> BBox;

    /// Replay the page's drawing operations into `handler`.
    ///
    /// Errors returned by the handler must be propagated.
    fn render(&self, handler: &mut dyn DrawingHandler) -> Result<()>;

    /// Structured text of the page.
    fn text_page(&self) -> Result<TextPage>;
}

/// A page captured ahead of time: bounds, painted paths and text.
///
/// This is the format the CLI reads. Renderers that cannot be driven
/// in-process can dump their output into it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageData {
    pub bounds: BBox,
    #[cfg_attr(feature = "serde", serde(default))]
    pub paths: Vec<PathEvent>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: TextPage,
}

impl PageData {
    pub fn new(bounds: BBox) -> Self {
        Self {
            bounds,
            paths: Vec::new(),
            text: TextPage::default(),
        }
    }

    pub fn with_paths(mut self, paths: Vec<PathEvent>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_text(mut self, text: TextPage) -> Self {
        self.text = text;
        self
    }

    /// Parse a page from JSON.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl PageSource for PageData {
    fn bounds(&self) -> BBox {
        self.bounds
    }

    fn render(&self, handler: &mut dyn DrawingHandler) -> Result<()> {
        for event in &self.paths {
            handler.on_path_painted(event.clone())?;
        }
        Ok(())
    }

    fn text_page(&self) -> Result<TextPage> {
        Ok(self.text.clone())
    }
}

/// Check that `bounds` can anchor the page-relative tolerances.
pub(crate) fn check_bounds(bounds: &BBox) -> Result<()> {
    if !bounds.is_finite() {
        return Err(TableError::InvalidPage(format!(
            "non-finite bounds {bounds:?}"
        )));
    }
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Err(TableError::InvalidPage(format!(
            "bounds {bounds:?} have no area"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablegrid_core::{EdgeCapture, PaintOp};

    #[test]
    fn test_page_data_replays_paths() {
        let page = PageData::new(BBox::new(0.0, 0.0, 600.0, 800.0)).with_paths(vec![
            PathEvent {
                bbox: BBox::new(10.0, 10.0, 200.0, 10.5),
                paint_op: PaintOp::Stroke,
                line_width: 0.5,
            },
            PathEvent {
                bbox: BBox::new(10.0, 20.0, 60.0, 40.0),
                paint_op: PaintOp::Fill,
                line_width: 0.0,
            },
        ]);
        let mut capture = EdgeCapture::new();
        page.render(&mut capture).unwrap();
        assert_eq!(capture.edges().len(), 5);
    }

    #[test]
    fn test_handler_error_propagates() {
        struct Failing;
        impl DrawingHandler for Failing {
            fn on_path_painted(&mut self, _event: PathEvent) -> Result<()> {
                Err(TableError::Render("stop".to_string()))
            }
        }
        let page = PageData::new(BBox::new(0.0, 0.0, 10.0, 10.0)).with_paths(vec![PathEvent {
            bbox: BBox::new(1.0, 1.0, 9.0, 1.0),
            paint_op: PaintOp::Stroke,
            line_width: 1.0,
        }]);
        assert!(matches!(
            page.render(&mut Failing),
            Err(TableError::Render(_))
        ));
    }

    #[test]
    fn test_check_bounds() {
        assert!(check_bounds(&BBox::new(0.0, 0.0, 612.0, 792.0)).is_ok());
        assert!(check_bounds(&BBox::new(0.0, 0.0, 0.0, 792.0)).is_err());
        assert!(check_bounds(&BBox::new(0.0, 0.0, f64::NAN, 792.0)).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_page_data_from_json() {
        let json = r#"{
            "bounds": {"x0": 0, "top": 0, "x1": 612, "bottom": 792},
            "paths": [
                {"bbox": {"x0": 10, "top": 10, "x1": 200, "bottom": 11},
                 "paint_op": "Stroke", "line_width": 1}
            ]
        }"#;
        let page = PageData::from_json(json).unwrap();
        assert_eq!(page.paths.len(), 1);
        assert!(page.text.is_empty());
    }
}
