//! Multi-page detection.

use tablegrid_core::{DetectionSettings, Table, TableError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::page::{PageData, PageSource};

/// Error from detecting tables across a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Detection failed on one page.
    #[error("page {index}: {source}")]
    Page {
        /// 0-based page index.
        index: usize,
        #[source]
        source: TableError,
    },

    /// Page data could not be parsed.
    #[error("invalid page data: {0}")]
    Parse(String),
}

/// An ordered collection of pages sharing one set of detection settings.
///
/// # Example
///
/// ```ignore
/// let doc = Document::from_json(&std::fs::read_to_string("pages.json")?)?;
/// for (i, tables) in doc.detect_all().iter().enumerate() {
///     println!("page {}: {} tables", i + 1, tables.len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Document<P = PageData> {
    pages: Vec<P>,
    settings: DetectionSettings,
}

impl<P: PageSource> Document<P> {
    pub fn new(pages: Vec<P>) -> Self {
        Self {
            pages,
            settings: DetectionSettings::default(),
        }
    }

    /// Replace the detection settings used for every page.
    pub fn with_settings(mut self, settings: DetectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    pub fn pages(&self) -> &[P] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Detect tables on one page (0-based).
    pub fn detect_page(&self, index: usize) -> Option<Vec<Table>> {
        self.pages
            .get(index)
            .map(|page| crate::detect_tables_with(page, &self.settings))
    }

    /// Detect tables on every page, in page order.
    ///
    /// A page whose detection fails yields no tables.
    pub fn detect_all(&self) -> Vec<Vec<Table>> {
        self.pages
            .iter()
            .map(|page| crate::detect_tables_with(page, &self.settings))
            .collect()
    }

    /// Like [`detect_all`](Self::detect_all) but stops at the first failing page.
    pub fn try_detect_all(&self) -> Result<Vec<Vec<Table>>, DocumentError> {
        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                crate::try_detect_tables_with(page, &self.settings)
                    .map_err(|source| DocumentError::Page { index, source })
            })
            .collect()
    }
}

#[cfg(feature = "parallel")]
impl<P: PageSource + Sync> Document<P> {
    /// Detect tables on every page concurrently.
    ///
    /// Results are returned in page order.
    pub fn detect_all_parallel(&self) -> Vec<Vec<Table>> {
        (0..self.pages.len())
            .into_par_iter()
            .map(|i| crate::detect_tables_with(&self.pages[i], &self.settings))
            .collect()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PageList {
    Many(Vec<PageData>),
    One(PageData),
}

#[cfg(feature = "serde")]
impl Document<PageData> {
    /// Parse either a single page object or an array of pages.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let parsed = serde_json::from_str(json).map_err(|e| DocumentError::Parse(e.to_string()))?;
        let pages = match parsed {
            PageList::Many(pages) => pages,
            PageList::One(page) => vec![page],
        };
        Ok(Self::new(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablegrid_core::{BBox, PaintOp, PathEvent};

    fn ruled_page() -> PageData {
        let mut paths = Vec::new();
        for y in [100.0, 130.0, 160.0, 190.0] {
            paths.push(PathEvent {
                bbox: BBox::new(100.0, y, 400.0, y + 0.5),
                paint_op: PaintOp::Stroke,
                line_width: 0.5,
            });
        }
        for x in [100.0, 250.0, 400.0] {
            paths.push(PathEvent {
                bbox: BBox::new(x, 100.0, x + 0.5, 190.0),
                paint_op: PaintOp::Stroke,
                line_width: 0.5,
            });
        }
        PageData::new(BBox::new(0.0, 0.0, 600.0, 800.0)).with_paths(paths)
    }

    #[test]
    fn test_detect_all_in_page_order() {
        let blank = PageData::new(BBox::new(0.0, 0.0, 600.0, 800.0));
        let doc = Document::new(vec![blank, ruled_page()]);
        let results = doc.detect_all();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_empty());
        assert_eq!(results[1].len(), 1);
        assert_eq!(doc.detect_page(1).map(|t| t.len()), Some(1));
        assert_eq!(doc.detect_page(2), None);
    }

    #[test]
    fn test_try_detect_all_reports_page_index() {
        let broken = PageData::new(BBox::new(0.0, 0.0, 0.0, 0.0));
        let doc = Document::new(vec![ruled_page(), broken]);
        match doc.try_detect_all() {
            Err(DocumentError::Page { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected page error, got {other:?}"),
        }
        // The infallible variant degrades to no tables.
        assert!(doc.detect_all()[1].is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let doc = Document::new(vec![ruled_page(), ruled_page(), ruled_page()]);
        assert_eq!(doc.detect_all_parallel(), doc.detect_all());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_single_or_array() {
        let page = r#"{"bounds": {"x0": 0, "top": 0, "x1": 612, "bottom": 792}}"#;
        assert_eq!(Document::from_json(page).unwrap().page_count(), 1);
        let pages = format!("[{page}, {page}]");
        assert_eq!(Document::from_json(&pages).unwrap().page_count(), 2);
        assert!(matches!(
            Document::from_json("{}"),
            Err(DocumentError::Parse(_))
        ));
    }
}
