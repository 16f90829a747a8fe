//! Document module - the two text views of one ruling letter

/// Text of one source document, in the two views the extractors read
///
/// Both views come from the same underlying document. `normalized` keeps
/// paragraph breaks but collapses horizontal whitespace, which suits body
/// searches that span paragraphs. `pretty` has one logical line per visual
/// block with empty lines removed, which suits header and signature parsing
/// where line order matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    /// Ruling identifier the text belongs to
    pub id: String,
    /// Search-friendly view
    pub normalized: String,
    /// Line-structured view
    pub pretty: String,
}

impl DocumentText {
    /// Create a document from already-prepared views
    pub fn new(
        id: impl Into<String>,
        normalized: impl Into<String>,
        pretty: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            normalized: normalized.into(),
            pretty: pretty.into(),
        }
    }
}
