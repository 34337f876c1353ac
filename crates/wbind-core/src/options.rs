#![forbid(unsafe_code)]

//! Construction options for a binding.
//!
//! Options are consumed exactly once, together with the initial data
//! snapshot, when the memoized [`GridConfig`](crate::GridConfig) is derived.

/// A computed column appended after the source fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedColumn {
    /// Field key the column reads.
    pub field: String,
    /// Header text. Defaults to `field`.
    pub header: Option<String>,
    /// Whether the column is pinned to the leading edge.
    pub pinned: bool,
}

impl DerivedColumn {
    /// Create an unpinned derived column.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: None,
            pinned: false,
        }
    }

    /// Set the header text.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Pin the column.
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}

/// Sizing hints used to compute pushed heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightHints {
    /// Height of one row in pixels.
    pub row_height: u32,
    /// Height of the header row in pixels.
    pub header_height: u32,
    /// Rows shown inline before the widget scrolls internally.
    pub max_inline_rows: u32,
    /// Height of the overlay body in pixels.
    pub overlay_height: u32,
}

impl HeightHints {
    /// Create hints with the default values.
    pub const fn new() -> Self {
        Self {
            row_height: 28,
            header_height: 32,
            max_inline_rows: 10,
            overlay_height: 640,
        }
    }

    /// Set the row height.
    pub fn row_height(mut self, value: u32) -> Self {
        self.row_height = value;
        self
    }

    /// Set the header height.
    pub fn header_height(mut self, value: u32) -> Self {
        self.header_height = value;
        self
    }

    /// Set the inline row cap.
    pub fn max_inline_rows(mut self, value: u32) -> Self {
        self.max_inline_rows = value;
        self
    }

    /// Set the overlay height.
    pub fn overlay_height(mut self, value: u32) -> Self {
        self.overlay_height = value;
        self
    }

    /// Inline height for `rows` data rows.
    ///
    /// Always reserves at least one row so an empty grid still shows its
    /// placeholder line.
    #[must_use]
    pub fn inline_height(&self, rows: usize) -> u32 {
        let cap = self.max_inline_rows.max(1);
        let shown = u32::try_from(rows).unwrap_or(u32::MAX).clamp(1, cap);
        self.header_height
            .saturating_add(shown.saturating_mul(self.row_height))
    }
}

impl Default for HeightHints {
    fn default() -> Self {
        Self::new()
    }
}

/// Options passed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindingOptions {
    /// Extra computed columns.
    pub derived_columns: Vec<DerivedColumn>,
    /// Source fields that are not shown.
    pub hidden_fields: Vec<String>,
    /// Sizing hints.
    pub height_hints: HeightHints,
}

impl BindingOptions {
    /// Empty options with default sizing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a derived column.
    pub fn derived_column(mut self, column: DerivedColumn) -> Self {
        self.derived_columns.push(column);
        self
    }

    /// Hide a source field.
    pub fn hide(mut self, field: impl Into<String>) -> Self {
        self.hidden_fields.push(field.into());
        self
    }

    /// Replace the sizing hints.
    pub fn height_hints(mut self, hints: HeightHints) -> Self {
        self.height_hints = hints;
        self
    }

    /// Whether `field` is hidden.
    #[must_use]
    pub fn is_hidden(&self, field: &str) -> bool {
        self.hidden_fields.iter().any(|f| f == field)
    }
}
