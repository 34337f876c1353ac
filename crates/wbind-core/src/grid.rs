#![forbid(unsafe_code)]

//! Memoized grid configuration derived from the initial data snapshot.
//!
//! # Invariants
//!
//! 1. Column order is source order, then derived columns in option order.
//! 2. Hidden fields never produce a column.
//! 3. Field names are unique; the first occurrence wins.
//! 4. A [`GridConfig`] is immutable once built.

use crate::options::{BindingOptions, HeightHints};
use crate::presentation::{LayoutMode, PresentationState, PresentationUpdate, Surface};

/// Anything a binding can derive its configuration from.
///
/// The binding treats the data itself as opaque and only calls this once per
/// identity.
pub trait ConfigSource {
    /// Build the configuration for these options.
    fn derive_config(&self, options: &BindingOptions) -> GridConfig;
}

/// Where a column's values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// A field present in the source data.
    Data,
    /// A computed column declared in the options.
    Derived,
}

/// One column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub field: String,
    pub header: String,
    pub source: ColumnSource,
    pub pinned: bool,
}

/// Immutable configuration computed once per binding identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    columns: Vec<ColumnDef>,
    row_count: usize,
    hints: HeightHints,
}

impl GridConfig {
    /// Build a configuration from source field names and a row count.
    pub fn from_fields<'a>(
        fields: impl IntoIterator<Item = &'a str>,
        row_count: usize,
        options: &BindingOptions,
    ) -> Self {
        let mut columns: Vec<ColumnDef> = Vec::new();
        for field in fields {
            if options.is_hidden(field) || columns.iter().any(|c| c.field == field) {
                continue;
            }
            columns.push(ColumnDef {
                field: field.to_owned(),
                header: field.to_owned(),
                source: ColumnSource::Data,
                pinned: false,
            });
        }
        for derived in &options.derived_columns {
            if options.is_hidden(&derived.field)
                || columns.iter().any(|c| c.field == derived.field)
            {
                continue;
            }
            columns.push(ColumnDef {
                field: derived.field.clone(),
                header: derived
                    .header
                    .clone()
                    .unwrap_or_else(|| derived.field.clone()),
                source: ColumnSource::Derived,
                pinned: derived.pinned,
            });
        }
        Self {
            columns,
            row_count,
            hints: options.height_hints,
        }
    }

    /// Column definitions in display order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Look up a column by field.
    #[must_use]
    pub fn column(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Number of data rows in the snapshot.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Sizing hints captured at derivation time.
    #[must_use]
    pub fn hints(&self) -> HeightHints {
        self.hints
    }

    /// The full update a widget should show for `state`.
    ///
    /// `fields` is set to all; callers narrow it with
    /// [`PresentationUpdate::relative_to`].
    #[must_use]
    pub fn update_for(&self, state: PresentationState) -> PresentationUpdate {
        match state.surface() {
            Surface::Inline => PresentationUpdate::full(
                Surface::Inline,
                self.hints.inline_height(self.row_count),
                LayoutMode::Fixed,
            ),
            Surface::Overlay => PresentationUpdate::full(
                Surface::Overlay,
                self.hints.overlay_height,
                LayoutMode::FillParent,
            ),
        }
    }
}

/// Tabular snapshot: ordered field names and a row count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSnapshot {
    pub fields: Vec<String>,
    pub rows: usize,
}

impl TableSnapshot {
    /// Create a snapshot.
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>, rows: usize) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            rows,
        }
    }
}

impl ConfigSource for TableSnapshot {
    fn derive_config(&self, options: &BindingOptions) -> GridConfig {
        GridConfig::from_fields(self.fields.iter().map(String::as_str), self.rows, options)
    }
}

impl ConfigSource for GridConfig {
    fn derive_config(&self, _options: &BindingOptions) -> GridConfig {
        self.clone()
    }
}
