//! Filter Editor
//!
//! The popover opened from a column's filter icon. It edits a tentative copy
//! of that column's criteria; nothing reaches the query state until
//! [`FilterEditor::apply`] hands back a [`QueryEvent`].

use dg_queries::{ColumnType, FilterCondition, FilterOperator, QueryEvent};
use serde::Serialize;
use tracing::debug;

/// The add-filter form at the bottom of the popover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftFilter {
    pub operator: FilterOperator,
    pub value: String,
}

impl Default for DraftFilter {
    fn default() -> Self {
        Self {
            operator: FilterOperator::Equals,
            value: String::new(),
        }
    }
}

/// Popover contents while it is open for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenEditor {
    pub field: String,
    pub column_type: ColumnType,
    /// Criteria shown as removable chips
    pub tentative: Vec<FilterCondition>,
    pub draft: DraftFilter,
    /// Committed criteria, restored by cancel
    #[serde(skip)]
    committed: Vec<FilterCondition>,
}

impl OpenEditor {
    /// Chip labels, e.g. `"Greater Than: 25"`
    pub fn chip_labels(&self) -> Vec<String> {
        self.tentative
            .iter()
            .map(|c| format!("{}: {}", c.operator.label(self.column_type), c.value))
            .collect()
    }

    /// Operator menu for this column as `(operator, label)` pairs
    pub fn operator_options(&self) -> Vec<(FilterOperator, &'static str)> {
        self.column_type
            .operators()
            .iter()
            .map(|op| (*op, op.label(self.column_type)))
            .collect()
    }

    /// Check if the tentative list differs from what is committed
    pub fn is_dirty(&self) -> bool {
        self.tentative != self.committed
    }
}

/// Popover state: closed, or open for exactly one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FilterEditor {
    #[default]
    Closed,
    Open(OpenEditor),
}

impl FilterEditor {
    pub fn new() -> Self {
        Self::Closed
    }

    /// Open for `field`, showing its committed criteria.
    ///
    /// Any editor already open for another field is discarded.
    pub fn open(
        &mut self,
        field: impl Into<String>,
        column_type: ColumnType,
        committed: Vec<FilterCondition>,
    ) {
        *self = Self::Open(OpenEditor {
            field: field.into(),
            column_type,
            tentative: committed.clone(),
            draft: DraftFilter::default(),
            committed,
        });
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Field the editor is open for
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Open(editor) => Some(&editor.field),
            Self::Closed => None,
        }
    }

    pub fn as_open(&self) -> Option<&OpenEditor> {
        match self {
            Self::Open(editor) => Some(editor),
            Self::Closed => None,
        }
    }

    fn as_open_mut(&mut self) -> Option<&mut OpenEditor> {
        match self {
            Self::Open(editor) => Some(editor),
            Self::Closed => None,
        }
    }

    /// Pick the draft operator. Operators the column type does not offer are ignored.
    pub fn set_draft_operator(&mut self, operator: FilterOperator) {
        match self.as_open_mut() {
            Some(editor) if editor.column_type.allows(operator) => editor.draft.operator = operator,
            Some(editor) => {
                debug!(field = %editor.field, %operator, "Ignoring operator not offered for column")
            }
            None => debug!("Ignoring operator change on closed filter editor"),
        }
    }

    pub fn set_draft_value(&mut self, value: impl Into<String>) {
        if let Some(editor) = self.as_open_mut() {
            editor.draft.value = value.into();
        }
    }

    /// Move the draft into the tentative list. Needs a non-empty value.
    ///
    /// Returns whether a criterion was added.
    pub fn add_draft(&mut self) -> bool {
        let Some(editor) = self.as_open_mut() else {
            return false;
        };
        if editor.draft.value.is_empty() {
            debug!(field = %editor.field, "Ignoring filter without a value");
            return false;
        }
        let draft = std::mem::take(&mut editor.draft);
        editor
            .tentative
            .push(FilterCondition::new(draft.operator, draft.value));
        true
    }

    /// Delete a tentative chip. Out of range indices are ignored.
    pub fn remove_tentative(&mut self, index: usize) -> Option<FilterCondition> {
        let editor = self.as_open_mut()?;
        if index < editor.tentative.len() {
            Some(editor.tentative.remove(index))
        } else {
            debug!(field = %editor.field, index, "Ignoring removal of missing tentative filter");
            None
        }
    }

    /// Close and return the edit that commits the tentative list.
    ///
    /// Applying a closed editor yields nothing.
    pub fn apply(&mut self) -> Option<QueryEvent> {
        match std::mem::take(self) {
            Self::Open(editor) => Some(QueryEvent::replace_filters(editor.field, editor.tentative)),
            Self::Closed => None,
        }
    }

    /// Close, discarding tentative edits
    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }
}
