//! Cursor pagination
//!
//! List endpoints return an opaque cursor; the paginator carries it back
//! to the API together with a direction (`first`, `after`, `before`) as a
//! query parameter.

use crate::result::ApiResponse;

/// Requested page direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Fetch the first page
    First,
    /// Fetch the page after the cursor
    After,
    /// Fetch the page before the cursor
    Before,
}

impl PageAction {
    /// The query parameter name for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageAction::First => "first",
            PageAction::After => "after",
            PageAction::Before => "before",
        }
    }
}

/// Paginator over an API response's cursor.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    action: Option<PageAction>,
    cursor: Option<String>,
}

impl Paginator {
    /// Create a paginator from a response's pagination cursor.
    pub fn from_response(response: &ApiResponse) -> Self {
        Self {
            action: None,
            cursor: response
                .pagination
                .as_ref()
                .map(|pagination| pagination.cursor.clone()),
        }
    }

    /// Fetch the first set of results on the next request.
    pub fn first(mut self) -> Self {
        self.action = Some(PageAction::First);
        self
    }

    /// Fetch the next set of results on the next request.
    pub fn next(mut self) -> Self {
        self.action = Some(PageAction::After);
        self
    }

    /// Fetch the previous set of results on the next request.
    pub fn back(mut self) -> Self {
        self.action = Some(PageAction::Before);
        self
    }

    /// The current cursor, if the response carried one.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// The query pair appended to a paginated request.
    pub(crate) fn query_pair(&self) -> Option<(String, String)> {
        let action = self.action?;
        let cursor = self.cursor.clone()?;
        Some((action.as_str().to_string(), cursor))
    }
}
