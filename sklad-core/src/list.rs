//! Paged collection responses.

use crate::meta::{MetaCollection, MetaWrapper};
use crate::params::Params;
use serde::{Deserialize, Serialize};

/// Page size the server applies when none is requested.
pub const DEFAULT_PAGE_SIZE: u64 = 1000;

/// Information about the employee who issued the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Reference to the employee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<MetaWrapper>,
}

/// One page of a collection: `{context, meta, rows}`.
///
/// The client never advances pages by itself; use [`List::next_params`] to
/// build the request for the following window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List<T> {
    /// Request context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    /// Paging metadata as returned by the server.
    #[serde(default)]
    pub meta: MetaCollection,
    /// Entities on this page, in server order.
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

impl<T> List<T> {
    /// Number of rows on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether this page has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether rows exist beyond this page.
    ///
    /// Uses the server's `meta.offset` and `meta.size`, not the requested
    /// window, since the server may cap the page size.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.meta.offset + (self.rows.len() as u64) < self.meta.size
    }

    /// Params for the next page, or `None` if this is the last one.
    ///
    /// The offset advances by the page size the server reported.
    #[must_use]
    pub fn next_params(&self, params: &Params) -> Option<Params> {
        if !self.has_more() {
            return None;
        }

        let step = if self.meta.limit > 0 {
            self.meta.limit
        } else {
            params
                .limit()
                .map(u64::from)
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE)
        };

        let next_offset = u32::try_from(self.meta.offset + step).ok()?;
        Some(params.clone().with_offset(next_offset))
    }

    /// Map every row, keeping paging metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> List<U> {
        List {
            context: self.context,
            meta: self.meta,
            rows: self.rows.into_iter().map(f).collect(),
        }
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
