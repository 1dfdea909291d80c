//! Per-item outcomes of batch operations.
//!
//! A batch request carries many entities in one body and the server answers
//! with an array of the same length. Each slot is either the processed item or
//! an error object, so a failure only ever affects its own slot.

use crate::error::ApiError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

/// Failure of a single item in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemError {
    /// Position of the item in the request.
    pub index: usize,
    /// Errors the server reported for the item.
    pub errors: Vec<ApiError>,
}

impl BulkItemError {
    /// Code of the first reported error.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        self.errors.first().and_then(|e| e.code)
    }

    /// All messages joined with `"; "`.
    #[must_use]
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.error.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Whether the item failed because the entity does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.errors.iter().any(ApiError::is_not_found)
    }
}

/// Outcome of one batch item.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome<T> {
    /// The item was processed.
    Ok(T),
    /// The item was rejected.
    Err(BulkItemError),
}

impl<T> BulkOutcome<T> {
    /// Whether the item was processed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The processed item, if any.
    #[must_use]
    pub fn ok(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    /// The item error, if any.
    #[must_use]
    pub fn err(&self) -> Option<&BulkItemError> {
        match self {
            Self::Ok(_) => None,
            Self::Err(error) => Some(error),
        }
    }
}

/// Outcomes of a batch, aligned with the request by position.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkResult<T> {
    outcomes: Vec<BulkOutcome<T>>,
}

#[derive(Deserialize)]
struct ErrorProbe {
    #[serde(default)]
    errors: Option<Vec<ApiError>>,
}

impl<T> BulkResult<T> {
    /// Classify raw response items.
    ///
    /// Items carrying an `errors` array become [`BulkOutcome::Err`]; every
    /// other item is passed to `on_success`, and a decode failure there only
    /// degrades that item's slot.
    pub fn from_items<F>(items: Vec<Box<RawValue>>, mut on_success: F) -> Self
    where
        F: FnMut(usize, &RawValue) -> Result<T, serde_json::Error>,
    {
        let outcomes = items
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let probe = serde_json::from_str::<ErrorProbe>(raw.get())
                    .ok()
                    .and_then(|p| p.errors);

                match probe {
                    Some(errors) => BulkOutcome::Err(BulkItemError { index, errors }),
                    None => match on_success(index, raw) {
                        Ok(value) => BulkOutcome::Ok(value),
                        Err(e) => BulkOutcome::Err(BulkItemError {
                            index,
                            errors: vec![ApiError::new(
                                format!("Failed to decode item: {}", e),
                                None,
                            )],
                        }),
                    },
                }
            })
            .collect();

        Self { outcomes }
    }

    /// Number of outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the batch was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Whether every item was processed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(BulkOutcome::is_ok)
    }

    /// Outcomes in request order.
    #[must_use]
    pub fn outcomes(&self) -> &[BulkOutcome<T>] {
        &self.outcomes
    }

    /// Iterate outcomes in request order.
    pub fn iter(&self) -> std::slice::Iter<'_, BulkOutcome<T>> {
        self.outcomes.iter()
    }

    /// Processed items.
    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().filter_map(BulkOutcome::ok)
    }

    /// Rejected items.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItemError> {
        self.outcomes.iter().filter_map(BulkOutcome::err)
    }
}

impl<T: DeserializeOwned> BulkResult<T> {
    /// Classify raw response items, decoding successes as `T`.
    #[must_use]
    pub fn decode(items: Vec<Box<RawValue>>) -> Self {
        Self::from_items(items, |_, raw| serde_json::from_str(raw.get()))
    }
}

impl<T> IntoIterator for BulkResult<T> {
    type Item = BulkOutcome<T>;
    type IntoIter = std::vec::IntoIter<BulkOutcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}
