//! Batch create, update and delete.

use crate::error::{ClientError, Result};
use crate::request::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sklad_core::{BulkResult, CoreError, Meta, MetaOwner, MetaWrapper};
use tokio_util::sync::CancellationToken;

fn log_failures<T>(path: &str, result: &BulkResult<T>) {
    for failure in result.failures() {
        tracing::warn!(
            path = %path,
            index = failure.index,
            code = ?failure.code(),
            error = %failure.message(),
            "Batch item failed"
        );
    }
}

impl RequestBuilder {
    /// POST many entities at once.
    ///
    /// Entities with an id are updated, the rest are created. Outcomes are
    /// aligned with `entities` by position.
    ///
    /// # Errors
    ///
    /// Fails as a whole only on transport errors, cancellation, a body that is
    /// not an array or an array of the wrong length. Per-item rejections are
    /// reported inside the [`BulkResult`].
    pub async fn create_update_many<T>(
        &self,
        entities: &[T],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let items = self.post_items(entities, cancel).await?;
        let result = BulkResult::decode(items);
        log_failures(self.path(), &result);
        Ok(result)
    }

    /// POST references of entities to delete.
    ///
    /// The path must be the batch delete path, e.g. `entity/product/delete`.
    /// Successful slots carry the meta of the corresponding reference.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingMeta`] before sending anything if a
    /// reference has no meta. Otherwise fails like
    /// [`RequestBuilder::create_update_many`].
    pub async fn delete_many<R: MetaOwner>(
        &self,
        references: &[R],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<Meta>> {
        let wrappers = references
            .iter()
            .enumerate()
            .map(|(index, r)| {
                r.meta_wrapper()
                    .ok_or(ClientError::Core(CoreError::MissingMeta { index }))
            })
            .collect::<Result<Vec<MetaWrapper>>>()?;

        let items = self.post_items(&wrappers, cancel).await?;
        let result = BulkResult::from_items(items, |index, _| Ok(wrappers[index].meta.clone()));
        log_failures(self.path(), &result);
        Ok(result)
    }

    /// POST values that identify themselves to a batch delete path.
    ///
    /// Used where items are keyed by their own fields instead of meta, such
    /// as tracking codes. Successful slots carry the corresponding value.
    ///
    /// # Errors
    ///
    /// Fails like [`RequestBuilder::create_update_many`].
    pub async fn delete_values<T>(
        &self,
        values: &[T],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<T>>
    where
        T: Serialize + Clone,
    {
        let items = self.post_items(values, cancel).await?;
        let result = BulkResult::from_items(items, |index, _| Ok(values[index].clone()));
        log_failures(self.path(), &result);
        Ok(result)
    }
}
