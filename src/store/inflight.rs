use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;
use crate::api::ApiError;

type SharedRequest<T> = Shared<BoxFuture<'static, Result<T, ApiError>>>;

/// At most one outstanding request per operation name; later callers await the
/// request already on the wire instead of issuing their own.
pub(crate) struct Inflight<T> {
    pending: Mutex<HashMap<&'static str, SharedRequest<T>>>,
}

impl<T> Inflight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn run<F>(&self, operation: &'static str, start: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, ApiError>>,
    {
        self.dispatch(operation, start, true).await
    }

    /// Always put a new request on the wire, even if one is outstanding. Callers
    /// arriving afterwards join the new request; the older one still completes
    /// for whoever was already awaiting it.
    pub(crate) async fn restart<F>(&self, operation: &'static str, start: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, ApiError>>,
    {
        self.dispatch(operation, start, false).await
    }

    async fn dispatch<F>(
        &self,
        operation: &'static str,
        start: F,
        join_pending: bool,
    ) -> Result<T, ApiError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, ApiError>>,
    {
        let request = {
            let mut pending = lock(&self.pending);
            match pending.get(operation) {
                Some(existing) if join_pending && existing.peek().is_none() => {
                    log::debug!("Joining in-flight {} request", operation);
                    existing.clone()
                }
                _ => {
                    let request = start().shared();
                    pending.insert(operation, request.clone());
                    request
                }
            }
        };

        let result = request.clone().await;

        let mut pending = lock(&self.pending);
        if pending
            .get(operation)
            .is_some_and(|current| current.ptr_eq(&request))
        {
            pending.remove(operation);
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self, operation: &str) -> bool {
        lock(&self.pending).contains_key(operation)
    }
}
