use std::marker::PhantomData;
use std::sync::Arc;

use paged_list::{ListError, PageRequest, PageSource, PagedResult};
use serde::de::DeserializeOwned;

use crate::client::{BackendClient, Resource};

/// One backend collection exposed as a page source for a list controller
pub struct ResourceSource<T> {
    client: Arc<BackendClient>,
    resource: Resource,
    _item: PhantomData<fn() -> T>,
}

impl<T> ResourceSource<T> {
    pub fn new(client: Arc<BackendClient>, resource: Resource) -> Self {
        Self {
            client,
            resource,
            _item: PhantomData,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }
}

impl<T> PageSource<T> for ResourceSource<T>
where
    T: DeserializeOwned + Send,
{
    async fn fetch_page(&self, request: &PageRequest) -> paged_list::Result<PagedResult<T>> {
        self.client
            .list(self.resource, request)
            .await
            .map_err(ListError::from)
    }
}
