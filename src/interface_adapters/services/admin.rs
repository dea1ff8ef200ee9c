use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::entities::Role;
use crate::domain::errors::ApiError;
use crate::interface_adapters::endpoints::role_prefix;
use crate::interface_adapters::http::RestClient;
use crate::interface_adapters::protocol::{ListParams, ListResult};

/// Data-provider seam for the external CRUD admin framework.
///
/// Resources are addressed under the role's API scope, e.g. `vendors` for an
/// admin session resolves to `/admin/vendors`. Pagination is the canonical
/// `page`/`limit` style everywhere.
#[derive(Clone)]
pub struct AdminGateway {
    rest: RestClient,
    role: Role,
}

impl AdminGateway {
    pub fn new(rest: RestClient, role: Role) -> Self {
        Self { rest, role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    fn resource_path(&self, resource: &str) -> String {
        format!("{}/{resource}", role_prefix(self.role))
    }

    pub async fn get_list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &ListParams,
    ) -> Result<ListResult<T>, ApiError> {
        self.rest
            .get_json_with(&self.resource_path(resource), &params.to_query())
            .await
    }

    pub async fn get_one<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> Result<T, ApiError> {
        self.rest
            .get_json(&format!("{}/{id}", self.resource_path(resource)))
            .await
    }

    pub async fn create<B, T>(&self, resource: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.rest.post_json(&self.resource_path(resource), body).await
    }

    pub async fn update<B, T>(&self, resource: &str, id: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.rest
            .put_json(&format!("{}/{id}", self.resource_path(resource)), body)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> Result<T, ApiError> {
        self.rest
            .delete_json(&format!("{}/{id}", self.resource_path(resource)))
            .await
    }
}
