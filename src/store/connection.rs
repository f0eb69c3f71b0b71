use crate::{
    common,
    error::{Error, Result},
    read, store, write,
};

use aws_config::{BehaviorVersion, meta::region::RegionProviderChain, profile};
use aws_sdk_dynamodb::{
    Client,
    config::{self, Credentials, Region},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Region used when neither the options nor the environment name one.
const DEFAULT_REGION: &str = "us-east-1";

/// Options used to build a [`Connection`].
///
/// Credentials are taken, in order, from the static keys, from `profile`, then from
/// the default provider chain (environment, instance profile, ...).
///
/// ```rust
/// use dynamodb_mapper::store::connection::ConnectionOptions;
///
/// let options = ConnectionOptions {
///     endpoint_url: Some("http://localhost:8000".to_string()),
///     region: Some("us-east-1".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOptions {
    /// Static access key id, used together with `secret_access_key`.
    pub access_key_id: Option<String>,
    /// Custom endpoint, e.g. a local DynamoDB.
    pub endpoint_url: Option<String>,
    /// Named profile from the shared AWS config files.
    pub profile: Option<String>,
    /// AWS region.
    pub region: Option<String>,
    /// Static secret access key, used together with `access_key_id`.
    pub secret_access_key: Option<String>,
    /// Session token for temporary static credentials.
    pub session_token: Option<String>,
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("access_key_id", &self.access_key_id)
            .field("endpoint_url", &self.endpoint_url)
            .field("profile", &self.profile)
            .field("region", &self.region)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "** redacted **"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// Connection to DynamoDB.
///
/// Cloning is cheap: clones share the underlying SDK client. To reconfigure, build a
/// new connection and rebind table handles with [`crate::table::Table::with_store`].
///
/// ```rust,no_run
/// use dynamodb_mapper::store::connection::{Connection, ConnectionOptions};
///
/// # async fn example() {
/// let connection = Connection::connect(ConnectionOptions {
///     endpoint_url: Some("http://localhost:8000".to_string()),
///     ..Default::default()
/// })
/// .await;
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Connection {
    client: Client,
}

impl Connection {
    /// Load the AWS configuration and build a client from the options.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.connect")
    )]
    pub async fn connect(options: ConnectionOptions) -> Self {
        let region_provider = RegionProviderChain::first_try(options.region.map(Region::new))
            .or_default_provider()
            .or_else(DEFAULT_REGION);
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
        if let (Some(access_key_id), Some(secret_access_key)) =
            (options.access_key_id, options.secret_access_key)
        {
            let credentials = Credentials::new(
                access_key_id,
                secret_access_key,
                options.session_token,
                None,
                "dynamodb-mapper",
            );
            loader = loader.credentials_provider(credentials);
        } else if let Some(profile_name) = options.profile {
            let credentials = profile::ProfileFileCredentialsProvider::builder()
                .profile_name(profile_name)
                .build();
            loader = loader.credentials_provider(credentials);
        }
        let sdk_config = loader.load().await;
        let mut builder = config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = options.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        Self::from_client(Client::from_conf(builder.build()))
    }

    /// Wrap an existing SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying SDK client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl From<Client> for Connection {
    fn from(client: Client) -> Self {
        Self::from_client(client)
    }
}

impl store::Store for Connection {
    async fn get_item(&self, request: read::get_item::GetItem) -> Result<Option<common::Item>> {
        let output = request.send(&self.client).await.map_err(Error::store)?;
        Ok(output.item)
    }

    async fn query(&self, request: read::query::Query) -> Result<Vec<common::Item>> {
        let output = request.send(&self.client).await.map_err(Error::store)?;
        Ok(output.items.unwrap_or_default())
    }

    async fn batch_get_item(
        &self,
        request: read::batch_get_item::BatchGetItem,
    ) -> Result<Vec<common::Item>> {
        let table_name = request.table_name.clone();
        let output = request.send(&self.client).await.map_err(Error::store)?;
        let unprocessed: usize = output
            .unprocessed_keys
            .iter()
            .flatten()
            .map(|(_, keys_and_attributes)| keys_and_attributes.keys.len())
            .sum();
        if unprocessed > 0 {
            return Err(Error::Unprocessed(unprocessed));
        }
        let items = output
            .responses
            .and_then(|mut responses| responses.remove(&table_name))
            .unwrap_or_default();
        Ok(items)
    }

    async fn put_item(&self, request: write::put_item::PutItem) -> Result<()> {
        request.send(&self.client).await.map_err(Error::store)?;
        Ok(())
    }

    async fn update_item(&self, request: write::update_item::UpdateItem) -> Result<()> {
        request.send(&self.client).await.map_err(Error::store)?;
        Ok(())
    }

    async fn delete_item(&self, request: write::delete_item::DeleteItem) -> Result<()> {
        request.send(&self.client).await.map_err(Error::store)?;
        Ok(())
    }

    async fn batch_write_item(
        &self,
        request: write::batch_write_item::BatchWriteItem,
    ) -> Result<()> {
        let output = request.send(&self.client).await.map_err(Error::store)?;
        let unprocessed: usize = output
            .unprocessed_items
            .iter()
            .flatten()
            .map(|(_, write_requests)| write_requests.len())
            .sum();
        if unprocessed > 0 {
            return Err(Error::Unprocessed(unprocessed));
        }
        Ok(())
    }
}
