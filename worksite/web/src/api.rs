//! HTTP adapters for the remote image store, verification service and
//! record store.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use worksite_core::config::EndpointsConfig;
use worksite_core::{
    ApiError, BoardRecord, FaceApi, Identity, ImageStore, ObjectKey, RecordStore, Verification,
};

fn api_error(e: reqwest::Error) -> ApiError {
    match e.status() {
        Some(status) => ApiError::Status(status.as_u16()),
        None => ApiError::Transport(e.to_string()),
    }
}

#[derive(Clone)]
pub struct HttpFaceApi {
    client: Client,
    endpoints: EndpointsConfig,
}

impl HttpFaceApi {
    pub fn new(endpoints: EndpointsConfig) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    fn storage_base(&self, store: ImageStore) -> &str {
        match store {
            ImageStore::Visitor => &self.endpoints.visitor_storage_base,
            ImageStore::Employee => &self.endpoints.employee_storage_base,
        }
    }
}

impl FaceApi for HttpFaceApi {
    async fn put_image(
        &self,
        store: ImageStore,
        key: &ObjectKey,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let url = key.url_under(self.storage_base(store))?;
        debug!(%url, bytes = bytes.len(), "Uploading image");
        self.client
            .put(url)
            .header(CONTENT_TYPE, "image/jpeg")
            .header(ACCEPT, "*/*")
            .body(bytes)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(api_error)?;
        Ok(())
    }

    async fn verify(&self, key: &ObjectKey) -> Result<Verification, ApiError> {
        let response = self
            .client
            .get(&self.endpoints.verify_base)
            .query(&[("objectKey", key.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(api_error)?;

        let status = response.status();
        let identity = if status == StatusCode::OK {
            match response.json::<Identity>().await {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!(error = %e, "Verification succeeded without a usable identity");
                    None
                }
            }
        } else {
            None
        };

        Ok(Verification {
            status: status.as_u16(),
            identity,
        })
    }
}

#[derive(Clone)]
pub struct HttpRecordStore {
    client: Client,
    board_base: String,
}

impl HttpRecordStore {
    pub fn new(endpoints: &EndpointsConfig) -> Self {
        Self {
            client: Client::new(),
            board_base: endpoints.board_base.clone(),
        }
    }
}

impl RecordStore for HttpRecordStore {
    async fn load(&self, username: &str) -> Result<Option<BoardRecord>, ApiError> {
        let response = self
            .client
            .get(&self.board_base)
            .query(&[("username", username)])
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(api_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        response
            .error_for_status()
            .map_err(api_error)?
            .json::<BoardRecord>()
            .await
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn save(&self, record: &BoardRecord) -> Result<(), ApiError> {
        self.client
            .post(&self.board_base)
            .json(record)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(api_error)?;
        Ok(())
    }
}
