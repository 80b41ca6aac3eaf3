//! Submission workflow: upload a captured image to object storage and, for
//! authentication, ask the verification service who is in it.

use crate::capture::CapturedImage;
use crate::identity::Identity;
use mockall::automock;
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

pub const NOT_AUTHORIZED: &str = "Sorry, you are not authorized to access this worksite.";
pub const AUTHENTICATION_FAILED: &str = "Error during authentication process. Please try again.";
pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";
pub const MISSING_NAMES: &str = "Please enter first name and last name before uploading.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Unexpected status {0}")]
    Status(u16),
    #[error("Invalid response body: {0}")]
    Decode(String),
    #[error("Invalid endpoint {0}")]
    Endpoint(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("First name and last name are required")]
    MissingName,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Which object store bucket an image goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStore {
    /// Captures submitted for authentication.
    Visitor,
    /// Reference photos enrolled by employees.
    Employee,
}

/// Remote object key of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// `<first>_<last>.jpeg`
    pub fn for_employee(first_name: &str, last_name: &str) -> Self {
        Self(format!("{first_name}_{last_name}.jpeg"))
    }

    /// `<uuid>.jpeg`, fresh for every authentication attempt.
    pub fn random_visitor() -> Self {
        Self(format!("{}.jpeg", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `base` with the key appended as one percent-encoded path segment, so
    /// characters typed into a name cannot escape into the path or query.
    pub fn url_under(&self, base: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(base).map_err(|e| ApiError::Endpoint(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Endpoint(format!("{base}: cannot hold a path")))?
            .pop_if_empty()
            .push(&self.0);
        Ok(url)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw verification lookup result. Only a 200 carrying an identity counts as
/// a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub status: u16,
    pub identity: Option<Identity>,
}

/// HTTP access to the image store and verification service.
#[automock]
pub trait FaceApi {
    /// `PUT <store-base>/<key>` with a JPEG body.
    async fn put_image(
        &self,
        store: ImageStore,
        key: &ObjectKey,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError>;

    /// `GET <verify-base>?objectKey=<key>`
    async fn verify(&self, key: &ObjectKey) -> Result<Verification, ApiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authorized(Identity),
    NotAuthorized { status: u16 },
}

impl AuthOutcome {
    /// Where an authorized user lands: the task view scoped to them.
    pub fn landing_path(&self) -> Option<String> {
        match self {
            AuthOutcome::Authorized(identity) => Some(format!("/todo?{}", identity.to_query())),
            AuthOutcome::NotAuthorized { .. } => None,
        }
    }
}

/// Uploads an employee reference photo as `<first>_<last>.jpeg`. Names are
/// trimmed and must both be non-empty; nothing is sent otherwise.
#[instrument(skip_all)]
pub async fn enroll(
    api: &impl FaceApi,
    first_name: &str,
    last_name: &str,
    image: CapturedImage,
) -> Result<ObjectKey, SubmissionError> {
    let (first_name, last_name) = (first_name.trim(), last_name.trim());
    if first_name.is_empty() || last_name.is_empty() {
        return Err(SubmissionError::MissingName);
    }

    let key = ObjectKey::for_employee(first_name, last_name);
    api.put_image(ImageStore::Employee, &key, image.bytes)
        .await
        .inspect_err(|e| warn!(%key, error = %e, "Enrolment upload failed"))?;
    info!(%key, "Enrolment image uploaded");
    Ok(key)
}

/// Uploads a visitor capture under a fresh key, then asks the verification
/// service whether it matches an employee.
#[instrument(skip_all)]
pub async fn authenticate(
    api: &impl FaceApi,
    image: CapturedImage,
) -> Result<AuthOutcome, SubmissionError> {
    let key = ObjectKey::random_visitor();
    api.put_image(ImageStore::Visitor, &key, image.bytes)
        .await
        .inspect_err(|e| warn!(%key, error = %e, "Visitor upload failed"))?;

    let verification = api
        .verify(&key)
        .await
        .inspect_err(|e| warn!(%key, error = %e, "Verification request failed"))?;

    let outcome = match verification {
        Verification {
            status: 200,
            identity: Some(identity),
        } => AuthOutcome::Authorized(identity),
        Verification { status, .. } => AuthOutcome::NotAuthorized { status },
    };
    info!(%key, ?outcome, "Verification finished");
    Ok(outcome)
}

pub fn upload_success_message(key: &ObjectKey) -> String {
    format!("Image uploaded successfully as {key}!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn image() -> CapturedImage {
        CapturedImage::jpeg(vec![0xFF, 0xD8, 0xFF])
    }

    mod enroll_tests {
        use super::*;

        #[tokio::test]
        async fn enroll_puts_once_under_name_key() {
            // Arrange
            let mut api = MockFaceApi::new();
            api.expect_put_image()
                .withf(|store, key, bytes| {
                    *store == ImageStore::Employee
                        && key.as_str() == "Jane_Doe.jpeg"
                        && bytes == &vec![0xFF, 0xD8, 0xFF]
                })
                .times(1)
                .returning(|_, _, _| Ok(()));
            api.expect_verify().times(0);

            // Act
            let key = enroll(&api, " Jane ", "Doe", image()).await.unwrap();

            // Assert
            assert_eq!(key.as_str(), "Jane_Doe.jpeg");
            assert_eq!(
                upload_success_message(&key),
                "Image uploaded successfully as Jane_Doe.jpeg!"
            );
        }

        #[tokio::test]
        async fn enroll_rejects_blank_names_without_network() {
            // Arrange
            let mut api = MockFaceApi::new();
            api.expect_put_image().times(0);

            // Act
            let missing_last = enroll(&api, "Jane", "   ", image()).await;
            let missing_first = enroll(&api, "", "Doe", image()).await;

            // Assert
            assert_eq!(missing_last, Err(SubmissionError::MissingName));
            assert_eq!(missing_first, Err(SubmissionError::MissingName));
        }

        #[tokio::test]
        async fn enroll_surfaces_upload_failure() {
            // Arrange
            let mut api = MockFaceApi::new();
            api.expect_put_image()
                .times(1)
                .returning(|_, _, _| Err(ApiError::Status(500)));

            // Act
            let result = enroll(&api, "Jane", "Doe", image()).await;

            // Assert
            assert_eq!(result, Err(SubmissionError::Api(ApiError::Status(500))));
        }
    }

    mod authenticate_tests {
        use super::*;
        use std::sync::{Arc, Mutex};

        #[tokio::test]
        async fn authenticate_puts_then_verifies_same_key() {
            // Arrange
            let mut api = MockFaceApi::new();
            let mut seq = Sequence::new();
            let uploaded = Arc::new(Mutex::new(None::<String>));
            let uploaded_put = uploaded.clone();
            let uploaded_verify = uploaded.clone();

            api.expect_put_image()
                .withf(|store, key, _| {
                    *store == ImageStore::Visitor && key.as_str().ends_with(".jpeg")
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, key, _| {
                    *uploaded_put.lock().unwrap() = Some(key.as_str().to_string());
                    Ok(())
                });
            api.expect_verify()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |key| {
                    assert_eq!(
                        uploaded_verify.lock().unwrap().as_deref(),
                        Some(key.as_str())
                    );
                    Ok(Verification {
                        status: 200,
                        identity: Some(Identity::new("Jane", "Doe")),
                    })
                });

            // Act
            let outcome = authenticate(&api, image()).await.unwrap();

            // Assert
            assert_eq!(outcome, AuthOutcome::Authorized(Identity::new("Jane", "Doe")));
            assert_eq!(
                outcome.landing_path().as_deref(),
                Some("/todo?firstName=Jane&lastName=Doe")
            );
        }

        #[tokio::test]
        async fn authenticate_forbidden_is_not_authorized() {
            // Arrange
            let mut api = MockFaceApi::new();
            api.expect_put_image().times(1).returning(|_, _, _| Ok(()));
            api.expect_verify().times(1).returning(|_| {
                Ok(Verification {
                    status: 403,
                    identity: None,
                })
            });

            // Act
            let outcome = authenticate(&api, image()).await.unwrap();

            // Assert
            assert_eq!(outcome, AuthOutcome::NotAuthorized { status: 403 });
            assert_eq!(outcome.landing_path(), None);
        }

        #[tokio::test]
        async fn authenticate_ok_without_identity_is_not_authorized() {
            // Arrange
            let mut api = MockFaceApi::new();
            api.expect_put_image().times(1).returning(|_, _, _| Ok(()));
            api.expect_verify().times(1).returning(|_| {
                Ok(Verification {
                    status: 200,
                    identity: None,
                })
            });

            // Act
            let outcome = authenticate(&api, image()).await.unwrap();

            // Assert
            assert_eq!(outcome, AuthOutcome::NotAuthorized { status: 200 });
        }

        #[tokio::test]
        async fn authenticate_skips_verification_when_upload_fails() {
            // Arrange
            let mut api = MockFaceApi::new();
            api.expect_put_image()
                .times(1)
                .returning(|_, _, _| Err(ApiError::Transport("offline".to_string())));
            api.expect_verify().times(0);

            // Act
            let result = authenticate(&api, image()).await;

            // Assert
            assert_eq!(
                result,
                Err(SubmissionError::Api(ApiError::Transport("offline".to_string())))
            );
        }

        #[tokio::test]
        async fn authenticate_uses_fresh_key_each_attempt() {
            // Arrange
            let mut api = MockFaceApi::new();
            let keys = Arc::new(Mutex::new(Vec::<String>::new()));
            let recorded = keys.clone();
            api.expect_put_image().times(2).returning(move |_, key, _| {
                recorded.lock().unwrap().push(key.as_str().to_string());
                Ok(())
            });
            api.expect_verify().times(2).returning(|_| {
                Ok(Verification {
                    status: 404,
                    identity: None,
                })
            });

            // Act
            authenticate(&api, image()).await.unwrap();
            authenticate(&api, image()).await.unwrap();

            // Assert
            let keys = keys.lock().unwrap();
            assert_eq!(keys.len(), 2);
            assert_ne!(keys[0], keys[1]);
        }
    }

    #[test]
    fn test_employee_key_format() {
        assert_eq!(ObjectKey::for_employee("Jane", "Doe").as_str(), "Jane_Doe.jpeg");
    }

    #[test]
    fn test_key_url_appends_to_base_path() {
        let key = ObjectKey::for_employee("Jane", "Doe");

        let url = key.url_under("https://store.example.com/dev/employees/").unwrap();

        assert_eq!(url.as_str(), "https://store.example.com/dev/employees/Jane_Doe.jpeg");
    }

    #[test]
    fn test_key_url_escapes_reserved_characters_in_names() {
        // Arrange
        let key = ObjectKey::for_employee("Jane/../x?y", "Doe#1");

        // Act
        let url = key.url_under("https://store.example.com/dev/employees").unwrap();

        // Assert
        assert_eq!(
            url.as_str(),
            "https://store.example.com/dev/employees/Jane%2F..%2Fx%3Fy_Doe%231.jpeg"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn test_key_url_rejects_invalid_base() {
        let key = ObjectKey::random_visitor();

        let result = key.url_under("not a url");

        assert!(matches!(result, Err(ApiError::Endpoint(_))));
    }

    #[test]
    fn test_visitor_key_is_uuid_jpeg() {
        let key = ObjectKey::random_visitor();
        let stem = key.as_str().strip_suffix(".jpeg").unwrap();

        assert!(uuid::Uuid::parse_str(stem).is_ok());
    }
}
