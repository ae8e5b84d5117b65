//! Firestore REST implementation of the document store.

use crate::error::{DocStoreError, DocStoreResult};
use crate::store::DocumentStore;
use crate::value::{from_firestore_fields, to_firestore_fields};
use async_trait::async_trait;
use rowsync_protocol::{DocId, Fields, PersistedDocument};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// The parts of a service-account credential blob the relay needs.
///
/// The blob is the standard JSON file downloaded from the cloud console;
/// unknown keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    /// Project the Firestore database belongs to.
    pub project_id: String,
    /// Service account identity, for diagnostics only.
    #[serde(default)]
    pub client_email: Option<String>,
}

impl ServiceAccount {
    /// Parses a credential blob.
    pub fn from_json(blob: &str) -> DocStoreResult<Self> {
        let account: ServiceAccount = serde_json::from_str(blob)
            .map_err(|e| DocStoreError::Credentials(e.to_string()))?;
        if account.project_id.is_empty() {
            return Err(DocStoreError::Credentials("empty project_id".into()));
        }
        Ok(account)
    }
}

/// Firestore REST v1 document store.
///
/// One HTTP call per operation (listing follows page tokens until the set
/// is complete). Requests authenticate with a bearer access token minted
/// for the service account out of band.
#[derive(Debug)]
pub struct FirestoreStore {
    http: reqwest::Client,
    documents_url: String,
    access_token: String,
}

impl FirestoreStore {
    /// Creates a store for the account's `(default)` database.
    pub fn new(account: &ServiceAccount, access_token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, account, access_token)
    }

    /// Creates a store against a non-standard endpoint, e.g. an emulator.
    pub fn with_base_url(
        base_url: &str,
        account: &ServiceAccount,
        access_token: impl Into<String>,
    ) -> Self {
        let documents_url = format!(
            "{}/projects/{}/databases/(default)/documents",
            base_url.trim_end_matches('/'),
            account.project_id
        );
        Self {
            http: reqwest::Client::new(),
            documents_url,
            access_token: access_token.into(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_url, collection)
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDoc>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDoc {
    name: String,
    #[serde(default)]
    fields: Option<serde_json::Value>,
}

impl FirestoreDoc {
    fn into_document(self) -> DocStoreResult<PersistedDocument> {
        let fields = match &self.fields {
            Some(wrapped) => from_firestore_fields(wrapped)?,
            None => Fields::new(),
        };
        Ok(PersistedDocument::new(doc_id_from_name(&self.name), fields))
    }
}

/// Extracts the store-assigned id from a full document resource name,
/// `projects/p/databases/(default)/documents/registros/abc123` -> `abc123`.
fn doc_id_from_name(name: &str) -> DocId {
    DocId::new(name.rsplit('/').next().unwrap_or(name))
}

async fn check(response: reqwest::Response) -> DocStoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(DocStoreError::Status {
        code: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list(&self, collection: &str) -> DocStoreResult<Vec<PersistedDocument>> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url).bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = check(request.send().await?).await?;
            let page: ListResponse = response.json().await?;

            for doc in page.documents {
                documents.push(doc.into_document()?);
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    async fn add(&self, collection: &str, fields: &Fields) -> DocStoreResult<PersistedDocument> {
        let response = self
            .http
            .post(self.collection_url(collection))
            .bearer_auth(&self.access_token)
            .json(&json!({"fields": to_firestore_fields(fields)}))
            .send()
            .await?;
        let created: FirestoreDoc = check(response).await?.json().await?;
        let document = created.into_document()?;
        tracing::debug!(collection, id = %document.doc_id, "added document");
        Ok(document)
    }

    async fn delete(&self, collection: &str, id: &DocId) -> DocStoreResult<()> {
        let url = format!("{}/{}", self.collection_url(collection), id);
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        check(response).await?;
        tracing::debug!(collection, %id, "deleted document");
        Ok(())
    }
}
