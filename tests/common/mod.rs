//! Stub provider and session helpers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use precis::credential::Credential;
use precis::provider::{ChatRequest, ChatResponse, Provider, ProviderError};
use precis::{CredentialStore, Session};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A provider that answers from canned results and records every call.
pub struct StubProvider {
    validation_status: Option<u16>,
    completion: Result<ChatResponse, u16>,
    list_calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
    keys_seen: Mutex<Vec<String>>,
}

impl StubProvider {
    /// Accepts every key and answers every completion with `content`.
    pub fn answering(content: &str) -> Self {
        Self {
            validation_status: None,
            completion: Ok(ChatResponse::with_content(content)),
            list_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            keys_seen: Mutex::new(Vec::new()),
        }
    }

    /// Accepts every key and answers every completion with `response`.
    pub fn responding(response: ChatResponse) -> Self {
        Self {
            completion: Ok(response),
            ..Self::answering("")
        }
    }

    /// Accepts every key and fails every completion with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            completion: Err(status),
            ..Self::answering("")
        }
    }

    /// Rejects key validation with `status`.
    pub fn rejecting_keys(status: u16) -> Self {
        Self {
            validation_status: Some(status),
            ..Self::answering("")
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn keys_seen(&self) -> Vec<String> {
        self.keys_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn list_models(&self, credential: &Credential) -> Result<(), ProviderError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.keys_seen
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        match self.validation_status {
            None => Ok(()),
            Some(status) => Err(ProviderError::Status {
                status,
                message: "stubbed rejection".to_string(),
            }),
        }
    }

    async fn complete(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.keys_seen
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        match &self.completion {
            Ok(response) => Ok(response.clone()),
            Err(status) => Err(ProviderError::Status {
                status: *status,
                message: "stubbed failure".to_string(),
            }),
        }
    }
}

/// A session over `provider` backed by a fresh temporary store.
///
/// The returned `TempDir` must outlive the session.
pub fn session_with(provider: Arc<StubProvider>) -> (Session, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::open(dir.path().join("credentials")).unwrap();
    (Session::new(provider, store, "gpt-3.5-turbo"), dir)
}

/// A session whose key has already been validated.
pub async fn ready_session(provider: Arc<StubProvider>) -> (Session, TempDir) {
    let (mut session, dir) = session_with(provider);
    session.save("sk-test-key").await.unwrap();
    (session, dir)
}

/// A minimal PDF with one Helvetica text line per page.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let font_id = 3 + 2 * pages.len();
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 3 + 2 * i))
        .collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    ];
    for (i, text) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
            font_id,
            4 + 2 * i
        ));
        let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}
