//! HTTP(S) push: one `multipart/form-data` POST per push.
//!
//! Form fields:
//! - `username`, `password`, and `test_id` when present
//! - one `files` part per file; the part's file name is the path relative
//!   to the push root (`HEAD`, `objects/ce/0136...`)

use std::fs;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::{PushReport, PushRequest, RemoteUrl, Transport, TransportError};

pub struct HttpTransport {
    url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(url: &RemoteUrl, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            url: url.http_url(),
            client,
        })
    }

    fn build_form(request: &PushRequest) -> Result<(Form, PushReport), TransportError> {
        let creds = &request.credentials;
        // Remote names contain '/', which path-segment encoding would escape.
        let mut form = Form::new()
            .percent_encode_noop()
            .text("username", creds.username.clone())
            .text("password", creds.password.clone());
        if let Some(ref test_id) = creds.test_id {
            form = form.text("test_id", test_id.clone());
        }

        let mut report = PushReport::default();
        for (path, name) in request.named_files()? {
            let data = fs::read(path)?;
            report.files += 1;
            report.bytes += data.len() as u64;
            debug!(file = %name, size = data.len(), "adding to upload");
            form = form.part("files", Part::bytes(data).file_name(name));
        }
        Ok((form, report))
    }
}

impl Transport for HttpTransport {
    fn push(&self, request: &PushRequest) -> Result<PushReport, TransportError> {
        let (form, report) = Self::build_form(request)?;

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .ok()
                .map(|body| body.trim().to_string())
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            return Err(TransportError::Http {
                status: status.as_u16(),
                message,
            });
        }

        info!(
            url = %self.url,
            files = report.files,
            bytes = report.bytes,
            "push accepted"
        );
        Ok(report)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
