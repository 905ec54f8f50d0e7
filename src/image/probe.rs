//! Checks whether an image URL can actually be loaded.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::constants::IMAGE_PROBE_MAX_BYTES;

/// Why an image URL failed to load
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("Not an image (content type '{0}')")]
    NotAnImage(String),

    #[error("Image body is empty")]
    Empty,

    #[error("Image is larger than {0} bytes")]
    TooLarge(usize),

    #[error("Image could not be decoded: {0}")]
    Decode(#[from] ::image::ImageError),
}

/// Something that can tell whether a URL points at a loadable image.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), ProbeError>;
}

/// Probes images with a plain GET request and decodes the body.
///
/// No `Referer` header is sent, which gets past basic hotlink protection, and
/// no credentials are attached. Bodies above the size limit are rejected
/// without being read in full.
#[derive(Clone, Debug)]
pub struct HttpImageProbe {
    http: Client,
    max_bytes: usize,
}

impl HttpImageProbe {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let http = Client::builder().referer(false).timeout(timeout).build()?;
        Ok(Self {
            http,
            max_bytes: IMAGE_PROBE_MAX_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        let mut response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(ProbeError::NotAnImage(content_type));
        }

        if response.content_length().is_some_and(|len| len > self.max_bytes as u64) {
            return Err(ProbeError::TooLarge(self.max_bytes));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(ProbeError::TooLarge(self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(ProbeError::Empty);
        }

        ::image::load_from_memory(&body)?;
        Ok(())
    }
}
