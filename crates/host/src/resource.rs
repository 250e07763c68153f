//! Local resource scheme
//!
//! Serves `re-resource://` requests from a root directory so the document
//! can reference local images. Images are always re-encoded as JPEG; other
//! files go out untouched and without a declared MIME type.

use std::path::PathBuf;

use image::codecs::jpeg::JpegEncoder;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::config::ResourceSection;
use crate::error::ResourceError;

const JPEG_MIME: &str = "image/jpeg";

/// Bytes handed back to the web surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    pub body: Vec<u8>,
    pub mime_type: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct ResourceSchemeHandler {
    scheme: String,
    root: PathBuf,
    jpeg_quality: u8,
}

impl ResourceSchemeHandler {
    pub fn new(scheme: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            scheme: scheme.into(),
            root: root.into(),
            jpeg_quality: 90,
        }
    }

    pub fn from_config(section: &ResourceSection) -> Self {
        Self::new(section.scheme.clone(), section.root.clone())
            .with_jpeg_quality(section.jpeg_quality)
    }

    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn handles(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
    }

    /// Map a request URL onto a file under the root
    ///
    /// The host part, when present, is the first path segment.
    pub fn resolve(&self, url: &Url) -> Result<PathBuf, ResourceError> {
        if !self.handles(url) {
            return Err(ResourceError::Scheme(url.scheme().to_string()));
        }

        let decoded = percent_decode_str(url.path())
            .decode_utf8()
            .map_err(|_| ResourceError::OutsideRoot(url.to_string()))?;

        let mut path = self.root.clone();
        let host = url.host_str().filter(|h| !h.is_empty());
        for segment in host.into_iter().chain(decoded.split('/')) {
            match segment {
                "" | "." => {}
                ".." => return Err(ResourceError::OutsideRoot(url.to_string())),
                s if s.contains(['\\', '\0']) => {
                    return Err(ResourceError::OutsideRoot(url.to_string()))
                }
                s => path.push(s),
            }
        }
        Ok(path)
    }

    pub async fn load(&self, url: &Url) -> Result<ResourceResponse, ResourceError> {
        let path = self.resolve(url)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResourceError::NotFound(path))
            }
            Err(e) => return Err(e.into()),
        };

        let is_image = mime_guess::from_path(&path)
            .first_raw()
            .is_some_and(|mime| mime.starts_with("image/"));
        tracing::debug!(path = %path.display(), bytes = bytes.len(), is_image, "Serving resource");

        if !is_image {
            return Ok(ResourceResponse {
                body: bytes,
                mime_type: None,
            });
        }

        let quality = self.jpeg_quality;
        let body = tokio::task::spawn_blocking(move || transcode_jpeg(&bytes, quality))
            .await
            .map_err(std::io::Error::other)??;
        Ok(ResourceResponse {
            body,
            mime_type: Some(JPEG_MIME),
        })
    }
}

fn transcode_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let mut out = Vec::new();
    decoded
        .to_rgb8()
        .write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
    Ok(out)
}
