//! Product image upload to the image host
//!
//! Images never touch local disk: the multipart body is forwarded to the
//! image host and only the returned URLs are stored on the product.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

/// Upload timeout, image bodies can be a few MB on slow uplinks
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a hosted image upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    /// Public display URL
    pub url: String,
    /// URL that removes the image from the host
    pub delete_url: String,
}

#[derive(Debug, Deserialize)]
struct ImgbbResponse {
    success: bool,
    data: Option<ImgbbData>,
}

#[derive(Debug, Deserialize)]
struct ImgbbData {
    url: String,
    delete_url: String,
}

/// Image host upload client
pub struct ImageUploadService {
    client: reqwest::Client,
    upload_url: String,
}

impl ImageUploadService {
    pub fn new(upload_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url,
        }
    }

    /// Upload one image, returns its hosted URLs
    pub async fn upload(
        &self,
        api_key: &str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> AppResult<UploadedImage> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("key", api_key.to_string())
            .part("image", part);

        let resp = self
            .client
            .post(&self.upload_url)
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Image upload failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Image host returned {}",
                resp.status()
            )));
        }

        let payload: ImgbbResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Image host response parse failed: {e}")))?;

        match payload.data {
            Some(data) if payload.success => {
                tracing::info!(url = %data.url, "Image uploaded");
                Ok(UploadedImage {
                    url: data.url,
                    delete_url: data.delete_url,
                })
            }
            _ => Err(AppError::Upstream(
                "Image host reported failure".to_string(),
            )),
        }
    }
}
