use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::{
    config::CloudinaryConfig,
    error::{AppError, Result},
};

pub const PRODUCT_FOLDER: &str = "blessed/products";
pub const DROP_FOLDER: &str = "blessed/drops";

#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
    #[serde(rename = "publicId")]
    pub public_id: String,
}

#[derive(Debug, Deserialize)]
struct UploadApiResponse {
    secure_url: String,
    public_id: String,
}

/// Cloudinary request signature: the sorted `key=value` pairs joined with
/// `&`, with the API secret appended, hashed with SHA-1.
pub fn api_signature(params: &BTreeMap<String, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl CloudinaryClient {
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    pub async fn upload_image(&self, folder: &str, bytes: Vec<u8>) -> Result<UploadedImage> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params = BTreeMap::new();
        params.insert("folder".to_string(), folder.to_string());
        params.insert("timestamp".to_string(), timestamp.clone());
        let signature = api_signature(&params, &self.api_secret);

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name("upload"),
            )
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);

        let response = self
            .http
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                self.cloud_name
            ))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Cloudinary upload request failed: {}", e);
                AppError::InternalError("Error al subir imagen.".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Cloudinary upload rejected ({}): {}", status, body);
            return Err(AppError::InternalError("Error al subir imagen.".to_string()));
        }

        let uploaded: UploadApiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Cloudinary response: {}", e);
            AppError::InternalError("Error al subir imagen.".to_string())
        })?;

        Ok(UploadedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    pub async fn destroy(&self, public_id: &str) -> Result<()> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params = BTreeMap::new();
        params.insert("public_id".to_string(), public_id.to_string());
        params.insert("timestamp".to_string(), timestamp.clone());
        let signature = api_signature(&params, &self.api_secret);

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .http
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/image/destroy",
                self.cloud_name
            ))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Cloudinary destroy request failed: {}", e);
                AppError::InternalError("Error al borrar imagen.".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Cloudinary destroy rejected ({}): {}", status, body);
            return Err(AppError::InternalError(
                "Error al borrar imagen.".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_sorted_params_with_secret_appended() {
        let mut params = BTreeMap::new();
        params.insert("timestamp".to_string(), "1700000000".to_string());
        params.insert("folder".to_string(), PRODUCT_FOLDER.to_string());

        assert_eq!(
            api_signature(&params, "secret"),
            "a5ff916c115f7d81db160e1f6d7e50e0fc505e1f"
        );
    }

    #[test]
    fn signs_destroy_params() {
        let mut params = BTreeMap::new();
        params.insert(
            "public_id".to_string(),
            "blessed/products/abc123".to_string(),
        );
        params.insert("timestamp".to_string(), "1700000000".to_string());

        assert_eq!(
            api_signature(&params, "secret"),
            "1bfff03a570a1f87dc80887b3090916a973df88d"
        );
    }
}
