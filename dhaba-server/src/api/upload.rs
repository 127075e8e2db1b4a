//! Image Upload Routes
//!
//! 商品图片经图床中转，服务端不落盘。图床 API key 从远程配置
//! 服务获取 (或 IMGBB_API_KEY 环境变量)。

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};

use crate::auth::{perm, require_permission};
use crate::core::ServerState;
use crate::services::UploadedImage;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// 图片大小上限 (imgbb 免费档为 32MB，这里收紧到 10MB)
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/upload/image", post(upload_image))
        // axum 默认 2MB 请求体上限，放宽到图片上限
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .route_layer(from_fn_with_state(
            state,
            require_permission(perm::PRODUCTS_WRITE),
        ))
}

/// Upload a product image
///
/// Multipart form with one `image` field.
pub async fn upload_image(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<UploadedImage>>> {
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field
            .file_name()
            .unwrap_or("upload.jpg")
            .to_string();
        let bytes = field.bytes().await?;
        image = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) =
        image.ok_or_else(|| AppError::Validation("Missing 'image' field".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Image is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(format!(
            "Image exceeds {} bytes",
            MAX_IMAGE_BYTES
        )));
    }

    let api_key = state.remote_config().imgbb_api_key().await?;
    let uploaded = state
        .image_upload()
        .upload(&api_key, file_name, bytes)
        .await?;

    Ok(ok(uploaded))
}
