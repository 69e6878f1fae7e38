//! Image collection client methods

use gallery_core::validation::{UpdateForm, UploadForm};
use gallery_core::{Image, ImageOrder};
use serde_json::Value;

use super::{ApiRequest, ClientError, FormPart, GalleryClient, into_data, into_message};
use crate::types::{ApiResponse, ChangeOrderRequest};

impl GalleryClient {
    /// List the signed-in user's images
    pub async fn list_images(&self) -> Result<Vec<Image>, ClientError> {
        let envelope: ApiResponse<Vec<Image>> = self.execute(ApiRequest::get("/images")).await?;
        let mut images = into_data(envelope)?;
        images.sort_by_key(|image| image.order);
        Ok(images)
    }

    /// Upload new images, one title per file
    pub async fn upload_images(&self, form: &UploadForm) -> Result<Vec<Image>, ClientError> {
        form.validate().map_err(ClientError::Validation)?;

        let mut parts: Vec<FormPart> = form
            .files
            .iter()
            .map(|file| FormPart::file("images", file.clone()))
            .collect();
        let titles: Vec<&str> = form.titles.iter().map(|title| title.trim()).collect();
        parts.push(FormPart::text("titles", serde_json::to_string(&titles)?));

        let request = ApiRequest::post("/upload").multipart(parts);
        let envelope: ApiResponse<Vec<Image>> = self.execute(request).await?;
        into_data(envelope)
    }

    /// Persist a new ordering
    pub async fn change_order(&self, order: &[ImageOrder]) -> Result<String, ClientError> {
        let body = ChangeOrderRequest {
            image_order: order.to_vec(),
        };
        let request = ApiRequest::post("/change-order").json(&body)?;
        let envelope: ApiResponse<Value> = self.execute(request).await?;
        into_message(envelope)
    }

    /// Delete one image
    pub async fn delete_image(&self, id: &str) -> Result<String, ClientError> {
        let request = ApiRequest::delete(format!("/delete-image/{}", image_id(id)?));
        let envelope: ApiResponse<Value> = self.execute(request).await?;
        into_message(envelope)
    }

    /// Change the title and optionally the file of an image
    pub async fn update_image(&self, id: &str, form: &UpdateForm) -> Result<Image, ClientError> {
        form.validate().map_err(ClientError::Validation)?;

        let mut parts = vec![FormPart::text("title", form.title.trim())];
        if let Some(file) = &form.file {
            parts.push(FormPart::file("image", file.clone()));
        }

        let request =
            ApiRequest::post(format!("/update-image/{}", image_id(id)?)).multipart(parts);
        let envelope: ApiResponse<Image> = self.execute(request).await?;
        into_data(envelope)
    }
}

/// Image IDs are embedded in the path, so they must be a single segment
fn image_id(id: &str) -> Result<&str, ClientError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        let mut fields = gallery_core::FieldErrors::new();
        fields.add("id", "Invalid image id");
        return Err(ClientError::Validation(fields));
    }
    Ok(id)
}
