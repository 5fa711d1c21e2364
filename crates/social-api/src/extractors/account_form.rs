//! Multipart account form: `email` and `username` text parts plus an
//! optional `image` part, which is a file upload or the unchanged avatar URL

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
};
use social_service::dto::UpdateAccountRequest;
use social_service::ImageUpload;
use validator::Validate;

use crate::response::ApiError;

#[derive(Debug)]
pub struct AccountForm {
    pub fields: UpdateAccountRequest,
    pub image: Option<ImageUpload>,
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::invalid_body(err.body_text())
}

#[async_trait]
impl<S> FromRequest<S> for AccountForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        let mut fields = UpdateAccountRequest::default();
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "email" => fields.email = field.text().await.map_err(multipart_error)?,
                "username" => fields.username = field.text().await.map_err(multipart_error)?,
                "image" => {
                    // A text part carries the current avatar URL: no change
                    let Some(file_name) = field.file_name().map(ToString::to_string) else {
                        field.text().await.map_err(multipart_error)?;
                        continue;
                    };
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;

                    // Browsers send an empty part when no file was picked
                    if !bytes.is_empty() {
                        image = Some(ImageUpload {
                            content_type,
                            file_name: Some(file_name),
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        fields.validate()?;

        Ok(Self { fields, image })
    }
}
