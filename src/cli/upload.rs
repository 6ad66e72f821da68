// src/cli/upload.rs
use std::path::PathBuf;

use crate::digitization::api::{ImageUpload, OcrApiClient};
use crate::digitization::session::ValidationSession;

use super::{grid::print_document_grid, CliError};

pub async fn run(base_url: String, image: PathBuf, zone: String) -> Result<(), CliError> {
    let client = OcrApiClient::new(&base_url)?;
    let upload = ImageUpload::load(&image)?;
    println!(
        "Uploading {} ({}x{}, {}) to {}",
        upload.file_name,
        upload.width,
        upload.height,
        upload.mime,
        client.base_url()
    );

    let document = client.upload(&upload, &zone).await?;
    let session = ValidationSession::from_document(document.clone(), &zone);
    println!(
        "Document {} in zone {}",
        session.document_id().unwrap_or("(no id)"),
        session.zone_id()
    );
    print_document_grid(&document);
    Ok(())
}
