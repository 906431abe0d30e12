use crate::config::AppConfig;
use crate::error::AppError;
use crate::intake::{check_dataset_file, DatasetFormat, IntakeError};
use crate::services::datasets::import::parse_dataset_csv;
use crate::services::multipart::{field_name, file_name, read_bounded, skip};
use crate::store::{Store, StoreError};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use certverify_common::model::dataset::{Dataset, DatasetStatus};
use chrono::{NaiveDate, Utc};
use futures_util::StreamExt;
use log::{info, warn};

const MAX_NAME_BYTES: usize = 1024;

/// HTTP handler: `201 Created` with the stored dataset, or the mapped error.
pub(crate) async fn process(
    payload: Multipart,
    store: web::Data<Store>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let dataset = upload_dataset(payload, store.get_ref().clone(), config.max_dataset_bytes)
        .await
        .inspect_err(|e| warn!("Dataset upload rejected: {}", e))?;
    Ok(HttpResponse::Created().json(dataset))
}

/// Collects the `name` and `file` parts (in any order) and imports the file.
async fn upload_dataset(
    mut payload: Multipart,
    store: Store,
    max_bytes: usize,
) -> Result<Dataset, AppError> {
    let mut name: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        match field_name(&field).as_deref() {
            Some("name") => {
                let bytes = read_bounded(&mut field, MAX_NAME_BYTES).await?;
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest("Dataset name is not valid UTF-8".into()))?;
                name = Some(value);
            }
            Some("file") => {
                let filename = file_name(&field);
                if check_dataset_file(&filename)? == DatasetFormat::Excel {
                    return Err(AppError::UnsupportedMedia(
                        "Excel datasets cannot be imported yet; export the sheet as CSV and upload that file."
                            .into(),
                    ));
                }
                let bytes = read_bounded(&mut field, max_bytes).await?;
                file = Some((filename, bytes));
            }
            _ => skip(&mut field).await?,
        }
    }

    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Dataset name is required".into()))?;
    let (filename, bytes) = file.ok_or(IntakeError::MissingFile)?;
    let today = Utc::now().date_naive();

    web::block(move || import_dataset(&store, name, &filename, &bytes, today)).await?
}

/// Blocking part of the upload: duplicate check, CSV parse, insert.
fn import_dataset(
    store: &Store,
    name: String,
    filename: &str,
    bytes: &[u8],
    today: NaiveDate,
) -> Result<Dataset, AppError> {
    let md5 = format!("{:x}", md5::compute(bytes));
    let datasets = store.datasets();
    if let Some(existing) = datasets.find_by_md5(&md5)? {
        return Err(already_uploaded(&existing.name));
    }

    let records = parse_dataset_csv(bytes)?;
    let mut dataset = Dataset {
        id: 0,
        name,
        record_count: records.len() as u64,
        upload_date: today,
        last_accessed: today,
        status: DatasetStatus::Active,
        content_md5: Some(md5),
    };
    // A concurrent upload of the same bytes may have committed since the
    // check above; the unique index on the MD5 decides.
    dataset.id = match datasets.insert_with_records(&dataset, &records) {
        Ok(id) => id,
        Err(StoreError::DuplicateContent { md5 }) => {
            let existing = datasets.find_by_md5(&md5)?;
            return Err(already_uploaded(
                existing.as_ref().map_or("another upload", |d| d.name.as_str()),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        "Imported dataset '{}' from {} ({} records)",
        dataset.name, filename, dataset.record_count
    );
    Ok(dataset)
}

fn already_uploaded(dataset_name: &str) -> AppError {
    AppError::Conflict(format!(
        "This file was already uploaded as dataset '{}'",
        dataset_name
    ))
}
