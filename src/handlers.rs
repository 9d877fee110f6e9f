//! HTTP surface for the itinerary session.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::StreamExt;
use log::{debug, error, info, warn};
use serde::Serialize;
use utoipa::ToSchema;

use crate::document::{export_document, ExportError, ExportStatus};
use crate::itinerary::command::{FormCommand, ListSection};
use crate::itinerary::model::{ItineraryRecord, MIN_ACTIVITY_ROWS};
use crate::itinerary::ItinerarySession;
use crate::state::AppState;
use crate::upload::{process_image, UploadError, MAX_UPLOAD_BYTES};
use crate::validation::{form_status, validate_form, validate_section, FormStatus, SectionId,
    ValidationReport};
use crate::ErrorResponse;

/// Record plus session bookkeeping, returned by every read and mutation.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub record: ItineraryRecord,
    pub dirty: bool,
    pub revision: u64,
}

impl SessionResponse {
    fn from_session(session: &ItinerarySession) -> Self {
        Self {
            record: session.record.clone(),
            dirty: session.is_dirty(),
            revision: session.revision(),
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Itinerary",
    get,
    path = "/itinerary",
    responses(
        (status = 200, description = "Current draft record", body = SessionResponse)
    )
)]
pub async fn get_itinerary(data: web::Data<AppState>) -> impl Responder {
    let session = data.session.read();
    HttpResponse::Ok().json(SessionResponse::from_session(&session))
}

/// Floors below which a list may not shrink. The engine itself no-ops only
/// on out-of-range indices; the cardinality policy lives at this boundary.
fn removal_floor(section: ListSection) -> (usize, &'static str) {
    match section {
        ListSection::Days => (1, "At least one day is required"),
        ListSection::Flights => (1, "At least one flight is required"),
        ListSection::Hotels => (1, "At least one hotel is required"),
        ListSection::Activities => (MIN_ACTIVITY_ROWS, "At least 3 activity rows are required"),
        ListSection::ImportantNotes => (1, "At least one note is required"),
        ListSection::ScopeOfService => (1, "At least one service row is required"),
        ListSection::InclusionSummary => (1, "At least one inclusion row is required"),
    }
}

fn list_len(record: &ItineraryRecord, section: ListSection) -> usize {
    match section {
        ListSection::Days => record.days.len(),
        ListSection::Flights => record.flights.len(),
        ListSection::Hotels => record.hotels.len(),
        ListSection::Activities => record.activities.len(),
        ListSection::ImportantNotes => record.important_notes.len(),
        ListSection::ScopeOfService => record.scope_of_service.len(),
        ListSection::InclusionSummary => record.inclusion_summary.len(),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Itinerary",
    post,
    path = "/itinerary/commands",
    request_body = FormCommand,
    responses(
        (status = 200, description = "Command applied", body = SessionResponse),
        (status = 400, description = "Command rejected", body = ErrorResponse)
    )
)]
pub async fn apply_command(
    command: web::Json<FormCommand>,
    data: web::Data<AppState>,
) -> impl Responder {
    let command = command.into_inner();

    {
        let mut session = data.session.write();

        if let FormCommand::RemoveItem { section, .. } = &command {
            let section = *section;
            let (floor, message) = removal_floor(section);
            if list_len(&session.record, section) <= floor {
                debug!("Rejected removal below floor for {:?}", section);
                return HttpResponse::BadRequest().json(ErrorResponse::bad_request(message));
            }
        }

        session.apply(command);
    }

    data.queue_autosave();
    let session = data.session.read();
    HttpResponse::Ok().json(SessionResponse::from_session(&session))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Itinerary",
    post,
    path = "/itinerary/reset",
    responses(
        (status = 200, description = "Record reset to the seeded default", body = SessionResponse)
    )
)]
pub async fn reset_itinerary(data: web::Data<AppState>) -> impl Responder {
    {
        let mut session = data.session.write();
        session.apply(FormCommand::Reset);
    }
    info!("Itinerary draft reset");
    data.queue_autosave();
    let session = data.session.read();
    HttpResponse::Ok().json(SessionResponse::from_session(&session))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Validation",
    get,
    path = "/itinerary/validation",
    responses(
        (status = 200, description = "Whole-form validation report", body = ValidationReport)
    )
)]
pub async fn get_validation(data: web::Data<AppState>) -> impl Responder {
    let session = data.session.read();
    HttpResponse::Ok().json(validate_form(&session.record))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Validation",
    get,
    path = "/itinerary/validation/{section}",
    params(
        ("section" = String, Path, description = "Section name, e.g. `customer` or `hotels`")
    ),
    responses(
        (status = 200, description = "Section validation report", body = ValidationReport),
        (status = 400, description = "Unknown section", body = ErrorResponse)
    )
)]
pub async fn get_section_validation(
    section: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let Some(section) = SectionId::parse(&section) else {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::bad_request("Unknown validation section"));
    };
    let session = data.session.read();
    HttpResponse::Ok().json(validate_section(&session.record, section))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Validation",
    get,
    path = "/itinerary/status",
    responses(
        (status = 200, description = "Completion and validity rollup", body = FormStatus)
    )
)]
pub async fn get_status(data: web::Data<AppState>) -> impl Responder {
    let session = data.session.read();
    HttpResponse::Ok().json(form_status(&session.record))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Itinerary",
    get,
    path = "/itinerary/json",
    responses(
        (status = 200, description = "Pretty-printed record JSON", content_type = "application/json")
    )
)]
pub async fn export_json(data: web::Data<AppState>) -> impl Responder {
    let session = data.session.read();
    HttpResponse::Ok()
        .content_type("application/json")
        .body(session.to_pretty_json())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Itinerary",
    put,
    path = "/itinerary",
    request_body = ItineraryRecord,
    responses(
        (status = 200, description = "Record replaced", body = SessionResponse),
        (status = 400, description = "Malformed record JSON", body = ErrorResponse)
    )
)]
pub async fn import_json(body: String, data: web::Data<AppState>) -> impl Responder {
    let replaced = {
        let mut session = data.session.write();
        session.load_from_json(&body)
    };
    if !replaced {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::bad_request("Record JSON is malformed"));
    }

    info!("Itinerary draft replaced via import");
    data.queue_autosave();
    let session = data.session.read();
    HttpResponse::Ok().json(SessionResponse::from_session(&session))
}

async fn read_upload(mut payload: Multipart) -> Result<(String, String, Vec<u8>), String> {
    let mut field = payload
        .next()
        .await
        .ok_or("Multipart payload is empty")?
        .map_err(|e| e.to_string())?;

    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or("upload")
        .to_string();
    let mime = field
        .content_type()
        .map(|m| m.to_string())
        .unwrap_or_default();

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| e.to_string())?;
        bytes.extend_from_slice(&data);
        if bytes.len() > MAX_UPLOAD_BYTES {
            // stop draining once the payload is already over the cap
            break;
        }
    }

    Ok((file_name, mime, bytes))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Itinerary",
    post,
    path = "/itinerary/days/{index}/image",
    params(
        ("index" = usize, Path, description = "0-based day index")
    ),
    responses(
        (status = 200, description = "Image stored on the day", body = SessionResponse),
        (status = 400, description = "Rejected upload", body = ErrorResponse),
        (status = 404, description = "No such day", body = ErrorResponse),
        (status = 409, description = "Superseded by a newer upload", body = ErrorResponse)
    )
)]
pub async fn upload_day_image(
    index: web::Path<usize>,
    payload: Multipart,
    data: web::Data<AppState>,
) -> impl Responder {
    let index = index.into_inner();
    if data.session.read().record.days.len() <= index {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("No such day"));
    }

    let token = data.upload_tokens.begin(index);

    let (file_name, mime, bytes) = match read_upload(payload).await {
        Ok(parts) => parts,
        Err(e) => {
            warn!("Failed to read upload payload: {}", e);
            return HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request("Failed to read upload payload"));
        }
    };

    let processed = web::block(move || process_image(&file_name, &mime, &bytes)).await;
    let image = match processed {
        Ok(Ok(image)) => image,
        Ok(Err(e @ (UploadError::UnsupportedType | UploadError::TooLarge | UploadError::Empty))) => {
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()));
        }
        Ok(Err(e)) => {
            warn!("Image processing failed: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()));
        }
        Err(e) => {
            error!("Image processing task failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to process image"));
        }
    };

    if !data.upload_tokens.is_current(index, token) {
        debug!("Discarding stale upload result for day {}", index);
        return HttpResponse::Conflict()
            .json(ErrorResponse::new("Conflict", "Upload superseded by a newer one"));
    }

    {
        let mut session = data.session.write();
        let Some(day) = session.record.days.get_mut(index) else {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("No such day"));
        };
        day.image_preview = format!("data:{};base64,{}", image.mime_type, image.data);
        day.image = Some(image);
        session.mark_dirty();
    }

    info!("Stored image for day {}", index);
    data.queue_autosave();
    let session = data.session.read();
    HttpResponse::Ok().json(SessionResponse::from_session(&session))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Export",
    post,
    path = "/itinerary/export",
    responses(
        (status = 200, description = "Document assembled", body = ExportStatus),
        (status = 422, description = "Export blocked by a pre-check", body = ErrorResponse)
    )
)]
pub async fn export_itinerary(data: web::Data<AppState>) -> impl Responder {
    *data.export_status.write() = ExportStatus::Pending;

    let record = data.session.read().record.clone();
    match export_document(&record) {
        Ok(document) => {
            info!("Assembled itinerary document {}", document.file_name);
            let status = ExportStatus::Done { document };
            *data.export_status.write() = status.clone();
            HttpResponse::Ok().json(status)
        }
        Err(ExportError::Blocked(message)) => {
            warn!("Export blocked: {}", message);
            *data.export_status.write() = ExportStatus::Error {
                message: message.clone(),
            };
            HttpResponse::UnprocessableEntity().json(ErrorResponse::new("ExportBlocked", &message))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Export",
    get,
    path = "/itinerary/export/status",
    responses(
        (status = 200, description = "Current export job state", body = ExportStatus)
    )
)]
pub async fn get_export_status(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.export_status.read().clone())
}
