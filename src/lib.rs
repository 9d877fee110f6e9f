use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod document;
pub mod handlers;
pub mod itinerary;
pub mod persistence;
pub mod state;
pub mod upload;
pub mod validation;

pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_itinerary,
        crate::handlers::apply_command,
        crate::handlers::reset_itinerary,
        crate::handlers::get_validation,
        crate::handlers::get_section_validation,
        crate::handlers::get_status,
        crate::handlers::export_json,
        crate::handlers::import_json,
        crate::handlers::upload_day_image,
        crate::handlers::export_itinerary,
        crate::handlers::get_export_status
    ),
    components(
        schemas(
            itinerary::model::ItineraryRecord,
            itinerary::model::CustomerInfo,
            itinerary::model::DayPlan,
            itinerary::model::DayImage,
            itinerary::model::FlightSegment,
            itinerary::model::HotelStay,
            itinerary::model::ActivityEntry,
            itinerary::model::ActivityType,
            itinerary::model::PaymentPlan,
            itinerary::model::Installment,
            itinerary::model::InstallmentAmount,
            itinerary::model::RemainingMarker,
            itinerary::model::TcsStatus,
            itinerary::model::VisaInfo,
            itinerary::model::CompanyInfo,
            itinerary::model::NoteRow,
            itinerary::model::ServiceRow,
            itinerary::model::InclusionRow,
            itinerary::command::FormCommand,
            itinerary::command::ScalarSection,
            itinerary::command::ListSection,
            itinerary::command::DayPeriod,
            validation::report::SectionId,
            validation::report::ValidationError,
            validation::report::ValidationReport,
            validation::status::SectionStatus,
            validation::status::FormStatus,
            document::model::ItineraryDocument,
            document::model::Page,
            document::model::PageSection,
            document::model::TripFact,
            document::model::DayCard,
            document::model::PeriodBlock,
            document::model::FlightRow,
            document::model::HotelRow,
            document::model::ActivityRow,
            document::model::InstallmentRow,
            document::model::Footer,
            document::export::ExportStatus,
            handlers::SessionResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Itinerary", description = "Draft record and mutation commands."),
        (name = "Validation", description = "Field validation and completion status."),
        (name = "Export", description = "Document assembly endpoints.")
    )
)]
struct ApiDoc;

pub async fn run() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenvy::dotenv().ok(); // Load .env file

    let store: Arc<dyn persistence::DraftStore> =
        Arc::new(persistence::FileDraftStore::from_env());
    let (autosave_sender, autosave_receiver) = mpsc::channel(100);
    let app_state = web::Data::new(AppState::new(&store, autosave_sender));

    tokio::spawn(persistence::autosave_worker(autosave_receiver, store));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    log::info!("Starting server at http://{}", bind_addr);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(cors)
            .app_data(app_state)
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/itinerary")
                            .route(web::get().to(handlers::get_itinerary))
                            .route(web::put().to(handlers::import_json)),
                    )
                    .service(
                        web::resource("/itinerary/commands")
                            .route(web::post().to(handlers::apply_command)),
                    )
                    .service(
                        web::resource("/itinerary/reset")
                            .route(web::post().to(handlers::reset_itinerary)),
                    )
                    .service(
                        web::resource("/itinerary/validation")
                            .route(web::get().to(handlers::get_validation)),
                    )
                    .service(
                        web::resource("/itinerary/validation/{section}")
                            .route(web::get().to(handlers::get_section_validation)),
                    )
                    .service(
                        web::resource("/itinerary/status")
                            .route(web::get().to(handlers::get_status)),
                    )
                    .service(
                        web::resource("/itinerary/json")
                            .route(web::get().to(handlers::export_json)),
                    )
                    .service(
                        web::resource("/itinerary/days/{index}/image")
                            .route(web::post().to(handlers::upload_day_image)),
                    )
                    .service(
                        web::resource("/itinerary/export")
                            .route(web::post().to(handlers::export_itinerary)),
                    )
                    .service(
                        web::resource("/itinerary/export/status")
                            .route(web::get().to(handlers::get_export_status)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
