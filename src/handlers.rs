// src/handlers.rs
use crate::pages::{Action, FormUpdate};
use crate::routes::{self, PageKind};
use crate::workflow::WorkflowController;
use crate::{AppState, errors::BreedSenseError, views};
use actix_multipart::Multipart;
use actix_web::{Error, HttpRequest, HttpResponse, web};
use futures_util::TryStreamExt;
use log::{debug, info};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct SubmitBody {
    pub text: Option<String>,
}

/// One of the five literal navigation paths.
pub async fn show_page(req: HttpRequest) -> HttpResponse {
    match PageKind::resolve(req.path()) {
        Some(page) => HttpResponse::Ok().json(routes::describe(page)),
        None => not_found(req).await,
    }
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!("No route for {}", req.path());
    HttpResponse::NotFound().json(routes::not_found(req.path()))
}

pub async fn mount_page(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let slug = path.into_inner();
    let kind = PageKind::from_slug(&slug)
        .and_then(|page| page.analysis_kind())
        .ok_or_else(|| BreedSenseError::InvalidInput(format!("No workflow page named {}", slug)))?;

    let controller = data.pages.insert(WorkflowController::mount(
        kind,
        data.generator.clone(),
        data.geolocator.clone(),
        data.timings,
    ));

    let page = controller.page().lock().await;
    Ok(HttpResponse::Created().json(views::snapshot(&page)))
}

pub async fn get_page(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let controller = data.pages.get(&path.into_inner())?;
    let page = controller.page().lock().await;
    Ok(HttpResponse::Ok().json(views::snapshot(&page)))
}

pub async fn unmount_page(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    data.pages.remove(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn upload_assets(
    path: web::Path<Uuid>,
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let controller = data.pages.get(&path.into_inner())?;
    let mut uploaded = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        let content_disposition = field.content_disposition();
        let filename = content_disposition
            .get_filename()
            .ok_or_else(|| BreedSenseError::Upload("No filename provided".to_string()))?
            .to_string();

        let content_type = field.content_type().map(|ct| ct.to_string());

        // Only the size is kept.
        let mut size_bytes = 0u64;
        while let Some(chunk) = field.try_next().await? {
            size_bytes += chunk.len() as u64;
        }

        let asset = data
            .classifier
            .describe(filename, content_type.as_deref(), size_bytes)?;
        uploaded.push(asset);
    }

    let count = uploaded.len();
    let mut page = controller.page().lock().await;
    page.add_assets(uploaded)?;
    info!("Page {} received {} file(s)", page.id, count);

    Ok(HttpResponse::Ok().json(views::snapshot(&page)))
}

pub async fn update_form(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<FormUpdate>,
) -> Result<HttpResponse, Error> {
    let controller = data.pages.get(&path.into_inner())?;
    let mut page = controller.page().lock().await;
    page.update_form(body.into_inner())?;
    Ok(HttpResponse::Ok().json(views::snapshot(&page)))
}

pub async fn submit(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: Option<web::Json<SubmitBody>>,
) -> Result<HttpResponse, Error> {
    let controller = data.pages.get(&path.into_inner())?;
    let text = body.and_then(|b| b.into_inner().text);
    let ticket = controller.submit(Action::Submit { text }).await?;
    accepted(&controller, ticket).await
}

pub async fn locate(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let controller = data.pages.get(&path.into_inner())?;
    let ticket = controller.submit(Action::Locate).await?;
    accepted(&controller, ticket).await
}

async fn accepted(controller: &WorkflowController, ticket: u64) -> Result<HttpResponse, Error> {
    let page = controller.page().lock().await;
    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "ticket": ticket,
        "page": views::snapshot(&page)
    })))
}

pub async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "breedsense",
        "version": env!("CARGO_PKG_VERSION"),
        "mounted_pages": data.pages.len()
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // POST takes a page slug, GET and DELETE a page id.
            .service(
                web::resource("/pages/{page}")
                    .route(web::post().to(mount_page))
                    .route(web::get().to(get_page))
                    .route(web::delete().to(unmount_page)),
            )
            .route("/pages/{page_id}/assets", web::post().to(upload_assets))
            .route("/pages/{page_id}/form", web::put().to(update_form))
            .route("/pages/{page_id}/submit", web::post().to(submit))
            .route("/pages/{page_id}/locate", web::post().to(locate)),
    )
    .route("/health", web::get().to(health_check));

    for page in PageKind::ALL {
        cfg.route(page.path(), web::get().to(show_page));
    }
}
