use crate::{
    error::GeneLabError,
    lab::LabClient,
    models::{ChatRequest, HealthResponse, ImageGenerationRequest},
};
use actix_web::{web, HttpResponse};

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::ok())
}

pub async fn generate_image(
    lab: web::Data<LabClient>,
    body: web::Json<ImageGenerationRequest>,
) -> Result<HttpResponse, GeneLabError> {
    let response = lab.image().generate(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn chat(
    lab: web::Data<LabClient>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, GeneLabError> {
    let response = lab.chat().chat(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn not_found() -> Result<HttpResponse, GeneLabError> {
    Err(GeneLabError::invalid_input("Route not found").with_status(404))
}
