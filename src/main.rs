// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use log::info;
use std::sync::Arc;

mod config;
mod errors;
mod handlers;
mod models;
mod pages;
mod routes;
mod services;
mod views;
mod workflow;

use crate::config::{Config, Timings};
use crate::services::{
    AssetClassifier, Geolocator, MockGenerator, MockGeolocator, PageStore, ResultGenerator,
};

#[derive(Clone)]
pub struct AppState {
    pages: Arc<PageStore>,
    generator: Arc<dyn ResultGenerator>,
    geolocator: Arc<dyn Geolocator>,
    classifier: Arc<AssetClassifier>,
    timings: Timings,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting BreedSense service...");

    let config = Config::from_env().context("Failed to read configuration")?;

    let generator = match config.chat_seed {
        Some(seed) => {
            info!("Chat replies seeded with {}", seed);
            MockGenerator::seeded(seed)
        }
        None => MockGenerator::new(),
    };

    let app_state = AppState {
        pages: Arc::new(PageStore::new()),
        generator: Arc::new(generator),
        geolocator: Arc::new(MockGeolocator),
        classifier: Arc::new(AssetClassifier::new()),
        timings: config.timings,
    };

    info!(
        "Idle pages expire after {:?}, checked every {:?}",
        config.page_ttl, config.eviction_interval
    );
    app_state
        .pages
        .clone()
        .spawn_eviction(config.page_ttl, config.eviction_interval);

    info!("Starting HTTP server on {}", config.bind);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind(&config.bind)
    .with_context(|| format!("Failed to bind {}", config.bind))?
    .run()
    .await?;

    Ok(())
}
