use super::floor::Floor;
use crate::config::TableConfig;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;

pub struct Server;

impl Server {
    pub async fn run(config: TableConfig) -> Result<(), std::io::Error> {
        let bind = config.bind_addr.clone();
        let floor = web::Data::new(Floor::new(config));
        if floor.config().auto_start {
            let auto = floor.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                auto.start();
            });
        }
        log::info!(
            "dealer service listening on {} (table {})",
            bind,
            floor.config().table_id
        );
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(floor.clone())
                .route("/health", web::get().to(health))
                .route("/status", web::get().to(status))
                .route("/start", web::post().to(start))
        })
        .workers(4)
        .bind(bind)?
        .run()
        .await
    }
}

async fn health(floor: web::Data<Floor>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "tableId": floor.config().table_id,
        "mode": floor.status().mode,
    }))
}

async fn status(floor: web::Data<Floor>) -> impl Responder {
    let config = floor.config();
    HttpResponse::Ok().json(serde_json::json!({
        "tableId": config.table_id,
        "table": floor.status(),
        "config": {
            "potSizeUsd": config.pot_size_usd,
            "rakeBps": config.rake_bps,
            "playerCount": config.player_count,
        },
    }))
}

async fn start(floor: web::Data<Floor>) -> impl Responder {
    if floor.start() {
        HttpResponse::Ok().json(serde_json::json!({ "message": "game loop started" }))
    } else {
        HttpResponse::Ok().json(serde_json::json!({ "message": "game loop already running" }))
    }
}
