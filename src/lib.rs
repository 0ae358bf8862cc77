pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod input;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;
pub mod validation;

#[cfg(feature = "server")]
pub mod notifications;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::{build_form_context, configure, run};

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};
    use chrono::Local;

    use crate::db::establish_connection_pool;
    use crate::forms::FormContext;
    use crate::models::config::ServerConfig;
    use crate::notifications::NotificationManager;
    use crate::repository::DieselRepository;
    use crate::routes::forms::{
        from_dto, rules, show_submission, submissions, submit, validate, validate_field,
    };
    use crate::routes::health;
    use crate::routes::input::{clamp, date_display, date_format, date_parse, filter, keypress};
    use crate::routes::master::{
        create_record, delete_record, list_records, record_options, show_record, update_record,
    };
    use crate::routes::notifications::{
        clear_notifications, dismiss_notification, list_notifications,
    };
    use crate::validation::dynamic::CompiledSchema;

    /// Compiles the configured dynamic field descriptors once.
    pub fn build_form_context(server_config: &ServerConfig) -> FormContext {
        FormContext::new(Local::now().date_naive()).with_dynamic_schemas(
            CompiledSchema::compile(&server_config.more_details),
            CompiledSchema::compile(&server_config.additional_references),
        )
    }

    /// Registers every `/api` handler plus the health probe.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(health).service(
            web::scope("/api")
                .service(list_records)
                .service(create_record)
                .service(record_options)
                .service(show_record)
                .service(update_record)
                .service(delete_record)
                .service(rules)
                .service(validate)
                .service(validate_field)
                .service(submit)
                .service(from_dto)
                .service(submissions)
                .service(show_submission)
                .service(filter)
                .service(keypress)
                .service(clamp)
                .service(date_format)
                .service(date_parse)
                .service(date_display)
                .service(list_notifications)
                .service(clear_notifications)
                .service(dismiss_notification),
        );
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = DieselRepository::new(pool);
        let form_context = web::Data::new(build_form_context(&server_config));
        let notifications = web::Data::new(NotificationManager::new());

        log::info!(
            "Loaded {} moreDetails and {} additionalReferences field descriptors",
            server_config.more_details.len(),
            server_config.additional_references.len()
        );

        let bind_address = (server_config.address.clone(), server_config.port);
        let server_config = web::Data::new(server_config);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .configure(configure)
                .app_data(web::Data::new(repo.clone()))
                .app_data(form_context.clone())
                .app_data(notifications.clone())
                .app_data(server_config.clone())
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
