use migracle_migrate::utils::{logger, validation::Validate};
use migracle_migrate::{DynamoDestination, MigrateConfig, Migrator, SqliteSource};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let config = match MigrateConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting migracle data migration");
    if config.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let source = match SqliteSource::open(&config.sqlite_path) {
        Ok(source) => {
            tracing::info!("Connected to SQLite database at {}", config.sqlite_path);
            source
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let destination = build_destination(&config).await;
    let migrator = Migrator::new(source, destination);

    match migrator.run().await {
        Ok(report) => {
            tracing::info!(total = report.total(), "Migration completed successfully");
            println!("✅ Migration completed successfully:");
            for table in &report.tables {
                println!("- {} {} migrated", table.migrated, table.table);
            }
        }
        Err(e) => {
            tracing::error!("Migration failed: {}", e);
            eprintln!("❌ Migration failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn build_destination(config: &MigrateConfig) -> DynamoDestination {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.dynamodb_endpoint {
        tracing::info!("Using DynamoDB endpoint override: {}", endpoint);
        loader = loader.endpoint_url(endpoint.clone());
    }

    let sdk_config = loader.load().await;
    let client = aws_sdk_dynamodb::Client::new(&sdk_config);

    DynamoDestination::new(client)
        .with_batch_timeout(config.batch_timeout_secs.map(Duration::from_secs))
}
