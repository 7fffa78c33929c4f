use imgroute_api::setup;
use imgroute_core::Settings;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load process settings
    let settings = Settings::from_env()?;

    // Initialize the application (telemetry, config, storages, routes)
    let (_state, router) = setup::initialize_app(&settings).await?;

    // Start the server
    setup::server::start_server(&settings, router).await?;

    Ok(())
}
