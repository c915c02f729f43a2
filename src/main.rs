use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vehicle_reservation::clients::FleetClient;
use vehicle_reservation::config::database::{mask_database_url, DatabaseConfig};
use vehicle_reservation::config::environment::{EnvironmentConfig, StoreBackend};
use vehicle_reservation::repositories::{
    InMemoryReservationRepository, ReservationRepository, ReservationStore,
};
use vehicle_reservation::routes::create_app;
use vehicle_reservation::services::ReservationService;
use vehicle_reservation::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚗 Vehicle Reservation Service");
    info!("================================");

    let config = EnvironmentConfig::from_env()?;
    info!("🌍 Entorno: {}", config.environment);

    let store: Arc<dyn ReservationStore> = match config.store {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            info!("🗄️ Conectando a {}", mask_database_url(&db_config.url));
            let pool = db_config.create_pool().await.map_err(|e| {
                error!("❌ Error conectando a la base de datos: {}", e);
                anyhow::anyhow!("Error de base de datos: {}", e)
            })?;
            Arc::new(ReservationRepository::new(pool))
        }
        StoreBackend::Memory => {
            info!("🧪 Usando store de reservas en memoria");
            Arc::new(InMemoryReservationRepository::new())
        }
    };

    let fleet = FleetClient::new(&config.fleet_service_url, config.fleet_timeout)
        .context("Error creando el cliente de flota")?;

    info!("🚙 Servicio de flota: {} (timeout {:?})", config.fleet_service_url, config.fleet_timeout);
    info!(
        "📋 Políticas: disponibilidad={}, sincronización={}, transiciones={:?}",
        config.reservations.availability, config.reservations.fleet_sync, config.transitions
    );

    let service = ReservationService::new(store, Arc::new(fleet), config.reservations.clone())
        .with_transitions(config.transitions.rule());

    let app = create_app(AppState::new(service), &config.cors_origins);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET   /health - Health check");
    info!("   POST  /api/reservations - Crear reserva");
    info!("   GET   /api/reservations - Listar reservas (?client_id=)");
    info!("   GET   /api/reservations/:id - Obtener reserva");
    info!("   PATCH /api/reservations/:id/status - Cambiar estado");
    info!("   GET   /api/vehicles/available - Vehículos disponibles");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
