use crate::proxy::config::{ProvisionPolicy, ProxyConfig};
use crate::proxy::upstream::PanelClient;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
///
/// Holds only cross-request immutable pieces: the upstream connection pool
/// and the provisioning policy. Panel credentials never land here; they are
/// resolved per request from the query string.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<PanelClient>,
    pub policy: Arc<ProvisionPolicy>,
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        config: &ProxyConfig,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), String> {
        let state = AppState {
            upstream: Arc::new(PanelClient::new(config.request_timeout)),
            policy: Arc::new(config.provisioning.clone()),
        };
        let app = build_router(state);

        // Bind address
        let addr = format!("{}:{}", config.get_bind_address(), config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind address {}: {}", addr, e))?;

        tracing::info!("Panel proxy server started at http://{}", addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Panel proxy server stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Route table: eight fixed routes, everything else falls through to 404.
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers;

    Router::new()
        .route("/", get(handlers::status::handle_index))
        .route("/servers", get(handlers::servers::handle_list))
        .route("/server/:id", delete(handlers::servers::handle_delete))
        .route("/admins", get(handlers::users::handle_list_admins))
        .route("/create", post(handlers::provision::handle_create))
        .route("/create-admin", post(handlers::users::handle_create_admin))
        .route("/admin/:id", delete(handlers::users::handle_delete))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(crate::proxy::middleware::preflight))
        .layer(crate::proxy::middleware::cors_layer())
        .with_state(state)
}
