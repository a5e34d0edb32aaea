use tally::{app, initialize_state, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // initialize tracing.
    telemetry::setup();

    let state = initialize_state().await?;
    let port = state.config.port;

    let listener =
        tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "server started");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Drain in-flight requests on ctrl-c before exiting.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        return;
    }

    tracing::info!("shutting down");
}
