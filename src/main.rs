use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use microprestamos::config::AppConfig;
use microprestamos::error::AppError;
use microprestamos::loans::domain::Frequency;
use microprestamos::loans::loan_router;
use microprestamos::loans::quota::{self, ANNUAL_RATE_PERCENT};
use microprestamos::notify::{LogNotifier, Notifier, SmtpNotifier};
use microprestamos::telemetry;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Microprestamos",
    about = "Calcula la cuota de microprestamos y expone el servicio HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute a loan installment offline
    Quota(QuotaArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct QuotaArgs {
    /// Loan principal
    #[arg(long)]
    amount: i64,
    /// Term in months
    #[arg(long, default_value_t = 3)]
    pay_time: i64,
    /// Payment frequency (mensual | quincenal)
    #[arg(long, default_value = "mensual", value_parser = parse_frequency)]
    frecuency: Frequency,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Quota(args) => run_quota(args),
    }
}

fn parse_frequency(raw: &str) -> Result<Frequency, String> {
    Frequency::parse(raw.trim())
        .ok_or_else(|| format!("'{raw}' no es una frecuencia válida (mensual | quincenal)"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpNotifier::from_config(smtp)?),
        None => Arc::new(LogNotifier),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = OpsState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = loan_router(notifier)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(prometheus_layer)
        .layer(Extension(state));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, smtp = config.smtp.is_some(), "microprestamos service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_quota(args: QuotaArgs) -> Result<(), AppError> {
    let QuotaArgs {
        amount,
        pay_time,
        frecuency,
    } = args;

    let quota = quota::compute(amount as f64, ANNUAL_RATE_PERCENT, pay_time, frecuency)?;
    println!("La cuota sería ${quota:.2} {frecuency} durante {pay_time} meses.");
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<OpsState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
