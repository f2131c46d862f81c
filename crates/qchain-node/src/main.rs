use axum::{routing::get, Json, Router};
use clap::Parser;
use qchain_core::{Chain, Simulator};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};

#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Proof-of-work difficulty of the in-memory chain
    #[arg(long, default_value_t = 2)]
    difficulty: usize,

    /// Demo blocks appended at startup
    #[arg(long, default_value_t = 3)]
    blocks: usize,
}

#[derive(Clone)]
struct AppState {
    chain: Arc<Chain<Simulator>>,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
struct Message {
    message: &'static str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // The chain is built once at startup; every endpoint is read-only.
    let mut chain = Chain::new(args.difficulty)?;
    for i in 0..args.blocks {
        chain.append(format!("Demo transfer {i}"))?;
    }
    info!(
        height = chain.blocks.len(),
        difficulty = chain.difficulty,
        "chain ready"
    );

    let state = AppState {
        chain: Arc::new(chain),
    };

    let app = Router::new()
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route("/healthz", get(|| async { Json(Health { status: "ok" }) }))
        .route(
            "/nft",
            get(|| async {
                Json(Message {
                    message: "Quantum NFT tagging information",
                })
            }),
        )
        .route(
            "/blockchain",
            get(|| async {
                Json(Message {
                    message: "Quantum-linked blockchain information",
                })
            }),
        )
        .route(
            "/quantum-ai",
            get(|| async {
                Json(Message {
                    message: "Quantum AI integration planned",
                })
            }),
        )
        .route(
            "/chain/info",
            get({
                let state = state.clone();
                move || async move {
                    match state.chain.info() {
                        Ok(info) => Json(serde_json::json!(info)),
                        Err(err) => Json(serde_json::json!({ "error": err.to_string() })),
                    }
                }
            }),
        )
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = args.listen.parse()?;
    info!("qchain-node listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
