//! HTTP server for browser-based access to DomainScout
//!
//! Serves the single-page search form and the JSON API consumed by it.

pub mod routes;
pub mod state;

pub use state::ServerAppState;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Version information for the server
#[derive(serde::Serialize)]
struct VersionInfo {
    version: String,
}

/// Run the HTTP server until ctrl-c.
pub async fn run_server(
    port: u16,
    bind: &str,
    state: ServerAppState,
    cors_origins: Option<Vec<String>>,
) -> Result<(), String> {
    // CORS must be the outermost layer so preflight OPTIONS requests are
    // answered before any handler runs
    let cors = match &cors_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods(Any)
                .allow_headers([CONTENT_TYPE, ACCEPT])
        }
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([CONTENT_TYPE, ACCEPT]),
    };

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/version", get(version_handler))
        .route("/api/suggestions", post(routes::generate_suggestions))
        .route("/api/analysis", post(routes::run_analysis))
        .route("/api/analysis/jobs", post(routes::start_analysis_job))
        .route(
            "/api/analysis/jobs/:view_id",
            get(routes::get_analysis_job).delete(routes::cancel_analysis_job),
        )
        .route("/api/registrar-link", get(routes::registrar_link))
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Server listening on http://{}", addr);
    println!("DomainScout listening on http://{}:{}", bind, port);
    println!("  GET  /                       - Search form");
    println!("  POST /api/suggestions        - Generate suggestions");
    println!("  POST /api/analysis           - Synchronous analysis");
    println!("  POST /api/analysis/jobs      - Start research job");
    println!("  GET  /api/analysis/jobs/:id  - Poll research job");
    println!("  GET  /health                 - Health check");

    let shutdown_signal = async {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Version endpoint
async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Index handler - serves the single-page search form
async fn index_handler() -> axum::response::Html<&'static str> {
    axum::response::Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>DomainScout</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 720px;
            margin: 40px auto;
            padding: 20px;
            background: #1a1a2e;
            color: #eee;
        }
        h1 { color: #4ade80; }
        label { display: block; margin-top: 12px; }
        input, select {
            width: 100%;
            padding: 8px;
            border-radius: 6px;
            border: 1px solid #444;
            background: #2a2a4e;
            color: #eee;
        }
        button {
            margin-top: 16px;
            padding: 10px 18px;
            border-radius: 6px;
            border: none;
            background: #4ade80;
            color: #111;
            cursor: pointer;
        }
        .card {
            background: #2a2a4e;
            padding: 14px;
            border-radius: 8px;
            margin: 12px 0;
        }
        .card small { color: #9ca3af; }
        .error { background: #7f1d1d; padding: 10px; border-radius: 6px; margin-top: 12px; }
        #analysis { background: #2a2a4e; padding: 14px; border-radius: 8px; margin-top: 16px; }
    </style>
</head>
<body>
    <h1>DomainScout</h1>
    <p>Describe your project and get AI-generated domain suggestions with market research.</p>
    <form id="search">
        <label>Type
            <select name="userType"><option>Business</option><option>Personal</option></select>
        </label>
        <label>Project name <input name="projectName" required minlength="2"></label>
        <label>Business niche <input name="businessNiche" required minlength="2"></label>
        <label>Target audience <input name="targetAudience" required minlength="2"></label>
        <label>Keywords <input name="keywords" required minlength="2"></label>
        <label>Preferred TLDs <input name="preferredTLDs" required minlength="1" value=".com"></label>
        <button type="submit">Find domains</button>
    </form>
    <div id="results"></div>
    <div id="analysis" hidden></div>
    <script>
    const form = document.getElementById('search');
    const results = document.getElementById('results');
    const analysis = document.getElementById('analysis');
    let details = null;
    let pollTimer = null;

    form.addEventListener('submit', async (e) => {
        e.preventDefault();
        const data = new FormData(form);
        details = {
            userType: data.get('userType'),
            projectName: data.get('projectName'),
            businessNiche: data.get('businessNiche'),
            targetAudience: data.get('targetAudience'),
            keywords: data.get('keywords'),
            preferredTLDs: data.get('preferredTLDs'),
        };
        results.innerHTML = '<p>Generating suggestions...</p>';
        const resp = await fetch('/api/suggestions', {
            method: 'POST',
            headers: {'Content-Type': 'application/json'},
            body: JSON.stringify(details),
        });
        const body = await resp.json();
        if (!resp.ok) {
            results.innerHTML = '<div class="error">' + body.error + '</div>';
            return;
        }
        results.innerHTML = '';
        for (const s of body.suggestions) {
            const card = document.createElement('div');
            card.className = 'card';
            card.innerHTML = '<strong>' + s.domainName + '</strong> ' +
                '<small>(' + Math.round(s.confidenceScore * 100) + '%)</small>' +
                '<p>' + s.explanation + '</p>';
            const analyze = document.createElement('button');
            analyze.textContent = 'View analysis';
            analyze.onclick = () => startAnalysis(s);
            const register = document.createElement('button');
            register.textContent = 'Register';
            register.onclick = async () => {
                const r = await fetch('/api/registrar-link?domain=' +
                    encodeURIComponent(s.domainName));
                const link = await r.json();
                window.open(link.url, '_blank');
            };
            card.append(analyze, register);
            results.append(card);
        }
    });

    async function startAnalysis(suggestion) {
        stopPolling();
        analysis.hidden = false;
        analysis.innerHTML = '<p>Starting research for ' + suggestion.domainName + '...</p>';
        const resp = await fetch('/api/analysis/jobs', {
            method: 'POST',
            headers: {'Content-Type': 'application/json'},
            body: JSON.stringify({viewId: 'page', suggestion, details}),
        });
        const body = await resp.json();
        if (!resp.ok) {
            analysis.innerHTML = '<div class="error">' + body.error + '</div>';
            return;
        }
        pollTimer = setInterval(refreshAnalysis, 2000);
    }

    async function refreshAnalysis() {
        const resp = await fetch('/api/analysis/jobs/page');
        if (!resp.ok) { stopPolling(); return; }
        const body = await resp.json();
        const display = body.display;
        if (display.kind === 'loading') {
            analysis.innerHTML = '<p>' + display.message + '</p>';
        } else if (display.kind === 'progress') {
            analysis.innerHTML = '<p>Research in progress. Current status: <strong>' +
                display.remoteStatus + '</strong></p>';
        } else if (display.kind === 'report') {
            analysis.innerHTML = display.html;
            stopPolling();
        } else {
            analysis.innerHTML = '<div class="error">' + display.message + '</div>';
            stopPolling();
        }
    }

    function stopPolling() {
        if (pollTimer) { clearInterval(pollTimer); pollTimer = null; }
    }
    </script>
</body>
</html>"#;
