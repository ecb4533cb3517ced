//! Preview server with live reload
//!
//! Renders the journal views on demand: the index route drives `ListState`
//! with `?page=` and `?q=` query parameters, the post route renders markdown
//! by slug. The manifest is re-read per request so edits show up on reload.

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::content::ArticleError;
use crate::generator::PageRenderer;
use crate::helpers;
use crate::manifest::Manifest;
use crate::listing::ListState;
use crate::templates::{REVEAL_JS, SEARCH_JS, STYLE_CSS};
use crate::Site;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    site: Site,
    renderer: PageRenderer,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Query parameters on the index route
#[derive(Debug, Deserialize, Default)]
struct IndexQuery {
    page: Option<usize>,
    q: Option<String>,
}

/// Start the preview server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        site: site.clone(),
        renderer: PageRenderer::new(site)?,
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/posts/:slug/", get(post_handler))
        .route("/css/style.css", get(style_handler))
        .route("/js/search.js", get(search_js_handler))
        .route("/js/reveal.js", get(reveal_js_handler))
        .route("/posts.json", get(manifest_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback_service(ServeDir::new(&site.static_dir))
        .with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: std::net::SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let posts_dir = site.posts_dir.clone();
        let manifest_path = site.manifest_path();
        let config_path = site.base_dir.join("_config.yml");

        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(posts_dir, manifest_path, config_path, reload_tx).await
            {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch for file changes and notify connected clients
async fn watch_and_reload(
    posts_dir: PathBuf,
    manifest_path: PathBuf,
    config_path: PathBuf,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce rapid editor writes
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if posts_dir.exists() {
        debouncer
            .watcher()
            .watch(&posts_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", posts_dir);
    }

    for path in [&manifest_path, &config_path] {
        if path.exists() {
            debouncer.watcher().watch(path, RecursiveMode::NonRecursive)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git") && !path_str.ends_with('~')
                });
                if relevant {
                    tracing::info!("Content changed, reloading clients");
                    let _ = reload_tx.send(());
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Render the paginated, searchable index
async fn index_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<IndexQuery>,
) -> Response {
    let manifest = match Manifest::load(state.site.manifest_path()) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("Failed to load manifest: {}", e);
            return error_response(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not load the post index.",
            );
        }
    };

    let mut list = ListState::new(manifest.posts().to_vec(), state.site.config.per_page);
    if let Some(q) = query.q.as_deref() {
        list.search(q);
    }
    // Search resets the cursor; an explicit page param moves it afterwards
    if let Some(page) = query.page {
        list.set_page(page);
    }

    let query_suffix = if list.query().is_empty() {
        String::new()
    } else {
        format!("&q={}", helpers::encode_url(list.query()))
    };
    let prev_link = if list.has_prev() {
        format!("/?page={}{}", list.page() - 1, query_suffix)
    } else {
        String::new()
    };
    let next_link = if list.has_next() {
        format!("/?page={}{}", list.page() + 1, query_suffix)
    } else {
        String::new()
    };
    let canonical = helpers::full_index_url(&state.site.config, list.page());

    match state
        .renderer
        .render_index(&list, &prev_link, &next_link, &canonical)
    {
        Ok(html) => html_response(&state, StatusCode::OK, html),
        Err(e) => {
            tracing::error!("Failed to render index: {}", e);
            error_response(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not render the index page.",
            )
        }
    }
}

/// Render a single post by slug
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let manifest = Manifest::load(state.site.manifest_path()).unwrap_or_default();

    match state.renderer.render_post(&slug, manifest.find(&slug)) {
        Ok(html) => html_response(&state, StatusCode::OK, html),
        Err(ArticleError::NotFound(_)) => error_response(
            &state,
            StatusCode::NOT_FOUND,
            "Post not found. It may have been moved or removed.",
        ),
        Err(e) => {
            tracing::error!("Failed to render post {}: {}", slug, e);
            error_response(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not render this post.",
            )
        }
    }
}

/// Serve the sorted manifest for client-side search
async fn manifest_handler(State(state): State<Arc<ServerState>>) -> Response {
    match Manifest::load(state.site.manifest_path()) {
        Ok(manifest) => match serde_json::to_string(manifest.posts()) {
            Ok(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize manifest: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Err(e) => {
            tracing::error!("Failed to load manifest: {}", e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn style_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], STYLE_CSS)
}

async fn search_js_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], SEARCH_JS)
}

async fn reveal_js_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], REVEAL_JS)
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

fn html_response(state: &ServerState, status: StatusCode, html: String) -> Response {
    let html = if state.live_reload {
        inject_live_reload(&html)
    } else {
        html
    };
    (status, Html(html)).into_response()
}

fn error_response(state: &ServerState, status: StatusCode, message: &str) -> Response {
    match state.renderer.render_error(message) {
        Ok(html) => html_response(state, status, html),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, message.to_string()).into_response()
        }
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_live_reload() {
        let html = "<html><body>hi</body></html>";
        let injected = inject_live_reload(html);
        assert!(injected.contains("__livereload"));
        assert!(injected.ends_with("</html>"));
    }

    #[test]
    fn test_inject_without_body_tag() {
        let injected = inject_live_reload("no body tag");
        assert!(injected.starts_with("no body tag"));
        assert!(injected.contains("__livereload"));
    }
}
