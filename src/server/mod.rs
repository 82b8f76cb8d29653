//! Development content server with live reload
//!
//! Serves the content root as static files under the configured base URL,
//! plus a small JSON API over the resolver. While watching, filesystem events
//! under the content root re-scan the index and notify live-reload clients.

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{BlogPost, ContentIndex, FsSource, PostResolver};
use crate::Blog;

/// Server state
struct ServerState {
    resolver: PostResolver<FsSource>,
    reload_tx: broadcast::Sender<()>,
}

/// Query string for post listings
#[derive(Debug, Deserialize)]
struct PostQuery {
    tag: Option<String>,
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let index = Arc::new(blog.index()?);
    tracing::info!("Discovered {} posts in {:?}", index.len(), index.root());

    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let app = router(blog, Arc::clone(&index), reload_tx.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Live reload enabled. Watching {:?}...", index.root());
    }
    println!("Press Ctrl+C to stop.");

    // Start file watcher if watch mode is enabled
    if watch {
        let debounce = Duration::from_millis(blog.config.server.debounce_ms);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_refresh(index, debounce, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router over `index`
pub fn router(blog: &Blog, index: Arc<ContentIndex>, reload_tx: broadcast::Sender<()>) -> Router {
    let state = Arc::new(ServerState {
        resolver: blog.resolver_with(index),
        reload_tx,
    });

    let api = Router::new()
        .route("/api/slugs", get(list_slugs))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/tags", get(list_tags))
        .route("/__livereload", get(livereload_handler))
        .with_state(state);

    let static_files = ServeDir::new(&blog.content_dir);
    let app = match mount_path(&blog.config.base_url) {
        Some(path) => api.nest_service(&path, static_files),
        None => api.fallback_service(static_files),
    };

    app.layer(TraceLayer::new_for_http())
}

/// Where the content root is mounted, or `None` to serve it at the root
///
/// Only a non-root absolute path can be nested; a full URL (a CDN, say)
/// has no local mount point.
fn mount_path(base_url: &str) -> Option<String> {
    let path = base_url.trim_end_matches('/');
    if path.starts_with('/') && path.len() > 1 {
        Some(path.to_string())
    } else {
        None
    }
}

/// Watch the content root, re-scan on changes, and trigger reload
fn watch_and_refresh(
    index: Arc<ContentIndex>,
    debounce: Duration,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid a re-scan per event in a burst
    let mut debouncer = new_debouncer(debounce, tx)?;

    let root = index.root().to_path_buf();
    if !root.is_dir() {
        tracing::warn!("Content root {:?} does not exist yet, waiting for it", root);
        wait_for_root(&root, debounce);
        tracing::info!("Content root {:?} created", root);
        match index.refresh() {
            Ok(_) => {
                let _ = reload_tx.send(());
            }
            Err(e) => tracing::error!("Re-scan failed: {}", e),
        }
    }
    debouncer.watcher().watch(&root, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", root);

    // Handle file change events
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().filter(|e| is_relevant(&e.path)).count();
                if relevant == 0 {
                    continue;
                }

                tracing::debug!("{} content changes", relevant);

                match index.refresh() {
                    Ok(changed) => {
                        if changed {
                            tracing::info!("Post set changed: {} posts", index.len());
                        }
                        // Notify all connected clients to reload
                        let _ = reload_tx.send(());
                    }
                    Err(e) => {
                        // Keep serving the previous slug list
                        tracing::error!("Re-scan failed: {}", e);
                    }
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

/// Block until `root` is a directory, checking every `poll`
fn wait_for_root(root: &std::path::Path, poll: Duration) {
    while !root.is_dir() {
        std::thread::sleep(poll);
    }
}

/// Filter out irrelevant paths (like .git, .DS_Store, editor backups)
fn is_relevant(path: &std::path::Path) -> bool {
    let ignored = path.components().any(|c| {
        let name = c.as_os_str();
        name == ".git" || name == ".DS_Store"
    });
    !ignored && !path.to_string_lossy().ends_with('~')
}

async fn list_slugs(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(state.resolver.index().slugs().to_vec())
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PostQuery>,
) -> Json<Vec<BlogPost>> {
    let posts = match query.tag {
        Some(tag) => state.resolver.list_posts_by_tag(&tag).await,
        None => state.resolver.list_posts().await,
    };
    Json(posts)
}

async fn get_post(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    match state.resolver.get_post(&slug).await {
        Some(post) => Json(post).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not found" })),
        )
            .into_response(),
    }
}

async fn list_tags(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(state.resolver.list_tags().await)
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
            // Wait for reload signal
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
            // Handle incoming messages (ping/pong)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, Arc<ServerState>) {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        for (slug, date, tags) in [
            ("authentication", "2024-12-20", r#"["Security"]"#),
            ("uat-vs-live", "2024-12-18", r#"["Environments", "Security"]"#),
        ] {
            fs::create_dir_all(blog.content_dir.join(slug)).unwrap();
            fs::write(
                blog.content_dir.join(slug).join("index.md"),
                format!("---\npublishDate: {}\ntags: {}\n---\nBody\n", date, tags),
            )
            .unwrap();
        }

        let index = Arc::new(blog.index().unwrap());
        let (reload_tx, _) = broadcast::channel(4);
        let state = Arc::new(ServerState {
            resolver: blog.resolver_with(index),
            reload_tx,
        });
        (dir, state)
    }

    #[test]
    fn test_mount_path() {
        assert_eq!(mount_path("/content/blogs"), Some("/content/blogs".to_string()));
        assert_eq!(mount_path("/content/blogs/"), Some("/content/blogs".to_string()));
        assert_eq!(mount_path("/"), None);
        assert_eq!(mount_path("https://cdn.example.com/blogs"), None);
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(std::path::Path::new("/c/auth/index.md")));
        assert!(!is_relevant(std::path::Path::new("/c/.git/HEAD")));
        assert!(!is_relevant(std::path::Path::new("/c/auth/.DS_Store")));
        assert!(!is_relevant(std::path::Path::new("/c/auth/index.md~")));
    }

    #[test]
    fn test_wait_for_root_returns_once_created() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public/content/blogs");
        let index = ContentIndex::scan(&root).unwrap();
        assert!(index.is_empty());

        let creator = {
            let root = root.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                fs::create_dir_all(root.join("late-post")).unwrap();
                fs::write(root.join("late-post/index.md"), "Body").unwrap();
            })
        };

        wait_for_root(&root, Duration::from_millis(10));
        creator.join().unwrap();
        assert!(root.is_dir());

        assert!(index.refresh().unwrap());
        assert_eq!(*index.slugs(), vec!["late-post"]);
    }

    #[test]
    fn test_is_relevant_matches_whole_components() {
        assert!(is_relevant(std::path::Path::new(
            "/c/intro.github-actions/index.md"
        )));
        assert!(is_relevant(std::path::Path::new("/c/auth/assets/.gitkeep")));
        assert!(!is_relevant(std::path::Path::new("/c/auth/.git/objects/ab")));
    }

    #[tokio::test]
    async fn test_api_handlers() {
        let (_dir, state) = fixture();

        let Json(slugs) = list_slugs(State(Arc::clone(&state))).await;
        assert_eq!(slugs, vec!["authentication", "uat-vs-live"]);

        let Json(posts) = list_posts(
            State(Arc::clone(&state)),
            Query(PostQuery {
                tag: Some("Environments".to_string()),
            }),
        )
        .await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "uat-vs-live");

        let Json(tags) = list_tags(State(Arc::clone(&state))).await;
        assert_eq!(tags, vec!["Environments", "Security"]);

        let found = get_post(State(Arc::clone(&state)), Path("authentication".to_string())).await;
        assert_eq!(found.status(), StatusCode::OK);

        let missing = get_post(State(state), Path("nonexistent-slug".to_string())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_router_builds_for_any_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let (reload_tx, _) = broadcast::channel(4);

        for base_url in ["/content/blogs", "/", "https://cdn.example.com/blogs"] {
            let mut config = crate::config::SiteConfig::default();
            config.base_url = base_url.to_string();
            let blog = Blog::with_config(dir.path(), config);
            let index = Arc::new(blog.index().unwrap());
            let _ = router(&blog, index, reload_tx.clone());
        }
    }
}
