use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use ntex::http::StatusCode;
use ntex::web;
use ntex::web::{HttpRequest, HttpResponse};
use ntex_files::NamedFile;
use spdlog::{debug, info};

use crate::config::Config;

struct ServerState {
    root: PathBuf,
}

#[derive(Debug, PartialEq)]
enum Resolved {
    File(PathBuf),
    /// A directory requested without its trailing slash
    Redirect(String),
    NotFound,
}

#[derive(Debug)]
enum ServeError {
    NotFound(Option<Vec<u8>>),
    Redirect(String),
    Forbidden,
}

impl Display for ServeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::NotFound(_) => write!(f, "Not found"),
            ServeError::Redirect(location) => write!(f, "Moved to {}", location),
            ServeError::Forbidden => write!(f, "Access forbidden"),
        }
    }
}

impl web::error::WebResponseError for ServeError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServeError::NotFound(_) => StatusCode::NOT_FOUND,
            ServeError::Redirect(_) => StatusCode::TEMPORARY_REDIRECT,
            ServeError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self, _: &HttpRequest) -> HttpResponse {
        match self {
            ServeError::NotFound(Some(page)) => HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(page.clone()),
            ServeError::NotFound(None) => HttpResponse::NotFound().body("Not found"),
            ServeError::Redirect(location) => HttpResponse::TemporaryRedirect()
                .header("Location", location.as_str())
                .finish(),
            ServeError::Forbidden => HttpResponse::Forbidden().body("Access forbidden"),
        }
    }
}

/// Maps a request path to a file below `root`. `None` when the path tries to
/// leave the root.
fn resolve(root: &Path, url_path: &str) -> Option<Resolved> {
    let relative = Path::new(url_path.trim_start_matches('/'));
    if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
        return None;
    }

    let target = root.join(relative);
    let resolved = if target.is_file() {
        Resolved::File(target)
    } else if target.is_dir() {
        if url_path.ends_with('/') {
            let index = target.join("index.html");
            if index.is_file() { Resolved::File(index) } else { Resolved::NotFound }
        } else {
            Resolved::Redirect(format!("{}/", url_path))
        }
    } else {
        Resolved::NotFound
    };
    Some(resolved)
}

async fn serve(req: HttpRequest, state: web::types::State<Arc<ServerState>>) -> Result<NamedFile, ServeError> {
    let path = req.path();
    debug!("GET {}", path);

    match resolve(&state.root, path) {
        None => Err(ServeError::Forbidden),
        Some(Resolved::File(file)) => NamedFile::open(file).map_err(|_| ServeError::NotFound(None)),
        Some(Resolved::Redirect(location)) => Err(ServeError::Redirect(location)),
        Some(Resolved::NotFound) => {
            let page = std::fs::read(state.root.join("404.html")).ok();
            Err(ServeError::NotFound(page))
        }
    }
}

/// Serves the generated site from `output_dir`
pub async fn server_run(config: Config) -> io::Result<()> {
    let root = config.paths.output_dir.clone();
    if !root.is_dir() {
        return Err(io::Error::new(io::ErrorKind::NotFound,
                                  format!("Output directory {} does not exist, build the site first", root.display())));
    }

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    info!("Serving {} on http://{}:{}/", root.display(), bind_addr, bind_port);

    let state = Arc::new(ServerState { root });
    web::HttpServer::new(move || {
        web::App::new()
            .state(state.clone())
            .default_service(web::route().to(serve))
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
