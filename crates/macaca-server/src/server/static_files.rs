use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "view"]
struct ViewAssets;

/// Serve the upload form
pub async fn index() -> Response {
    serve_view("index.html")
}

/// Serve an embedded view file with a guessed content type
pub fn serve_view(path: &str) -> Response {
    match <ViewAssets as Embed>::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None if path == "index.html" => Html(FALLBACK_HTML).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

const FALLBACK_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Macaca</title></head>
<body>
    <form action="/analyze" method="post" enctype="multipart/form-data">
        <input type="file" name="file" accept="image/*">
        <button type="submit">Analyze</button>
    </form>
</body>
</html>
"#;
