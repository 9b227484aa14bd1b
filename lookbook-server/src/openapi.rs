//! OpenAPI documentation configuration
//!
//! Generates OpenAPI 3.0 specification for the Lookbook API.

use utoipa::OpenApi;

use crate::handlers::{
    ArticlePhotosResponse, ArticlesResponse, EntryView, EventResponse, HealthResponse, MatchView,
    ReadyResponse, TextRequest,
};

/// Lookbook API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lookbook API",
        version = "0.1.0",
        description = r#"
## Visual lookup for product photo catalogs

Lookbook answers "which catalog article does this photo show?".

### How It Works

1. An **operator** sends a photo via `POST /images`, then its article label via `POST /texts`
2. The pair is stored in the catalog with a 256-bit average-hash fingerprint
3. Anyone else sending a photo to `POST /images` receives the closest articles,
   ranked by the fraction of agreeing fingerprint bits (above 70% by default)
4. `GET /articles` lists the known labels; `GET /articles/{label}` lists their photos

Operators are configured with `OPERATOR_IDS`.
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Lookup", description = "Photo ingestion and similarity search"),
        (name = "Catalog", description = "Browse registered articles"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::images::images_handler,
        crate::handlers::texts::texts_handler,
        crate::handlers::articles::list_articles_handler,
        crate::handlers::articles::article_photos_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            EventResponse,
            EntryView,
            MatchView,
            TextRequest,
            ArticlesResponse,
            ArticlePhotosResponse,
        )
    )
)]
pub struct ApiDoc;
