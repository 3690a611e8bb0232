//! The API's own documentation: `/docs` renders the OpenAPI document
//! published at `/docs/api.json` with RapiDoc.

use std::sync::Arc;

use aide::{
    axum::{ApiRouter, IntoApiResponse, routing::get},
    openapi::{OpenApi, Tag},
    transform::TransformOpenApi,
};
use axum::{
    Extension, Json,
    response::{Html, IntoResponse},
};

/// A RapiDoc page pointed at `api.json`.
async fn serve_rapidoc() -> impl IntoApiResponse {
    let html = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <script src="https://cdnjs.cloudflare.com/ajax/libs/rapidoc/9.3.8/rapidoc-min.js" integrity="sha512-0ES6eX4K9J1PrIEjIizv79dTlN5HwI2GW9Ku6ymb8dijMHF5CIplkS8N0iFJ/wl3GybCSqBJu8HDhiFkZRAf0g==" crossorigin="anonymous" referrerpolicy="no-referrer"></script>
  </head>
  <body>
    <rapi-doc spec-url="/docs/api.json"
        show-method-in-nav-bar="as-colored-text"
        use-path-in-nav-bar="true"
    ></rapi-doc>
  </body>
</html>"#;
    Html(html).into_response()
}

/// Mounted under `/docs`; kept out of the document itself.
pub(crate) fn docs_routes() -> ApiRouter {
    ApiRouter::new()
        .route("/", get(serve_rapidoc))
        .route("/api.json", get(serve_docs))
}

/// The shared document built by `finish_api_with`.
async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
    Json(api).into_response()
}

/// Route tags and what they group, in the order the docs list them
const TAGS: [(&str, &str); 4] = [
    ("price", "Price previews for carts and product pages"),
    ("order", "Checkout and the order lifecycle"),
    ("after-sale", "Refund and return requests"),
    (
        "admin",
        "Operations performed by the merchant or the payment system",
    ),
];

/// Document metadata: title, crate version and the tag descriptions.
pub(crate) fn api_docs(api: TransformOpenApi) -> TransformOpenApi {
    let api = api
        .title("Shop Trade API")
        .summary("Checkout pricing, order settlement and after-sale handling.")
        .description(
            "Prices carts against the active promotions, commits orders as a single \
             unit of work and drives orders and after-sale requests through their \
             lifecycles. All amounts are integer cents.",
        )
        .version(env!("CARGO_PKG_VERSION"));

    TAGS.into_iter().fold(api, |api, (name, description)| {
        api.tag(Tag {
            name: name.into(),
            description: Some(description.into()),
            ..Default::default()
        })
    })
}
