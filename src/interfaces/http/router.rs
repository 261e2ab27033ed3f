//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    ChecklistService, PhotoLimits, PhotoService, ServiceOrderService, SharedBlobStore, UserService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::ErrorBody;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{
    auth, checklist, health, photos, service_orders, users,
};

/// Extra room on the photo route for multipart framing around the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Everything the handlers need. Each module extracts its own slice of it
/// through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub users: Arc<UserService>,
    pub service_orders: Arc<ServiceOrderService>,
    pub checklists: Arc<ChecklistService>,
    pub photos: Arc<PhotoService>,
    pub jwt_config: JwtConfig,
    pub started_at: Arc<Instant>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire the services over one repository provider and blob store.
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        blobs: SharedBlobStore,
        jwt_config: JwtConfig,
        photo_limits: PhotoLimits,
        password_cost: u32,
    ) -> Self {
        let checklists = Arc::new(ChecklistService::new(repos.clone()));
        let service_orders = Arc::new(ServiceOrderService::new(
            repos.clone(),
            checklists.clone(),
        ));
        let photos = Arc::new(PhotoService::new(repos.clone(), blobs, photo_limits));
        let users = Arc::new(
            UserService::new(repos.clone(), jwt_config.clone()).with_password_cost(password_cost),
        );

        Self {
            repos,
            users,
            service_orders,
            checklists,
            photos,
            jwt_config,
            started_at: Arc::new(Instant::now()),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            jwt_config: s.jwt_config.clone(),
        }
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for service_orders::ServiceOrderHandlerState {
    fn from_ref(s: &AppState) -> Self {
        service_orders::ServiceOrderHandlerState {
            service_orders: Arc::clone(&s.service_orders),
        }
    }
}

impl FromRef<AppState> for checklist::ChecklistHandlerState {
    fn from_ref(s: &AppState) -> Self {
        checklist::ChecklistHandlerState {
            checklists: Arc::clone(&s.checklists),
        }
    }
}

impl FromRef<AppState> for photos::PhotoHandlerState {
    fn from_ref(s: &AppState) -> Self {
        photos::PhotoHandlerState {
            photos: Arc::clone(&s.photos),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            repos: Arc::clone(&s.repos),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from POST /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::get_current_user,
        // Users
        users::register,
        // Service orders
        service_orders::list_service_orders,
        service_orders::create_service_order,
        service_orders::get_service_order,
        service_orders::update_service_order,
        service_orders::delete_service_order,
        // Checklist
        checklist::list_templates,
        checklist::create_template,
        checklist::get_for_service_order,
        checklist::start,
        checklist::patch_answers,
        checklist::finish,
        // Photos
        photos::list_photos,
        photos::upload_photo,
    ),
    components(
        schemas(
            ErrorBody,
            health::HealthResponse,
            health::StoreHealth,
            health::Status,
            auth::LoginRequest,
            auth::LoginResponse,
            users::RoleDto,
            users::UserDto,
            users::RegisterRequest,
            service_orders::StatusDto,
            service_orders::ServiceOrderDto,
            service_orders::CreatedServiceOrderDto,
            service_orders::ServiceOrderDetailDto,
            service_orders::ServiceOrderListResponse,
            service_orders::CreateServiceOrderRequest,
            service_orders::UpdateServiceOrderRequest,
            checklist::TemplateDto,
            checklist::ChecklistItemDto,
            checklist::TemplateWithItemsDto,
            checklist::NewChecklistItemRequest,
            checklist::CreateTemplateRequest,
            checklist::ChecklistInstanceDto,
            checklist::ChecklistAnswerDto,
            checklist::ChecklistDetailDto,
            checklist::StartChecklistRequest,
            checklist::AnswerInputDto,
            checklist::PatchAnswersRequest,
            photos::PhotoDto,
            photos::PhotoUploadForm,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and store health"),
        (name = "Authentication", description = "Login and current user"),
        (name = "Users", description = "Account registration"),
        (name = "Service Orders", description = "Field work orders"),
        (name = "Checklist", description = "Checklist templates and per-order checklist lifecycle"),
        (name = "Photos", description = "Photo evidence attached to service orders"),
    ),
    info(
        title = "Fieldops Service API",
        version = "0.1.0",
        description = "REST API for field-service work orders, checklists and photo evidence",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let auth_layer =
        middleware::from_fn_with_state(AuthState::from_ref(&state), auth_middleware);

    let photo_body_limit = (state.photos.limits().max_bytes() as usize)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/login", post(auth::login))
        .route("/users", post(users::register));

    // Bearer token required
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route(
            "/service-orders",
            get(service_orders::list_service_orders).post(service_orders::create_service_order),
        )
        .route(
            "/service-orders/{id}",
            get(service_orders::get_service_order)
                .put(service_orders::update_service_order)
                .delete(service_orders::delete_service_order),
        )
        .route(
            "/service-orders/{id}/photos",
            get(photos::list_photos)
                .post(photos::upload_photo)
                .layer(DefaultBodyLimit::max(photo_body_limit)),
        )
        .route(
            "/checklist/templates",
            get(checklist::list_templates).post(checklist::create_template),
        )
        .route(
            "/checklist/service-orders/{id}",
            get(checklist::get_for_service_order),
        )
        .route("/checklist/service-orders/{id}/start", post(checklist::start))
        .route(
            "/checklist/service-orders/{id}/answers",
            patch(checklist::patch_answers),
        )
        .route("/checklist/service-orders/{id}/finish", post(checklist::finish))
        .route_layer(auth_layer);

    let metrics_handle = state.metrics.clone();

    let mut router: Router = public_routes.merge(protected_routes).with_state(state);

    // Prometheus scrape endpoint (public)
    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(swagger_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::testing::Fixture;
    use crate::domain::Actor;
    use crate::infrastructure::crypto::jwt::{self, AccessClaims};
    use crate::infrastructure::storage::InMemoryBlobStore;

    const BOUNDARY: &str = "fieldops-test-boundary";

    struct TestApp {
        fx: Fixture,
        router: Router,
        jwt: JwtConfig,
    }

    impl TestApp {
        async fn new() -> Self {
            Self::with_limits(PhotoLimits::default()).await
        }

        async fn with_limits(limits: PhotoLimits) -> Self {
            let fx = Fixture::new().await;
            let jwt = JwtConfig::new("router-test-secret", 1);
            let blobs = Arc::new(InMemoryBlobStore::new("http://blobs.test", "k"));
            let state = AppState::new(fx.provider(), blobs, jwt.clone(), limits, 4);
            Self {
                router: create_api_router(state),
                fx,
                jwt,
            }
        }

        fn token(&self, actor: &Actor) -> String {
            let claims = AccessClaims::new(&actor.id, "user@example.com", actor.role.as_str(), &self.jwt);
            jwt::sign(&claims, &self.jwt).unwrap()
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            actor: Option<&Actor>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(actor) = actor {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(actor)));
            }
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&json).unwrap()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            self.dispatch(request).await
        }

        async fn upload(
            &self,
            uri: &str,
            actor: &Actor,
            content_type: &str,
            bytes: &[u8],
        ) -> (StatusCode, Value) {
            let mut body = Vec::new();
            body.extend_from_slice(
                format!(
                    "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo\"\r\nContent-Type: {ct}\r\n\r\n",
                    b = BOUNDARY,
                    ct = content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

            let request = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token(actor)))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap();
            self.dispatch(request).await
        }

        async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
            let resp = self.router.clone().oneshot(request).await.unwrap();
            let status = resp.status();
            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, json)
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/service-orders", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/service-orders/{id}"].is_object());
    }

    #[tokio::test]
    async fn register_login_and_me() {
        let app = TestApp::new().await;
        let (status, created) = app
            .send(
                Method::POST,
                "/users",
                None,
                Some(json!({
                    "name": "Maria",
                    "email": "Maria@Example.com",
                    "password": "segredo1",
                    "role": "TECH"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["email"], "maria@example.com");
        assert_eq!(created["role"], "TECH");
        assert!(created.get("passwordHash").is_none());

        let (status, _) = app
            .send(
                Method::POST,
                "/users",
                None,
                Some(json!({"name": "Maria", "email": "maria@example.com", "password": "segredo1"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({"email": "maria@example.com", "password": "errada"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, login) = app
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({"email": "maria@example.com", "password": "segredo1"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let token = login["accessToken"].as_str().unwrap().to_string();

        let request = Request::builder()
            .uri("/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let (status, me) = app.dispatch(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["name"], "Maria");
    }

    #[tokio::test]
    async fn checklist_flow_over_http() {
        let app = TestApp::new().await;
        let owner = app.fx.owner.clone();

        let (status, created) = app
            .send(
                Method::POST,
                "/service-orders",
                Some(&owner),
                Some(json!({
                    "title": "Instalação inicial",
                    "newChecklist": {
                        "name": "Checklist Padrão",
                        "items": [
                            {"label": "Registrar horário de início", "required": true},
                            {"label": "Validar ambiente/equipamentos", "required": true},
                            {"label": "Observações finais"}
                        ]
                    }
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "OPEN");
        assert!(created["checklist"]["startedAt"].is_string());
        let so_id = created["id"].as_str().unwrap().to_string();

        let (_, detail) = app
            .send(Method::GET, &format!("/checklist/service-orders/{}", so_id), Some(&owner), None)
            .await;
        let items = detail["items"].as_array().unwrap().clone();
        assert_eq!(items.len(), 3);
        let item = |i: usize| items[i]["id"].as_str().unwrap().to_string();

        let answers_uri = format!("/checklist/service-orders/{}/answers", so_id);
        let finish_uri = format!("/checklist/service-orders/{}/finish", so_id);

        let (status, _) = app
            .send(
                Method::PATCH,
                &answers_uri,
                Some(&owner),
                Some(json!({"inputs": [{"itemId": item(0), "boolValue": true}]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.send(Method::POST, &finish_uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Required items missing");

        let (status, body) = app
            .send(
                Method::PATCH,
                &answers_uri,
                Some(&owner),
                Some(json!({"inputs": [{"itemId": "not-an-item", "boolValue": true}]})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Item does not belong to template: not-an-item");

        app.send(
            Method::PATCH,
            &answers_uri,
            Some(&owner),
            Some(json!({"inputs": [{"itemId": item(1), "textValue": "OK"}]})),
        )
        .await;

        let (status, finished) = app.send(Method::POST, &finish_uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(finished["finishedAt"].is_string());

        let (_, order) = app
            .send(Method::GET, &format!("/service-orders/{}", so_id), Some(&owner), None)
            .await;
        assert!(order["checklist"]["finishedAt"].is_string());
        assert_eq!(order["checklist"]["answers"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn ownership_rules_over_http() {
        let app = TestApp::new().await;
        let (owner, other, admin) = (app.fx.owner.clone(), app.fx.other.clone(), app.fx.admin.clone());
        let order = app.fx.order_owned_by(&owner).await;
        let uri = format!("/service-orders/{}", order.id);

        let (status, body) = app
            .send(Method::PUT, &uri, Some(&other), Some(json!({"status": "DONE"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Not allowed");

        let (status, body) = app
            .send(Method::PUT, &uri, Some(&owner), Some(json!({"status": "DONE"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "DONE");

        let (status, body) = app
            .send(Method::PUT, &uri, Some(&admin), Some(json!({"status": "OPEN"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Status regression not allowed");

        let (status, _) = app.send(Method::DELETE, &uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send(Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let app = TestApp::new().await;
        let owner = app.fx.owner.clone();
        for title in ["Troca de hardware", "Configuração de rede", "Auditoria"] {
            app.send(
                Method::POST,
                "/service-orders",
                Some(&owner),
                Some(json!({"title": title})),
            )
            .await;
        }

        let (status, page) = app
            .send(Method::GET, "/service-orders?q=REDE", Some(&owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 1);
        assert_eq!(page["data"][0]["title"], "Configuração de rede");

        let (_, page) = app
            .send(Method::GET, "/service-orders?page=2&limit=2", Some(&owner), None)
            .await;
        assert_eq!(page["total"], 3);
        assert_eq!(page["data"].as_array().unwrap().len(), 1);

        let (_, page) = app
            .send(Method::GET, "/service-orders?status=DONE", Some(&owner), None)
            .await;
        assert_eq!(page["total"], 0);

        let (status, _) = app
            .send(Method::GET, "/service-orders?limit=0", Some(&owner), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn photo_upload_and_list() {
        let app = TestApp::with_limits(PhotoLimits {
            max_size_mb: 1,
            max_per_order: 1,
            ..Default::default()
        })
        .await;
        let owner = app.fx.owner.clone();
        let order = app.fx.order_owned_by(&owner).await;
        let uri = format!("/service-orders/{}/photos", order.id);

        let (status, body) = app.upload(&uri, &owner, "image/gif", b"GIF89a").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Only JPEG/PNG allowed");

        let oversized = vec![0u8; 1024 * 1024 + 1];
        let (status, body) = app.upload(&uri, &owner, "image/png", &oversized).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Max file size 1MB");

        let (status, photo) = app.upload(&uri, &owner, "image/png", &[0x89, b'P', b'N', b'G']).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(photo["mimeType"], "image/png");
        assert_eq!(photo["size"], 4);
        assert!(photo["presignedUrl"].as_str().unwrap().contains("signature="));

        let (status, body) = app.upload(&uri, &owner, "image/png", b"again").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Photo limit reached");

        let (status, listed) = app.send(Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let app = TestApp::new().await;
        let owner = app.fx.owner.clone();
        let order = app.fx.order_owned_by(&owner).await;

        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/service-orders/{}/photos", order.id))
            .header(header::AUTHORIZATION, format!("Bearer {}", app.token(&owner)))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, json) = app.dispatch(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "File is required");
    }
}
