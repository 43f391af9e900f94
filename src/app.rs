use std::sync::Arc;

use axum::{
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::TokenService;
use crate::database::store::{HealthCheck, ProjectStore, ResourceStore, TaskStore, UserStore};
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::search::EntitySearcher;
use crate::services::{AuthService, ProjectService, ResourceService, TaskService, UserService};

/// Everything handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub resources: ResourceService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub auth: AuthService,
    pub tokens: TokenService,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, tokens: TokenService, searcher: EntitySearcher) -> Self
    where
        S: UserStore + ResourceStore + ProjectStore + TaskStore + HealthCheck + 'static,
    {
        let users = UserService::new(store.clone(), searcher);
        Self {
            resources: ResourceService::new(store.clone(), store.clone(), store.clone(), searcher),
            projects: ProjectService::new(store.clone(), store.clone(), store.clone(), searcher),
            tasks: TaskService::new(store.clone(), store.clone(), store.clone(), store.clone(), searcher),
            auth: AuthService::new(users.clone(), tokens.clone()),
            users,
            tokens,
            health: store,
        }
    }
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let protected_routes = Router::new()
        .merge(user_routes())
        .merge(resource_routes())
        .merge(project_routes())
        .merge(task_routes())
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth", post(public::auth_post))
        .merge(protected_routes)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/id/:id", get(users::get))
        .route("/users/search", get(users::search))
}

fn resource_routes() -> Router<AppState> {
    use protected::resources;

    Router::new()
        .route("/resources", get(resources::list).post(resources::create))
        .route(
            "/resources/id/:id",
            get(resources::get).patch(resources::update).delete(resources::delete),
        )
        .route("/resources/search", get(resources::search))
}

fn project_routes() -> Router<AppState> {
    use protected::projects;

    Router::new()
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/id/:id",
            get(projects::get).patch(projects::update).delete(projects::delete),
        )
        .route("/projects/search", get(projects::search))
        .route("/projects/assign", patch(projects::assign))
}

fn task_routes() -> Router<AppState> {
    use protected::tasks;

    Router::new()
        .route("/tasks", get(tasks::list).post(tasks::create).delete(tasks::delete))
        .route("/tasks/id/:id", get(tasks::get).patch(tasks::update))
        .route("/tasks/search", get(tasks::search))
        .route("/tasks/assign", patch(tasks::assign))
}

/// Any origin when the list is empty or contains `*`; clients read the
/// issued token from the exposed `Authorization` header.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([AUTHORIZATION]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Project Scheduler API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Users, resources, projects and tasks over REST",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "POST /auth (public - token acquisition)",
                "users": "/users, /users/id/:id, /users/search (protected)",
                "resources": "/resources, /resources/id/:id, /resources/search (protected)",
                "projects": "/projects, /projects/id/:id, /projects/search, /projects/assign (protected)",
                "tasks": "/tasks, /tasks/id/:id, /tasks/search, /tasks/assign (protected)",
            }
        }
    }))
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
