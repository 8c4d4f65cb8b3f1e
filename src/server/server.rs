use anyhow::{Context, Result};
use std::time::Duration;

use tower_http::services::ServeDir;
use tracing::info;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{http_cache, log_requests, state::*, ServerConfig};
use crate::filter::{FilterCriteria, GenreMatch};
use crate::pipeline::{Dashboard, Page};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub titles: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Filter criteria as sent by the dashboard controls, list values are
/// comma separated.
#[derive(Deserialize, Debug, Default)]
struct PageQuery {
    q: Option<String>,
    year_min: Option<i32>,
    year_max: Option<i32>,
    score_min: Option<f64>,
    genres: Option<String>,
    genre_match: Option<GenreMatch>,
    kinds: Option<String>,
    limit: Option<usize>,
}

fn split_list(value: &Option<String>) -> impl Iterator<Item = String> + '_ {
    value
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl PageQuery {
    fn criteria(&self) -> Result<FilterCriteria, String> {
        let criteria = FilterCriteria {
            query: self.q.clone(),
            year_min: self.year_min,
            year_max: self.year_max,
            genres: split_list(&self.genres).collect(),
            genre_match: self.genre_match.unwrap_or_default(),
            kinds: split_list(&self.kinds).collect(),
            score_min: self.score_min,
        };
        criteria.validate()?;
        Ok(criteria)
    }
}

fn render_page(dashboard: &Dashboard, page: Page, query: &PageQuery) -> Response {
    match query.criteria() {
        Ok(criteria) => Json(dashboard.render(page, &criteria)).into_response(),
        Err(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
    }
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        titles: state.dashboard.table().len(),
    };
    Json(stats)
}

async fn get_filters(State(dashboard): State<GuardedDashboard>) -> impl IntoResponse {
    Json(dashboard.filter_options().clone())
}

async fn get_overview(
    State(dashboard): State<GuardedDashboard>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    render_page(&dashboard, Page::Overview, &query)
}

async fn get_hidden_gems(
    State(dashboard): State<GuardedDashboard>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let page = Page::HiddenGems { limit: query.limit };
    render_page(&dashboard, page, &query)
}

async fn get_trends(
    State(dashboard): State<GuardedDashboard>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    render_page(&dashboard, Page::GenreTrends, &query)
}

async fn get_search(
    State(dashboard): State<GuardedDashboard>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let page = Page::Search { limit: query.limit };
    render_page(&dashboard, page, &query)
}

pub fn make_app(config: ServerConfig, dashboard: Dashboard) -> Router {
    let state = ServerState::new(config.clone(), dashboard);

    let page_routes: Router = Router::new()
        .route("/filters", get(get_filters))
        .route("/overview", get(get_overview))
        .route("/hidden-gems", get(get_hidden_gems))
        .route("/trends", get(get_trends))
        .route("/search", get(get_search))
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/v1", page_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(dashboard: Dashboard, config: ServerConfig) -> Result<()> {
    let port = config.port;
    let app = make_app(config, dashboard);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Ready to serve at port {}!", port);
    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_from_reader, ColumnMapping};
    use crate::metrics::derive;
    use crate::server::RequestsLoggingLevel;
    use crate::views::ViewSettings;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt; // for `oneshot`

    const SAMPLE: &str = "\
title,start_date,genres,score,members,type
Cowboy Bebop,1998,\"['Action', 'Sci-Fi']\",8.8,1800000,TV
Lain,1998,\"['Sci-Fi', 'Drama']\",8.0,300000,TV
Nichijou,2011,['Comedy'],8.4,500000,TV
Paprika,2006,['Sci-Fi'],7.9,400000,Movie
Tatami Galaxy,2010,\"['Comedy', 'Drama']\",8.6,350000,TV
";

    fn app() -> Router {
        let dataset = load_from_reader(SAMPLE.as_bytes(), &ColumnMapping::default()).unwrap();
        let dashboard = Dashboard::new(derive(&dataset), ViewSettings::default());
        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Body,
            content_cache_age_sec: 600,
            ..Default::default()
        };
        make_app(config, dashboard)
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 01:01:01");
    }

    #[test]
    fn test_query_criteria() {
        let query = PageQuery {
            genres: Some("Comedy, Drama,,".to_string()),
            kinds: Some("TV".to_string()),
            genre_match: Some(GenreMatch::All),
            ..Default::default()
        };
        let criteria = query.criteria().unwrap();
        assert_eq!(criteria.genres.len(), 2);
        assert!(criteria.genres.contains("Drama"));
        assert!(criteria.kinds.contains("TV"));
        assert_eq!(criteria.genre_match, GenreMatch::All);
        assert!(PageQuery::default().criteria().unwrap().is_empty());

        let inverted = PageQuery {
            year_min: Some(2010),
            year_max: Some(2000),
            ..Default::default()
        };
        assert!(inverted.criteria().is_err());
    }

    #[tokio::test]
    async fn home_reports_stats() {
        let response = send_get(app(), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["titles"], 5);
        assert_eq!(body["hash"], env!("GIT_HASH"));
    }

    #[tokio::test]
    async fn page_routes_are_cacheable() {
        let routes = vec![
            "/v1/filters",
            "/v1/overview",
            "/v1/hidden-gems",
            "/v1/trends",
            "/v1/search",
        ];

        for route in routes.into_iter() {
            println!("Trying route {}", route);
            let response = send_get(app(), route).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get(header::CACHE_CONTROL).unwrap(),
                "max-age=600"
            );
        }
    }

    #[tokio::test]
    async fn overview_applies_query_filters() {
        let response = send_get(app(), "/v1/overview?genres=Comedy").await;
        let body = json_body(response).await;
        assert_eq!(body["page"], "overview");
        assert_eq!(body["data"]["total_count"], 2);

        let response = send_get(app(), "/v1/overview?genres=Comedy,Drama&genre_match=all").await;
        let body = json_body(response).await;
        assert_eq!(body["data"]["total_count"], 1);
    }

    #[tokio::test]
    async fn search_honors_text_and_limit() {
        let response = send_get(app(), "/v1/search?limit=2").await;
        let body = json_body(response).await;
        assert_eq!(body["data"]["total_matches"], 5);
        assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["rows"][0]["title"], "Cowboy Bebop");

        let response = send_get(app(), "/v1/search?q=galaxy&year_min=2000&year_max=2010").await;
        let body = json_body(response).await;
        assert_eq!(body["data"]["total_matches"], 1);
        assert_eq!(body["data"]["rows"][0]["title"], "Tatami Galaxy");
    }

    #[tokio::test]
    async fn filters_describe_the_whole_table() {
        let body = json_body(send_get(app(), "/v1/filters").await).await;
        assert_eq!(body["year_min"], 1998);
        assert_eq!(body["year_max"], 2011);
        assert_eq!(body["kinds"], serde_json::json!(["Movie", "TV"]));
    }

    #[tokio::test]
    async fn malformed_query_is_rejected() {
        let response = send_get(app(), "/v1/search?score_min=high").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());

        let response = send_get(app(), "/v1/trends?genre_match=some").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unusable_bounds_are_rejected() {
        let uris = vec![
            "/v1/overview?score_min=NaN",
            "/v1/search?score_min=inf",
            "/v1/hidden-gems?score_min=11",
            "/v1/trends?year_min=2010&year_max=2000",
        ];

        for uri in uris.into_iter() {
            let response = send_get(app(), uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert!(response.headers().get(header::CACHE_CONTROL).is_none());
        }
    }
}
