use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin_reload, get_consensus_genres, get_coverage, get_developers, get_distribution,
    get_extremes, get_filters, get_genres, get_scatter, get_stats, get_temporal, AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/distribution", get(get_distribution))
        .route("/api/genres", get(get_genres))
        .route("/api/genres/consensus", get(get_consensus_genres))
        .route("/api/developers", get(get_developers))
        .route("/api/temporal", get(get_temporal))
        .route("/api/extremes", get(get_extremes))
        .route("/api/scatter", get(get_scatter))
        .route("/api/filters", get(get_filters))
        .route("/api/coverage", get(get_coverage))
        .route("/api/admin/reload", post(admin_reload))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::path::Path;
    use tower::ServiceExt;

    use crate::analytics::{AnalyticsService, DiscrepancySnapshot};
    use crate::config::settings::AppConfig;
    use crate::dataset::load_from_reader;

    const DATA: &str = "\
id,name,genre_name,developer_name,year,metacritic,rating,added
1,Anthem,Shooter,BioWare,2019,90,3.0,1200
2,Celeste,Platformer,Maddy Makes Games,2018,70,4.4,5000
3,Broken,Shooter,Nobody,2020,,4.0,10
";

    fn router(admin_token: Option<&str>) -> Router {
        let mut config = AppConfig::default();
        config.server.admin_token = admin_token.map(str::to_string);
        router_with(config)
    }

    fn router_with(config: AppConfig) -> Router {
        let dataset = load_from_reader(DATA.as_bytes(), Path::new("memory.csv")).unwrap();
        let snapshot = DiscrepancySnapshot::build(dataset, &config);
        let service = AnalyticsService::new(snapshot, config);
        create_router(Arc::new(AppState { service }))
    }

    async fn send(app: Router, method: &str, uri: &str, auth: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }
        let response = app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(uri: &str) -> Value {
        let (status, body) = send(router(None), "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_stats_and_coverage() {
        let stats = get_json("/api/stats").await;
        assert_eq!(stats["count"], 2);
        assert_eq!(stats["extremeCount"], 2);

        let coverage = get_json("/api/coverage").await;
        assert_eq!(coverage["totalRows"], 3);
        assert_eq!(coverage["missingScore"], 1);
    }

    #[tokio::test]
    async fn test_distribution_lists_every_type() {
        let distribution = get_json("/api/distribution").await;
        assert_eq!(distribution["overhyped"], 1);
        assert_eq!(distribution["hidden_gem"], 1);
        assert_eq!(distribution["consensus"], 0);
        assert_eq!(distribution["polarizing"], 0);
    }

    #[tokio::test]
    async fn test_genre_ranking() {
        let genres = get_json("/api/genres?n=5").await;
        let names: Vec<&str> = genres
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["genre_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Platformer", "Shooter"]);

        let bottom = get_json("/api/genres?n=1&order=asc").await;
        assert_eq!(bottom[0]["genre_name"], "Shooter");
    }

    #[tokio::test]
    async fn test_developer_default_limit() {
        let mut config = AppConfig::default();
        config.aggregation.default_top_genres = 5;
        config.aggregation.default_top_developers = 1;

        let (status, body) = send(router_with(config), "GET", "/api/developers", None).await;
        assert_eq!(status, StatusCode::OK);
        let developers: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(developers.as_array().unwrap().len(), 1);
        assert_eq!(developers[0]["developer_name"], "Maddy Makes Games");
    }

    #[tokio::test]
    async fn test_extremes_by_type() {
        let overhyped = get_json("/api/extremes?type=overhyped&n=10").await;
        assert_eq!(overhyped.as_array().unwrap().len(), 1);
        assert_eq!(overhyped[0]["rank"], 1);
        assert_eq!(overhyped[0]["type"], "overhyped");
    }

    #[tokio::test]
    async fn test_empty_filters_are_explicit() {
        let scatter = get_json("/api/scatter?types=").await;
        assert_eq!(scatter["status"], "empty");

        let temporal = get_json("/api/temporal?from=1950&to=1960").await;
        assert_eq!(temporal["status"], "empty");

        let scatter = get_json("/api/scatter?genres=Shooter&from=2010&to=2025").await;
        assert_eq!(scatter["status"], "matches");
        assert_eq!(scatter["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_parameters_are_rejected() {
        for uri in [
            "/api/genres?order=sideways",
            "/api/extremes?type=bogus",
            "/api/scatter?types=overhyped,bogus",
            "/api/genres/consensus?band=-1",
        ] {
            let (status, _) = send(router(None), "GET", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_reload_requires_token() {
        let (status, _) = send(router(None), "POST", "/api/admin/reload", Some("Bearer x")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(router(Some("secret")), "POST", "/api/admin/reload", Some("Bearer x")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(router(Some("secret")), "POST", "/api/admin/reload", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
