#[cfg(test)]
mod tests {
    use crate::helpers::{TestApp, make_test_app};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;

    async fn create_assignment(app: &TestApp) -> i64 {
        let (_, json) = app
            .send("POST", "/api/assignments", Some(json!({ "name": "hw1" })))
            .await;
        json["data"]["assignment"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn create_and_fetch_question() {
        let app = make_test_app().await;
        let a = create_assignment(&app).await;

        let (status, json) = app
            .send(
                "POST",
                &format!("/api/assignments/{a}/questions"),
                Some(json!({ "name": "Part A", "var_name": "x", "max_grade": 10 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["var_name"], "x");
        assert_eq!(json["data"]["tolerance"], 0.001);
        assert!(json["data"]["preprocessing"].is_null());
        assert_eq!(json["data"]["total_batches"], 0);
        assert_eq!(json["data"]["total_responses"], 0);
        let q = json["data"]["id"].as_i64().unwrap();

        let (status, json) = app
            .send("GET", &format!("/api/assignments/{a}/questions/{q}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Part A");

        let (_, json) = app
            .send("GET", &format!("/api/assignments/{a}/questions"), None)
            .await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (_, json) = app.send("GET", &format!("/api/assignments/{a}"), None).await;
        assert_eq!(json["data"]["total_points"], 10);
        assert_eq!(json["data"]["total_questions"], 1);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_bodies_are_rejected() {
        let app = make_test_app().await;
        let a = create_assignment(&app).await;
        let uri = format!("/api/assignments/{a}/questions");

        let (status, json) = app
            .send(
                "POST",
                &uri,
                Some(json!({ "name": "Q", "var_name": "x", "max_grade": -1 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "max_grade must not be negative");

        let (status, _) = app
            .send(
                "POST",
                &uri,
                Some(json!({ "name": "Q", "var_name": "x", "max_grade": 1, "tolerance": -0.5 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn script_without_entry_point_is_rejected() {
        let app = make_test_app().await;
        let a = create_assignment(&app).await;

        let (status, json) = app
            .send(
                "POST",
                &format!("/api/assignments/{a}/questions"),
                Some(json!({
                    "name": "Q",
                    "var_name": "x",
                    "max_grade": 1,
                    "preprocessing": "fn other(a) { a }"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn missing_assignment_and_delete() {
        let app = make_test_app().await;

        let (status, _) = app
            .send(
                "POST",
                "/api/assignments/42/questions",
                Some(json!({ "name": "Q", "var_name": "x", "max_grade": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send("GET", "/api/assignments/42/questions/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send("DELETE", "/api/assignments/42/questions/1", None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
