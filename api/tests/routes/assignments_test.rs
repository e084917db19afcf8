#[cfg(test)]
mod tests {
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn create_assignment_loads_submissions() {
        let app = make_test_app().await;
        app.submit("hw1", 1, "x.csv", "1.0");
        app.submit("hw1", 2, "x.csv", "2.0");
        app.submit("hw1", 2, "y.txt", "yes");

        let (status, json) = app
            .send("POST", "/api/assignments", Some(json!({ "name": "hw1" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["assignment"]["name"], "hw1");
        assert_eq!(json["data"]["assignment"]["total_submissions"], 2);
        assert_eq!(json["data"]["loaded"]["students"], 2);
        assert_eq!(json["data"]["loaded"]["responses"], 3);

        let id = json["data"]["assignment"]["id"].as_i64().unwrap();
        let (status, json) = app.send("GET", &format!("/api/assignments/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "hw1");

        let (status, json) = app.send("GET", "/api/assignments", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn create_assignment_without_submissions_directory() {
        let app = make_test_app().await;

        let (status, json) = app
            .send("POST", "/api/assignments", Some(json!({ "name": "empty" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["loaded"]["responses"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn duplicate_name_conflicts() {
        let app = make_test_app().await;

        let body = json!({ "name": "hw1" });
        let (status, _) = app.send("POST", "/api/assignments", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = app.send("POST", "/api/assignments", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_names_are_rejected() {
        let app = make_test_app().await;

        for name in ["", "../escape"] {
            let (status, json) = app
                .send("POST", "/api/assignments", Some(json!({ "name": name })))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "name {name:?}");
            assert_eq!(json["success"], false);
        }
    }

    #[tokio::test]
    #[serial]
    async fn unknown_extension_creates_nothing() {
        let app = make_test_app().await;
        app.submit("hw1", 1, "x.docx", "?");

        let (status, json) = app
            .send("POST", "/api/assignments", Some(json!({ "name": "hw1" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);

        let (_, json) = app.send("GET", "/api/assignments", None).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn get_missing_assignment_is_not_found() {
        let app = make_test_app().await;
        let (status, json) = app.send("GET", "/api/assignments/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn delete_is_idempotent() {
        let app = make_test_app().await;
        let (_, json) = app
            .send("POST", "/api/assignments", Some(json!({ "name": "hw1" })))
            .await;
        let id = json["data"]["assignment"]["id"].as_i64().unwrap();

        let uri = format!("/api/assignments/{id}");
        let (status, _) = app.send("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
