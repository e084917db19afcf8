#[cfg(test)]
mod tests {
    use crate::helpers::{TestApp, make_test_app};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use serial_test::serial;

    /// Students 1 and 2 answered within tolerance of each other, student 3 did not.
    async fn numeric_question(app: &TestApp) -> (i64, i64) {
        app.submit("hw1", 1, "x.csv", "1.0");
        app.submit("hw1", 2, "x.csv", "1.0004");
        app.submit("hw1", 3, "x.csv", "2.0");

        let (_, json) = app
            .send("POST", "/api/assignments", Some(json!({ "name": "hw1" })))
            .await;
        let a = json["data"]["assignment"]["id"].as_i64().unwrap();
        let (_, json) = app
            .send(
                "POST",
                &format!("/api/assignments/{a}/questions"),
                Some(json!({ "name": "Part A", "var_name": "x", "max_grade": 10 })),
            )
            .await;
        (a, json["data"]["id"].as_i64().unwrap())
    }

    fn member_counts(json: &Value) -> Vec<i64> {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["member_count"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    #[serial]
    async fn rebuild_groups_equivalent_responses() {
        let app = make_test_app().await;
        let (a, q) = numeric_question(&app).await;
        let uri = format!("/api/assignments/{a}/questions/{q}/batches");

        let (status, json) = app.send("POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["batches"], 2);
        assert_eq!(json["data"]["responses"], 3);
        assert!(json["data"]["decode_failures"].as_array().unwrap().is_empty());
        assert!(!app.state.rebuild_locks().is_locked(q));

        let (_, json) = app
            .send("GET", &format!("/api/assignments/{a}/questions/{q}"), None)
            .await;
        assert_eq!(json["data"]["total_batches"], 2);
        assert_eq!(json["data"]["total_responses"], 3);

        let (status, json) = app.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(member_counts(&json), vec![2, 1]);
        assert_eq!(json["data"][0]["datatype"], "numeric");
        assert_eq!(json["data"][0]["total_responses"], 3);
    }

    #[tokio::test]
    #[serial]
    async fn list_without_create_does_not_rebuild() {
        let app = make_test_app().await;
        let (a, q) = numeric_question(&app).await;
        let uri = format!("/api/assignments/{a}/questions/{q}/batches");

        let (status, json) = app.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"].as_array().unwrap().is_empty());

        let (status, json) = app.send("GET", &format!("{uri}?create=true"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(member_counts(&json), vec![2, 1]);
    }

    #[tokio::test]
    #[serial]
    async fn grade_batch_and_rebuild_resets_it() {
        let app = make_test_app().await;
        let (a, q) = numeric_question(&app).await;
        let uri = format!("/api/assignments/{a}/questions/{q}/batches");
        app.send("POST", &uri, None).await;

        let (_, json) = app.send("GET", &uri, None).await;
        let b = json["data"][0]["id"].as_i64().unwrap();

        let (status, json) = app
            .send(
                "PUT",
                &format!("{uri}/{b}"),
                Some(json!({ "grade": 8, "comments": "close enough" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["grade"], 8);
        assert_eq!(json["data"]["comments"], "close enough");

        let (status, json) = app.send("GET", &format!("{uri}/{b}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["grade"], 8);

        let (_, json) = app.send("GET", &format!("{uri}?create=true"), None).await;
        assert_eq!(member_counts(&json), vec![2, 1]);
        for batch in json["data"].as_array().unwrap() {
            assert_eq!(batch["grade"], 0);
            assert_eq!(batch["comments"], "");
        }
    }

    #[tokio::test]
    #[serial]
    async fn invalid_grades_and_unknown_batches() {
        let app = make_test_app().await;
        let (a, q) = numeric_question(&app).await;
        let uri = format!("/api/assignments/{a}/questions/{q}/batches");
        app.send("POST", &uri, None).await;
        let (_, json) = app.send("GET", &uri, None).await;
        let b = json["data"][0]["id"].as_i64().unwrap();

        let (status, json) = app
            .send("PUT", &format!("{uri}/{b}"), Some(json!({ "grade": -3 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "grade must not be negative");

        let (status, _) = app
            .send("PUT", &format!("{uri}/9999"), Some(json!({ "grade": 1 })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send("POST", &format!("/api/assignments/{a}/questions/9999/batches"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn preprocessing_merges_text_batches() {
        let app = make_test_app().await;
        app.submit("hw2", 1, "ans.txt", "Yes");
        app.submit("hw2", 2, "ans.txt", "yes");
        app.submit("hw2", 3, "ans.txt", "no");

        let (_, json) = app
            .send("POST", "/api/assignments", Some(json!({ "name": "hw2" })))
            .await;
        let a = json["data"]["assignment"]["id"].as_i64().unwrap();
        let (_, json) = app
            .send(
                "POST",
                &format!("/api/assignments/{a}/questions"),
                Some(json!({
                    "name": "Answer",
                    "var_name": "ans",
                    "max_grade": 1,
                    "preprocessing": "fn fun(student_id, data) { data.to_lower() }"
                })),
            )
            .await;
        let q = json["data"]["id"].as_i64().unwrap();

        let (status, json) = app
            .send(
                "GET",
                &format!("/api/assignments/{a}/questions/{q}/batches?create=true"),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(member_counts(&json), vec![2, 1]);
        assert_eq!(json["data"][0]["data"], "yes");
    }
}
