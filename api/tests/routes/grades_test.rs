#[cfg(test)]
mod tests {
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;
    use std::fs;

    #[tokio::test]
    #[serial]
    async fn save_grades_writes_table_and_feedback() {
        let app = make_test_app().await;
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
        let q = json["data"]["id"].as_i64().unwrap();

        let batches = format!("/api/assignments/{a}/questions/{q}/batches");
        let (_, json) = app.send("GET", &format!("{batches}?create=true"), None).await;
        let b = json["data"][0]["id"].as_i64().unwrap();
        app.send(
            "PUT",
            &format!("{batches}/{b}"),
            Some(json!({ "grade": 10, "comments": "correct" })),
        )
        .await;

        let (status, json) = app
            .send("POST", &format!("/api/assignments/{a}/grades"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["students"], 3);
        assert_eq!(json["data"]["questions"], 1);

        let table = fs::read_to_string(util::paths::grades_path("hw1")).unwrap();
        assert_eq!(table, "Student ID,Part A,Total\n1,10,10\n2,10,10\n3,0,0\n");

        let feedback =
            fs::read_to_string(util::paths::feedback_dir("hw1").join("1.txt")).unwrap();
        assert!(feedback.contains("Grade: 10/10"));
        assert!(feedback.contains("Comments: correct"));
    }

    #[tokio::test]
    #[serial]
    async fn save_grades_for_missing_assignment() {
        let app = make_test_app().await;
        let (status, json) = app.send("POST", "/api/assignments/7/grades", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }
}
