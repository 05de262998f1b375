use labfolio_core::{Program, RemoteAuth, RemoteStorageConfig, Study};
use labfolio_storage::{RemoteStorage, StorageError, StudyStorage};
use mockito::Matcher;

const PROGRAM: &str = "/Shared/Labfolio/Clinical Program A";
const STUDY: &str = "/Shared/Labfolio/Clinical Program A/Study X (CPA-12345)";

fn fs(path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();
    format!("/fs/{}", encoded.join("/"))
}

fn config(server: &mockito::ServerGuard) -> RemoteStorageConfig {
    RemoteStorageConfig {
        api_url: server.url(),
        root_path: "/Shared/Labfolio".to_string(),
        web_url: String::new(),
        auth: RemoteAuth::Password {
            auth_url: format!("{}/puboauth/token", server.url()),
            client_id: "labfolio".to_string(),
            username: "svc-labfolio".to_string(),
            password: "hunter2".to_string(),
        },
        queries_per_second: 1000.0,
        timeout_secs: 5,
        max_retries: 0,
    }
}

#[tokio::test]
async fn test_remote_study_workflow_authenticates_once() {
    let mut server = mockito::Server::new_async().await;
    let token = server
        .mock("POST", "/puboauth/token")
        .match_body(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .with_status(200)
        .with_body(r#"{"access_token": "issued-token", "expires_in": 2592000}"#)
        .expect(1)
        .create_async()
        .await;

    server
        .mock("GET", fs(PROGRAM).as_str())
        .match_header("authorization", "Bearer issued-token")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "name": "Clinical Program A",
                "path": PROGRAM,
                "is_folder": true,
                "folders": [],
                "files": []
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", fs(STUDY).as_str())
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    let add_study = server
        .mock("POST", fs(STUDY).as_str())
        .match_header("authorization", "Bearer issued-token")
        .match_body(Matcher::Json(serde_json::json!({"action": "add_folder"})))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", fs(STUDY).as_str())
        .with_status(200)
        .with_body(
            serde_json::json!({
                "name": "Study X (CPA-12345)",
                "path": STUDY,
                "is_folder": true
            })
            .to_string(),
        )
        .create_async()
        .await;

    let storage = RemoteStorage::new(&config(&server)).unwrap();
    let study = Study::new("Study X", "CPA-12345", Program::new("Clinical Program A", "CPA"));

    let created = storage.create_study_folder(&study).await.unwrap();
    assert_eq!(created.path, STUDY);

    let fetched = storage.get_study_folder(&study, false).await.unwrap();
    assert_eq!(fetched.path, created.path);
    assert_eq!(fetched.url, created.url);

    let again = storage.create_study_folder(&study).await;
    assert!(matches!(again, Err(StorageError::Duplicate(_))));

    token.assert_async().await;
    add_study.assert_async().await;
}
