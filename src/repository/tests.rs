use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{
    AuthRepository, HttpAuthRepository, HttpTaskRepository, HttpUserRepository, TaskRepository,
    UserRepository,
};
use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::model::{
    CreateTaskParams, FileUpload, TaskPriority, TaskQuery, TaskStatus, UpdateTaskParams,
};
use crate::session::store::SessionData;
use crate::session::testing::CountingNavigator;
use crate::session::{MemorySessionStore, Session, SessionStore};

struct Harness {
    server: MockServer,
    client: Arc<ApiClient>,
    store: Arc<MemorySessionStore>,
}

impl Harness {
    async fn start(token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemorySessionStore::with_data(SessionData {
            token: token.map(String::from),
            logged_in: token.is_some(),
            ..SessionData::default()
        }));
        let session = Arc::new(Session::new(
            store.clone(),
            Arc::new(CountingNavigator::default()),
        ));
        let config = ApiConfig::with_base_url(format!("{}/api/", server.uri()));
        let client = Arc::new(ApiClient::new(&config, session).unwrap());
        Self {
            server,
            client,
            store,
        }
    }

    fn tasks(&self) -> HttpTaskRepository {
        HttpTaskRepository::new(self.client.clone())
    }

    fn users(&self) -> HttpUserRepository {
        HttpUserRepository::new(self.client.clone())
    }

    fn auth(&self) -> HttpAuthRepository {
        HttpAuthRepository::new(self.client.clone())
    }
}

fn task_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "status": "pending",
        "priority": "normal",
        "work_date": "2025-01-15T00:00:00.000000Z",
        "assignees": [],
        "attachments": []
    })
}

#[tokio::test]
async fn list_passes_filters_and_page_metadata() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("from_date", "2025-01-01"))
        .and(query_param("to_date", "2025-01-31"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "current_page": 2,
                "last_page": 3,
                "per_page": 2,
                "total": 5,
                "data": [task_json(3, "Check valves"), null, task_json(4, "Log readings")]
            }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let page = h
        .tasks()
        .list(&TaskQuery {
            from_date: Some("2025-01-01".into()),
            to_date: Some("2025-01-31".into()),
            page: Some(2),
        })
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title.as_deref(), Some("Check valves"));
    assert_eq!(page.items[1].work_date.as_deref(), Some("2025-01-15"));
    assert_eq!(page.total, Some(5));
    assert!(page.has_more());
    assert_eq!(page.next_page(), Some(3));
}

#[tokio::test]
async fn list_without_filters_sends_no_query() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "data": [] }
        })))
        .mount(&h.server)
        .await;

    let page = h
        .tasks()
        .list(&TaskQuery {
            from_date: Some("  ".into()),
            ..TaskQuery::default()
        })
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert!(!page.has_more());
    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn get_maps_task() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/41"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": 41,
                "title": "Replace filter",
                "status": "Completed",
                "creator": { "id": 1, "name": "Ops" }
            }
        })))
        .mount(&h.server)
        .await;

    let task = h.tasks().get(41).await.unwrap();
    assert_eq!(task.id, Some(41));
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.creator.unwrap().id, Some(1));
}

#[tokio::test]
async fn get_missing_task_surfaces_server_status() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Task not found" })))
        .mount(&h.server)
        .await;

    let err = h.tasks().get(404).await.unwrap_err();
    assert_eq!(err.code(), 404);
    assert_eq!(err.message(), "Task not found");
}

#[tokio::test]
async fn create_without_files_sends_form() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("title=Inspect+pump"))
        .and(body_string_contains("priority=high"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": task_json(77, "Inspect pump")
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let task = h
        .tasks()
        .create(
            &CreateTaskParams {
                title: "Inspect pump".into(),
                priority: Some(TaskPriority::High),
                assignee_ids: vec![2],
                ..CreateTaskParams::default()
            },
            &[],
        )
        .await
        .unwrap();

    assert_eq!(task.id, Some(77));
}

#[tokio::test]
async fn create_with_files_sends_multipart() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"title\""))
        .and(body_string_contains("name=\"attachments[]\"; filename=\"photo.jpg\""))
        .and(body_string_contains("JPEGDATA"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "id": 78,
                "title": "Inspect pump",
                "attachments": [{ "id": 1, "file_name": "photo.jpg", "file_size": 8 }]
            }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let files = [FileUpload::new("photo.jpg", b"JPEGDATA".to_vec()).with_mime_type("image/jpeg")];
    let task = h
        .tasks()
        .create(
            &CreateTaskParams {
                title: "Inspect pump".into(),
                ..CreateTaskParams::default()
            },
            &files,
        )
        .await
        .unwrap();

    assert_eq!(task.attachments.len(), 1);
    assert_eq!(task.attachments[0].file_size, 8);
}

#[tokio::test]
async fn create_with_bad_mime_type_fails_before_sending() {
    let h = Harness::start(Some("tok")).await;
    let files = [FileUpload::new("x.bin", vec![1, 2]).with_mime_type("not a mime")];
    let err = h
        .tasks()
        .create(&CreateTaskParams::default(), &files)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Request { .. }));
    assert!(h.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_spoofs_put_and_states_attachment_intent() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/5"))
        .and(body_string_contains("_method=PUT"))
        .and(body_string_contains("attachments_update=0"))
        .and(body_string_contains("title=Renamed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": task_json(5, "Renamed")
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let task = h
        .tasks()
        .update(
            5,
            &UpdateTaskParams {
                title: Some("Renamed".into()),
                ..UpdateTaskParams::default()
            },
            &[],
            false,
        )
        .await
        .unwrap();

    assert_eq!(task.title.as_deref(), Some("Renamed"));
}

#[tokio::test]
async fn delete_accepts_success_envelope() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Task deleted"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.tasks().delete(5).await.unwrap();
}

#[tokio::test]
async fn update_status_uses_narrow_endpoint() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/5/status"))
        .and(body_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": 5, "status": "completed" }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let task = h.tasks().update_status(5, TaskStatus::Completed).await.unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
}

#[tokio::test]
async fn users_accept_bare_array() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "id": 1, "name": "Dana", "email": "" }, null, { "id": 2, "name": "Lee" }]
        })))
        .mount(&h.server)
        .await;

    let users = h.users().list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].email, None);
    assert_eq!(users[1].name.as_deref(), Some("Lee"));
}

#[tokio::test]
async fn users_accept_page() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "current_page": 1, "last_page": 1, "data": [{ "id": 1 }] }
        })))
        .mount(&h.server)
        .await;

    let users = h.users().list().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn login_starts_session_and_later_requests_carry_token() {
    let h = Harness::start(None).await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "email": "dana@example.com", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "token": "fresh", "user": { "id": 2, "name": "Dana" } }
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&h.server)
        .await;

    let user = h.auth().login(" dana@example.com ", "s3cret", true).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Dana"));
    assert!(h.store.is_logged_in());
    assert!(h.store.remember_me());
    assert_eq!(h.store.get_user().unwrap().id, Some(2));

    h.users().list().await.unwrap();
}

#[tokio::test]
async fn login_without_token_is_invalid_response() {
    let h = Harness::start(None).await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "user": { "id": 2 } }
        })))
        .mount(&h.server)
        .await;

    let err = h.auth().login("a@b.c", "pw", false).await.unwrap_err();
    assert_eq!(err, ApiError::InvalidResponse { status: 200 });
    assert!(!h.store.is_logged_in());
}

#[tokio::test]
async fn refresh_replaces_token() {
    let h = Harness::start(Some("old")).await;
    Mock::given(method("POST"))
        .and(path("/api/refresh"))
        .and(body_json(json!({ "token": "old" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "access_token": "new" }
        })))
        .mount(&h.server)
        .await;

    h.auth().refresh().await.unwrap();
    assert_eq!(h.store.get_token().as_deref(), Some("new"));
}

#[tokio::test]
async fn logout_clears_session_even_if_server_fails() {
    let h = Harness::start(Some("tok")).await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    h.auth().logout().await.unwrap();
    assert!(!h.store.is_logged_in());
    assert_eq!(h.store.get_token(), None);
}
