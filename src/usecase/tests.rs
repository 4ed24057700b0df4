use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::*;
use crate::error::ApiError;

/// Records every call it receives; optionally fails all of them.
#[derive(Default)]
struct MockTaskRepository {
    calls: Arc<Mutex<Vec<String>>>,
    should_fail: bool,
}

impl MockTaskRepository {
    fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.should_fail {
            return Err(ApiError::Http {
                status: 500,
                message: "Mock failure".into(),
            });
        }
        Ok(())
    }

    fn task(id: i64) -> Task {
        Task {
            id: Some(id),
            ..Task::default()
        }
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn list(&self, query: &TaskQuery) -> ApiResult<PagedResult<Task>> {
        self.record(format!(
            "list {:?} {:?} {:?}",
            query.from_date, query.to_date, query.page
        ))?;
        Ok(PagedResult::new(vec![Self::task(1), Self::task(2)]))
    }

    async fn get(&self, id: i64) -> ApiResult<Task> {
        self.record(format!("get {id}"))?;
        Ok(Self::task(id))
    }

    async fn create(&self, params: &CreateTaskParams, files: &[FileUpload]) -> ApiResult<Task> {
        self.record(format!("create {} files={}", params.title, files.len()))?;
        Ok(Self::task(99))
    }

    async fn update(
        &self,
        id: i64,
        params: &UpdateTaskParams,
        files: &[FileUpload],
        attachments_update: bool,
    ) -> ApiResult<Task> {
        self.record(format!(
            "update {id} {:?} files={} replace={attachments_update}",
            params.title,
            files.len()
        ))?;
        Ok(Self::task(id))
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.record(format!("delete {id}"))
    }

    async fn update_status(&self, id: i64, status: TaskStatus) -> ApiResult<Task> {
        self.record(format!("status {id} {status}"))?;
        Ok(Task {
            status,
            ..Self::task(id)
        })
    }
}

struct StaticUsers;

#[async_trait]
impl UserRepository for StaticUsers {
    async fn list(&self) -> ApiResult<Vec<UserData>> {
        Ok(vec![UserData {
            id: Some(1),
            name: Some("Dana".into()),
            ..UserData::default()
        }])
    }
}

#[derive(Default)]
struct MockAuth {
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl AuthRepository for MockAuth {
    async fn login(&self, email: &str, _password: &str, remember_me: bool) -> ApiResult<UserData> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("login {email} remember={remember_me}"));
        Ok(UserData {
            email: Some(email.to_string()),
            ..UserData::default()
        })
    }

    async fn refresh(&self) -> ApiResult<()> {
        self.calls.lock().unwrap().push("refresh".into());
        Ok(())
    }

    async fn logout(&self) -> ApiResult<()> {
        self.calls.lock().unwrap().push("logout".into());
        Ok(())
    }
}

#[tokio::test]
async fn get_tasks_forwards_query() {
    let repository = MockTaskRepository::default();
    let calls = repository.calls.clone();
    let use_case = GetTasks::with_repository(repository);

    let page = use_case
        .execute(TaskQuery {
            from_date: Some("2025-01-01".into()),
            to_date: None,
            page: Some(3),
        })
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &["list Some(\"2025-01-01\") None Some(3)"]
    );
}

#[tokio::test]
async fn task_mutations_delegate_one_to_one() {
    let repository = MockTaskRepository::default();
    let calls = repository.calls.clone();
    let repository = Arc::new(repository);

    let created = CreateTask::with_repository(repository.clone())
        .execute(CreateTaskRequest {
            params: CreateTaskParams {
                title: "Inspect pump".into(),
                ..CreateTaskParams::default()
            },
            files: vec![FileUpload::new("a.txt", b"a".to_vec())],
        })
        .await
        .unwrap();
    assert_eq!(created.id, Some(99));

    UpdateTask::with_repository(repository.clone())
        .execute(UpdateTaskRequest {
            id: 5,
            params: UpdateTaskParams {
                title: Some("Renamed".into()),
                ..UpdateTaskParams::default()
            },
            files: vec![],
            attachments_update: false,
        })
        .await
        .unwrap();

    let task = UpdateTaskStatus::with_repository(repository.clone())
        .execute(StatusChange {
            id: 5,
            status: TaskStatus::Completed,
        })
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Completed);

    GetTask::with_repository(repository.clone())
        .execute(5)
        .await
        .unwrap();
    DeleteTask::with_repository(repository)
        .execute(5)
        .await
        .unwrap();

    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[
            "create Inspect pump files=1",
            "update 5 Some(\"Renamed\") files=0 replace=false",
            "status 5 completed",
            "get 5",
            "delete 5",
        ]
    );
}

#[tokio::test]
async fn errors_pass_through_unchanged() {
    let use_case = GetTask::with_repository(MockTaskRepository::default().with_failure());
    let err = use_case.execute(1).await.unwrap_err();
    assert_eq!(err.code(), 500);
    assert_eq!(err.message(), "Mock failure");
}

#[tokio::test]
async fn use_cases_work_behind_trait_objects() {
    let use_cases: Vec<Box<dyn UseCase<Params = i64, Output = Task>>> = vec![
        Box::new(GetTask::with_repository(MockTaskRepository::default())),
        Box::new(GetTask::with_repository(MockTaskRepository::default())),
    ];
    for (i, use_case) in use_cases.iter().enumerate() {
        let task = use_case.execute(i as i64).await.unwrap();
        assert_eq!(task.id, Some(i as i64));
    }
}

#[tokio::test]
async fn get_users_and_auth_delegate() {
    let users = GetUsers::with_repository(StaticUsers)
        .execute(())
        .await
        .unwrap();
    assert_eq!(users[0].display_name(), "Dana");

    let auth = MockAuth::default();
    let calls = auth.calls.clone();
    let user = Login::with_repository(auth)
        .execute(Credentials {
            email: "dana@example.com".into(),
            password: "pw".into(),
            remember_me: true,
        })
        .await
        .unwrap();
    assert_eq!(user.email.as_deref(), Some("dana@example.com"));

    Logout::with_repository(MockAuth {
        calls: calls.clone(),
    })
    .execute(())
    .await
    .unwrap();

    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &["login dana@example.com remember=true", "logout"]
    );
}
