use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::Utc;
use database::entities::users;
use migration::{Migrator, MigratorTrait};
use models::Role;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use server::{app, auth::Subject, state::AppState};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    db: DatabaseConnection,
}

impl TestApp {
    async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        // No JWT layer: tests set the subject extension themselves
        let router = app(AppState::new(db.clone()), |routes| routes);
        let test_app = Self { router, db };
        test_app.add_user("admin", Role::Admin, None).await;
        test_app
    }

    async fn add_user(&self, name: &str, role: Role, branch_id: Option<Uuid>) -> users::Model {
        let now = Utc::now().naive_utc();
        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(format!("{name}@example.com")),
            subject: Set(format!("sub-{name}")),
            role: Set(role),
            branch_id: Set(branch_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        subject: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let mut request = builder.body(body).unwrap();
        if let Some(subject) = subject {
            request
                .extensions_mut()
                .insert(Subject(format!("sub-{subject}")));
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, value)
    }

    async fn get(&self, uri: &str, subject: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(subject), None).await
    }

    async fn post(&self, uri: &str, subject: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(subject), Some(body)).await
    }

    /// Creates a branch as the admin and returns its id
    async fn branch(&self, name: &str) -> String {
        let (status, body) = self
            .post("/branches", "admin", json!({ "name": name, "location": "Main street" }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}

fn id(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_public_routes() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));

    let (status, body) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "server");

    let (status, body) = app
        .send(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/attendance"].is_object());
    assert!(body["paths"]["/students/{id}/transfer"].is_object());
}

#[tokio::test]
async fn test_authentication_is_required() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthenticated.");

    let (status, _) = app.get("/me", "nobody").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/me", "admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["branch_id"], Value::Null);
}

#[tokio::test]
async fn test_roles_and_branch_isolation() {
    let app = TestApp::new().await;
    let north = app.branch("North").await;
    let south = app.branch("South").await;
    app.add_user("clerk", Role::Employee, Some(north.parse().unwrap()))
        .await;

    let (status, body) = app
        .post("/branches", "clerk", json!({ "name": "West", "location": "x" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].is_string());

    let (status, theirs) = app
        .post(
            "/students",
            "admin",
            json!({ "branch_id": south, "name": "Bob", "track": "Data" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, ours) = app
        .post("/students", "clerk", json!({ "name": "Alice", "track": "Web" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ours["branch_id"], Value::String(north.clone()));

    let (status, _) = app.get(&format!("/students/{}", id(&theirs)), "clerk").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/students?per_page=10", "clerk").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_items"], 1);
    assert_eq!(body["students"][0]["name"], "Alice");

    let (status, body) = app.get("/dashboard?date=2025-01-04", "admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["branches"], 2);
    assert_eq!(body["students"], 2);
}

#[tokio::test]
async fn test_validation_errors_are_per_field() {
    let app = TestApp::new().await;
    let north = app.branch("North").await;

    let (status, body) = app
        .post(
            "/students",
            "admin",
            json!({ "branch_id": north, "name": " ", "track": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "The given data was invalid.");
    assert_eq!(body["errors"]["name"][0], "The name field is required.");
    assert!(body["errors"]["track"].is_array());
}

#[tokio::test]
async fn test_cannot_delete_own_account() {
    let app = TestApp::new().await;
    let (_, me) = app.get("/me", "admin").await;

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/users/{}", id(&me)),
            Some("admin"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You cannot delete your own account");
}

#[tokio::test]
async fn test_attendance_flow() {
    let app = TestApp::new().await;
    let north = app.branch("North").await;

    let (status, group) = app
        .post(
            "/groups",
            "admin",
            json!({
                "branch_id": north,
                "name": "Alpha",
                "day_pattern": "sat_tue",
                "start_date": "2025-01-01",
                "max_lectures": 4
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(group["days"], "Sat, Tue");
    let group_id = id(&group);

    let (_, student) = app
        .post(
            "/students",
            "admin",
            json!({ "branch_id": north, "name": "Alice", "track": "Web" }),
        )
        .await;
    let student_id = id(&student);

    let (status, enrolled) = app
        .post(
            &format!("/students/{student_id}/enroll"),
            "admin",
            json!({ "group_id": group_id, "enrolled_at": "2025-01-01T09:00:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrolled["enrollment"]["is_active"], true);

    let (status, stored) = app
        .post(
            "/attendance",
            "admin",
            json!({
                "group_id": group_id,
                "date": "2025-01-04",
                "entries": [
                    { "student_id": student_id, "status": "present", "is_installment_due": true }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["session"]["lecture_number"], 1);
    assert_eq!(stored["stored"], 1);

    let (status, active) = app.get("/attendance?date=2025-01-04", "admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["day_pattern"], "sat_tue");
    assert_eq!(active["groups"][0]["students"][0]["status"], "present");
    assert_eq!(active["groups"][0]["students"][0]["is_installment_due"], true);

    let (_, friday) = app.get("/attendance?date=2025-01-10", "admin").await;
    assert_eq!(friday["day_pattern"], Value::Null);
    assert_eq!(friday["groups"], json!([]));

    let session_id = stored["session"]["id"].as_str().unwrap();
    let (status, session) = app
        .get(&format!("/sessions/{session_id}/attendance"), "admin")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["attendance"][0]["student_name"], "Alice");

    let (status, report) = app
        .get(&format!("/groups/{group_id}/report"), "admin")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["lectures_held"], 1);
    assert_eq!(report["lectures_remaining"], 3);
    assert_eq!(report["students"][0]["statuses"], json!(["present"]));
    assert_eq!(report["students"][0]["attendance_rate"], 1.0);

    let (status, body) = app
        .post(
            "/attendance",
            "admin",
            json!({ "group_id": group_id, "date": "2025-01-07", "entries": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["entries"].is_array());
}

#[tokio::test]
async fn test_transfer_and_toggle() {
    let app = TestApp::new().await;
    let north = app.branch("North").await;

    let mut groups = Vec::new();
    for (name, pattern) in [("Alpha", "sat_tue"), ("Beta", "mon_thu")] {
        let (_, group) = app
            .post(
                "/groups",
                "admin",
                json!({
                    "branch_id": north,
                    "name": name,
                    "day_pattern": pattern,
                    "start_date": "2025-01-01",
                    "max_lectures": 10
                }),
            )
            .await;
        groups.push(id(&group));
    }

    let (_, student) = app
        .post(
            "/students",
            "admin",
            json!({ "branch_id": north, "name": "Alice", "track": "Web" }),
        )
        .await;
    let student_id = id(&student);

    app.post(
        &format!("/students/{student_id}/enroll"),
        "admin",
        json!({ "group_id": groups[0], "enrolled_at": "2025-01-01T00:00:00" }),
    )
    .await;

    let (status, transfer) = app
        .post(
            &format!("/students/{student_id}/transfer"),
            "admin",
            json!({
                "from_group_id": groups[0],
                "to_group_id": groups[1],
                "effective_date": "2025-02-01",
                "reason": "Moved shifts"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(transfer["transfer"]["reason"], "Moved shifts");
    assert_eq!(transfer["enrollment"]["group_id"], Value::String(groups[1].clone()));

    let (status, history) = app
        .get(&format!("/students/{student_id}/enrollments"), "admin")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["enrollments"][0]["group_name"], "Beta");
    assert_eq!(history["enrollments"][1]["is_active"], false);
    assert_eq!(history["transfers"].as_array().unwrap().len(), 1);

    let (status, toggled) = app
        .post(&format!("/groups/{}/toggle-status", groups[0]), "admin", json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["group"]["is_active"], false);

    let (_, inactive) = app.get("/groups?is_active=false", "admin").await;
    assert_eq!(inactive.as_array().unwrap().len(), 1);
    assert_eq!(inactive[0]["name"], "Alpha");
}
