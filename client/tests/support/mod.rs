//! In-process fake of the catalogue backend for adapter tests.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Mutex;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Map, Value, json};

/// Movie whose favourite endpoints always fail with an empty 500.
pub const BROKEN_MOVIE_ID: &str = "broken";

#[derive(Default)]
struct Account {
    password: String,
    record: Map<String, Value>,
}

#[derive(Default)]
struct Backend {
    accounts: Mutex<HashMap<String, Account>>,
}

impl Backend {
    fn authorised(req: &HttpRequest, email: Option<&str>) -> bool {
        let Some(header) = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
        else {
            return false;
        };
        match email {
            Some(email) => header == format!("Bearer token-{email}"),
            None => header.starts_with("Bearer token-"),
        }
    }
}

fn unauthorised() -> HttpResponse {
    HttpResponse::Unauthorized().body("Unauthorized")
}

fn movies() -> Value {
    json!([
        {
            "_id": "m1",
            "title": "Alien",
            "description": "In space no one can hear you scream.",
            "director": { "name": "Ridley Scott", "birth": 1937 },
            "genres": [{ "name": "Horror" }, { "name": "Sci-Fi" }],
            "imagePath": "alien.png",
            "featured": true
        },
        {
            "_id": "m2",
            "title": "Heat",
            "director": { "name": "Michael Mann" },
            "genres": [{ "name": "Crime" }]
        },
        {
            "_id": "m3",
            "title": "Ran",
            "director": { "name": "Akira Kurosawa" },
            "genres": []
        }
    ])
}

async fn register(backend: web::Data<Backend>, body: web::Json<Value>) -> HttpResponse {
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    };
    let mut errors = Vec::new();
    if field("email").is_none() {
        errors.push(json!({ "msg": "Email is required" }));
    }
    if field("password").is_none() {
        errors.push(json!({ "msg": "Password is required" }));
    }
    let (Some(email), Some(password)) = (field("email"), field("password")) else {
        return HttpResponse::UnprocessableEntity().json(json!({ "errors": errors }));
    };

    let mut accounts = backend.accounts.lock().expect("accounts lock");
    if accounts.contains_key(&email) {
        return HttpResponse::BadRequest().json(format!("{email} already exists"));
    }
    let mut record = Map::new();
    record.insert("email".to_owned(), json!(email));
    for name in ["firstname", "lastname", "birthday"] {
        if let Some(value) = field(name) {
            record.insert(name.to_owned(), json!(value));
        }
    }
    record.insert("favoriteMovies".to_owned(), json!([]));
    record.insert("_id".to_owned(), json!(format!("id-{email}")));
    accounts.insert(
        email,
        Account {
            password,
            record: record.clone(),
        },
    );
    HttpResponse::Created().json(record)
}

async fn login(backend: web::Data<Backend>, body: web::Json<Value>) -> HttpResponse {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let accounts = backend.accounts.lock().expect("accounts lock");
    match accounts.get(email) {
        Some(account) if account.password == password => HttpResponse::Ok().json(json!({
            "user": account.record,
            "token": format!("token-{email}"),
        })),
        _ => HttpResponse::BadRequest().json(json!({
            "message": "Incorrect username or password.",
            "user": false
        })),
    }
}

async fn list_movies(req: HttpRequest) -> HttpResponse {
    if !Backend::authorised(&req, None) {
        return unauthorised();
    }
    HttpResponse::Ok().json(movies())
}

async fn favorites(
    req: HttpRequest,
    backend: web::Data<Backend>,
    path: web::Path<String>,
) -> HttpResponse {
    let email = path.into_inner();
    if !Backend::authorised(&req, Some(&email)) {
        return unauthorised();
    }
    let accounts = backend.accounts.lock().expect("accounts lock");
    let Some(account) = accounts.get(&email) else {
        return HttpResponse::NotFound().json("User not found");
    };
    let ids = account
        .record
        .get("favoriteMovies")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let selected: Vec<Value> = movies()
        .as_array()
        .into_iter()
        .flatten()
        .filter(|movie| movie.get("_id").is_some_and(|id| ids.contains(id)))
        .cloned()
        .collect();
    HttpResponse::Ok().json(selected)
}

fn change_favorite(
    req: &HttpRequest,
    backend: &Backend,
    email: &str,
    movie_id: &str,
    add: bool,
) -> HttpResponse {
    if !Backend::authorised(req, Some(email)) {
        return unauthorised();
    }
    if movie_id == BROKEN_MOVIE_ID {
        return HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let mut accounts = backend.accounts.lock().expect("accounts lock");
    let Some(account) = accounts.get_mut(email) else {
        return HttpResponse::NotFound().json("User not found");
    };
    let favorites = account
        .record
        .entry("favoriteMovies")
        .or_insert_with(|| json!([]));
    if let Some(ids) = favorites.as_array_mut() {
        ids.retain(|id| id != movie_id);
        if add {
            ids.push(json!(movie_id));
        }
    }
    HttpResponse::Ok().json(&account.record)
}

async fn add_favorite(
    req: HttpRequest,
    backend: web::Data<Backend>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (email, movie_id) = path.into_inner();
    change_favorite(&req, &backend, &email, &movie_id, true)
}

async fn remove_favorite(
    req: HttpRequest,
    backend: web::Data<Backend>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (email, movie_id) = path.into_inner();
    change_favorite(&req, &backend, &email, &movie_id, false)
}

async fn edit_user(
    req: HttpRequest,
    backend: web::Data<Backend>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    let email = path.into_inner();
    if !Backend::authorised(&req, Some(&email)) {
        return unauthorised();
    }
    let mut accounts = backend.accounts.lock().expect("accounts lock");
    let Some(mut account) = accounts.remove(&email) else {
        return HttpResponse::NotFound().json("User not found");
    };
    for name in ["firstname", "lastname", "email", "birthday"] {
        if let Some(value) = body.get(name) {
            account.record.insert(name.to_owned(), value.clone());
        }
    }
    if let Some(password) = body.get("password").and_then(Value::as_str) {
        password.clone_into(&mut account.password);
    }
    let key = account
        .record
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or(&email)
        .to_owned();
    let record = account.record.clone();
    accounts.insert(key, account);
    HttpResponse::Ok().json(record)
}

async fn delete_user(
    req: HttpRequest,
    backend: web::Data<Backend>,
    path: web::Path<String>,
) -> HttpResponse {
    let email = path.into_inner();
    if !Backend::authorised(&req, Some(&email)) {
        return unauthorised();
    }
    let mut accounts = backend.accounts.lock().expect("accounts lock");
    match accounts.remove(&email) {
        Some(_) => HttpResponse::Ok().body(format!("{email} was deleted.")),
        None => HttpResponse::BadRequest().body(format!("{email} was not found")),
    }
}

/// Running fake backend.
pub struct FakeBackend {
    /// Root URL, with a trailing slash.
    pub base_url: String,
    handle: ServerHandle,
}

impl FakeBackend {
    /// Bind to an ephemeral port and serve on the current actix runtime.
    pub fn start() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let backend = web::Data::new(Backend::default());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(backend.clone())
                .route("/users", web::post().to(register))
                .route("/login", web::post().to(login))
                .route("/movies", web::get().to(list_movies))
                .route("/users/{email}/favoriteMovies", web::get().to(favorites))
                .route(
                    "/users/{email}/favoriteMovies/{movie_id}",
                    web::post().to(add_favorite),
                )
                .route(
                    "/users/{email}/favoriteMovies/{movie_id}",
                    web::delete().to(remove_favorite),
                )
                .route("/users/{email}", web::patch().to(edit_user))
                .route("/users/{email}", web::delete().to(delete_user))
        })
        .workers(1)
        .listen(listener)
        .expect("bind test server")
        .disable_signals()
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        Self {
            base_url: format!("http://{addr}/"),
            handle,
        }
    }

    /// Stop accepting connections.
    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// A local URL nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind closed listener");
    let addr = listener.local_addr().expect("closed addr");
    drop(listener);
    format!("http://{addr}/")
}

/// A one-shot local server that answers `200 OK` with a body cut short of
/// its declared `Content-Length`.
pub fn truncated_body_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind truncating listener");
    let addr = listener.local_addr().expect("truncating addr");
    std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        stream
            .set_read_timeout(Some(std::time::Duration::from_millis(200)))
            .expect("read timeout");
        let mut request = Vec::new();
        let mut chunk = [0_u8; 1024];
        while let Ok(read) = stream.read(&mut chunk) {
            if read == 0 {
                break;
            }
            request.extend_from_slice(chunk.get(..read).unwrap_or_default());
        }
        let response = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                        Content-Length: 64\r\n\r\n{\"token\":\"tok";
        stream
            .write_all(response.as_bytes())
            .expect("write partial response");
    });
    format!("http://{addr}/")
}
