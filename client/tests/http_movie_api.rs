//! End-to-end coverage of the catalogue client over real HTTP.
//!
//! Each test runs the reqwest adapter against an in-process fake backend and
//! keeps the session in a temporary directory.

mod support;

use std::sync::Arc;

use myflix_client::domain::ports::{ApiError, KeyValueStore};
use myflix_client::domain::{
    CatalogueClient, Credentials, FavoriteMovies, FavoriteToggle, MovieId, Registration,
    TOKEN_KEY, USER_KEY, UserUpdate,
};
use myflix_client::outbound::http::HttpMovieApi;
use myflix_client::outbound::storage::FileKeyValueStore;
use reqwest::Url;
use support::{BROKEN_MOVIE_ID, FakeBackend, closed_port_url, truncated_body_url};
use tempfile::TempDir;

type Client = CatalogueClient<HttpMovieApi, Arc<FileKeyValueStore>>;

struct Harness {
    client: Client,
    store: Arc<FileKeyValueStore>,
    _session_dir: TempDir,
}

fn harness(base_url: &str) -> Harness {
    let session_dir = TempDir::new().expect("session dir");
    let store = Arc::new(FileKeyValueStore::open(session_dir.path()).expect("open store"));
    let api = HttpMovieApi::new(Url::parse(base_url).expect("base url"), None).expect("client");
    Harness {
        client: CatalogueClient::new(Arc::new(api), store.clone()),
        store,
        _session_dir: session_dir,
    }
}

fn movie_id(raw: &str) -> MovieId {
    MovieId::new(raw).expect("valid movie id")
}

fn credentials(password: &str) -> Credentials {
    Credentials::try_from_parts("ada@example.com", password).expect("credentials")
}

async fn registered_and_logged_in(backend: &FakeBackend) -> Harness {
    let harness = harness(&backend.base_url);
    let registration = Registration::new(
        credentials("pw"),
        "Ada",
        "Lovelace",
        Some("1815-12-10".to_owned()),
    );
    harness
        .client
        .register(&registration)
        .await
        .expect("register");
    harness
        .client
        .login(&credentials("pw"))
        .await
        .expect("login");
    harness
}

#[actix_rt::test]
async fn login_persists_token_and_user() {
    let backend = FakeBackend::start();
    let harness = registered_and_logged_in(&backend).await;

    assert_eq!(
        harness.store.get(TOKEN_KEY).expect("get").as_deref(),
        Some("token-ada@example.com")
    );
    let raw_user = harness.store.get(USER_KEY).expect("get").expect("user entry");
    assert!(raw_user.contains("\"email\":\"ada@example.com\""));

    let movies = harness.client.list_movies().await.expect("movies");
    let titles: Vec<_> = movies.iter().map(|movie| movie.title.as_str()).collect();
    assert_eq!(titles, ["Alien", "Heat", "Ran"]);
    assert_eq!(movies.first().map(|m| m.genre_names()).as_deref(), Some("Horror, Sci-Fi"));
    backend.stop().await;
}

#[actix_rt::test]
async fn invalid_login_is_normalized_and_stores_nothing() {
    let backend = FakeBackend::start();
    let harness = registered_and_logged_in(&backend).await;
    harness.client.logout().expect("logout");

    let err = harness
        .client
        .login(&credentials("wrong"))
        .await
        .expect_err("bad password");

    assert_eq!(err.message(), "Incorrect username or password.");
    assert_eq!(err.status(), Some(400));
    assert!(matches!(err, ApiError::Validation { .. }));
    assert!(harness.store.get(TOKEN_KEY).expect("get").is_none());
}

#[actix_rt::test]
async fn duplicate_registration_surfaces_server_text() {
    let backend = FakeBackend::start();
    let harness = harness(&backend.base_url);
    let registration = Registration::new(credentials("pw"), "Ada", "Lovelace", None);
    harness.client.register(&registration).await.expect("first");

    let err = harness
        .client
        .register(&registration)
        .await
        .expect_err("duplicate");
    assert_eq!(err.message(), "ada@example.com already exists");
    assert!(matches!(err, ApiError::Server { status: 400, .. }));
}

#[actix_rt::test]
async fn toggle_round_trip_updates_server_and_local_state() {
    let backend = FakeBackend::start();
    let harness = registered_and_logged_in(&backend).await;
    let client = &harness.client;

    assert_eq!(client.toggle_favorite(&movie_id("m1")).await.expect("add m1"), FavoriteToggle::Added);
    assert_eq!(client.toggle_favorite(&movie_id("m2")).await.expect("add m2"), FavoriteToggle::Added);
    assert_eq!(client.toggle_favorite(&movie_id("m2")).await.expect("rm m2"), FavoriteToggle::Removed);

    let local = client.current_user().expect("read").expect("logged in");
    assert_eq!(local.favorite_movies, FavoriteMovies::from(vec![movie_id("m1")]));
    let server: Vec<_> = client
        .favorites("ada@example.com")
        .await
        .expect("server favourites")
        .into_iter()
        .map(|movie| movie.id)
        .collect();
    assert_eq!(server, [movie_id("m1")]);
    let joined: Vec<_> = client
        .favorite_movies()
        .await
        .expect("favourite movies")
        .into_iter()
        .map(|movie| movie.title)
        .collect();
    assert_eq!(joined, ["Alien"]);
}

#[actix_rt::test]
async fn failed_toggle_keeps_local_favorites() {
    let backend = FakeBackend::start();
    let harness = registered_and_logged_in(&backend).await;

    let err = harness
        .client
        .toggle_favorite(&movie_id(BROKEN_MOVIE_ID))
        .await
        .expect_err("server error");

    assert_eq!(
        err.message(),
        "Error Status code 500, Error body is: Internal Server Error"
    );
    let local = harness.client.current_user().expect("read").expect("logged in");
    assert!(local.favorite_movies.is_empty());
}

#[actix_rt::test]
async fn logout_then_authenticated_call_fails_locally() {
    let backend = FakeBackend::start();
    let harness = registered_and_logged_in(&backend).await;

    harness.client.logout().expect("logout");
    let err = harness.client.list_movies().await.expect_err("logged out");

    assert!(matches!(err, ApiError::Session { .. }));
    assert!(harness.store.get(USER_KEY).expect("get").is_none());
}

#[actix_rt::test]
async fn edits_and_password_changes_round_trip() {
    let backend = FakeBackend::start();
    let harness = registered_and_logged_in(&backend).await;

    let update = UserUpdate {
        lastname: Some("Byron".to_owned()),
        ..UserUpdate::default()
    };
    let updated = harness.client.edit_user(&update).await.expect("edit");
    assert_eq!(updated.display_name(), "Ada Byron");
    assert_eq!(updated.birthday_for_input().as_deref(), Some("1815-12-10"));

    harness
        .client
        .change_password(zeroize::Zeroizing::new("n3w".to_owned()))
        .await
        .expect("password change");
    harness.client.logout().expect("logout");
    harness
        .client
        .login(&credentials("n3w"))
        .await
        .expect("login with new password");
}

#[actix_rt::test]
async fn delete_account_clears_session() {
    let backend = FakeBackend::start();
    let harness = registered_and_logged_in(&backend).await;

    let confirmation = harness.client.delete_user().await.expect("delete");

    assert_eq!(confirmation.message, "ada@example.com was deleted.");
    assert!(harness.client.current_user().expect("read").is_none());
    assert!(harness.store.get(TOKEN_KEY).expect("get").is_none());
}

#[actix_rt::test]
async fn unreachable_server_is_a_network_error() {
    let harness = harness(&closed_port_url());

    let err = harness
        .client
        .login(&credentials("pw"))
        .await
        .expect_err("nothing listening");

    assert!(matches!(err, ApiError::Network { .. }));
    assert!(err.message().starts_with("Error: "));
    assert!(err.status().is_none());
}

#[actix_rt::test]
async fn body_cut_short_after_status_is_a_server_error() {
    let harness = harness(&truncated_body_url());

    let err = harness
        .client
        .login(&credentials("pw"))
        .await
        .expect_err("incomplete body");

    assert!(matches!(err, ApiError::Server { status: 200, .. }));
    assert!(err.message().starts_with("Error: failed to read response body"));
    assert!(harness.store.get(TOKEN_KEY).expect("get").is_none());
}
