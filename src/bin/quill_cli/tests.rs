use std::io::Cursor;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use httpmock::MockServer;
use quill::application::listing::{Outcome, ScreenStatus};
use quill::application::session::Session;
use quill::config::{ApiSettings, LogFormat, LoggingSettings, SessionSettings, Settings};
use quill::infra::session_file;
use quill_api_types::User;
use serde_json::json;
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::args::{AdminCmd, AuthCmd, PostFields, PostsCmd};
use crate::client::{CliError, Ctx, settle};
use crate::handlers::{admin, auth, posts};

fn settings(server: &MockServer, session_file: &Path) -> Settings {
    Settings {
        api: ApiSettings {
            base_url: Url::parse(&server.url("/api/")).expect("url"),
            timeout: Duration::from_secs(5),
            page_size: NonZeroU32::new(2).expect("non-zero"),
        },
        logging: LoggingSettings {
            level: LevelFilter::OFF,
            format: LogFormat::Compact,
        },
        session: SessionSettings {
            file: session_file.to_path_buf(),
        },
    }
}

async fn ctx(server: &MockServer, dir: &TempDir, signed_in_as: Option<bool>) -> Ctx {
    let path = dir.path().join("session.toml");
    if let Some(is_staff) = signed_in_as {
        let session = Session {
            access_token: "tok".into(),
            refresh_token: None,
            user: User {
                id: 1,
                email: "me@blog.io".into(),
                username: Some("author1".into()),
                first_name: None,
                last_name: None,
                is_staff,
            },
        };
        session_file::save(&path, &session).await.expect("seed session");
    }
    Ctx::new(settings(server, &path)).await.expect("ctx")
}

fn post_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "content": "Some content here",
        "author": {"id": 1, "email": "me@blog.io"}
    })
}

#[test]
fn confirm_accepts_only_explicit_yes() -> Result<(), CliError> {
    assert!(crate::io::confirm_with("Delete?", &mut Cursor::new("y\n"))?);
    assert!(crate::io::confirm_with("Delete?", &mut Cursor::new("YES\n"))?);
    assert!(!crate::io::confirm_with("Delete?", &mut Cursor::new("\n"))?);
    assert!(!crate::io::confirm_with("Delete?", &mut Cursor::new("nope\n"))?);
    assert!(crate::io::confirm("Delete?", true)?);
    Ok(())
}

#[test]
fn settle_surfaces_static_screen_message() {
    let status = ScreenStatus {
        loading: false,
        error: Some("Failed to delete post"),
    };
    let err = settle(Outcome::Failed, &status).expect_err("failed outcome");
    assert_eq!(err.to_string(), "Failed to delete post");
    assert!(matches!(
        settle(Outcome::Forbidden, &status),
        Err(CliError::Forbidden)
    ));
    assert!(settle(Outcome::Cancelled, &status).is_ok());
}

#[tokio::test]
async fn posts_list_passes_filters() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/blog/posts/")
            .query_param("search", "rust")
            .query_param("page", "2");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"count": 3, "results": [post_json(3, "Rust traits")]}));
    });

    let dir = TempDir::new().expect("tempdir");
    let ctx = ctx(&server, &dir, None).await;
    posts::handle(
        &ctx,
        PostsCmd::List {
            search: Some("rust".into()),
            author: None,
            page: 2,
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn delete_with_yes_refetches_my_posts() -> Result<(), CliError> {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method("GET")
            .path("/api/blog/posts/my_posts/")
            .header("authorization", "Bearer tok");
        then.status(200)
            .json_body(json!([post_json(4, "Only post")]));
    });
    let delete = server.mock(|when, then| {
        when.method("DELETE").path("/api/blog/posts/4/");
        then.status(204);
    });

    let dir = TempDir::new().expect("tempdir");
    let ctx = ctx(&server, &dir, Some(false)).await;
    posts::handle(&ctx, PostsCmd::Delete { id: 4, yes: true }).await?;

    delete.assert();
    list.assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn failed_delete_reports_screen_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/blog/posts/my_posts/");
        then.status(200).json_body(json!([post_json(4, "Only post")]));
    });
    server.mock(|when, then| {
        when.method("DELETE").path("/api/blog/posts/4/");
        then.status(500).body("boom");
    });

    let dir = TempDir::new().expect("tempdir");
    let ctx = ctx(&server, &dir, Some(false)).await;
    let err = posts::handle(&ctx, PostsCmd::Delete { id: 4, yes: true })
        .await
        .expect_err("delete fails");
    assert_eq!(err.to_string(), "Failed to delete post");
}

#[tokio::test]
async fn invalid_post_never_reaches_api() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method("GET").path("/api/blog/posts/my_posts/");
        then.status(200).json_body(json!([]));
    });
    let create = server.mock(|when, then| {
        when.method("POST").path("/api/blog/posts/");
        then.status(201).json_body(post_json(9, "Hey"));
    });

    let dir = TempDir::new().expect("tempdir");
    let ctx = ctx(&server, &dir, Some(false)).await;
    let fields = PostFields {
        title: Some("Hey".into()),
        content: Some("Long enough content".into()),
        ..PostFields::default()
    };
    let err = posts::handle(&ctx, PostsCmd::Create(fields))
        .await
        .expect_err("short title");
    match err {
        CliError::Validation(errors) => assert!(errors.contains("title")),
        other => panic!("unexpected error: {other}"),
    }
    list.assert_hits(1);
    create.assert_hits(0);
}

#[tokio::test]
async fn update_finds_post_on_later_page() -> Result<(), CliError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET")
            .path("/api/blog/posts/my_posts/")
            .query_param("page", "1");
        then.status(200).json_body(json!({
            "count": 3,
            "results": [post_json(1, "First post"), post_json(2, "Second post")]
        }));
    });
    server.mock(|when, then| {
        when.method("GET")
            .path("/api/blog/posts/my_posts/")
            .query_param("page", "2");
        then.status(200).json_body(json!({
            "count": 3,
            "results": [post_json(3, "Third post")]
        }));
    });
    let update = server.mock(|when, then| {
        when.method("PUT")
            .path("/api/blog/posts/3/")
            .body_includes("Third post, revised")
            .body_includes("Some content here");
        then.status(200).json_body(post_json(3, "Third post, revised"));
    });

    let dir = TempDir::new().expect("tempdir");
    let ctx = ctx(&server, &dir, Some(false)).await;
    let fields = PostFields {
        title: Some("Third post, revised".into()),
        ..PostFields::default()
    };
    posts::handle(&ctx, PostsCmd::Update { id: 3, fields }).await?;
    update.assert();
    Ok(())
}

#[tokio::test]
async fn admin_commands_require_staff() {
    let server = MockServer::start();
    let users = server.mock(|when, then| {
        when.method("GET").path("/api/blog/users/");
        then.status(200).json_body(json!([]));
    });

    let dir = TempDir::new().expect("tempdir");
    let anonymous = ctx(&server, &dir, None).await;
    let err = admin::handle(
        &anonymous,
        AdminCmd::Users {
            search: None,
            page: 1,
        },
    )
    .await
    .expect_err("anonymous");
    assert!(matches!(err, CliError::LoginRequired));

    let dir = TempDir::new().expect("tempdir");
    let member = ctx(&server, &dir, Some(false)).await;
    let err = admin::handle(&member, AdminCmd::DeleteUser { id: 2, yes: true })
        .await
        .expect_err("not staff");
    assert!(matches!(err, CliError::Forbidden));
    users.assert_hits(0);
}

#[tokio::test]
async fn admin_block_confirms_then_refetches_comments() -> Result<(), CliError> {
    let server = MockServer::start();
    let block = server.mock(|when, then| {
        when.method("POST").path("/api/blog/comments/8/block/");
        then.status(200).json_body(json!({"message": "Comment blocked"}));
    });
    let list = server.mock(|when, then| {
        when.method("GET").path("/api/blog/comments/");
        then.status(200).json_body(json!([{
            "id": 8,
            "post": 1,
            "user": {"id": 5, "email": "x@y.io"},
            "content": "spam spam",
            "is_approved": false
        }]));
    });

    let dir = TempDir::new().expect("tempdir");
    let ctx = ctx(&server, &dir, Some(true)).await;
    admin::handle(&ctx, AdminCmd::Block { id: 8, yes: true }).await?;
    block.assert();
    list.assert();
    Ok(())
}

#[tokio::test]
async fn login_persists_and_logout_forgets_session() -> Result<(), CliError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/api/auth/login/");
        then.status(200).json_body(json!({"access": "fresh", "refresh": "r1"}));
    });
    let profile = server.mock(|when, then| {
        when.method("GET")
            .path("/api/auth/profile/")
            .header("authorization", "Bearer fresh");
        then.status(200)
            .json_body(json!({"id": 7, "email": "me@blog.io", "is_staff": true}));
    });
    server.mock(|when, then| {
        when.method("POST").path("/api/auth/logout/");
        then.status(500).body("down");
    });

    let dir = TempDir::new().expect("tempdir");
    let ctx = ctx(&server, &dir, None).await;
    auth::handle(
        &ctx,
        AuthCmd::Login {
            email: "me@blog.io".into(),
            password: Some("Secret123".into()),
        },
    )
    .await?;
    profile.assert();

    let path = dir.path().join("session.toml");
    let stored = session_file::load(&path).await?.expect("stored session");
    assert_eq!(stored.access_token, "fresh");
    assert!(stored.user.is_staff);

    auth::handle(&ctx, AuthCmd::Logout).await?;
    assert!(session_file::load(&path).await?.is_none());
    assert!(!ctx.session.is_signed_in());
    Ok(())
}

#[tokio::test]
async fn profile_refresh_keeps_staff_flag_in_saved_session() -> Result<(), CliError> {
    let server = MockServer::start();
    let profile = server.mock(|when, then| {
        when.method("GET").path("/api/auth/profile/");
        then.status(200)
            .json_body(json!({"username": "admin1", "email": "me@blog.io"}));
    });

    let dir = TempDir::new().expect("tempdir");
    let ctx = ctx(&server, &dir, Some(true)).await;
    auth::handle(&ctx, AuthCmd::Profile).await?;
    profile.assert();

    let stored = session_file::load(&dir.path().join("session.toml"))
        .await?
        .expect("stored session");
    assert_eq!(stored.user.id, 1);
    assert!(stored.user.is_staff);
    assert_eq!(stored.user.username.as_deref(), Some("admin1"));
    assert!(ctx.session.is_staff());
    Ok(())
}
