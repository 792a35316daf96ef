//! Integration tests for the session lifecycle.

mod helpers;

use nimbus_core::error::ErrorKind;
use nimbus_entity::{LoginRequest, NewVolume, RegisterRequest, VolumeColor};
use nimbus_state::keys;

use helpers::{EMAIL, PASSWORD, TestDrive};

#[tokio::test]
async fn test_login_persists_session() {
    let drive = TestDrive::new().await;
    let session = drive.login().await;
    assert_eq!(session.user.email, EMAIL);
    assert_eq!(
        drive.kv.get(keys::TOKEN).expect("get").as_deref(),
        Some(session.token.as_str())
    );

    let restarted = drive.restart().await;
    let user = restarted.services.auth.restore().await.expect("restore");
    assert_eq!(user.map(|u| u.email), Some(EMAIL.to_string()));
    let me = restarted.services.auth.me().await.expect("me");
    assert_eq!(me.storage_used, Some(0));
}

#[tokio::test]
async fn test_wrong_password_leaves_signed_out() {
    let drive = TestDrive::new().await;
    let err = drive
        .services
        .auth
        .login(LoginRequest::new(EMAIL, "not-it"))
        .await
        .expect_err("bad password");
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(drive.services.auth.session().await.is_none());
    assert_eq!(drive.kv.get(keys::TOKEN).expect("get"), None);
}

#[tokio::test]
async fn test_login_form_is_validated_locally() {
    let drive = TestDrive::new().await;
    let err = drive
        .services
        .auth
        .login(LoginRequest::new("", PASSWORD))
        .await
        .expect_err("empty email");
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_register_checks_confirmation_and_duplicates() {
    let drive = TestDrive::new().await;
    let request = RegisterRequest {
        email: "grace@example.com".into(),
        password: "cobol-rules".into(),
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
    };

    let err = drive
        .services
        .auth
        .register(request.clone(), "cobol-drools")
        .await
        .expect_err("mismatch");
    assert_eq!(err.message, "Passwords do not match");

    let session = drive
        .services
        .auth
        .register(request, "cobol-rules")
        .await
        .expect("register");
    assert_eq!(session.user.first_name, "Grace");

    let err = drive
        .services
        .auth
        .register(
            RegisterRequest {
                email: EMAIL.into(),
                password: "pw".into(),
                first_name: "Ada".into(),
                last_name: "Again".into(),
            },
            "pw",
        )
        .await
        .expect_err("duplicate");
    assert_eq!(err.message, "Email already exists");
}

#[tokio::test]
async fn test_logout_keeps_volumes_and_preferences() {
    let drive = TestDrive::signed_in().await;
    drive.mkdir_chain(&["Inbox"]).await;
    drive
        .services
        .volumes
        .create(NewVolume {
            name: "Backups".into(),
            size_gb: 2,
            color: VolumeColor::Green,
        })
        .await
        .expect("volume");
    drive
        .services
        .state()
        .write()
        .await
        .set_dark_mode(true)
        .expect("dark mode");

    drive.services.auth.logout().await.expect("logout");
    {
        let state = drive.services.state().read().await;
        assert!(!state.is_signed_in());
        assert!(state.navigation.is_root());
        assert!(state.folders.is_empty());
        assert!(state.ui.dark_mode());
        assert_eq!(state.volumes.len(), 1);
    }
    assert_eq!(drive.kv.get(keys::TOKEN).expect("get"), None);
    assert_eq!(drive.kv.get(keys::USER).expect("get"), None);

    let restarted = drive.restart().await;
    assert!(restarted.services.auth.restore().await.expect("restore").is_none());
    let state = restarted.services.state().read().await;
    assert_eq!(state.volumes.len(), 1);
    assert!(state.ui.dark_mode());

    let err = restarted.services.auth.me().await.expect_err("signed out");
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn test_rejected_token_signs_out_on_restore() {
    let drive = TestDrive::new().await;
    drive.login().await;
    drive.kv.set(keys::TOKEN, "revoked").expect("set");

    let restarted = drive.restart().await;
    assert!(restarted.services.state().read().await.is_signed_in());
    let restored = restarted.services.auth.restore().await.expect("restore");
    assert!(restored.is_none());
    assert!(!restarted.services.state().read().await.is_signed_in());
    assert_eq!(drive.kv.get(keys::TOKEN).expect("get"), None);
}
