//! Integration tests for folder navigation, the lock gate and stale listings.

mod helpers;

use std::time::Duration;

use nimbus_core::error::ErrorKind;
use nimbus_service::OpenOutcome;
use nimbus_state::{Breadcrumb, GateState};

use helpers::TestDrive;

#[tokio::test]
async fn test_jump_back_truncates_path() {
    let drive = TestDrive::signed_in().await;
    let chain = drive.mkdir_chain(&["A", "B", "C"]).await;
    assert_eq!(drive.path_names().await, vec!["A", "B", "C"]);

    let outcome = drive
        .services
        .navigation
        .jump_to(&chain[0].id)
        .await
        .expect("jump");
    assert_eq!(outcome, OpenOutcome::Opened);
    assert_eq!(drive.path_names().await, vec!["A"]);
    assert_eq!(drive.folder_names().await, vec!["B"]);
}

#[tokio::test]
async fn test_forward_navigation_appends() {
    let drive = TestDrive::signed_in().await;
    drive.mkdir_chain(&["A", "B"]).await;
    let d = drive.mkdir("D").await;

    drive.enter(&d).await;
    assert_eq!(drive.path_names().await, vec!["A", "B", "D"]);

    drive.services.navigation.go_up().await.expect("up");
    assert_eq!(drive.path_names().await, vec!["A", "B"]);
    drive.services.navigation.go_home().await.expect("home");
    assert!(drive.path_names().await.is_empty());
    assert_eq!(drive.folder_names().await, vec!["A"]);
}

#[tokio::test]
async fn test_long_path_breadcrumb_collapses() {
    let drive = TestDrive::signed_in().await;
    drive.mkdir_chain(&["A", "B", "C", "D"]).await;

    let state = drive.services.state().read().await;
    let collapse_after = drive.services.limits().breadcrumb_collapse_after;
    let crumb = Breadcrumb::from_state(&state.navigation, collapse_after, false);
    assert_eq!(crumb.to_string(), "Home / A / … / D");
    let crumb = Breadcrumb::from_state(&state.navigation, collapse_after, true);
    assert_eq!(crumb.to_string(), "Home / A / B / C / D");
}

#[tokio::test]
async fn test_locked_folder_requires_passphrase() {
    let drive = TestDrive::signed_in().await;
    let vault = drive.mkdir("Vault").await;
    let vault = drive
        .services
        .folders
        .lock(&vault.id, "open-sesame", "open-sesame")
        .await
        .expect("lock");

    let outcome = drive
        .services
        .navigation
        .open(Some(vault.clone()))
        .await
        .expect("open");
    assert_eq!(outcome, OpenOutcome::PassphraseRequired(vault.clone()));
    assert!(drive.path_names().await.is_empty());

    let err = drive
        .services
        .navigation
        .submit_passphrase("wrong")
        .await
        .expect_err("wrong passphrase");
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(drive.path_names().await.is_empty());
    {
        let state = drive.services.state().read().await;
        assert_eq!(state.gate.pending().map(|f| &f.id), Some(&vault.id));
    }

    let outcome = drive
        .services
        .navigation
        .submit_passphrase("open-sesame")
        .await
        .expect("verify");
    assert_eq!(outcome, OpenOutcome::Opened);
    assert_eq!(drive.path_names().await, vec!["Vault"]);
    let state = drive.services.state().read().await;
    assert_eq!(state.gate.state(), &GateState::UnlockedThisSession(vault.id.clone()));
}

#[tokio::test]
async fn test_cancelled_prompt_stays_put() {
    let drive = TestDrive::signed_in().await;
    let vault = drive.mkdir("Vault").await;
    let vault = drive
        .services
        .folders
        .lock(&vault.id, "open-sesame", "open-sesame")
        .await
        .expect("lock");

    drive
        .services
        .navigation
        .open(Some(vault))
        .await
        .expect("open");
    drive.services.navigation.cancel().await;

    let err = drive
        .services
        .navigation
        .submit_passphrase("open-sesame")
        .await
        .expect_err("nothing pending");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(drive.path_names().await.is_empty());
}

#[tokio::test]
async fn test_jump_back_to_unlocked_folder_skips_prompt() {
    let drive = TestDrive::signed_in().await;
    let vault = drive.mkdir("Vault").await;
    let vault = drive
        .services
        .folders
        .lock(&vault.id, "open-sesame", "open-sesame")
        .await
        .expect("lock");
    drive
        .services
        .navigation
        .open(Some(vault.clone()))
        .await
        .expect("open");
    drive
        .services
        .navigation
        .submit_passphrase("open-sesame")
        .await
        .expect("verify");
    let inner = drive.mkdir("Inner").await;
    drive.enter(&inner).await;

    let outcome = drive
        .services
        .navigation
        .jump_to(&vault.id)
        .await
        .expect("jump");
    assert_eq!(outcome, OpenOutcome::Opened);
    assert_eq!(drive.path_names().await, vec!["Vault"]);
}

#[tokio::test]
async fn test_unlock_ends_when_leaving_folder() {
    let drive = TestDrive::signed_in().await;
    let vault = drive.mkdir("Vault").await;
    let plain = drive.mkdir("Plain").await;
    let vault = drive
        .services
        .folders
        .lock(&vault.id, "open-sesame", "open-sesame")
        .await
        .expect("lock");
    drive
        .services
        .navigation
        .open(Some(vault.clone()))
        .await
        .expect("open");
    drive
        .services
        .navigation
        .submit_passphrase("open-sesame")
        .await
        .expect("verify");
    let inner = drive.mkdir("Inner").await;
    drive.enter(&inner).await;
    {
        let state = drive.services.state().read().await;
        assert_eq!(state.gate.state(), &GateState::UnlockedThisSession(vault.id.clone()));
    }

    drive.services.navigation.go_home().await.expect("home");
    drive.enter(&plain).await;
    let state = drive.services.state().read().await;
    assert_eq!(state.gate.state(), &GateState::Unlocked);
}

#[tokio::test(start_paused = true)]
async fn test_late_listing_for_previous_folder_is_dropped() {
    let drive = TestDrive::signed_in().await;
    let x = drive.mkdir("X").await;
    let y = drive.mkdir("Y").await;
    drive.enter(&x).await;
    drive.mkdir("x-child").await;
    drive.services.navigation.go_home().await.expect("home");
    drive.enter(&y).await;
    drive.mkdir("y-child").await;
    drive.services.navigation.go_home().await.expect("home");

    drive.gateway.delay_listing(&x.id, Duration::from_millis(200));
    drive.gateway.delay_listing(&y.id, Duration::from_millis(10));

    let nav = &drive.services.navigation;
    let (to_x, to_y) = tokio::join!(nav.open(Some(x.clone())), nav.open(Some(y.clone())));

    assert_eq!(to_x.expect("x"), OpenOutcome::Stale);
    assert_eq!(to_y.expect("y"), OpenOutcome::Opened);
    let state = drive.services.state().read().await;
    assert_eq!(state.navigation.current_id(), Some(&y.id));
    assert!(!state.ui.loading);
    drop(state);
    assert_eq!(drive.folder_names().await, vec!["y-child"]);
}

#[tokio::test]
async fn test_failed_listing_leaves_state_unchanged() {
    let drive = TestDrive::signed_in().await;
    let chain = drive.mkdir_chain(&["A"]).await;
    let b = drive.mkdir("B").await;
    drive.mkdir("C").await;

    drive.gateway.fail_listings(true);
    let err = drive
        .services
        .navigation
        .open(Some(b))
        .await
        .expect_err("listing fails");
    assert_eq!(err.kind, ErrorKind::Network);

    assert_eq!(drive.path_names().await, vec!["A"]);
    let mut names = drive.folder_names().await;
    names.sort();
    assert_eq!(names, vec!["B", "C"]);
    let state = drive.services.state().read().await;
    assert_eq!(state.navigation.current_id(), Some(&chain[0].id));
    assert!(!state.ui.loading);
}

#[tokio::test(start_paused = true)]
async fn test_failed_navigation_keeps_pending_listing_of_restored_folder() {
    let drive = TestDrive::signed_in().await;
    let x = drive.mkdir("X").await;
    drive.enter(&x).await;
    let y = drive.mkdir("Y").await;
    drive.mkdir("x-child").await;
    drive.services.navigation.go_home().await.expect("home");

    drive.gateway.delay_listing(&x.id, Duration::from_millis(200));
    drive.gateway.delay_listing(&y.id, Duration::from_millis(10));
    drive.gateway.fail_listings(true);

    let nav = &drive.services.navigation;
    let gateway = drive.gateway.clone();
    let (to_x, to_y, ()) = tokio::join!(
        nav.open(Some(x.clone())),
        nav.open(Some(y.clone())),
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            gateway.fail_listings(false);
        }
    );

    assert_eq!(to_x.expect("x"), OpenOutcome::Opened);
    assert_eq!(to_y.expect_err("y fails").kind, ErrorKind::Network);
    assert_eq!(drive.path_names().await, vec!["X"]);
    let state = drive.services.state().read().await;
    assert_eq!(state.navigation.current_id(), Some(&x.id));
    assert!(!state.ui.loading);
    drop(state);
    let mut names = drive.folder_names().await;
    names.sort();
    assert_eq!(names, vec!["Y", "x-child"]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_navigation_reloads_restored_folder() {
    let drive = TestDrive::signed_in().await;
    let x = drive.mkdir("X").await;
    drive.enter(&x).await;
    let y = drive.mkdir("Y").await;
    drive.mkdir("x-child").await;
    drive.services.navigation.go_home().await.expect("home");

    drive.gateway.delay_listing(&x.id, Duration::from_millis(10));
    drive.gateway.delay_listing(&y.id, Duration::from_millis(20));
    drive.gateway.fail_listings(true);

    let nav = &drive.services.navigation;
    let gateway = drive.gateway.clone();
    let (to_x, to_y, ()) = tokio::join!(
        nav.open(Some(x.clone())),
        nav.open(Some(y.clone())),
        async move {
            tokio::time::sleep(Duration::from_millis(25)).await;
            gateway.fail_listings(false);
        }
    );

    // X's own listing failed while Y was current; Y then failed as well
    // and the rollback to X fetched X again.
    assert_eq!(to_x.expect_err("x fails").kind, ErrorKind::Network);
    assert_eq!(to_y.expect_err("y fails").kind, ErrorKind::Network);
    let state = drive.services.state().read().await;
    assert_eq!(state.navigation.current_id(), Some(&x.id));
    assert!(!state.ui.loading);
    drop(state);
    let mut names = drive.folder_names().await;
    names.sort();
    assert_eq!(names, vec!["Y", "x-child"]);
}

#[tokio::test]
async fn test_renaming_folder_on_path_updates_breadcrumb() {
    let drive = TestDrive::signed_in().await;
    let chain = drive.mkdir_chain(&["Drafts", "2024"]).await;

    drive
        .services
        .folders
        .rename(&chain[0].id, "Archive")
        .await
        .expect("rename");
    assert_eq!(drive.path_names().await, vec!["Archive", "2024"]);
}
