//! Integration tests for client-declared volumes.

mod helpers;

use std::sync::Arc;

use nimbus_core::config::LocalConfig;
use nimbus_core::error::ErrorKind;
use nimbus_entity::{NewVolume, VolumeColor};
use nimbus_state::persist;

use helpers::{ControlledGateway, TestDrive};

fn form(name: &str, size_gb: u64) -> NewVolume {
    NewVolume {
        name: name.to_string(),
        size_gb,
        color: VolumeColor::Teal,
    }
}

#[tokio::test]
async fn test_create_volume_within_free_space() {
    let drive = TestDrive::signed_in().await;

    let volume = drive
        .services
        .volumes
        .create(form("Photos", 5))
        .await
        .expect("create");
    assert_eq!(volume.total, 5 * 1024 * 1024 * 1024);
    assert_eq!(volume.used, 0);

    let listed = drive.services.volumes.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Photos");
}

#[tokio::test]
async fn test_volume_larger_than_free_space_is_rejected() {
    let drive = TestDrive::signed_in().await;

    let err = drive
        .services
        .volumes
        .create(form("Huge", 16))
        .await
        .expect_err("too large");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Maximum available storage is 15 GB");
    assert!(drive.services.volumes.list().await.is_empty());
}

#[tokio::test]
async fn test_blank_name_is_reported_before_usage_lookup() {
    let drive = TestDrive::signed_in().await;
    drive.gateway.fail_usage(true);

    let err = drive
        .services
        .volumes
        .create(form("  ", 1))
        .await
        .expect_err("blank");
    assert_eq!(err.message, "Please enter a volume name");
}

#[tokio::test]
async fn test_unreachable_server_falls_back_to_default_quota() {
    let drive = TestDrive::signed_in().await;
    drive.upload_text("tiny.txt", "1").await;
    drive.gateway.fail_usage(true);

    let err = drive
        .services
        .volumes
        .create(form("All", 15))
        .await
        .expect_err("one byte short");
    assert_eq!(err.message, "Maximum available storage is 14 GB");

    drive
        .services
        .volumes
        .create(form("Most", 14))
        .await
        .expect("fits");
}

#[tokio::test]
async fn test_rename_remove_and_current_volume() {
    let drive = TestDrive::signed_in().await;
    let volume = drive
        .services
        .volumes
        .create(form("Work", 2))
        .await
        .expect("create");

    drive.services.volumes.open(&volume.id).await.expect("open");
    let renamed = drive
        .services
        .volumes
        .rename(&volume.id, "  Office ")
        .await
        .expect("rename");
    assert_eq!(renamed.name, "Office");

    let removed = drive.services.volumes.remove(&volume.id).await.expect("remove");
    assert_eq!(removed.map(|v| v.name), Some("Office".to_string()));
    let state = drive.services.state().read().await;
    assert!(state.ui.current_volume.is_none());
    drop(state);

    assert!(
        drive
            .services
            .volumes
            .remove(&volume.id)
            .await
            .expect("second remove")
            .is_none()
    );
    let err = drive
        .services
        .volumes
        .rename(&volume.id, "Gone")
        .await
        .expect_err("missing");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_volumes_survive_restart_from_state_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let local = LocalConfig {
        state_file: dir.path().join("state.json").to_string_lossy().into_owned(),
    };

    let first = TestDrive::new().await;
    let drive = TestDrive::with_parts(first.gateway.clone(), persist::open(&local).expect("open"))
        .await
        .ready()
        .await;
    drive
        .services
        .volumes
        .create(form("Archive", 3))
        .await
        .expect("create");
    drive
        .services
        .volumes
        .create(form("Music", 1))
        .await
        .expect("create");

    let gateway: Arc<ControlledGateway> = drive.gateway.clone();
    let reopened = TestDrive::with_parts(gateway, persist::open(&local).expect("reopen")).await;
    let names: Vec<String> = reopened
        .services
        .volumes
        .list()
        .await
        .into_iter()
        .map(|v| v.name)
        .collect();
    assert_eq!(names, vec!["Music", "Archive"]);
}
