//! Integration tests for file and folder operations.

mod helpers;

use bytes::Bytes;

use nimbus_core::error::ErrorKind;
use nimbus_entity::{FileCategory, PreviewKind};

use helpers::TestDrive;

#[tokio::test]
async fn test_upload_lands_in_current_folder() {
    let drive = TestDrive::signed_in().await;
    let chain = drive.mkdir_chain(&["Docs"]).await;

    let file = drive.upload_text("notes.txt", "hello").await;
    assert_eq!(file.folder_id.as_ref(), Some(&chain[0].id));
    assert_eq!(file.size, 5);
    assert_eq!(drive.file_names().await, vec!["notes.txt"]);

    drive.services.navigation.go_home().await.expect("home");
    assert!(drive.file_names().await.is_empty());
    let state = drive.services.state().read().await;
    assert!(!state.ui.uploading);
}

#[tokio::test]
async fn test_upload_over_size_limit_is_rejected() {
    let drive = TestDrive::signed_in().await;
    let max = drive.services.limits().max_upload_bytes as usize;

    let err = drive
        .services
        .uploads
        .upload("huge.bin", "application/octet-stream", Bytes::from(vec![0u8; max + 1]))
        .await
        .expect_err("too large");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "File is too large (maximum 100 MB)");
    assert!(drive.file_names().await.is_empty());
}

#[tokio::test]
async fn test_quota_is_checked_and_not_freed_by_delete() {
    let drive = TestDrive::with_quota(100).await.ready().await;
    let first = drive.upload_text("a.txt", &"x".repeat(60)).await;

    let err = drive
        .services
        .uploads
        .upload("b.txt", "text/plain", Bytes::from("y".repeat(60)))
        .await
        .expect_err("quota");
    assert_eq!(err.message, "Not enough storage space for this file");

    drive.services.files.delete(&first.id).await.expect("delete");
    assert!(drive.file_names().await.is_empty());
    let usage = drive.services.storage.usage().await.expect("usage");
    assert_eq!(usage.used, 60);
    assert_eq!(usage.available(), 40);
}

#[tokio::test]
async fn test_breakdown_covers_current_listing() {
    let drive = TestDrive::signed_in().await;
    drive.upload_text("root.txt", "at the root").await;
    drive.mkdir_chain(&["Media"]).await;
    drive
        .services
        .uploads
        .upload("cover.png", "image/png", Bytes::from(vec![0u8; 64]))
        .await
        .expect("upload image");
    drive.upload_text("caption.txt", "cap").await;

    let breakdown = drive.services.storage.breakdown().await;
    assert_eq!(breakdown.total, 67);
    assert_eq!(breakdown.bytes(FileCategory::Images), 64);
    assert_eq!(breakdown.bytes(FileCategory::Documents), 3);
    assert_eq!(breakdown.categories.len(), 2);
}

#[tokio::test]
async fn test_rename_and_star_file_update_listing() {
    let drive = TestDrive::signed_in().await;
    let file = drive.upload_text("draft.md", "# Draft").await;

    let renamed = drive
        .services
        .files
        .rename(&file.id, "final.md")
        .await
        .expect("rename");
    assert_eq!(renamed.name, "final.md");
    assert_eq!(drive.file_names().await, vec!["final.md"]);

    let starred = drive.services.files.toggle_star(&file.id).await.expect("star");
    assert!(starred.starred);
    let listed = drive.services.search.starred().await.expect("starred");
    assert_eq!(listed.len(), 1);

    let unstarred = drive.services.files.toggle_star(&file.id).await.expect("unstar");
    assert!(!unstarred.starred);
    assert!(drive.services.search.starred().await.expect("starred").is_empty());
}

#[tokio::test]
async fn test_duplicate_folder_name_conflicts() {
    let drive = TestDrive::signed_in().await;
    drive.mkdir("Photos").await;

    let err = drive
        .services
        .folders
        .create("Photos")
        .await
        .expect_err("duplicate");
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "Folder with this name already exists");

    let err = drive.services.folders.create("   ").await.expect_err("blank");
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_folder_trashes_contents() {
    let drive = TestDrive::signed_in().await;
    let chain = drive.mkdir_chain(&["Old"]).await;
    drive.upload_text("inside.txt", "bye").await;
    drive.services.navigation.go_home().await.expect("home");

    drive
        .services
        .folders
        .delete(&chain[0].id)
        .await
        .expect("delete");
    assert!(drive.folder_names().await.is_empty());
    let found = drive.services.search.search("inside", 0).await.expect("search");
    assert_eq!(found.total_elements, 0);
}

#[tokio::test]
async fn test_deleting_folder_on_path_leaves_it() {
    let drive = TestDrive::signed_in().await;
    let chain = drive.mkdir_chain(&["Projects", "Old", "Drafts"]).await;
    drive.upload_text("draft.txt", "wip").await;

    drive
        .services
        .folders
        .delete(&chain[1].id)
        .await
        .expect("delete");
    assert_eq!(drive.path_names().await, vec!["Projects"]);
    assert!(drive.folder_names().await.is_empty());
    assert!(drive.file_names().await.is_empty());

    drive
        .services
        .folders
        .delete(&chain[0].id)
        .await
        .expect("delete top");
    assert!(drive.path_names().await.is_empty());
    let state = drive.services.state().read().await;
    assert!(state.navigation.is_root());
}

#[tokio::test]
async fn test_lock_password_rules() {
    let drive = TestDrive::signed_in().await;
    let folder = drive.mkdir("Private").await;

    let err = drive
        .services
        .folders
        .lock(&folder.id, "abc", "abc")
        .await
        .expect_err("short");
    assert_eq!(err.message, "Password must be at least 4 characters");

    let err = drive
        .services
        .folders
        .lock(&folder.id, "abcd", "abce")
        .await
        .expect_err("mismatch");
    assert_eq!(err.message, "Passwords do not match");

    let locked = drive
        .services
        .folders
        .lock(&folder.id, "abcd", "abcd")
        .await
        .expect("lock");
    assert!(locked.locked);
    let err = drive
        .services
        .folders
        .lock(&folder.id, "abcd", "abcd")
        .await
        .expect_err("already locked");
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = drive
        .services
        .folders
        .unlock(&folder.id, "nope")
        .await
        .expect_err("wrong password");
    assert_eq!(err.kind, ErrorKind::Authentication);
    let unlocked = drive
        .services
        .folders
        .unlock(&folder.id, "abcd")
        .await
        .expect("unlock");
    assert!(!unlocked.locked);
    let state = drive.services.state().read().await;
    assert!(state.folders.get(&folder.id).is_some_and(|f| !f.locked));
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_blank_is_empty() {
    let drive = TestDrive::signed_in().await;
    drive.upload_text("Report-Q1.pdf", "pdf").await;
    drive.upload_text("report-q2.pdf", "pdf").await;
    drive.upload_text("summary.txt", "txt").await;

    let page = drive.services.search.search("REPORT", 0).await.expect("search");
    assert_eq!(page.total_elements, 2);

    let page = drive.services.search.search("   ", 0).await.expect("blank");
    assert!(page.content.is_empty());
    let state = drive.services.state().read().await;
    assert_eq!(state.ui.search_query, "");
}

#[tokio::test]
async fn test_recent_lists_newest_first() {
    let drive = TestDrive::signed_in().await;
    drive.upload_text("first.txt", "1").await;
    let second = drive.upload_text("second.txt", "2").await;
    drive
        .services
        .files
        .rename(&second.id, "second-renamed.txt")
        .await
        .expect("rename");

    let recent = drive.services.search.recent().await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].name, "second-renamed.txt");
}

#[tokio::test]
async fn test_preview_text_and_close_on_delete() {
    let drive = TestDrive::signed_in().await;
    let file = drive.upload_text("readme.txt", "read me").await;

    let preview = drive.services.preview.open(&file.id).await.expect("preview");
    assert_eq!(preview.kind, PreviewKind::Text);
    assert_eq!(preview.content.as_deref(), Some(&b"read me"[..]));
    {
        let state = drive.services.state().read().await;
        assert_eq!(state.ui.preview.as_ref().map(|f| &f.id), Some(&file.id));
    }

    drive.services.files.delete(&file.id).await.expect("delete");
    let state = drive.services.state().read().await;
    assert!(state.ui.preview.is_none());
}

#[tokio::test]
async fn test_download_returns_uploaded_bytes() {
    let drive = TestDrive::signed_in().await;
    let file = drive.upload_text("data.csv", "a,b\n1,2\n").await;

    let bytes = drive.services.files.download(&file.id).await.expect("download");
    assert_eq!(&bytes[..], b"a,b\n1,2\n");
}
