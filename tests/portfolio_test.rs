mod common;

use std::sync::atomic::Ordering;

use uuid::Uuid;

use common::Harness;
use pintarlokal_backend::errors::AppError;
use pintarlokal_backend::services::media::{self, PortfolioDeletion, UploadedFile};

const MIB: usize = 1024 * 1024;

#[tokio::test]
async fn oversized_image_is_rejected_before_any_call() {
    let h = Harness::new();
    let owner = Uuid::new_v4();

    let err = media::upload_portfolio_image(
        &h.state,
        owner,
        UploadedFile::new("kamar.jpg", vec![0u8; 3 * MIB]),
    )
    .await
    .unwrap_err();

    match err {
        AppError::FileTooLarge { size, limit } => {
            assert_eq!(size, 3 * MIB);
            assert_eq!(limit, 2 * MIB);
        }
        other => panic!("expected FileTooLarge, got {other:?}"),
    }
    assert!(h.events().is_empty());
    assert_eq!(h.store.portfolio_count(), 0);
}

#[tokio::test]
async fn image_at_the_limit_is_accepted() {
    let h = Harness::new();
    let item = media::upload_portfolio_image(
        &h.state,
        Uuid::new_v4(),
        UploadedFile::new("pas.png", vec![1u8; 2 * MIB]),
    )
    .await
    .unwrap();
    assert!(item.image_url.ends_with(".png"));
}

#[tokio::test]
async fn upload_then_url_then_record() {
    let h = Harness::new();
    let owner = Uuid::new_v4();

    let item = media::upload_portfolio_image(
        &h.state,
        owner,
        UploadedFile::new("Hasil Kerja.JPG", vec![7u8; 1024]),
    )
    .await
    .unwrap();

    let events = h.events();
    assert_eq!(events.len(), 3);
    assert!(events[0].starts_with(&format!("media:upload:portfolio-images/{owner}/")));
    assert!(events[0].ends_with(".jpg"));
    assert!(events[1].starts_with("media:public_url:portfolio-images/"));
    assert!(events[2].starts_with("db:insert_portfolio:https://"));

    assert_eq!(item.user_id, owner);
    assert!(
        item.image_url
            .contains(&format!("/object/public/portfolio-images/{owner}/"))
    );
}

#[tokio::test]
async fn failed_record_insert_leaves_object_behind() {
    let h = Harness::new();
    h.store.fail_portfolio_insert.store(true, Ordering::SeqCst);

    let err = media::upload_portfolio_image(
        &h.state,
        Uuid::new_v4(),
        UploadedFile::new("a.webp", vec![1u8; 10]),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Store(_)));
    assert!(h.events()[0].starts_with("media:upload:"));
    assert_eq!(h.store.portfolio_count(), 0);
    assert!(h.events().iter().all(|e| !e.starts_with("media:remove")));
}

#[tokio::test]
async fn failed_upload_writes_no_record() {
    let h = Harness::new();
    h.media.fail_upload.store(true, Ordering::SeqCst);

    let err = media::upload_portfolio_image(
        &h.state,
        Uuid::new_v4(),
        UploadedFile::new("a.jpg", vec![1u8; 10]),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Storage(_)));
    assert_eq!(h.events().len(), 1);
}

#[tokio::test]
async fn files_without_extension_are_rejected() {
    let h = Harness::new();
    let err = media::upload_portfolio_image(&h.state, Uuid::new_v4(), UploadedFile::new("foto", vec![1]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(h.events().is_empty());
}

#[tokio::test]
async fn delete_removes_record_then_object() {
    let h = Harness::new();
    let owner = Uuid::new_v4();
    let item = h.store.add_portfolio(
        owner,
        &format!("https://demo.supabase.co/storage/v1/object/public/portfolio-images/{owner}/1.jpg"),
    );

    let outcome = media::delete_portfolio_item(&h.state, owner, item.id).await.unwrap();
    assert_eq!(outcome, PortfolioDeletion::Complete);
    assert_eq!(
        h.events(),
        vec![
            format!("db:delete_portfolio:{}", item.id),
            format!("media:remove:portfolio-images/{owner}/1.jpg"),
        ]
    );
}

#[tokio::test]
async fn storage_failure_on_delete_is_a_partial_success() {
    let h = Harness::new();
    let owner = Uuid::new_v4();
    let item = h.store.add_portfolio(
        owner,
        &format!("https://demo.supabase.co/storage/v1/object/public/portfolio-images/{owner}/2.png"),
    );
    h.media.fail_remove.store(true, Ordering::SeqCst);

    let outcome = media::delete_portfolio_item(&h.state, owner, item.id).await.unwrap();
    assert!(matches!(outcome, PortfolioDeletion::StorageCleanupFailed { .. }));
    assert_eq!(h.store.portfolio_count(), 0);
}

#[tokio::test]
async fn only_the_owner_may_delete_an_item() {
    let h = Harness::new();
    let owner = Uuid::new_v4();
    let item = h.store.add_portfolio(owner, "https://x/a/b.jpg");

    let err = media::delete_portfolio_item(&h.state, Uuid::new_v4(), item.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(h.store.portfolio_count(), 1);
    assert!(h.events().is_empty());
}

#[tokio::test]
async fn avatar_key_and_bucket() {
    let h = Harness::new();
    let owner = Uuid::new_v4();
    let url = media::upload_avatar(&h.state, owner, UploadedFile::new("me.PNG", vec![1, 2, 3]))
        .await
        .unwrap();

    assert!(url.contains(&format!("/object/public/avatars/avatar-{owner}-")));
    assert!(url.ends_with(".png"));
    assert!(h.events().iter().all(|e| !e.starts_with("db:")));
}

#[tokio::test]
async fn oversized_avatar_is_rejected_before_upload() {
    let h = Harness::new();
    let err = media::upload_avatar(
        &h.state,
        Uuid::new_v4(),
        UploadedFile::new("me.jpg", vec![0u8; 2 * MIB + 1]),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::FileTooLarge { limit, .. } if limit == 2 * MIB));
    assert!(h.events().is_empty());
}
