#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for posts, soft delete and the post/tag pivot

mod common;

use blog::domain::error::DomainError;
use blog::{NewTag, PostPatch, SyncChanges, Trashed};
use common::{create_post, create_user, ids, new_post, start};

#[tokio::test]
async fn test_post_slug_defaults_to_title() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Ada").await;

    let post = create_post(service, user.id, "Hello, Relations World").await;
    assert_eq!(post.slug, "hello-relations-world");
    assert!(post.deleted_at.is_none());

    let mut explicit = new_post(user.id, "Second");
    explicit.slug = Some("custom-slug".to_owned());
    let post = service.create_post(explicit).await.unwrap();
    assert_eq!(post.slug, "custom-slug");
}

#[tokio::test]
async fn test_post_for_unknown_user_is_rejected() {
    let blog = start().await;
    let service = blog.service();

    let err = service.create_post(new_post(42, "Orphan")).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "User", id: 42 }));

    let mut negative = new_post(42, "Negative");
    negative.min_to_read = -1;
    let err = service.create_post(negative).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn test_soft_delete_and_restore() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Bea").await;
    let live = create_post(service, user.id, "Live").await;
    let doomed = create_post(service, user.id, "Doomed").await;

    service.delete_post(doomed.id).await.unwrap();

    let visible = service.list_posts(Trashed::Exclude).await.unwrap();
    assert_eq!(ids(&visible, |p| p.id), vec![live.id]);
    let trashed = service.list_posts(Trashed::Only).await.unwrap();
    assert_eq!(ids(&trashed, |p| p.id), vec![doomed.id]);
    assert!(trashed[0].is_trashed());
    assert_eq!(service.list_posts(Trashed::Include).await.unwrap().len(), 2);

    assert!(matches!(
        service.get_post(doomed.id, Trashed::Exclude).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    // Deleting twice is a miss, not a second timestamp.
    assert!(service.delete_post(doomed.id).await.is_err());

    let err = service
        .update_post(
            doomed.id,
            PostPatch {
                title: Some("Edited".to_owned()),
                ..PostPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let restored = service.restore_post(doomed.id).await.unwrap();
    assert!(restored.deleted_at.is_none());
    assert_eq!(service.list_posts(Trashed::Exclude).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_post_fields() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Cleo").await;
    let post = create_post(service, user.id, "Draft").await;

    let updated = service
        .update_post(
            post.id,
            PostPatch {
                title: Some("Final".to_owned()),
                is_published: Some(false),
                min_to_read: Some(7),
                ..PostPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert!(!updated.is_published);
    assert_eq!(updated.min_to_read, 7);
    assert_eq!(updated.excerpt, post.excerpt);
}

#[tokio::test]
async fn test_attach_is_idempotent() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Dan").await;
    let post = create_post(service, user.id, "Tagged").await;
    let rust = service
        .create_tag(NewTag {
            name: "Rust".to_owned(),
            slug: None,
        })
        .await
        .unwrap();
    let sql = service
        .create_tag(NewTag {
            name: "SQL".to_owned(),
            slug: None,
        })
        .await
        .unwrap();

    assert_eq!(service.attach_tags(post.id, &[rust.id, rust.id]).await.unwrap(), 1);
    assert_eq!(service.attach_tags(post.id, &[rust.id, sql.id]).await.unwrap(), 1);

    let tags = service.post_tags(post.id).await.unwrap();
    assert_eq!(ids(&tags, |t| t.id), vec![rust.id, sql.id]);
    let posts = service.tag_posts(rust.id, Trashed::Exclude).await.unwrap();
    assert_eq!(ids(&posts, |p| p.id), vec![post.id]);

    assert_eq!(service.detach_tags(post.id, &[sql.id]).await.unwrap(), 1);
    assert_eq!(service.detach_all_tags(post.id).await.unwrap(), 1);
    assert!(service.post_tags(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_reports_changes() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Eve").await;
    let post = create_post(service, user.id, "Synced").await;
    let mut tag_ids = Vec::new();
    for name in ["a", "b", "c"] {
        let tag = service
            .create_tag(NewTag {
                name: name.to_owned(),
                slug: None,
            })
            .await
            .unwrap();
        tag_ids.push(tag.id);
    }
    let (a, b, c) = (tag_ids[0], tag_ids[1], tag_ids[2]);

    service.attach_tags(post.id, &[a, b]).await.unwrap();
    let changes = service.sync_tags(post.id, &[b, c, c]).await.unwrap();
    assert_eq!(
        changes,
        SyncChanges {
            attached: vec![c],
            detached: vec![a],
        }
    );
    assert_eq!(
        ids(&service.post_tags(post.id).await.unwrap(), |t| t.id),
        vec![b, c]
    );

    let unchanged = service.sync_tags(post.id, &[c, b]).await.unwrap();
    assert_eq!(unchanged, SyncChanges::default());

    assert!(service.sync_tags(9999, &[a]).await.is_err());
}

#[tokio::test]
async fn test_deletes_cascade_to_pivot_only() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Finn").await;
    let kept = create_post(service, user.id, "Kept").await;
    let removed = create_post(service, user.id, "Removed").await;
    let keep_tag = service
        .create_tag(NewTag {
            name: "keep".to_owned(),
            slug: None,
        })
        .await
        .unwrap();
    let drop_tag = service
        .create_tag(NewTag {
            name: "drop".to_owned(),
            slug: None,
        })
        .await
        .unwrap();
    service
        .attach_tags(kept.id, &[keep_tag.id, drop_tag.id])
        .await
        .unwrap();
    service
        .attach_tags(removed.id, &[keep_tag.id])
        .await
        .unwrap();

    service.delete_tag(drop_tag.id).await.unwrap();
    assert_eq!(
        ids(&service.post_tags(kept.id).await.unwrap(), |t| t.id),
        vec![keep_tag.id]
    );
    assert!(service.get_post(kept.id, Trashed::Exclude).await.is_ok());

    service.force_delete_post(removed.id).await.unwrap();
    assert!(service.get_post(removed.id, Trashed::Include).await.is_err());
    assert_eq!(
        ids(&service.tag_posts(keep_tag.id, Trashed::Include).await.unwrap(), |p| p.id),
        vec![kept.id]
    );
    assert!(service.get_tag(keep_tag.id).await.is_ok());
}

#[tokio::test]
async fn test_tag_slug_conflict() {
    let blog = start().await;
    let service = blog.service();
    let tag = service
        .create_tag(NewTag {
            name: "Web Dev".to_owned(),
            slug: None,
        })
        .await
        .unwrap();
    assert_eq!(tag.slug, "web-dev");
    assert_eq!(
        service.find_tag_by_slug("web-dev").await.unwrap(),
        Some(tag)
    );

    let err = service
        .create_tag(NewTag {
            name: "web dev".to_owned(),
            slug: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}
