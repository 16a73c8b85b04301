#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for polymorphic images, comments and tag assignments

mod common;

use blog::domain::error::DomainError;
use blog::{
    Commentable, CommentableEntity, ImageOwner, ImageOwnerEntity, MorphType, NewComment,
    NewImage, NewTag, NewVideo, TaggableRef, Trashed,
};
use common::{create_post, create_user, ids, start};

fn image(url: &str, owner: ImageOwner) -> NewImage {
    NewImage {
        url: url.to_owned(),
        owner,
    }
}

#[tokio::test]
async fn test_images_are_filtered_by_owner_kind_and_id() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Ada").await;
    let post = create_post(service, user.id, "Pictures").await;
    // The user and the post share id 1, so only the kind tells them apart.
    assert_eq!(user.id, post.id);

    let avatar = service
        .add_image(image("https://img/avatar.png", ImageOwner::User(user.id)))
        .await
        .unwrap();
    let cover = service
        .add_image(image("https://img/cover.png", ImageOwner::Post(post.id)))
        .await
        .unwrap();
    let inline = service
        .add_image(image("https://img/inline.png", ImageOwner::Post(post.id)))
        .await
        .unwrap();

    let user_images = service.images_of(ImageOwner::User(user.id)).await.unwrap();
    assert_eq!(ids(&user_images, |i| i.id), vec![avatar.id]);
    let post_images = service.images_of(ImageOwner::Post(post.id)).await.unwrap();
    assert_eq!(ids(&post_images, |i| i.id), vec![cover.id, inline.id]);

    assert_eq!(
        service.image_of(ImageOwner::Post(post.id)).await.unwrap(),
        Some(cover)
    );
    assert_eq!(
        service.image_owner(avatar.id).await.unwrap(),
        Some(ImageOwner::User(user.id))
    );
    match service.resolve_image_owner(inline.id).await.unwrap() {
        Some(ImageOwnerEntity::Post(p)) => assert_eq!(p.id, post.id),
        other => panic!("unexpected owner: {other:?}"),
    }
}

#[tokio::test]
async fn test_children_require_existing_owner() {
    let blog = start().await;
    let service = blog.service();

    let err = service
        .add_image(image("https://img/x.png", ImageOwner::User(77)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::OwnerNotFound {
            kind: MorphType::User,
            id: 77
        }
    ));

    let err = service
        .add_comment(NewComment {
            body: "hello?".to_owned(),
            commentable: Commentable::Video(3),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OwnerNotFound { .. }));
}

#[tokio::test]
async fn test_comments_on_posts_and_videos() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Bo").await;
    let post = create_post(service, user.id, "Discuss").await;
    let video = service
        .create_video(NewVideo {
            title: "Talk".to_owned(),
            url: "https://video/talk".to_owned(),
            description: "A conference talk".to_owned(),
        })
        .await
        .unwrap();

    let on_post = service
        .add_comment(NewComment {
            body: "Nice post".to_owned(),
            commentable: Commentable::Post(post.id),
        })
        .await
        .unwrap();
    let on_video = service
        .add_comment(NewComment {
            body: "Nice talk".to_owned(),
            commentable: Commentable::Video(video.id),
        })
        .await
        .unwrap();

    let post_comments = service.comments_on(Commentable::Post(post.id)).await.unwrap();
    assert_eq!(ids(&post_comments, |c| c.id), vec![on_post.id]);
    let video_comments = service.comments_on(Commentable::Video(video.id)).await.unwrap();
    assert_eq!(ids(&video_comments, |c| c.id), vec![on_video.id]);

    match service.resolve_commentable(on_video.id).await.unwrap() {
        Some(CommentableEntity::Video(v)) => assert_eq!(v.id, video.id),
        other => panic!("unexpected commentable: {other:?}"),
    }

    service.delete_video(video.id).await.unwrap();
    assert!(matches!(
        service.get_comment(on_video.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(service.get_comment(on_post.id).await.is_ok());
    assert_eq!(
        service.comments_on(Commentable::Post(post.id)).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_polymorphic_tags_on_posts_and_videos() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Cy").await;
    let post = create_post(service, user.id, "Tagged post").await;
    let trashed = create_post(service, user.id, "Trashed post").await;
    let video = service
        .create_video(NewVideo {
            title: "Clip".to_owned(),
            url: "https://video/clip".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap();
    let tag = service
        .create_tag(NewTag {
            name: "featured".to_owned(),
            slug: None,
        })
        .await
        .unwrap();

    assert!(service.tag(tag.id, TaggableRef::Post(post.id)).await.unwrap());
    assert!(!service.tag(tag.id, TaggableRef::Post(post.id)).await.unwrap());
    assert!(service.tag(tag.id, TaggableRef::Post(trashed.id)).await.unwrap());
    assert!(service.tag(tag.id, TaggableRef::Video(video.id)).await.unwrap());
    service.delete_post(trashed.id).await.unwrap();

    assert_eq!(
        service.taggables_of(tag.id).await.unwrap(),
        vec![
            TaggableRef::Post(post.id),
            TaggableRef::Post(trashed.id),
            TaggableRef::Video(video.id),
        ]
    );
    assert_eq!(
        ids(&service.tagged_posts(tag.id, Trashed::Exclude).await.unwrap(), |p| p.id),
        vec![post.id]
    );
    assert_eq!(
        service.tagged_posts(tag.id, Trashed::Include).await.unwrap().len(),
        2
    );
    assert_eq!(
        ids(&service.tagged_videos(tag.id).await.unwrap(), |v| v.id),
        vec![video.id]
    );
    assert_eq!(
        ids(&service.tags_for(TaggableRef::Video(video.id)).await.unwrap(), |t| t.id),
        vec![tag.id]
    );

    assert!(service.untag(tag.id, TaggableRef::Video(video.id)).await.unwrap());
    assert!(service.tagged_videos(tag.id).await.unwrap().is_empty());

    service.delete_tag(tag.id).await.unwrap();
    assert!(service.tags_for(TaggableRef::Post(post.id)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_force_delete_post_removes_polymorphic_children() {
    let blog = start().await;
    let service = blog.service();
    let user = create_user(service, "Di").await;
    let post = create_post(service, user.id, "Short lived").await;
    let tag = service
        .create_tag(NewTag {
            name: "gone".to_owned(),
            slug: None,
        })
        .await
        .unwrap();
    let picture = service
        .add_image(image("https://img/p.png", ImageOwner::Post(post.id)))
        .await
        .unwrap();
    service
        .add_comment(NewComment {
            body: "first".to_owned(),
            commentable: Commentable::Post(post.id),
        })
        .await
        .unwrap();
    service.tag(tag.id, TaggableRef::Post(post.id)).await.unwrap();

    service.force_delete_post(post.id).await.unwrap();

    assert!(service.get_image(picture.id).await.is_err());
    assert!(service
        .comments_on(Commentable::Post(post.id))
        .await
        .unwrap()
        .is_empty());
    assert!(service.taggables_of(tag.id).await.unwrap().is_empty());
}
