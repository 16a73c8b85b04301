use blog_sdk::{NewTag, Post, SyncChanges, Tag, TagPatch, TaggableRef, Trashed, Video};
use sea_orm::TransactionTrait;
use tracing::{debug, info, instrument};

use super::{BlogService, on_conflict};
use crate::domain::error::DomainError;
use crate::domain::repos::{
    PostTagRepository, PostsRepository, Repos, TaggablesRepository, TagsRepository,
};
use crate::infra::storage::db::db_err;

fn slug_taken(slug: &str) -> DomainError {
    DomainError::conflict(format!("tag slug '{slug}' already exists"))
}

impl<R: Repos> BlogService<R> {
    #[instrument(skip(self, new_tag), fields(name = %new_tag.name))]
    pub async fn create_tag(&self, new_tag: NewTag) -> Result<Tag, DomainError> {
        info!("Creating tag");
        self.validate_name("name", &new_tag.name)?;

        let name = new_tag.name.trim().to_owned();
        let slug = match new_tag.slug {
            Some(slug) => slug.trim().to_owned(),
            None => slug::slugify(&name),
        };
        if slug.is_empty() {
            return Err(DomainError::validation("slug", "must not be empty"));
        }

        let new_tag = NewTag {
            name,
            slug: Some(slug.clone()),
        };
        self.repos
            .tags()
            .create(&self.db, &new_tag)
            .await
            .map_err(|e| on_conflict(e, || slug_taken(&slug)))
    }

    pub async fn get_tag(&self, id: i64) -> Result<Tag, DomainError> {
        self.repos
            .tags()
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }

    pub async fn find_tag_by_slug(&self, slug: &str) -> Result<Option<Tag>, DomainError> {
        self.repos.tags().find_by_slug(&self.db, slug).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, DomainError> {
        self.repos.tags().list(&self.db).await
    }

    pub async fn update_tag(&self, id: i64, patch: TagPatch) -> Result<Tag, DomainError> {
        if let Some(name) = &patch.name {
            self.validate_name("name", name)?;
        }
        let slug = patch.slug.clone().unwrap_or_default();
        self.repos
            .tags()
            .update(&self.db, id, &patch)
            .await
            .map_err(|e| on_conflict(e, || slug_taken(&slug)))
    }

    /// Removes the tag and, through cascades, its pivot rows. Tagged posts
    /// and videos are untouched.
    #[instrument(skip(self))]
    pub async fn delete_tag(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting tag");
        if self.repos.tags().delete(&self.db, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Tag", id))
        }
    }

    /// Attach tags to a post through `post_tag`; pairs already present are skipped.
    #[instrument(skip(self, tag_ids))]
    pub async fn attach_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<u64, DomainError> {
        self.get_post(post_id, Trashed::Include).await?;
        let inserted = self
            .repos
            .post_tag()
            .attach(&self.db, post_id, tag_ids)
            .await?;
        debug!(inserted, "Attached tags to post");
        Ok(inserted)
    }

    pub async fn detach_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<u64, DomainError> {
        self.repos
            .post_tag()
            .detach(&self.db, post_id, tag_ids)
            .await
    }

    pub async fn detach_all_tags(&self, post_id: i64) -> Result<u64, DomainError> {
        self.repos.post_tag().detach_all(&self.db, post_id).await
    }

    /// Replace the post's tag set atomically.
    #[instrument(skip(self, tag_ids))]
    pub async fn sync_tags(
        &self,
        post_id: i64,
        tag_ids: &[i64],
    ) -> Result<SyncChanges, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if self
            .repos
            .posts()
            .get(&txn, post_id, Trashed::Include)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Post", post_id));
        }
        let changes = self.repos.post_tag().sync(&txn, post_id, tag_ids).await?;

        txn.commit().await.map_err(db_err)?;

        debug!(
            attached = changes.attached.len(),
            detached = changes.detached.len(),
            "Synced post tags"
        );
        Ok(changes)
    }

    pub async fn post_tags(&self, post_id: i64) -> Result<Vec<Tag>, DomainError> {
        self.repos.post_tag().tags_of_post(&self.db, post_id).await
    }

    pub async fn tag_posts(&self, tag_id: i64, trashed: Trashed) -> Result<Vec<Post>, DomainError> {
        self.repos
            .post_tag()
            .posts_of_tag(&self.db, tag_id, trashed)
            .await
    }

    /// Tag a post or video through `taggables`. Returns false when the
    /// assignment already existed.
    #[instrument(skip(self))]
    pub async fn tag(&self, tag_id: i64, target: TaggableRef) -> Result<bool, DomainError> {
        self.get_tag(tag_id).await?;
        self.repos
            .taggables()
            .attach(&self.db, tag_id, target)
            .await
    }

    pub async fn untag(&self, tag_id: i64, target: TaggableRef) -> Result<bool, DomainError> {
        self.repos
            .taggables()
            .detach(&self.db, tag_id, target)
            .await
    }

    pub async fn tags_for(&self, target: TaggableRef) -> Result<Vec<Tag>, DomainError> {
        self.repos.taggables().tags_for(&self.db, target).await
    }

    pub async fn taggables_of(&self, tag_id: i64) -> Result<Vec<TaggableRef>, DomainError> {
        self.repos.taggables().taggables_of(&self.db, tag_id).await
    }

    pub async fn tagged_posts(&self, tag_id: i64, trashed: Trashed) -> Result<Vec<Post>, DomainError> {
        self.repos
            .taggables()
            .posts_for_tag(&self.db, tag_id, trashed)
            .await
    }

    pub async fn tagged_videos(&self, tag_id: i64) -> Result<Vec<Video>, DomainError> {
        self.repos
            .taggables()
            .videos_for_tag(&self.db, tag_id)
            .await
    }
}
