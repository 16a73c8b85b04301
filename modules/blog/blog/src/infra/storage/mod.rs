//! Infrastructure storage layer.
//!
//! All sea-orm specific code lives here:
//! - `entity/` - table definitions and their relations
//! - `mapper.rs` - model to SDK conversions
//! - `migrations/` - schema migrations, applied through `blog_db::migration_runner`
//! - `*_sea_repo.rs` - implementations of the domain repository traits

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

mod companies_sea_repo;
mod countries_sea_repo;
mod jobs_sea_repo;
mod media_sea_repo;
mod owners;
mod posts_sea_repo;
mod tags_sea_repo;
mod users_sea_repo;

pub use companies_sea_repo::OrmCompaniesRepository;
pub use countries_sea_repo::OrmCountriesRepository;
pub use jobs_sea_repo::OrmJobsRepository;
pub use media_sea_repo::{OrmCommentsRepository, OrmImagesRepository, OrmVideosRepository};
pub use posts_sea_repo::OrmPostsRepository;
pub use tags_sea_repo::{OrmPostTagRepository, OrmTaggablesRepository, OrmTagsRepository};
pub use users_sea_repo::OrmUsersRepository;

use crate::domain::repos::Repos;

/// The sea-orm repository set.
#[derive(Clone, Default)]
pub struct OrmRepos {
    countries: OrmCountriesRepository,
    users: OrmUsersRepository,
    companies: OrmCompaniesRepository,
    jobs: OrmJobsRepository,
    posts: OrmPostsRepository,
    tags: OrmTagsRepository,
    post_tag: OrmPostTagRepository,
    taggables: OrmTaggablesRepository,
    images: OrmImagesRepository,
    videos: OrmVideosRepository,
    comments: OrmCommentsRepository,
}

impl Repos for OrmRepos {
    type Countries = OrmCountriesRepository;
    type Users = OrmUsersRepository;
    type Companies = OrmCompaniesRepository;
    type Jobs = OrmJobsRepository;
    type Posts = OrmPostsRepository;
    type Tags = OrmTagsRepository;
    type PostTag = OrmPostTagRepository;
    type Taggables = OrmTaggablesRepository;
    type Images = OrmImagesRepository;
    type Videos = OrmVideosRepository;
    type Comments = OrmCommentsRepository;

    fn countries(&self) -> &Self::Countries {
        &self.countries
    }
    fn users(&self) -> &Self::Users {
        &self.users
    }
    fn companies(&self) -> &Self::Companies {
        &self.companies
    }
    fn jobs(&self) -> &Self::Jobs {
        &self.jobs
    }
    fn posts(&self) -> &Self::Posts {
        &self.posts
    }
    fn tags(&self) -> &Self::Tags {
        &self.tags
    }
    fn post_tag(&self) -> &Self::PostTag {
        &self.post_tag
    }
    fn taggables(&self) -> &Self::Taggables {
        &self.taggables
    }
    fn images(&self) -> &Self::Images {
        &self.images
    }
    fn videos(&self) -> &Self::Videos {
        &self.videos
    }
    fn comments(&self) -> &Self::Comments {
        &self.comments
    }
}
