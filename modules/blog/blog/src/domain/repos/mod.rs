//! Repository ports.
//!
//! Every method takes `conn: &C` so the same repository works against the
//! pooled `DatabaseConnection` and an open `DatabaseTransaction`.

mod countries_repo;
mod media_repo;
mod posts_repo;
mod tags_repo;
mod users_repo;

pub use countries_repo::CountriesRepository;
pub use media_repo::{CommentsRepository, ImagesRepository, VideosRepository};
pub use posts_repo::PostsRepository;
pub use tags_repo::{PostTagRepository, TaggablesRepository, TagsRepository};
pub use users_repo::{CompaniesRepository, JobsRepository, UserRecord, UsersRepository};

/// The full set of repositories a `BlogService` works with.
pub trait Repos: Send + Sync + 'static {
    type Countries: CountriesRepository;
    type Users: UsersRepository;
    type Companies: CompaniesRepository;
    type Jobs: JobsRepository;
    type Posts: PostsRepository;
    type Tags: TagsRepository;
    type PostTag: PostTagRepository;
    type Taggables: TaggablesRepository;
    type Images: ImagesRepository;
    type Videos: VideosRepository;
    type Comments: CommentsRepository;

    fn countries(&self) -> &Self::Countries;
    fn users(&self) -> &Self::Users;
    fn companies(&self) -> &Self::Companies;
    fn jobs(&self) -> &Self::Jobs;
    fn posts(&self) -> &Self::Posts;
    fn tags(&self) -> &Self::Tags;
    fn post_tag(&self) -> &Self::PostTag;
    fn taggables(&self) -> &Self::Taggables;
    fn images(&self) -> &Self::Images;
    fn videos(&self) -> &Self::Videos;
    fn comments(&self) -> &Self::Comments;
}
