//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod follow_repo;
pub mod post_repo;
pub mod user_repo;

pub use follow_repo::FollowRepo;
pub use post_repo::PostRepo;
pub use user_repo::UserRepo;
