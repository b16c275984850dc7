//! Screen controllers. Each one owns its list state and follows the same
//! cycle: fetch a page, mutate through the API, fetch again.

pub mod admin;
pub mod feed;
pub mod my_posts;
pub mod post_detail;

#[cfg(test)]
mod fake;

pub use admin::{AdminAction, AdminDashboard};
pub use feed::FeedScreen;
pub use my_posts::{MyPostsScreen, PostAction};
pub use post_detail::PostDetailScreen;
