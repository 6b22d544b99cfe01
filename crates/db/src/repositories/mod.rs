//! Repository layer for database operations.

mod catalog;
mod comment;
mod friendship;
mod movie;
mod post;
mod tv_show;
mod user;
mod vote;
mod watchlist;

pub use catalog::CatalogRepository;
pub use comment::{CommentOrder, CommentRepository};
pub use friendship::FriendshipRepository;
pub use movie::MovieRepository;
pub use post::{PostFilter, PostRepository};
pub use tv_show::TvShowRepository;
pub use user::UserRepository;
pub use vote::{VoteRepository, VoteTally};
pub use watchlist::WatchlistRepository;
