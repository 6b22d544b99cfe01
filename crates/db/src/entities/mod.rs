//! Database entities.
//!
//! One module per table, following the sea-orm entity layout.

pub mod comment;
pub mod comment_vote;
pub mod friendship;
pub mod movie;
pub mod post;
pub mod post_tag;
pub mod post_vote;
pub mod tv_show;
pub mod user;
pub mod watchlist_entry;

pub use comment::Entity as Comment;
pub use comment_vote::Entity as CommentVote;
pub use friendship::Entity as Friendship;
pub use movie::Entity as Movie;
pub use post::Entity as Post;
pub use post_tag::Entity as PostTag;
pub use post_vote::Entity as PostVote;
pub use tv_show::Entity as TvShow;
pub use user::Entity as User;
pub use watchlist_entry::Entity as WatchlistEntry;
