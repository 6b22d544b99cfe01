//! Business logic services.

#![allow(missing_docs)]

pub mod catalog;
pub mod catalog_import;
pub mod comment;
pub mod friend;
pub mod post;
pub mod recommendation;
pub mod user;
pub mod vote;
pub mod watchlist;

pub use catalog::CatalogService;
pub use catalog_import::{
    CatalogBundle, GenreMap, GenreRecord, ImportSummary, MovieRecord, TvShowRecord,
};
pub use comment::{CommentService, CreateCommentInput, parse_comment_order};
pub use friend::FriendService;
pub use post::{CreatePostInput, PostService, PostWithTags, parse_tags};
pub use recommendation::{RecommendationService, Recommendations};
pub use user::{LoginInput, ProfilePicture, RegisterInput, UserService};
pub use vote::VoteService;
pub use watchlist::{AddToWatchlistInput, ContentRef, WatchlistItem, WatchlistService};
