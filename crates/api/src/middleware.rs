//! Shared application state.

#![allow(missing_docs)]

use std::sync::Arc;

use rateit_common::{Config, StorageBackend};
use rateit_core::{
    CatalogService, CommentService, FriendService, PostService, RecommendationService,
    UserService, VoteService, WatchlistService,
};
use rateit_db::repositories::{
    CatalogRepository, CommentRepository, FriendshipRepository, MovieRepository, PostRepository,
    TvShowRepository, UserRepository, VoteRepository, WatchlistRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub user_service: UserService,
    pub friend_service: FriendService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub vote_service: VoteService,
    pub watchlist_service: WatchlistService,
    pub recommendation_service: RecommendationService,
}

impl AppState {
    /// Wire every service onto one shared connection pool.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage: Arc<dyn StorageBackend>,
        config: &Config,
    ) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let movie_repo = MovieRepository::new(Arc::clone(&db));
        let tv_show_repo = TvShowRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let vote_repo = VoteRepository::new(Arc::clone(&db));
        let watchlist_repo = WatchlistRepository::new(Arc::clone(&db));
        let catalog_repo = CatalogRepository::new(Arc::clone(&db));
        let friendship_repo = FriendshipRepository::new(db);

        Self {
            catalog_service: CatalogService::new(
                movie_repo.clone(),
                tv_show_repo.clone(),
                catalog_repo,
                config,
            ),
            user_service: UserService::new(user_repo.clone(), storage, config),
            friend_service: FriendService::new(friendship_repo, user_repo.clone()),
            post_service: PostService::new(
                post_repo.clone(),
                user_repo.clone(),
                movie_repo.clone(),
                tv_show_repo.clone(),
            ),
            comment_service: CommentService::new(
                comment_repo.clone(),
                post_repo.clone(),
                user_repo.clone(),
            ),
            vote_service: VoteService::new(vote_repo, post_repo, comment_repo, user_repo.clone()),
            watchlist_service: WatchlistService::new(
                watchlist_repo.clone(),
                user_repo.clone(),
                movie_repo.clone(),
                tv_show_repo.clone(),
            ),
            recommendation_service: RecommendationService::new(
                watchlist_repo,
                user_repo,
                movie_repo,
                tv_show_repo,
                config,
            ),
        }
    }
}
