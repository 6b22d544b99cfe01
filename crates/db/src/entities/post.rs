//! Post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Author
    #[sea_orm(indexed)]
    pub username: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub content_text: String,

    pub date_of_post: DateTimeWithTimeZone,

    /// Discussed movie (mutually exclusive with `tv_show_id`)
    #[sea_orm(nullable, indexed)]
    pub movie_id: Option<i32>,

    /// Discussed TV show (mutually exclusive with `movie_id`)
    #[sea_orm(nullable, indexed)]
    pub tv_show_id: Option<i32>,

    /// Attached poll, opaque to this service
    #[sea_orm(nullable)]
    pub poll_id: Option<i32>,

    /// Upvote count (denormalized)
    #[sea_orm(default_value = 0)]
    pub upvote_count: i32,

    /// Comment count (denormalized)
    #[sea_orm(default_value = 0)]
    pub comment_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Username",
        to = "super::user::Column::Username",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,

    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,

    #[sea_orm(has_many = "super::post_vote::Entity")]
    PostVote,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::post_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostTag.def()
    }
}

impl Related<super::post_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostVote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
