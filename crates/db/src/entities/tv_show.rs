//! TV show entity (catalog).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tv_show")]
pub struct Model {
    /// External catalog ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub name: String,

    /// First genre of the external multi-genre list
    #[sea_orm(nullable, indexed)]
    pub genre: Option<String>,

    /// Poster URL
    #[sea_orm(nullable)]
    pub posters: Option<String>,

    pub popularity: f64,

    pub rating: f64,

    /// Year of the first episode
    #[sea_orm(nullable)]
    pub release_year: Option<i32>,

    #[sea_orm(nullable)]
    pub seasons: Option<i32>,

    #[sea_orm(nullable)]
    pub episodes: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Creator or showrunner
    #[sea_orm(nullable)]
    pub director: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
