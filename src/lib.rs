pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;

pub use crate::error::{Error, Result};

use crate::app::{feed::FeedService, posts::PostService, social::SocialService, users::UserService};
use crate::infra::db::Db;

/// Composition root handed to the (external) request layer: one shared pool,
/// one service handle per subsystem.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub users: UserService,
    pub posts: PostService,
    pub social: SocialService,
    pub feed: FeedService,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        Self {
            users: UserService::new(db.clone()),
            posts: PostService::new(db.clone()),
            social: SocialService::new(db.clone()),
            feed: FeedService::new(db.clone()),
            db,
        }
    }
}
