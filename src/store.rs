use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait, Set,
};
use tracing::debug;

use crate::{
    db,
    entities::{movie, user, watched},
    error::{AppError, AppResult, is_foreign_key_violation, is_unique_violation},
    models::{Movie, User, WatchRecord},
};

/// Data-access client for the watchlist. Each call runs a single statement
/// and hands the connection back to the pool before returning.
#[derive(Clone)]
pub struct WatchlistStore {
    db: DatabaseConnection,
}

impl WatchlistStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_tables(&self) -> AppResult<()> {
        db::create_tables(&self.db).await
    }

    pub async fn add_user(&self, username: &str) -> AppResult<User> {
        debug!(username = %username, "adding user");

        let model = user::ActiveModel { username: Set(username.to_string()) };

        user::Entity::insert(model).exec_without_returning(&self.db).await.map_err(|err| {
            if is_unique_violation(&err) {
                AppError::DuplicateUser(username.to_string())
            } else {
                err.into()
            }
        })?;

        Ok(User { username: username.to_string() })
    }

    /// Inserts a movie and returns the id the store assigned to it.
    pub async fn add_movie(&self, title: &str, release_timestamp: f64) -> AppResult<i32> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(title.to_string()),
            release_timestamp: Set(release_timestamp),
        };

        let id = movie::Entity::insert(model).exec(&self.db).await?.last_insert_id;
        debug!(id = id, title = %title, release_timestamp = release_timestamp, "added movie");
        Ok(id)
    }

    pub async fn watch_movie(&self, username: &str, movie_id: i32) -> AppResult<WatchRecord> {
        debug!(username = %username, movie_id = movie_id, "recording watch");

        let model = watched::ActiveModel {
            user_username: Set(username.to_string()),
            movie_id: Set(movie_id),
        };

        watched::Entity::insert(model).exec_without_returning(&self.db).await.map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::MissingReference { username: username.to_string(), movie_id }
            } else {
                err.into()
            }
        })?;

        Ok(WatchRecord { user_username: username.to_string(), movie_id })
    }

    pub async fn get_movies(&self, upcoming: bool) -> AppResult<Vec<Movie>> {
        if upcoming {
            return self.get_movies_released_after(now_sec()).await;
        }
        Ok(movie::Entity::find().all(&self.db).await?)
    }

    /// Movies whose release is strictly later than `timestamp`.
    pub async fn get_movies_released_after(&self, timestamp: f64) -> AppResult<Vec<Movie>> {
        let movies = movie::Entity::find()
            .filter(movie::Column::ReleaseTimestamp.gt(timestamp))
            .all(&self.db)
            .await?;
        debug!(after = timestamp, count = movies.len(), "fetched upcoming movies");
        Ok(movies)
    }

    pub async fn search_movies(&self, search_term: &str) -> AppResult<Vec<Movie>> {
        let movies = movie::Entity::find()
            .filter(movie::Column::Title.like(format!("%{search_term}%")))
            .all(&self.db)
            .await?;
        debug!(search_term = %search_term, count = movies.len(), "searched movies");
        Ok(movies)
    }

    pub async fn get_watched_movies(&self, username: &str) -> AppResult<Vec<Movie>> {
        let movies = movie::Entity::find()
            .join(JoinType::InnerJoin, movie::Relation::Watched.def())
            .join(JoinType::InnerJoin, watched::Relation::User.def())
            .filter(user::Column::Username.eq(username))
            .all(&self.db)
            .await?;
        debug!(username = %username, count = movies.len(), "fetched watched movies");
        Ok(movies)
    }
}

fn now_sec() -> f64 {
    jiff::Timestamp::now().as_duration().as_secs_f64()
}

#[cfg(test)]
pub(crate) async fn memory_store() -> WatchlistStore {
    let db = db::connect(&db::memory_config()).await.unwrap();
    let store = WatchlistStore::new(db);
    store.create_tables().await.unwrap();
    store
}
