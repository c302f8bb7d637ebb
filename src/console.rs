use jiff::{civil::Date, tz::TimeZone};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    models::{MenuChoice, Movie},
    store::WatchlistStore,
    templates,
};

/// Interactive menu loop over any line-oriented reader and writer.
pub struct Console<R, W> {
    store: WatchlistStore,
    reader: R,
    writer: W,
    tz: TimeZone,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(store: WatchlistStore, reader: R, writer: W, tz: TimeZone) -> Self {
        Self { store, reader, writer, tz }
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Runs until the user picks Exit or input ends. A failed menu action
    /// is reported and the loop carries on; I/O and schema errors end it.
    pub async fn run(&mut self) -> AppResult<()> {
        self.write(templates::WELCOME).await?;
        self.store.create_tables().await?;

        while let Some(input) = self.prompt(templates::MENU).await? {
            let Some(choice) = MenuChoice::from_input(&input) else {
                self.write(templates::INVALID_SELECTION).await?;
                continue;
            };
            if choice == MenuChoice::Exit {
                break;
            }

            match self.dispatch(choice).await {
                Ok(()) => {},
                Err(err @ AppError::Io(_)) => return Err(err),
                Err(err) => {
                    warn!(choice = ?choice, error = %err, "menu action failed");
                    self.write(&templates::error_line(&err)).await?;
                },
            }
        }

        info!("leaving watchlist");
        Ok(())
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> AppResult<()> {
        match choice {
            MenuChoice::AddMovie => self.add_movie().await,
            MenuChoice::UpcomingMovies => {
                let movies = self.store.get_movies(true).await?;
                self.print_movies("Upcoming", &movies).await
            },
            MenuChoice::AllMovies => {
                let movies = self.store.get_movies(false).await?;
                self.print_movies("All", &movies).await
            },
            MenuChoice::WatchMovie => self.watch_movie().await,
            MenuChoice::WatchedMovies => self.show_watched_movies().await,
            MenuChoice::AddUser => self.add_user().await,
            MenuChoice::SearchMovies => self.search_movies().await,
            MenuChoice::Exit => Ok(()),
        }
    }

    async fn add_movie(&mut self) -> AppResult<()> {
        let Some(title) = self.prompt("Movie title: ").await? else {
            return Ok(());
        };
        let Some(release_date) = self.prompt("Release date (dd-mm-YYYY): ").await? else {
            return Ok(());
        };

        let timestamp = parse_release_date(&release_date, &self.tz)?;
        let id = self.store.add_movie(&title, timestamp).await?;
        info!(id = id, title = %title, "movie added");
        Ok(())
    }

    async fn watch_movie(&mut self) -> AppResult<()> {
        let Some(username) = self.prompt("Username: ").await? else {
            return Ok(());
        };
        let Some(movie_id) = self.prompt("Movie ID: ").await? else {
            return Ok(());
        };

        let movie_id: i32 =
            movie_id.trim().parse().map_err(|_| AppError::InvalidMovieId(movie_id.clone()))?;
        self.store.watch_movie(&username, movie_id).await?;
        Ok(())
    }

    async fn show_watched_movies(&mut self) -> AppResult<()> {
        let Some(username) = self.prompt("Username: ").await? else {
            return Ok(());
        };

        let watched = self.store.get_watched_movies(&username).await?;
        if watched.is_empty() {
            self.write(templates::NO_WATCHED_MOVIES).await
        } else {
            self.print_movies("Watched", &watched).await
        }
    }

    async fn add_user(&mut self) -> AppResult<()> {
        let Some(username) = self.prompt("Username: ").await? else {
            return Ok(());
        };

        let user = self.store.add_user(&username).await?;
        info!(username = %user.username, "user added");
        Ok(())
    }

    async fn search_movies(&mut self) -> AppResult<()> {
        let Some(search_term) = self.prompt("Enter your search term: ").await? else {
            return Ok(());
        };

        let found = self.store.search_movies(&search_term).await?;
        if found.is_empty() {
            self.write(templates::NO_SEARCH_RESULTS).await
        } else {
            self.print_movies("Found", &found).await
        }
    }

    async fn print_movies(&mut self, heading: &str, movies: &[Movie]) -> AppResult<()> {
        let text = templates::movie_list(heading, movies, &self.tz);
        self.write(&text).await
    }

    /// Writes `text` and reads one line, without its line ending. `None` at
    /// end of input.
    async fn prompt(&mut self, text: &str) -> AppResult<Option<String>> {
        self.write(text).await?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn write(&mut self, text: &str) -> AppResult<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Parses `dd-mm-YYYY` as local midnight in `tz`, returning seconds since
/// the epoch.
pub fn parse_release_date(input: &str, tz: &TimeZone) -> AppResult<f64> {
    let invalid = |source| AppError::InvalidDate { input: input.to_string(), source };

    let date = Date::strptime("%d-%m-%Y", input.trim()).map_err(invalid)?;
    let zoned = date.to_zoned(tz.clone()).map_err(invalid)?;
    Ok(zoned.timestamp().as_duration().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory_store;

    async fn run_script(store: &WatchlistStore, script: &str) -> String {
        let mut console = Console::new(store.clone(), script.as_bytes(), Vec::new(), TimeZone::UTC);
        console.run().await.unwrap();
        String::from_utf8(console.into_writer()).unwrap()
    }

    #[test]
    fn parses_day_month_year() {
        assert_eq!(parse_release_date("16-07-2010", &TimeZone::UTC).unwrap(), 1_279_238_400.0);
        assert_eq!(parse_release_date(" 01-01-1970 ", &TimeZone::UTC).unwrap(), 0.0);
    }

    #[test]
    fn rejects_other_date_layouts() {
        for input in ["2010-07-16", "32-01-2010", "16/07/2010", ""] {
            let err = parse_release_date(input, &TimeZone::UTC).unwrap_err();
            assert!(matches!(err, AppError::InvalidDate { .. }), "{input}");
        }
    }

    #[tokio::test]
    async fn add_watch_and_list() {
        let store = memory_store().await;

        let out = run_script(
            &store,
            "6\nalice\n1\nInception\n16-07-2010\n3\n4\nalice\n1\n5\nalice\n8\n",
        )
        .await;

        assert!(out.starts_with(templates::WELCOME));
        assert!(out.contains("----- All movies -----\n\n1: Inception on Jul 16 2010\n"));
        assert!(out.contains("----- Watched movies -----\n\n1: Inception on Jul 16 2010\n"));
        assert!(!out.contains("Could not complete"));
    }

    #[tokio::test]
    async fn upcoming_lists_only_future_releases() {
        let store = memory_store().await;

        let out = run_script(&store, "1\nOld\n01-01-2000\n1\nNew\n01-01-2999\n2\n8\n").await;

        assert!(out.contains("----- Upcoming movies -----\n\n2: New on Jan 01 2999\n"));
        assert!(!out.contains("Old on"));
    }

    #[tokio::test]
    async fn watched_check_uses_watched_result() {
        let store = memory_store().await;
        store.add_movie("Inception", 0.0).await.unwrap();

        let out = run_script(&store, "3\n5\nbob\n8\n").await;

        assert!(out.contains("1: Inception on Jan 01 1970"));
        assert!(out.contains(templates::NO_WATCHED_MOVIES));
        assert!(!out.contains("Watched movies"));
    }

    #[tokio::test]
    async fn search_reports_matches_and_misses() {
        let store = memory_store().await;
        store.add_movie("Inception", 0.0).await.unwrap();

        let out = run_script(&store, "7\nincep\n7\nTenet\n8\n").await;

        assert!(out.contains("----- Found movies -----\n\n1: Inception on Jan 01 1970\n"));
        assert!(out.contains(templates::NO_SEARCH_RESULTS));
    }

    #[tokio::test]
    async fn invalid_selection_reprompts() {
        let store = memory_store().await;

        let out = run_script(&store, "9\nfoo\n 8\n8\n").await;

        assert_eq!(out.matches(templates::INVALID_SELECTION).count(), 3);
        assert_eq!(out.matches("Your selection: ").count(), 4);
    }

    #[tokio::test]
    async fn failed_actions_do_not_end_the_loop() {
        let store = memory_store().await;

        let out = run_script(
            &store,
            "6\nalice\n6\nalice\n1\nInception\n2010-07-16\n4\nalice\nabc\n3\n8\n",
        )
        .await;

        assert!(out.contains("Could not complete that action: user `alice` already exists"));
        assert!(out.contains("Could not complete that action: invalid release date `2010-07-16`"));
        assert!(out.contains("Could not complete that action: invalid movie id `abc`"));
        assert!(out.contains("----- All movies -----\n\n\n----- End of list -----"));
    }

    #[tokio::test]
    async fn end_of_input_exits_cleanly() {
        let store = memory_store().await;

        let out = run_script(&store, "1\nHalf entered").await;

        assert!(out.ends_with(&format!("Release date (dd-mm-YYYY): {}", templates::MENU)));
        assert!(store.get_movies(false).await.unwrap().is_empty());
    }
}
