use std::fmt::Write;

use jiff::{SignedDuration, Timestamp, tz::TimeZone};

use crate::models::Movie;

pub const WELCOME: &str = "\nWelcome to the movie watchlist app!\n";

pub const MENU: &str = "Please select one of the following options:
1) Add new movie.
2) View upcoming movies.
3) View all movies.
4) Watch a movie.
5) View watched movies.
6) Add user to the app.
7) Search for a movie.
8) Exit.

Your selection: ";

pub const INVALID_SELECTION: &str = "Invalid input, please try again!\n";
pub const NO_WATCHED_MOVIES: &str = "No watched movies for that user\n";
pub const NO_SEARCH_RESULTS: &str = "No movies found for that search term\n";

pub fn movie_list(heading: &str, movies: &[Movie], tz: &TimeZone) -> String {
    let mut out = format!("\n----- {heading} movies -----\n\n");
    for movie in movies {
        let _ = writeln!(
            out,
            "{}: {} on {}",
            movie.id,
            movie.title,
            human_date(movie.release_timestamp, tz)
        );
    }
    out.push_str("\n----- End of list -----\n\n");
    out
}

/// Renders a release timestamp as e.g. `Jul 16 2010`, falling back to the
/// raw number when it is outside the representable range.
pub fn human_date(release_timestamp: f64, tz: &TimeZone) -> String {
    match SignedDuration::try_from_secs_f64(release_timestamp).and_then(Timestamp::from_duration) {
        Ok(ts) => ts.to_zoned(tz.clone()).strftime("%b %d %Y").to_string(),
        Err(_) => release_timestamp.to_string(),
    }
}

pub fn error_line(err: &dyn std::error::Error) -> String {
    format!("Could not complete that action: {err}\n")
}
