pub use crate::entities::{movie::Model as Movie, user::Model as User, watched::Model as WatchRecord};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuChoice {
    AddMovie,
    UpcomingMovies,
    AllMovies,
    WatchMovie,
    WatchedMovies,
    AddUser,
    SearchMovies,
    Exit,
}

impl MenuChoice {
    pub fn from_input(input: &str) -> Option<Self> {
        match input {
            "1" => Some(MenuChoice::AddMovie),
            "2" => Some(MenuChoice::UpcomingMovies),
            "3" => Some(MenuChoice::AllMovies),
            "4" => Some(MenuChoice::WatchMovie),
            "5" => Some(MenuChoice::WatchedMovies),
            "6" => Some(MenuChoice::AddUser),
            "7" => Some(MenuChoice::SearchMovies),
            "8" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}
