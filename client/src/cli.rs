//! Terminal front-end for the catalogue client.
//!
//! Parses `myflix` subcommands and renders results as plain text. All state
//! changes go through [`CatalogueClient`].

use std::io::{self, Write};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::ports::{ApiError, KeyValueStore, MovieApi};
use crate::domain::{
    CatalogueClient, Credentials, FavoriteToggle, MovieId, MovieRecord, Registration, UserRecord,
    UserUpdate, UserValidationError,
};

/// `myflix` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "myflix",
    about = "Browse the myFlix catalogue and manage your favourites",
    version
)]
pub struct CliArgs {
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account. Log in afterwards.
    Register {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
        /// Given name.
        #[arg(long)]
        firstname: String,
        /// Family name.
        #[arg(long)]
        lastname: String,
        /// Birthday as `yyyy-MM-dd`.
        #[arg(long, value_parser = parse_birthday)]
        birthday: Option<String>,
    },
    /// Log in and store the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// List the catalogue.
    Movies,
    /// Show one movie.
    Movie {
        /// Movie identifier.
        #[arg(value_parser = parse_movie_id)]
        id: MovieId,
    },
    /// List favourites; defaults to the logged-in user's.
    Favorites {
        /// Read another account's server-side favourites.
        #[arg(long)]
        email: Option<String>,
    },
    /// Add or remove a movie from favourites.
    Toggle {
        /// Movie identifier.
        #[arg(value_parser = parse_movie_id)]
        id: MovieId,
    },
    /// Add a favourite on the server without updating the local copy.
    AddFavorite {
        /// Movie identifier.
        #[arg(value_parser = parse_movie_id)]
        id: MovieId,
    },
    /// Remove a favourite on the server without updating the local copy.
    RemoveFavorite {
        /// Movie identifier.
        #[arg(value_parser = parse_movie_id)]
        id: MovieId,
    },
    /// Update profile fields; omitted fields keep their stored values.
    Edit {
        /// New given name.
        #[arg(long)]
        firstname: Option<String>,
        /// New family name.
        #[arg(long)]
        lastname: Option<String>,
        /// New email.
        #[arg(long)]
        email: Option<String>,
        /// New birthday as `yyyy-MM-dd`.
        #[arg(long, value_parser = parse_birthday)]
        birthday: Option<String>,
    },
    /// Change the account password.
    ChangePassword {
        /// New password.
        #[arg(long)]
        password: String,
    },
    /// Delete the account. Requires the confirmation phrase.
    DeleteAccount {
        /// Must equal `Delete account <email>`.
        #[arg(long)]
        confirm: Option<String>,
    },
}

/// Failures surfaced by the command runner.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalogue client reported a failure.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Local input was rejected before any request.
    #[error("{0}")]
    Input(String),
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl From<UserValidationError> for CliError {
    fn from(error: UserValidationError) -> Self {
        Self::Input(error.to_string())
    }
}

fn parse_movie_id(raw: &str) -> Result<MovieId, String> {
    MovieId::new(raw).map_err(|error| error.to_string())
}

fn parse_birthday(raw: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|error| format!("birthday must be yyyy-MM-dd: {error}"))
}

/// Execute `command` against `client`, writing human-readable output to
/// `out`.
///
/// # Errors
///
/// Returns [`CliError`] when input is rejected, the client fails, or output
/// cannot be written.
pub async fn run<A, S>(
    client: &CatalogueClient<A, S>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    A: MovieApi,
    S: KeyValueStore,
{
    match command {
        Command::Register {
            email,
            password,
            firstname,
            lastname,
            birthday,
        } => {
            let credentials = Credentials::try_from_parts(&email, &password)?;
            let registration = Registration::new(credentials, firstname, lastname, birthday);
            let user = client.register(&registration).await?;
            writeln!(out, "Registered {}. You can now log in.", user.email)?;
        }
        Command::Login { email, password } => {
            let credentials = Credentials::try_from_parts(&email, &password)?;
            let session = client.login(&credentials).await?;
            writeln!(out, "Welcome {}", session.user().display_name())?;
        }
        Command::Logout => {
            client.logout()?;
            writeln!(out, "Logged out.")?;
        }
        Command::Whoami => match client.current_user()? {
            Some(user) => write_user(out, &user)?,
            None => writeln!(out, "Not logged in.")?,
        },
        Command::Movies => {
            let user = client.current_user()?;
            for movie in client.list_movies().await? {
                let favorite = user.as_ref().is_some_and(|u| u.is_favorite(&movie.id));
                write_movie_line(out, &movie, favorite)?;
            }
        }
        Command::Movie { id } => match client.find_movie(&id).await? {
            Some(movie) => {
                let favorite = client.is_favorite(&movie.id)?;
                write_movie_detail(out, &movie, favorite)?;
            }
            None => return Err(CliError::Input(format!("No movie with id {id}"))),
        },
        Command::Favorites { email: Some(email) } => {
            for movie in client.favorites(&email).await? {
                write_movie_line(out, &movie, true)?;
            }
        }
        Command::Favorites { email: None } => {
            let movies = client.favorite_movies().await?;
            if movies.is_empty() {
                writeln!(out, "No favourites yet.")?;
            }
            for movie in movies {
                write_movie_line(out, &movie, true)?;
            }
        }
        Command::Toggle { id } => match client.toggle_favorite(&id).await? {
            FavoriteToggle::Added => writeln!(out, "Added {id} to favourites.")?,
            FavoriteToggle::Removed => writeln!(out, "Removed {id} from favourites.")?,
        },
        Command::AddFavorite { id } => {
            client.add_favorite(&id).await?;
            writeln!(out, "Server added {id}.")?;
        }
        Command::RemoveFavorite { id } => {
            client.remove_favorite(&id).await?;
            writeln!(out, "Server removed {id}.")?;
        }
        Command::Edit {
            firstname,
            lastname,
            email,
            birthday,
        } => {
            let user = client
                .current_user()?
                .ok_or_else(ApiError::not_logged_in)?;
            let mut update = UserUpdate::profile_of(&user);
            let changed = firstname.is_some()
                || lastname.is_some()
                || email.is_some()
                || birthday.is_some();
            if !changed {
                return Err(CliError::Input("Nothing to update.".to_owned()));
            }
            update.firstname = firstname.or(update.firstname);
            update.lastname = lastname.or(update.lastname);
            update.email = email.or(update.email);
            update.birthday = birthday.or(update.birthday);
            let updated = client.edit_user(&update).await?;
            writeln!(out, "Profile updated.")?;
            write_user(out, &updated)?;
        }
        Command::ChangePassword { password } => {
            if password.is_empty() {
                return Err(UserValidationError::EmptyPassword.into());
            }
            client.change_password(Zeroizing::new(password)).await?;
            writeln!(out, "Password changed.")?;
        }
        Command::DeleteAccount { confirm } => {
            let phrase = client.deletion_phrase()?;
            if confirm.as_deref().map(str::trim) != Some(phrase.as_str()) {
                return Err(CliError::Input(format!(
                    "Type --confirm \"{phrase}\" to delete your account."
                )));
            }
            let confirmation = client.delete_user().await?;
            writeln!(out, "{}", confirmation.message)?;
        }
    }
    Ok(())
}

fn write_user(out: &mut impl Write, user: &UserRecord) -> io::Result<()> {
    writeln!(out, "{} <{}>", user.display_name(), user.email)?;
    if let Some(birthday) = user.birthday_for_input() {
        writeln!(out, "Birthday: {birthday}")?;
    }
    writeln!(out, "Favourites: {}", user.favorite_movies.len())
}

fn write_movie_line(out: &mut impl Write, movie: &MovieRecord, favorite: bool) -> io::Result<()> {
    let marker = if favorite { '*' } else { ' ' };
    writeln!(out, "{marker} {}  {}", movie.id, movie.title)
}

fn write_movie_detail(out: &mut impl Write, movie: &MovieRecord, favorite: bool) -> io::Result<()> {
    writeln!(out, "{}", movie.title)?;
    writeln!(out, "Director: {}", movie.director.name)?;
    writeln!(out, "Genres: {}", movie.genre_names())?;
    if let Some(description) = movie.description.as_deref() {
        writeln!(out, "{description}")?;
    }
    writeln!(
        out,
        "{}",
        if favorite {
            "In your favourites"
        } else {
            "Not in your favourites"
        }
    )
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
