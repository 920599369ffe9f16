use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::json;

use shelve::app::{App, NavigationError};
use shelve::config::ShelveConfig;
use shelve::net::api::ApiError;
use shelve::net::types::{Book, ShelfItem, ShelfStatus};
use shelve::pages::discover::{DiscoverQuery, DiscoverTab, Listing};
use shelve::pages::{PageError, book, discover, home, login, onboarding, profile, register, shelves};
use shelve::routes::Route;
use shelve::routes::guard::GuardOutcome;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error("gateway client setup failed: {0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "shelve", about = "Shelve book tracking client")]
struct Cli {
    #[arg(long, env = "SHELVE_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "SHELVE_STATE_DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SHELVE_PASSWORD")]
        password: String,
    },
    /// Sign in to an existing account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SHELVE_PASSWORD")]
        password: String,
    },
    /// Forget the current session.
    Logout,
    /// Show the signed-in user.
    Whoami {
        /// Re-fetch the profile from the server first.
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// Print the session state as JSON (token omitted).
    Status,
    /// Resolve a client path through the route guard.
    Navigate { path: String },
    Onboard(OnboardCommand),
    Profile(ProfileCommand),
    /// Show the signed-in dashboard.
    Home,
    /// Browse the catalog.
    Discover {
        /// all, recommended, top-rated or recent.
        #[arg(long, default_value = "all")]
        tab: DiscoverTab,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// List the catalog's genres.
    Genres,
    Shelves(ShelvesCommand),
    Book(BookCommand),
}

#[derive(Args, Debug)]
struct ShelvesCommand {
    #[command(subcommand)]
    command: ShelvesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ShelvesSubcommand {
    /// List shelved books, optionally one shelf only.
    List {
        #[arg(long)]
        status: Option<ShelfStatus>,
    },
    Move { book_id: String, status: ShelfStatus },
    Remove { book_id: String },
}

#[derive(Args, Debug)]
struct BookCommand {
    #[command(subcommand)]
    command: BookSubcommand,
}

#[derive(Subcommand, Debug)]
enum BookSubcommand {
    /// Show a book with its ratings, reviews and shelf.
    Show { book_id: String },
    /// Rate a book from 1 to 5.
    Rate { book_id: String, score: u8 },
    /// Put a book on a shelf, moving it if already shelved.
    Shelve { book_id: String, status: ShelfStatus },
    Review { book_id: String, content: String },
    EditReview { book_id: String, review_id: String, content: String },
    DeleteReview { book_id: String, review_id: String },
}

#[derive(Args, Debug)]
struct OnboardCommand {
    #[command(subcommand)]
    command: OnboardSubcommand,
}

#[derive(Subcommand, Debug)]
enum OnboardSubcommand {
    /// List suggested books to pick from.
    Books,
    /// Submit liked books and finish onboarding.
    Submit {
        #[arg(required = true)]
        book_ids: Vec<String>,
    },
    /// Finish onboarding without picking books.
    Skip,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Update {
        #[arg(long)]
        name: String,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ShelveConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(dir) = cli.state_dir.clone() {
        config = config.with_state_dir(dir);
    }

    let app = App::from_config(&config)?;
    run(&app, cli.command).await
}

async fn run(app: &App, command: Command) -> Result<(), CliError> {
    let api = app.api.as_ref();
    let store = app.store.as_ref();
    match command {
        Command::Register { name, email, password } => {
            let form = register::RegisterForm { name, email, password };
            let landed = register::submit(api, store, &form).await?;
            print_landing("registered", &landed);
        }
        Command::Login { email, password } => {
            let form = login::LoginForm { email, password };
            let landed = login::submit(api, store, &form).await?;
            print_landing("logged in", &landed);
        }
        Command::Logout => {
            let landed = profile::logout(store);
            print_landing("logged out", &landed);
        }
        Command::Whoami { refresh } => {
            if refresh {
                profile::refresh_profile(api, store).await?;
            }
            match store.user() {
                Some(user) => print_json(&serde_json::to_value(user)?)?,
                None => return Err(PageError::NotAuthenticated.into()),
            }
        }
        Command::Status => {
            let session = store.snapshot();
            print_json(&json!({
                "isAuthenticated": session.is_authenticated(),
                "needsOnboarding": session.needs_onboarding,
                "user": session.user,
            }))?;
        }
        Command::Navigate { path } => {
            let nav = app.navigate(&path)?;
            match nav.outcome {
                GuardOutcome::Allow => println!("allow {}", nav.landed.path()),
                _ => println!("redirect {} -> {}", nav.requested.path(), nav.landed.path()),
            }
        }
        Command::Onboard(onboard) => run_onboard(app, onboard).await?,
        Command::Profile(profile_cmd) => run_profile(app, profile_cmd).await?,
        Command::Home => {
            let dashboard = home::load(api, store).await?;
            println!("Welcome back, {}", dashboard.greeting_name.unwrap_or_default());
            println!("== Continue reading");
            dashboard.currently_reading.iter().for_each(print_shelf_item);
            println!("== Recommended for you");
            for rec in &dashboard.recommended {
                print_book(&rec.book);
            }
            println!("== Top rated");
            dashboard.top_rated.iter().for_each(print_book);
            println!("== Recently added");
            dashboard.recently_added.iter().for_each(print_book);
        }
        Command::Discover { tab, search, genre, page } => {
            let query = DiscoverQuery { tab, search, genre, page };
            match discover::browse(api, store, &query).await? {
                Listing::Books(listing) => {
                    listing.content.iter().for_each(print_book);
                    println!("page {} of {} ({} books)", listing.page + 1, listing.total_pages.max(1), listing.total_elements);
                }
                Listing::Recommended(books) => {
                    for rec in &books {
                        print_book(&rec.book);
                        if let Some(reason) = &rec.reason {
                            println!("\t  {reason}");
                        }
                    }
                }
            }
        }
        Command::Genres => {
            for genre in discover::genres(api, store).await? {
                println!("{genre}");
            }
        }
        Command::Shelves(shelves_cmd) => run_shelves(app, shelves_cmd).await?,
        Command::Book(book_cmd) => run_book(app, book_cmd).await?,
    }
    Ok(())
}

async fn run_shelves(app: &App, shelves_cmd: ShelvesCommand) -> Result<(), CliError> {
    let api = app.api.as_ref();
    let store = app.store.as_ref();
    match shelves_cmd.command {
        ShelvesSubcommand::List { status } => {
            let overview = shelves::load(api, store).await?;
            overview.filtered(status).into_iter().for_each(print_shelf_item);
            println!("{} books", overview.count(status));
        }
        ShelvesSubcommand::Move { book_id, status } => {
            let item = shelves::move_book(api, store, &book_id, status).await?;
            println!("moved {} to {}", item.book_id, status.as_str());
        }
        ShelvesSubcommand::Remove { book_id } => {
            shelves::remove_book(api, store, &book_id).await?;
            println!("removed {book_id}");
        }
    }
    Ok(())
}

async fn run_book(app: &App, book_cmd: BookCommand) -> Result<(), CliError> {
    let api = app.api.as_ref();
    let store = app.store.as_ref();
    match book_cmd.command {
        BookSubcommand::Show { book_id } => {
            let detail = book::load(api, store, &book_id).await?;
            print_json(&json!({
                "book": detail.book,
                "averageRating": detail.average_rating,
                "myRating": detail.my_rating.map(|r| r.score),
                "shelf": detail.shelf_item.map(|i| i.shelf_type),
                "reviews": detail.reviews,
            }))?;
        }
        BookSubcommand::Rate { book_id, score } => {
            let rating = book::rate(api, store, &book_id, score).await?;
            println!("rated {} {}/5", rating.book_id, rating.score);
        }
        BookSubcommand::Shelve { book_id, status } => {
            let item = book::shelve(api, store, &book_id, status).await?;
            println!("{} is on {}", item.book_id, item.shelf_type.as_str());
        }
        BookSubcommand::Review { book_id, content } => {
            let review = book::submit_review(api, store, &book_id, &content).await?;
            println!("review {} posted", review.id);
        }
        BookSubcommand::EditReview { book_id, review_id, content } => {
            let review = book::edit_review(api, store, &book_id, &review_id, &content).await?;
            println!("review {} updated", review.id);
        }
        BookSubcommand::DeleteReview { book_id, review_id } => {
            book::delete_review(api, store, &book_id, &review_id).await?;
            println!("review {review_id} deleted");
        }
    }
    Ok(())
}

async fn run_onboard(app: &App, onboard: OnboardCommand) -> Result<(), CliError> {
    let api = app.api.as_ref();
    let store = app.store.as_ref();
    match onboard.command {
        OnboardSubcommand::Books => {
            onboarding::suggested_books(api, store).await?.iter().for_each(print_book);
        }
        OnboardSubcommand::Submit { book_ids } => {
            let landed = onboarding::submit_selection(api, store, &book_ids).await?;
            print_landing("onboarding complete", &landed);
        }
        OnboardSubcommand::Skip => {
            let landed = onboarding::skip(api, store).await?;
            print_landing("onboarding skipped", &landed);
        }
    }
    Ok(())
}

async fn run_profile(app: &App, profile_cmd: ProfileCommand) -> Result<(), CliError> {
    let api = app.api.as_ref();
    let store = app.store.as_ref();
    match profile_cmd.command {
        ProfileSubcommand::Update { name } => {
            match profile::update_profile(api, store, &profile::ProfileForm { name }).await? {
                profile::ProfileUpdate::Unchanged => println!("no changes"),
                profile::ProfileUpdate::Updated(p) => println!("profile updated: {}", p.name),
            }
        }
        ProfileSubcommand::Password { current, new, confirm } => {
            let form = profile::PasswordForm { current_password: current, new_password: new, confirm_password: confirm };
            profile::change_password(api, store, &form).await?;
            println!("password changed");
        }
    }
    Ok(())
}

fn print_book(book: &Book) {
    let rating = book.average_rating.map(|r| format!(" ({r:.1})")).unwrap_or_default();
    println!("{}\t{} by {}{rating}", book.id, book.title, book.author);
}

fn print_shelf_item(item: &ShelfItem) {
    let title = item.book.as_ref().map_or(item.book_id.as_str(), |b| b.title.as_str());
    println!("{}\t{}\t{title}", item.book_id, item.shelf_type.as_str());
}

fn print_landing(action: &str, landed: &Route) {
    println!("{action}; continue at {}", landed.path());
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
