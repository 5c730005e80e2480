//! Command line interface.
//!
//! One-shot subcommands for authentication, organizations, boards and tasks,
//! plus `board <id>` which opens the terminal board view.

use crate::api::{Api, BoardSummary, Organization, ProfileUpdate, SearchHit, Task, User};
use crate::app::App;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::logger::LogBuffer;
use crate::utils::validation;
use clap::{App as ClapApp, AppSettings, Arg, ArgMatches, SubCommand};
use log::*;
use std::io::{self, BufRead, Write};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Build the argument parser.
///
pub fn build() -> ClapApp<'static, 'static> {
    let email = || Arg::with_name("email").long("email").short("e").takes_value(true);
    let password = || {
        Arg::with_name("password")
            .long("password")
            .short("p")
            .takes_value(true)
            .help("Prompted for when omitted")
    };
    let id = |name: &'static str| Arg::with_name(name).required(true);

    ClapApp::new("taskboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal client for the Taskboard kanban API")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increase log verbosity"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .value_name("DIR")
                .global(true)
                .help("Configuration directory"),
        )
        .subcommand(
            SubCommand::with_name("login")
                .about("Sign in and store the session")
                .arg(email().required(true))
                .arg(password()),
        )
        .subcommand(
            SubCommand::with_name("register")
                .about("Create an account")
                .arg(
                    Arg::with_name("name")
                        .long("name")
                        .takes_value(true)
                        .required(true),
                )
                .arg(email().required(true))
                .arg(password()),
        )
        .subcommand(SubCommand::with_name("logout").about("Forget the stored session"))
        .subcommand(SubCommand::with_name("whoami").about("Show the signed-in user"))
        .subcommand(
            SubCommand::with_name("forgot-password")
                .about("Request a password reset email")
                .arg(email().required(true)),
        )
        .subcommand(
            SubCommand::with_name("validate-reset-token")
                .about("Check a password reset token")
                .arg(id("token")),
        )
        .subcommand(
            SubCommand::with_name("reset-password")
                .about("Set a new password with a reset token")
                .arg(id("token"))
                .arg(password()),
        )
        .subcommand(
            SubCommand::with_name("profile")
                .about("Show or update your profile")
                .arg(Arg::with_name("name").long("name").takes_value(true))
                .arg(email()),
        )
        .subcommand(
            SubCommand::with_name("orgs")
                .about("Manage organizations")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(SubCommand::with_name("list"))
                .subcommand(SubCommand::with_name("create").arg(id("name")))
                .subcommand(SubCommand::with_name("show").arg(id("id")))
                .subcommand(
                    SubCommand::with_name("rename")
                        .arg(id("id"))
                        .arg(id("name")),
                )
                .subcommand(SubCommand::with_name("delete").arg(id("id")))
                .subcommand(SubCommand::with_name("members").arg(id("id")))
                .subcommand(
                    SubCommand::with_name("add-member")
                        .arg(id("id"))
                        .arg(id("email")),
                )
                .subcommand(
                    SubCommand::with_name("remove-member")
                        .arg(id("id"))
                        .arg(id("user_id")),
                ),
        )
        .subcommand(
            SubCommand::with_name("boards")
                .about("Manage boards")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(SubCommand::with_name("list").arg(id("organization_id")))
                .subcommand(
                    SubCommand::with_name("create")
                        .arg(id("organization_id"))
                        .arg(id("name")),
                )
                .subcommand(SubCommand::with_name("delete").arg(id("id"))),
        )
        .subcommand(
            SubCommand::with_name("tasks")
                .about("Find tasks across boards")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(SubCommand::with_name("recent"))
                .subcommand(SubCommand::with_name("search").arg(id("query"))),
        )
        .subcommand(
            SubCommand::with_name("board")
                .about("Open a board in the terminal view")
                .arg(id("id")),
        )
}

/// Run the parsed subcommand.
///
pub async fn run(
    matches: &ArgMatches<'_>,
    config: &Config,
    api: Api,
    logs: LogBuffer,
) -> AppResult<()> {
    match matches.subcommand() {
        ("login", Some(m)) => login(&api, m).await,
        ("register", Some(m)) => register(&api, m).await,
        ("logout", _) => {
            api.logout()?;
            println!("Signed out.");
            Ok(())
        }
        ("forgot-password", Some(m)) => {
            let email = arg(m, "email");
            validation::email("email", email)?;
            let message = api.forgot_password(email).await?;
            println!("{}", message);
            Ok(())
        }
        ("validate-reset-token", Some(m)) => {
            let status = api.validate_reset_token(arg(m, "token")).await?;
            if status.valid {
                println!("Reset token is valid.");
            } else {
                println!("Reset link is invalid or has expired. {}", status.message);
            }
            Ok(())
        }
        ("reset-password", Some(m)) => reset_password(&api, m).await,
        (command, sub) => {
            require_session(&api)?;
            match (command, sub) {
                ("whoami", _) => whoami(&api),
                ("profile", Some(m)) => profile(&api, m).await,
                ("orgs", Some(m)) => organizations(&api, m).await,
                ("boards", Some(m)) => boards(&api, m).await,
                ("tasks", Some(m)) => tasks(&api, m).await,
                ("board", Some(m)) => App::start(config, api.clone(), arg(m, "id"), logs)
                    .await
                    .map_err(|e| AppError::Terminal(e.to_string())),
                _ => Err(AppError::Validation(format!("unknown command '{}'", command))),
            }
        }
    }
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.value_of(name).unwrap_or_default()
}

fn require_session(api: &Api) -> AppResult<()> {
    if api.session().is_authenticated() {
        Ok(())
    } else {
        Err(AppError::NotAuthenticated)
    }
}

/// Read a line from stdin after printing `label`.
///
fn prompt(label: &str) -> AppResult<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn password_arg(matches: &ArgMatches, label: &str) -> AppResult<String> {
    match matches.value_of("password") {
        Some(password) => Ok(password.to_string()),
        None => prompt(label),
    }
}

async fn login(api: &Api, matches: &ArgMatches<'_>) -> AppResult<()> {
    let email = arg(matches, "email");
    validation::email("email", email)?;
    let password = password_arg(matches, "Password")?;
    validation::required("password", &password)?;
    let auth = api.login(email, &password).await?;
    info!("Signed in as {}", auth.user.email);
    println!("Signed in as {}.", format_user(&auth.user));
    Ok(())
}

async fn register(api: &Api, matches: &ArgMatches<'_>) -> AppResult<()> {
    let name = arg(matches, "name");
    let email = arg(matches, "email");
    validation::required("name", name)?;
    validation::email("email", email)?;
    let password = password_arg(matches, "Password")?;
    validation::password("password", &password, MIN_PASSWORD_LENGTH)?;
    let user = api.register(name, email, &password).await?;
    println!("Registered {}. Run `taskboard login` to sign in.", format_user(&user));
    Ok(())
}

async fn reset_password(api: &Api, matches: &ArgMatches<'_>) -> AppResult<()> {
    let token = arg(matches, "token");
    let status = api.validate_reset_token(token).await?;
    if !status.valid {
        return Err(AppError::Validation(
            "Reset link is invalid or has expired".to_string(),
        ));
    }
    let (password, confirmation) = match matches.value_of("password") {
        Some(password) => (password.to_string(), password.to_string()),
        None => (prompt("New password")?, prompt("Confirm password")?),
    };
    validation::password("password", &password, MIN_PASSWORD_LENGTH)?;
    validation::matching("password", &password, &confirmation)?;
    let auth = api.reset_password(token, &password).await?;
    println!("Password updated. Signed in as {}.", format_user(&auth.user));
    Ok(())
}

fn whoami(api: &Api) -> AppResult<()> {
    match api.session().user()? {
        Some(user) => println!("{}", format_user(&user)),
        None => println!("Signed in (user details unknown)"),
    }
    Ok(())
}

async fn profile(api: &Api, matches: &ArgMatches<'_>) -> AppResult<()> {
    let update = ProfileUpdate {
        name: matches.value_of("name").map(str::to_string),
        email: matches.value_of("email").map(str::to_string),
    };
    if update.is_empty() {
        return whoami(api);
    }
    if let Some(name) = &update.name {
        validation::required("name", name)?;
    }
    if let Some(email) = &update.email {
        validation::email("email", email)?;
    }
    let user = api.update_profile(&update).await?;
    println!("Profile updated: {}", format_user(&user));
    Ok(())
}

async fn organizations(api: &Api, matches: &ArgMatches<'_>) -> AppResult<()> {
    match matches.subcommand() {
        ("list", _) => {
            let organizations = api.organizations().await?;
            if organizations.is_empty() {
                println!("No organizations yet.");
            }
            for organization in &organizations {
                println!("{}", format_organization(organization));
            }
        }
        ("create", Some(m)) => {
            let name = arg(m, "name");
            validation::required("name", name)?;
            let organization = api.create_organization(name).await?;
            println!("Created {}", format_organization(&organization));
        }
        ("show", Some(m)) => {
            let organization = api.organization(arg(m, "id")).await?;
            println!("{}", format_organization(&organization));
            if let Some(owner) = &organization.owner {
                println!("  owner: {}", owner.name().unwrap_or_else(|| owner.id()));
            }
        }
        ("rename", Some(m)) => {
            let name = arg(m, "name");
            validation::required("name", name)?;
            let organization = api.rename_organization(arg(m, "id"), name).await?;
            println!("Renamed to {}", format_organization(&organization));
        }
        ("delete", Some(m)) => {
            api.delete_organization(arg(m, "id")).await?;
            println!("Deleted organization {}.", arg(m, "id"));
        }
        ("members", Some(m)) => {
            for user in api.members(arg(m, "id")).await? {
                println!("{}", format_user(&user));
            }
        }
        ("add-member", Some(m)) => {
            let email = arg(m, "email");
            validation::email("email", email)?;
            let organization = api.add_member(arg(m, "id"), email).await?;
            println!("Added {} to {}", email, format_organization(&organization));
        }
        ("remove-member", Some(m)) => {
            api.remove_member(arg(m, "id"), arg(m, "user_id")).await?;
            println!("Removed member {}.", arg(m, "user_id"));
        }
        _ => (),
    }
    Ok(())
}

async fn boards(api: &Api, matches: &ArgMatches<'_>) -> AppResult<()> {
    match matches.subcommand() {
        ("list", Some(m)) => {
            let boards = api.boards(arg(m, "organization_id")).await?;
            if boards.is_empty() {
                println!("No boards yet.");
            }
            for board in &boards {
                println!("{}", format_board(board));
            }
        }
        ("create", Some(m)) => {
            let name = arg(m, "name");
            validation::required("name", name)?;
            let board = api.create_board(name, arg(m, "organization_id")).await?;
            println!("Created {}", format_board(&board));
        }
        ("delete", Some(m)) => {
            api.delete_board(arg(m, "id")).await?;
            println!("Deleted board {}.", arg(m, "id"));
        }
        _ => (),
    }
    Ok(())
}

async fn tasks(api: &Api, matches: &ArgMatches<'_>) -> AppResult<()> {
    match matches.subcommand() {
        ("recent", _) => {
            for task in api.recent_tasks().await? {
                println!("{}", format_task(&task));
            }
        }
        ("search", Some(m)) => {
            let query = arg(m, "query");
            if query.trim().is_empty() {
                return Ok(());
            }
            let hits = api.search_tasks(query).await?;
            if hits.is_empty() {
                println!("No matching tasks.");
            }
            for hit in &hits {
                println!("{}", format_hit(hit));
            }
        }
        _ => (),
    }
    Ok(())
}

pub fn format_user(user: &User) -> String {
    if user.name.is_empty() {
        format!("{} <{}>", user.id, user.email)
    } else {
        format!("{} <{}>", user.name, user.email)
    }
}

pub fn format_organization(organization: &Organization) -> String {
    format!(
        "{}  {}  ({} members)",
        organization.id,
        organization.name,
        organization.members.len()
    )
}

pub fn format_board(board: &BoardSummary) -> String {
    format!("{}  {}", board.id, board.name)
}

pub fn format_task(task: &Task) -> String {
    format!(
        "{}  [{}]  {}  ({})",
        task.id, task.priority, task.title, task.status
    )
}

pub fn format_hit(hit: &SearchHit) -> String {
    match &hit.board_name {
        Some(board) => format!("{}  on {}", format_task(&hit.task), board),
        None => format_task(&hit.task),
    }
}
