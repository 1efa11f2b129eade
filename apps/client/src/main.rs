use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cvchecker::analysis::SubmissionController;
use cvchecker::auth::{LoginFlow, LoginStep};
use cvchecker::config::Config;
use cvchecker::errors::AuthError;
use cvchecker::models::{CvFile, VerifiedSession};
use cvchecker::render::{render_result, render_wizard, render_wizard_hint};
use cvchecker::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "cvchecker")]
#[command(about = "Check how well a CV matches a job description")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upload a CV with a job description and show the match report
    Analyze {
        /// CV to upload (.pdf or .docx)
        #[arg(long)]
        cv: Option<PathBuf>,
        /// Job description text
        #[arg(long, conflicts_with = "jd_file")]
        jd: Option<String>,
        /// Read the job description from a file
        #[arg(long)]
        jd_file: Option<PathBuf>,
        /// Address to send the PDF report to
        #[arg(long)]
        email: Option<String>,
        /// Email the PDF report to --email
        #[arg(long)]
        send_email: bool,
        /// Attach the stored login token to the request
        #[arg(long)]
        use_token: bool,
    },
    /// Log in with a one-time code sent by email
    Login {
        /// Email to send the code to (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored login token
    Logout,
    /// Show login state and analysis API health
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    let config = Config::from_env()?;

    // stdout carries reports; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("cvchecker v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config)?;

    match app.command {
        Commands::Analyze {
            cv,
            jd,
            jd_file,
            email,
            send_email,
            use_token,
        } => run_analyze(&state, cv, jd, jd_file, email, send_email, use_token).await,
        Commands::Login { email } => run_login(&state, email).await,
        Commands::Logout => {
            state.auth.set_token("").await?;
            println!("Logged out.");
            Ok(())
        }
        Commands::Status => run_status(&state).await,
    }
}

async fn run_analyze(
    state: &AppState,
    cv: Option<PathBuf>,
    jd: Option<String>,
    jd_file: Option<PathBuf>,
    email: Option<String>,
    send_email: bool,
    use_token: bool,
) -> Result<()> {
    let token = if use_token {
        Some(state.auth.get_token().await?).filter(|t| !t.is_empty())
    } else {
        None
    };
    if use_token && token.is_none() {
        eprintln!("{}", "No stored login; sending the analysis anonymously.".yellow());
    }

    let mut controller = SubmissionController::new(state.analysis.clone()).with_bearer_token(token);

    if let Some(path) = cv {
        controller.select_file(Some(CvFile::from_path(&path).await?));
    }
    let job_description = match (jd, jd_file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read job description at {}", path.display()))?,
        (None, None) => String::new(),
    };
    controller.set_job_description(job_description);
    controller.set_contact_email(email.unwrap_or_default());
    controller.set_wants_email_copy(send_email);

    let wizard = controller.wizard();
    eprintln!("{}", render_wizard(&wizard).dimmed());
    match render_wizard_hint(&wizard) {
        Some(hint) => eprintln!("{}", hint.yellow()),
        None => eprintln!("Analyzing…"),
    }

    controller.submit().await?;

    if let Some(result) = controller.result() {
        println!("{}", render_result(result, state.analysis.base_url()));
    }
    Ok(())
}

async fn run_login(state: &AppState, email: Option<String>) -> Result<()> {
    let mut flow = LoginFlow::new();
    let interactive = email.is_none();

    if let Some(email) = email {
        flow.set_email(email);
    }

    while matches!(flow.step(), LoginStep::AwaitingEmail) {
        if interactive {
            let Some(input) = prompt("Email")? else {
                bail!("Login cancelled");
            };
            flow.set_email(input);
        }
        eprintln!("Sending code…");
        match flow.send_otp(&state.auth).await {
            Ok(()) => {}
            Err(err) if interactive && recoverable(&err) => {
                eprintln!("{}", err.to_string().red());
            }
            Err(err) => return Err(err.into()),
        }
    }

    eprintln!("Check your inbox (and spam). The code expires in 10 minutes.");

    loop {
        let Some(code) = prompt("OTP code")? else {
            flow.cancel();
            bail!("Login cancelled");
        };
        flow.set_code(code);
        eprintln!("Verifying…");
        match flow.verify(&state.auth).await {
            Ok(user) => {
                let user = user.unwrap_or_default();
                match VerifiedSession::display_name(&user) {
                    Some(name) => println!("Logged in as {}.", name.bold()),
                    None => println!("Logged in."),
                }
                return Ok(());
            }
            Err(err) if recoverable(&err) => eprintln!("{}", err.to_string().red()),
            Err(err) => return Err(err.into()),
        }
    }
}

/// Errors the user can fix by typing something else.
fn recoverable(err: &AuthError) -> bool {
    matches!(err, AuthError::Validation(_) | AuthError::Rejected { .. })
}

async fn run_status(state: &AppState) -> Result<()> {
    if state.auth.is_logged_in().await? {
        println!("Login:        {}", "logged in".green());
    } else {
        println!("Login:        {}", "logged out".dimmed());
    }

    match state.analysis.health().await {
        Ok(true) => println!("Analysis API: {} ({})", "up".green(), state.config.api_url),
        Ok(false) => println!("Analysis API: {} ({})", "unhealthy".yellow(), state.config.api_url),
        Err(err) => println!(
            "Analysis API: {} ({}: {err})",
            "unreachable".red(),
            state.config.api_url
        ),
    }
    Ok(())
}

/// Reads one trimmed line from stdin. `None` on end of input.
fn prompt(label: &str) -> Result<Option<String>> {
    eprint!("{label}: ");
    io::stderr().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
