use backoffice::api::{BackofficeClient, FileTokenStore, TokenStore};
use backoffice::{app, logging, Config};
use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "backoffice")]
#[command(about = "A terminal backoffice for companies, users and subscriptions")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./backoffice.yaml, then $XDG_CONFIG_HOME/backoffice/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
  /// Sign in and store the token. The password comes from BACKOFFICE_PASSWORD or stdin.
  Login {
    /// Account email
    email: String,
  },
  /// Forget the stored token
  Logout,
}

fn read_password() -> Result<String> {
  if let Some(password) = Config::get_password() {
    return Ok(password);
  }
  print!("Password: ");
  std::io::stdout().flush()?;
  let mut line = String::new();
  std::io::stdin().read_line(&mut line)?;
  Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

async fn login(config: &Config, email: &str) -> Result<()> {
  let tokens = Arc::new(FileTokenStore::open()?);
  let client = BackofficeClient::new(&config.api, tokens.clone())?;

  let password = read_password()?;
  let response = client.signin(email, &password).await?;
  let token = response
    .token
    .ok_or_else(|| eyre!("Sign-in succeeded but the server returned no token"))?;
  tokens.store(&token)?;

  let who = response
    .user
    .map(|user| user.full_name())
    .filter(|name| !name.is_empty())
    .unwrap_or_else(|| email.to_string());
  println!("Signed in as {} (token saved to {})", who, tokens.path().display());
  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = Config::load(args.config.as_deref())?;

  // Held until exit so buffered log lines are flushed
  let _log_guard = logging::init()?;

  match args.command {
    Some(Cmd::Login { email }) => login(&config, &email).await?,
    Some(Cmd::Logout) => {
      let tokens = FileTokenStore::open()?;
      tokens.clear()?;
      println!("Signed out");
    }
    None => {
      let mut app = app::App::new(config)?;
      app.run().await?;
    }
  }

  Ok(())
}
