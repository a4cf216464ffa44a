//! Command parsing and dispatch
//!
//! Every command prints the endpoint's JSON, pretty-printed, on stdout.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use wealthwiz_client::{ApiClient, LoginRequest, RegisterRequest};

/// Password for `login` and `register` is never taken from argv.
pub const PASSWORD_ENV: &str = "WEALTHWIZ_PASSWORD";

const DEFAULT_MOVERS: u32 = 5;

pub const USAGE: &str = "\
usage: wealthwiz [--config PATH] <command> [args]

commands:
  login <email>              sign in (password from WEALTHWIZ_PASSWORD)
  register <email> [name]    create an account (password from WEALTHWIZ_PASSWORD)
  logout                     forget stored tokens
  me | profile | goals       account data
  readiness | history        readiness score and its history
  market | sectors | movers [N]
  advice | education
  explain <question...>      beginner explanation
  dashboard                  aggregated dashboard view";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Login { email: String },
    Register { email: String, full_name: Option<String> },
    Logout,
    Me,
    Profile,
    Goals,
    Readiness,
    History,
    Market,
    Sectors,
    Movers { count: u32 },
    Advice,
    Education,
    Explain { query: String },
    Dashboard,
}

/// Split argv (without the program name) into the config path and command.
pub fn parse_args(args: &[String]) -> Result<(Option<String>, Command)> {
    let mut config = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config requires a path")?;
            config = Some(path.clone());
        } else {
            rest.push(arg.as_str());
        }
    }
    Ok((config, Command::parse(&rest)?))
}

impl Command {
    pub fn parse(args: &[&str]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            bail!("missing command\n\n{USAGE}");
        };

        let command = match *name {
            "login" => Command::Login {
                email: single_arg(name, rest)?,
            },
            "register" => {
                let (email, name_parts) = rest
                    .split_first()
                    .context("register requires an email")?;
                let full_name = (!name_parts.is_empty()).then(|| name_parts.join(" "));
                Command::Register {
                    email: email.to_string(),
                    full_name,
                }
            }
            "logout" => Command::Logout,
            "me" => Command::Me,
            "profile" => Command::Profile,
            "goals" => Command::Goals,
            "readiness" => Command::Readiness,
            "history" => Command::History,
            "market" => Command::Market,
            "sectors" => Command::Sectors,
            "movers" => {
                let count = match rest.first() {
                    Some(n) => n
                        .parse()
                        .with_context(|| format!("movers count must be a number, got {n:?}"))?,
                    None => DEFAULT_MOVERS,
                };
                Command::Movers { count }
            }
            "advice" => Command::Advice,
            "education" => Command::Education,
            "explain" => {
                if rest.is_empty() {
                    bail!("explain requires a question");
                }
                Command::Explain {
                    query: rest.join(" "),
                }
            }
            "dashboard" => Command::Dashboard,
            "help" | "--help" | "-h" => bail!("{USAGE}"),
            other => bail!("unknown command {other:?}\n\n{USAGE}"),
        };
        Ok(command)
    }

    /// Run against `client`; returns the JSON to print.
    pub async fn run(self, client: &ApiClient) -> Result<serde_json::Value> {
        let value = match self {
            Command::Login { email } => {
                let request = LoginRequest::new(email, password()?);
                client.login(&request).await.context("login failed")?;
                serde_json::json!({"authenticated": true})
            }
            Command::Register { email, full_name } => {
                let mut request = RegisterRequest::new(email, password()?);
                if let Some(name) = full_name {
                    request = request.full_name(name);
                }
                let response = client
                    .register(&request)
                    .await
                    .context("registration failed")?;
                to_json(&response.user)?
            }
            Command::Logout => {
                client.logout().await?;
                serde_json::json!({"authenticated": false})
            }
            Command::Me => client.me().await?,
            Command::Profile => client.profile().await?,
            Command::Goals => client.goals().await?,
            Command::Readiness => to_json(&client.readiness().await?)?,
            Command::History => client.readiness_history().await?,
            Command::Market => to_json(&client.market_summary().await?)?,
            Command::Sectors => to_json(&client.sectors().await?)?,
            Command::Movers { count } => to_json(&client.movers(count).await?)?,
            Command::Advice => to_json(&client.daily_advice().await?)?,
            Command::Education => to_json(&client.education_cards().await?)?,
            Command::Explain { query } => client.beginner_explanation(&query).await?,
            Command::Dashboard => to_json(&client.dashboard().await)?,
        };
        Ok(value)
    }
}

fn single_arg(command: &str, rest: &[&str]) -> Result<String> {
    match rest {
        [value] => Ok(value.to_string()),
        _ => bail!("{command} takes exactly one argument"),
    }
}

fn password() -> Result<String> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .with_context(|| format!("set {PASSWORD_ENV} to provide the password"))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).context("serializing response")
}
