use crate::commands::{
    AnalyticsCommand, CategoryCommand, Command, ContestantCommand, WatchArgs,
};
use crate::watch::watch;
use anyhow::{bail, Context, Result};
use pageant_api::agent::config::{Config, ConfigFile};
use pageant_api::types::{CategoryInput, RegisterInput};
use pageant_api::{AgentBuilder, GatewayHooks, NotificationLevel, PageantAgent};
use pageant_common::store::file::FileStore;
use pageant_http_client::reqwest::{ReqwestClient, ReqwestClientBuilder};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::create_dir_all;

/// Every request gives up after this long.
const TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("pageant-cli/", env!("CARGO_PKG_VERSION"));

pub struct Runner {
    agent: PageantAgent<FileStore, ReqwestClient>,
    config: Config,
    debug: bool,
    config_path: PathBuf,
    session_path: PathBuf,
}

impl Runner {
    pub async fn new(endpoint: Option<String>, debug: bool) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .with_context(|| format!("No config dir: {:?}", dirs::config_dir()))?;
        let dir = config_dir.join("pageant-cli");
        create_dir_all(&dir).await?;
        let config_path = dir.join("config.json");
        let session_path = dir.join("session.json");

        let mut config = if config_path.exists() {
            Config::load(&ConfigFile::new(&config_path))
                .await
                .with_context(|| format!("Invalid config file {config_path:?}"))?
        } else {
            Config::default()
        };
        if let Some(endpoint) = endpoint {
            config.endpoint = endpoint;
        }
        tracing::debug!(endpoint = %config.endpoint, ?session_path, "starting");
        let client = ReqwestClientBuilder::new(&config.endpoint)
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        let agent = AgentBuilder::new(client)
            .config(config.clone())
            .store(FileStore::new(&session_path))
            .hooks(hooks())
            .build();
        Ok(Self { agent, config, debug, config_path, session_path })
    }
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Results(args) if args.watch.watch => {
                let event_id = args.event_id;
                self.watch(&args.watch, move || self.agent.results(event_id)).await
            }
            Command::Analytics(AnalyticsCommand::Live(args)) if args.watch.watch => {
                let event_id = args.event_id;
                self.watch(&args.watch, move || self.agent.live_votes(event_id)).await
            }
            Command::Analytics(AnalyticsCommand::Leaderboard(args)) if args.watch.watch => {
                let event_id = args.event_id;
                self.watch(&args.watch, move || self.agent.leaderboard(event_id)).await
            }
            command => self.execute(command).await,
        }
    }
    /// Print every poll until Ctrl-C. Failed polls are reported and retried on the next tick.
    async fn watch<F, Fut>(&self, args: &WatchArgs, poll: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = pageant_api::Result<Value>>,
    {
        let stop = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        let report = |result: pageant_api::Result<Value>| match result {
            Ok(value) => self.print(&value),
            Err(err) => {
                tracing::debug!(error = ?err, "poll failed");
                eprintln!("error: {err}");
                Ok(())
            }
        };
        watch(Duration::from_secs(args.interval), poll, report, stop).await
    }
    async fn execute(&self, command: Command) -> Result<()> {
        match command {
            Command::Login(args) => {
                self.agent.login(args.username, args.password).await?;
                self.config.save(&ConfigFile::new(&self.config_path)).await?;
                println!("Login successful! Saved session to {:?}", self.session_path);
                Ok(())
            }
            Command::Register(args) => {
                let messages = self
                    .agent
                    .register(RegisterInput {
                        username: args.username,
                        email: args.email,
                        phone: args.phone,
                        password1: args.password,
                        password2: args.confirm_password,
                    })
                    .await?;
                for message in messages {
                    println!("{message}");
                }
                Ok(())
            }
            Command::VerifyEmail(args) => {
                for message in self.agent.verify_email(&args.token).await? {
                    println!("{message}");
                }
                Ok(())
            }
            Command::ResetPassword(args) => {
                for message in self.agent.request_password_reset(&args.email).await? {
                    println!("{message}");
                }
                Ok(())
            }
            Command::CompleteReset(args) => {
                for message in self.agent.complete_password_reset(args.into()).await? {
                    println!("{message}");
                }
                Ok(())
            }
            Command::Logout => {
                self.agent.logout().await?;
                Ok(())
            }
            Command::Refresh => Ok(self.agent.refresh().await?),
            Command::Whoami => {
                let session = self.agent.get_session().await?.with_context(|| "Not logged in")?;
                self.print(&session.user)
            }
            Command::Profile => self.print(&self.agent.profile().await?),
            Command::Events(args) => self.print(&if args.unpublished {
                self.agent.unpublished_events().await?
            } else {
                self.agent.my_events().await?
            }),
            Command::Event(args) => self.print(&self.agent.event(args.event_id).await?),
            Command::CreateEvent(fields) => {
                if fields.name.is_none() {
                    bail!("An event needs a name");
                }
                self.print(&self.agent.create_event(&fields.into()).await?)
            }
            Command::UpdateEvent(args) => {
                self.print(&self.agent.update_event(args.event_id, &args.fields.into()).await?)
            }
            Command::Publish(args) => self.print(&self.agent.publish_event(args.event_id).await?),
            Command::DeleteEvent(args) => {
                self.print(&self.agent.delete_event(args.event_id).await?)
            }
            Command::Category(command) => self.print(&match command {
                CategoryCommand::Add { event_id, name } => {
                    self.agent.add_category(event_id, &CategoryInput { name }).await?
                }
                CategoryCommand::Update { event_id, category_id, name } => {
                    self.agent
                        .update_category(event_id, category_id, &CategoryInput { name })
                        .await?
                }
                CategoryCommand::Delete { event_id, category_id } => {
                    self.agent.delete_category(event_id, category_id).await?
                }
            }),
            Command::Contestant(command) => self.print(&match command {
                ContestantCommand::Add { event_id, fields } => {
                    if fields.name.is_none() {
                        bail!("A contestant needs a name");
                    }
                    self.agent.add_contestant(event_id, &fields.into()).await?
                }
                ContestantCommand::Update { event_id, contestant_id, fields } => {
                    self.agent.update_contestant(event_id, contestant_id, &fields.into()).await?
                }
                ContestantCommand::Delete { event_id, contestant_id } => {
                    self.agent.delete_contestant(event_id, contestant_id).await?
                }
            }),
            Command::PublicEvents => self.print(&self.agent.published_events().await?),
            Command::PublicEvent(args) => self.print(&self.agent.public_event(args.event_id).await?),
            Command::Search(args) => self.print(&self.agent.search_events(&args.query).await?),
            Command::Results(args) => self.print(&self.agent.results(args.event_id).await?),
            Command::Vote(args) => self.print(
                &self.agent.vote(args.event_id, args.contestant_id, &(&args).into()).await?,
            ),
            Command::Analytics(command) => self.print(&match command {
                AnalyticsCommand::Dashboard(args) => {
                    self.agent.analytics_dashboard(args.event_id).await?
                }
                AnalyticsCommand::Live(args) => self.agent.live_votes(args.event_id).await?,
                AnalyticsCommand::Leaderboard(args) => {
                    self.agent.leaderboard(args.event_id).await?
                }
            }),
        }
    }
    fn print<T: std::fmt::Debug + Serialize>(&self, result: &T) -> Result<()> {
        if self.debug {
            println!("{:#?}", result);
        } else {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        Ok(())
    }
}

fn hooks() -> GatewayHooks {
    GatewayHooks::new()
        .on_notify(|notification| match notification.level {
            NotificationLevel::Info => eprintln!("{notification}"),
            NotificationLevel::Error => eprintln!("error: {notification}"),
        })
        .on_session_invalid(|| eprintln!("Run `pageant-cli login` to start a new session."))
        .on_signed_out(|| tracing::warn!("signed out until the server can be reached"))
}
