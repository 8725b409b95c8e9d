use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use edgecore_journal::auth::{Identity, IdentityProvider, SignUp};
use edgecore_journal::config::Config;
use edgecore_journal::core::TradingClock;
use edgecore_journal::journal::{require_identity, HistoryFilter, Journal};
use edgecore_journal::models::schema::NO_ENTRY_REASONS;
use edgecore_journal::models::{DailyRecord, EntryModel, TradeResult, STEPS};
use edgecore_journal::storage::JsonFileStore;

pub const USAGE: &str = "\
usage: edgecore <command>

  clock [watch]                       trading-zone time and window status
  steps                               checklist steps, entry models and no-entry reasons
  today                               today's record as JSON
  save <file.json>                    validate and save today's record
  history [days|all] [all|entry|noentry]
  stats [json]                        statistics, weekday and checklist breakdowns
  mark <YYYY-MM-DD> <trade#> <win|loss>
  migrate                             one-time cleanup of stored history
  signup <email> <username> <password> <confirm>
  signin <username|email> <password>
  signout";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Clock { watch: bool },
    Steps,
    SignUp(SignUpArgs),
    SignIn { login: String, password: String },
    SignOut,
    Journal(JournalCommand),
}

impl Command {
    /// Commands that manage the session themselves.
    pub fn is_auth(&self) -> bool {
        matches!(self, Command::SignUp(_) | Command::SignIn { .. } | Command::SignOut)
    }
}

/// Commands that read or write the signed-in user's journal.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalCommand {
    Today,
    Save { path: PathBuf },
    History { filter: HistoryFilter },
    Stats { json: bool },
    Mark { date: String, index: usize, verdict: TradeResult },
    Migrate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignUpArgs {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm: String,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let arg = |i: usize| args.get(i).map(String::as_str);

        let cmd = match arg(0) {
            Some("clock") => Command::Clock {
                watch: arg(1) == Some("watch"),
            },
            Some("steps") => Command::Steps,
            Some("today") => Command::Journal(JournalCommand::Today),
            Some("save") => Command::Journal(JournalCommand::Save {
                path: PathBuf::from(arg(1).ok_or_else(|| anyhow!("save needs a file"))?),
            }),
            Some("history") => {
                let mut filter = HistoryFilter::default();
                if let Some(p) = arg(1) {
                    filter.period = p.parse().map_err(|e: String| anyhow!(e))?;
                }
                if let Some(k) = arg(2) {
                    filter.kind = k.parse().map_err(|e: String| anyhow!(e))?;
                }
                Command::Journal(JournalCommand::History { filter })
            }
            Some("stats") => Command::Journal(JournalCommand::Stats {
                json: arg(1) == Some("json"),
            }),
            Some("mark") => {
                let (Some(date), Some(n), Some(v)) = (arg(1), arg(2), arg(3)) else {
                    bail!("mark needs <date> <trade#> <win|loss>");
                };
                let number: usize = n.parse().context("trade number must be 1, 2 or 3")?;
                if number == 0 {
                    bail!("trade numbers start at 1");
                }
                Command::Journal(JournalCommand::Mark {
                    date: date.to_string(),
                    index: number - 1,
                    verdict: v.parse().map_err(|e: String| anyhow!(e))?,
                })
            }
            Some("migrate") => Command::Journal(JournalCommand::Migrate),
            Some("signup") => {
                let (Some(email), Some(username), Some(password), Some(confirm)) =
                    (arg(1), arg(2), arg(3), arg(4))
                else {
                    bail!("signup needs <email> <username> <password> <confirm>");
                };
                Command::SignUp(SignUpArgs {
                    email: email.to_string(),
                    username: username.to_string(),
                    password: password.to_string(),
                    confirm: confirm.to_string(),
                })
            }
            Some("signin") => {
                let (Some(login), Some(password)) = (arg(1), arg(2)) else {
                    bail!("signin needs <username|email> <password>");
                };
                Command::SignIn {
                    login: login.to_string(),
                    password: password.to_string(),
                }
            }
            Some("signout") => Command::SignOut,
            Some(other) => bail!("unknown command: {}\n\n{}", other, USAGE),
            None => bail!("{}", USAGE),
        };
        Ok(cmd)
    }
}

pub async fn run(cfg: &Config, command: Command, auth: &dyn IdentityProvider) -> Result<()> {
    let clock = TradingClock::new(cfg);

    match command {
        Command::Clock { watch } => run_clock(&clock, watch).await,
        Command::Steps => {
            print_steps();
            Ok(())
        }
        Command::SignUp(args) => {
            let identity = auth
                .sign_up(&SignUp {
                    email: args.email,
                    username: args.username,
                    password: args.password,
                    confirm_password: args.confirm,
                })
                .await?;
            println!("Registered {} ({})", identity.display_name(), identity.user_id);
            Ok(())
        }
        Command::SignIn { login, password } => {
            let identity = auth.sign_in(&login, &password).await?;
            println!("Signed in as {}", identity.display_name());
            Ok(())
        }
        Command::SignOut => {
            auth.sign_out().await?;
            println!("Signed out");
            Ok(())
        }
        Command::Journal(command) => {
            let user = require_identity(auth.current_user().await)
                .context("run `edgecore signin`, set EDGECORE_USER, or EDGECORE_EMAIL/EDGECORE_PASSWORD for hosted auth")?;
            let journal = Journal::new(JsonFileStore::new(&cfg.data_dir), clock);
            run_journal(cfg, journal, &user, command)
        }
    }
}

fn run_journal(
    cfg: &Config,
    mut journal: Journal<JsonFileStore>,
    user: &Identity,
    command: JournalCommand,
) -> Result<()> {
    match command {
        JournalCommand::Today => {
            let record = journal.today(user, None)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        JournalCommand::Save { path } => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let record: DailyRecord = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            let stats = journal.save_today(user, record, None)?;
            println!(
                "Checklist saved. {} days recorded, win rate {}%",
                stats.total_days, stats.win_rate
            );
        }
        JournalCommand::History { filter } => {
            for item in journal.history(user, &filter, None)? {
                let status = match item.record.had_entry {
                    Some(true) => format!("{} trade(s)", item.trades.len()),
                    Some(false) => "no entry".to_string(),
                    None => "undecided".to_string(),
                };
                let results: Vec<String> = item
                    .trades
                    .iter()
                    .map(|t| t.result.map_or("pending".to_string(), |r| r.to_string()))
                    .collect();
                println!(
                    "{}  checklist {:>3}%  {:<12} {}",
                    item.date,
                    item.completion,
                    status,
                    results.join(" ")
                );
            }
        }
        JournalCommand::Stats { json } => {
            let report = journal.report(user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print(&cfg.instrument);
            }
        }
        JournalCommand::Mark { date, index, verdict } => {
            if journal.update_trade_result(user, &date, index, verdict)? {
                println!("Trade {} on {} marked as {}", index + 1, date, verdict);
            } else {
                println!("No trade {} on {}; nothing changed", index + 1, date);
            }
        }
        JournalCommand::Migrate => {
            let report = journal.migrate(user)?;
            println!(
                "Removed {} obsolete step entries, stamped {} records",
                report.registro_removed, report.versions_stamped
            );
        }
    }
    Ok(())
}

fn print_steps() {
    for (i, step) in STEPS.iter().filter(|s| s.items > 0).enumerate() {
        println!("{}. {:<22} {} item(s)  [{}]", i + 1, step.name, step.items, step.id);
    }
    let models: Vec<&str> = EntryModel::ALL.iter().map(EntryModel::as_str).collect();
    println!("\nEntry models: {}", models.join(", "));
    println!("No-entry reasons:");
    for reason in NO_ENTRY_REASONS {
        println!("  - {}", reason);
    }
}

async fn run_clock(clock: &TradingClock, watch: bool) -> Result<()> {
    let print = || {
        let reading = clock.read(None);
        println!(
            "{} {}  window {}",
            reading.time.date_key,
            reading.time.time_string,
            if reading.window_open { "OPEN" } else { "closed" }
        );
    };

    print();
    if !watch {
        return Ok(());
    }

    info!("Watching trading window. Press Ctrl+C to stop.");
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    let mut last_minute = clock.trading_time(None).time_string;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = ticker.tick() => {
                let now = clock.trading_time(None).time_string;
                if now != last_minute {
                    last_minute = now;
                    print();
                }
            }
        }
    }
}
