//! Console front end: the interactive onboarding form flow. Two screens,
//! gated solely on the session store — sign-in forms first, the tenant
//! dashboard once a token is held.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::oneshot;

use super::billing::BillingRequest;
use super::leads::LeadRequest;
use super::session::SessionRequest;
use super::wallet::WalletRequest;
use super::{ServiceChannels, ServiceError};
use crate::models::billing::{CreditPack, PlacedOrder};
use crate::models::leads::NewLead;
use crate::models::session::Session;
use crate::utils;

type InputLines = Lines<BufReader<Stdin>>;

#[derive(Debug, PartialEq)]
pub enum Command {
    SignUp,
    LogIn,
    Credits,
    Packs,
    Buy(String),
    Lead,
    Import(PathBuf),
    Recharge(i64),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };

        match word {
            "signup" => Command::SignUp,
            "login" => Command::LogIn,
            "credits" => Command::Credits,
            "packs" => Command::Packs,
            "buy" => {
                if rest.is_empty() {
                    Command::Unknown("usage: buy <pack_id>".to_string())
                } else {
                    Command::Buy(rest.to_string())
                }
            }
            "lead" => Command::Lead,
            "import" => {
                if rest.is_empty() {
                    Command::Unknown("usage: import <file.csv>".to_string())
                } else {
                    Command::Import(PathBuf::from(rest))
                }
            }
            "recharge" => match rest.parse::<i64>() {
                Ok(amount) if amount > 0 => Command::Recharge(amount),
                _ => Command::Unknown("usage: recharge <credits>".to_string()),
            },
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(format!("unknown command: {}", other)),
        }
    }
}

/// Screen gating: which commands each of the two screens accepts.
fn allowed(command: &Command, authenticated: bool) -> bool {
    match command {
        Command::SignUp | Command::LogIn => !authenticated,
        Command::Credits
        | Command::Packs
        | Command::Buy(_)
        | Command::Lead
        | Command::Import(_)
        | Command::Recharge(_) => authenticated,
        Command::Help | Command::Quit | Command::Unknown(_) => true,
    }
}

pub async fn run(channels: ServiceChannels) -> Result<(), anyhow::Error> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    println!("LeadBot SaaS - Onboarding");
    print_signin_help();

    loop {
        eprint!("> ");
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break, // EOF
        };
        if line.trim().is_empty() {
            continue;
        }

        let authenticated = channels.session_store.is_authenticated().await;
        let command = Command::parse(&line);

        if !allowed(&command, authenticated) {
            if authenticated {
                println!("[!] Already signed in.");
            } else {
                println!("[!] Sign up or log in first.");
            }
            continue;
        }

        match command {
            Command::SignUp => sign_up_form(&mut lines, &channels).await?,
            Command::LogIn => log_in_form(&mut lines, &channels).await?,
            Command::Credits => match fetch_credits(&channels).await {
                Ok(credits) => println!("Credits: {}", credits),
                Err(e) => print_error(&e),
            },
            Command::Packs => match fetch_packs(&channels).await {
                Ok(packs) => print_packs(&packs),
                Err(e) => print_error(&e),
            },
            Command::Buy(pack_id) => match create_order(&channels, &pack_id).await {
                Ok(placed) => print_order(&placed),
                Err(e) => print_error(&e),
            },
            Command::Lead => lead_form(&mut lines, &channels).await?,
            Command::Import(path) => match import_csv(&channels, path).await {
                Ok(imported) => println!("Imported {} leads.", imported),
                Err(e) => print_error(&e),
            },
            Command::Recharge(amount) => match recharge(&channels, amount).await {
                Ok(credits) => println!("Credits: {}", credits),
                Err(e) => print_error(&e),
            },
            Command::Help => {
                if authenticated {
                    print_dashboard_help();
                } else {
                    print_signin_help();
                }
            }
            Command::Quit => break,
            Command::Unknown(message) => println!("[!] {}", message),
        }
    }

    println!("Bye.");
    Ok(())
}

async fn sign_up_form(
    lines: &mut InputLines,
    channels: &ServiceChannels,
) -> Result<(), anyhow::Error> {
    let business_name = ask(lines, "Business name").await?;
    let email = ask(lines, "Email").await?;
    if !utils::valid_email(&email) {
        println!("[!] That does not look like an email address.");
        return Ok(());
    }
    let password = ask(lines, "Password").await?;

    match request_sign_up(channels, business_name, email, password).await {
        Ok(session) => enter_dashboard(channels, &session).await,
        Err(e) => print_error(&e),
    }

    Ok(())
}

async fn log_in_form(
    lines: &mut InputLines,
    channels: &ServiceChannels,
) -> Result<(), anyhow::Error> {
    let email = ask(lines, "Email").await?;
    if !utils::valid_email(&email) {
        println!("[!] That does not look like an email address.");
        return Ok(());
    }
    let password = ask(lines, "Password").await?;

    match request_log_in(channels, email, password).await {
        Ok(session) => enter_dashboard(channels, &session).await,
        Err(e) => print_error(&e),
    }

    Ok(())
}

async fn lead_form(lines: &mut InputLines, channels: &ServiceChannels) -> Result<(), anyhow::Error> {
    let name = ask(lines, "Lead name").await?;
    let phone = ask(lines, "Lead phone (E.164)").await?;
    if !utils::valid_phone(&phone) {
        println!("[!] Phone must be E.164, e.g. +15551234567.");
        return Ok(());
    }

    match add_lead(channels, NewLead { name, phone }).await {
        Ok(id) => println!("Lead saved with id {}.", id),
        Err(e) => print_error(&e),
    }

    Ok(())
}

/// The one-shot refresh that follows token acquisition: exactly one balance
/// fetch and one pack-list fetch, at the transition, not on every prompt.
async fn enter_dashboard(channels: &ServiceChannels, session: &Session) {
    println!(
        "Token acquired. Tenant ready. (signed in at {} UTC)",
        session.acquired_at.format("%H:%M:%S")
    );

    match fetch_credits(channels).await {
        Ok(credits) => println!("Credits: {}", credits),
        Err(e) => print_error(&e),
    }
    match fetch_packs(channels).await {
        Ok(packs) => print_packs(&packs),
        Err(e) => print_error(&e),
    }

    print_dashboard_help();
}

async fn request_sign_up(
    channels: &ServiceChannels,
    business_name: String,
    email: String,
    password: String,
) -> Result<Session, ServiceError> {
    let (tx, rx) = oneshot::channel();
    channels
        .session
        .send(SessionRequest::SignUp {
            business_name,
            email,
            password,
            response: tx,
        })
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    rx.await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?
}

async fn request_log_in(
    channels: &ServiceChannels,
    email: String,
    password: String,
) -> Result<Session, ServiceError> {
    let (tx, rx) = oneshot::channel();
    channels
        .session
        .send(SessionRequest::LogIn {
            email,
            password,
            response: tx,
        })
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    rx.await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?
}

async fn fetch_credits(channels: &ServiceChannels) -> Result<i64, ServiceError> {
    let (tx, rx) = oneshot::channel();
    channels
        .wallet
        .send(WalletRequest::GetBalance { response: tx })
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    let balance = rx
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))??;

    Ok(balance.credits)
}

async fn recharge(channels: &ServiceChannels, amount: i64) -> Result<i64, ServiceError> {
    let (tx, rx) = oneshot::channel();
    channels
        .wallet
        .send(WalletRequest::Recharge {
            amount,
            response: tx,
        })
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    let balance = rx
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))??;

    Ok(balance.credits)
}

async fn fetch_packs(channels: &ServiceChannels) -> Result<Vec<CreditPack>, ServiceError> {
    let (tx, rx) = oneshot::channel();
    channels
        .billing
        .send(BillingRequest::ListPacks { response: tx })
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    rx.await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?
}

async fn create_order(
    channels: &ServiceChannels,
    pack_id: &str,
) -> Result<PlacedOrder, ServiceError> {
    let (tx, rx) = oneshot::channel();
    channels
        .billing
        .send(BillingRequest::CreateOrder {
            pack_id: pack_id.to_string(),
            response: tx,
        })
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    rx.await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?
}

async fn add_lead(channels: &ServiceChannels, lead: NewLead) -> Result<i64, ServiceError> {
    let (tx, rx) = oneshot::channel();
    channels
        .leads
        .send(LeadRequest::AddLead { lead, response: tx })
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    let created = rx
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))??;

    Ok(created.id)
}

async fn import_csv(channels: &ServiceChannels, path: PathBuf) -> Result<u64, ServiceError> {
    let (tx, rx) = oneshot::channel();
    channels
        .leads
        .send(LeadRequest::ImportCsv { path, response: tx })
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))?;

    let report = rx
        .await
        .map_err(|e| ServiceError::Communication("Console".to_string(), e.to_string()))??;

    Ok(report.imported)
}

async fn ask(lines: &mut InputLines, prompt: &str) -> Result<String, anyhow::Error> {
    eprint!("{}: ", prompt);
    match lines.next_line().await? {
        Some(line) => Ok(line.trim().to_string()),
        None => anyhow::bail!("Console: input closed."),
    }
}

fn print_error(error: &ServiceError) {
    match error {
        // Auth contract: a denial is the raw server body, shown verbatim.
        ServiceError::Rejected(raw) => println!("{}", raw),
        other => println!("[!] {}", other),
    }
}

fn print_order(placed: &PlacedOrder) {
    match &placed.pack {
        Some(pack) => println!("Order created for {} ({} credits).", pack.label, pack.credits),
        None => println!("Order created."),
    }

    let order = &placed.receipt.order;
    let pretty = serde_json::to_string_pretty(order).unwrap_or_else(|_| order.to_string());
    println!("{}", pretty);

    println!(
        "Complete the payment on your checkout page with order {} and key {}.",
        placed.receipt.order_id().unwrap_or("<unknown>"),
        placed.receipt.key_id
    );
}

fn print_packs(packs: &[CreditPack]) {
    if packs.is_empty() {
        println!("No credit packs available.");
        return;
    }

    println!("Credit packs:");
    for pack in packs {
        println!("  {}", format_pack(pack));
    }
}

fn format_pack(pack: &CreditPack) -> String {
    let price = pack.amount as f64 / 100.0;
    if pack.currency.is_empty() {
        format!(
            "{} [{}]: {:.2} for {} credits",
            pack.label, pack.id, price, pack.credits
        )
    } else {
        format!(
            "{} [{}]: {} {:.2} for {} credits",
            pack.label, pack.id, pack.currency, price, pack.credits
        )
    }
}

fn print_signin_help() {
    println!("Create your tenant and account:");
    println!("  signup          create a tenant and sign in");
    println!("  login           sign in to an existing tenant");
    println!("  help            show this help");
    println!("  quit            leave");
}

fn print_dashboard_help() {
    println!("Dashboard commands:");
    println!("  credits         show the wallet balance");
    println!("  packs           list credit packs");
    println!("  buy <pack_id>   create a credit pack order");
    println!("  lead            register a lead");
    println!("  import <file>   bulk import leads from a CSV file");
    println!("  recharge <n>    manual credit top-up");
    println!("  help            show this help");
    println!("  quit            leave");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_commands() {
        assert_eq!(Command::parse("signup"), Command::SignUp);
        assert_eq!(Command::parse("login"), Command::LogIn);
        assert_eq!(Command::parse("credits"), Command::Credits);
        assert_eq!(Command::parse("packs"), Command::Packs);
        assert_eq!(Command::parse("lead"), Command::Lead);
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
    }

    #[test]
    fn parse_buy_takes_a_pack_id() {
        assert_eq!(Command::parse("buy growth_6000"), Command::Buy("growth_6000".to_string()));
        assert_eq!(Command::parse("buy 2"), Command::Buy("2".to_string()));
        assert!(matches!(Command::parse("buy"), Command::Unknown(_)));
    }

    #[test]
    fn parse_import_keeps_paths_with_spaces() {
        assert_eq!(
            Command::parse("import my leads.csv"),
            Command::Import(PathBuf::from("my leads.csv"))
        );
        assert!(matches!(Command::parse("import"), Command::Unknown(_)));
    }

    #[test]
    fn parse_recharge_requires_a_positive_amount() {
        assert_eq!(Command::parse("recharge 100"), Command::Recharge(100));
        assert!(matches!(Command::parse("recharge"), Command::Unknown(_)));
        assert!(matches!(Command::parse("recharge -5"), Command::Unknown(_)));
        assert!(matches!(Command::parse("recharge lots"), Command::Unknown(_)));
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        assert_eq!(Command::parse("  packs  "), Command::Packs);
        assert_eq!(Command::parse("buy   2"), Command::Buy("2".to_string()));
    }

    #[test]
    fn unauthenticated_screen_blocks_dashboard_commands() {
        assert!(!allowed(&Command::Credits, false));
        assert!(!allowed(&Command::Packs, false));
        assert!(!allowed(&Command::Buy("2".to_string()), false));
        assert!(!allowed(&Command::Lead, false));
        assert!(!allowed(&Command::Import(PathBuf::from("l.csv")), false));
        assert!(!allowed(&Command::Recharge(1), false));

        assert!(allowed(&Command::SignUp, false));
        assert!(allowed(&Command::LogIn, false));
        assert!(allowed(&Command::Help, false));
        assert!(allowed(&Command::Quit, false));
    }

    #[test]
    fn authenticated_screen_blocks_signin_commands() {
        assert!(!allowed(&Command::SignUp, true));
        assert!(!allowed(&Command::LogIn, true));

        assert!(allowed(&Command::Credits, true));
        assert!(allowed(&Command::Buy("2".to_string()), true));
        assert!(allowed(&Command::Quit, true));
    }

    #[test]
    fn pack_line_shows_major_units_and_credits() {
        let pack = CreditPack {
            id: "growth_6000".to_string(),
            label: "Growth".to_string(),
            amount: 5000,
            credits: 6000,
            currency: "INR".to_string(),
        };
        assert_eq!(format_pack(&pack), "Growth [growth_6000]: INR 50.00 for 6000 credits");
    }

    #[test]
    fn pack_line_without_currency() {
        let pack = CreditPack {
            id: "2".to_string(),
            label: "Starter".to_string(),
            amount: 1000,
            credits: 1000,
            currency: String::new(),
        };
        assert_eq!(format_pack(&pack), "Starter [2]: 10.00 for 1000 credits");
    }
}
