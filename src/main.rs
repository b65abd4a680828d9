// EstateHub - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Session restore
// 4. Command dispatch; every error is caught here and shown as a notice

use clap::{Args, Parser, Subcommand, ValueEnum};
use estatehub::app::chat::{ChatMessage, ChatSession};
use estatehub::app::session::{self, landing_route, NewUser, SessionStore};
use estatehub::app::state::AppState;
use estatehub::app::store::Marketplace;
use estatehub::core::content::{format_currency, truncate_text};
use estatehub::core::dashboard::Dashboard;
use estatehub::core::export::{export_csv, export_json, CsvRecord};
use estatehub::core::filter::{
    self, LeadCriteria, PriceRange, PropertyCriteria, Selection, ServiceCriteria, SortKey,
    TextQuery,
};
use estatehub::core::model::{Property, Role, User};
use estatehub::core::responder::Reply;
use estatehub::platform::api::{ApiClient, NewUserPayload};
use estatehub::platform::config::{load_config, PlatformPaths};
use estatehub::util::constants::{self, CLI_REPLY_WAIT_MS, SIMILAR_PROPERTY_COUNT};
use estatehub::util::error::{EstateError, ExportError, LookupError, Result};
use estatehub::util::logging;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

/// EstateHub - real-estate marketplace client.
///
/// Browse listings and partner services, manage leads, view role
/// dashboards and talk to PropertyBot.
#[derive(Parser, Debug)]
#[command(name = "estatehub", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Directory holding config.toml (overrides the platform default).
    #[arg(long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    /// Directory holding the persisted session (overrides the platform default).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List property listings.
    Properties(PropertyArgs),
    /// List partner services.
    Services(ServiceArgs),
    /// List CRM leads.
    Leads(LeadArgs),
    /// Show one property with its bundled services.
    Property { id: String },
    /// Show one lead with its communication log.
    Lead { id: String },
    /// Send a message to a listing's seller (buyers only).
    Contact { property_id: String, message: String },
    /// Log in by email.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in.
    Register {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
        /// buyer, seller, partner or admin.
        #[arg(long, default_value = "buyer")]
        role: String,
    },
    /// End the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Show the dashboard for the logged-in user's role.
    Dashboard,
    /// Talk to PropertyBot. Without MESSAGE, starts an interactive chat.
    Chat {
        message: Option<String>,
        /// Press a suggested-action button instead of typing.
        #[arg(long, conflicts_with = "message")]
        action: Option<String>,
        /// Seed for reproducible replies.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate listing copy or an assistant script.
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
        #[arg(long, global = true)]
        seed: Option<u64>,
    },
    /// Talk to the marketplace backend.
    Remote {
        #[command(subcommand)]
        action: RemoteCommand,
    },
}

#[derive(Subcommand, Debug)]
enum GenerateKind {
    /// Marketing copy for a property.
    Marketing { property_id: String },
    /// Assistant greeting script for a service offer.
    Chatbot { offer_id: String },
}

#[derive(Subcommand, Debug)]
enum RemoteCommand {
    /// GET /listings/
    Listings,
    /// GET /users/
    Users,
    /// Fetch listings and a buyer's contact requests together.
    Buyer { buyer_id: String },
    /// POST /users/
    CreateUser {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "buyer")]
        role: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Write the filtered rows to this file.
    #[arg(long)]
    export: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,
}

#[derive(Args, Debug)]
struct PropertyArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    /// any, a count, or N+ (4 and above always mean "or more").
    #[arg(long, default_value = "any")]
    bedrooms: String,
    /// all, available, pending or sold.
    #[arg(long, default_value = "all")]
    status: String,
    /// latest, price-asc or price-desc.
    #[arg(long, default_value = "latest")]
    sort: String,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[command(flatten)]
    export: ExportArgs,
}

#[derive(Args, Debug)]
struct ServiceArgs {
    #[arg(long, default_value = "")]
    search: String,
    /// all, decor, transport, internet, cleaning, security or other.
    #[arg(long, default_value = "all")]
    category: String,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long, default_value = "latest")]
    sort: String,
    #[command(flatten)]
    export: ExportArgs,
}

#[derive(Args, Debug)]
struct LeadArgs {
    #[arg(long, default_value = "")]
    search: String,
    /// all, pending, contacted or closed.
    #[arg(long, default_value = "all")]
    status: String,
    /// all, hot, warm or cold.
    #[arg(long, default_value = "all")]
    temperature: String,
    /// all, or a fragment of the lead's location (e.g. TX).
    #[arg(long, default_value = "all")]
    location: String,
    #[arg(long, default_value = "latest")]
    sort: String,
    #[command(flatten)]
    export: ExportArgs,
}

fn main() {
    let cli = Cli::parse();

    let paths = PlatformPaths::with_overrides(cli.config_dir.clone(), cli.data_dir.clone());
    let (config, config_warnings) = load_config(&paths.config_file);

    logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );
    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "EstateHub starting"
    );

    let mut sessions =
        SessionStore::seeded(Some(session::session_path(&paths.data_dir)));
    sessions.restore();

    let mut state = AppState::new(config, Marketplace::seeded(), sessions);

    if let Err(e) = run(cli.command, &mut state) {
        tracing::warn!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command, state: &mut AppState) -> Result<()> {
    match command {
        Command::Properties(args) => list_properties(state, &args),
        Command::Services(args) => list_services(state, &args),
        Command::Leads(args) => list_leads(state, &args),
        Command::Property { id } => {
            show_property(state, &id);
            Ok(())
        }
        Command::Lead { id } => {
            show_lead(state, &id);
            Ok(())
        }
        Command::Contact {
            property_id,
            message,
        } => {
            let request = state.send_contact_request(&property_id, &message)?;
            println!(
                "Request sent. Your contact request {} has been sent to the seller.",
                request.id
            );
            Ok(())
        }
        Command::Login { email, password } => {
            let user = state.sessions.login(&email, &password)?;
            println!(
                "Logged in as {} ({}). Dashboard: {}",
                user.name,
                user.role,
                landing_route(user.role)
            );
            Ok(())
        }
        Command::Register {
            name,
            email,
            password,
            role,
        } => {
            let role: Role = role.parse()?;
            let user = state.sessions.register(NewUser {
                name,
                email,
                password,
                role,
            })?;
            println!(
                "Welcome, {}! Your id is {}. Dashboard: {}",
                user.name,
                user.id,
                landing_route(user.role)
            );
            Ok(())
        }
        Command::Logout => {
            state.sessions.logout()?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            match state.sessions.current_user() {
                Some(user) => print_user(user),
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Command::Dashboard => {
            match state.dashboard() {
                Some(dashboard) => print_dashboard(&dashboard),
                None => println!("Log in to see your dashboard."),
            }
            Ok(())
        }
        Command::Chat {
            message,
            action,
            seed,
        } => {
            let mut chat = state.open_chat(seed);
            let result = match (message, action) {
                (Some(text), _) => one_shot_chat(&mut chat, |c| c.send(&text)),
                (None, Some(action_id)) => one_shot_chat(&mut chat, |c| c.invoke_action(&action_id)),
                (None, None) => interactive_chat(&mut chat),
            };
            chat.close();
            result
        }
        Command::Generate { kind, seed } => {
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            let text = match kind {
                GenerateKind::Marketing { property_id } => {
                    state.generate_marketing(&property_id, &mut rng)?
                }
                GenerateKind::Chatbot { offer_id } => state.generate_chatbot(&offer_id, &mut rng)?,
            };
            println!("{text}");
            Ok(())
        }
        Command::Remote { action } => run_remote(action, state),
    }
}

// =============================================================================
// Listing commands
// =============================================================================

fn parse_sort(value: &str) -> Result<SortKey> {
    Ok(value.parse::<SortKey>()?)
}

/// Build a price range from optional CLI bounds, filling gaps from `bounds`.
fn price_range(
    min: Option<f64>,
    max: Option<f64>,
    bounds: Option<PriceRange>,
) -> Option<PriceRange> {
    if min.is_none() && max.is_none() {
        return None;
    }
    let outer = bounds.unwrap_or(PriceRange::new(0.0, f64::MAX));
    Some(PriceRange::new(
        min.unwrap_or(outer.min),
        max.unwrap_or(outer.max),
    ))
}

fn list_properties(state: &mut AppState, args: &PropertyArgs) -> Result<()> {
    let criteria = PropertyCriteria {
        search: TextQuery::new(&args.search),
        price: price_range(args.min_price, args.max_price, state.price_bounds),
        bedrooms: args.bedrooms.parse()?,
        status: Selection::parse(&args.status)?,
    };
    state.set_property_filters(criteria, parse_sort(&args.sort)?);
    state.set_page(args.page);

    let labels = state.active_filter_labels();
    if !labels.is_empty() {
        println!("Filters: {}", labels.join(" | "));
    }

    let page = state.property_page();
    if page.total == 0 {
        println!("No properties match your filters.");
    }
    for property in &page.items {
        print_property_row(property);
    }
    println!(
        "Page {} of {} ({} properties)",
        page.page,
        page.total_pages.max(1),
        page.total
    );

    export_rows(&state.filtered_properties(), &args.export)
}

fn list_services(state: &AppState, args: &ServiceArgs) -> Result<()> {
    let offers = state.market.offers.as_slice();
    let criteria = ServiceCriteria {
        search: TextQuery::new(&args.search),
        category: Selection::parse(&args.category)?,
        price: price_range(args.min_price, args.max_price, PriceRange::spanning(offers)),
    };
    let rows = filter::filter_and_sort(offers, &criteria, parse_sort(&args.sort)?);

    let categories: Vec<&str> = filter::service_categories(offers)
        .iter()
        .map(|c| c.label())
        .collect();
    println!("Categories: {}", categories.join(", "));
    if rows.is_empty() {
        println!("No services match your filters.");
    }
    for offer in &rows {
        println!(
            "{:<8} {:<30} {:<10} {:>10}  by {}",
            offer.id,
            truncate_text(&offer.title, 30),
            offer.category.label(),
            format_currency(offer.price),
            offer.partner_name
        );
    }

    export_rows(&rows, &args.export)
}

fn list_leads(state: &AppState, args: &LeadArgs) -> Result<()> {
    let leads = state.market.leads.as_slice();
    let criteria = LeadCriteria {
        search: TextQuery::new(&args.search),
        status: Selection::parse(&args.status)?,
        temperature: Selection::parse(&args.temperature)?,
        location: LeadCriteria::location_filter(&args.location),
    };
    let rows = filter::filter_and_sort(leads, &criteria, parse_sort(&args.sort)?);

    println!("Regions: {}", filter::lead_regions(leads).join(", "));
    if rows.is_empty() {
        println!("No leads match your filters.");
    }
    for lead in &rows {
        println!(
            "{:<7} {:<16} {:<5} {:<10} {:<20} {}",
            lead.id,
            lead.name,
            lead.temperature.label(),
            lead.status.label(),
            lead.location,
            truncate_text(&lead.property_interest, 30)
        );
    }

    export_rows(&rows, &args.export)
}

fn export_rows<T: CsvRecord + Serialize>(
    rows: &[&T],
    args: &ExportArgs,
) -> Result<()> {
    let Some(path) = &args.export else {
        return Ok(());
    };
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;
    let writer = BufWriter::new(file);
    let count = match args.format {
        ExportFormat::Csv => export_csv(rows, writer, path)?,
        ExportFormat::Json => export_json(rows, writer, path)?,
    };
    tracing::info!(path = %path.display(), count, "Export complete");
    println!("Exported {count} rows to {}", path.display());
    Ok(())
}

// =============================================================================
// Detail views
// =============================================================================

fn print_not_found(e: &LookupError) {
    tracing::warn!(error = %e, "Lookup missed");
    println!("Not found: {e}");
}

fn show_property(state: &AppState, id: &str) {
    let property = match state.market.property(id) {
        Ok(p) => p,
        Err(e) => return print_not_found(&e),
    };

    println!("{}", property.title);
    println!("{}", property.location);
    println!(
        "{}  |  {} bd  {} ba  {} sqft  |  {}",
        format_currency(property.price),
        property.bedrooms,
        property.bathrooms,
        property.area,
        property.status.label()
    );
    println!();
    println!("{}", property.description);

    if let Ok(offers) = state.market.bundled_offers(id) {
        if !offers.is_empty() {
            println!();
            println!("Bundled services:");
            for offer in offers {
                println!(
                    "  {:<30} {:>10}  by {}",
                    offer.title,
                    format_currency(offer.price),
                    offer.partner_name
                );
            }
        }
    }

    let similar = state.market.similar_properties(id, SIMILAR_PROPERTY_COUNT);
    if !similar.is_empty() {
        println!();
        println!("Similar properties:");
        for other in similar {
            print_property_row(other);
        }
    }
}

fn show_lead(state: &AppState, id: &str) {
    let lead = match state.market.lead(id) {
        Ok(l) => l,
        Err(e) => return print_not_found(&e),
    };
    println!("{} <{}>  {}", lead.name, lead.email, lead.phone);
    println!(
        "{} lead from {} ({}), status {}",
        lead.temperature.label(),
        lead.location,
        lead.source,
        lead.status.label()
    );
    println!("Interested in: {}", lead.property_interest);
    println!("Notes: {}", lead.notes);

    let log = state.market.communications_for(id);
    if !log.is_empty() {
        println!();
        println!("Communication log:");
        for entry in log {
            println!(
                "  {}  {:<8} {}",
                entry.date.format("%Y-%m-%d"),
                entry.kind.label(),
                entry.content
            );
        }
    }
}

fn print_property_row(p: &Property) {
    println!(
        "{:<11} {:<32} {:>11}  {} bd  {:<10} {}",
        p.id,
        truncate_text(&p.title, 32),
        format_currency(p.price),
        p.bedrooms,
        p.status.label(),
        p.location
    );
}

fn print_user(user: &User) {
    println!("{} <{}>", user.name, user.email);
    println!(
        "id {}, role {}, member since {}",
        user.id,
        user.role,
        user.created_at.format("%Y-%m-%d")
    );
}

fn print_dashboard(dashboard: &Dashboard) {
    match dashboard {
        Dashboard::Buyer(b) => {
            println!("Buyer dashboard for {}", b.buyer.name);
            println!("Recent properties:");
            for p in &b.recent_properties {
                print_property_row(p);
            }
            println!("Your contact requests: {}", b.requests.len());
            for r in &b.requests {
                println!(
                    "  {} on {} [{}]",
                    r.id,
                    r.property_id.as_deref().unwrap_or("-"),
                    r.status.label()
                );
            }
        }
        Dashboard::Seller(s) => {
            println!("Seller dashboard for {}", s.seller.name);
            println!("Your listings: {}", s.properties.len());
            for p in &s.properties {
                print_property_row(p);
            }
            println!("Contact requests on your listings: {}", s.requests.len());
            for r in &s.requests {
                println!("  {} from {} [{}]", r.id, r.buyer_name, r.status.label());
            }
            println!("Marketing texts generated: {}", s.marketing.len());
        }
        Dashboard::Partner(p) => {
            println!("Partner dashboard for {}", p.partner.name);
            println!("Your services: {}", p.services.len());
            for o in &p.services {
                println!("  {:<30} {:>10}", o.title, format_currency(o.price));
            }
            println!(
                "Bundled into {} properties, potential revenue {}",
                p.bundling_properties.len(),
                format_currency(p.potential_revenue)
            );
            println!("Assistant scripts generated: {}", p.scripts.len());
        }
        Dashboard::Admin(a) => {
            println!("Admin dashboard");
            println!(
                "Users {}  Properties {}  Services {}  Requests {}  AI texts {}",
                a.stats.total_users,
                a.stats.total_properties,
                a.stats.total_offers,
                a.stats.total_requests,
                a.stats.total_ai_content
            );
            let by_role: Vec<String> = a
                .stats
                .users_by_role
                .iter()
                .map(|(role, n)| format!("{role}: {n}"))
                .collect();
            println!("Users by role: {}", by_role.join(", "));
            println!("Total listed value: {}", format_currency(a.total_property_value));
            println!("Latest users:");
            for u in &a.latest_users {
                println!("  {:<8} {:<16} {}", u.id, u.name, u.role);
            }
            println!("AI usage:");
            for usage in &a.ai_usage {
                println!(
                    "  {:<16} {} (last {})",
                    usage.user_name,
                    usage.count,
                    usage.last_used.format("%Y-%m-%d")
                );
            }
        }
    }
}

// =============================================================================
// Chat
// =============================================================================

fn print_reply(reply: &Reply) {
    println!("PropertyBot: {}", reply.text());
    match reply {
        Reply::PropertyCards { cards, .. } => {
            for card in cards {
                println!(
                    "  - {} ({}) {}",
                    card.title,
                    card.location,
                    format_currency(card.price)
                );
            }
        }
        Reply::ServiceCards { cards, .. } => {
            for card in cards {
                println!(
                    "  - {} by {} from {}",
                    card.title,
                    card.partner_name,
                    format_currency(card.price)
                );
            }
        }
        Reply::Text { .. } | Reply::Suggestions { .. } => {}
    }
    for action in reply.actions() {
        println!("  [{}] {}", action.action_id, action.label);
    }
}

fn print_bot_messages(messages: &[ChatMessage]) {
    for message in messages {
        if let ChatMessage::Bot { reply, .. } = message {
            print_reply(reply);
        }
    }
}

fn await_reply(chat: &mut ChatSession) {
    match chat.wait_for_reply(Duration::from_millis(CLI_REPLY_WAIT_MS)) {
        Some(ChatMessage::Bot { reply, .. }) => print_reply(reply),
        _ => println!("PropertyBot is not responding."),
    }
}

fn one_shot_chat(
    chat: &mut ChatSession,
    send: impl FnOnce(&mut ChatSession) -> bool,
) -> Result<()> {
    if send(chat) {
        await_reply(chat);
    } else {
        println!("Nothing to send.");
    }
    Ok(())
}

/// Read lines from stdin until EOF or "quit". "/id" presses an action.
fn interactive_chat(chat: &mut ChatSession) -> Result<()> {
    print_bot_messages(chat.messages());
    let stdin = std::io::stdin();
    let io_err = |e| EstateError::Io {
        path: PathBuf::from("<stdin>"),
        operation: "read chat input",
        source: e,
    };

    loop {
        print!("> ");
        std::io::stdout().flush().map_err(io_err)?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(io_err)? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        let sent = match line.strip_prefix('/') {
            Some(action_id) => chat.invoke_action(action_id),
            None => chat.send(line),
        };
        if sent {
            await_reply(chat);
        }
    }
    Ok(())
}

// =============================================================================
// Remote commands
// =============================================================================

fn run_remote(action: RemoteCommand, state: &mut AppState) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| EstateError::Io {
            path: PathBuf::from(&state.config.api_base_url),
            operation: "start async runtime",
            source: e,
        })?;
    let api = ApiClient::new(&state.config.api_base_url)?;
    tracing::debug!(base_url = api.base_url(), "Remote command");

    runtime.block_on(async {
        match action {
            RemoteCommand::Listings => {
                let listings = api.fetch_listings().await?;
                for p in &listings {
                    print_property_row(p);
                }
                println!("{} listings", listings.len());
            }
            RemoteCommand::Users => {
                let users = api.fetch_users().await?;
                for u in &users {
                    println!("{:<8} {:<20} {:<28} {}", u.id, u.name, u.email, u.role);
                }
                println!("{} users", users.len());
            }
            RemoteCommand::Buyer { buyer_id } => {
                state.refresh_buyer_feed(&api, &buyer_id).await?;
                let requests = state
                    .market
                    .requests
                    .iter()
                    .filter(|r| r.buyer_id == buyer_id)
                    .count();
                println!(
                    "Fetched {} listings and {} contact requests for {}",
                    state.market.properties.len(),
                    requests,
                    buyer_id
                );
            }
            RemoteCommand::CreateUser {
                name,
                email,
                password,
                role,
            } => {
                let payload = NewUserPayload {
                    name,
                    email,
                    password,
                    role: role.parse()?,
                };
                let user = api.create_user(&payload).await?;
                println!("Created {} ({})", user.name, user.id);
            }
        }
        Ok::<(), EstateError>(())
    })
}
