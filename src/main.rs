use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use homefinder::assistant::AssistantConfig;
use homefinder::catalog::{self, POPULAR_LOCATIONS};
use homefinder::compare::group_thousands;
use homefinder::filter::{BedroomThreshold, CriteriaPatch, PropertyTypeFilter};
use homefinder::listing::{Listing, ListingId};
use homefinder::llm::{LlmClient, LlmJson};
use homefinder::mortgage::MortgageInputs;
use homefinder::session::Session;
use homefinder::sort::SortKey;
use homefinder::state::{Action, ViewState};

const HELP: &str = "\
commands:
  list                      show matching listings
  where <text>              location filter (city, state, or zip)
  popular <1-4>             jump to a popular location
  type <any|house|apartment|condo|plot>
  beds <any|1|2|3|4|5+>
  max <price>               price ceiling (slider, 50k steps)
  sort <default|price-asc|price-desc|size-asc|size-desc|newest>
  fav <id>                  toggle favorite
  show <id> | hide          listing detail
  compare <id> | clear | table
  chat                      open the assistant
  ask <text>                ask the assistant
  mortgage <price> <down> <rate%> <years>
  quit";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let store = match catalog::seed_store() {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "failed to load listings");
            std::process::exit(1);
        }
    };

    // Non-fatal: the assistant answers with the failure reply when unconfigured.
    let llm: Option<Arc<dyn LlmJson>> = match LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, assistant disabled");
            None
        }
    };

    let session = Arc::new(Session::new(ViewState::new(store), llm, AssistantConfig::from_env()));
    println!("{HELP}");
    print_listings(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let (cmd, arg) = line
            .trim()
            .split_once(' ')
            .map_or((line.trim(), ""), |(c, a)| (c, a.trim()));
        match cmd {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "list" => print_listings(&session),
            "ask" => match session.send_chat_message(arg) {
                Ok(handle) => {
                    println!("(assistant is thinking, other commands still work)");
                    let session = Arc::clone(&session);
                    tokio::spawn(async move {
                        if matches!(handle.await, Ok(true)) {
                            print_last_reply(&session);
                            print_listings(&session);
                        }
                    });
                }
                Err(notice) => println!("{notice}"),
            },
            "mortgage" => print_mortgage(arg),
            "table" => print_comparison(&session),
            _ => match parse_action(cmd, arg) {
                Some(action) => {
                    if let Err(notice) = session.dispatch(action) {
                        println!("{notice}");
                    }
                    after_action(&session, cmd);
                }
                None => println!("unrecognized command, type 'help'"),
            },
        }
    }
}

fn parse_action(cmd: &str, arg: &str) -> Option<Action> {
    let id = || arg.parse::<u32>().ok().map(ListingId);
    let action = match cmd {
        "where" => Action::SetCriteria(CriteriaPatch::location(arg)),
        "popular" => {
            let index = arg.parse::<usize>().ok()?.checked_sub(1)?;
            Action::SelectLocation((*POPULAR_LOCATIONS.get(index)?).to_string())
        }
        "type" => Action::SetCriteria(CriteriaPatch {
            property_type: Some(PropertyTypeFilter::parse(arg)),
            ..CriteriaPatch::default()
        }),
        "beds" => Action::SetCriteria(CriteriaPatch {
            bedrooms: Some(BedroomThreshold::parse(arg)),
            ..CriteriaPatch::default()
        }),
        "max" => Action::SetMaxPrice(arg.parse().ok()?),
        "sort" => Action::SetSort(SortKey::parse(arg)),
        "fav" => Action::ToggleFavorite(id()?),
        "show" => Action::OpenDetail(id()?),
        "hide" => Action::CloseDetail,
        "compare" => Action::ToggleCompare(id()?),
        "clear" => Action::ClearCompare,
        "chat" => Action::OpenChat,
        _ => return None,
    };
    Some(action)
}

fn after_action(session: &Session, cmd: &str) {
    match cmd {
        "show" | "fav" => session.read(|s| match s.detail() {
            Some(listing) => print_detail(listing),
            None if cmd == "show" => println!("no such listing"),
            None => {}
        }),
        "compare" | "clear" => session.read(|s| {
            if s.tray_visible() {
                let ids: Vec<String> = s.comparison().ids().iter().map(ToString::to_string).collect();
                println!("comparing [{}], {} slot(s) left", ids.join(", "), s.comparison().remaining());
            } else {
                println!("comparison tray empty");
            }
        }),
        "chat" => print_last_reply(session),
        _ => print_listings(session),
    }
}

fn print_listings(session: &Session) {
    session.read(|s| {
        println!("{}", s.projection().summary());
        for l in s.visible() {
            let star = if l.is_favorited { "*" } else { " " };
            println!(
                "{star} #{:<3} {:<9} ${:>11}  {} bd  {} ba  {:>7} sqft  {}, {}",
                l.id.0,
                l.property_type.label(),
                group_thousands(l.price),
                l.bedrooms,
                l.bathrooms,
                group_thousands(u64::from(l.area_sqft)),
                l.address.city,
                l.address.state,
            );
        }
    });
}

fn print_detail(l: &Listing) {
    println!(
        "#{} {} at {}, {}, {} {}\n  ${}  {} bd / {} ba / {} sqft  listed {}{}\n  {}",
        l.id,
        l.property_type,
        l.address.street,
        l.address.city,
        l.address.state,
        l.address.zip,
        group_thousands(l.price),
        l.bedrooms,
        l.bathrooms,
        group_thousands(u64::from(l.area_sqft)),
        l.date_listed,
        if l.is_favorited { "  (favorite)" } else { "" },
        l.description,
    );
}

fn print_comparison(session: &Session) {
    if let Err(notice) = session.dispatch(Action::OpenComparison) {
        println!("{notice}");
        return;
    }
    session.read(|s| {
        for row in s.comparison_rows() {
            println!("{:<14} {}", row.label, row.cells.join(" | "));
        }
    });
}

fn print_last_reply(session: &Session) {
    session.read(|s| {
        if let Some(message) = s.transcript().last() {
            println!("assistant: {}", message.content);
        }
    });
}

fn print_mortgage(arg: &str) {
    let mut inputs = MortgageInputs::default();
    let mut parts = arg.split_whitespace();
    if let Some(price) = parts.next().and_then(|p| p.parse().ok()) {
        inputs.set_price(price);
    }
    if let Some(down) = parts.next().and_then(|p| p.parse().ok()) {
        if !inputs.set_down_payment(down) {
            println!("down payment cannot exceed the price");
        }
    }
    if let Some(rate) = parts.next().and_then(|p| p.parse().ok()) {
        inputs.annual_rate_pct = rate;
    }
    if let Some(years) = parts.next().and_then(|p| p.parse().ok()) {
        inputs.term_years = years;
    }
    println!(
        "${} with ${} down ({:.0}%) at {:.2}% over {} years: ${:.2}/month (principal & interest)",
        group_thousands(inputs.price),
        group_thousands(inputs.down_payment),
        inputs.down_payment_pct(),
        inputs.annual_rate_pct,
        inputs.term_years,
        inputs.monthly_payment(),
    );
}
