//! Scripted storefront walkthrough.
//!
//! Seeds the demo showroom, signs in, builds a cart, exercises the discount
//! flow (one rejection, one grant) and completes a demo checkout. State is
//! kept in memory unless `--data-dir` points at a directory.

use std::{collections::BTreeMap, error::Error, path::PathBuf, sync::Arc, thread, time::Duration};

use clap::Parser;
use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use tabled::{Table, Tabled};

use forecourt::{
    fixtures,
    prelude::*,
    pricing,
};

#[derive(Debug, Parser)]
#[command(name = "forecourt-demo", about = "Forecourt storefront demo", long_about = None)]
struct Args {
    /// Directory for persisted session state; in-memory when omitted
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Shared secret for discount authorisation
    #[arg(long, default_value = "123456")]
    secret: String,

    /// Skip the simulated payment pause
    #[arg(long)]
    fast: bool,
}

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "Car")]
    car: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Addons")]
    addons: usize,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Line total")]
    total: String,
}

fn money(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::ILS).to_string()
}

fn cart_table(cart: &Cart) -> Table {
    let rows: Vec<CartRow> = cart
        .items()
        .iter()
        .map(|item| CartRow {
            car: item.car.name.clone(),
            quantity: item.quantity,
            addons: item.selected_addons.len(),
            discount: item
                .discount
                .as_ref()
                .map_or_else(|| "-".to_owned(), |grant| format!("{}%", grant.percentage)),
            total: money(pricing::line_total(item)),
        })
        .collect();

    Table::new(rows)
}

#[expect(clippy::print_stdout, reason = "demo output")]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let store: Arc<dyn Store> = match &args.data_dir {
        Some(dir) => Arc::new(JsonFileStore::open(dir)?),
        None => Arc::new(MemoryStore::new()),
    };
    fixtures::initialize(store.as_ref())?;

    let mut session = Session::with_policy(store, DiscountPolicy::with_secret(&args.secret));

    session.login("nathaniel", "123456")?;
    let signed_in = session
        .actor()
        .map_or_else(|| "nobody".to_owned(), |actor| actor.name);
    println!("Signed in as {signed_in}");

    let mut notes = BTreeMap::new();
    notes.insert("addon-special-1".to_owned(), "35% tint".to_owned());
    session.add_to_cart(
        "car-1",
        vec!["addon-sport-1".to_owned(), "addon-special-1".to_owned()],
        notes,
    )?;
    session.add_to_cart("car-3", Vec::new(), BTreeMap::new())?;

    println!("\n{}", cart_table(session.cart()));
    println!("Cart total: {}", money(session.cart_total()));

    let over_limit = session.apply_discount("car-1", 15, &args.secret)?;
    if let DiscountOutcome::Rejected(reason) = &over_limit {
        println!("\n15% on the S-Class: rejected ({reason})");
    }

    let granted = session.apply_discount("car-1", 10, &args.secret)?;
    if let DiscountOutcome::Granted(grant) = &granted {
        println!("10% on the S-Class: granted by {}", grant.granted_by);
    }

    println!("\n{}", cart_table(session.cart()));
    println!("Cart total: {}", money(session.cart_total()));

    session.begin_checkout()?;
    println!("\nProcessing payment...");
    if !args.fast {
        thread::sleep(Duration::from_millis(1500));
    }
    let summary = session.complete_checkout()?;

    println!(
        "Purchase complete: {} for {} item(s)",
        money(summary.total),
        summary.items_count
    );
    println!("Discount log holds {} entr(y/ies)", session.log().len());

    Ok(())
}
