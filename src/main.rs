//! Tally CLI
//!
//! Loads a fixture set, rings its cart up on a register and prints the
//! receipt. With `--checkout` the sale record is printed as YAML too.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use jiff::Timestamp;
use tally::{
    checkout::{CheckoutRequest, PaymentMethod},
    fixtures::{Fixture, products::parse_discount},
    logging::{self, LogFormat},
    receipt::Receipt,
};

#[derive(Debug, Parser)]
#[command(name = "tally", about = "Price a cart against a promotion set", long_about = None)]
struct Cli {
    /// Fixture base directory
    #[arg(short, long, env = "TALLY_FIXTURES", default_value = "./fixtures")]
    fixtures: PathBuf,

    /// Fixture set providing products and promotions
    #[arg(short, long, default_value = "grocery")]
    set: String,

    /// Cart fixture; defaults to the set name
    #[arg(short, long)]
    cart: Option<String>,

    /// Record the sale and print it
    #[arg(long)]
    checkout: bool,

    /// Manual discount, e.g. "10%" or "5000 IDR"
    #[arg(short, long, requires = "checkout")]
    discount: Option<String>,

    /// Payment method
    #[arg(short, long, value_enum, default_value_t = PaymentMethod::Cash)]
    payment: PaymentMethod,

    /// Customer name
    #[arg(long)]
    customer: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, cli.log_format)?;

    let mut fixture = Fixture::with_base_path(&cli.fixtures);

    fixture
        .load_products(&cli.set)?
        .load_promotions(&cli.set)?
        .load_cart(cli.cart.as_deref().unwrap_or(&cli.set))?;

    let cart = fixture.cart()?.clone();
    let mut register = fixture.into_register()?;

    for line in cart.iter() {
        register.add(&line.product.id, line.quantity)?;
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::new(register.priced()).write_to(&mut handle)?;

    if cli.checkout {
        let request = CheckoutRequest {
            discount: cli.discount.as_deref().map(parse_discount).transpose()?,
            payment_method: cli.payment,
            customer_name: cli.customer,
            ..CheckoutRequest::default()
        };

        let sale = register.checkout(request, Timestamp::now())?;

        writeln!(handle, "\n{}", sale.to_yaml()?)?;
    }

    Ok(())
}
