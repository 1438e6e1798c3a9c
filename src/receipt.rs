//! Receipt

use std::io;

use rusty_money::Money;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::CartLine, pricing::PricedCart};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Printable view of a priced cart.
#[derive(Debug)]
pub struct Receipt<'p, 'a> {
    priced: &'p PricedCart<'a>,
}

impl<'p, 'a> Receipt<'p, 'a> {
    /// Create a receipt for `priced`.
    pub fn new(priced: &'p PricedCart<'a>) -> Self {
        Self { priced }
    }

    /// Write the line table and the summary to `out`.
    ///
    /// # Errors
    ///
    /// Returns a `ReceiptError::Io` if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Base Price", "Price", "Line Total", "Promotion"]);

        for line in self.priced.items() {
            builder.push_record(line_cells(line));
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..5), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "\n{table}")?;

        let subtotal = format!("{}", self.priced.subtotal());
        let total = format!("{}", self.priced.total());
        let savings = format!("{}", self.priced.savings());
        let width = subtotal.len().max(total.len()).max(savings.len());

        writeln!(out, " Subtotal:  {subtotal:>width$}")?;
        writeln!(out, "    Total:  {total:>width$}")?;
        writeln!(out, "  Savings:  {savings:>width$}")?;

        Ok(())
    }
}

fn line_cells(line: &CartLine<'_>) -> [String; 6] {
    let name = if line.is_free {
        format!("{} (free)", line.product.name)
    } else {
        line.product.name.clone()
    };

    let base_price = match line.original_price {
        Some(original) => format!("{original}"),
        None => String::new(),
    };

    let line_total = Money::from_minor(line.line_total_minor(), line.price().currency());

    [
        name,
        line.quantity.to_string(),
        base_price,
        format!("{}", line.price()),
        format!("{line_total}"),
        line.promotion_applied.clone().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::IDR;
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        pricing::price,
        products::{Catalog, Product},
        promotions::{
            Promotion,
            buy_x_get_y::BuyXGetYPromotion,
            tiered_price::{PriceTier, TieredPricePromotion},
        },
    };

    use super::*;

    #[test]
    fn write_to_renders_lines_and_summary() -> TestResult {
        let tea = Product::new("p-1", "TEH", "Teh Botol", Money::from_minor(500_000, IDR));
        let straw = Product::new("p-2", "SDT", "Sedotan", Money::from_minor(10_000, IDR));
        let catalog = Catalog::with_products([tea.clone(), straw], IDR)?;

        let promotions = [
            Promotion::tiered(
                "t-1",
                "Grosir Teh",
                TieredPricePromotion::new([PriceTier::new(6, Money::from_minor(450_000, IDR))]),
            ),
            Promotion::buy_x_get_y("b-1", "Sedotan Gratis", BuyXGetYPromotion::new(6, "SDT", 1)),
        ];

        let mut cart = Cart::new(IDR);
        cart.add(&tea, 6)?;

        let priced = price(&cart, &promotions, &catalog);

        let mut out = Vec::new();
        Receipt::new(&priced).write_to(&mut out)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Teh Botol"), "{rendered}");
        assert!(rendered.contains("Sedotan (free)"), "{rendered}");
        assert!(rendered.contains("Grosir Teh (6+)"), "{rendered}");
        assert!(rendered.contains("Subtotal:"), "{rendered}");
        assert!(rendered.contains("Savings:"), "{rendered}");

        Ok(())
    }
}
