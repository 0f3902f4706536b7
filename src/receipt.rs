//! Receipt

use std::io;

use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::checkout::OrderSnapshot;

/// Errors that can occur while rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The receipt could not be written to the output.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Render an order snapshot as a printable text receipt: order metadata,
/// an item table, and the totals block.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing to `out` fails.
pub fn write_receipt(snapshot: &OrderSnapshot, mut out: impl io::Write) -> Result<(), ReceiptError> {
    writeln!(out, "Order #{}", snapshot.order_number())?;
    writeln!(out, "Placed {}", snapshot.placed_at().format("%d/%m/%Y"))?;
    writeln!(out, "Deliver to: {}", snapshot.venue())?;

    if let Some(code) = snapshot.promo_code() {
        writeln!(out, "Promo code: {code}")?;
    }

    if !snapshot.special_instructions().is_empty() {
        writeln!(out, "Instructions: {}", snapshot.special_instructions())?;
    }

    writeln!(
        out,
        "Est. delivery: {} min",
        snapshot.estimated_delivery_minutes()
    )?;
    writeln!(out)?;

    let mut builder = Builder::default();
    builder.push_record(["Item", "Details", "Qty", "Amount"]);

    for item in snapshot.items() {
        let mut details: SmallVec<[String; 2]> = SmallVec::new();
        details.push(item.size().to_string());

        if !item.toppings().is_empty() {
            details.push(item.toppings().join(", "));
        }

        builder.push_record([
            item.name().to_string(),
            details.join("\n"),
            item.quantity().to_string(),
            item.line_total().to_string(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::sharp())
        .modify(Columns::last(), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out)?;

    let pricing = snapshot.pricing();

    writeln!(out, "{:<16}{:>12}", "Subtotal", pricing.subtotal().to_string())?;
    writeln!(out, "{:<16}{:>12}", "GST (5%)", pricing.tax().to_string())?;
    writeln!(out, "{:<16}{:>12}", "Delivery", pricing.delivery_fee().to_string())?;

    if pricing.discount().to_minor_units() > 0 {
        writeln!(
            out,
            "{:<16}{:>12}",
            "Promo discount",
            format!("-{}", pricing.discount())
        )?;
    }

    writeln!(out, "{:<16}{:>12}", "Total", pricing.total_due().to_string())?;

    Ok(())
}
