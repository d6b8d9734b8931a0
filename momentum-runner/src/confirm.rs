//! Interactive recording of executed orders.
//!
//! Each order is put to the user as a y/n question. Only a `y` touches the
//! ledger, and each answer is saved before the next question is asked.

use chrono::NaiveDateTime;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use momentum_core::domain::{Order, OrderAction, OrderBook};
use momentum_core::ledger::{LedgerError, PositionLedger, PositionStore};

use crate::report::qty;

#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// What the user confirmed in one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmSummary {
    pub recorded: Vec<String>,
    pub closed: Vec<String>,
    pub adjusted: Vec<String>,
    pub declined: usize,
}

pub fn confirm_orders<S, R, W>(
    orders: &OrderBook,
    ledger: &mut PositionLedger<S>,
    input: &mut R,
    output: &mut W,
    now: NaiveDateTime,
) -> Result<ConfirmSummary, ConfirmError>
where
    S: PositionStore,
    R: BufRead,
    W: Write,
{
    let mut summary = ConfirmSummary::default();
    if orders.is_empty() {
        return Ok(summary);
    }

    writeln!(output, "\nRecord executed orders:")?;

    for o in &orders.buy_orders {
        let question = format!("Executed {} {} {}sh?", o.action, o.ticker, qty(o.shares));
        if ask(input, output, &question)? {
            ledger.apply(o, now)?;
            writeln!(output, "    ✓ {} recorded", o.ticker)?;
            summary.recorded.push(o.ticker.clone());
        } else {
            summary.declined += 1;
        }
    }

    for o in &orders.sell_orders {
        if ask(input, output, &format!("Closed {}?", o.ticker))? {
            ledger.apply(o, now)?;
            writeln!(output, "    ✓ {} removed", o.ticker)?;
            summary.closed.push(o.ticker.clone());
        } else {
            summary.declined += 1;
        }
    }

    for o in &orders.manage_orders {
        if ask(input, output, &manage_question(o))? {
            ledger.apply(o, now)?;
            writeln!(output, "    ✓ {} updated", o.ticker)?;
            summary.adjusted.push(o.ticker.clone());
        } else {
            summary.declined += 1;
        }
    }

    Ok(summary)
}

fn manage_question(o: &Order) -> String {
    match o.action {
        OrderAction::TakeProfit => {
            format!("Sold {} {}sh (take profit)?", o.ticker, qty(o.shares))
        }
        _ => format!("Moved {} stop to ${:.2}?", o.ticker, o.stop_loss),
    }
}

/// End of input counts as "no".
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "  {question} (y/n): ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
