//! The position state machine.
//!
//! `update_position` is a pure function: current position, signal, bar,
//! and realized equity in; next position and an optional closed trade out.
//! It holds no state between calls, which is what makes batch and
//! streaming execution bit-for-bit identical.
//!
//! Evaluation order within one bar is strict:
//! 1. stop-loss trigger, 2. take-profit trigger, 3. the signal.
//! A trigger closes at the trigger price and consumes the bar — the
//! signal is discarded entirely, even if it asked for a new position.

use crate::decimal::FixedDecimal;
use crate::domain::{
    ExitReason, NormalizedBar, Position, PositionSide, SignalAction, StrategySignal, Trade,
};
use crate::engine::cost::{CostModel, OrderSide};
use crate::engine::options::BacktestOptions;

/// Outcome of one state-machine step.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub position: Option<Position>,
    pub closed_trade: Option<Trade>,
}

/// Advance the position state machine by one bar.
///
/// `equity` is realized capital only; when a reversal closes and reopens
/// on the same bar, the new position is sized from equity *after*
/// crediting the closed trade's PnL.
pub fn update_position(
    position: Option<Position>,
    signal: &StrategySignal,
    bar: &NormalizedBar,
    index: usize,
    equity: FixedDecimal,
    options: &BacktestOptions,
) -> PositionUpdate {
    let costs = CostModel::from_options(options);

    if let Some(pos) = &position {
        if let Some(trade) = check_triggers(pos, bar, index, &costs) {
            return PositionUpdate {
                position: None,
                closed_trade: Some(trade),
            };
        }
    }

    match position {
        None => open_from_flat(signal, bar, index, equity, options, &costs),
        Some(pos) => match signal.action {
            SignalAction::Close => {
                let trade = close_position(&pos, bar.close, index, ExitReason::Signal, &costs);
                PositionUpdate {
                    position: None,
                    closed_trade: Some(trade),
                }
            }
            SignalAction::Long if pos.is_short() => {
                reverse(pos, PositionSide::Long, signal, bar, index, equity, options, &costs)
            }
            SignalAction::Short if pos.is_long() => {
                reverse(pos, PositionSide::Short, signal, bar, index, equity, options, &costs)
            }
            // Same-side and hold are no-ops; the position flows through
            // unchanged so callers can detect "no change" structurally.
            _ => PositionUpdate {
                position: Some(pos),
                closed_trade: None,
            },
        },
    }
}

/// Stop-loss strictly before take-profit; if both are crossed on the same
/// bar, the stop wins.
fn check_triggers(
    position: &Position,
    bar: &NormalizedBar,
    index: usize,
    costs: &CostModel,
) -> Option<Trade> {
    if let Some(stop) = position.stop_loss {
        let hit = match position.side {
            PositionSide::Long => bar.low <= stop,
            PositionSide::Short => bar.high >= stop,
        };
        if hit {
            return Some(close_position(position, stop, index, ExitReason::StopLoss, costs));
        }
    }
    if let Some(target) = position.take_profit {
        let hit = match position.side {
            PositionSide::Long => bar.high >= target,
            PositionSide::Short => bar.low <= target,
        };
        if hit {
            return Some(close_position(
                position,
                target,
                index,
                ExitReason::TakeProfit,
                costs,
            ));
        }
    }
    None
}

fn open_from_flat(
    signal: &StrategySignal,
    bar: &NormalizedBar,
    index: usize,
    equity: FixedDecimal,
    options: &BacktestOptions,
    costs: &CostModel,
) -> PositionUpdate {
    let position = match signal.action {
        SignalAction::Long => open_position(PositionSide::Long, signal, bar, index, equity, costs),
        SignalAction::Short if options.allow_short => {
            open_position(PositionSide::Short, signal, bar, index, equity, costs)
        }
        _ => None,
    };
    PositionUpdate {
        position,
        closed_trade: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn reverse(
    position: Position,
    new_side: PositionSide,
    signal: &StrategySignal,
    bar: &NormalizedBar,
    index: usize,
    equity: FixedDecimal,
    options: &BacktestOptions,
    costs: &CostModel,
) -> PositionUpdate {
    let trade = close_position(&position, bar.close, index, ExitReason::Signal, costs);
    let equity_after = equity + trade.pnl;
    let allowed = new_side == PositionSide::Long || options.allow_short;
    let position = if allowed {
        open_position(new_side, signal, bar, index, equity_after, costs)
    } else {
        None
    };
    PositionUpdate {
        position,
        closed_trade: Some(trade),
    }
}

/// Open at the bar close with entry-side slippage. A non-positive
/// effective size, non-positive equity, or zero fill price opens nothing.
fn open_position(
    side: PositionSide,
    signal: &StrategySignal,
    bar: &NormalizedBar,
    index: usize,
    equity: FixedDecimal,
    costs: &CostModel,
) -> Option<Position> {
    let size = signal
        .size
        .unwrap_or(FixedDecimal::ONE)
        .min(FixedDecimal::ONE);
    if !size.is_sign_positive() {
        return None;
    }
    let allocated = equity * size;
    if !allocated.is_sign_positive() {
        return None;
    }
    let entry_side = match side {
        PositionSide::Long => OrderSide::Buy,
        PositionSide::Short => OrderSide::Sell,
    };
    let entry_price = costs.fill_price(bar.close, entry_side);
    let quantity = allocated.checked_div(entry_price).ok()?;
    Some(Position {
        side,
        entry_price,
        quantity,
        size,
        entry_index: index,
        stop_loss: signal.stop_loss,
        take_profit: signal.take_profit,
    })
}

/// Close a position at `reference_price` (the pre-slippage reference:
/// the bar close for signal exits, the trigger price for stops and
/// take-profits). Exit slippage runs opposite to the entry; commission is
/// charged independently on entry and exit notional.
pub(crate) fn close_position(
    position: &Position,
    reference_price: FixedDecimal,
    exit_index: usize,
    exit_reason: ExitReason,
    costs: &CostModel,
) -> Trade {
    let exit_side = match position.side {
        PositionSide::Long => OrderSide::Sell,
        PositionSide::Short => OrderSide::Buy,
    };
    let exit_price = costs.fill_price(reference_price, exit_side);
    let gross = position.unrealized_pnl(exit_price);
    let fees = costs.commission(position.entry_price, position.quantity)
        + costs.commission(exit_price, position.quantity);
    let pnl = gross - fees;
    let return_rate = pnl
        .checked_div(position.cost_basis())
        .unwrap_or(FixedDecimal::ZERO);
    Trade {
        side: position.side,
        entry_price: position.entry_price,
        exit_price,
        size: position.size,
        quantity: position.quantity,
        pnl,
        return_rate,
        entry_index: position.entry_index,
        exit_index,
        exit_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fd(s: &str) -> FixedDecimal {
        s.parse().unwrap()
    }

    fn bar(close: &str) -> NormalizedBar {
        let c = fd(close);
        NormalizedBar::new(c, c, c, c, fd("1000"))
    }

    fn bar_ohlc(open: &str, high: &str, low: &str, close: &str) -> NormalizedBar {
        NormalizedBar::new(fd(open), fd(high), fd(low), fd(close), fd("1000"))
    }

    fn options() -> BacktestOptions {
        BacktestOptions::default()
    }

    #[test]
    fn long_from_flat_allocates_full_equity() {
        let update = update_position(
            None,
            &StrategySignal::long(),
            &bar("100"),
            0,
            fd("10000"),
            &options(),
        );
        let pos = update.position.unwrap();
        assert!(update.closed_trade.is_none());
        assert_eq!(pos.side, PositionSide::Long);
        assert_eq!(pos.entry_price, fd("100"));
        assert_eq!(pos.quantity, fd("100"));
        assert_eq!(pos.size, FixedDecimal::ONE);
        assert_eq!(pos.entry_index, 0);
    }

    #[test]
    fn entry_slippage_and_fractional_size() {
        let opts = options().with_slippage_rate(fd("0.001"));
        let signal = StrategySignal::long().with_size(fd("0.5"));
        let update = update_position(None, &signal, &bar("100"), 2, fd("10000"), &opts);
        let pos = update.position.unwrap();
        assert_eq!(pos.entry_price, fd("100.1"));
        let expected_qty = fd("5000").checked_div(fd("100.1")).unwrap();
        assert_eq!(pos.quantity, expected_qty);
        assert_eq!(pos.size, fd("0.5"));
    }

    #[test]
    fn short_from_flat_respects_allow_short() {
        let update = update_position(
            None,
            &StrategySignal::short(),
            &bar("100"),
            0,
            fd("10000"),
            &options().with_allow_short(false),
        );
        assert!(update.position.is_none());
        assert!(update.closed_trade.is_none());

        let update = update_position(
            None,
            &StrategySignal::short(),
            &bar("100"),
            0,
            fd("10000"),
            &options(),
        );
        let pos = update.position.unwrap();
        assert_eq!(pos.side, PositionSide::Short);
        // Short entry is a sell: slippage-free fill at the close here.
        assert_eq!(pos.entry_price, fd("100"));
    }

    #[test]
    fn close_and_hold_keep_flat_state() {
        for signal in [StrategySignal::close(), StrategySignal::hold()] {
            let update = update_position(None, &signal, &bar("100"), 0, fd("10000"), &options());
            assert!(update.position.is_none());
            assert!(update.closed_trade.is_none());
        }
    }

    #[test]
    fn hold_and_same_side_are_identity() {
        let opened = update_position(
            None,
            &StrategySignal::long(),
            &bar("100"),
            0,
            fd("10000"),
            &options(),
        )
        .position
        .unwrap();

        for signal in [StrategySignal::hold(), StrategySignal::long()] {
            let update = update_position(
                Some(opened.clone()),
                &signal,
                &bar("120"),
                5,
                fd("10000"),
                &options(),
            );
            assert_eq!(update.position.as_ref(), Some(&opened));
            assert!(update.closed_trade.is_none());
        }
    }

    #[test]
    fn close_signal_exits_long_at_bar_close() {
        let pos = update_position(
            None,
            &StrategySignal::long(),
            &bar("100"),
            0,
            fd("10000"),
            &options(),
        )
        .position
        .unwrap();

        let update = update_position(
            Some(pos),
            &StrategySignal::close(),
            &bar("110"),
            3,
            fd("10000"),
            &options(),
        );
        assert!(update.position.is_none());
        let trade = update.closed_trade.unwrap();
        assert_eq!(trade.exit_reason, ExitReason::Signal);
        assert_eq!(trade.exit_price, fd("110"));
        assert_eq!(trade.pnl, fd("1000"));
        assert_eq!(trade.return_rate, fd("0.1"));
        assert_eq!(trade.entry_index, 0);
        assert_eq!(trade.exit_index, 3);
    }

    #[test]
    fn reversal_sizes_from_post_close_equity() {
        let pos = update_position(
            None,
            &StrategySignal::long(),
            &bar("100"),
            0,
            fd("10000"),
            &options(),
        )
        .position
        .unwrap();

        // Long 100 @ 100, reversed short at 110: +1000 realized, so the
        // short is sized from 11000.
        let update = update_position(
            Some(pos),
            &StrategySignal::short(),
            &bar("110"),
            4,
            fd("10000"),
            &options(),
        );
        let trade = update.closed_trade.unwrap();
        assert_eq!(trade.pnl, fd("1000"));
        assert_eq!(trade.exit_reason, ExitReason::Signal);

        let pos = update.position.unwrap();
        assert_eq!(pos.side, PositionSide::Short);
        assert_eq!(pos.entry_index, 4);
        assert_eq!(pos.quantity, fd("100")); // 11000 / 110
    }

    #[test]
    fn reversal_to_short_blocked_without_allow_short() {
        let pos = update_position(
            None,
            &StrategySignal::long(),
            &bar("100"),
            0,
            fd("10000"),
            &options(),
        )
        .position
        .unwrap();

        let update = update_position(
            Some(pos),
            &StrategySignal::short(),
            &bar("110"),
            4,
            fd("10000"),
            &options().with_allow_short(false),
        );
        assert!(update.closed_trade.is_some());
        assert!(update.position.is_none());
    }

    #[test]
    fn short_reversal_to_long() {
        let pos = update_position(
            None,
            &StrategySignal::short(),
            &bar("100"),
            0,
            fd("10000"),
            &options(),
        )
        .position
        .unwrap();

        // Short 100 @ 100, price falls to 90: +1000 realized, long sized
        // from 11000.
        let update = update_position(
            Some(pos),
            &StrategySignal::long(),
            &bar("90"),
            2,
            fd("10000"),
            &options(),
        );
        let trade = update.closed_trade.unwrap();
        assert_eq!(trade.pnl, fd("1000"));
        let pos = update.position.unwrap();
        assert_eq!(pos.side, PositionSide::Long);
        let expected_qty = fd("11000").checked_div(fd("90")).unwrap();
        assert_eq!(pos.quantity, expected_qty);
    }

    #[test]
    fn stop_loss_fires_and_discards_signal() {
        let signal = StrategySignal::long().with_stop_loss(fd("95"));
        let pos = update_position(None, &signal, &bar("100"), 0, fd("10000"), &options())
            .position
            .unwrap();
        assert_eq!(pos.stop_loss, Some(fd("95")));

        // Bar trades down through the stop while the strategy still says
        // long: the trade closes at 95 and no new position opens.
        let update = update_position(
            Some(pos),
            &StrategySignal::long(),
            &bar_ohlc("98", "99", "90", "92"),
            1,
            fd("10000"),
            &options(),
        );
        assert!(update.position.is_none());
        let trade = update.closed_trade.unwrap();
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.exit_price, fd("95"));
        assert_eq!(trade.pnl, fd("-500"));
    }

    #[test]
    fn stop_loss_wins_over_take_profit_on_same_bar() {
        let signal = StrategySignal::long()
            .with_stop_loss(fd("95"))
            .with_take_profit(fd("105"));
        let pos = update_position(None, &signal, &bar("100"), 0, fd("10000"), &options())
            .position
            .unwrap();

        // The bar spans both levels; the stop is checked first and wins.
        let update = update_position(
            Some(pos),
            &StrategySignal::hold(),
            &bar_ohlc("100", "110", "90", "100"),
            1,
            fd("10000"),
            &options(),
        );
        let trade = update.closed_trade.unwrap();
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.exit_price, fd("95"));
    }

    #[test]
    fn take_profit_fires_at_target_price() {
        let signal = StrategySignal::long().with_take_profit(fd("105"));
        let pos = update_position(None, &signal, &bar("100"), 0, fd("10000"), &options())
            .position
            .unwrap();

        let update = update_position(
            Some(pos),
            &StrategySignal::hold(),
            &bar_ohlc("102", "108", "101", "103"),
            2,
            fd("10000"),
            &options(),
        );
        let trade = update.closed_trade.unwrap();
        assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
        assert_eq!(trade.exit_price, fd("105"));
        assert_eq!(trade.pnl, fd("500"));
    }

    #[test]
    fn short_triggers_are_mirrored() {
        let signal = StrategySignal::short()
            .with_stop_loss(fd("105"))
            .with_take_profit(fd("95"));
        let pos = update_position(None, &signal, &bar("100"), 0, fd("10000"), &options())
            .position
            .unwrap();

        // High pierces the short stop.
        let update = update_position(
            Some(pos.clone()),
            &StrategySignal::hold(),
            &bar_ohlc("101", "106", "100", "102"),
            1,
            fd("10000"),
            &options(),
        );
        let trade = update.closed_trade.unwrap();
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.exit_price, fd("105"));
        assert_eq!(trade.pnl, fd("-500"));

        // Low reaches the short take-profit.
        let update = update_position(
            Some(pos),
            &StrategySignal::hold(),
            &bar_ohlc("99", "100", "94", "96"),
            1,
            fd("10000"),
            &options(),
        );
        let trade = update.closed_trade.unwrap();
        assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
        assert_eq!(trade.exit_price, fd("95"));
        assert_eq!(trade.pnl, fd("500"));
    }

    #[test]
    fn exit_slippage_applies_on_top_of_trigger_price() {
        let opts = options().with_slippage_rate(fd("0.001"));
        let signal = StrategySignal::long().with_stop_loss(fd("95"));
        let pos = update_position(None, &signal, &bar("100"), 0, fd("10000"), &opts)
            .position
            .unwrap();

        let update = update_position(
            Some(pos),
            &StrategySignal::hold(),
            &bar_ohlc("96", "97", "94", "94"),
            1,
            fd("10000"),
            &opts,
        );
        let trade = update.closed_trade.unwrap();
        // Trigger price 95 is the pre-slippage reference; the long exit
        // sells, so it fills lower.
        assert_eq!(trade.exit_price, fd("95") * (FixedDecimal::ONE - fd("0.001")));
    }

    #[test]
    fn commission_charged_on_both_sides() {
        let opts = options().with_commission_rate(fd("0.001"));
        let pos = update_position(None, &StrategySignal::long(), &bar("100"), 0, fd("10000"), &opts)
            .position
            .unwrap();
        assert_eq!(pos.quantity, fd("100"));

        let update = update_position(
            Some(pos),
            &StrategySignal::close(),
            &bar("110"),
            1,
            fd("10000"),
            &opts,
        );
        let trade = update.closed_trade.unwrap();
        // gross 1000, entry fee 100*100*0.001 = 10, exit fee 110*100*0.001 = 11
        assert_eq!(trade.pnl, fd("979"));
        assert_eq!(trade.return_rate, fd("0.0979"));
    }

    #[test]
    fn non_positive_size_opens_nothing() {
        let signal = StrategySignal::long().with_size(FixedDecimal::ZERO);
        let update = update_position(None, &signal, &bar("100"), 0, fd("10000"), &options());
        assert!(update.position.is_none());
    }

    #[test]
    fn oversized_signal_clamps_to_full_equity() {
        let signal = StrategySignal::long().with_size(fd("2"));
        let update = update_position(None, &signal, &bar("100"), 0, fd("10000"), &options());
        let pos = update.position.unwrap();
        assert_eq!(pos.size, FixedDecimal::ONE);
        assert_eq!(pos.quantity, fd("100"));
    }

    #[test]
    fn zero_price_bar_opens_nothing() {
        let update = update_position(
            None,
            &StrategySignal::long(),
            &bar("0"),
            0,
            fd("10000"),
            &options(),
        );
        assert!(update.position.is_none());
    }

    #[test]
    fn return_rate_zero_on_zero_cost_basis() {
        let pos = Position {
            side: PositionSide::Long,
            entry_price: FixedDecimal::ZERO,
            quantity: fd("10"),
            size: FixedDecimal::ONE,
            entry_index: 0,
            stop_loss: None,
            take_profit: None,
        };
        let trade = close_position(
            &pos,
            fd("5"),
            1,
            ExitReason::Signal,
            &CostModel::frictionless(),
        );
        assert_eq!(trade.pnl, fd("50"));
        assert_eq!(trade.return_rate, FixedDecimal::ZERO);
    }
}
