//! Integration tests.
//!
//! Tests cover:
//! - Report text through chart building (the 09:30 blue/long reference bar)
//! - Multi-interval chart loading from report files on disk
//! - A full simulated session replayed over a chart, exported as a CSV ledger
//! - Batch failure policy for a live-style session manager

mod common;

use chrono::{DateTime, FixedOffset};
use common::*;
use signaltrader::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use signaltrader::adapters::file_report_adapter::FileReportAdapter;
use signaltrader::domain::action::{EntryType, TradeAction};
use signaltrader::domain::chart::{build_chart, load_chart};
use signaltrader::domain::engine::{SimulatedSession, simulated_trade};
use signaltrader::domain::error::{FetchResource, TraderError};
use signaltrader::domain::market_time::MinuteKey;
use signaltrader::domain::metrics::LedgerSummary;
use signaltrader::domain::position::{StopLoss, StopLossKind};
use signaltrader::domain::report_parser::{ReportLayout, parse_report};
use signaltrader::domain::session::Session;
use signaltrader::domain::session_config::SessionConfig;
use signaltrader::domain::signal::{Direction, SignalColor, SignalInterval};
use signaltrader::domain::trade::ExitMethod;
use signaltrader::ports::ledger_port::LedgerPort;
use signaltrader::ports::session_port::SessionManager;
use std::fs;

const PRICE_ROWS: [&str; 4] = [
    "20200203\t93000\t8616.0\t8618.25\t8612.5\t8615.5\t163\t0",
    "20200203\t93100\t8615.5\t8620.0\t8615.0\t8619.75\t210\t0",
    "20200203\t93200\t8619.75\t8625.5\t8619.0\t8624.0\t187\t0",
    "20200203\t93300\t8624.0\t8624.5\t8610.25\t8611.0\t305\t0",
];

const SIGNAL_ROWS: [&str; 3] = [
    "20200203\t93000\t1\t0\t8572.75\t8650.25\t1\t0\t1\t0",
    "20200203\t93200\t1\t0\t8612.0\t8650.25\t1\t0\t1\t0",
    "20200203\t93300\t0\t1\t8572.75\t8630.0\t0\t1\t0\t1",
];

mod report_to_chart {
    use super::*;

    #[test]
    fn reference_bar_carries_blue_long_signal() {
        let text = report_text(&PRICE_ROWS[..1], &SIGNAL_ROWS[..1]);
        let report = parse_report(&text, &ReportLayout::default(), SignalInterval::OneMinute);
        let chart = build_chart("NQ", &report.candles, &[report.signals], None, None);

        assert_eq!(chart.len(), 1);
        let bar = chart.get(MinuteKey::from_time(&at(9, 30))).unwrap();
        assert_eq!(bar.id, MinuteKey::from_time(&bar.candle.time));
        assert_eq!(bar.candle.open, 8616.0);
        assert_eq!(bar.candle.close, 8615.5);
        assert_eq!(bar.candle.volume, 163);

        assert_eq!(bar.signals.len(), 1);
        let signal = &bar.signals[0];
        assert_eq!(signal.color, SignalColor::Blue);
        assert_eq!(signal.direction, Some(Direction::Long));
        assert_eq!(signal.stop, Some(8572.75));
    }

    #[test]
    fn load_chart_merges_interval_files() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("NQ_1m.txt"),
            report_text(&PRICE_ROWS, &SIGNAL_ROWS),
        )
        .unwrap();
        fs::write(
            dir.path().join("NQ_3m.txt"),
            report_text(&[], &["20200203\t93000\t0\t1\t0\t8640\t0\t1\t0\t0"]),
        )
        .unwrap();

        let port = FileReportAdapter::new(dir.path().to_path_buf(), ReportLayout::default());
        let chart = load_chart(&port, "NQ", Some(at(9, 30)), Some(at(9, 32))).unwrap();

        assert_eq!(chart.len(), 3);
        let first = chart.first_bar().unwrap();
        assert_eq!(first.signals.len(), 2);
        assert_eq!(first.signals[0].interval, SignalInterval::OneMinute);
        assert_eq!(first.signals[1].interval, SignalInterval::ThreeMinute);
        assert_eq!(first.signals[1].color, SignalColor::Red);
        assert_eq!(first.signals[1].stop, None);
        assert!(chart.get(MinuteKey::from_time(&at(9, 33))).is_none());
    }

    #[test]
    fn load_chart_requires_one_minute_report() {
        let port = MockDataPort::new();
        let result = load_chart(&port, "NQ", None, None);
        assert!(matches!(result, Err(TraderError::ReportRead { .. })));
    }
}

mod simulated_session {
    use super::*;

    fn engine() -> SimulatedSession {
        SimulatedSession::new(SessionConfig {
            point_value: 20.0,
            commission: 2.25,
            ..SessionConfig::default()
        })
    }

    #[test]
    fn open_then_force_close_leaves_one_trade_and_flat() {
        let mut e = engine();
        let p = make_position(Direction::Long, at(9, 31), 8616.0, 8572.75);
        e.process_actions(
            &at(9, 31),
            &[TradeAction::OpenPosition {
                position: p.clone(),
                entry_type: EntryType::NewSignal,
            }],
        )
        .unwrap();
        e.process_actions(
            &at(9, 40),
            &[TradeAction::ForceClosePosition {
                closed_position: p.clone(),
                closing_price: 8610.0,
                closing_time: at(9, 40),
                reason: ExitMethod::Manual,
            }],
        )
        .unwrap();

        let session = e.session();
        assert!(session.is_flat());
        assert_eq!(session.trades().len(), 1);
        assert_eq!(session.trades()[0].commission, 2.0 * p.commission);
    }

    #[test]
    fn replay_over_chart_and_export_ledger() {
        let text = report_text(&PRICE_ROWS, &SIGNAL_ROWS);
        let report = parse_report(&text, &ReportLayout::default(), SignalInterval::OneMinute);
        let chart = build_chart("NQ", &report.candles, &[report.signals], None, None);
        let mut e = engine();

        // Follow each bar's stop signal: open on the first, trail on agreement,
        // reverse when direction flips, flatten on the last bar.
        let bars: Vec<_> = chart.iter().cloned().collect();
        for (i, bar) in bars.iter().enumerate() {
            let time = bar.candle.time;
            let mut actions = Vec::new();
            let signal = bar.signals.iter().find(|s| s.direction.is_some());

            match (e.session().current_position().cloned(), signal) {
                (None, Some(s)) => actions.push(TradeAction::OpenPosition {
                    position: make_position(
                        s.direction.unwrap(),
                        time,
                        bar.candle.close,
                        s.stop.unwrap(),
                    ),
                    entry_type: EntryType::NewSignal,
                }),
                (Some(open), Some(s)) if Some(open.direction) == s.direction => {
                    actions.push(TradeAction::UpdateStop {
                        new_stop: StopLoss::new(s.stop.unwrap(), StopLossKind::TwoGreenBars),
                    })
                }
                (Some(open), Some(s)) => actions.push(TradeAction::ReversePosition {
                    old_position: open,
                    new_position: make_position(
                        s.direction.unwrap(),
                        time,
                        bar.candle.close,
                        s.stop.unwrap(),
                    ),
                    entry_type: EntryType::Reversal,
                }),
                (_, None) => actions.push(TradeAction::NoAction {
                    entry_type: None,
                    reason: "no stop signal".into(),
                }),
            }

            if i == bars.len() - 1 {
                if let Some(open) = e.session().current_position().cloned() {
                    // Reversal above may have replaced it within this batch.
                    let closing = match actions.last() {
                        Some(TradeAction::ReversePosition { new_position, .. }) => {
                            new_position.clone()
                        }
                        _ => open,
                    };
                    actions.push(TradeAction::ForceClosePosition {
                        closed_position: closing,
                        closing_price: bar.candle.close,
                        closing_time: time,
                        reason: ExitMethod::EndOfSession,
                    });
                }
            }

            let report = e.process_actions(&time, &actions).unwrap();
            assert_eq!(report.applied, actions.len());
        }

        let session = e.session();
        assert!(session.is_flat());
        let trades = session.trades();
        assert_eq!(trades.len(), 2);

        // Long from 09:30 close, stop trailed at 09:32, reversed at 09:33 close.
        assert_eq!(trades[0].direction, Direction::Long);
        assert_eq!(trades[0].ideal_entry_price, 8615.5);
        assert_eq!(trades[0].ideal_exit_price, 8611.0);
        assert_eq!(trades[0].exit_method, ExitMethod::Reversal);
        assert_eq!(trades[0].commission, 4.5);

        // Short opened and flattened on the same bar.
        assert_eq!(trades[1].direction, Direction::Short);
        assert_eq!(trades[1].exit_method, ExitMethod::EndOfSession);
        assert_eq!(trades[1].ideal_profit(), 0.0);

        let summary = LedgerSummary::compute(trades);
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.trades_lost, 2);
        assert!((summary.net_profit - (-4.5 * 20.0 - 9.0)).abs() < 1e-9);
        assert!((summary.net_profit - session.realized_profit_dollar()).abs() < 1e-9);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        CsvLedgerAdapter.write_trades(trades, &path).unwrap();
        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(rdr.records().count(), 2);
    }
}

mod batch_policy {
    use super::*;

    /// Live-style manager whose broker calls fail according to a script.
    struct ScriptedLiveSession {
        session: Session,
        point_value: f64,
        failures: Vec<Option<TraderError>>,
        calls: usize,
    }

    impl ScriptedLiveSession {
        fn new(failures: Vec<Option<TraderError>>) -> Self {
            Self {
                session: Session::new(),
                point_value: 20.0,
                failures,
                calls: 0,
            }
        }
    }

    impl SessionManager for ScriptedLiveSession {
        fn session(&self) -> &Session {
            &self.session
        }

        fn apply_action(
            &mut self,
            _bar_time: &DateTime<FixedOffset>,
            action: &TradeAction,
        ) -> Result<(), TraderError> {
            let scripted = self.failures.get_mut(self.calls).and_then(Option::take);
            self.calls += 1;
            if let Some(err) = scripted {
                return Err(err);
            }
            match action {
                TradeAction::OpenPosition { position, .. } => {
                    self.session.open(position.clone());
                }
                TradeAction::ForceClosePosition {
                    closed_position,
                    closing_price,
                    closing_time,
                    reason,
                }
                | TradeAction::VerifyPositionClosed {
                    closed_position,
                    closing_price,
                    closing_time,
                    reason,
                } => {
                    self.session.take_position();
                    self.session.record_trade(simulated_trade(
                        closed_position,
                        *closing_price,
                        *closing_time,
                        *reason,
                        self.point_value,
                    ));
                }
                _ => {}
            }
            Ok(())
        }
    }

    fn batch() -> Vec<TradeAction> {
        let p = make_position(Direction::Long, at(9, 31), 8616.0, 8600.0);
        vec![
            TradeAction::OpenPosition {
                position: p.clone(),
                entry_type: EntryType::NewSignal,
            },
            TradeAction::VerifyPositionClosed {
                closed_position: p,
                closing_price: 8600.0,
                closing_time: at(9, 31),
                reason: ExitMethod::StopLoss,
            },
            TradeAction::NoAction {
                entry_type: None,
                reason: "done".into(),
            },
        ]
    }

    #[test]
    fn clean_batch_applies_everything() {
        let mut live = ScriptedLiveSession::new(vec![]);
        let report = live.process_actions(&at(9, 31), &batch()).unwrap();
        assert_eq!(report.applied, 3);
        assert!(report.is_clean());
        assert_eq!(live.session().trades().len(), 1);
    }

    #[test]
    fn fatal_failure_aborts_remaining_actions() {
        let mut live = ScriptedLiveSession::new(vec![
            None,
            Some(TraderError::PositionNotClosed {
                attempts: 3,
                reason: "still long".into(),
            }),
        ]);
        let err = live.process_actions(&at(9, 31), &batch()).unwrap_err();

        assert!(matches!(err, TraderError::PositionNotClosed { .. }));
        assert_eq!(live.calls, 2);
        assert!(!live.session().is_flat());
        assert!(live.session().trades().is_empty());
    }

    #[test]
    fn informational_failure_is_reported_and_skipped() {
        let mut live = ScriptedLiveSession::new(vec![Some(TraderError::DataFetch {
            resource: FetchResource::Accounts,
            reason: "rate limited".into(),
        })]);
        let report = live.process_actions(&at(9, 31), &batch()).unwrap();

        assert_eq!(live.calls, 3);
        assert_eq!(report.applied, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn simulated_engine_never_fails() {
        let mut sim = SimulatedSession::new(SessionConfig::default());
        let report = sim.process_actions(&at(9, 31), &batch()).unwrap();
        assert_eq!(report.applied, 3);
        assert!(report.is_clean());
    }
}
