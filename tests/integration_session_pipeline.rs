//! Integration tests for the staircase → fit → report pipeline.
//!
//! Purpose
//! -------
//! - Validate a whole experiment through the public API: a session is
//!   driven by a presenter, its log is fitted, thresholds are reported, and
//!   the log survives a trip through the CSV store.
//!
//! Coverage
//! --------
//! - `staircase::session::Session` with `ReplayPresenter` and
//!   `SimulatedObserver`, stop by trial count.
//! - `psychometric::fitter::PsychometricFitter` on curve data and on
//!   session logs, including degenerate logs.
//! - `psychometric::threshold::ThresholdReporter` inversion accuracy.
//! - `report::SessionReport` and `persistence` trial-log / aggregate table.
//!
//! Exclusions
//! ----------
//! - Local rules (step reduction, stop predicates, jitter) are covered by
//!   unit tests next to their code.
//! - Python bindings.
use rust_psychophysics::{
    persistence::{AggregateTable, read_trial_log, write_trial_log},
    psychometric::{
        FitFailure, FitOptions, LevelProportion, PsychometricFitter, ThresholdReporter, logistic,
    },
    report::SessionReport,
    staircase::{
        Direction, LevelBounds, ReplayPresenter, Response, ResponseLog, Session, SessionConfig,
        SimulatedObserver, StopReason, StopRules, Trial,
    },
};
use std::io::Cursor;

fn config_with_max_trials(max_trials: u32) -> SessionConfig {
    SessionConfig {
        stop_rules: StopRules::max_trials_only(max_trials).expect("positive trial budget"),
        ..SessionConfig::default()
    }
}

fn log_of(pairs: &[(i64, Response)]) -> ResponseLog {
    let trials = pairs
        .iter()
        .enumerate()
        .map(|(i, &(level, response))| Trial {
            trial_index: i as u32 + 1,
            staircase_id: i % 2,
            direction: if i % 2 == 0 { Direction::Ascending } else { Direction::Descending },
            level_presented: level,
            response,
        })
        .collect();
    ResponseLog::from_trials(trials).expect("valid log")
}

#[test]
// Purpose
// -------
// Reproduce the reference six-trial scenario exactly.
//
// Given
// -----
// - Bounds [17, 50], staircases at 17 (ascending) and 50 (descending),
//   step 5 / floor 1, decrement policy, max_trials = 6 only.
// - Responses 1, 0, 1, 0, 1, 0.
//
// Expect
// ------
// - Each answer pushes its staircase into the bound it already sits on, so
//   no level moves and nothing inverts.
// - Final levels 17 and 50, presented levels 17, 50, 17, 50, 17, 50,
//   stop on the trial-count clause after 6 trials.
fn six_trial_scenario_is_reproducible() {
    let mut session = Session::new("S01", config_with_max_trials(6)).expect("valid config");
    let mut presenter = ReplayPresenter::new(vec![1, 0, 1, 0, 1, 0]);

    let summary = session.run(&mut presenter).expect("replay covers the session");

    assert_eq!(summary.trials, 6);
    assert_eq!(summary.stop_reason, Some(StopReason::MaxTrials { trials: 6 }));
    assert_eq!(summary.total_inversions, 0);
    let finals: Vec<i64> = session.staircases().iter().map(|s| s.current_level()).collect();
    assert_eq!(finals, vec![17, 50]);
    assert!(session.staircases().iter().all(|s| s.step_size() == 5));
    let presented: Vec<i64> = session.log().iter().map(|t| t.level_presented).collect();
    assert_eq!(presented, vec![17, 50, 17, 50, 17, 50]);
    let ids: Vec<usize> = session.log().iter().map(|t| t.staircase_id).collect();
    assert_eq!(ids, vec![0, 1, 0, 1, 0, 1]);
    assert_eq!(presenter.remaining(), 0);
    assert!(session.is_finished());
    assert!(session.record_response(1).is_err());
}

#[test]
// Purpose
// -------
// Check that a session honors `max_trials` regardless of the answers.
//
// Given
// -----
// - max_trials = 10 and a replay that has 20 answers available.
//
// Expect
// ------
// - Exactly 10 trials logged, 10 answers left unused.
fn session_stops_at_max_trials() {
    let mut session = Session::new("S02", config_with_max_trials(10)).expect("valid config");
    let mut presenter = ReplayPresenter::new([1u8, 1, 0, 1, 0].repeat(4));

    let summary = session.run(&mut presenter).expect("enough answers");

    assert_eq!(summary.trials, 10);
    assert_eq!(summary.stop_reason, Some(StopReason::MaxTrials { trials: 10 }));
    assert_eq!(session.log().len(), 10);
    assert_eq!(presenter.remaining(), 10);
    for trial in session.log() {
        assert!((17..=50).contains(&trial.level_presented));
    }
}

#[test]
// Purpose
// -------
// Ensure a session whose bounds sit at the top of the i64 range records
// responses without overflowing.
//
// Given
// -----
// - Bounds (i64::MAX - 3, i64::MAX), default step 5, max_trials = 4.
// - Responses 0, 0, 0, 0 ("too small" on every trial).
//
// Expect
// ------
// - All four trials are recorded; both staircases end at i64::MAX.
fn session_at_extreme_bounds_clamps_upward() {
    let config = SessionConfig {
        bounds: LevelBounds::new(i64::MAX - 3, i64::MAX).expect("valid bounds"),
        ..config_with_max_trials(4)
    };
    let mut session = Session::new("S05", config).expect("valid config");

    for _ in 0..4 {
        session.record_response(0).expect("session still running");
    }

    assert!(session.is_finished());
    assert_eq!(session.log().len(), 4);
    assert!(session.staircases().iter().all(|s| s.current_level() == i64::MAX));
}

#[test]
// Purpose
// -------
// Verify noise-free logistic data recover the generating parameters and
// their thresholds invert back to the targets.
//
// Given
// -----
// - Proportions f(x; 30, 0.5) at every level 17..=50; default options.
// - Targets 0.5, 0.7 and 0.8.
//
// Expect
// ------
// - converged, |α̂ - 30| < 0.5, |β̂ - 0.5| < 0.05.
// - f(x_p; α̂, β̂) = p within 1e-6 for each target.
fn fit_recovers_noise_free_curve_and_thresholds_round_trip() {
    let points: Vec<LevelProportion> = (17..=50)
        .map(|level| {
            let x = level as f64;
            LevelProportion { level: x, proportion: logistic(x, 30.0, 0.5), n_trials: 1 }
        })
        .collect();

    let fit = PsychometricFitter::default().fit_points(&points);
    assert!(fit.converged, "failure: {:?}", fit.failure);
    assert!((fit.alpha - 30.0).abs() < 0.5);
    assert!((fit.beta - 0.5).abs() < 0.05);

    let table = ThresholdReporter::report(&fit, &[0.5, 0.7, 0.8]);
    assert_eq!(table.len(), 3);
    for entry in &table {
        let x = entry.level.expect("non-zero slope");
        assert!((logistic(x, fit.alpha, fit.beta) - entry.probability).abs() < 1e-6);
    }
}

#[test]
// Purpose
// -------
// Ensure degenerate session logs are reported, never raised.
//
// Given
// -----
// - The six-trial scenario log (levels 17 and 50, answers 1 and 0: a
//   reversed step with no intermediate level).
// - A log with every answer at one level.
//
// Expect
// ------
// - Non-converged results with NaN estimates and a failure reason; the
//   report has no curve and no thresholds.
fn degenerate_logs_yield_non_converged_results() {
    let mut session = Session::new("S03", config_with_max_trials(6)).expect("valid config");
    session.run(&mut ReplayPresenter::new(vec![1, 0, 1, 0, 1, 0])).expect("replay");
    let step_log = session.into_log();

    let fit = PsychometricFitter::default().fit(&step_log);
    assert!(!fit.converged);
    assert!(fit.alpha.is_nan());
    assert_eq!(fit.failure, Some(FitFailure::InsufficientDegreesOfFreedom { points: 2 }));

    let flat = log_of(&[(30, Response::TooLarge), (30, Response::TooSmall)]);
    let flat_fit = PsychometricFitter::default().fit(&flat);
    assert_eq!(flat_fit.failure, Some(FitFailure::InsufficientLevels { distinct: 1 }));

    let config = SessionConfig::default();
    let report = SessionReport::build(
        &step_log,
        &FitOptions::default(),
        &config.target_probabilities,
        &config.bounds,
    )
    .expect("valid grid");
    assert!(report.curve.is_none());
    assert!(report.thresholds.is_empty());
    assert_eq!(report.proportions.len(), 2);
}

#[test]
// Purpose
// -------
// Run a simulated subject end to end and fit the resulting log.
//
// Given
// -----
// - A SimulatedObserver with α = 30, β = 0.5 (seed 7); 300 trials.
//
// Expect
// ------
// - The fit converges with α̂ within 3 levels of 30; the report samples a
//   200-point curve.
fn simulated_observer_session_fits_near_true_threshold() {
    let config = config_with_max_trials(300);
    let mut session = Session::new("SIM", config.clone()).expect("valid config");
    let mut observer = SimulatedObserver::new(30.0, 0.5, 7);

    let summary = session.run(&mut observer).expect("observer never fails");
    assert_eq!(summary.trials, 300);
    assert!(summary.total_inversions > 0);

    let report = SessionReport::build(
        session.log(),
        &FitOptions::default(),
        &config.target_probabilities,
        &config.bounds,
    )
    .expect("valid grid");
    assert!(report.fit.converged, "failure: {:?}", report.fit.failure);
    assert!((report.fit.alpha - 30.0).abs() < 3.0);
    assert_eq!(report.curve.as_ref().map(Vec::len), Some(200));
    assert_eq!(report.thresholds.len(), 3);
}

#[test]
// Purpose
// -------
// Check that a stored log refits to the same result and feeds the
// cross-subject table.
//
// Given
// -----
// - A 60-trial simulated session written to and read from CSV in memory.
//
// Expect
// ------
// - Identical subject and log after reading; identical fit; the aggregate
//   table gets one row over 10..=50.
fn stored_log_refits_identically() {
    let mut session = Session::new("S04", config_with_max_trials(60)).expect("valid config");
    session.run(&mut SimulatedObserver::new(32.0, 0.4, 11)).expect("observer");
    let mut buf = Vec::new();

    write_trial_log(&mut buf, session.subject_id(), session.log()).expect("write");
    let stored = read_trial_log(Cursor::new(buf)).expect("read");

    assert_eq!(stored.subject, "S04");
    assert_eq!(&stored.log, session.log());
    let fitter = PsychometricFitter::default();
    assert_eq!(
        format!("{:?}", fitter.fit(&stored.log)),
        format!("{:?}", fitter.fit(session.log()))
    );

    let mut table = AggregateTable::default();
    table.upsert(&stored.subject, &stored.log).expect("valid subject");
    assert_eq!(table.len(), 1);
    assert_eq!(table.levels().first(), Some(&10));
    assert_eq!(table.levels().last(), Some(&50));
}
