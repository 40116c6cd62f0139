mod common;

use std::{collections::HashMap, time::Duration};

use ath_core::{AnalysisContext, ExtremeLocator, Extremum, FallbackReason, Refinement, Seek};
use chrono::Timelike;
use common::{MinuteMode, MockProvider, daily_bars, day, minute_at, usd_info};

fn context(intraday: bool) -> AnalysisContext {
    AnalysisContext::from_instrument(&usd_info("TEST"), intraday).unwrap()
}

fn provider(minute: MinuteMode) -> MockProvider {
    MockProvider::new(usd_info("TEST"), daily_bars(&[1.0, 2.0])).with_minute(minute)
}

fn assert_close_fallback(refinement: &Refinement, expected: FallbackReason) {
    match refinement {
        Refinement::Fallback { timestamp, reason } => {
            assert_eq!(reason, &expected);
            assert_eq!((timestamp.hour(), timestamp.minute()), (16, 0));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn refined_to_the_later_of_equal_minutes() {
    let d = day(3);
    let bars = vec![
        minute_at(d, 9, 30, 101.0, 99.0),
        minute_at(d, 11, 5, 103.0, 100.0),
        minute_at(d, 14, 40, 103.0, 101.0),
        minute_at(d, 15, 59, 102.0, 101.5),
    ];
    let p = provider(MinuteMode::Bars(HashMap::from([(d, bars)])));
    let ctx = context(true);
    let locator = ExtremeLocator::new(&p, &ctx);

    let high = locator.locate(d, Seek::High).await;
    assert!(high.is_refined());
    assert_eq!(
        (high.timestamp().hour(), high.timestamp().minute()),
        (14, 40)
    );

    let low = locator.locate(d, Seek::Low).await;
    assert_eq!((low.timestamp().hour(), low.timestamp().minute()), (9, 30));
    assert_eq!(p.minute_calls(), 2);
}

#[tokio::test]
async fn fetch_error_falls_back_to_market_close() {
    let p = provider(MinuteMode::Fail);
    let ctx = context(true);
    let refinement = ExtremeLocator::new(&p, &ctx).locate(day(3), Seek::High).await;

    match &refinement {
        Refinement::Fallback {
            reason: FallbackReason::FetchFailed(message),
            ..
        } => assert!(message.contains("minute data unavailable")),
        other => panic!("expected fetch failure, got {other:?}"),
    }
    assert_eq!(refinement.timestamp().date_naive(), day(3));
    assert_eq!(refinement.timestamp().hour(), 16);
}

#[tokio::test]
async fn empty_minutes_fall_back() {
    let p = provider(MinuteMode::Bars(HashMap::new()));
    let ctx = context(true);
    let refinement = ExtremeLocator::new(&p, &ctx).locate(day(5), Seek::Low).await;
    assert_close_fallback(&refinement, FallbackReason::NoData);
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out() {
    let p = provider(MinuteMode::Hang(Duration::from_secs(60)));
    let ctx = context(true);
    let refinement = ExtremeLocator::new(&p, &ctx).locate(day(5), Seek::High).await;
    assert_close_fallback(&refinement, FallbackReason::TimedOut);
}

#[tokio::test]
async fn closing_mode_never_fetches() {
    let d = day(3);
    let p = provider(MinuteMode::Bars(HashMap::from([(
        d,
        vec![minute_at(d, 10, 0, 5.0, 4.0)],
    )])));
    let ctx = context(false);
    let locator = ExtremeLocator::new(&p, &ctx);

    let refinement = locator.locate(d, Seek::High).await;
    assert_close_fallback(&refinement, FallbackReason::IntradayDisabled);
    assert_eq!(p.minute_calls(), 0);
}

#[tokio::test]
async fn refinement_keeps_the_daily_price() {
    let d = day(3);
    let p = provider(MinuteMode::Bars(HashMap::from([(
        d,
        vec![minute_at(d, 10, 0, 250.0, 240.0)],
    )])));
    let ctx = context(true);
    let locator = ExtremeLocator::new(&p, &ctx);

    let mut ath = Extremum::new(d, 249.5);
    locator.refine(&mut ath, Seek::High).await;
    assert_eq!(ath.price, 249.5);
    assert_eq!(ath.date, d);
    assert!(ath.refinement.as_ref().unwrap().is_refined());
}

#[tokio::test]
async fn fallback_is_deterministic_for_either_seek() {
    let p = provider(MinuteMode::Fail);
    let ctx = context(true);
    let locator = ExtremeLocator::new(&p, &ctx);

    let high = locator.locate(day(9), Seek::High).await;
    let low = locator.locate(day(9), Seek::Low).await;
    assert_eq!(high.timestamp(), low.timestamp());
    assert_eq!(high, locator.locate(day(9), Seek::High).await);
}
