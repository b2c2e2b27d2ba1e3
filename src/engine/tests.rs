use super::*;
use crate::backend::MockAppearanceSetter;
use crate::error::Error;
use crate::geo::solar::MockSolarTimeProvider;
use crate::state::MockStateStore;
use crate::time_source::FixedTimeSource;
use chrono::TimeZone;
use mockall::predicate::eq;
use std::path::PathBuf;

const LAT: f64 = 40.7128;
const LON: f64 = -74.0060;

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 6, day, hour, minute, 0)
        .unwrap()
}

/// Yesterday-shifted events whose latest instant is 06:00 on the 21st.
fn yesterday_times() -> SunTimes {
    SunTimes::new(at(21, 6, 0), at(20, 20, 30))
}

/// Seen from noon: sunset tonight comes before sunrise tomorrow.
fn daytime_times() -> SunTimes {
    SunTimes::new(at(22, 5, 25), at(21, 20, 31))
}

/// Seen from 02:00: sunrise comes before sunset.
fn nighttime_times() -> SunTimes {
    SunTimes::new(at(21, 5, 25), at(21, 20, 31))
}

fn solar_with(yesterday: SunTimes, today: SunTimes) -> MockSolarTimeProvider {
    let mut solar = MockSolarTimeProvider::new();
    solar
        .expect_sun_times()
        .withf(|_, _, _, shift| *shift == 1)
        .returning(move |_, _, _, _| Ok(yesterday));
    solar
        .expect_sun_times()
        .withf(|_, _, _, shift| *shift == 0)
        .returning(move |_, _, _, _| Ok(today));
    solar
}

fn store_with(last_update: Option<DateTime<Local>>) -> MockStateStore {
    let mut store = MockStateStore::new();
    store.expect_read().returning(move || Ok(last_update));
    store
}

fn named_setter() -> MockAppearanceSetter {
    let mut setter = MockAppearanceSetter::new();
    setter.expect_backend_name().return_const("mock");
    setter
}

#[test]
fn test_skips_when_updated_after_last_movement() {
    let solar = solar_with(yesterday_times(), daytime_times());
    let mut store = store_with(Some(at(21, 7, 0)));
    store.expect_write().times(0);
    let mut setter = named_setter();
    setter.expect_set_appearance().times(0);
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    let outcome = engine.update_appearance(LAT, LON, false).unwrap();

    assert_eq!(
        outcome,
        Outcome::Skipped {
            last_movement: at(21, 6, 0),
            last_update: at(21, 7, 0),
        }
    );
    assert_eq!(outcome.appearance(), None);
}

#[test]
fn test_skip_does_not_query_current_sun_times() {
    let mut solar = MockSolarTimeProvider::new();
    solar
        .expect_sun_times()
        .withf(|_, _, _, shift| *shift == 1)
        .times(1)
        .returning(|_, _, _, _| Ok(yesterday_times()));
    solar
        .expect_sun_times()
        .withf(|_, _, _, shift| *shift == 0)
        .times(0);
    let store = store_with(Some(at(21, 7, 0)));
    let setter = named_setter();
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    assert!(matches!(
        engine.update_appearance(LAT, LON, false).unwrap(),
        Outcome::Skipped { .. }
    ));
}

#[test]
fn test_force_overrides_skip() {
    let now = at(21, 12, 0);
    let solar = solar_with(yesterday_times(), daytime_times());
    let mut store = store_with(Some(at(21, 7, 0)));
    store.expect_write().with(eq(now)).times(1).returning(|_| Ok(()));
    let mut setter = named_setter();
    setter
        .expect_set_appearance()
        .with(eq(Appearance::Light))
        .times(1)
        .returning(|_| Ok(()));
    let clock = FixedTimeSource::new(now);

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    let outcome = engine.update_appearance(LAT, LON, true).unwrap();

    assert_eq!(
        outcome,
        Outcome::Applied {
            appearance: Appearance::Light,
            next_motion: Motion::Sunset,
            times: daytime_times(),
            recorded_at: now,
        }
    );
}

#[test]
fn test_sunrise_next_sets_dark() {
    let solar = solar_with(
        SunTimes::new(at(20, 5, 24), at(20, 20, 30)),
        nighttime_times(),
    );
    let mut store = store_with(Some(at(20, 19, 0)));
    store.expect_write().times(1).returning(|_| Ok(()));
    let mut setter = named_setter();
    setter
        .expect_set_appearance()
        .with(eq(Appearance::Dark))
        .times(1)
        .returning(|_| Ok(()));
    let clock = FixedTimeSource::new(at(21, 2, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    let outcome = engine.update_appearance(LAT, LON, false).unwrap();
    assert_eq!(outcome.appearance(), Some(Appearance::Dark));
}

#[test]
fn test_first_run_acts() {
    let solar = solar_with(yesterday_times(), daytime_times());
    let mut store = store_with(None);
    store.expect_write().times(1).returning(|_| Ok(()));
    let mut setter = named_setter();
    setter
        .expect_set_appearance()
        .times(1)
        .returning(|_| Ok(()));
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    assert!(matches!(
        engine.update_appearance(LAT, LON, false).unwrap(),
        Outcome::Applied { .. }
    ));
}

#[test]
fn test_update_at_exact_movement_acts() {
    // Only an update strictly after the transition suppresses the run
    let solar = solar_with(yesterday_times(), daytime_times());
    let mut store = store_with(Some(at(21, 6, 0)));
    store.expect_write().times(1).returning(|_| Ok(()));
    let mut setter = named_setter();
    setter
        .expect_set_appearance()
        .times(1)
        .returning(|_| Ok(()));
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    assert!(matches!(
        engine.update_appearance(LAT, LON, false).unwrap(),
        Outcome::Applied { .. }
    ));
}

#[test]
fn test_setter_failure_leaves_state_untouched() {
    let solar = solar_with(yesterday_times(), daytime_times());
    let mut store = store_with(None);
    store.expect_write().times(0);
    let mut setter = named_setter();
    setter.expect_set_appearance().times(1).returning(|_| {
        Err(Error::AppearanceSet {
            backend: "mock",
            reason: "denied".into(),
        })
    });
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    let result = engine.update_appearance(LAT, LON, false);
    assert!(matches!(result, Err(Error::AppearanceSet { .. })));
}

#[test]
fn test_state_parse_error_propagates() {
    let solar = solar_with(yesterday_times(), daytime_times());
    let mut store = MockStateStore::new();
    store.expect_read().returning(|| {
        Err(Error::StateParse {
            path: PathBuf::from("last-update.json"),
            value: "\"soon\"".into(),
        })
    });
    store.expect_write().times(0);
    let mut setter = named_setter();
    setter.expect_set_appearance().times(0);
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    assert!(matches!(
        engine.update_appearance(LAT, LON, false),
        Err(Error::StateParse { .. })
    ));
}

#[test]
fn test_computation_error_propagates_before_reading_state() {
    let mut solar = MockSolarTimeProvider::new();
    solar.expect_sun_times().returning(|lat, lon, _, _| {
        Err(Error::Computation {
            latitude: lat,
            longitude: lon,
            reason: "the sun does not rise".into(),
        })
    });
    let mut store = MockStateStore::new();
    store.expect_read().times(0);
    store.expect_write().times(0);
    let mut setter = named_setter();
    setter.expect_set_appearance().times(0);
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    assert!(matches!(
        engine.update_appearance(78.2, 15.6, false),
        Err(Error::Computation { .. })
    ));
}

#[test]
fn test_dry_run_plans_without_side_effects() {
    let solar = solar_with(yesterday_times(), daytime_times());
    let mut store = store_with(None);
    store.expect_write().times(0);
    let mut setter = named_setter();
    setter.expect_set_appearance().times(0);
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock).with_dry_run(true);
    assert_eq!(
        engine.update_appearance(LAT, LON, false).unwrap(),
        Outcome::Planned {
            appearance: Appearance::Light,
            next_motion: Motion::Sunset,
            times: daytime_times(),
        }
    );
}

#[test]
fn test_write_failure_is_reported() {
    let solar = solar_with(yesterday_times(), daytime_times());
    let mut store = store_with(None);
    store.expect_write().times(1).returning(|_| {
        Err(Error::StateWrite {
            path: PathBuf::from("/read-only/last-update.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
    });
    let mut setter = named_setter();
    setter
        .expect_set_appearance()
        .times(1)
        .returning(|_| Ok(()));
    let clock = FixedTimeSource::new(at(21, 12, 0));

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    assert!(matches!(
        engine.update_appearance(LAT, LON, false),
        Err(Error::StateWrite { .. })
    ));
}

#[test]
fn test_solar_queries_use_clock_time() {
    let now = at(21, 12, 0);
    let mut solar = MockSolarTimeProvider::new();
    solar
        .expect_sun_times()
        .withf(move |lat, lon, at_time, _| *lat == LAT && *lon == LON && *at_time == now)
        .times(2)
        .returning(|_, _, _, shift| {
            Ok(if shift == 1 {
                yesterday_times()
            } else {
                daytime_times()
            })
        });
    let mut store = store_with(None);
    store.expect_write().returning(|_| Ok(()));
    let mut setter = named_setter();
    setter.expect_set_appearance().returning(|_| Ok(()));
    let clock = FixedTimeSource::new(now);

    let engine = AppearanceEngine::new(&solar, &store, &setter, &clock);
    engine.update_appearance(LAT, LON, false).unwrap();
}

#[test]
fn test_appearance_for_motion() {
    assert_eq!(appearance_for(Motion::Sunrise), Appearance::Dark);
    assert_eq!(appearance_for(Motion::Sunset), Appearance::Light);
}
