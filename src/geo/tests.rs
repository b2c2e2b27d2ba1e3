#[cfg(test)]
mod sun_times_tests {
    use crate::geo::solar::*;
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};

    fn at_utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Local)
    }

    fn local(h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 21, h, 0, 0).unwrap()
    }

    /// Noon in New York on the June solstice: sunset comes before the next sunrise.
    #[test]
    fn test_midday_new_york_sunset_is_next() {
        let now = at_utc(2024, 6, 21, 16, 0);
        let times = compute_sun_times(40.7128, -74.0060, now, 0).unwrap();

        assert!(times.sunrise() > now);
        assert!(times.sunset() > now);
        assert_eq!(times.next_motion(), Motion::Sunset);
        assert!(times.sunset() - now < Duration::hours(12));
        assert!(times.sunrise() - now < Duration::hours(24));
    }

    /// Two in the morning in New York: sunrise comes first.
    #[test]
    fn test_night_new_york_sunrise_is_next() {
        let now = at_utc(2024, 6, 21, 6, 0);
        let times = compute_sun_times(40.7128, -74.0060, now, 0).unwrap();

        assert_eq!(times.next_motion(), Motion::Sunrise);
        assert!(times.sunrise() - now < Duration::hours(6));
    }

    /// Shifting back a day yields events that already happened.
    #[test]
    fn test_day_shift_moves_reference_back() {
        let now = at_utc(2024, 6, 21, 16, 0);
        let today = compute_sun_times(40.7128, -74.0060, now, 0).unwrap();
        let yesterday = compute_sun_times(40.7128, -74.0060, now, 1).unwrap();

        let reference = now - Duration::days(1);
        assert!(yesterday.sunrise() > reference);
        assert!(yesterday.sunset() > reference);
        assert!(yesterday.sunrise() < today.sunrise());
        assert!(yesterday.sunset() < today.sunset());
        assert!(yesterday.latest() <= now);
    }

    #[test]
    fn test_equatorial_location() {
        let now = at_utc(2024, 3, 20, 0, 0);
        let times = compute_sun_times(1.3521, 103.8198, now, 0).unwrap();

        // Roughly twelve hours of daylight all year
        let gap = (times.sunset() - times.sunrise()).abs();
        assert!(gap > Duration::hours(10) && gap < Duration::hours(14));
    }

    #[test]
    fn test_southern_hemisphere_winter() {
        let now = at_utc(2024, 6, 21, 0, 0);
        let times = compute_sun_times(-33.9249, 18.4241, now, 0).unwrap();
        assert!(times.sunrise() > now);
        assert!(times.sunset() > now);
    }

    #[test]
    fn test_polar_night_is_an_error() {
        let now = at_utc(2024, 12, 21, 12, 0);
        let result = compute_sun_times(78.2232, 15.6267, now, 0);
        assert!(matches!(result, Err(crate::Error::Computation { .. })));
    }

    #[test]
    fn test_midnight_sun_is_an_error() {
        let now = at_utc(2024, 6, 21, 12, 0);
        let result = compute_sun_times(78.2232, 15.6267, now, 0);
        assert!(matches!(result, Err(crate::Error::Computation { .. })));
    }

    const TROMSO: (f64, f64) = (69.6492, 18.9553);

    /// The last days of the midnight sun, just after Tromsø's first sunsets.
    #[test]
    fn test_end_of_midnight_sun_is_error_or_sunset() {
        for day in [23, 24] {
            let now = at_utc(2024, 7, day, 10, 0);
            match compute_sun_times(TROMSO.0, TROMSO.1, now, 0) {
                Ok(times) => assert_eq!(times.next_motion(), Motion::Sunset, "at {now}"),
                Err(e) => assert!(matches!(e, crate::Error::Computation { .. }), "{e}"),
            }
        }
    }

    /// Around local noon the sun is up all summer, so sunset must come first.
    #[test]
    fn test_polar_day_edges_never_pick_sunrise_at_noon() {
        let days = (10..=31)
            .map(|d| (5, d))
            .chain((1..=31).map(|d| (7, d)))
            .chain((1..=10).map(|d| (8, d)));
        for (month, day) in days {
            let now = at_utc(2024, month, day, 10, 0);
            if let Ok(times) = compute_sun_times(TROMSO.0, TROMSO.1, now, 0) {
                assert_eq!(times.next_motion(), Motion::Sunset, "at {now}");
                assert!(times.sunset() > now && times.sunrise() > times.sunset());
            }
        }
    }

    /// Around local midnight the sun is down all winter, so sunrise must come first.
    #[test]
    fn test_polar_night_edges_never_pick_sunset_at_midnight() {
        let days = (15..=30)
            .map(|d| (2024, 11, d))
            .chain((1..=31).map(|d| (2024, 12, d)))
            .chain((1..=25).map(|d| (2025, 1, d)));
        for (year, month, day) in days {
            let now = at_utc(year, month, day, 22, 45);
            if let Ok(times) = compute_sun_times(TROMSO.0, TROMSO.1, now, 0) {
                assert_eq!(times.next_motion(), Motion::Sunrise, "at {now}");
            }
        }
    }

    /// Looking back from inside polar day finds no transition to anchor on.
    #[test]
    fn test_shifted_reference_inside_polar_day_is_an_error() {
        let now = at_utc(2024, 7, 1, 10, 0);
        assert!(matches!(
            compute_sun_times(TROMSO.0, TROMSO.1, now, 1),
            Err(crate::Error::Computation { .. })
        ));
    }

    #[test]
    fn test_invalid_coordinates_are_an_error() {
        let now = at_utc(2024, 6, 21, 12, 0);
        assert!(compute_sun_times(95.0, 0.0, now, 0).is_err());
        assert!(compute_sun_times(0.0, 200.0, now, 0).is_err());
    }

    #[test]
    fn test_provider_matches_free_function() {
        let now = at_utc(2024, 9, 1, 12, 0);
        let provider = SunriseCalculator;
        assert_eq!(
            provider.sun_times(51.5074, -0.1278, now, 1).unwrap(),
            compute_sun_times(51.5074, -0.1278, now, 1).unwrap()
        );
    }

    #[test]
    fn test_next_motion_ordering() {
        let earlier_sunset = SunTimes::new(local(23), local(18));
        assert_eq!(earlier_sunset.next_motion(), Motion::Sunset);

        let earlier_sunrise = SunTimes::new(local(5), local(18));
        assert_eq!(earlier_sunrise.next_motion(), Motion::Sunrise);
    }

    #[test]
    fn test_tie_resolves_to_sunset() {
        let tied = SunTimes::new(local(12), local(12));
        assert_eq!(tied.next_motion(), Motion::Sunset);
        let order: Vec<Motion> = tied.iter().map(|(m, _)| m).collect();
        assert_eq!(order, vec![Motion::Sunset, Motion::Sunrise]);
    }

    #[test]
    fn test_latest_and_iter() {
        let times = SunTimes::new(local(5), local(18));
        assert_eq!(times.latest(), local(18));
        assert_eq!(times.get(Motion::Sunrise), local(5));

        let collected: Vec<_> = times.iter().collect();
        assert_eq!(
            collected,
            vec![(Motion::Sunrise, local(5)), (Motion::Sunset, local(18))]
        );
    }

    #[test]
    fn test_motion_display_pads() {
        assert_eq!(format!("{:>7}", Motion::Sunset), " sunset");
        assert_eq!(Motion::Sunrise.to_string(), "sunrise");
    }
}

#[cfg(test)]
mod display_tests {
    use crate::geo::display::*;
    use crate::geo::solar::SunTimes;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_describe_sun_times_orders_events() {
        let sunrise = Local.with_ymd_and_hms(2024, 6, 22, 5, 25, 0).unwrap();
        let sunset = Local.with_ymd_and_hms(2024, 6, 21, 20, 31, 0).unwrap();
        let text = describe_sun_times(&SunTimes::new(sunrise, sunset));
        assert_eq!(
            text,
            "Sunset @ 24-06-21 08:31 PM, Sunrise @ 24-06-22 05:25 AM"
        );
    }
}
