// Forecast mapper - pure derivation of view aggregates from raw forecasts
//
// Every function here is a total, deterministic function of its arguments.
// Malformed-looking input (empty point lists, missing optional fields)
// degrades to zeroed or neutral outputs instead of erroring, so callers
// never need a failure path around derivation.
use crate::domain::station::AltitudeBand;
use crate::domain::weather::{
    Condition, CurrentObservation, Forecast, ForecastPoint, Period, PeriodSummary, SkiingWindow,
};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, Utc};

/// Points for one band, in their original order. No dedup, no sorting.
pub fn filter_by_band(forecast: &Forecast, band: AltitudeBand) -> Vec<ForecastPoint> {
    forecast
        .points
        .iter()
        .filter(|p| p.band == band)
        .cloned()
        .collect()
}

/// Summaries for today, tomorrow and the coming weekend, in that order.
/// A period with no points in bounds yields a zeroed summary rather than
/// being omitted. Calendar bounds are computed in UTC from `now`.
pub fn generate_summaries(
    forecast: &Forecast,
    band: AltitudeBand,
    now: DateTime<Utc>,
) -> Vec<PeriodSummary> {
    let band_points = filter_by_band(forecast, band);

    [Period::Today, Period::Tomorrow, Period::Weekend]
        .into_iter()
        .map(|period| {
            let (start, end) = period_bounds(period, now);
            let in_period: Vec<ForecastPoint> = band_points
                .iter()
                .filter(|p| p.timestamp >= start && p.timestamp <= end)
                .cloned()
                .collect();
            summarize(period, &in_period)
        })
        .collect()
}

/// Dominant condition over a point set. Branch order matters: mixed
/// precipitation outranks snow alone, even when both thresholds are met.
pub fn dominant_condition(points: &[ForecastPoint]) -> Condition {
    if points.is_empty() {
        return Condition::Clear;
    }

    let snow_sum: f64 = points.iter().map(|p| p.snow_cm).sum();
    let rain_sum: f64 = points.iter().map(|p| p.rain_mm).sum();
    let mean_cloud: f64 =
        points.iter().map(|p| p.cloud_pct.unwrap_or(0.0)).sum::<f64>() / points.len() as f64;

    if snow_sum > 5.0 && rain_sum > 2.0 {
        Condition::Mix
    } else if snow_sum > 2.0 {
        Condition::Snow
    } else if rain_sum > 5.0 {
        Condition::Rain
    } else if mean_cloud > 70.0 {
        Condition::Cloudy
    } else {
        Condition::Clear
    }
}

/// Best 3-sample window for a band, or None with fewer than 3 points.
/// Windows slide over the band-filtered points in their original array
/// order; ties keep the earliest window. Output score is scaled to 0-100.
pub fn find_best_skiing_window(forecast: &Forecast, band: AltitudeBand) -> Option<SkiingWindow> {
    let points = filter_by_band(forecast, band);
    if points.len() < 3 {
        return None;
    }

    let mut best_score = f64::NEG_INFINITY;
    let mut best_window: Option<&[ForecastPoint]> = None;
    for window in points.windows(3) {
        let score = window_score(window);
        // Strictly greater: ties keep the earliest window
        if score > best_score {
            best_score = score;
            best_window = Some(window);
        }
    }

    best_window.map(|window| SkiingWindow {
        start: window[0].timestamp,
        end: window[2].timestamp,
        score: (best_score * 100.0).round() as i64,
    })
}

/// Band-adjusted view of the current observation. The temperature offset
/// is a fixed placeholder (-3 at top, +2 at base), and only the snow depth
/// matching the selected band survives.
pub fn adjust_observation(now: &CurrentObservation, band: AltitudeBand) -> CurrentObservation {
    let mut adjusted = now.clone();
    match band {
        AltitudeBand::Top => {
            adjusted.temp_c -= 3.0;
            adjusted.snow_base_cm = None;
        }
        AltitudeBand::Base => {
            adjusted.temp_c += 2.0;
            adjusted.snow_top_cm = None;
        }
        AltitudeBand::Mid => {}
    }
    adjusted
}

fn window_score(window: &[ForecastPoint]) -> f64 {
    let n = window.len() as f64;
    let mean_wind = window.iter().map(|p| p.wind_kmh).sum::<f64>() / n;
    let mean_snow = window.iter().map(|p| p.snow_cm).sum::<f64>() / n;
    let mean_visibility = window
        .iter()
        .map(|p| p.visibility_m.map(f64::from).unwrap_or(5000.0))
        .sum::<f64>()
        / n;
    let mean_confidence = window.iter().map(|p| p.confidence).sum::<f64>() / n;

    let wind_score = if mean_wind >= 60.0 {
        0.0
    } else {
        1.0 - mean_wind / 60.0
    };
    let snow_score = if mean_snow > 15.0 {
        0.8
    } else {
        mean_snow / 15.0
    };
    let visibility_score = (mean_visibility / 3000.0).min(1.0);

    0.4 * wind_score + 0.3 * snow_score + 0.2 * visibility_score + 0.1 * mean_confidence
}

fn summarize(period: Period, points: &[ForecastPoint]) -> PeriodSummary {
    if points.is_empty() {
        return PeriodSummary {
            period,
            temp_min_c: 0.0,
            temp_max_c: 0.0,
            snow_accum_cm: 0,
            wind_max_kmh: 0.0,
            condition: Condition::Clear,
            confidence: 0.0,
        };
    }

    PeriodSummary {
        period,
        temp_min_c: points.iter().map(|p| p.temp_c).fold(f64::INFINITY, f64::min),
        temp_max_c: points
            .iter()
            .map(|p| p.temp_c)
            .fold(f64::NEG_INFINITY, f64::max),
        snow_accum_cm: points.iter().map(|p| p.snow_cm).sum::<f64>().round() as i64,
        wind_max_kmh: points
            .iter()
            .map(|p| p.wind_kmh)
            .fold(f64::NEG_INFINITY, f64::max),
        condition: dominant_condition(points),
        confidence: points.iter().map(|p| p.confidence).sum::<f64>() / points.len() as f64,
    }
}

fn period_bounds(period: Period, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    match period {
        Period::Today => (now, day_end(today)),
        Period::Tomorrow => {
            let tomorrow = today + Days::new(1);
            (day_start(tomorrow), day_end(tomorrow))
        }
        Period::Weekend => {
            // 0 = Sunday .. 6 = Saturday; on a Saturday this resolves to
            // zero days ahead, i.e. the weekend starts today.
            let weekday = now.weekday().num_days_from_sunday();
            let days_until_saturday = (7 + 6 - weekday) % 7;
            let saturday = today + Days::new(u64::from(days_until_saturday));
            (day_start(saturday), day_end(saturday + Days::new(1)))
        }
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date) + Duration::seconds(86_399)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Wednesday
    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 6, 0, 0).unwrap()
    }

    fn point(hours_ahead: i64, band: AltitudeBand) -> ForecastPoint {
        ForecastPoint {
            timestamp: base_time() + Duration::hours(hours_ahead),
            band,
            temp_c: -2.0,
            wind_kmh: 10.0,
            gust_kmh: 15.0,
            snow_cm: 0.0,
            rain_mm: 0.0,
            iso_zero_m: Some(1800),
            cloud_pct: Some(20.0),
            visibility_m: Some(5000),
            confidence: 1.0,
        }
    }

    fn forecast(points: Vec<ForecastPoint>) -> Forecast {
        Forecast {
            station: "baqueira-beret".to_string(),
            generated_at: base_time(),
            horizon_hours: 72,
            points,
            snow_24h_cm: 0.0,
            snow_72h_cm: 0.0,
        }
    }

    #[test]
    fn test_filter_by_band_preserves_order() {
        let f = forecast(vec![
            point(0, AltitudeBand::Top),
            point(1, AltitudeBand::Mid),
            point(2, AltitudeBand::Top),
            point(3, AltitudeBand::Base),
        ]);

        let top = filter_by_band(&f, AltitudeBand::Top);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|p| p.band == AltitudeBand::Top));
        assert!(top[0].timestamp < top[1].timestamp);
        assert!(filter_by_band(&f, AltitudeBand::Base).len() <= f.points.len());
    }

    #[test]
    fn test_empty_period_yields_zeroed_summary() {
        let summaries = generate_summaries(&forecast(vec![]), AltitudeBand::Mid, base_time());

        assert_eq!(summaries.len(), 3);
        for summary in summaries {
            assert_eq!(summary.temp_min_c, 0.0);
            assert_eq!(summary.temp_max_c, 0.0);
            assert_eq!(summary.snow_accum_cm, 0);
            assert_eq!(summary.wind_max_kmh, 0.0);
            assert_eq!(summary.condition, Condition::Clear);
            assert_eq!(summary.confidence, 0.0);
        }
    }

    #[test]
    fn test_summaries_aggregate_today_points() {
        let f = forecast(vec![
            // An hour in the past: "today" starts at now, so excluded
            ForecastPoint { temp_c: -10.0, ..point(-1, AltitudeBand::Mid) },
            ForecastPoint { temp_c: -4.0, snow_cm: 3.4, ..point(2, AltitudeBand::Mid) },
            ForecastPoint { temp_c: 1.0, snow_cm: 2.2, wind_kmh: 35.0, ..point(10, AltitudeBand::Mid) },
            // Tomorrow, not today
            ForecastPoint { temp_c: -7.0, ..point(20, AltitudeBand::Mid) },
            // Right band, different day; wrong band, same day
            ForecastPoint { temp_c: 5.0, ..point(2, AltitudeBand::Base) },
        ]);

        let summaries = generate_summaries(&f, AltitudeBand::Mid, base_time());
        let today = &summaries[0];
        assert_eq!(today.period, Period::Today);
        assert_eq!(today.temp_min_c, -4.0);
        assert_eq!(today.temp_max_c, 1.0);
        assert_eq!(today.snow_accum_cm, 6); // 5.6 rounded
        assert_eq!(today.wind_max_kmh, 35.0);
        assert_eq!(today.condition, Condition::Snow);

        let tomorrow = &summaries[1];
        assert_eq!(tomorrow.period, Period::Tomorrow);
        assert_eq!(tomorrow.temp_min_c, -7.0);
    }

    #[test]
    fn test_summaries_are_deterministic() {
        let f = forecast(vec![
            point(0, AltitudeBand::Mid),
            ForecastPoint { snow_cm: 4.0, ..point(5, AltitudeBand::Mid) },
            point(30, AltitudeBand::Mid),
        ]);

        let first = generate_summaries(&f, AltitudeBand::Mid, base_time());
        let second = generate_summaries(&f, AltitudeBand::Mid, base_time());
        assert_eq!(first, second);
    }

    #[test]
    fn test_weekend_window_midweek() {
        // Wednesday Jan 8 -> weekend is Sat Jan 11 00:00 through Sun Jan 12 23:59:59
        let f = forecast(vec![
            ForecastPoint {
                timestamp: Utc.with_ymd_and_hms(2025, 1, 11, 0, 0, 0).unwrap(),
                snow_cm: 8.0,
                ..point(0, AltitudeBand::Mid)
            },
            ForecastPoint {
                timestamp: Utc.with_ymd_and_hms(2025, 1, 12, 23, 59, 59).unwrap(),
                snow_cm: 2.0,
                ..point(0, AltitudeBand::Mid)
            },
            // Monday after
            ForecastPoint {
                timestamp: Utc.with_ymd_and_hms(2025, 1, 13, 0, 0, 0).unwrap(),
                snow_cm: 50.0,
                ..point(0, AltitudeBand::Mid)
            },
        ]);

        let weekend = generate_summaries(&f, AltitudeBand::Mid, base_time())
            .into_iter()
            .find(|s| s.period == Period::Weekend)
            .unwrap();
        assert_eq!(weekend.snow_accum_cm, 10);
    }

    #[test]
    fn test_weekend_starts_today_on_saturday() {
        // Saturday Jan 4: the modulo resolves to zero days ahead, so the
        // weekend window must start this very day, not next week.
        let saturday = Utc.with_ymd_and_hms(2025, 1, 4, 10, 0, 0).unwrap();
        let f = forecast(vec![
            // Before `now` but after Saturday 00:00 - still in the weekend
            ForecastPoint {
                timestamp: Utc.with_ymd_and_hms(2025, 1, 4, 8, 0, 0).unwrap(),
                snow_cm: 4.0,
                ..point(0, AltitudeBand::Mid)
            },
            // Next Saturday is outside this weekend window
            ForecastPoint {
                timestamp: Utc.with_ymd_and_hms(2025, 1, 11, 8, 0, 0).unwrap(),
                snow_cm: 40.0,
                ..point(0, AltitudeBand::Mid)
            },
        ]);

        let weekend = generate_summaries(&f, AltitudeBand::Mid, saturday)
            .into_iter()
            .find(|s| s.period == Period::Weekend)
            .unwrap();
        assert_eq!(weekend.snow_accum_cm, 4);
    }

    #[test]
    fn test_dominant_condition_priority_mix_over_snow() {
        // snow-sum 6 alone would read as Snow, but rain-sum 3 makes it Mix
        let points = vec![
            ForecastPoint { snow_cm: 6.0, rain_mm: 3.0, ..point(0, AltitudeBand::Mid) },
        ];
        assert_eq!(dominant_condition(&points), Condition::Mix);
    }

    #[test]
    fn test_dominant_condition_ladder() {
        let snow = vec![ForecastPoint { snow_cm: 2.5, ..point(0, AltitudeBand::Mid) }];
        assert_eq!(dominant_condition(&snow), Condition::Snow);

        let rain = vec![ForecastPoint { rain_mm: 5.5, ..point(0, AltitudeBand::Mid) }];
        assert_eq!(dominant_condition(&rain), Condition::Rain);

        // Null cloud cover counts as zero in the mean
        let cloudy = vec![
            ForecastPoint { cloud_pct: Some(90.0), ..point(0, AltitudeBand::Mid) },
            ForecastPoint { cloud_pct: Some(80.0), ..point(1, AltitudeBand::Mid) },
        ];
        assert_eq!(dominant_condition(&cloudy), Condition::Cloudy);

        let half_null = vec![
            ForecastPoint { cloud_pct: Some(90.0), ..point(0, AltitudeBand::Mid) },
            ForecastPoint { cloud_pct: None, ..point(1, AltitudeBand::Mid) },
        ];
        assert_eq!(dominant_condition(&half_null), Condition::Clear);

        assert_eq!(dominant_condition(&[]), Condition::Clear);
    }

    #[test]
    fn test_best_window_requires_three_points() {
        let f = forecast(vec![
            point(0, AltitudeBand::Mid),
            point(1, AltitudeBand::Mid),
            point(2, AltitudeBand::Top),
        ]);
        assert!(find_best_skiing_window(&f, AltitudeBand::Mid).is_none());
    }

    #[test]
    fn test_best_window_avoids_windy_sample() {
        // Four mid points, winds 10/10/10/60, no snow, clear visibility,
        // full confidence. The first window must win:
        // 0.4 * (1 - 10/60) + 0.3 * 0 + 0.2 * 1 + 0.1 * 1 = 0.6333 -> 63
        let winds = [10.0, 10.0, 10.0, 60.0];
        let f = forecast(
            winds
                .iter()
                .enumerate()
                .map(|(hour, wind)| ForecastPoint {
                    wind_kmh: *wind,
                    ..point(hour as i64, AltitudeBand::Mid)
                })
                .collect(),
        );

        let window = find_best_skiing_window(&f, AltitudeBand::Mid).unwrap();
        assert_eq!(window.start, base_time());
        assert_eq!(window.end, base_time() + Duration::hours(2));
        assert_eq!(window.score, 63);
    }

    #[test]
    fn test_window_score_monotone_in_wind() {
        let mut previous = i64::MAX;
        for step in 0..=20 {
            let wind = step as f64 * 5.0;
            let f = forecast(
                (0..3)
                    .map(|hour| ForecastPoint {
                        wind_kmh: wind,
                        snow_cm: 3.0,
                        visibility_m: Some(2000),
                        confidence: 0.8,
                        ..point(hour, AltitudeBand::Mid)
                    })
                    .collect(),
            );

            let score = find_best_skiing_window(&f, AltitudeBand::Mid).unwrap().score;
            assert!(
                score <= previous,
                "score rose from {} to {} as wind increased to {}",
                previous,
                score,
                wind
            );
            previous = score;
        }
    }

    #[test]
    fn test_snow_score_flattens_above_cap() {
        let scored = |snow: f64| {
            let f = forecast(
                (0..3)
                    .map(|hour| ForecastPoint {
                        snow_cm: snow,
                        ..point(hour, AltitudeBand::Mid)
                    })
                    .collect(),
            );
            find_best_skiing_window(&f, AltitudeBand::Mid).unwrap().score
        };

        // mean/15 up to the cap, flat 0.8 weight contribution above it
        assert!(scored(15.0) > scored(16.0));
        assert_eq!(scored(16.0), scored(40.0));
    }

    #[test]
    fn test_adjust_observation_per_band() {
        let now = CurrentObservation {
            timestamp: base_time(),
            temp_c: 0.0,
            wind_kmh: 12.0,
            gust_kmh: 20.0,
            visibility_m: Some(4000),
            snow_base_cm: Some(80.0),
            snow_top_cm: Some(150.0),
            new_snow_24h_cm: Some(10.0),
            iso_zero_m: Some(2000),
            condition: Condition::Snow,
            confidence: 0.9,
            sources: vec![],
        };

        let top = adjust_observation(&now, AltitudeBand::Top);
        assert_eq!(top.temp_c, -3.0);
        assert_eq!(top.snow_base_cm, None);
        assert_eq!(top.snow_top_cm, Some(150.0));

        let base = adjust_observation(&now, AltitudeBand::Base);
        assert_eq!(base.temp_c, 2.0);
        assert_eq!(base.snow_top_cm, None);
        assert_eq!(base.snow_base_cm, Some(80.0));

        let mid = adjust_observation(&now, AltitudeBand::Mid);
        assert_eq!(mid, now);
    }
}
