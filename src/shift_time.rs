use crate::model::ShiftConfig;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike, Utc};

/// Une journée complète.
pub fn full_day() -> Duration {
    Duration::hours(24)
}

/// Calcule le début et la fin de l'occurrence `(cycle, shift_idx)`.
///
/// L'ancre est la date locale de `start` à l'heure `sc.start_time` (UTC,
/// secondes ignorées). Chaque cycle dure `length + skip` jours ; dans un cycle,
/// les sous-créneaux précédents sont cumulés. La fin vaut
/// `début + length jours + (durée − 24h)`.
///
/// Les instants retournés sont exprimés dans le fuseau de `start`.
/// `shift_idx` doit désigner un sous-créneau existant.
pub fn shift_start_end<Tz: TimeZone>(
    start: &DateTime<Tz>,
    cycle: usize,
    shift_idx: usize,
    sc: &ShiftConfig,
) -> (DateTime<Tz>, DateTime<Tz>) {
    let clock = NaiveTime::from_hms_opt(sc.start_time.hour(), sc.start_time.minute(), 0)
        .unwrap_or(NaiveTime::MIN);
    let anchor = Utc.from_utc_datetime(&start.date_naive().and_time(clock));

    let cycle_offset = Duration::days(sc.cycle_days() * cycle as i64);
    let within: Duration = sc.shifts[..shift_idx]
        .iter()
        .fold(Duration::zero(), |acc, s| acc + s.duration);

    let shift_start = anchor + cycle_offset + within;
    let shift_end = shift_start + Duration::days(i64::from(sc.length));
    let shift_end = shift_end + (sc.shifts[shift_idx].duration - full_day());

    let tz = start.timezone();
    (shift_start.with_timezone(&tz), shift_end.with_timezone(&tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubShift;
    use chrono::FixedOffset;

    fn layout(length: u32, skip: u32, shifts: Vec<SubShift>) -> ShiftConfig {
        ShiftConfig {
            start_time: NaiveTime::MIN,
            length,
            skip,
            shifts,
            shift_members: 1,
            generator: "Fair".into(),
            modifiers: Vec::new(),
        }
    }

    #[test]
    fn full_day_shifts_chain_by_length() {
        let sc = layout(5, 0, vec![SubShift::new("main", full_day())]);
        let t0 = Utc.with_ymd_and_hms(2006, 4, 1, 0, 0, 0).unwrap();

        let mut prev = shift_start_end(&t0, 0, 0, &sc);
        assert_eq!(prev.0, t0);
        for cycle in 1..6 {
            let cur = shift_start_end(&t0, cycle, 0, &sc);
            assert_eq!(cur.0, prev.0 + Duration::days(5));
            assert_eq!(cur.1 - cur.0, Duration::days(5));
            assert_eq!(cur.0, prev.1);
            prev = cur;
        }
    }

    #[test]
    fn skip_days_extend_the_cycle() {
        let sc = layout(5, 2, vec![SubShift::new("main", full_day())]);
        let t0 = Utc.with_ymd_and_hms(2006, 4, 1, 0, 0, 0).unwrap();
        let (s, e) = shift_start_end(&t0, 3, 0, &sc);
        assert_eq!(s, t0 + Duration::days(21));
        assert_eq!(e, t0 + Duration::days(26));
    }

    #[test]
    fn split_shifts_chain_within_a_cycle() {
        let sc = layout(
            5,
            0,
            vec![
                SubShift::new("mtv", Duration::hours(8)),
                SubShift::new("syd", Duration::hours(8)),
                SubShift::new("eu", Duration::hours(8)),
            ],
        );
        let t0 = Utc.with_ymd_and_hms(2018, 5, 7, 0, 0, 0).unwrap();

        let (s0, e0) = shift_start_end(&t0, 0, 0, &sc);
        let (s1, e1) = shift_start_end(&t0, 0, 1, &sc);
        let (s2, _) = shift_start_end(&t0, 0, 2, &sc);
        assert_eq!(s0, t0);
        assert_eq!(e0, t0 + Duration::days(4) + Duration::hours(8));
        assert_eq!(s1, t0 + Duration::hours(8));
        assert_eq!(e1, s1 + Duration::days(4) + Duration::hours(8));
        assert_eq!(s2, t0 + Duration::hours(16));
    }

    #[test]
    fn anchor_uses_configured_clock_and_keeps_zone() {
        let mut sc = layout(1, 0, vec![SubShift::new("main", full_day())]);
        sc.start_time = NaiveTime::from_hms_opt(9, 30, 45).unwrap();
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let t0 = tz.with_ymd_and_hms(2020, 1, 10, 23, 15, 0).unwrap();

        let (s, e) = shift_start_end(&t0, 0, 0, &sc);
        assert_eq!(s.offset(), &tz);
        assert_eq!(
            s.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2020, 1, 10, 9, 30, 0).unwrap()
        );
        assert_eq!(e - s, full_day());
    }
}
