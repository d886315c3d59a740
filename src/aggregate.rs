//! Grouped rental sums over the filtered record sets

use std::collections::BTreeMap;

use crate::data::{DailyRecord, HourlyRecord};

/// How many hours the busiest/quietest rankings keep.
pub const RANKED_HOURS: usize = 5;

/// Total rentals for one hour-of-day across the filtered hourly set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSum {
    pub hour: u32,
    pub total: i64,
}

/// Total rentals for one observed category value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySum {
    pub category: String,
    pub total: i64,
}

/// The three headline metrics of the filtered daily set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RentalTotals {
    pub total: i64,
    pub casual: i64,
    pub registered: i64,
}

pub fn rental_totals(records: &[DailyRecord]) -> RentalTotals {
    records.iter().fold(RentalTotals::default(), |acc, r| RentalTotals {
        total: acc.total + r.total,
        casual: acc.casual + r.casual,
        registered: acc.registered + r.registered,
    })
}

/// Sum of rentals per hour-of-day, ordered by hour ascending.
///
/// Only hours observed in the input appear; an empty input yields an empty
/// sequence.
pub fn hourly_totals(records: &[HourlyRecord]) -> Vec<HourSum> {
    let mut sums: BTreeMap<u32, i64> = BTreeMap::new();
    for record in records {
        *sums.entry(record.hour).or_insert(0) += record.total;
    }
    sums.into_iter()
        .map(|(hour, total)| HourSum { hour, total })
        .collect()
}

/// Top `count` hours by total, descending; ties broken by hour ascending.
pub fn busiest_hours(sums: &[HourSum], count: usize) -> Vec<HourSum> {
    let mut ranked = sums.to_vec();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then(a.hour.cmp(&b.hour)));
    ranked.truncate(count);
    ranked
}

/// Bottom `count` hours by total, ascending; ties broken by hour ascending.
pub fn quietest_hours(sums: &[HourSum], count: usize) -> Vec<HourSum> {
    let mut ranked = sums.to_vec();
    ranked.sort_by(|a, b| a.total.cmp(&b.total).then(a.hour.cmp(&b.hour)));
    ranked.truncate(count);
    ranked
}

/// Sum of rentals per season, one row per observed season.
pub fn season_totals(records: &[DailyRecord]) -> Vec<CategorySum> {
    category_totals(records, |r| r.season.as_str())
}

/// Sum of rentals per weather condition, one row per observed condition.
pub fn weather_totals(records: &[DailyRecord]) -> Vec<CategorySum> {
    category_totals(records, |r| r.weather.as_str())
}

fn category_totals<F>(records: &[DailyRecord], key: F) -> Vec<CategorySum>
where
    F: Fn(&DailyRecord) -> &str,
{
    let mut sums: BTreeMap<String, i64> = BTreeMap::new();
    for record in records {
        *sums.entry(key(record).to_string()).or_insert(0) += record.total;
    }
    sums.into_iter()
        .map(|(category, total)| CategorySum { category, total })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, d).unwrap()
    }

    fn hourly(day: u32, hour: u32, total: i64) -> HourlyRecord {
        HourlyRecord {
            date: date(day),
            hour,
            total,
        }
    }

    fn daily(day: u32, total: i64, season: &str, weather: &str) -> DailyRecord {
        DailyRecord {
            date: date(day),
            total,
            casual: total / 4,
            registered: total - total / 4,
            season: season.to_string(),
            weather: weather.to_string(),
            temperature: 0.4,
            humidity: 0.5,
            wind_speed: 0.1,
        }
    }

    #[test]
    fn test_hourly_totals_sum_across_days() {
        let records = vec![hourly(1, 8, 50), hourly(2, 8, 30), hourly(1, 9, 10)];
        let sums = hourly_totals(&records);

        assert_eq!(sums.len(), 2);
        assert_eq!(sums[0], HourSum { hour: 8, total: 80 });
        assert_eq!(sums[1], HourSum { hour: 9, total: 10 });
    }

    #[test]
    fn test_busiest_and_quietest_rankings() {
        // Uniform rentals except a peak at hour 8 and a trough at hour 3.
        let records: Vec<HourlyRecord> = (0..24)
            .map(|h| {
                let total = match h {
                    8 => 100,
                    3 => 1,
                    _ => 10,
                };
                hourly(1, h, total)
            })
            .collect();
        let sums = hourly_totals(&records);

        let busiest = busiest_hours(&sums, RANKED_HOURS);
        assert_eq!(busiest.len(), 5);
        assert_eq!(busiest[0], HourSum { hour: 8, total: 100 });
        // Ties resolved by hour ascending.
        assert_eq!(busiest[1].hour, 0);
        assert_eq!(busiest[2].hour, 1);

        let quietest = quietest_hours(&sums, RANKED_HOURS);
        assert_eq!(quietest.len(), 5);
        assert_eq!(quietest[0], HourSum { hour: 3, total: 1 });
        assert_eq!(quietest[1].hour, 0);
    }

    #[test]
    fn test_ranking_shorter_than_requested() {
        let sums = hourly_totals(&[hourly(1, 7, 5), hourly(1, 12, 9)]);
        assert_eq!(busiest_hours(&sums, RANKED_HOURS).len(), 2);
    }

    #[test]
    fn test_category_sums_observed_only() {
        let records = vec![
            daily(1, 100, "Dingin", "Cerah"),
            daily(2, 200, "Semi", "Cerah"),
            daily(3, 50, "Dingin", "Hujan"),
        ];

        let seasons = season_totals(&records);
        assert_eq!(seasons.len(), 2);
        assert_eq!(
            seasons[0],
            CategorySum {
                category: "Dingin".to_string(),
                total: 150
            }
        );
        assert_eq!(
            seasons[1],
            CategorySum {
                category: "Semi".to_string(),
                total: 200
            }
        );

        let weather = weather_totals(&records);
        assert_eq!(weather.len(), 2);
    }

    #[test]
    fn test_grouped_sums_conserve_total() {
        let records = vec![
            daily(1, 120, "Dingin", "Cerah"),
            daily(2, 340, "Semi", "Berkabut"),
            daily(3, 75, "Panas", "Cerah"),
            daily(4, 410, "Semi", "Hujan"),
        ];
        let totals = rental_totals(&records);

        let season_sum: i64 = season_totals(&records).iter().map(|c| c.total).sum();
        let weather_sum: i64 = weather_totals(&records).iter().map(|c| c.total).sum();

        assert_eq!(season_sum, totals.total);
        assert_eq!(weather_sum, totals.total);
        assert_eq!(totals.casual + totals.registered, totals.total);
    }
}
