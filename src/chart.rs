// 📊 Chart Data
//
// Plain series for the TUI chart page. Rendering lives in `ui`; these
// functions only decide what gets drawn, in the fixed stat order
// HP, Attack, Defense, Sp. Atk, Sp. Def, Speed.

use crate::entities::category::round_one;
use crate::entities::{Category, Record, StatAverages, StatField};

/// Axis labels, one per stat
pub const STAT_LABELS: [&str; 6] = ["HP", "Attack", "Defense", "Sp. Atk", "Sp. Def", "Speed"];

fn chart_label(field: StatField) -> &'static str {
    match field {
        StatField::Hp => STAT_LABELS[0],
        StatField::Attack => STAT_LABELS[1],
        StatField::Defense => STAT_LABELS[2],
        StatField::SpAtk => STAT_LABELS[3],
        StatField::SpDef => STAT_LABELS[4],
        StatField::Speed => STAT_LABELS[5],
    }
}

/// Bar chart: one record's six stats
pub fn stat_bars(record: &Record) -> Vec<(&'static str, u32)> {
    StatField::ALL
        .iter()
        .map(|f| (chart_label(*f), record.stats().stat(*f)))
        .collect()
}

/// Line chart: Fire vs Grass average per stat
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLines {
    pub fire: Vec<f64>,
    pub grass: Vec<f64>,
}

impl CategoryLines {
    pub fn series(&self, category: Category) -> &[f64] {
        match category {
            Category::Fire => &self.fire,
            Category::Grass => &self.grass,
        }
    }

    /// Largest value across both series (0 when everything is 0)
    pub fn max(&self) -> f64 {
        self.fire
            .iter()
            .chain(self.grass.iter())
            .copied()
            .fold(0.0, f64::max)
    }
}

/// `None` when neither category has members; a missing category is all zeros
pub fn category_lines(records: &[Record]) -> Option<CategoryLines> {
    let fire = Category::Fire.average_stats(records);
    let grass = Category::Grass.average_stats(records);

    if fire.is_none() && grass.is_none() {
        return None;
    }

    let series = |averages: Option<StatAverages>| {
        averages
            .map(|a| a.values())
            .unwrap_or_else(|| vec![0.0; StatField::ALL.len()])
    };

    Some(CategoryLines {
        fire: series(fire),
        grass: series(grass),
    })
}

/// Pie chart: each stat's share of the total, in percent with one decimal
pub fn stat_distribution(record: &Record) -> Vec<(&'static str, f64)> {
    let total = record.stats().total();

    StatField::ALL
        .iter()
        .map(|f| {
            let share = if total == 0 {
                0.0
            } else {
                let pct = f64::from(record.stats().stat(*f)) * 100.0 / f64::from(total);
                round_one(pct)
            };
            (chart_label(*f), share)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Kind, StatBlock};

    fn record(kind: Kind, stats: [i64; 6]) -> Record {
        let [hp, atk, def, spa, spd, spe] = stats;
        Record::new(kind).with_stats(StatBlock::new(hp, atk, def, spa, spd, spe).unwrap())
    }

    #[test]
    fn test_stat_bars_order() {
        let bars = stat_bars(&record(Kind::Vulpix, [38, 41, 40, 50, 65, 65]));
        assert_eq!(
            bars,
            vec![
                ("HP", 38),
                ("Attack", 41),
                ("Defense", 40),
                ("Sp. Atk", 50),
                ("Sp. Def", 65),
                ("Speed", 65),
            ]
        );
    }

    #[test]
    fn test_category_lines() {
        assert!(category_lines(&[]).is_none(), "Nothing to plot without records");

        let records = vec![
            record(Kind::Charmander, [39, 52, 43, 60, 50, 65]),
            record(Kind::Vulpix, [38, 41, 40, 50, 65, 65]),
        ];
        let lines = category_lines(&records).unwrap();
        assert_eq!(lines.fire, vec![38.5, 46.5, 41.5, 55.0, 57.5, 65.0]);
        assert_eq!(lines.grass, vec![0.0; 6], "Missing category plots as zeros");
        assert_eq!(lines.series(Category::Fire), lines.fire.as_slice());
        assert_eq!(lines.max(), 65.0);
    }

    #[test]
    fn test_stat_distribution() {
        let dist = stat_distribution(&record(Kind::Oddish, [25, 25, 25, 25, 0, 0]));
        assert_eq!(dist[0], ("HP", 25.0));
        assert_eq!(dist[5], ("Speed", 0.0));

        let thirds = stat_distribution(&record(Kind::Oddish, [1, 1, 1, 0, 0, 0]));
        assert_eq!(thirds[0].1, 33.3);

        let empty = stat_distribution(&record(Kind::Oddish, [0; 6]));
        assert!(empty.iter().all(|(_, pct)| *pct == 0.0), "Zero total gives zero shares");
    }
}
