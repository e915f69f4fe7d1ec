// insights.rs
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Performance numbers shown on the campaign dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetaInsights {
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
}

/// Used whenever the insights endpoint cannot be reached.
pub const FALLBACK_INSIGHTS: MetaInsights = MetaInsights {
    spend: 8500.0,
    impressions: 2847,
    clicks: 457,
    conversions: 89,
};

const SPEND_RANGE: (f64, f64) = (50.0, 500.0);
const IMPRESSIONS_RANGE: (u64, u64) = (1_000, 20_000);
const CTR_RANGE: (f64, f64) = (0.01, 0.05);
const CONVERSION_RATE_RANGE: (f64, f64) = (0.02, 0.10);
const TARGET_RETURN: f64 = 1.2;

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Uniform samples from fixed ranges; clicks and conversions are derived
/// from sampled rates so the funnel stays ordered.
pub fn generate_mock_insights<R: Rng>(rng: &mut R) -> MetaInsights {
    let spend = round_cents(rng.gen_range(SPEND_RANGE.0..=SPEND_RANGE.1));
    let impressions = rng.gen_range(IMPRESSIONS_RANGE.0..=IMPRESSIONS_RANGE.1);
    let ctr = rng.gen_range(CTR_RANGE.0..=CTR_RANGE.1);
    let clicks = ((impressions as f64) * ctr).round() as u64;
    let rate = rng.gen_range(CONVERSION_RATE_RANGE.0..=CONVERSION_RATE_RANGE.1);
    let conversions = ((clicks as f64) * rate).round() as u64;

    MetaInsights {
        spend,
        impressions,
        clicks,
        conversions,
    }
}

/// Same as [`generate_mock_insights`] but lifts conversions until
/// `conversions * sale_value >= spend * 1.2`.
pub fn generate_positive_insights<R: Rng>(rng: &mut R, sale_value: f64) -> MetaInsights {
    let mut insights = generate_mock_insights(rng);
    if sale_value <= 0.0 {
        return insights;
    }

    let target = insights.spend * TARGET_RETURN;
    let mut needed = (target / sale_value).ceil() as u64;
    while (needed as f64) * sale_value < target {
        needed += 1;
    }
    if insights.conversions < needed {
        insights.conversions = needed;
        insights.clicks = insights.clicks.max(needed);
        insights.impressions = insights.impressions.max(insights.clicks);
    }
    insights
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoiSummary {
    pub investment: f64,
    pub income: f64,
    /// Income per unit invested.
    pub ratio: f64,
    pub percent: f64,
}

impl RoiSummary {
    pub fn new(investment: f64, income: f64) -> Self {
        let ratio = if investment > 0.0 { income / investment } else { 0.0 };
        RoiSummary {
            investment,
            income,
            ratio: round_cents(ratio),
            percent: (ratio * 100.0).round(),
        }
    }

    pub fn from_insights(insights: &MetaInsights, sale_value: f64) -> Self {
        RoiSummary::new(insights.spend, insights.conversions as f64 * sale_value)
    }

    pub fn headline(&self) -> String {
        format!(
            "Por cada $1 invertido, obtuviste ${:.2} de retorno",
            self.ratio
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub value: &'static str,
    pub subtitle: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub kpis: Vec<Kpi>,
    pub roi: RoiSummary,
    pub headline: String,
}

/// The showcase dashboard with its fixed figures.
pub fn dashboard_snapshot() -> DashboardSnapshot {
    let roi = RoiSummary::new(8500.0, 26700.0);
    DashboardSnapshot {
        kpis: vec![
            Kpi {
                label: "Impresiones",
                value: "2,847",
                subtitle: "vs. 1,923 el mes pasado",
            },
            Kpi {
                label: "Clicks",
                value: "457",
                subtitle: "vs. 289 el mes pasado",
            },
            Kpi {
                label: "Conversiones",
                value: "89",
                subtitle: "vs. 67 el mes pasado",
            },
            Kpi {
                label: "Crecimiento de usuarios",
                value: "+47%",
                subtitle: "vs. el mes pasado",
            },
        ],
        headline: roi.headline(),
        roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn mock_insights_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let m = generate_mock_insights(&mut rng);
            assert!(m.spend >= SPEND_RANGE.0 && m.spend <= SPEND_RANGE.1);
            assert!(m.impressions >= IMPRESSIONS_RANGE.0 && m.impressions <= IMPRESSIONS_RANGE.1);
            assert!(m.clicks <= m.impressions);
            assert!(m.conversions <= m.clicks);
        }
    }

    #[test]
    fn positive_variant_always_returns_more_than_spend() {
        let mut rng = StdRng::seed_from_u64(9);
        for sale_value in [1.0, 12.5, 45.0, 300.0] {
            for _ in 0..500 {
                let m = generate_positive_insights(&mut rng, sale_value);
                let income = m.conversions as f64 * sale_value;
                assert!(income > m.spend, "{:?} sale={}", m, sale_value);
                assert!(income >= m.spend * TARGET_RETURN);
                assert!(m.conversions <= m.clicks && m.clicks <= m.impressions);
            }
        }
    }

    #[test]
    fn dashboard_figures() {
        let snapshot = dashboard_snapshot();
        assert_eq!(snapshot.kpis.len(), 4);
        assert_eq!(snapshot.roi.percent, 314.0);
        assert_eq!(snapshot.headline, "Por cada $1 invertido, obtuviste $3.14 de retorno");
    }

    #[test]
    fn roi_with_no_investment() {
        let roi = RoiSummary::new(0.0, 100.0);
        assert_eq!(roi.ratio, 0.0);
        let roi = RoiSummary::from_insights(&FALLBACK_INSIGHTS, 100.0);
        assert_eq!(roi.income, 8900.0);
    }
}
