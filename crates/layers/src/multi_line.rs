//! Housing prices per province over time, with a national average line and
//! event callouts.

use std::collections::{BTreeMap, BTreeSet};

use compute::{Statistics, mean_excluding, value_at};
use formats::{DataBundle, normalize_name};
use foundation::math::Vec2;
use foundation::viewport::{Margins, PlotArea};
use scene::{
    Anchor, Chart, Drawing, Mark, RenderContext, RenderError, SceneState, Shape, StoryConfig, Style,
    Tooltip, Transition, format_count,
};
use tracing::warn;

use crate::axes::{bottom_axis, left_axis, no_data, short_number};
use crate::scales::LinearScale;
use crate::symbology::{AVERAGE_LINE, CALLOUT};

const ID: &str = "housing";
const CAPTION: &str = "Rising Housing Prices Across Canada";

/// Aggregate row in the housing table; not a province.
pub const NATIONAL_ROW: &str = "Canada";
pub const DEFAULT_VISIBLE: [&str; 3] = ["Ontario", "British Columbia", "Quebec"];
pub const EVENTS: [(i32, &str); 2] = [
    (2008, "2008 Housing Market Crisis"),
    (2020, "COVID-19 Pandemic Impact"),
];

const MARGINS: Margins = Margins::new(60.0, 240.0, 60.0, 90.0);
const NARROW_MARGINS: Margins = Margins::new(60.0, 150.0, 60.0, 70.0);
const LINE_DURATION_MS: f64 = 1500.0;
const POINT_DURATION_MS: f64 = 200.0;
const HIDDEN_OPACITY: f64 = 0.35;

/// Event marker anchored to data, not to pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    pub period: i32,
    /// National average at `period`, when known.
    pub value: Option<f64>,
    pub label: String,
}

/// Periods present in the housing table, ascending.
pub fn housing_periods(bundle: &DataBundle) -> Vec<i32> {
    bundle
        .housing
        .iter()
        .map(|o| o.period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Indices (into the bundle's dimension) of provinces with housing data, in
/// dimension order. The national aggregate row is left out.
pub fn housing_provinces(bundle: &DataBundle) -> Vec<usize> {
    let national = normalize_name(NATIONAL_ROW);
    let mut indices = BTreeSet::new();
    for o in &bundle.housing {
        if normalize_name(&o.category) == national {
            continue;
        }
        match bundle.dimension.index_of(&o.category) {
            Some(i) => {
                indices.insert(i);
            }
            None => warn!(category = %o.category, "housing row outside the category dimension"),
        }
    }
    indices.into_iter().collect()
}

/// Mean price per period across provinces, excluding the national row.
pub fn national_average(bundle: &DataBundle) -> Vec<(i32, f64)> {
    housing_periods(bundle)
        .into_iter()
        .filter_map(|p| mean_excluding(&bundle.housing, p, NATIONAL_ROW).map(|v| (p, v)))
        .collect()
}

/// Event callouts that fall inside the housing periods.
pub fn callouts(bundle: &DataBundle) -> Vec<Callout> {
    let periods = housing_periods(bundle);
    let (Some(&first), Some(&last)) = (periods.first(), periods.last()) else {
        return Vec::new();
    };
    EVENTS
        .iter()
        .filter(|(period, _)| (first..=last).contains(period))
        .map(|(period, label)| Callout {
            period: *period,
            value: mean_excluding(&bundle.housing, *period, NATIONAL_ROW),
            label: label.to_string(),
        })
        .collect()
}

/// Aggregates behind the housing lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HousingData {
    pub periods: Vec<i32>,
    /// Dimension indices of provinces with housing rows.
    pub provinces: Vec<usize>,
    /// Prices per province, aligned with `periods`.
    pub series: BTreeMap<usize, Vec<Option<f64>>>,
    pub average: Vec<(i32, f64)>,
    pub callouts: Vec<Callout>,
    /// Largest reported price of any row, the national one included.
    pub max: Option<f64>,
}

impl HousingData {
    pub fn from_bundle(bundle: &DataBundle) -> Self {
        let periods = housing_periods(bundle);
        let provinces = housing_provinces(bundle);
        let series = provinces
            .iter()
            .filter_map(|&index| {
                let name = bundle.dimension.get(index)?.name.as_str();
                let values = periods
                    .iter()
                    .map(|p| value_at(&bundle.housing, *p, Some(name)))
                    .collect();
                Some((index, values))
            })
            .collect();
        Self {
            average: national_average(bundle),
            callouts: callouts(bundle),
            max: Statistics::max_present(bundle.housing.iter().map(|o| o.value)),
            periods,
            provinces,
            series,
        }
    }

    pub fn price(&self, index: usize, period: i32) -> Option<f64> {
        let at = self.periods.iter().position(|p| *p == period)?;
        self.series.get(&index)?.get(at).copied().flatten()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HousingChart;

impl HousingChart {
    fn draw_legend(
        &self,
        d: &mut Drawing,
        ctx: &RenderContext<'_>,
        state: &SceneState,
        data: &HousingData,
        area: PlotArea,
    ) {
        let legend_x = area.right() + 20.0;
        for (row, &index) in data.provinces.iter().enumerate() {
            let Some(category) = ctx.bundle.dimension.get(index) else {
                continue;
            };
            let top = area.y + row as f64 * 24.0;
            let opacity = if state.visible.contains(index) {
                1.0
            } else {
                HIDDEN_OPACITY
            };
            d.push(
                Mark::new(
                    format!("legend:{}", category.name),
                    Shape::Rect {
                        x: legend_x,
                        y: top,
                        width: 22.0,
                        height: 14.0,
                    },
                    Style::filled(category.color).with_opacity(opacity),
                )
                .interactive(),
            );
            d.push(Mark::label(
                format!("legend:{}:label", category.name),
                Vec2::new(legend_x + 32.0, top + 7.0),
                category.name.clone(),
                Anchor::Start,
            ));
        }
    }
}

impl Chart for HousingChart {
    type Data = HousingData;

    fn id(&self) -> &'static str {
        ID
    }

    fn caption(&self) -> &str {
        CAPTION
    }

    fn init(&self, bundle: &DataBundle, state: &mut SceneState) {
        state.visible.clear();
        for name in DEFAULT_VISIBLE {
            if let Some(i) = bundle.dimension.index_of(name) {
                state.visible.insert(i);
            }
        }
    }

    fn prepare(&self, bundle: &DataBundle, _config: &StoryConfig, _state: &SceneState) -> HousingData {
        HousingData::from_bundle(bundle)
    }

    fn draw(
        &self,
        ctx: &RenderContext<'_>,
        state: &SceneState,
        data: &HousingData,
    ) -> Result<Drawing, RenderError> {
        let margins = if ctx.layout.shows_secondary() {
            MARGINS
        } else {
            NARROW_MARGINS
        };
        let area = ctx.viewport.inner(margins);
        let mut d = Drawing::new(ID, ctx.viewport, ctx.layout);

        let (Some(&first), Some(&last)) = (data.periods.first(), data.periods.last()) else {
            d.marks.extend(bottom_axis("x-axis", area, &[]));
            d.marks.extend(left_axis("y-axis", area, &[]));
            d.push(no_data("no-data", area));
            return Ok(d);
        };

        let top = data.max.filter(|m| *m > 0.0).map_or(1.0, |m| m * 1.1);
        let x = LinearScale::new((f64::from(first), f64::from(last)), (area.x, area.right()));
        let y = LinearScale::new((0.0, top), (area.bottom(), area.y)).nice(6);
        let at = |period: i32, value: f64| Vec2::new(x.apply(f64::from(period)), y.apply(value));

        let x_ticks: Vec<(f64, String)> = x
            .ticks(6)
            .into_iter()
            .filter(|v| v.fract() == 0.0)
            .map(|v| (x.apply(v), format!("{v:.0}")))
            .collect();
        d.marks.extend(bottom_axis("x-axis", area, &x_ticks));
        let y_ticks: Vec<(f64, String)> = y
            .ticks(6)
            .into_iter()
            .map(|v| (y.apply(v), short_number(v)))
            .collect();
        d.marks.extend(left_axis("y-axis", area, &y_ticks));
        if data.max.is_none() {
            d.push(no_data("no-data", area));
        }

        if !data.average.is_empty() {
            d.push(Mark::new(
                "average",
                Shape::Polyline {
                    points: data.average.iter().map(|(p, v)| at(*p, *v)).collect(),
                },
                Style::stroked(AVERAGE_LINE, 2.5).dashed(),
            ));
        }
        if let Some(&(p, v)) = data.average.last() {
            let end = at(p, v);
            d.push(Mark::label(
                "average:label",
                Vec2::new(end.x + 5.0, end.y - 15.0),
                "National Average",
                Anchor::Start,
            ));
        }

        for c in &data.callouts {
            let cx = x.apply(f64::from(c.period));
            d.push(Mark::new(
                format!("callout:{}", c.period),
                Shape::Rule {
                    from: Vec2::new(cx, area.y),
                    to: Vec2::new(cx, area.bottom()),
                },
                Style::stroked(CALLOUT, 1.5).dashed(),
            ));
            d.push(Mark::label(
                format!("callout:{}:label", c.period),
                Vec2::new(cx + 5.0, area.y + 15.0),
                c.label.clone(),
                Anchor::Start,
            ));
        }

        for index in state.visible.iter() {
            let (Some(category), Some(values)) = (ctx.bundle.dimension.get(index), data.series.get(&index))
            else {
                continue;
            };
            let name = category.name.as_str();
            let series: Vec<(i32, Option<f64>)> =
                data.periods.iter().copied().zip(values.iter().copied()).collect();

            // Missing values break the line into runs.
            for (run_index, run) in series
                .split(|(_, v)| v.is_none())
                .filter(|run| !run.is_empty())
                .enumerate()
            {
                let points: Vec<Vec2> = run
                    .iter()
                    .filter_map(|(p, v)| v.map(|v| at(*p, v)))
                    .collect();
                d.push(
                    Mark::new(
                        format!("line:{name}:{run_index}"),
                        Shape::Polyline { points },
                        Style::stroked(category.color, 2.0).with_opacity(0.9),
                    )
                    .entering(Transition::new(0.0, LINE_DURATION_MS)),
                );
            }

            let present: Vec<(i32, f64)> = series
                .iter()
                .filter_map(|(p, v)| v.map(|v| (*p, v)))
                .collect();
            let delay_per_point = LINE_DURATION_MS / present.len().max(1) as f64;
            for (i, (period, value)) in present.iter().enumerate() {
                let center = at(*period, *value);
                d.push(
                    Mark::new(
                        format!("point:{name}:{period}"),
                        Shape::Circle {
                            center,
                            radius: 4.0,
                        },
                        Style::filled(category.color).with_opacity(0.9),
                    )
                    .interactive()
                    .entering(
                        Transition::new(i as f64 * delay_per_point, POINT_DURATION_MS)
                            .from_shape(Shape::Circle { center, radius: 0.0 }),
                    ),
                );
            }
        }

        self.draw_legend(&mut d, ctx, state, data, area);
        Ok(d)
    }

    fn describe(
        &self,
        ctx: &RenderContext<'_>,
        _state: &SceneState,
        data: &HousingData,
        key: &str,
    ) -> Option<Tooltip> {
        let (name, period) = key.strip_prefix("point:")?.rsplit_once(':')?;
        let period: i32 = period.parse().ok()?;
        let index = ctx.bundle.dimension.index_of(name)?;
        let price = data.price(index, period)?;
        Some(
            Tooltip::new(key, name)
                .line(format!("Year: {period}"))
                .line(format!("Price: ${}", format_count(price))),
        )
    }

    fn select(
        &self,
        ctx: &RenderContext<'_>,
        state: &mut SceneState,
        data: &HousingData,
        key: &str,
    ) -> bool {
        let Some(name) = key.strip_prefix("legend:") else {
            return false;
        };
        let Some(index) = ctx.bundle.dimension.index_of(name) else {
            return false;
        };
        if !data.provinces.contains(&index) {
            return false;
        }
        state.visible.toggle(index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{HousingChart, HousingData, callouts, housing_provinces, national_average};
    use crate::fixtures::{Session, bundle, render};
    use foundation::viewport::Viewport;
    use pretty_assertions::assert_eq;
    use scene::{PointerEvent, PointerOutcome};

    #[test]
    fn default_selection_is_three_provinces() {
        let b = bundle();
        let (drawing, state) = render(HousingChart, &b, Viewport::new(900.0, 450.0));
        assert_eq!(state.visible.len(), 3);
        assert!(drawing.mark("line:Ontario:0").is_some());
        assert!(drawing.mark("line:British Columbia:0").is_some());
        assert!(drawing.mark("line:Alberta:0").is_none());
        assert_eq!(drawing.marks_with_prefix("legend:").filter(|m| m.interactive).count(), 4);
    }

    #[test]
    fn missing_value_splits_line_and_skips_point() {
        let b = bundle();
        let (drawing, _) = render(HousingChart, &b, Viewport::new(900.0, 450.0));
        assert!(drawing.mark("line:Quebec:1").is_some());
        assert!(drawing.mark("point:Quebec:2009").is_none());
        assert!(drawing.mark("point:Quebec:2010").is_some());
    }

    #[test]
    fn national_average_excludes_aggregate_row() {
        let b = bundle();
        let average = national_average(&b);
        // 2006: (300 + 200 + 400 + 250) / 4
        assert_eq!(average[0], (2006, 287.5));
        assert_eq!(average.len(), 5);
        assert!(!housing_provinces(&b).is_empty());
    }

    #[test]
    fn only_in_range_events_become_callouts() {
        let b = bundle();
        let c = callouts(&b);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].period, 2008);
        assert_eq!(c[0].label, "2008 Housing Market Crisis");
        // (330 + 215 + 420 + 270) / 4
        assert_eq!(c[0].value, Some(308.75));
    }

    #[test]
    fn legend_click_toggles_visibility() {
        let b = bundle();
        let mut session = Session::mount(HousingChart, &b, Viewport::new(900.0, 450.0));
        assert_eq!(session.pointer(PointerEvent::click("legend:Alberta")), PointerOutcome::Redraw);
        assert!(session.redraw().mark("line:Alberta:0").is_some());
        assert_eq!(session.pointer(PointerEvent::click("legend:Ontario")), PointerOutcome::Redraw);
        assert!(session.redraw().mark("line:Ontario:0").is_none());
        assert_eq!(session.pointer(PointerEvent::click("legend:Yukon")), PointerOutcome::Ignored);
    }

    #[test]
    fn point_tooltip_reads_current_value() {
        let b = bundle();
        let mut session = Session::mount(HousingChart, &b, Viewport::new(900.0, 450.0));
        assert_eq!(
            session.pointer(PointerEvent::enter("point:Ontario:2008", Default::default())),
            PointerOutcome::Redraw
        );
        let tooltip = session.state.tooltip.clone().expect("tooltip");
        assert_eq!(tooltip.title, "Ontario");
        assert_eq!(tooltip.lines, vec!["Year: 2008".to_string(), "Price: $330".to_string()]);
    }

    #[test]
    fn prepared_series_match_table_lookups() {
        let b = bundle();
        let data = HousingData::from_bundle(&b);
        let quebec = b.dimension.index_of("Quebec").expect("quebec");
        assert_eq!(data.periods, vec![2006, 2007, 2008, 2009, 2010]);
        assert_eq!(data.price(quebec, 2008), Some(215.0));
        assert_eq!(data.price(quebec, 2009), None);
        assert_eq!(data.max, Some(900.0));
    }

    #[test]
    fn empty_table_draws_axes_and_no_data() {
        let mut b = bundle();
        b.housing.clear();
        let (drawing, _) = render(HousingChart, &b, Viewport::new(900.0, 450.0));
        assert!(drawing.mark("no-data").is_some());
        assert!(drawing.mark("y-axis:domain").is_some());
        assert_eq!(drawing.marks_with_prefix("line:").count(), 0);
    }

    #[test]
    fn all_missing_prices_keep_legend_and_show_no_data() {
        let mut b = bundle();
        b.housing.iter_mut().for_each(|o| o.value = None);
        let (drawing, _) = render(HousingChart, &b, Viewport::new(900.0, 450.0));
        assert!(drawing.mark("no-data").is_some());
        assert!(drawing.mark("average").is_none());
        assert_eq!(drawing.marks_with_prefix("point:").count(), 0);
        assert_eq!(drawing.marks_with_prefix("legend:").filter(|m| m.interactive).count(), 4);
    }
}
