//! Yearly immigration totals as bars with a least-squares trendline, plus a
//! pie of the selected year's distribution by province.

use std::f64::consts::{PI, TAU};

use compute::{Bucket, Trend, bucket_small_categories, linear_trend, share_of, totals_by_period};
use formats::DataBundle;
use foundation::math::Vec2;
use foundation::viewport::{Margins, PlotArea};
use scene::{
    Anchor, Chart, Drawing, Mark, RenderContext, RenderError, SceneState, Shape, StoryConfig, Style,
    Tooltip, Transition, format_count,
};

use crate::axes::{bottom_axis, left_axis, no_data, short_number};
use crate::scales::{BandScale, LinearScale};
use crate::symbology::{
    AXIS, BAR, BAR_SELECTED, Emphasis, OTHER_SLICE, SLICE_STROKE, TRENDLINE, emphasize,
};

const ID: &str = "immigration";
const CAPTION: &str = "Growing Immigration in Canada";
const HINT: &str = "Select a year in the bar chart to see immigration distribution by province";

const MARGINS: Margins = Margins::new(60.0, 40.0, 80.0, 80.0);
const BAR_SHARE: f64 = 0.6;
const BAR_PADDING: f64 = 0.1;
const BAR_STAGGER_MS: f64 = 30.0;
const BAR_DURATION_MS: f64 = 800.0;
const TREND_DURATION_MS: f64 = 1500.0;
const PIE_DURATION_MS: f64 = 600.0;
const X_TICK_EVERY: usize = 5;

/// `(period, total over the dimension's categories)` in period order.
pub fn yearly_totals(bundle: &DataBundle) -> Vec<(i32, f64)> {
    totals_by_period(&bundle.immigration, &bundle.dimension.names())
}

/// Least-squares trend of totals, with x measured in periods since the first.
pub fn totals_trend(totals: &[(i32, f64)]) -> Option<Trend> {
    let first = totals.first()?.0;
    let points: Vec<(f64, f64)> = totals
        .iter()
        .map(|(period, total)| (f64::from(period - first), *total))
        .collect();
    linear_trend(&points)
}

/// Per-category values of `period` with small categories folded into "Other".
pub fn period_distribution(bundle: &DataBundle, period: i32, threshold: f64) -> Vec<Bucket> {
    let Some(record) = bundle.immigration.record(period) else {
        return Vec::new();
    };
    let values: Vec<(&str, f64)> = bundle
        .dimension
        .members()
        .iter()
        .map(|c| (c.name.as_str(), record.value(&c.name).unwrap_or(0.0)))
        .collect();
    bucket_small_categories(&values, threshold)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub is_other: bool,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Unsorted pie: slices keep bucket order, clockwise from 12 o'clock.
pub fn pie_layout(buckets: &[Bucket]) -> Vec<PieSlice> {
    let total: f64 = buckets.iter().map(|b| b.value).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut angle = 0.0;
    buckets
        .iter()
        .map(|b| {
            let start = angle;
            angle += b.value / total * TAU;
            PieSlice {
                label: b.label.clone(),
                value: b.value,
                is_other: b.is_other,
                start_angle: start,
                end_angle: angle,
            }
        })
        .collect()
}

/// Aggregates behind the bars and the pie.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImmigrationData {
    pub totals: Vec<(i32, f64)>,
    pub trend: Option<Trend>,
    /// Distribution of the selected period, "Other" folded in.
    pub distribution: Vec<Bucket>,
    pub slices: Vec<PieSlice>,
}

impl ImmigrationData {
    pub fn total(&self, period: i32) -> Option<f64> {
        self.totals.iter().find(|(p, _)| *p == period).map(|(_, v)| *v)
    }
}

fn selection_annotation(period: i32) -> String {
    format!(
        "Selected Year: {period}. Immigration totals shown in bar and distribution by province in pie chart."
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImmigrationChart;

impl ImmigrationChart {
    fn draw_pie(
        &self,
        d: &mut Drawing,
        ctx: &RenderContext<'_>,
        state: &SceneState,
        data: &ImmigrationData,
        area: PlotArea,
        period: i32,
    ) {
        let radius = area.width.min(area.height) / 2.0 * 0.6;
        let center = Vec2::new(area.x + area.width / 2.0, area.y + area.height / 2.0);

        d.push(Mark::label(
            "pie:title",
            Vec2::new(area.x, area.y - 30.0),
            format!("Immigration by province: year {period}"),
            Anchor::Start,
        ));
        if data.slices.is_empty() {
            d.push(no_data("pie:no-data", area));
            return;
        }

        for s in &data.slices {
            let key = format!("slice:{}", s.label);
            let base = if s.is_other {
                OTHER_SLICE
            } else {
                ctx.bundle.dimension.color(&s.label)
            };
            let hovered = state.hovered.as_deref() == Some(key.as_str());
            let slice = |end_angle: f64| Shape::Slice {
                center,
                inner_radius: 0.0,
                outer_radius: radius,
                start_angle: s.start_angle,
                end_angle,
            };
            d.push(
                Mark::new(
                    key,
                    slice(s.end_angle),
                    Style::filled(emphasize(base, hovered, Emphasis::Darker, 0.7))
                        .with_stroke(SLICE_STROKE, 1.0),
                )
                .interactive()
                .entering(Transition::new(0.0, PIE_DURATION_MS).from_shape(slice(s.start_angle))),
            );

            let mid = s.mid_angle();
            let side = if mid < PI { 1.0 } else { -1.0 };
            let inner = center + Vec2::polar(mid, radius * 0.5);
            let outer = center + Vec2::polar(mid, radius * 1.1);
            let elbow = Vec2::new(center.x + side * radius * 1.3, outer.y);
            d.push(Mark::new(
                format!("pie:leader:{}", s.label),
                Shape::Polyline {
                    points: vec![inner, outer, elbow],
                },
                Style::stroked(AXIS, 1.0),
            ));
            d.push(Mark::label(
                format!("pie:label:{}", s.label),
                Vec2::new(center.x + side * radius * 1.35, outer.y),
                s.label.clone(),
                if side > 0.0 { Anchor::Start } else { Anchor::End },
            ));
        }
    }
}

impl Chart for ImmigrationChart {
    type Data = ImmigrationData;

    fn id(&self) -> &'static str {
        ID
    }

    fn caption(&self) -> &str {
        CAPTION
    }

    fn init(&self, bundle: &DataBundle, state: &mut SceneState) {
        state.selected_period = bundle.immigration.last_period();
    }

    fn prepare(&self, bundle: &DataBundle, config: &StoryConfig, state: &SceneState) -> ImmigrationData {
        let totals = yearly_totals(bundle);
        let trend = totals_trend(&totals);
        let distribution = state
            .selected_period
            .map(|period| period_distribution(bundle, period, config.other_threshold))
            .unwrap_or_default();
        let slices = pie_layout(&distribution);
        ImmigrationData {
            totals,
            trend,
            distribution,
            slices,
        }
    }

    fn draw(
        &self,
        ctx: &RenderContext<'_>,
        state: &SceneState,
        data: &ImmigrationData,
    ) -> Result<Drawing, RenderError> {
        let plot = ctx.viewport.inner(MARGINS);
        let (bar_area, pie_area) = if ctx.layout.shows_secondary() {
            let (bars, pie) = plot.split_horizontal(BAR_SHARE);
            (bars, Some(pie))
        } else {
            (plot, None)
        };
        let mut d = Drawing::new(ID, ctx.viewport, ctx.layout);

        let totals = &data.totals;
        let (Some(&(first, _)), Some(&(last, _))) = (totals.first(), totals.last()) else {
            d.marks.extend(bottom_axis("x-axis", bar_area, &[]));
            d.marks.extend(left_axis("y-axis", bar_area, &[]));
            d.push(no_data("no-data", bar_area));
            return Ok(d);
        };

        let periods: Vec<i32> = totals.iter().map(|(p, _)| *p).collect();
        let max = totals.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let x = BandScale::new(periods, (bar_area.x, bar_area.right()), BAR_PADDING);
        let top = if max > 0.0 { max * 1.1 } else { 1.0 };
        let y = LinearScale::new((0.0, top), (bar_area.bottom(), bar_area.y)).nice(5);

        let x_ticks: Vec<(f64, String)> = x
            .domain()
            .iter()
            .step_by(X_TICK_EVERY)
            .filter_map(|p| x.center(p).map(|px| (px, p.to_string())))
            .collect();
        d.marks.extend(bottom_axis("x-axis", bar_area, &x_ticks));
        let y_ticks: Vec<(f64, String)> = y
            .ticks(5)
            .into_iter()
            .map(|v| (y.apply(v), short_number(v)))
            .collect();
        d.marks.extend(left_axis("y-axis", bar_area, &y_ticks));
        if max <= 0.0 {
            d.push(no_data("no-data", bar_area));
        }

        for (i, (period, total)) in totals.iter().enumerate() {
            let Some(left) = x.position(period) else {
                continue;
            };
            let key = format!("bar:{period}");
            let hovered = state.hovered.as_deref() == Some(key.as_str());
            let (base, k) = if state.selected_period == Some(*period) {
                (BAR_SELECTED, 0.7)
            } else {
                (BAR, 1.0)
            };
            let top = y.apply(*total);
            d.push(
                Mark::new(
                    key,
                    Shape::Rect {
                        x: left,
                        y: top,
                        width: x.bandwidth(),
                        height: bar_area.bottom() - top,
                    },
                    Style::filled(emphasize(base, hovered, Emphasis::Brighter, k)),
                )
                .interactive()
                .entering(
                    Transition::new(i as f64 * BAR_STAGGER_MS, BAR_DURATION_MS).from_shape(
                        Shape::Rect {
                            x: left,
                            y: bar_area.bottom(),
                            width: x.bandwidth(),
                            height: 0.0,
                        },
                    ),
                ),
            );
        }

        if let (Some(trend), Some(x0), Some(x1)) = (data.trend, x.center(&first), x.center(&last)) {
            let [(_, y0), (_, y1)] = trend.endpoints(0.0, f64::from(last - first));
            let delay = totals.len() as f64 * BAR_STAGGER_MS + 200.0;
            d.push(
                Mark::new(
                    "trend",
                    Shape::Polyline {
                        points: vec![Vec2::new(x0, y.apply(y0)), Vec2::new(x1, y.apply(y1))],
                    },
                    Style::stroked(TRENDLINE, 2.0).dashed(),
                )
                .entering(Transition::new(delay, TREND_DURATION_MS)),
            );
            d.push(Mark::label(
                "trend:legend",
                Vec2::new(bar_area.right() - 100.0, bar_area.y - 40.0),
                "Trendline (growth)",
                Anchor::Start,
            ));
        }

        d.push(Mark::label(
            "hint",
            Vec2::new(bar_area.x + bar_area.width / 2.0, bar_area.y - 20.0),
            HINT,
            Anchor::Middle,
        ));
        if let (Some(period), Some(area)) = (state.selected_period, pie_area) {
            self.draw_pie(&mut d, ctx, state, data, area, period);
        }
        Ok(d)
    }

    fn describe(
        &self,
        _ctx: &RenderContext<'_>,
        _state: &SceneState,
        data: &ImmigrationData,
        key: &str,
    ) -> Option<Tooltip> {
        if let Some(period) = key.strip_prefix("bar:") {
            let period: i32 = period.parse().ok()?;
            let total = data.total(period)?;
            return Some(
                Tooltip::new(key, format!("Year: {period}"))
                    .line(format!("Total immigrants: {}", format_count(total))),
            );
        }

        let label = key.strip_prefix("slice:")?;
        let values: Vec<f64> = data.distribution.iter().map(|b| b.value).collect();
        let bucket = data.distribution.iter().find(|b| b.label == label)?;
        let share = share_of(bucket.value, &values)?;
        Some(
            Tooltip::new(key, label)
                .line(format!("{} immigrants", format_count(bucket.value)))
                .line(format!("{:.1}% of total", share * 100.0)),
        )
    }

    fn select(
        &self,
        _ctx: &RenderContext<'_>,
        state: &mut SceneState,
        data: &ImmigrationData,
        key: &str,
    ) -> bool {
        let Some(period) = key.strip_prefix("bar:").and_then(|p| p.parse::<i32>().ok()) else {
            return false;
        };
        if data.total(period).is_none() || state.selected_period == Some(period) {
            return false;
        }
        state.selected_period = Some(period);
        state.annotation = Some(selection_annotation(period));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{ImmigrationChart, period_distribution, pie_layout, totals_trend, yearly_totals};
    use crate::fixtures::{bundle, render};
    use compute::Bucket;
    use formats::PeriodTable;
    use foundation::viewport::Viewport;
    use pretty_assertions::assert_eq;
    use scene::{PointerEvent, PointerOutcome, Shape};
    use std::f64::consts::TAU;

    #[test]
    fn three_period_totals_and_trend() {
        let b = bundle();
        let totals = yearly_totals(&b);
        assert_eq!(totals, vec![(2000, 30.0), (2001, 40.0), (2002, 50.0)]);
        let trend = totals_trend(&totals).expect("trend");
        assert!((trend.slope - 10.0).abs() < 1e-9);
        assert!((trend.intercept - 30.0).abs() < 1e-9);
    }

    #[test]
    fn wide_layout_draws_bars_trend_and_pie() {
        let b = bundle();
        let (drawing, state) = render(ImmigrationChart, &b, Viewport::new(1000.0, 460.0));
        assert_eq!(state.selected_period, Some(2002));
        assert_eq!(drawing.marks_with_prefix("bar:").count(), 3);
        assert!(drawing.mark("trend").is_some());
        assert!(drawing.marks_with_prefix("slice:").count() > 0);
        assert!(drawing.is_animated());

        // The trendline rises left to right (screen y decreases).
        match &drawing.mark("trend").expect("trend").shape {
            Shape::Polyline { points } => assert!(points[1].y < points[0].y),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn narrow_layout_hides_pie() {
        let b = bundle();
        let (drawing, _) = render(ImmigrationChart, &b, Viewport::new(600.0, 460.0));
        assert_eq!(drawing.marks_with_prefix("slice:").count(), 0);
        assert_eq!(drawing.marks_with_prefix("bar:").count(), 3);
    }

    #[test]
    fn pie_folds_small_provinces_into_other() {
        let b = bundle();
        let buckets = period_distribution(&b, 2002, 0.05);
        let labels: Vec<&str> = buckets.iter().map(|x| x.label.as_str()).collect();
        // Yukon's 1 of 50 is under 5%.
        assert_eq!(labels, vec!["Quebec", "Ontario", "Other"]);
        let total: f64 = buckets.iter().map(|x| x.value).sum();
        assert_eq!(total, 50.0);
    }

    #[test]
    fn pie_layout_spans_full_circle() {
        let buckets = vec![
            Bucket {
                label: "a".into(),
                value: 1.0,
                is_other: false,
            },
            Bucket {
                label: "b".into(),
                value: 3.0,
                is_other: false,
            },
        ];
        let slices = pie_layout(&buckets);
        assert_eq!(slices[0].start_angle, 0.0);
        assert!((slices[0].end_angle - TAU / 4.0).abs() < 1e-12);
        assert!((slices[1].end_angle - TAU).abs() < 1e-12);
        assert!(pie_layout(&[]).is_empty());
    }

    #[test]
    fn clicking_a_bar_selects_its_year_and_tooltips_use_selection() {
        let b = bundle();
        let mut session = crate::fixtures::Session::mount(ImmigrationChart, &b, Viewport::new(1000.0, 460.0));
        assert_eq!(session.pointer(PointerEvent::click("bar:2000")), PointerOutcome::Redraw);
        assert_eq!(session.state.selected_period, Some(2000));
        assert_eq!(session.pointer(PointerEvent::click("bar:2000")), PointerOutcome::Ignored);
        assert_eq!(session.pointer(PointerEvent::click("bar:1999")), PointerOutcome::Ignored);

        assert_eq!(
            session.state.annotation.as_deref(),
            Some("Selected Year: 2000. Immigration totals shown in bar and distribution by province in pie chart.")
        );

        let tooltip = session.describe("slice:Quebec").expect("tooltip");
        assert_eq!(tooltip.title, "Quebec");
        // 2000: Ontario 10, Quebec 20 of 30.
        assert_eq!(tooltip.lines, vec!["20 immigrants".to_string(), "66.7% of total".to_string()]);

        let bar = session.describe("bar:2001").expect("tooltip");
        assert_eq!(bar.lines, vec!["Total immigrants: 40".to_string()]);
    }

    #[test]
    fn empty_table_draws_axes_and_no_data() {
        let mut b = bundle();
        b.immigration = PeriodTable::default();
        let (drawing, state) = render(ImmigrationChart, &b, Viewport::new(1000.0, 460.0));
        assert_eq!(state.selected_period, None);
        assert!(drawing.mark("no-data").is_some());
        assert!(drawing.mark("x-axis:domain").is_some());
        assert_eq!(drawing.marks_with_prefix("bar:").count(), 0);
        assert!(drawing.mark("trend").is_none());
    }

    #[test]
    fn all_missing_values_draw_flat_bars_and_empty_pie() {
        let mut b = bundle();
        for record in &mut b.immigration.records {
            for value in record.values.values_mut() {
                *value = None;
            }
        }
        let (drawing, _) = render(ImmigrationChart, &b, Viewport::new(1000.0, 460.0));
        assert_eq!(drawing.marks_with_prefix("bar:").count(), 3);
        for bar in drawing.marks_with_prefix("bar:") {
            let Shape::Rect { height, .. } = bar.shape else {
                panic!("bar is not a rect");
            };
            assert_eq!(height, 0.0);
        }
        assert!(drawing.mark("no-data").is_some());
        assert!(drawing.mark("pie:no-data").is_some());
        assert_eq!(drawing.marks_with_prefix("slice:").count(), 0);
    }
}
