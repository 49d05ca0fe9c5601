//! Unmet health needs by province as a filled map.

use std::collections::BTreeMap;

use compute::{Statistics, find_by_name};
use formats::{DataBundle, GeoFeature};
use foundation::math::Vec2;
use foundation::viewport::{Margins, PlotArea};
use scene::{
    Anchor, Chart, Drawing, Mark, RenderContext, RenderError, SceneState, Shape, StoryConfig, Style,
    Tooltip, Transition,
};
use tracing::debug;

use crate::axes::{bottom_axis, no_data};
use crate::projection::MercatorFit;
use crate::scales::{LinearScale, SequentialScale};
use crate::symbology::{NO_DATA, OR_RD, REGION_HOVER_STROKE, REGION_STROKE};

const ID: &str = "health";
const CAPTION: &str = "Unmet Health Needs Across Canadian Provinces";
const LEGEND_TITLE: &str = "Unmet Health Needs (%)";

const MARGINS: Margins = Margins::new(20.0, 20.0, 80.0, 20.0);
const FADE_IN_MS: f64 = 1000.0;
const LEGEND_WIDTH: f64 = 200.0;
const LEGEND_HEIGHT: f64 = 10.0;
const LEGEND_STEPS: usize = 10;

/// Unmet-needs percentage joined to a boundary by name; `None` when the
/// province has no row or the row has no value.
pub fn unmet_needs(bundle: &DataBundle, feature: &GeoFeature) -> Option<f64> {
    find_by_name(&bundle.health, &feature.name, |r| r.province.as_str())?.unmet_needs_pct
}

/// Color ramp from zero to the largest reported percentage.
pub fn health_scale(bundle: &DataBundle) -> SequentialScale {
    let max = Statistics::max_present(bundle.health.iter().map(|r| r.unmet_needs_pct)).unwrap_or(0.0);
    SequentialScale::new((0.0, max), &OR_RD)
}

pub fn region_key(feature: &GeoFeature) -> String {
    format!("region:{}", feature.name)
}

/// Joined values and the color ramp; projection is left to each draw.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthData {
    /// Unmet-needs percentage by boundary join key.
    pub values: BTreeMap<String, Option<f64>>,
    pub scale: SequentialScale,
}

impl HealthData {
    pub fn from_bundle(bundle: &DataBundle) -> Self {
        let values = bundle
            .boundaries
            .iter()
            .map(|feature| {
                let value = unmet_needs(bundle, feature);
                if value.is_none() {
                    debug!(region = %feature.name, "no health data joined");
                }
                (feature.join_key(), value)
            })
            .collect();
        Self {
            values,
            scale: health_scale(bundle),
        }
    }

    pub fn value(&self, feature: &GeoFeature) -> Option<f64> {
        self.values.get(&feature.join_key()).copied().flatten()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HealthChart;

impl HealthChart {
    fn draw_legend(&self, d: &mut Drawing, scale: &SequentialScale, area: PlotArea) {
        let left = area.right() - LEGEND_WIDTH - 40.0;
        let top = area.bottom() + 30.0;
        let (lo, hi) = scale.domain();
        let step = LEGEND_WIDTH / LEGEND_STEPS as f64;

        d.push(Mark::label(
            "legend:title",
            Vec2::new(left, top - 10.0),
            LEGEND_TITLE,
            Anchor::Start,
        ));
        for i in 0..LEGEND_STEPS {
            let t = (i as f64 + 0.5) / LEGEND_STEPS as f64;
            d.push(Mark::new(
                format!("legend:step:{i}"),
                Shape::Rect {
                    x: left + i as f64 * step,
                    y: top,
                    width: step,
                    height: LEGEND_HEIGHT,
                },
                Style::filled(scale.color(lo + t * (hi - lo))),
            ));
        }

        let axis = LinearScale::new((lo, hi), (left, left + LEGEND_WIDTH));
        let ticks: Vec<(f64, String)> = axis
            .ticks(5)
            .into_iter()
            .map(|v| (axis.apply(v), format!("{v}%")))
            .collect();
        let strip = PlotArea {
            x: left,
            y: top,
            width: LEGEND_WIDTH,
            height: LEGEND_HEIGHT,
        };
        d.marks.extend(bottom_axis("legend:axis", strip, &ticks));

        let swatch_x = left - 90.0;
        d.push(Mark::new(
            "legend:no-data",
            Shape::Rect {
                x: swatch_x,
                y: top,
                width: LEGEND_HEIGHT,
                height: LEGEND_HEIGHT,
            },
            Style::filled(NO_DATA),
        ));
        d.push(Mark::label(
            "legend:no-data:label",
            Vec2::new(swatch_x + LEGEND_HEIGHT + 6.0, top + LEGEND_HEIGHT / 2.0),
            "No data",
            Anchor::Start,
        ));
    }
}

impl Chart for HealthChart {
    type Data = HealthData;

    fn id(&self) -> &'static str {
        ID
    }

    fn caption(&self) -> &str {
        CAPTION
    }

    fn prepare(&self, bundle: &DataBundle, _config: &StoryConfig, _state: &SceneState) -> HealthData {
        HealthData::from_bundle(bundle)
    }

    fn draw(
        &self,
        ctx: &RenderContext<'_>,
        state: &SceneState,
        data: &HealthData,
    ) -> Result<Drawing, RenderError> {
        let bundle = ctx.bundle;
        let area = ctx.viewport.inner(MARGINS);
        let mut d = Drawing::new(ID, ctx.viewport, ctx.layout);
        let Some(fit) = MercatorFit::fit(&bundle.boundaries, area) else {
            debug!(regions = bundle.boundaries.len(), "no boundary extent to fit");
            d.push(no_data("no-data", area));
            self.draw_legend(&mut d, &data.scale, area);
            return Ok(d);
        };

        for feature in &bundle.boundaries {
            let key = region_key(feature);
            let fill = match data.value(feature) {
                Some(v) => data.scale.color(v),
                None => NO_DATA,
            };
            let stroke = if state.hovered.as_deref() == Some(key.as_str()) {
                REGION_HOVER_STROKE
            } else {
                REGION_STROKE
            };
            let polygons: Vec<Vec<Vec<Vec2>>> = feature
                .geometry
                .polygons()
                .into_iter()
                .map(|polygon| {
                    polygon
                        .iter()
                        .map(|ring| ring.iter().map(|p| fit.project(*p)).collect())
                        .collect()
                })
                .collect();
            d.push(
                Mark::new(
                    key,
                    Shape::Area { polygons },
                    Style::filled(fill).with_stroke(stroke, 1.0),
                )
                .interactive()
                .entering(Transition::new(0.0, FADE_IN_MS)),
            );
        }
        self.draw_legend(&mut d, &data.scale, area);
        Ok(d)
    }

    fn describe(
        &self,
        ctx: &RenderContext<'_>,
        _state: &SceneState,
        data: &HealthData,
        key: &str,
    ) -> Option<Tooltip> {
        let name = key.strip_prefix("region:")?;
        let feature = ctx.bundle.feature(name)?;
        let line = match data.value(feature) {
            Some(v) => format!("{v}% unmet needs"),
            None => "No data".to_string(),
        };
        Some(Tooltip::new(key, feature.name.clone()).line(line))
    }
}

#[cfg(test)]
mod tests {
    use super::{HealthChart, health_scale, unmet_needs};
    use crate::fixtures::{Session, bundle, render};
    use crate::symbology::{NO_DATA, OR_RD, REGION_HOVER_STROKE, REGION_STROKE};
    use foundation::math::Vec2;
    use foundation::viewport::Viewport;
    use pretty_assertions::assert_eq;
    use scene::{PointerEvent, PointerOutcome, Shape};

    #[test]
    fn missing_join_gets_no_data_fill() {
        let b = bundle();
        let (drawing, _) = render(HealthChart, &b, Viewport::new(800.0, 500.0));
        assert_eq!(drawing.marks_with_prefix("region:").count(), 4);
        let quebec = drawing.mark("region:Quebec").expect("quebec");
        assert_eq!(quebec.style.fill, Some(NO_DATA));
        let nova_scotia = drawing.mark("region:Nova Scotia").expect("nova scotia");
        assert_eq!(nova_scotia.style.fill, Some(OR_RD[8]));
        assert!(drawing.mark("legend:no-data").is_some());
    }

    #[test]
    fn join_ignores_case_and_whitespace() {
        let mut b = bundle();
        b.health[0].province = "  ONTARIO ".to_string();
        let ontario = b.feature("Ontario").expect("feature").clone();
        assert_eq!(unmet_needs(&b, &ontario), Some(12.0));
        assert_eq!(health_scale(&b).domain(), (0.0, 20.0));
    }

    #[test]
    fn regions_fit_inside_the_viewport() {
        let b = bundle();
        let (drawing, _) = render(HealthChart, &b, Viewport::new(800.0, 500.0));
        for mark in drawing.marks_with_prefix("region:") {
            let Shape::Area { polygons } = &mark.shape else {
                panic!("region is not an area");
            };
            for p in polygons.iter().flatten().flatten() {
                assert!(p.x >= -1e-6 && p.x <= 800.0 + 1e-6, "x out of view: {}", p.x);
                assert!(p.y >= -1e-6 && p.y <= 500.0 + 1e-6, "y out of view: {}", p.y);
            }
        }
    }

    #[test]
    fn quebec_tooltip_says_no_data() {
        let b = bundle();
        let mut session = Session::mount(HealthChart, &b, Viewport::new(800.0, 500.0));
        let outcome = session.pointer(PointerEvent::enter("region:Quebec", Vec2::new(400.0, 200.0)));
        assert_eq!(outcome, PointerOutcome::Redraw);
        let tooltip = session.state.tooltip.clone().expect("tooltip");
        assert_eq!(tooltip.title, "Quebec");
        assert_eq!(tooltip.lines, vec!["No data".to_string()]);
        assert_eq!(tooltip.position, Vec2::new(410.0, 160.0));

        let hovered = session.redraw().mark("region:Quebec").expect("quebec").clone();
        assert_eq!(hovered.style.stroke, Some(REGION_HOVER_STROKE));
        assert!(hovered.enter.is_none());

        assert_eq!(session.pointer(PointerEvent::leave("region:Quebec")), PointerOutcome::Redraw);
        assert!(session.state.tooltip.is_none());
        let plain = session.redraw().mark("region:Quebec").expect("quebec").clone();
        assert_eq!(plain.style.stroke, Some(REGION_STROKE));
    }

    #[test]
    fn reported_value_in_tooltip() {
        let b = bundle();
        let mut session = Session::mount(HealthChart, &b, Viewport::new(800.0, 500.0));
        session.pointer(PointerEvent::enter("region:British Columbia", Vec2::default()));
        let tooltip = session.state.tooltip.clone().expect("tooltip");
        assert_eq!(tooltip.lines, vec!["15.5% unmet needs".to_string()]);
    }

    #[test]
    fn no_health_values_fill_every_region_as_no_data() {
        let mut b = bundle();
        b.health.iter_mut().for_each(|r| r.unmet_needs_pct = None);
        let (drawing, _) = render(HealthChart, &b, Viewport::new(800.0, 500.0));
        assert_eq!(drawing.marks_with_prefix("region:").count(), 4);
        assert!(
            drawing
                .marks_with_prefix("region:")
                .all(|m| m.style.fill == Some(NO_DATA))
        );
        assert!(drawing.mark("legend:title").is_some());
    }

    #[test]
    fn missing_boundaries_draw_legend_and_no_data() {
        let mut b = bundle();
        b.boundaries.clear();
        let (drawing, _) = render(HealthChart, &b, Viewport::new(800.0, 500.0));
        assert!(drawing.mark("no-data").is_some());
        assert!(drawing.mark("legend:no-data").is_some());
        assert_eq!(drawing.marks_with_prefix("region:").count(), 0);
    }
}
