//! Unemployment rate against newly admitted immigrants, one dot per province
//! on a log x-scale.

use compute::{Statistics, share_of};
use formats::{DataBundle, UnemploymentRow};
use foundation::math::Vec2;
use foundation::viewport::{Margins, PlotArea};
use scene::{
    Anchor, Chart, Drawing, Mark, RenderContext, RenderError, SceneState, Shape, StoryConfig, Style,
    Tooltip, Transition, format_count,
};
use tracing::debug;

use crate::axes::{bottom_axis, left_axis, no_data, short_number};
use crate::scales::{LinearScale, LogScale};
use crate::symbology::{CALLOUT, MEAN_RULE};

const ID: &str = "unemployment";
const CAPTION: &str = "Unemployment and Immigration by Province";

const MARGINS: Margins = Margins::new(60.0, 130.0, 60.0, 80.0);
const NARROW_MARGINS: Margins = Margins::new(60.0, 40.0, 60.0, 60.0);
const DOT_RADIUS: f64 = 6.0;
const DOT_STAGGER_MS: f64 = 100.0;
const DOT_DURATION_MS: f64 = 800.0;

/// A row that can sit on the log axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub province: String,
    pub immigrants: f64,
    pub rate: f64,
}

/// Rows with both measurements and a positive immigrant count, in table
/// order. Everything else cannot be placed on a log scale.
pub fn scatter_points(rows: &[UnemploymentRow]) -> Vec<ScatterPoint> {
    rows.iter()
        .filter_map(|r| match (r.immigrants, r.unemployment_rate) {
            (Some(immigrants), Some(rate)) if immigrants > 0.0 => Some(ScatterPoint {
                province: r.province.clone(),
                immigrants,
                rate,
            }),
            _ => {
                debug!(province = %r.province, "row left off the scatter");
                None
            }
        })
        .collect()
}

/// Mean of every present unemployment rate.
pub fn mean_rate(rows: &[UnemploymentRow]) -> Option<f64> {
    Statistics::mean_present(rows.iter().map(|r| r.unemployment_rate))
}

/// Aggregates behind the scatter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnemploymentData {
    pub points: Vec<ScatterPoint>,
    /// Mean over every reported rate, plotted or not.
    pub mean: Option<f64>,
    pub max_rate: Option<f64>,
}

impl UnemploymentData {
    pub fn from_rows(rows: &[UnemploymentRow]) -> Self {
        Self {
            points: scatter_points(rows),
            mean: mean_rate(rows),
            max_rate: Statistics::max_present(rows.iter().map(|r| r.unemployment_rate)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnemploymentChart;

impl UnemploymentChart {
    fn draw_legend(
        &self,
        d: &mut Drawing,
        ctx: &RenderContext<'_>,
        points: &[ScatterPoint],
        area: PlotArea,
    ) {
        let legend_x = area.right() + 20.0;
        for (row, p) in points.iter().enumerate() {
            let top = area.y + row as f64 * 20.0;
            d.push(Mark::new(
                format!("legend:{}", p.province),
                Shape::Rect {
                    x: legend_x,
                    y: top,
                    width: 12.0,
                    height: 12.0,
                },
                Style::filled(ctx.bundle.dimension.color(&p.province)),
            ));
            d.push(Mark::label(
                format!("legend:{}:label", p.province),
                Vec2::new(legend_x + 18.0, top + 10.0),
                p.province.clone(),
                Anchor::Start,
            ));
        }
    }
}

impl Chart for UnemploymentChart {
    type Data = UnemploymentData;

    fn id(&self) -> &'static str {
        ID
    }

    fn caption(&self) -> &str {
        CAPTION
    }

    fn prepare(&self, bundle: &DataBundle, _config: &StoryConfig, _state: &SceneState) -> UnemploymentData {
        UnemploymentData::from_rows(&bundle.unemployment)
    }

    fn draw(
        &self,
        ctx: &RenderContext<'_>,
        _state: &SceneState,
        data: &UnemploymentData,
    ) -> Result<Drawing, RenderError> {
        let points = &data.points;
        let wide = ctx.layout.shows_secondary();
        let area = ctx.viewport.inner(if wide { MARGINS } else { NARROW_MARGINS });
        let x = Statistics::extent(points.iter().map(|p| Some(p.immigrants)))
            .and_then(|(min, max)| LogScale::new((min.max(1.0), max.max(1.0)), (area.x, area.right())));
        let top = data.max_rate.filter(|m| *m > 0.0).map_or(1.0, |m| m * 1.1);
        let y = LinearScale::new((0.0, top), (area.bottom(), area.y));

        let mut d = Drawing::new(ID, ctx.viewport, ctx.layout);
        let x_ticks: Vec<(f64, String)> = x
            .map(|x| {
                x.ticks()
                    .into_iter()
                    .filter_map(|v| x.apply(v).map(|px| (px, short_number(v))))
                    .collect()
            })
            .unwrap_or_default();
        d.marks.extend(bottom_axis("x-axis", area, &x_ticks));
        d.push(Mark::label(
            "x-axis:title",
            Vec2::new(area.x + area.width / 2.0, area.bottom() + 45.0),
            "Number of Immigrants (log scale)",
            Anchor::Middle,
        ));
        let y_ticks: Vec<(f64, String)> = y
            .ticks(6)
            .into_iter()
            .map(|v| (y.apply(v), format!("{}%", short_number(v))))
            .collect();
        d.marks.extend(left_axis("y-axis", area, &y_ticks));

        if let Some(mean) = data.mean {
            let my = y.apply(mean);
            d.push(Mark::new(
                "mean",
                Shape::Rule {
                    from: Vec2::new(area.x, my),
                    to: Vec2::new(area.right(), my),
                },
                Style::stroked(MEAN_RULE, 1.5).dashed(),
            ));
            d.push(Mark::label(
                "mean:label",
                Vec2::new(area.right() - 10.0, my - 6.0),
                format!("National average: {mean:.1}%"),
                Anchor::End,
            ));
        }

        let Some(x) = x else {
            debug!("no row can be placed on the log axis");
            d.push(no_data("no-data", area));
            return Ok(d);
        };

        for (i, p) in points.iter().enumerate() {
            let Some(cx) = x.apply(p.immigrants) else {
                continue;
            };
            let center = Vec2::new(cx, y.apply(p.rate));
            d.push(
                Mark::new(
                    format!("dot:{}", p.province),
                    Shape::Circle {
                        center,
                        radius: DOT_RADIUS,
                    },
                    Style::filled(ctx.bundle.dimension.color(&p.province)),
                )
                .interactive()
                .entering(
                    Transition::new(i as f64 * DOT_STAGGER_MS, DOT_DURATION_MS).from_shape(
                        Shape::Circle {
                            center: Vec2::new(cx, area.bottom()),
                            radius: DOT_RADIUS,
                        },
                    ),
                ),
            );
        }

        // Leader to the province with the most immigrants.
        let leader = points
            .iter()
            .max_by(|a, b| a.immigrants.total_cmp(&b.immigrants))
            .and_then(|p| x.apply(p.immigrants).map(|px| (p, px)));
        if let Some((p, px)) = leader {
            let at = Vec2::new(px, y.apply(p.rate));
            let elbow = at - Vec2::new(80.0, 60.0);
            d.push(Mark::new(
                "callout",
                Shape::Rule { from: at, to: elbow },
                Style::stroked(CALLOUT, 1.5).dashed(),
            ));
            d.push(Mark::label(
                "callout:label",
                elbow - Vec2::new(5.0, 35.0),
                format!("{} has the most immigrants", p.province),
                Anchor::End,
            ));
        }

        if wide {
            self.draw_legend(&mut d, ctx, points, area);
        }
        Ok(d)
    }

    fn describe(
        &self,
        _ctx: &RenderContext<'_>,
        _state: &SceneState,
        data: &UnemploymentData,
        key: &str,
    ) -> Option<Tooltip> {
        let province = key.strip_prefix("dot:")?;
        let point = data.points.iter().find(|p| p.province == province)?;
        let plotted: Vec<f64> = data.points.iter().map(|p| p.immigrants).collect();
        let mut tooltip = Tooltip::new(key, province)
            .line(format!("Immigrants: {}", format_count(point.immigrants)))
            .line(format!("Unemployment: {}%", point.rate));
        if let Some(share) = share_of(point.immigrants, &plotted) {
            tooltip = tooltip.line(format!("Share of plotted immigrants: {:.1}%", share * 100.0));
        }
        Some(tooltip)
    }
}
