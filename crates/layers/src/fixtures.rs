//! Small story dataset shared by the chart tests.

use formats::{
    CategoryDimension, DataBundle, GeoFeature, GeoGeometry, GeoPoint, HealthRow, Observation,
    PeriodTable, TimeSeriesRecord, UnemploymentRow,
};
use foundation::viewport::Viewport;
use scene::{
    Chart, ChartScene, Drawing, PointerEvent, PointerOutcome, RenderContext, SceneRenderer,
    SceneState, StoryConfig, Tooltip,
};

pub fn bundle() -> DataBundle {
    let mut b = DataBundle::empty(CategoryDimension::canadian_provinces());
    b.immigration = PeriodTable {
        categories: vec!["Ontario".into(), "Quebec".into(), "Yukon".into()],
        records: vec![
            TimeSeriesRecord::new(2000).with("Ontario", 10.0).with("Quebec", 20.0),
            TimeSeriesRecord::new(2001).with("Ontario", 15.0).with("Quebec", 25.0),
            TimeSeriesRecord::new(2002)
                .with("Ontario", 19.0)
                .with("Quebec", 30.0)
                .with("Yukon", 1.0),
        ],
    };

    let prices = [
        ("Ontario", [300.0, 320.0, 330.0, 335.0, 350.0]),
        ("Quebec", [200.0, 210.0, 215.0, 220.0, 230.0]),
        ("British Columbia", [400.0, 430.0, 420.0, 450.0, 470.0]),
        ("Alberta", [250.0, 280.0, 270.0, 265.0, 275.0]),
        ("Canada", [900.0, 900.0, 900.0, 900.0, 900.0]),
    ];
    for (province, values) in prices {
        for (i, v) in values.iter().enumerate() {
            b.housing.push(Observation {
                period: 2006 + i as i32,
                category: province.to_string(),
                value: Some(*v),
            });
        }
    }
    // One missing measurement: Quebec 2009.
    b.housing
        .iter_mut()
        .filter(|o| o.category == "Quebec" && o.period == 2009)
        .for_each(|o| o.value = None);

    b.unemployment = vec![
        unemployment("Ontario", Some(7.6), Some(98000.0)),
        unemployment("Quebec", Some(6.2), Some(52000.0)),
        unemployment("Newfoundland and Labrador", Some(10.5), Some(1800.0)),
        unemployment("Prince Edward Island", Some(7.3), Some(2600.0)),
        unemployment("Nunavut", Some(13.4), None),
    ];

    b.health = vec![
        health("Ontario", Some(12.0)),
        health("British Columbia", Some(15.5)),
        health("Nova Scotia", Some(20.0)),
    ];

    b.boundaries = vec![
        square("Ontario", (-95.0, -74.0), (42.0, 56.0)),
        square("Quebec", (-79.0, -57.0), (45.0, 62.0)),
        square("British Columbia", (-139.0, -114.0), (48.0, 60.0)),
        square("Nova Scotia", (-66.0, -60.0), (43.5, 47.0)),
    ];
    b
}

fn unemployment(province: &str, rate: Option<f64>, immigrants: Option<f64>) -> UnemploymentRow {
    UnemploymentRow {
        province: province.to_string(),
        unemployment_rate: rate,
        immigrants,
    }
}

fn health(province: &str, pct: Option<f64>) -> HealthRow {
    HealthRow {
        province: province.to_string(),
        unmet_needs_pct: pct,
    }
}

fn square(name: &str, lon: (f64, f64), lat: (f64, f64)) -> GeoFeature {
    GeoFeature::new(
        name,
        GeoGeometry::Polygon(vec![vec![
            GeoPoint::new(lon.0, lat.0),
            GeoPoint::new(lon.1, lat.0),
            GeoPoint::new(lon.1, lat.1),
            GeoPoint::new(lon.0, lat.1),
            GeoPoint::new(lon.0, lat.0),
        ]]),
    )
}

/// First render of `chart` with default configuration.
pub fn render<C: Chart>(chart: C, bundle: &DataBundle, viewport: Viewport) -> (Drawing, SceneState) {
    let mut session = Session::mount(chart, bundle, viewport);
    let drawing = session.last.take().expect("first render");
    (drawing, session.state)
}

/// A chart scene driven by hand, without a manager.
pub struct Session<'a, C: Chart> {
    scene: ChartScene<C>,
    bundle: &'a DataBundle,
    config: StoryConfig,
    viewport: Viewport,
    pub state: SceneState,
    pub last: Option<Drawing>,
}

impl<'a, C: Chart> Session<'a, C> {
    pub fn mount(chart: C, bundle: &'a DataBundle, viewport: Viewport) -> Self {
        let mut session = Self {
            scene: ChartScene::new(chart),
            bundle,
            config: StoryConfig::default(),
            viewport,
            state: SceneState::new(),
            last: None,
        };
        session.redraw();
        session
    }

    pub fn ctx(&self) -> RenderContext<'_> {
        RenderContext::new(self.bundle, &self.config, self.viewport, self.state.has_rendered)
    }

    pub fn redraw(&mut self) -> &Drawing {
        let ctx = RenderContext::new(self.bundle, &self.config, self.viewport, self.state.has_rendered);
        let drawing = self.scene.render(&ctx, &mut self.state).expect("render");
        self.last.insert(drawing)
    }

    /// Tooltip for `key` against freshly prepared aggregates.
    pub fn describe(&self, key: &str) -> Option<Tooltip> {
        let chart = self.scene.chart();
        let data = chart.prepare(self.bundle, &self.config, &self.state);
        chart.describe(&self.ctx(), &self.state, &data, key)
    }

    pub fn pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        let ctx = RenderContext::new(self.bundle, &self.config, self.viewport, self.state.has_rendered);
        self.scene.pointer(&ctx, &mut self.state, &event)
    }
}
