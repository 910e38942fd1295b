//! Interactive differential-growth viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`GrowthSimulator`] plus
//! the UI state around it and implements [`eframe::App`] to draw and
//! control the simulation.

use diffgrowth_core::{
    Boundary, Circle, Config, GrowthError, GrowthSimulator, Polyline, Rectangle, SpatialIndex,
    types::NodeId,
};
use eframe::App;
use glam::Vec2;
use rand::rng;

/// Size of the simulated domain; it always starts at the origin.
const DOMAIN_SIZE: Vec2 = Vec2::new(500.0, 700.0);

/// Shape of the curve a reset starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedShape {
    /// Closed, slightly jittered circle.
    Circle,
    /// Open horizontal line with both ends pinned.
    Line,
}

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions and apply validated config edits.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Draw the domain, the optional quadtree leaves and the curve.
///
/// ### Fields
/// - `sim` - The simulator being shown.
/// - `cfg` - Growth parameters as edited in the side panel. Applied to
///   `sim` only once they validate.
/// - `seed_shape`, `seed_nodes`, `seed_radius` - What [`Viewer::reset`] builds.
/// - `rng` - Random number generator for the seed jitter.
/// - `running` - Whether the simulation is auto-advancing.
/// - `zoom`, `pan` - World-to-screen mapping.
/// - `show_leaves` - Draw the quadtree leaf regions.
/// - `sim_dt` - Simulated seconds per step.
/// - `step_interval` - Wall-clock seconds between automatic steps.
/// - `last_added` - Nodes added by edge splitting in the last step.
/// - `error` - Set when the simulator failed; stepping stays disabled until reset.
pub struct Viewer {
    sim: GrowthSimulator,
    cfg: Config,

    seed_shape: SeedShape,
    seed_nodes: usize,
    seed_radius: f32,
    rng: rand::rngs::ThreadRng,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,
    show_leaves: bool,

    sim_dt: f32,
    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
    last_added: usize,

    error: Option<String>,
    leaves: Vec<Rectangle>,
}

impl Viewer {
    /// Creates a viewer with a jittered circle in the middle of the domain.
    ///
    /// ### Errors
    /// Whatever [`GrowthSimulator::new`] reports for the default setup.
    pub fn new() -> Result<Self, GrowthError> {
        let mut rng = rng();
        let cfg = Config::default();
        let seed_shape = SeedShape::Circle;
        let seed_nodes = 60;
        let seed_radius = 40.0;
        let sim = Self::build(seed_shape, seed_nodes, seed_radius, domain_center(), cfg, &mut rng)?;

        Ok(Self {
            sim,
            cfg,
            seed_shape,
            seed_nodes,
            seed_radius,
            rng,
            running: false,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            show_leaves: false,
            sim_dt: 1.0 / 30.0,
            step_interval: 1.0 / 30.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
            last_added: 0,
            error: None,
            leaves: Vec::new(),
        })
    }

    /// Builds a fresh simulator with the seed curve centred on `center`.
    fn build(
        shape: SeedShape,
        nodes: usize,
        radius: f32,
        center: Vec2,
        cfg: Config,
        rng: &mut impl rand::Rng,
    ) -> Result<GrowthSimulator, GrowthError> {
        let domain = Rectangle::new(Vec2::ZERO, DOMAIN_SIZE)?;
        let index = SpatialIndex::new(domain);
        match shape {
            SeedShape::Circle => {
                let positions = Polyline::jittered_circle_positions(center, radius, nodes, 1.0, rng);
                let cfg = Config { closed: true, ..cfg };
                GrowthSimulator::new(positions, index, cfg)
            }
            SeedShape::Line => {
                let half = Vec2::new(radius, 0.0);
                let positions = Polyline::line_positions(center - half, center + half, nodes.max(2));
                let cfg = Config { closed: false, ..cfg };
                let mut sim = GrowthSimulator::new(positions, index, cfg)?;
                let last = sim.len() - 1;
                sim.set_fixed(0, true)?;
                sim.set_fixed(last, true)?;
                Ok(sim)
            }
        }
    }

    /// Moves `at` inward until a seed curve of `seed_radius` around it fits
    /// inside the domain, with a small margin for the jitter.
    fn seed_center(&self, at: Vec2) -> Vec2 {
        let margin = (self.seed_radius + 2.0).min(DOMAIN_SIZE.min_element() * 0.5);
        at.clamp(Vec2::splat(margin), DOMAIN_SIZE - margin)
    }

    /// Replaces the simulator with a new seed curve centred near `at`.
    ///
    /// Keeps the camera and the edited config and stops auto-running. If the
    /// new curve cannot be built the current simulator is kept as it was and
    /// the failure is only logged.
    fn reseed(&mut self, at: Vec2) {
        let center = self.seed_center(at);
        self.running = false;
        match Self::build(
            self.seed_shape,
            self.seed_nodes,
            self.seed_radius,
            center,
            self.cfg,
            &mut self.rng,
        ) {
            Ok(sim) => {
                self.sim = sim;
                self.error = None;
                self.last_added = 0;
            }
            Err(err) => log::warn!("could not seed a new curve at {center}: {err}"),
        }
    }

    fn reset(&mut self) {
        self.reseed(domain_center());
    }

    /// Advances the simulation by one tick and splits long edges.
    ///
    /// A failing tick leaves the simulator unusable: the error is logged,
    /// stored for the status bar and auto-running stops.
    fn step_once(&mut self) {
        if self.error.is_some() {
            return;
        }
        let result = self
            .sim
            .update(self.sim_dt)
            .and_then(|()| self.sim.split_long_edges());
        match result {
            Ok(added) => self.last_added = added,
            Err(err) => {
                log::error!("simulation stopped: {err}");
                self.running = false;
                self.error = Some(err.to_string());
            }
        }
    }

    /// Pushes panel edits to the simulator if they validate.
    ///
    /// Rejected edits are logged and rolled back to the simulator's config.
    fn apply_config_edits(&mut self) {
        let live = *self.sim.config();
        if (Config { closed: live.closed, ..self.cfg }) == live {
            return;
        }
        if let Err(err) = self.sim.set_config(self.cfg) {
            log::warn!("rejected config edit: {err}");
            self.cfg = Config {
                closed: self.cfg.closed,
                ..live
            };
        }
    }

    /// Pins or releases the node closest to `world`, if one is within a few
    /// pixels.
    fn toggle_pin_near(&mut self, world: Vec2) {
        let query = Circle::new(world, 6.0 / self.zoom);
        let nodes = &self.sim.polyline().nodes;
        let closest: Option<NodeId> = self
            .sim
            .index()
            .circle_query(&query, nodes)
            .into_iter()
            .min_by(|&a, &b| {
                let da = nodes[a].position.distance_squared(world);
                let db = nodes[b].position.distance_squared(world);
                da.total_cmp(&db)
            });

        let Some(id) = closest else {
            return;
        };
        let fixed = self.sim.node(id).is_some_and(|n| n.fixed);
        if let Err(err) = self.sim.set_fixed(id, !fixed) {
            log::warn!("could not pin node {id}: {err}");
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The domain centre maps to the centre of `rect`; both axes point the
    /// same way as egui's, so no flip is needed.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let rel = p - domain_center();
        egui::pos2(
            center.x + rel.x * self.zoom + self.pan.x,
            center.y + rel.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`], up to rounding.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (p.y - center.y - self.pan.y) / self.zoom;
        domain_center() + Vec2::new(x, y)
    }

    fn world_rect_to_screen(&self, r: Rectangle, rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.world_to_screen(r.min(), rect),
            self.world_to_screen(r.max(), rect),
        )
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let can_run = self.error.is_none();
                if ui
                    .add_enabled(
                        can_run,
                        egui::Button::new(if self.running { "⏸ Pause" } else { "▶ Run" }),
                    )
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("interval = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );
                ui.add(
                    egui::DragValue::new(&mut self.sim_dt)
                        .prefix("sim dt = ")
                        .range(0.001..=0.5)
                        .speed(0.001),
                );

                if ui.add_enabled(can_run, egui::Button::new("Step")).clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.checkbox(&mut self.show_leaves, "Quadtree");
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (timing, node and region counts, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("interval = {:.3} s", self.step_interval));
                ui.label(format!("last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("nodes = {}", self.sim.len()));
                ui.label(format!("added = {}", self.last_added));
                ui.label(format!("regions = {}", self.sim.index().region_count()));
                if let Some(err) = &self.error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, err);
                }
            });
        });
    }

    /// Builds the right-hand configuration panel for growth parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Distances");
                Self::labeled_drag_f32(ui, "min_distance:", &mut self.cfg.min_distance, 0.0..=100.0, 0.1);
                Self::labeled_drag_f32(
                    ui,
                    "repulsion_radius:",
                    &mut self.cfg.repulsion_radius,
                    0.0..=200.0,
                    0.5,
                );
                Self::labeled_drag_f32(
                    ui,
                    "max_edge_length:",
                    &mut self.cfg.max_edge_length,
                    0.0..=100.0,
                    0.1,
                );

                ui.separator();
                ui.label("Motion");
                Self::labeled_drag_f32(ui, "max_speed:", &mut self.cfg.max_speed, 0.0..=500.0, 1.0);
                Self::labeled_drag_f32(ui, "max_force:", &mut self.cfg.max_force, 0.0..=500.0, 1.0);
                Self::labeled_drag_f32(ui, "node_mass:", &mut self.cfg.node_mass, 0.0..=10.0, 0.05);

                ui.separator();
                ui.label("Weights");
                Self::labeled_drag_f32(
                    ui,
                    "attraction:",
                    &mut self.cfg.attraction_weight,
                    0.0..=5.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "repulsion:",
                    &mut self.cfg.repulsion_weight,
                    0.0..=5.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "containment:",
                    &mut self.cfg.containment_weight,
                    0.0..=5.0,
                    0.05,
                );

                ui.separator();
                let mut bounded = self.cfg.boundary.is_some();
                ui.checkbox(&mut bounded, "Circular boundary");
                match (bounded, self.cfg.boundary) {
                    (true, None) => {
                        self.cfg.boundary = Some(Boundary::Circle {
                            center: domain_center(),
                            radius: DOMAIN_SIZE.min_element() * 0.45,
                        });
                    }
                    (false, Some(_)) => self.cfg.boundary = None,
                    _ => {}
                }
                if let Some(Boundary::Circle { radius, .. }) = &mut self.cfg.boundary {
                    Self::labeled_drag_f32(ui, "radius:", radius, 0.0..=1000.0, 1.0);
                }

                ui.separator();
                ui.label("Seed");
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.seed_shape, SeedShape::Circle, "○ Circle");
                    ui.selectable_value(&mut self.seed_shape, SeedShape::Line, "― Line");
                });
                ui.horizontal(|ui| {
                    ui.label("nodes:");
                    ui.add(egui::DragValue::new(&mut self.seed_nodes).range(2..=2000));
                });
                Self::labeled_drag_f32(ui, "size:", &mut self.seed_radius, 1.0..=240.0, 1.0);
                ui.label("Click the canvas to seed there, right-click a node to pin it.");

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });

        self.apply_config_edits();
    }

    /// Builds the central panel where the curve is drawn and interacted with.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if response.dragged() {
                self.pan += response.drag_delta();
            }

            let hover_world = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            if let Some(world) = hover_world {
                if response.clicked() && self.sim.bounds().contains_point(world) {
                    self.reseed(world);
                } else if response.secondary_clicked() {
                    self.toggle_pin_near(world);
                }
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            let domain = self.world_rect_to_screen(self.sim.bounds(), rect);
            painter.rect_stroke(
                domain,
                0.0,
                egui::Stroke::new(1.0, egui::Color32::GRAY),
                egui::StrokeKind::Inside,
            );

            if self.show_leaves {
                self.leaves.clear();
                self.sim.index().leaf_bounds(&mut self.leaves);
                let stroke = egui::Stroke::new(0.5, egui::Color32::from_rgb(70, 70, 90));
                for leaf in &self.leaves {
                    let r = self.world_rect_to_screen(*leaf, rect);
                    painter.rect_stroke(r, 0.0, stroke, egui::StrokeKind::Inside);
                }
            }

            if let Some(Boundary::Circle { center, radius }) = self.sim.config().boundary {
                painter.circle_stroke(
                    self.world_to_screen(center, rect),
                    radius * self.zoom,
                    egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                );
            }

            let points: Vec<egui::Pos2> = self
                .sim
                .positions()
                .map(|p| self.world_to_screen(p, rect))
                .collect();
            let stroke = egui::Stroke::new(1.5, egui::Color32::LIGHT_GREEN);
            if self.sim.is_closed() {
                painter.add(egui::Shape::closed_line(points, stroke));
            } else {
                painter.add(egui::Shape::line(points, stroke));
            }

            for node in self.sim.nodes().filter(|n| n.fixed) {
                let p = self.world_to_screen(node.position, rect);
                painter.circle_filled(p, 3.0, egui::Color32::RED);
            }

            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

fn domain_center() -> Vec2 {
    DOMAIN_SIZE * 0.5
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
