use anyhow::Result;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext},
    display::{GetGlDisplay, GlDisplay},
    prelude::{GlSurface, NotCurrentGlContext},
    surface::{Surface as GlutinSurface, SurfaceAttributesBuilder, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::EventLoop,
    window::Window,
};

use loadscreen::egui_integration::EguiIntegration;
use loadscreen::skeleton::{create_skeleton, SkeletonKind, SkeletonOptions, SkeletonWidth};
use loadscreen::ui::{self, UiAction};
use loadscreen::{
    set_button_loading, Config, FormState, Link, LinkContext, Loader, RequestTracker,
    RequestWorker, SkeletonSlot, Theme, ToastLevel, ToastQueue,
};

/// Demo host for the loading layer, mimicking the farm management app's views.
const HOST: &str = "farm.example.com";

/// Simulated server latency for a page navigation.
const NAV_LATENCY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Dashboard,
    Sows,
    Litters,
    Expenses,
    Invoices,
}

impl Page {
    const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Sows,
        Page::Litters,
        Page::Expenses,
        Page::Invoices,
    ];

    fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Sows => "Sows",
            Page::Litters => "Litters",
            Page::Expenses => "Expenses",
            Page::Invoices => "Invoices",
        }
    }

    fn path(self) -> &'static str {
        match self {
            Page::Dashboard => "/dashboard",
            Page::Sows => "/sows",
            Page::Litters => "/litters",
            Page::Expenses => "/expenses",
            Page::Invoices => "/invoices",
        }
    }

    /// How long the simulated document load takes. Invoices deliberately
    /// exceeds the 5s fallback to demonstrate the force-hide.
    fn load_time(self) -> Duration {
        match self {
            Page::Invoices => Duration::from_millis(6000),
            _ => Duration::from_millis(500),
        }
    }
}

struct Env {
    gl_surface: GlutinSurface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

/// What a worker result should do once it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Toast,
    FormSubmit,
    SectionReload,
    SowRecords,
}

struct App {
    env: Env,
    egui: EguiIntegration,
    config: Config,
    tracker: RequestTracker,
    worker: RequestWorker,
    loader: Loader,
    toasts: ToastQueue,

    page: Page,
    history: Vec<Page>,
    pending_nav: Option<(Page, Instant)>,
    document_loaded_at: Option<Instant>,

    pending: Vec<(u64, PendingKind)>,
    expense_form: FormState,
    search_form: FormState,
    sow_slots: Vec<SkeletonSlot>,
    export_started: Option<Instant>,
}

impl App {
    fn new(env: Env, egui: EguiIntegration, config: Config) -> Self {
        let now = Instant::now();
        let tracker = RequestTracker::new();
        let worker = RequestWorker::new(tracker.clone());
        let mut loader = Loader::with_tracker(&config, tracker.clone(), now);
        loader.register_section("expense-table");

        // The first view is "loading" until its simulated document load fires.
        let document_loaded_at = Some(now + Page::Dashboard.load_time());

        Self {
            env,
            egui,
            config,
            tracker,
            worker,
            loader,
            toasts: ToastQueue::new(),
            page: Page::Dashboard,
            history: Vec::new(),
            pending_nav: None,
            document_loaded_at,
            pending: Vec::new(),
            expense_form: FormState::new("Add expense"),
            search_form: FormState::new("Search").async_submit(),
            sow_slots: Vec::new(),
            export_started: None,
        }
    }

    fn navigate(&mut self, target: Page, now: Instant) {
        let ctx = LinkContext::new(HOST, self.page.path(), "");
        let link = Link::new(target.path());
        if self.loader.on_link_click(&ctx, &link) {
            self.pending_nav = Some((target, now + NAV_LATENCY));
        }
    }

    fn arrive(&mut self, target: Page, now: Instant) {
        self.history.push(self.page);
        self.page = target;
        // Fresh view, shared tracker; overlay starts visible.
        self.loader = Loader::with_tracker(&self.config, self.tracker.clone(), now);
        self.loader.register_section("expense-table");
        self.document_loaded_at = Some(now + target.load_time());
        self.expense_form = FormState::new("Add expense");
        self.sow_slots.clear();

        if target == Page::Sows {
            self.request_sow_records(now);
        }
    }

    fn go_back(&mut self, now: Instant) {
        let Some(previous) = self.history.pop() else {
            return;
        };
        self.page = previous;
        // A restored view is already rendered: never show a stale overlay.
        self.loader = Loader::with_tracker(&self.config, self.tracker.clone(), now);
        self.loader.register_section("expense-table");
        self.loader.on_page_restored(now);
        self.document_loaded_at = None;
        self.pending_nav = None;
    }

    fn request_sow_records(&mut self, _now: Instant) {
        self.sow_slots = (0..4)
            .map(|_| {
                SkeletonSlot::new(create_skeleton(
                    SkeletonKind::Text,
                    SkeletonOptions {
                        width: Some(SkeletonWidth::Medium),
                        class: None,
                    },
                ))
            })
            .collect();
        let id = self
            .worker
            .submit("sow records", Duration::from_millis(900), false);
        self.pending.push((id, PendingKind::SowRecords));
    }

    fn process_results(&mut self, now: Instant) {
        while let Some(result) = self.worker.poll() {
            let kind = self
                .pending
                .iter()
                .position(|(id, _)| *id == result.id)
                .map(|i| self.pending.swap_remove(i).1)
                .unwrap_or(PendingKind::Toast);

            match kind {
                PendingKind::Toast => match result.outcome {
                    Ok(msg) => {
                        self.toasts.push(
                            ToastLevel::Success,
                            msg,
                            now,
                            Duration::from_millis(self.config.toast_dismiss_ms),
                        );
                    }
                    Err(msg) => {
                        self.toasts.push(
                            ToastLevel::Error,
                            msg,
                            now,
                            Duration::from_millis(self.config.toast_dismiss_ms),
                        );
                    }
                },
                PendingKind::FormSubmit => {
                    set_button_loading(Some(&mut self.expense_form.submit), false);
                    self.loader.hide_mini();
                    let (level, msg) = match result.outcome {
                        Ok(_) => (ToastLevel::Success, "Expense recorded".to_string()),
                        Err(e) => (ToastLevel::Error, e),
                    };
                    self.toasts.push(
                        level,
                        msg,
                        now,
                        Duration::from_millis(self.config.toast_dismiss_ms),
                    );
                }
                PendingKind::SectionReload => {
                    self.loader.hide_section("expense-table");
                }
                PendingKind::SowRecords => {
                    let names = ["Bella (litter due 12 Sep)", "Rosie (7 weaners)",
                        "Petunia (served 3 Aug)", "Hazel (open)"];
                    for (slot, name) in self.sow_slots.iter_mut().zip(names) {
                        slot.replace(name, now);
                    }
                }
            }
        }
    }

    fn tick(&mut self, now: Instant) {
        if let Some((target, at)) = self.pending_nav {
            if now >= at {
                self.pending_nav = None;
                self.arrive(target, now);
            }
        }
        if let Some(at) = self.document_loaded_at {
            if now >= at {
                self.document_loaded_at = None;
                self.loader.on_document_loaded(now);
            }
        }
        if let Some(started) = self.export_started {
            let percent = now.saturating_duration_since(started).as_secs_f32() / 3.0 * 100.0;
            if percent >= 100.0 {
                self.export_started = None;
                self.loader.hide_progress(now);
                self.toasts.push(
                    ToastLevel::Success,
                    "Herd report exported",
                    now,
                    Duration::from_millis(self.config.toast_dismiss_ms),
                );
            } else {
                self.loader.update_progress(percent);
            }
        }

        self.process_results(now);
        self.loader.tick(now);
        self.toasts
            .tick(now, Duration::from_millis(self.config.toast_fade_ms));
    }

    fn busy(&self) -> bool {
        self.loader.is_busy()
            || self.pending_nav.is_some()
            || self.document_loaded_at.is_some()
            || self.export_started.is_some()
            || !self.worker.is_idle()
            || !self.toasts.is_empty()
    }

    fn build_ui(&mut self, now: Instant) -> Vec<UiAction> {
        let ctx = self.egui.ctx.clone();
        let mut nav_target: Option<Page> = None;
        let mut go_back = false;

        egui::TopBottomPanel::top("nav_bar").show(&ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("\u{2190} Back").clicked() {
                    go_back = true;
                }
                ui.separator();
                for page in Page::ALL {
                    let selected = page == self.page;
                    if ui.selectable_label(selected, page.title()).clicked() && !selected {
                        nav_target = Some(page);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let dark = self.config.theme == Theme::Dark;
                    if ui.selectable_label(dark, "\u{1F319}").clicked() {
                        self.config.theme = if dark { Theme::Light } else { Theme::Dark };
                        self.config.save();
                        apply_theme(&ctx, self.config.theme);
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(&ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{}{}", HOST, self.page.path()));
                ui.separator();
                let active = self.tracker.active();
                if active > 0 {
                    ui.label(format!("{} request(s) in flight", active));
                } else {
                    ui.label("Idle");
                }
            });
        });

        egui::CentralPanel::default().show(&ctx, |ui| {
            ui.heading(self.page.title());
            ui.add_space(8.0);
            match self.page {
                Page::Dashboard => self.dashboard_page(ui, now),
                Page::Sows => self.sows_page(ui, now),
                Page::Litters => self.litters_page(ui),
                Page::Expenses => self.expenses_page(ui, now),
                Page::Invoices => {
                    ui.label("Invoice history for the current billing year.");
                    ui.label("(This page simulates a stalled load: the overlay is force-hidden by the fallback.)");
                }
            }
        });

        let actions = ui::draw_loading_layer(&ctx, &self.loader, &self.toasts, &self.config, now);

        if let Some(target) = nav_target {
            self.navigate(target, now);
        }
        if go_back {
            self.go_back(now);
        }

        actions
    }

    fn dashboard_page(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.label("Herd overview and quick actions.");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button("Refresh stats").clicked() {
                let id = self
                    .worker
                    .submit("herd stats", Duration::from_millis(800), false);
                self.pending.push((id, PendingKind::Toast));
            }
            if ui.button("Sync everything").clicked() {
                // Three overlapping requests; the mini loader must stay up
                // until the slowest settles.
                for (label, ms, fail) in [
                    ("sow register", 600, false),
                    ("feed prices", 1100, true),
                    ("litter records", 1600, false),
                ] {
                    let id = self.worker.submit(label, Duration::from_millis(ms), fail);
                    self.pending.push((id, PendingKind::Toast));
                }
            }
            if ui.button("Export herd report").clicked() && self.export_started.is_none() {
                self.export_started = Some(now);
                self.loader.show_progress(false);
            }
            if ui.button("Import (indeterminate)").clicked() {
                self.loader.show_progress(true);
            }
            if ui.button("Finish import").clicked() {
                self.loader.hide_progress(now);
            }
        });
    }

    fn sows_page(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.label("Breeding sows currently on the books.");
        ui.add_space(8.0);
        if self.sow_slots.is_empty() {
            if ui.button("Load records").clicked() {
                self.request_sow_records(now);
            }
            return;
        }
        let fade = Duration::from_millis(self.config.skeleton_fade_ms);
        for slot in &self.sow_slots {
            ui::skeleton::show_skeleton_slot(ui, slot, now, fade);
            ui.add_space(4.0);
        }
    }

    fn litters_page(&mut self, ui: &mut egui::Ui) {
        ui.label("Litters by farrowing date.");
        ui.add_space(8.0);
        ui.label("Nothing here talks to the server; navigation is the demo.");
    }

    fn expenses_page(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.label("Operating expenses.");
        ui.add_space(8.0);

        // Classic form: submission disables the button and shows the mini
        // loader until the server answers.
        ui.group(|ui| {
            ui.label("New expense");
            let response = ui::button::loading_button(ui, &self.expense_form.submit);
            if response.clicked() {
                self.loader.on_form_submit(&mut self.expense_form);
                let id = self
                    .worker
                    .submit("save expense", Duration::from_millis(800), false);
                self.pending.push((id, PendingKind::FormSubmit));
            }
        });

        // Async-flagged form: the loading layer leaves it alone.
        ui.group(|ui| {
            ui.label("Search expenses (handles its own spinner)");
            let response = ui::button::loading_button(ui, &self.search_form.submit);
            if response.clicked() {
                self.loader.on_form_submit(&mut self.search_form);
            }
        });

        ui.add_space(8.0);
        ui.group(|ui| {
            ui.label("Expense table");
            let table_rect = ui
                .vertical(|ui| {
                    for row in ["Feed - R 12,400", "Vet - R 3,150", "Fuel - R 1,980"] {
                        ui.label(row);
                    }
                })
                .response
                .rect;
            if ui.button("Reload table").clicked()
                && !self.loader.section_active("expense-table")
            {
                self.loader.show_section("expense-table");
                let id = self
                    .worker
                    .submit("expense table", Duration::from_millis(1200), false);
                self.pending.push((id, PendingKind::SectionReload));
            }
            ui::section::show_section_overlay(
                ui,
                table_rect,
                self.loader.section_active("expense-table"),
            );
        });
    }

    fn redraw(&mut self) {
        let size = self.env.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }

        let now = Instant::now();
        self.tick(now);

        self.egui.begin_frame(&self.env.window);
        let actions = self.build_ui(now);
        for action in actions {
            match action {
                UiAction::DismissToast(id) => {
                    self.toasts
                        .dismiss(id, now, Duration::from_millis(self.config.toast_fade_ms));
                }
                UiAction::None => {}
            }
        }
        self.egui.end_frame(&self.env.window);

        egui_glow::painter::clear(
            self.egui.painter.gl(),
            [size.width, size.height],
            [0.96, 0.96, 0.97, 1.0],
        );
        self.egui.paint(&self.env.window);

        self.env
            .gl_surface
            .swap_buffers(&self.env.gl_context)
            .expect("Could not swap buffers");
    }
}

fn apply_theme(ctx: &egui::Context, theme: Theme) {
    match theme {
        Theme::Light => ctx.set_visuals(egui::Visuals::light()),
        Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {}

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let response = self.egui.handle_event(&self.env.window, &event);
        if response.repaint {
            self.env.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(physical_size) => {
                let (width, height): (u32, u32) = physical_size.into();
                self.env.gl_surface.resize(
                    &self.env.gl_context,
                    NonZeroU32::new(width.max(1)).unwrap(),
                    NonZeroU32::new(height.max(1)).unwrap(),
                );
                self.env.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        // Keep frames coming while deadlines or animations are pending.
        if self.busy() || self.egui.wants_repaint() {
            self.env.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load();
    log::info!("Starting loadscreen demo");

    let el = EventLoop::new()?;

    let window_attributes = Window::default_attributes()
        .with_inner_size(LogicalSize::new(1000.0, 700.0))
        .with_resizable(true)
        .with_title("loadscreen demo");

    let template = ConfigTemplateBuilder::new().with_alpha_size(8);

    let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes));
    let (window, gl_config) = display_builder
        .build(&el, template, |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() < accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .unwrap()
        })
        .unwrap();
    let window = window.expect("Could not create window with OpenGL context");
    let window_handle = window
        .window_handle()
        .expect("Failed to retrieve window handle");
    let raw_window_handle = window_handle.as_raw();

    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let fallback_context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(None))
        .build(Some(raw_window_handle));

    let not_current_gl_context = unsafe {
        gl_config
            .display()
            .create_context(&gl_config, &context_attributes)
            .unwrap_or_else(|_| {
                gl_config
                    .display()
                    .create_context(&gl_config, &fallback_context_attributes)
                    .expect("failed to create context")
            })
    };

    let (width, height): (u32, u32) = window.inner_size().into();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(width).unwrap(),
        NonZeroU32::new(height).unwrap(),
    );

    let gl_surface = unsafe {
        gl_config
            .display()
            .create_window_surface(&gl_config, &attrs)
            .expect("Could not create gl window surface")
    };

    let gl_context = not_current_gl_context
        .make_current(&gl_surface)
        .expect("Could not make GL context current");

    let egui = EguiIntegration::new(&window, &gl_context)?;
    apply_theme(&egui.ctx, config.theme);
    egui.ctx.set_zoom_factor(config.ui_font_scale);

    let env = Env {
        gl_surface,
        gl_context,
        window,
    };

    let mut app = App::new(env, egui, config);
    el.run_app(&mut app).expect("Couldn't run event loop");

    Ok(())
}
