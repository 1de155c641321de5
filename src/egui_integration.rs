use anyhow::Result;
use egui_winit::EventResponse;
use glutin::display::{GetGlDisplay, GlDisplay};
use std::sync::Arc;

/// egui glue for the demo shell: owns the UI context, the winit platform
/// state, and the glow painter.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    pub winit_state: egui_winit::State,
    pub painter: egui_glow::Painter,
    shapes: Vec<egui::epaint::ClippedShape>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

impl EguiIntegration {
    /// The OpenGL context must be current before this is called.
    pub fn new(
        window: &winit::window::Window,
        gl_context: &glutin::context::PossiblyCurrentContext,
    ) -> Result<Self> {
        let display = gl_context.display();

        let glow_context = unsafe {
            glow::Context::from_loader_function(|s| {
                let s = std::ffi::CString::new(s)
                    .expect("failed to construct CString for GL function pointer");
                display.get_proc_address(s.as_c_str()).cast()
            })
        };
        let glow_context = Arc::new(glow_context);

        let painter = egui_glow::Painter::new(
            glow_context,
            "",
            None,  // shader_version
            false, // srgb
        )?;

        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            None, // theme
            None, // max_texture_side
            None, // icon_scale
        );

        Ok(Self {
            ctx,
            winit_state,
            painter,
            shapes: Default::default(),
            textures_delta: Default::default(),
            pixels_per_point: window.scale_factor() as f32,
        })
    }

    /// Feed a winit window event to egui. The response says whether egui
    /// consumed it.
    pub fn handle_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> EventResponse {
        self.winit_state.on_window_event(window, event)
    }

    /// Begin a frame; build the UI against the returned context.
    pub fn begin_frame(&mut self, window: &winit::window::Window) -> &egui::Context {
        let raw_input = self.winit_state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
        &self.ctx
    }

    /// End the frame, collecting shapes for `paint()`.
    pub fn end_frame(&mut self, window: &winit::window::Window) {
        // pixels_per_point must be read before end_pass clears the input.
        self.pixels_per_point = self.ctx.input(|i| i.pixels_per_point);

        let egui_output = self.ctx.end_pass();
        self.winit_state
            .handle_platform_output(window, egui_output.platform_output);
        self.shapes = egui_output.shapes;
        self.textures_delta = egui_output.textures_delta;
    }

    /// Paint the UI into the current framebuffer.
    pub fn paint(&mut self, window: &winit::window::Window) {
        let pixels_per_point = self.pixels_per_point;
        let shapes = std::mem::take(&mut self.shapes);
        let textures_delta = std::mem::take(&mut self.textures_delta);

        let meshes = self.ctx.tessellate(shapes, pixels_per_point);

        let size = window.inner_size();
        self.painter.paint_and_update_textures(
            [size.width, size.height],
            pixels_per_point,
            &meshes,
            &textures_delta,
        );
    }

    /// True when egui wants another frame soon (running animations).
    pub fn wants_repaint(&self) -> bool {
        self.ctx.has_requested_repaint()
    }
}

impl Drop for EguiIntegration {
    fn drop(&mut self) {
        self.painter.destroy();
    }
}
