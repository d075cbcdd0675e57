//! Dear ImGui context plus its winit platform and wgpu renderer backends
//!
//! Per frame the call order is fixed: renderer new frame, platform new
//! frame, ImGui new frame, build UI, finalize draw data, render draw data.

use std::time::Instant;

use dear_imgui_rs::{ConfigFlags, Context};
use dear_imgui_wgpu::{GammaMode, WgpuInitInfo, WgpuRenderer};
use dear_imgui_winit::{HiDpiMode, WinitPlatform};
use tracing::trace;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::config::AppConfig;
use crate::demo::{self, UiState};
use crate::error::{Result, SkeletonError};
use crate::logging::{self, FrameStats};

pub struct UiLayer {
    context: Context,
    platform: WinitPlatform,
    renderer: WgpuRenderer,
    last_frame: Instant,
    stats: FrameStats,
}

impl UiLayer {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        config: &AppConfig,
    ) -> Result<Self> {
        let mut context = Context::create();
        context.set_ini_filename(config.ini_filename.clone())?;

        {
            let io = context.io_mut();
            let mut flags = io.config_flags();
            if config.nav_keyboard {
                flags.insert(ConfigFlags::NAV_ENABLE_KEYBOARD);
            }
            if config.nav_gamepad {
                flags.insert(ConfigFlags::NAV_ENABLE_GAMEPAD);
            }
            io.set_config_flags(flags);
        }

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(window, HiDpiMode::Default, &mut context);

        let init_info = WgpuInitInfo::new(device.clone(), queue.clone(), format);
        let mut renderer =
            WgpuRenderer::new(init_info, &mut context).map_err(SkeletonError::renderer)?;
        renderer.set_gamma_mode(GammaMode::Auto);

        logging::log_backend_init("Winit", "WGPU");

        Ok(Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            stats: FrameStats::new(120),
        })
    }

    /// Forward a window event to the platform backend.
    ///
    /// Returns true when the backend consumed it.
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.platform
            .handle_window_event(&mut self.context, window, event)
    }

    /// Build the demo UI and record it into `encoder`, clearing `view` first.
    pub fn render(
        &mut self,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        state: &mut UiState,
    ) -> Result<()> {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.stats.record(delta.as_secs_f32());

        self.renderer.new_frame().map_err(SkeletonError::renderer)?;
        self.platform.prepare_frame(window, &mut self.context);
        let ui = self.context.frame();

        let framerate = ui.io().framerate();
        demo::build_demo(&*ui, state, framerate);

        let clear_color = state.premultiplied_clear_color();
        let draw_data = self.context.render();
        trace!(
            vertices = draw_data.total_vtx_count,
            indices = draw_data.total_idx_count,
            "UI draw data finalized"
        );

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("dear-skeleton main pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        self.renderer
            .render_draw_data(draw_data, &mut rpass)
            .map_err(SkeletonError::renderer)?;
        Ok(())
    }
}
