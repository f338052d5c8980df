//! The windowed shell that runs the vignette.
//!
//! [`run`] opens a window, initializes the GPU, assembles the
//! [`CornerScene`](crate::CornerScene), and drives it from a continuous
//! redraw loop: scroll input moves the camera, the video texture streams,
//! and the text model pops in whenever its background load completes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::geometry::PendingTextMesh;
use crate::gpu::GpuContext;
use crate::input::ScrollTracker;
use crate::mesh_pass::MeshPass;
use crate::scene::{self, CornerScene};
use crate::video::{FrameSource, ImageSequence, TestPattern, VideoConfig, VideoTexture};

/// Configuration for the vignette window and its collaborating sources.
#[derive(Clone, Debug)]
pub struct VignetteConfig {
    /// Window title.
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Video playback settings.
    pub video: VideoConfig,
    /// Directory of image frames to play on the marquee. `None` falls back
    /// to the built-in test pattern.
    pub frames_dir: Option<PathBuf>,
    /// Frame rate for an image-sequence source.
    pub frames_fps: f32,
    /// STL model of the extruded text. `None` renders the scene without
    /// text.
    pub text_model: Option<PathBuf>,
    /// Wheel lines of scrolling that span the whole experience.
    pub scroll_range: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            title: "marquee".to_string(),
            width: 1280,
            height: 720,
            video: VideoConfig::default(),
            frames_dir: None,
            frames_fps: 24.0,
            text_model: None,
            scroll_range: 30.0,
        }
    }
}

/// Opens the window and runs the vignette until closed.
pub fn run(config: VignetteConfig) {
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).unwrap();
}

struct App {
    config: VignetteConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    mesh_pass: Option<MeshPass>,
    scene: Option<CornerScene>,
    camera: Camera,
    scroll: ScrollTracker,
    last_frame: Option<Instant>,
    start_time: Instant,
}

impl App {
    fn new(config: VignetteConfig) -> Self {
        let scroll = ScrollTracker::new(config.scroll_range);
        Self {
            config,
            window: None,
            gpu: None,
            mesh_pass: None,
            scene: None,
            camera: Camera::new(),
            scroll,
            last_frame: None,
            start_time: Instant::now(),
        }
    }

    fn frame_source(&self) -> Box<dyn FrameSource> {
        if let Some(dir) = &self.config.frames_dir {
            match ImageSequence::load_dir(dir, self.config.frames_fps) {
                Ok(seq) => return Box::new(seq.looping(self.config.video.looping)),
                Err(e) => eprintln!("[video] falling back to test pattern: {}", e),
            }
        }
        Box::new(TestPattern::new(512, 256))
    }

    fn redraw(&mut self) {
        let (Some(gpu), Some(mesh_pass), Some(scene)) =
            (&self.gpu, &mut self.mesh_pass, &mut self.scene)
        else {
            return;
        };

        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        let time = self.start_time.elapsed().as_secs_f32();

        scene.advance(gpu, dt);
        scene.drive_camera(self.scroll.progress(), &mut self.camera);

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(_) => {
                // Surface lost or outdated; reconfigure and try next frame.
                gpu.surface.configure(&gpu.device, &gpu.config);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        mesh_pass.ensure_depth_size(gpu);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Vignette Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: mesh_pass.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let draw_calls = scene.draw_calls();
            mesh_pass.render(gpu, &mut render_pass, &mut self.camera, time, &draw_calls);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes).unwrap());

        let gpu = GpuContext::new(window.clone());
        let mesh_pass = MeshPass::new(&gpu);

        let video = VideoTexture::new(&gpu, self.frame_source(), self.config.video);
        let text = self
            .config
            .text_model
            .clone()
            .map(|path| PendingTextMesh::spawn(path, scene::TEXT_HEIGHT));

        self.scene = Some(CornerScene::new(&gpu, video, text));
        self.gpu = Some(gpu);
        self.mesh_pass = Some(mesh_pass);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.scroll.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }
}
