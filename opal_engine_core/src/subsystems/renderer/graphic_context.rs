use crate::window::AppWindow;
use anyhow::Result;
use winit::dpi::PhysicalSize;

/// Holds the core WGPU state objects required for rendering.
/// This structure manages the connection to the graphics API.
#[derive(Debug)]
pub struct GraphicsContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    // Configuration for the surface's swapchain behavior
    surface_config: wgpu::SurfaceConfiguration,
}

impl GraphicsContext {
    /// Initializes the graphics context for rendering: instance, surface,
    /// adapter, device/queue and the surface swapchain configuration.
    /// ## Arguments
    /// * `window` - The window rendering will target.
    /// ## Returns
    /// * `Result<Self>` - The initialized `GraphicsContext` or an error.
    pub fn new(window: &AppWindow) -> Result<Self> {
        log::info!("Initializing Graphics Context...");
        pollster::block_on(Self::initialize_async(window))
    }

    /// Asynchronous part of the initialization logic.
    async fn initialize_async(window: &AppWindow) -> Result<Self> {
        let window_arc = window.winit_window_arc().clone();
        let window_size = window_arc.inner_size();
        log::debug!(
            "Window size for initial graphics setup: {}x{}",
            window_size.width,
            window_size.height
        );

        // --- 1. Create WGPU Instance ---
        let instance_descriptor = wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        };
        let instance = wgpu::Instance::new(&instance_descriptor);
        log::debug!("WGPU instance created.");

        // --- 2. Create Surface ---
        let surface = instance.create_surface(window_arc.clone())?;
        log::debug!("WGPU surface created for the window.");

        // --- 3. Select Adapter (Physical GPU) ---
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Selected GPU: \"{}\", Backend: {:?}",
            adapter_info.name,
            adapter_info.backend
        );

        // --- 4. Request Device and Queue (Logical GPU Connection) ---
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Opal Engine Logical Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        log::info!("Logical device and command queue created.");

        // --- 5. Configure Surface Swapchain ---
        let surface_caps = surface.get_capabilities(&adapter);

        // Prefer sRGB for better color representation.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: window_size.width.max(1), // WGPU requires at least 1
            height: window_size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .iter()
                .copied()
                .find(|mode| *mode == wgpu::PresentMode::Mailbox) // low latency vsync
                .unwrap_or(wgpu::PresentMode::Fifo), // standard vsync
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "Surface configured: Format={:?}, Size={}x{}, PresentMode={:?}",
            surface_format,
            surface_config.width,
            surface_config.height,
            surface_config.present_mode
        );

        Ok(GraphicsContext {
            surface,
            device,
            queue,
            surface_config,
        })
    }

    /// Reconfigures the underlying surface (swapchain) when the window is
    /// resized, or to recover from a `Lost`/`Outdated` surface.
    /// ## Arguments
    /// * `new_size` - The new physical size of the window in pixels.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            log::info!(
                "Resizing graphics surface configuration to {}x{}",
                new_size.width,
                new_size.height
            );
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
        } else {
            log::warn!(
                "Ignoring resize request to zero dimensions: {}x{}",
                new_size.width,
                new_size.height
            );
        }
    }

    /// Acquires the next surface texture to render into.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_configuration(&self) -> &wgpu::SurfaceConfiguration {
        &self.surface_config
    }

    /// The color the screen is cleared to before the scene is drawn.
    pub fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: 0.05,
            g: 0.06,
            b: 0.09,
            a: 1.0,
        }
    }

    /// Current swapchain extent in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
}
