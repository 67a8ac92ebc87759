pub mod cube;
pub mod graphic_context;

pub use self::cube::CubeScene;
pub use self::graphic_context::GraphicsContext;
