#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod export;
pub mod figure;
pub mod geometry;
pub mod layout;
pub mod measure;
pub mod render;
pub mod scheduler;
pub mod text;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use figure::FigureSpec;
pub use layout::{FigureLayout, compute_layout};
pub use render::render_svg;
pub use theme::Theme;
