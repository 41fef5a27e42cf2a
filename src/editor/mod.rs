mod camera;
mod input;
mod plugin;
mod state;

pub use camera::*;
pub use input::*;
pub use plugin::*;
pub use state::*;
