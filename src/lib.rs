#![forbid(unsafe_code)]

pub mod anim;
pub mod cli;
pub mod compose;
pub mod compositor;
pub mod error;
pub mod images;
pub mod leap;
pub mod path;
pub mod term;

pub use anim::{AnimationRequest, Phase, PropertyName};
pub use cli::{LeapConfig, Parsed};
pub use compositor::{Compositor, Layer, SoftwareCompositor, StopSignal};
pub use error::{UnicornError, UnicornResult};
pub use images::LeapImage;
pub use path::{LeapPath, Stage};
pub use term::{NullSurface, Surface, TerminalSurface};
