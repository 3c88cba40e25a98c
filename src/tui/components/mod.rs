//! # TUI Components
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive everything they draw as struct fields, built fresh each frame:
//! - `TitleBar`: app name, phase, status and gateway URL
//! - `Preview`: error, progress, result or placeholder
//!
//! ### Stateful Components
//!
//! Keep presentation state between frames:
//! - `InputBox`: description editor with a character counter
//! - `ExampleGallery`: quick-start prompts (state + transient wrapper)
//! - `CodeView`: highlighted script with scroll (state + transient wrapper)
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── preview.rs
//! ├── example_gallery.rs
//! ├── code_view.rs
//! └── input_box/
//! ```

pub mod code_view;
pub mod example_gallery;
pub mod input_box;
pub mod preview;
mod title_bar;

pub use code_view::{CodeView, CodeViewState};
pub use example_gallery::{ExampleGallery, ExampleGalleryState, GalleryEvent};
pub use input_box::{InputBox, InputEvent};
pub use preview::Preview;
pub use title_bar::TitleBar;
