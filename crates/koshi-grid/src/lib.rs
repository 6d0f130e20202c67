//! Cell renderers and the frame driver for the koshi canvas grid.
//!
//! Each cell kind from `koshi-types` has one [`CellRenderer`]: a draw
//! function plus optional hooks for sizing, hit-testing, clicks, editor
//! provisioning, accessibility and paste. The [`RendererRegistry`] maps kinds
//! to renderers and [`GridCanvas`] drives them frame by frame.
//!
//! # Overview
//!
//! ```text
//! GridCanvas
//!     ├── GridTheme          (+ per-cell ThemeOverride, Rhai theme file)
//!     ├── ImageCache         async loads via crossbeam completion queue
//!     ├── SpriteCache        rating glyphs, checkbox, placeholders
//!     ├── RendererRegistry   CellKind → CellRenderer
//!     └── EditController     Idle → Editing → Committing/Cancelling → Idle
//!
//! paint_frame(surface, cells)
//!     └── per cell: theme merge → chrome → resolve → draw (clipped)
//! ```
//!
//! # Key Types
//!
//! |----------------------|---------------------------------------------|
//! | Type                 | Purpose                                     |
//! |----------------------|---------------------------------------------|
//! | [`GridCanvas`]       | Frame driver: paint, pointer, click, paste  |
//! | [`CellRenderer`]     | Per-kind behavior record                    |
//! | [`RendererRegistry`] | Kind → renderer lookup                      |
//! | [`DrawSurface`]      | Immediate-mode 2D backend contract          |
//! | [`RecordingSurface`] | In-memory backend with monospace metrics    |
//! | [`EditController`]   | The grid's single edit session              |
//! | [`GridTheme`]        | Colors, fonts and spacing                   |
//! |----------------------|---------------------------------------------|

pub mod cache;
pub mod color;
pub mod context;
pub mod editor;
pub mod error;
pub mod frame;
pub mod interaction;
pub mod registry;
pub mod renderer;
pub mod surface;
pub mod text;
pub mod theme;

pub use cache::{DEFAULT_IMAGE_CAPACITY, ImageCache, ImageCompleter, ImageStatus, LoadedImage, Sprite, SpriteCache};
pub use color::Color;
pub use context::{ClickContext, MeasureContext, RenderContext};
pub use editor::{EditController, EditOutcome, EditSession, EditState, EditorDescriptor, EditorKind};
pub use error::{GridError, ThemeError};
pub use frame::{FrameStats, GridCanvas, HoverTarget, PlacedCell};
pub use interaction::ClickOutcome;
pub use registry::{RendererRegistry, builtin_registry, builtin_renderer};
pub use renderer::CellRenderer;
pub use surface::{DrawOp, DrawSurface, FontSpec, MonospaceMetrics, RecordingSurface, TextMeasure, TextMetrics};
pub use theme::GridTheme;
pub use theme::loader::{load_theme, load_theme_from_file, theme_file_path};
