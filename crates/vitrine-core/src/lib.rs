//! Vitrine Core - Native window integrations for media players
//!
//! This crate keeps two OS surfaces of a host window in sync with
//! configuration and playback: the window material (Mica, Acrylic,
//! vibrancy, ...) and the taskbar transport buttons.

pub mod config;
pub mod effect;
pub mod icons;
pub mod lifecycle;
pub mod material;
pub mod menu;
pub mod native;
pub mod platform;
pub mod playback;
pub mod raw_window;
pub mod transport;
pub mod transport_binder;
pub mod window_material;

#[cfg( test )]
mod testing;

pub use config::{ ConfigStore, MaterialConfig, MemoryConfigStore, TransportConfig };
pub use icons::{ FileIconProvider, IconPaths, IconSet, ImageHandle };
pub use lifecycle::{ activate, create_host_channel, HostEvent, Lifecycle, Session };
pub use material::{ MaterialType, Rgba };
pub use native::{ NativeError, NativeWindow, Visibility };
pub use platform::{ material_options, opacity_options, PlatformKind };
pub use playback::{ PlaybackEventKind, PlaybackState };
pub use raw_window::RawHandleWindow;
pub use transport::{ create_transport_channel, SongControls, TransportAction, TransportButton };
pub use transport_binder::{ BinderState, TransportBinder };
pub use window_material::WindowMaterialController;
