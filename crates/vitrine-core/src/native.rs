//! Native window contract
//!
//! The host owns the window; components only borrow a handle implementing
//! this trait for as long as they are active.

use thiserror::Error;

use crate::material::{ BackgroundMaterial, Rgba, Vibrancy };
use crate::transport::TransportButton;


/// Errors reported by a native window call.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum NativeError {
    /// The API does not exist on this platform or OS build.
    #[error( "Unsupported: {0}" )]
    Unsupported( String ),

    #[error( "Native call failed: {0}" )]
    Failed( String ),
}


/// Window visibility transitions reported by the host.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Visibility {
    Shown,
    Hidden,
}


/// Platform-conditional native calls on a host window.
///
/// Passing `None` to the material calls clears the effect.
pub trait NativeWindow {
    /// Windows system backdrop.
    fn set_background_material( &self, material: Option<BackgroundMaterial> ) -> Result<(), NativeError>;

    /// macOS vibrancy.
    fn set_vibrancy( &self, vibrancy: Option<Vibrancy> ) -> Result<(), NativeError>;

    fn set_background_color( &self, color: Rgba ) -> Result<(), NativeError>;

    /// Replaces the taskbar transport buttons. An empty slice removes them.
    fn set_thumbar_buttons( &self, buttons: &[TransportButton] ) -> Result<(), NativeError>;
}


/// Logs a native call result without propagating it.
///
/// @param what - Short description of the call for the log line
/// @param result - Result of the native call
///
/// @returns true if the call succeeded
pub(crate) fn report( what: &str, result: Result<(), NativeError> ) -> bool {
    match result {
        Ok(()) => true,
        Err( NativeError::Unsupported( reason ) ) => {
            tracing::debug!( "Skipping {}: {}", what, reason );
            false
        }
        Err( e ) => {
            tracing::warn!( "Failed to {}: {}", what, e );
            false
        }
    }
}
